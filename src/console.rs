use crate::domain::CollectionForm;
use crate::driver_registry::RegistryError;
use crate::preferences::{AppearanceMode, Preferences};
use crate::startup::Application;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  drivers           list the registered drivers
  register          register a new driver
  remove <name>     remove a driver
  submit            fill in and dispatch a collection request
  history           list the recorded collection requests
  maps <address>    search an address on the map
  theme [mode]      show or change the appearance mode (dark, light, system)
  help              show this message
  quit              leave";

/// Line-oriented front end over an [`Application`].
///
/// Prompts that hit the end of the input abort the current action without an error, the same
/// way a cancelled dialog would. Failures are printed and the loop keeps going.
pub struct Console<R, W> {
    input: R,
    output: W,
    form: CollectionForm,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            form: CollectionForm::default(),
        }
    }

    /// The entry kept between `submit` attempts. Cleared once a request is recorded.
    pub fn form(&self) -> &CollectionForm {
        &self.form
    }

    pub async fn run(&mut self, app: &mut Application) -> io::Result<()> {
        writeln!(
            self.output,
            "Collection dispatch ({} mode). Type `help` for the list of commands.",
            app.preferences().appearance_mode
        )?;
        while let Some(line) = self.prompt(">")? {
            let line = line.trim();
            let (command, argument) = match line.split_once(char::is_whitespace) {
                Some((command, argument)) => (command, argument.trim()),
                None => (line, ""),
            };
            match command {
                "" => {}
                "help" => writeln!(self.output, "{HELP}")?,
                "drivers" => self.list_drivers(app).await?,
                "register" => self.register_driver(app).await?,
                "remove" => self.remove_driver(app, argument).await?,
                "submit" => self.submit(app).await?,
                "history" => self.history(app).await?,
                "maps" => self.search_map(app, argument)?,
                "theme" => self.change_theme(app, argument)?,
                "quit" | "exit" => break,
                other => writeln!(self.output, "Unknown command `{other}`. Type `help`.")?,
            }
        }
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label} ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
    }

    async fn list_drivers(&mut self, app: &Application) -> io::Result<()> {
        match app.drivers().list_drivers().await {
            Ok(drivers) if drivers.is_empty() => writeln!(self.output, "No drivers registered."),
            Ok(drivers) => {
                for driver in drivers {
                    writeln!(self.output, "{} ({})", driver.name, driver.phone)?;
                }
                Ok(())
            }
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    async fn register_driver(&mut self, app: &Application) -> io::Result<()> {
        let Some(name) = self.prompt("Nome:")? else {
            return Ok(());
        };
        let Some(phone) = self.prompt("WhatsApp:")? else {
            return Ok(());
        };
        match app.drivers().register(name, phone).await {
            Ok(()) => writeln!(self.output, "Driver registered."),
            Err(RegistryError::StorageUnavailable(e)) => {
                writeln!(self.output, "Error: {e}. The driver was not registered.")
            }
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    async fn remove_driver(&mut self, app: &Application, name: &str) -> io::Result<()> {
        if name.is_empty() {
            return writeln!(self.output, "Usage: remove <name>");
        }
        match app.drivers().remove(name).await {
            Ok(0) => writeln!(self.output, "There is no driver named {name}."),
            Ok(_) => writeln!(self.output, "Driver {name} removed."),
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    async fn submit(&mut self, app: &Application) -> io::Result<()> {
        let drivers = match app.drivers().list_drivers().await {
            Ok(drivers) => drivers,
            Err(e) => return writeln!(self.output, "Error: {e}"),
        };

        for (index, label) in CollectionForm::LABELS.iter().enumerate() {
            let current = self.form.fields_mut()[index].clone();
            let caption = if current.is_empty() {
                label.to_string()
            } else {
                format!("{label} [{current}]")
            };
            let Some(value) = self.prompt(&caption)? else {
                return Ok(());
            };
            if !value.trim().is_empty() {
                *self.form.fields_mut()[index] = value;
            }
        }

        // Like a combo box, the selection defaults to the first driver in the list.
        let names: Vec<&str> = drivers.iter().map(|d| d.name.as_str()).collect();
        let default_driver = self
            .form
            .driver
            .clone()
            .filter(|selected| names.contains(&selected.as_str()))
            .or_else(|| names.first().map(|name| name.to_string()));
        let caption = format!(
            "Motorista ({}) [{}]",
            names.join(", "),
            default_driver.as_deref().unwrap_or("")
        );
        let Some(value) = self.prompt(&caption)? else {
            return Ok(());
        };
        self.form.driver = if value.trim().is_empty() {
            default_driver
        } else {
            Some(value.trim().to_string())
        };

        match app.dispatcher().submit(&mut self.form).await {
            Ok(receipt) => {
                writeln!(self.output, "{}", receipt.message)?;
                if !receipt.notified {
                    writeln!(
                        self.output,
                        "The driver could not be notified, send the message above manually."
                    )?;
                }
                writeln!(self.output, "Request #{} recorded.", receipt.request_id)
            }
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    async fn history(&mut self, app: &Application) -> io::Result<()> {
        match app.requests().list_all().await {
            Ok(requests) if requests.is_empty() => writeln!(self.output, "No requests recorded."),
            Ok(requests) => {
                for recorded in requests {
                    let request = &recorded.request;
                    writeln!(
                        self.output,
                        "#{} {} {} -> {} ({})",
                        recorded.id,
                        request.submitted_at,
                        request.pickup_address,
                        request.delivery_address,
                        request.driver_name
                    )?;
                }
                Ok(())
            }
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn search_map(&mut self, app: &Application, address: &str) -> io::Result<()> {
        if let Err(e) = app.maps().search(address) {
            writeln!(self.output, "{e}")?;
        }
        Ok(())
    }

    fn change_theme(&mut self, app: &mut Application, argument: &str) -> io::Result<()> {
        if argument.is_empty() {
            return writeln!(self.output, "{}", app.preferences().appearance_mode);
        }
        let appearance_mode = match AppearanceMode::try_from(argument) {
            Ok(mode) => mode,
            Err(e) => return writeln!(self.output, "{e}"),
        };
        let preferences = Preferences { appearance_mode };
        app.set_preferences(preferences);
        match app.preferences_file().save(&preferences) {
            Ok(()) => writeln!(self.output, "Appearance mode set to {appearance_mode}."),
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Failed to save the preferences");
                writeln!(
                    self.output,
                    "Error: {e}. Appearance mode set to {appearance_mode} for this session only."
                )
            }
        }
    }
}
