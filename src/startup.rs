use crate::configuration::Settings;
use crate::console::Console;
use crate::driver_registry::DriverRegistry;
use crate::notifier::{MapsClient, MessagingClient, UrlOpener};
use crate::preferences::{Preferences, PreferencesFile};
use crate::request_repository::RequestRepository;
use crate::store::Store;
use crate::submission::Dispatcher;
use anyhow::Context;
use std::sync::Arc;

/// Everything the front end needs, wired once at startup and torn down with the process.
pub struct Application {
    store: Store,
    drivers: DriverRegistry,
    requests: RequestRepository,
    dispatcher: Dispatcher,
    maps: MapsClient,
    preferences_file: PreferencesFile,
    preferences: Preferences,
}

impl Application {
    /// Makes sure the schema exists and loads the saved preferences. A store that cannot be
    /// opened here is fatal: there would be nothing to record requests into.
    pub async fn build(
        configuration: Settings,
        opener: Arc<dyn UrlOpener>,
    ) -> Result<Self, anyhow::Error> {
        let store = Store::new(&configuration.database);
        store
            .init_schema()
            .await
            .with_context(|| {
                format!(
                    "Failed to initialise the dispatch store at {}",
                    configuration.database.path
                )
            })?;

        let preferences_file = PreferencesFile::new(configuration.preferences.file_path());
        let preferences = preferences_file
            .load()
            .context("Failed to load the saved preferences")?;
        tracing::info!(appearance_mode = %preferences.appearance_mode, "Preferences loaded");

        let drivers = DriverRegistry::new(store.clone());
        let requests = RequestRepository::new(store.clone());
        let messaging = MessagingClient::from_settings(&configuration.notifier, opener.clone());
        let maps = MapsClient::new(configuration.notifier.maps_base_url.clone(), opener);
        let dispatcher = Dispatcher::new(drivers.clone(), requests.clone(), messaging);

        Ok(Self {
            store,
            drivers,
            requests,
            dispatcher,
            maps,
            preferences_file,
            preferences,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    pub fn requests(&self) -> &RequestRepository {
        &self.requests
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn maps(&self) -> &MapsClient {
        &self.maps
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn preferences_file(&self) -> &PreferencesFile {
        &self.preferences_file
    }

    pub(crate) fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// A more expressive name that makes it clear that this function only returns when the
    /// operator quits or standard input is closed.
    pub async fn run_until_stopped(mut self) -> Result<(), std::io::Error> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        Console::new(stdin.lock(), stdout.lock())
            .run(&mut self)
            .await
    }
}
