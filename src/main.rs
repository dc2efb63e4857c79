use anyhow::Context;
use coleta::configuration::get_configuration;
use coleta::notifier::SystemBrowser;
use coleta::startup::Application;
use coleta::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

/// Every store call is awaited before the next one starts, a single thread is all we need.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr: stdout belongs to the console.
    let subscriber = get_subscriber("coleta".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration")?;
    let application = Application::build(configuration, Arc::new(SystemBrowser)).await?;
    application.run_until_stopped().await?;
    Ok(())
}
