use crate::configuration::DatabaseSettings;
use crate::utils::error_chain_fmt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Executor};

const CREATE_REQUESTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS coletas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        quem_pediu TEXT, telefone_pedido TEXT, endereco_coleta TEXT,
        quantos_volumes TEXT, peso TEXT, valor_nf TEXT,
        endereco_entrega TEXT, destinatario TEXT, telefone_destinatario TEXT,
        motorista TEXT, telefone_motorista TEXT,
        data_envio TEXT
    )
"#;

const CREATE_DRIVERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS motoristas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nome TEXT, telefone TEXT
    )
"#;

/// The underlying store could not be opened, read or written.
#[derive(thiserror::Error)]
#[error("{context}")]
pub struct StoreError {
    context: &'static str,
    #[source]
    source: sqlx::Error,
}

impl StoreError {
    /// Meant for `map_err`: `.map_err(StoreError::context("Failed to ..."))`.
    pub(crate) fn context(context: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
        move |source| {
            tracing::error!("{}: {:?}", context, source);
            StoreError { context, source }
        }
    }
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Handle on the local dispatch database.
///
/// No connection is held between operations: every repository call goes through
/// [`Store::connect`], does its work and drops the connection before returning, so nothing stays
/// open while the operator is filling in a form.
#[derive(Clone)]
pub struct Store {
    options: SqliteConnectOptions,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    pub fn new(settings: &DatabaseSettings) -> Self {
        Self {
            options: settings.connect_options(),
        }
    }

    pub(crate) async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(StoreError::context("Failed to open the dispatch store."))
    }

    /// Creates the `motoristas` and `coletas` tables when they are missing. Rows already present
    /// are never touched, so it is safe to call on every startup.
    #[tracing::instrument(name = "Initialising the dispatch store schema", skip(self))]
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let mut connection = self.connect().await?;
        connection
            .execute(CREATE_REQUESTS_TABLE)
            .await
            .map_err(StoreError::context("Failed to create the requests table."))?;
        connection
            .execute(CREATE_DRIVERS_TABLE)
            .await
            .map_err(StoreError::context("Failed to create the drivers table."))?;
        connection
            .close()
            .await
            .map_err(StoreError::context("Failed to close the dispatch store."))?;
        Ok(())
    }
}
