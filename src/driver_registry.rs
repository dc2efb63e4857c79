use crate::domain::{Driver, NewDriver};
use crate::store::{Store, StoreError};
use crate::utils::error_chain_fmt;
use sqlx::Connection;

#[derive(thiserror::Error)]
pub enum RegistryError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("A driver named {0} is already registered.")]
    DuplicateName(String),
    #[error("There is no driver named {0}.")]
    NotFound(String),
    #[error(transparent)]
    StorageUnavailable(#[from] StoreError),
}

impl std::fmt::Debug for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The drivers that requests can be assigned to.
///
/// Names are the lookup key everywhere above this layer, so registering a name that is already
/// present is refused. The schema itself has no unique index: stores written by older versions
/// may hold duplicates, in which case the earliest registration wins on lookup and `remove`
/// deletes all of them.
#[derive(Clone, Debug)]
pub struct DriverRegistry {
    store: Store,
}

impl DriverRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "Listing registered drivers", skip(self))]
    pub async fn list_drivers(&self) -> Result<Vec<Driver>, StoreError> {
        let mut connection = self.store.connect().await?;
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT nome AS name, telefone AS phone FROM motoristas ORDER BY nome ASC
            "#,
        )
        .fetch_all(&mut connection)
        .await
        .map_err(StoreError::context("Failed to fetch the registered drivers."))?;
        Ok(drivers)
    }

    #[tracing::instrument(
        name = "Registering a new driver",
        skip(self, name, phone),
        fields(driver_name = %name)
    )]
    pub async fn register(&self, name: String, phone: String) -> Result<(), RegistryError> {
        let new_driver = NewDriver::parse(name, phone).map_err(RegistryError::InvalidInput)?;
        let (name, phone): (&str, &str) = (new_driver.name.as_ref(), new_driver.phone.as_ref());

        let mut connection = self.store.connect().await?;
        let mut transaction = connection
            .begin()
            .await
            .map_err(StoreError::context("Failed to start a transaction."))?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM motoristas WHERE nome = ? LIMIT 1")
                .bind(name)
                .fetch_optional(&mut transaction)
                .await
                .map_err(StoreError::context("Failed to look up the driver name."))?;
        if existing.is_some() {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        sqlx::query("INSERT INTO motoristas (nome, telefone) VALUES (?, ?)")
            .bind(name)
            .bind(phone)
            .execute(&mut transaction)
            .await
            .map_err(StoreError::context("Failed to insert the new driver."))?;
        transaction
            .commit()
            .await
            .map_err(StoreError::context("Failed to commit the new driver."))?;
        Ok(())
    }

    /// Deletes every driver registered under `name` and returns how many were removed. Removing
    /// an unknown name is not an error.
    #[tracing::instrument(name = "Removing a driver", skip(self))]
    pub async fn remove(&self, name: &str) -> Result<u64, StoreError> {
        let mut connection = self.store.connect().await?;
        let result = sqlx::query("DELETE FROM motoristas WHERE nome = ?")
            .bind(name)
            .execute(&mut connection)
            .await
            .map_err(StoreError::context("Failed to delete the driver."))?;
        Ok(result.rows_affected())
    }

    pub async fn resolve(&self, name: &str) -> Result<String, RegistryError> {
        self.find_phone(name)
            .await?
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    #[tracing::instrument(name = "Resolving a driver's phone", skip(self))]
    pub(crate) async fn find_phone(&self, name: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.store.connect().await?;
        let phone = sqlx::query_scalar(
            "SELECT telefone FROM motoristas WHERE nome = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&mut connection)
        .await
        .map_err(StoreError::context("Failed to resolve the driver's phone."))?;
        Ok(phone)
    }
}
