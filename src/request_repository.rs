use crate::domain::CollectionRequest;
use crate::store::{Store, StoreError};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// A request as stored, with the surrogate key the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCollectionRequest {
    pub id: i64,
    pub request: CollectionRequest,
}

impl<'r> FromRow<'r, SqliteRow> for RecordedCollectionRequest {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            request: CollectionRequest {
                requester_name: row.try_get("quem_pediu")?,
                requester_phone: row.try_get("telefone_pedido")?,
                pickup_address: row.try_get("endereco_coleta")?,
                volume_count: row.try_get("quantos_volumes")?,
                weight: row.try_get("peso")?,
                invoice_value: row.try_get("valor_nf")?,
                delivery_address: row.try_get("endereco_entrega")?,
                recipient_name: row.try_get("destinatario")?,
                recipient_phone: row.try_get("telefone_destinatario")?,
                driver_name: row.try_get("motorista")?,
                driver_phone: row.try_get("telefone_motorista")?,
                submitted_at: row.try_get("data_envio")?,
            },
        })
    }
}

/// Append-only log of dispatched collection requests. Entries cannot be edited or deleted
/// through this type.
#[derive(Clone, Debug)]
pub struct RequestRepository {
    store: Store,
}

impl RequestRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Records `request` and returns the id the store assigned to it.
    #[tracing::instrument(
        name = "Saving a collection request",
        skip(self, request),
        fields(driver_name = %request.driver_name, submitted_at = %request.submitted_at)
    )]
    pub async fn submit(&self, request: &CollectionRequest) -> Result<i64, StoreError> {
        let mut connection = self.store.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO coletas (
                quem_pediu, telefone_pedido, endereco_coleta, quantos_volumes,
                peso, valor_nf, endereco_entrega, destinatario, telefone_destinatario,
                motorista, telefone_motorista, data_envio
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.requester_name)
        .bind(&request.requester_phone)
        .bind(&request.pickup_address)
        .bind(&request.volume_count)
        .bind(&request.weight)
        .bind(&request.invoice_value)
        .bind(&request.delivery_address)
        .bind(&request.recipient_name)
        .bind(&request.recipient_phone)
        .bind(&request.driver_name)
        .bind(&request.driver_phone)
        .bind(&request.submitted_at)
        .execute(&mut connection)
        .await
        .map_err(StoreError::context("Failed to save the collection request."))?;
        Ok(result.last_insert_rowid())
    }

    #[tracing::instrument(name = "Listing recorded collection requests", skip(self))]
    pub async fn list_all(&self) -> Result<Vec<RecordedCollectionRequest>, StoreError> {
        let mut connection = self.store.connect().await?;
        let requests = sqlx::query_as::<_, RecordedCollectionRequest>(
            r#"
            SELECT id, quem_pediu, telefone_pedido, endereco_coleta, quantos_volumes,
                   peso, valor_nf, endereco_entrega, destinatario, telefone_destinatario,
                   motorista, telefone_motorista, data_envio
            FROM coletas ORDER BY id ASC
            "#,
        )
        .fetch_all(&mut connection)
        .await
        .map_err(StoreError::context("Failed to fetch the recorded collection requests."))?;
        Ok(requests)
    }
}
