use crate::domain::{CollectionForm, CollectionRequest, NewCollectionRequest};
use crate::driver_registry::DriverRegistry;
use crate::notifier::MessagingClient;
use crate::request_repository::RequestRepository;
use crate::store::StoreError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    ValidationError(String),
    #[error("The driver {0} is no longer registered. Select another one.")]
    UnknownDriver(String),
    #[error(transparent)]
    StorageUnavailable(#[from] StoreError),
}

impl std::fmt::Debug for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// What the operator gets back once a request has been recorded.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub request_id: i64,
    pub request: CollectionRequest,
    pub message: String,
    /// `false` when the notification could not be handed over. The request is recorded either way.
    pub notified: bool,
}

/// Turns a filled-in form into a recorded request and a driver notification.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    drivers: DriverRegistry,
    requests: RequestRepository,
    messaging: MessagingClient,
}

impl Dispatcher {
    pub fn new(
        drivers: DriverRegistry,
        requests: RequestRepository,
        messaging: MessagingClient,
    ) -> Self {
        Self {
            drivers,
            requests,
            messaging,
        }
    }

    /// Validates `form`, snapshots the selected driver's phone, stamps the request with the
    /// local time and records it. The notification is sent only after the request is stored and
    /// its outcome never turns a recorded request into an error.
    ///
    /// On success `form` is cleared for the next entry. On failure nothing is written and `form`
    /// is left as it was, so the operator can fix it and try again.
    #[tracing::instrument(
        name = "Submitting a collection request",
        skip(self, form),
        fields(
            requester_name = %form.requester_name,
            driver_name = ?form.driver
        )
    )]
    pub async fn submit(
        &self,
        form: &mut CollectionForm,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let new_request: NewCollectionRequest = form
            .clone()
            .try_into()
            .map_err(SubmissionError::ValidationError)?;

        let driver_phone = self
            .drivers
            .find_phone(new_request.driver.as_ref())
            .await?
            .ok_or_else(|| SubmissionError::UnknownDriver(new_request.driver.to_string()))?;

        let request = CollectionRequest::stamp(new_request, driver_phone, chrono::Local::now());
        let request_id = self.requests.submit(&request).await?;

        let message = request.notification_message();
        let notified = match self.messaging.send_message(&request.driver_phone, &message) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "The request was recorded but the driver could not be notified"
                );
                false
            }
        };

        form.clear();
        Ok(SubmissionReceipt {
            request_id,
            request,
            message,
            notified,
        })
    }
}
