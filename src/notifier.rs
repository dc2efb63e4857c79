use crate::configuration::NotifierSettings;
use crate::utils::error_chain_fmt;
use std::sync::Arc;

/// Hands a URL to whatever is able to open it: a browser, the messaging app, a test double.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the desktop's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}

#[derive(thiserror::Error)]
pub enum NotifyError {
    #[error("Type an address before searching for it.")]
    EmptyAddress,
    #[error("The phone {0} has no digits to send a message to.")]
    NoPhoneDigits(String),
    #[error("Failed to open {url}")]
    OpenFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl std::fmt::Debug for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

fn open_with(opener: &dyn UrlOpener, url: String) -> Result<(), NotifyError> {
    opener
        .open(&url)
        .map_err(|source| NotifyError::OpenFailed { url, source })
}

/// Sends notifications through click-to-chat links: the message is embedded in the URL and the
/// messaging app takes it from there. There is no delivery confirmation.
#[derive(Clone)]
pub struct MessagingClient {
    base_url: String,
    country_code: String,
    opener: Arc<dyn UrlOpener>,
}

impl MessagingClient {
    pub fn new(base_url: String, country_code: String, opener: Arc<dyn UrlOpener>) -> Self {
        Self {
            base_url,
            country_code,
            opener,
        }
    }

    pub fn from_settings(settings: &NotifierSettings, opener: Arc<dyn UrlOpener>) -> Self {
        Self::new(
            settings.messaging_base_url.clone(),
            settings.country_code.clone(),
            opener,
        )
    }

    /// Phones are typed free-form, so only their digits make it into the URL. A number written
    /// with a leading `+` already carries its country code.
    pub fn message_url(&self, phone: &str, body: &str) -> Result<String, NotifyError> {
        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(NotifyError::NoPhoneDigits(phone.to_string()));
        }
        let country_code = if phone.trim_start().starts_with('+') {
            ""
        } else {
            self.country_code.as_str()
        };
        Ok(format!(
            "{}/{}{}?text={}",
            self.base_url.trim_end_matches('/'),
            country_code,
            digits,
            urlencoding::encode(body)
        ))
    }

    #[tracing::instrument(name = "Sending a driver notification", skip(self, body))]
    pub fn send_message(&self, phone: &str, body: &str) -> Result<(), NotifyError> {
        open_with(self.opener.as_ref(), self.message_url(phone, body)?)
    }
}

impl std::fmt::Debug for MessagingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingClient")
            .field("base_url", &self.base_url)
            .field("country_code", &self.country_code)
            .finish()
    }
}

/// Opens a map search for a pickup or delivery address.
#[derive(Clone)]
pub struct MapsClient {
    base_url: String,
    opener: Arc<dyn UrlOpener>,
}

impl MapsClient {
    pub fn new(base_url: String, opener: Arc<dyn UrlOpener>) -> Self {
        Self { base_url, opener }
    }

    pub fn search_url(&self, address: &str) -> Result<String, NotifyError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(NotifyError::EmptyAddress);
        }
        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(address)
        ))
    }

    #[tracing::instrument(name = "Searching an address on the map", skip(self))]
    pub fn search(&self, address: &str) -> Result<(), NotifyError> {
        open_with(self.opener.as_ref(), self.search_url(address)?)
    }
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
