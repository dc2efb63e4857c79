use crate::utils::error_chain_fmt;
use std::path::{Path, PathBuf};

/// How the front end should be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppearanceMode {
    #[default]
    Dark,
    Light,
    System,
}

impl AppearanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppearanceMode::Dark => "dark",
            AppearanceMode::Light => "light",
            AppearanceMode::System => "system",
        }
    }
}

impl std::fmt::Display for AppearanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AppearanceMode {
    type Error = String;

    /// Menus show the modes capitalised ("Dark"), the document stores them in lower case.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "system" => Ok(Self::System),
            other => Err(format!(
                "{other} is not a supported appearance mode. Use `dark`, `light` or `system`."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub appearance_mode: AppearanceMode,
}

/// On-disk layout: `{"tema": "dark"}`.
#[derive(serde::Serialize, serde::Deserialize, Default)]
struct PreferencesDocument {
    #[serde(default)]
    tema: Option<String>,
}

#[derive(thiserror::Error)]
pub enum PreferencesError {
    #[error("Failed to access the preferences file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The preferences file {path} is not valid JSON")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl std::fmt::Debug for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct PreferencesFile {
    path: PathBuf,
}

impl PreferencesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file, or one without a usable `tema`, yields the defaults.
    #[tracing::instrument(name = "Loading preferences", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Preferences, PreferencesError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(source) => {
                return Err(PreferencesError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let document: PreferencesDocument =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        let appearance_mode = match document.tema.as_deref().map(AppearanceMode::try_from) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                tracing::warn!(error.message = %e, "Falling back to the default appearance mode");
                AppearanceMode::default()
            }
            None => AppearanceMode::default(),
        };
        Ok(Preferences { appearance_mode })
    }

    #[tracing::instrument(name = "Saving preferences", skip(self), fields(path = %self.path.display()))]
    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        let document = PreferencesDocument {
            tema: Some(preferences.appearance_mode.as_str().to_string()),
        };
        let contents =
            serde_json::to_string(&document).map_err(|source| PreferencesError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, contents).map_err(|source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
