/// Free-form text that is known to carry at least one non-whitespace character.
///
/// Every field of a collection request and of a driver registration goes through this type: the
/// values are not checked for format (a weight of "5kg" or "cinco" is accepted as typed), only
/// for presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    /// Returns the trimmed input, or an error naming `field` if nothing is left after trimming.
    pub fn parse(field: &str, s: String) -> Result<RequiredText, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(format!("{field} must not be empty."))
        } else if trimmed.len() == s.len() {
            Ok(Self(s))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequiredText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
