use crate::domain::RequiredText;

/// A registered driver as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Driver {
    pub name: String,
    pub phone: String,
}

/// A driver registration that passed validation. The phone is a free-form contact channel
/// (usually a WhatsApp number) and is not checked for format.
#[derive(Debug)]
pub struct NewDriver {
    pub name: RequiredText,
    pub phone: RequiredText,
}

impl NewDriver {
    pub fn parse(name: String, phone: String) -> Result<NewDriver, String> {
        let name = RequiredText::parse("Nome", name)?;
        let phone = RequiredText::parse("WhatsApp", phone)?;
        Ok(Self { name, phone })
    }
}
