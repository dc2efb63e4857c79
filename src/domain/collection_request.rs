use crate::domain::RequiredText;
use chrono::{DateTime, TimeZone};

/// Fixed, lexicographically sortable layout of `data_envio`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What the operator typed, before any validation.
///
/// `driver` is the entry currently selected in the driver list, `None` when the list is empty
/// or nothing has been picked yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionForm {
    pub requester_name: String,
    pub requester_phone: String,
    pub pickup_address: String,
    pub volume_count: String,
    pub weight: String,
    pub invoice_value: String,
    pub delivery_address: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub driver: Option<String>,
}

impl CollectionForm {
    /// Labels shown to the operator, in form order. They double as field names in validation
    /// errors.
    pub const LABELS: [&'static str; 9] = [
        "Quem pediu a coleta?",
        "Telefone de quem pediu",
        "Endereço da coleta",
        "Quantos volumes?",
        "Peso total (kg)",
        "Valor do produto/NF",
        "Endereço da entrega",
        "Nome do destinatário",
        "Telefone do destinatário",
    ];

    /// Mutable access to the free-text fields, in the same order as [`CollectionForm::LABELS`].
    pub fn fields_mut(&mut self) -> [&mut String; 9] {
        [
            &mut self.requester_name,
            &mut self.requester_phone,
            &mut self.pickup_address,
            &mut self.volume_count,
            &mut self.weight,
            &mut self.invoice_value,
            &mut self.delivery_address,
            &mut self.recipient_name,
            &mut self.recipient_phone,
        ]
    }

    pub fn clear(&mut self) {
        *self = CollectionForm::default();
    }
}

/// A form that passed validation: every field is present and a driver is selected. The driver
/// has not been resolved yet.
#[derive(Debug, Clone)]
pub struct NewCollectionRequest {
    pub requester_name: RequiredText,
    pub requester_phone: RequiredText,
    pub pickup_address: RequiredText,
    pub volume_count: RequiredText,
    pub weight: RequiredText,
    pub invoice_value: RequiredText,
    pub delivery_address: RequiredText,
    pub recipient_name: RequiredText,
    pub recipient_phone: RequiredText,
    pub driver: RequiredText,
}

impl TryFrom<CollectionForm> for NewCollectionRequest {
    type Error = String;

    fn try_from(form: CollectionForm) -> Result<Self, Self::Error> {
        let [requester_name, requester_phone, pickup_address, volume_count, weight, invoice_value, delivery_address, recipient_name, recipient_phone] =
            CollectionForm::LABELS;
        Ok(Self {
            requester_name: RequiredText::parse(requester_name, form.requester_name)?,
            requester_phone: RequiredText::parse(requester_phone, form.requester_phone)?,
            pickup_address: RequiredText::parse(pickup_address, form.pickup_address)?,
            volume_count: RequiredText::parse(volume_count, form.volume_count)?,
            weight: RequiredText::parse(weight, form.weight)?,
            invoice_value: RequiredText::parse(invoice_value, form.invoice_value)?,
            delivery_address: RequiredText::parse(delivery_address, form.delivery_address)?,
            recipient_name: RequiredText::parse(recipient_name, form.recipient_name)?,
            recipient_phone: RequiredText::parse(recipient_phone, form.recipient_phone)?,
            driver: form
                .driver
                .ok_or_else(|| "A driver must be selected.".to_string())
                .and_then(|driver| RequiredText::parse("Motorista", driver))
                .map_err(|_| "A driver must be selected.".to_string())?,
        })
    }
}

/// A recorded collection request. Once built it is never modified: the driver's name and phone
/// are a snapshot taken at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    pub requester_name: String,
    pub requester_phone: String,
    pub pickup_address: String,
    pub volume_count: String,
    pub weight: String,
    pub invoice_value: String,
    pub delivery_address: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub submitted_at: String,
}

impl CollectionRequest {
    pub fn stamp<Tz>(request: NewCollectionRequest, driver_phone: String, at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            requester_name: request.requester_name.into_inner(),
            requester_phone: request.requester_phone.into_inner(),
            pickup_address: request.pickup_address.into_inner(),
            volume_count: request.volume_count.into_inner(),
            weight: request.weight.into_inner(),
            invoice_value: request.invoice_value.into_inner(),
            delivery_address: request.delivery_address.into_inner(),
            recipient_name: request.recipient_name.into_inner(),
            recipient_phone: request.recipient_phone.into_inner(),
            driver_name: request.driver.into_inner(),
            driver_phone,
            submitted_at: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// The outbound notification. Labels, order and emoji are part of the format the drivers
    /// read on their phones, keep them as they are.
    pub fn notification_message(&self) -> String {
        format!(
            "📦 *Nova Coleta* \n\
             👤 Pedido por: {} ({})\n\
             📍 Coletar: {}\n\
             📦 Volumes: {} - Peso: {}kg\n\
             💰 Valor NF: R${}\n\
             📦 Entregar: {}\n\
             👤 Destinatário: {} ({})",
            self.requester_name,
            self.requester_phone,
            self.pickup_address,
            self.volume_count,
            self.weight,
            self.invoice_value,
            self.delivery_address,
            self.recipient_name,
            self.recipient_phone,
        )
    }
}
