//! Customer directory lookup
//!
//! Callers are resolved through the [`CustomerDirectory`] trait so the card
//! builder never touches a concrete store. The bundled implementation is
//! backed by the `[[customers]]` tables of the config file.

use serde::{Deserialize, Serialize};

use crate::phone;

/// A billed job for a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub description: String,
    pub amount: f64,
    /// As entered, usually `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub paid: bool,
}

/// Colored tag shown next to a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default = "default_label_color")]
    pub color: String,
}

fn default_label_color() -> String {
    "#f1f1f1".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: u32,
    pub business_name: String,
    #[serde(default)]
    pub sector: String,
    /// Program the customer is enrolled in (Retail, Energy, ...)
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub vat: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub owner_first: String,
    #[serde(default)]
    pub owner_last: String,
    /// Free text, may contain HTML
    #[serde(default)]
    pub notes: String,
    /// Contact numbers in any formatting
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Label>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl CustomerProfile {
    pub fn owner_full(&self) -> String {
        format!("{} {}", self.owner_first, self.owner_last)
            .trim()
            .to_string()
    }

    /// Sum of all services not yet paid
    pub fn unpaid_total(&self) -> f64 {
        self.services
            .iter()
            .filter(|s| !s.paid)
            .map(|s| s.amount)
            .sum()
    }

    fn has_phone(&self, canonical: &str) -> bool {
        self.phones
            .iter()
            .any(|p| phone::normalize(p) == canonical)
    }
}

/// Read-only access to customer data by phone number
pub trait CustomerDirectory {
    /// Find the customer owning `phone` (any formatting); exact on digits
    fn lookup_customer_by_phone(&self, phone: &str) -> Option<CustomerProfile>;
}

/// Directory over customers listed in the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigDirectory {
    customers: Vec<CustomerProfile>,
}

impl ConfigDirectory {
    pub fn new(customers: Vec<CustomerProfile>) -> Self {
        Self { customers }
    }
}

impl CustomerDirectory for ConfigDirectory {
    fn lookup_customer_by_phone(&self, phone: &str) -> Option<CustomerProfile> {
        let canonical = phone::normalize(phone);
        if canonical.is_empty() {
            return None;
        }

        let found = self
            .customers
            .iter()
            .find(|c| c.has_phone(&canonical))
            .cloned();

        match &found {
            Some(customer) => tracing::debug!(
                "Customer {} ({}) matched {}",
                customer.customer_id,
                customer.business_name,
                canonical
            ),
            None => tracing::debug!("No customer found for phone {}", canonical),
        }
        found
    }
}
