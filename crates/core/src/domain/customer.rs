use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Disabled,
}

impl CustomerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "disabled" => Ok(Self::Disabled),
            other => Err(DomainError::UnknownVariant {
                kind: "customer status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn phone_display(&self) -> &str {
        self.phone.as_deref().unwrap_or("N/A")
    }

    pub fn is_active(&self) -> bool {
        self.status == CustomerStatus::Active
    }

    /// Applies the provided fields and stamps `updated_at`.
    pub fn apply(&mut self, update: &CustomerUpdate, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

/// Field-level changes accepted by the customer store. Only name, email,
/// phone, and status are mutable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
}

impl CustomerUpdate {
    pub fn email(value: impl Into<String>) -> Self {
        Self { email: Some(value.into()), ..Self::default() }
    }

    pub fn phone(value: impl Into<String>) -> Self {
        Self { phone: Some(value.into()), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{Customer, CustomerId, CustomerStatus, CustomerUpdate};
    use crate::errors::DomainError;

    fn customer() -> Customer {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().expect("valid timestamp");
        Customer {
            id: CustomerId(7),
            name: "Edward Norton".to_string(),
            email: "edward.n@example.com".to_string(),
            phone: None,
            status: CustomerStatus::Disabled,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(" Active ".parse::<CustomerStatus>(), Ok(CustomerStatus::Active));
        assert_eq!("disabled".parse::<CustomerStatus>(), Ok(CustomerStatus::Disabled));
        assert!(matches!(
            "archived".parse::<CustomerStatus>(),
            Err(DomainError::UnknownVariant { kind: "customer status", .. })
        ));
    }

    #[test]
    fn apply_only_touches_provided_fields() {
        let mut record = customer();
        let now = record.created_at + Duration::hours(2);

        record.apply(&CustomerUpdate::phone("555-9999"), now);

        assert_eq!(record.phone.as_deref(), Some("555-9999"));
        assert_eq!(record.email, "edward.n@example.com");
        assert_eq!(record.status, CustomerStatus::Disabled);
        assert_eq!(record.updated_at, now);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(CustomerUpdate::default().is_empty());
        assert!(!CustomerUpdate::email("a@b.co").is_empty());
    }

    #[test]
    fn serializes_with_plain_integer_id_and_snake_case_status() {
        let value = serde_json::to_value(customer()).expect("serialize customer");
        assert_eq!(value["id"], 7);
        assert_eq!(value["status"], "disabled");
        assert!(value["phone"].is_null());
    }

    #[test]
    fn missing_phone_renders_placeholder() {
        assert_eq!(customer().phone_display(), "N/A");
    }
}
