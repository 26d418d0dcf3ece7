//! Audit trail vocabulary and the canonical value stringification.
//!
//! Audit entries store old/new values as text, so every write path must
//! agree on one stringification per type. [`AuditValue`] is that convention;
//! absent values stringify to [`NULL_SENTINEL`], which is deliberately
//! distinct from the empty string.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Stored form of an absent (`None`) old or new value.
pub const NULL_SENTINEL: &str = "null";

// ---------------------------------------------------------------------------
// Action kinds
// ---------------------------------------------------------------------------

/// The action recorded by one audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
}

impl AuditAction {
    /// String form stored in the `audit_logs.action` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Login => "Login",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// Tag for every audited entity type. Also used as the discriminator of
/// polymorphic `linked_entity_type` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Account,
    Contact,
    Carrier,
    CarrierContact,
    Policy,
    Installment,
    Prospect,
    ServiceItem,
    Task,
    SalesLogEntry,
    Note,
    CommunicationLog,
    User,
}

impl EntityKind {
    /// PascalCase tag stored in `entity_type` and `linked_entity_type` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Contact => "Contact",
            Self::Carrier => "Carrier",
            Self::CarrierContact => "CarrierContact",
            Self::Policy => "Policy",
            Self::Installment => "Installment",
            Self::Prospect => "Prospect",
            Self::ServiceItem => "ServiceItem",
            Self::Task => "Task",
            Self::SalesLogEntry => "SalesLogEntry",
            Self::Note => "Note",
            Self::CommunicationLog => "CommunicationLog",
            Self::User => "User",
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Account" => Ok(Self::Account),
            "Contact" => Ok(Self::Contact),
            "Carrier" => Ok(Self::Carrier),
            "CarrierContact" => Ok(Self::CarrierContact),
            "Policy" => Ok(Self::Policy),
            "Installment" => Ok(Self::Installment),
            "Prospect" => Ok(Self::Prospect),
            "ServiceItem" => Ok(Self::ServiceItem),
            "Task" => Ok(Self::Task),
            "SalesLogEntry" => Ok(Self::SalesLogEntry),
            "Note" => Ok(Self::Note),
            "CommunicationLog" => Ok(Self::CommunicationLog),
            "User" => Ok(Self::User),
            other => Err(CoreError::Validation(format!(
                "Unknown entity type: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Value stringification
// ---------------------------------------------------------------------------

/// Canonical stringification for values stored in audit entries.
///
/// - timestamps: RFC 3339 (`to_rfc3339`)
/// - dates: `%Y-%m-%d`
/// - decimals: plain `to_string` (no exponent)
/// - UUIDs: hyphenated lowercase
/// - `None`: [`NULL_SENTINEL`]
pub trait AuditValue {
    fn to_audit_string(&self) -> String;
}

impl AuditValue for String {
    fn to_audit_string(&self) -> String {
        self.clone()
    }
}

impl AuditValue for &str {
    fn to_audit_string(&self) -> String {
        (*self).to_string()
    }
}

impl AuditValue for bool {
    fn to_audit_string(&self) -> String {
        self.to_string()
    }
}

impl AuditValue for i32 {
    fn to_audit_string(&self) -> String {
        self.to_string()
    }
}

impl AuditValue for i64 {
    fn to_audit_string(&self) -> String {
        self.to_string()
    }
}

impl AuditValue for Uuid {
    fn to_audit_string(&self) -> String {
        self.to_string()
    }
}

impl AuditValue for NaiveDate {
    fn to_audit_string(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl AuditValue for Timestamp {
    fn to_audit_string(&self) -> String {
        self.to_rfc3339()
    }
}

impl AuditValue for Decimal {
    fn to_audit_string(&self) -> String {
        self.to_string()
    }
}

impl<T: AuditValue> AuditValue for Option<T> {
    fn to_audit_string(&self) -> String {
        match self {
            Some(value) => value.to_audit_string(),
            None => NULL_SENTINEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn entity_kind_round_trips() {
        for kind in [
            EntityKind::Account,
            EntityKind::CarrierContact,
            EntityKind::SalesLogEntry,
            EntityKind::CommunicationLog,
        ] {
            assert_eq!(EntityKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_entity_kind_is_rejected() {
        assert!(EntityKind::from_str("Widget").is_err());
    }

    #[test]
    fn none_stringifies_to_sentinel_not_empty() {
        let value: Option<String> = None;
        assert_eq!(value.to_audit_string(), NULL_SENTINEL);
        assert_ne!(value.to_audit_string(), "");
        assert_eq!(Some(String::new()).to_audit_string(), "");
    }

    #[test]
    fn date_uses_iso_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(date.to_audit_string(), "2026-03-09");
    }

    #[test]
    fn timestamp_uses_rfc3339() {
        let ts = chrono::Utc.with_ymd_and_hms(2026, 3, 9, 14, 30, 0).unwrap();
        assert_eq!(ts.to_audit_string(), "2026-03-09T14:30:00+00:00");
    }

    #[test]
    fn decimal_has_no_exponent() {
        let premium = Decimal::new(125050, 2); // 1250.50
        assert_eq!(premium.to_audit_string(), "1250.50");
    }
}
