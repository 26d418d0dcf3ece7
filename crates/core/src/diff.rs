//! Field-level diffing for audited updates.
//!
//! Every update path compares the submitted value against the stored value
//! with [`diff_field`]; only actual changes produce a [`Change`], and only
//! changes are written or audited. A no-op edit must not appear in the trail.

use crate::audit::AuditValue;

/// One field change: the audit entry payload for a single Update row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub field: &'static str,
    pub old: String,
    pub new: String,
}

/// Compare a stored value against a submitted value.
///
/// Returns `None` when the values are equal (no write, no audit entry), or
/// a [`Change`] carrying the stringified old/new values otherwise. Equality
/// is value equality, not identity; stringification follows [`AuditValue`].
pub fn diff_field<T>(field: &'static str, old: &T, new: &T) -> Option<Change>
where
    T: AuditValue + PartialEq,
{
    if old == new {
        return None;
    }
    Some(Change {
        field,
        old: old.to_audit_string(),
        new: new.to_audit_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::NULL_SENTINEL;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn equal_values_produce_no_change() {
        assert_eq!(
            diff_field("status", &"Active".to_string(), &"Active".to_string()),
            None
        );
    }

    #[test]
    fn changed_value_carries_old_and_new() {
        let change = diff_field("status", &"Active".to_string(), &"Inactive".to_string())
            .expect("different values must diff");
        assert_eq!(change.field, "status");
        assert_eq!(change.old, "Active");
        assert_eq!(change.new, "Inactive");
    }

    #[test]
    fn none_to_value_uses_null_sentinel() {
        let old: Option<String> = None;
        let new = Some("555-0100".to_string());
        let change = diff_field("phone", &old, &new).unwrap();
        assert_eq!(change.old, NULL_SENTINEL);
        assert_eq!(change.new, "555-0100");
    }

    #[test]
    fn equal_options_produce_no_change() {
        let old = Some(Decimal::new(120000, 2));
        let new = Some(Decimal::new(120000, 2));
        assert_eq!(diff_field("premium", &old, &new), None);
    }

    #[test]
    fn date_change_is_stable() {
        let old = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let new = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let change = diff_field("effective_date", &old, &new).unwrap();
        assert_eq!(change.old, "2026-01-01");
        assert_eq!(change.new, "2026-07-01");
    }
}
