//! Field validation for customer input and entities.
//!
//! Email checks are syntactic only; no DNS or mailbox lookups are made.

use crate::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::models::Customer;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const MAX_LOCAL_PART_LEN: usize = 64;

/// Check the syntax of an email address.
///
/// Accepts `local@domain` where the local part is 1..=64 characters without
/// whitespace or misplaced dots, and the domain has at least two labels of
/// ASCII alphanumerics with hyphens only inside a label.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    !local.is_empty()
        && local.chars().count() <= MAX_LOCAL_PART_LEN
        && !local.chars().any(char::is_whitespace)
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn parse_fixed_offset(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Parse an ISO-8601 timestamp (RFC 3339 or `YYYY-MM-DDTHH:MM:SS±HHMM`).
pub fn parse_datetime(attribute: &str, value: &str) -> ValidationResult<DateTime<Utc>> {
    parse_fixed_offset(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ValidationError::invalid_datetime(attribute, value))
}

/// Parse a calendar date, given as `YYYY-MM-DD` or as a full timestamp.
///
/// For timestamps the date is taken in the timestamp's own offset, so
/// `1986-12-20T00:00:00+0100` is the 20th.
pub fn parse_date(attribute: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_fixed_offset(value).map(|dt| dt.date_naive()))
        .ok_or_else(|| ValidationError::invalid_datetime(attribute, value))
}

/// Validate a built customer entity, recording every violation.
pub fn validate_customer(customer: &Customer, errors: &mut ValidationErrors) {
    if customer.email.trim().is_empty() {
        errors.push(ValidationError::missing_required("email"));
    } else if !is_valid_email(&customer.email) {
        errors.push(ValidationError::InvalidEmail {
            attribute: "email".to_string(),
            value: customer.email.clone(),
        });
    }

    if customer.last_login < customer.first_login {
        errors.push(ValidationError::custom(
            "lastLogin",
            "must not be earlier than firstLogin",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerGroup, Shop};
    use chrono::Duration;

    #[test]
    fn test_valid_emails() {
        for email in [
            "test@example.com",
            "max.mustermann@shop.example.de",
            "5f3a1test@foobar.com",
            "a+tag@sub-domain.example.org",
        ] {
            assert!(is_valid_email(email), "{} should be valid", email);
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "invalid",
            "",
            "@example.com",
            "max@",
            "max@localhost",
            "max@@example.com",
            "a@b@example.com",
            "max mustermann@example.com",
            ".max@example.com",
            "max.@example.com",
            "max..m@example.com",
            "max@-example.com",
            "max@example..com",
            "max@exa_mple.com",
        ] {
            assert!(!is_valid_email(email), "{} should be invalid", email);
        }

        let long_local = format!("{}@example.com", "a".repeat(65));
        assert!(!is_valid_email(&long_local));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let rfc = parse_datetime("firstLogin", "2012-10-08T10:00:00+02:00").unwrap();
        let iso = parse_datetime("firstLogin", "2012-10-08T10:00:00+0200").unwrap();
        assert_eq!(rfc, iso);
        assert_eq!(rfc.to_rfc3339(), "2012-10-08T08:00:00+00:00");

        let err = parse_datetime("firstLogin", "yesterday").unwrap_err();
        assert_eq!(err.attribute(), Some("firstLogin"));
    }

    #[test]
    fn test_parse_date_keeps_local_day() {
        let expected = NaiveDate::from_ymd_opt(1986, 12, 20).unwrap();
        assert_eq!(parse_date("birthday", "1986-12-20").unwrap(), expected);
        assert_eq!(
            parse_date("birthday", "1986-12-20T00:00:00+0100").unwrap(),
            expected
        );
        assert!(parse_date("birthday", "20.12.1986").is_err());
    }

    #[test]
    fn test_validate_customer() {
        let mut customer = Customer::new(
            "invalid",
            Shop::new(1, "Main", "EK"),
            CustomerGroup::new(1, "EK", "Shopkunden"),
        );
        customer.last_login = customer.first_login - Duration::days(1);

        let mut errors = ValidationErrors::new();
        validate_customer(&customer, &mut errors);
        assert_eq!(errors.len(), 2);
        assert!(errors.has_violation_for("email"));
        assert!(errors.has_violation_for("lastLogin"));

        customer.email = "  ".to_string();
        customer.last_login = customer.first_login;
        let mut errors = ValidationErrors::new();
        validate_customer(&customer, &mut errors);
        assert!(matches!(
            errors.violations(),
            [ValidationError::MissingRequiredAttribute { .. }]
        ));
    }
}
