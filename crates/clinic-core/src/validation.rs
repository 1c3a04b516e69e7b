//! Pure validators for operator input.
//!
//! Each `parse_*` function either returns the typed value or a
//! [`ValidationError`]; the console wraps them in a re-prompt loop.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::entity::EntityId;
use crate::error::{Result, ValidationError};
use crate::status::{BloodGroup, Gender};

// =============================================================================
// Regex patterns
// =============================================================================

/// local@domain.tld, TLD of two or more letters.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email regex")
});

/// Optional `+`, optional country code `1`, then 10 to 14 digits.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?[0-9]{10,14}$").expect("Invalid phone regex"));

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid date regex"));

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("Invalid time regex"));

/// Column widths of the `VARCHAR` columns, in characters.
pub const NAME_MAX_LEN: usize = 50;
pub const LABEL_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 100;

/// Largest value a `NUMERIC(10,2)` column holds.
fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

pub fn parse_email(input: &str) -> Result<String> {
    if input.chars().count() > EMAIL_MAX_LEN {
        return Err(ValidationError::too_long("Email Address", EMAIL_MAX_LEN));
    }
    if validate_email(input) {
        Ok(input.to_string())
    } else {
        Err(ValidationError::InvalidEmail(input.to_string()))
    }
}

pub fn parse_phone(input: &str) -> Result<String> {
    if validate_phone(input) {
        Ok(input.to_string())
    } else {
        Err(ValidationError::InvalidPhone(input.to_string()))
    }
}

/// Strict `YYYY-MM-DD`; out-of-range days such as `2023-02-30` are rejected.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if !DATE_REGEX.is_match(input) {
        return Err(ValidationError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// A strict date that is not before `today`.
pub fn parse_appointment_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date = parse_date(input)?;
    ensure_not_past(date, today)?;
    Ok(date)
}

pub fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date < today {
        Err(ValidationError::PastDate(date))
    } else {
        Ok(())
    }
}

/// Strict 24-hour `HH:MM`.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    if !TIME_REGEX.is_match(input) {
        return Err(ValidationError::InvalidTime(input.to_string()));
    }
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

/// Parses a money amount and normalizes it to two decimal places.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let value = Decimal::from_str(input.trim())
        .map_err(|_| ValidationError::invalid_amount(input, "not a number"))?;
    let mut value = value.normalize();
    if value.scale() > 2 {
        return Err(ValidationError::invalid_amount(
            input,
            "at most two decimal places",
        ));
    }
    check_amount(&value)?;
    value.rescale(2);
    Ok(value)
}

pub fn check_amount(value: &Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::invalid_amount(
            value.to_string(),
            "must not be negative",
        ));
    }
    let max = max_amount();
    if *value > max {
        return Err(ValidationError::invalid_amount(
            value.to_string(),
            format!("must not exceed {max}"),
        ));
    }
    Ok(())
}

pub fn parse_gender(input: &str) -> Result<Gender> {
    input.parse()
}

/// Blank input means "not recorded".
pub fn parse_blood_group(input: &str) -> Result<Option<BloodGroup>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input.parse().map(Some)
}

/// Non-blank text of at most `max_len` characters, trimmed.
pub fn require_text(field: &str, input: &str, max_len: usize) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(ValidationError::empty(field))
    } else if trimmed.chars().count() > max_len {
        Err(ValidationError::too_long(field, max_len))
    } else {
        Ok(trimmed.to_string())
    }
}

/// First or last name.
pub fn parse_name(field: &str, input: &str) -> Result<String> {
    require_text(field, input, NAME_MAX_LEN)
}

/// Specialization or department.
pub fn parse_label(field: &str, input: &str) -> Result<String> {
    require_text(field, input, LABEL_MAX_LEN)
}

pub fn parse_id(input: &str) -> Result<EntityId> {
    match input.trim().parse::<EntityId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId(input.to_string())),
    }
}

/// Parses a 1-based menu selection and returns the 0-based index.
pub fn parse_menu_index(input: &str, max: usize) -> Result<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n - 1),
        _ => Err(ValidationError::InvalidChoice {
            value: input.to_string(),
            max,
        }),
    }
}
