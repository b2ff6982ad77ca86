//! Reusable field checks shared by the card and signup schemas.

use super::RuleError;

const PASSWORD_SPECIALS: &str = "!@#$%^&*-";

pub fn length_between(
    value: &str,
    label: &str,
    min: usize,
    max: usize,
) -> Result<(), RuleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RuleError::new(format!("{label} is required")));
    }
    let count = trimmed.chars().count();
    if count < min {
        return Err(RuleError::new(format!(
            "{label} must be at least {min} characters"
        )));
    }
    if count > max {
        return Err(RuleError::new(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Same bounds as [`length_between`] but an empty value passes.
pub fn optional_length_between(
    value: &str,
    label: &str,
    min: usize,
    max: usize,
) -> Result<(), RuleError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    length_between(value, label, min, max)
}

pub fn email(value: &str) -> Result<(), RuleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RuleError::new("Email is required"));
    }
    let invalid = || RuleError::new("Email must be a valid address");
    if trimmed.chars().count() < 5 {
        return Err(invalid());
    }
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return Err(invalid());
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let dot_ok = domain
        .split('.')
        .all(|segment| !segment.is_empty());
    if !domain.contains('.') || !dot_ok {
        return Err(invalid());
    }
    Ok(())
}

/// Local phone shape: leading zero, digits only, 9 to 11 digits.
pub fn phone(value: &str) -> Result<(), RuleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RuleError::new("Phone is required"));
    }
    let digits_only = trimmed.chars().all(|c| c.is_ascii_digit());
    let length_ok = (9..=11).contains(&trimmed.len());
    if !digits_only || !length_ok || !trimmed.starts_with('0') {
        return Err(RuleError::new(
            "Phone must be 9-11 digits and start with 0",
        ));
    }
    Ok(())
}

/// Optional absolute URL; an empty value passes.
pub fn optional_uri(value: &str, label: &str) -> Result<(), RuleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let scheme_ok = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !scheme_ok || trimmed.chars().count() < 14 {
        return Err(RuleError::new(format!("{label} must be a valid URL")));
    }
    Ok(())
}

pub fn min_number(value: u32, min: u32, label: &str) -> Result<(), RuleError> {
    if value < min {
        if value == 0 {
            return Err(RuleError::new(format!("{label} is required")));
        }
        return Err(RuleError::new(format!("{label} must be at least {min}")));
    }
    Ok(())
}

/// Password policy: 7-20 characters with an uppercase letter, a lowercase
/// letter, a digit and one special character.
pub fn password(value: &str) -> Result<(), RuleError> {
    let count = value.chars().count();
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !(7..=20).contains(&count) || !has_upper || !has_lower || !has_digit || !has_special {
        return Err(RuleError::new(
            "Password must be 7-20 characters and include an uppercase letter, \
             a lowercase letter, a digit and one of !@#$%^&*-",
        ));
    }
    Ok(())
}

pub fn matches_other(value: &str, other: &str, message: &str) -> Result<(), RuleError> {
    if value != other {
        return Err(RuleError::new(message));
    }
    Ok(())
}
