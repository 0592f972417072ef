use crate::domain::errors::ValidationError;

// Shared field checks. Messages name the field as the user sees it.

pub fn require_text(
    field: &'static str,
    value: &str,
    label: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, format!("{label} is required")));
    }
    limit_chars(field, trimmed, label, max_chars)?;
    Ok(trimmed.to_string())
}

pub fn limit_chars(
    field: &'static str,
    value: &str,
    label: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("{label} must not exceed {max_chars} characters"),
        ));
    }
    Ok(())
}

pub fn require_id(field: &'static str, value: u64, label: &str) -> Result<u64, ValidationError> {
    if value == 0 {
        return Err(ValidationError::new(field, format!("{label} is required")));
    }
    Ok(value)
}

// Phone numbers in E.164-ish form: optional '+', no leading zero, 2 to 15 digits.
pub fn is_phone_number(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    let len = digits.chars().count();
    (2..=15).contains(&len)
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}
