use crate::utils::error::{RankerError, Result};
use std::collections::HashSet;
use std::hash::Hash;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RankerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RankerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| RankerError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RankerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(RankerError::SnapshotError {
            message: format!("{} must be a finite number, got {}", field_name, value),
        });
    }
    Ok(())
}

pub fn validate_positive_amount(field_name: &str, value: f64) -> Result<()> {
    validate_finite(field_name, value)?;
    if value <= 0.0 {
        return Err(RankerError::SnapshotError {
            message: format!("{} must be positive, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Fails on the first key seen twice; `describe` renders it for the message.
pub fn validate_unique<K, I, F>(field_name: &str, keys: I, describe: F) -> Result<()>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
    F: Fn(&K) -> String,
{
    let mut seen = HashSet::new();
    for key in keys {
        if seen.contains(&key) {
            return Err(RankerError::SnapshotError {
                message: format!("duplicate {}: {}", field_name, describe(&key)),
            });
        }
        seen.insert(key);
    }
    Ok(())
}
