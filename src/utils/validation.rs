use crate::utils::error::{GearError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const SUPPORTED_OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

/// 數值必須是有限且大於 0
pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(GearError::invalid_input(
            field_name,
            value,
            "Value must be a finite number",
        ));
    }

    if value <= 0.0 {
        return Err(GearError::invalid_input(
            field_name,
            value,
            "Value must be greater than 0",
        ));
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(GearError::invalid_input(
            field_name,
            value,
            "Value must be a finite number",
        ));
    }

    if value < 0.0 {
        return Err(GearError::invalid_input(
            field_name,
            value,
            "Value cannot be negative",
        ));
    }
    Ok(())
}

pub fn validate_non_empty<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(GearError::invalid_input(
            field_name,
            "[]",
            "At least one value is required",
        ));
    }
    Ok(())
}

/// 齒數不能為 0，否則齒比會除以零
pub fn validate_tooth_counts(field_name: &str, teeth: &[u32]) -> Result<()> {
    validate_non_empty(field_name, teeth)?;

    if let Some(zero) = teeth.iter().find(|&&t| t == 0) {
        return Err(GearError::invalid_input(
            field_name,
            zero,
            "Tooth counts must be greater than 0",
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GearError::invalid_input(
            field_name,
            path,
            "Path cannot be empty",
        ));
    }

    if path.contains('\0') {
        return Err(GearError::invalid_input(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    let allowed: HashSet<&str> = SUPPORTED_OUTPUT_FORMATS.iter().copied().collect();

    for format in formats {
        if !allowed.contains(format.as_str()) {
            return Err(GearError::invalid_input(
                field_name,
                format,
                format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_OUTPUT_FORMATS.join(", ")
                ),
            ));
        }
    }

    Ok(())
}
