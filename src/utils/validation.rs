use crate::utils::error::{FoodgramError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FoodgramError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FoodgramError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FoodgramError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FoodgramError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(FoodgramError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses `#RRGGBB` or `#RGB` into 0..=1 RGB components.
pub fn parse_hex_color(field_name: &str, value: &str) -> Result<(f32, f32, f32)> {
    let invalid = |reason: &str| FoodgramError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| invalid("Color must start with '#'"))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("Color must contain only hex digits"));
    }

    let expanded = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(invalid("Color must have 3 or 6 hex digits")),
    };

    let channel = |i: usize| -> Result<f32> {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| invalid("Color must contain only hex digits"))
    };

    Ok((channel(0)?, channel(2)?, channel(4)?))
}

pub fn validate_hex_color(field_name: &str, value: &str) -> Result<()> {
    parse_hex_color(field_name, value).map(|_| ())
}
