//! Input validation functions
//!
//! Range checks shared by the API request types (through `validator`'s
//! `custom` attribute) and the wasm bindings.

pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_AGE_YEARS: i32 = 10;
pub const MAX_AGE_YEARS: i32 = 120;

/// Validate username: 3-50 characters of letters, digits, `_`, `-` or `.`
pub fn validate_username(username: &str) -> Result<(), String> {
    let length = username.chars().count();
    if length < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if length > 50 {
        return Err("Username must be at most 50 characters".to_string());
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err("Username may only contain letters, digits, '_', '-' and '.'".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate the confirmation field of a registration form
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < MIN_WEIGHT_KG {
        return Err(format!("Weight must be at least {} kg", MIN_WEIGHT_KG));
    }
    if weight_kg > MAX_WEIGHT_KG {
        return Err(format!("Weight must be at most {} kg", MAX_WEIGHT_KG));
    }
    Ok(())
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < MIN_HEIGHT_CM {
        return Err(format!("Height must be at least {} cm", MIN_HEIGHT_CM));
    }
    if height_cm > MAX_HEIGHT_CM {
        return Err(format!("Height must be at most {} cm", MAX_HEIGHT_CM));
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age_years: i32) -> Result<(), String> {
    if age_years < MIN_AGE_YEARS {
        return Err(format!("Age must be at least {}", MIN_AGE_YEARS));
    }
    if age_years > MAX_AGE_YEARS {
        return Err(format!("Age must be at most {}", MAX_AGE_YEARS));
    }
    Ok(())
}

/// Validate a percent daily value
pub fn validate_pdv(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Daily value must be a valid number".to_string());
    }
    if value < 0.0 {
        return Err("Daily value cannot be negative".to_string());
    }
    Ok(())
}

/// Validate a meal label
pub fn validate_meal(meal: &str) -> Result<(), String> {
    let trimmed = meal.trim();
    if trimmed.is_empty() {
        return Err("Meal cannot be empty".to_string());
    }
    if trimmed.len() > 50 {
        return Err("Meal label too long".to_string());
    }
    Ok(())
}
