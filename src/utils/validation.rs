//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! compartidas entre los DTOs y los controllers.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Matrícula: 2-11 caracteres, mayúsculas, dígitos y guiones
    pub static ref LICENSE_PLATE_RE: Regex = Regex::new(r"^[A-Z0-9-]{2,11}$").unwrap();
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref IBAN_RE: Regex = Regex::new(r"^[A-Z0-9]{15,34}$").unwrap();
    static ref SWIFT_RE: Regex =
        Regex::new(r"^[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}([A-Z0-9]{3})?$").unwrap();
    /// Contraseña fuerte: minúscula, mayúscula, dígito y carácter especial
    static ref PASSWORD_LOWER_RE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref PASSWORD_UPPER_RE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref PASSWORD_DIGIT_RE: Regex = Regex::new(r"[0-9]").unwrap();
    static ref PASSWORD_SPECIAL_RE: Regex = Regex::new(r"[@$!%*?&]").unwrap();
}

/// Validar formato de email
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono internacional (básico: dígitos con prefijo + opcional)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value
        .strip_prefix('+')
        .unwrap_or(value)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .count();
    let only_valid_chars = value
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == ' ' || c == '-');

    if !only_valid_chars || digits < 9 || digits > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    if !LICENSE_PLATE_RE.is_match(value) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de IBAN
pub fn validate_iban(value: &str) -> Result<(), ValidationError> {
    if !IBAN_RE.is_match(value) {
        let mut error = ValidationError::new("iban");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de código SWIFT
pub fn validate_swift_code(value: &str) -> Result<(), ValidationError> {
    if !SWIFT_RE.is_match(value) {
        let mut error = ValidationError::new("swift_code");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar contraseña fuerte: mínimo 8 caracteres con mayúscula,
/// minúscula, dígito y carácter especial
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    let strong = value.len() >= 8
        && PASSWORD_LOWER_RE.is_match(value)
        && PASSWORD_UPPER_RE.is_match(value)
        && PASSWORD_DIGIT_RE.is_match(value)
        && PASSWORD_SPECIAL_RE.is_match(value);

    if !strong {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "Password must be at least 8 characters long and include at least one uppercase letter, one lowercase letter, one number, and one special character."
                .into(),
        );
        return Err(error);
    }
    Ok(())
}

/// Validar que page y limit sean positivos
pub fn validate_pagination(page: i64, limit: i64) -> Result<(), crate::utils::errors::AppError> {
    if page <= 0 || limit <= 0 {
        return Err(crate::utils::errors::AppError::BadRequest(
            "Page and limit must be positive numbers.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("test@").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+971500000000").is_ok());
        assert!(validate_phone("0501234567").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("no-es-telefono").is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("AB-1234").is_ok());
        assert!(validate_license_plate("DXB99").is_ok());
        assert!(validate_license_plate("a").is_err());
        assert!(validate_license_plate("ABCDEFGHIJKL").is_err());
        assert!(validate_license_plate("ab-1234").is_err());
    }

    #[test]
    fn test_validate_iban_y_swift() {
        assert!(validate_iban("AE070331234567890123456").is_ok());
        assert!(validate_iban("abc").is_err());
        assert!(validate_swift_code("EBILAEAD").is_ok());
        assert!(validate_swift_code("EBILAEADXXX").is_ok());
        assert!(validate_swift_code("EB1").is_err());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("Passw0rd!").is_ok());
        assert!(validate_password_strength("password").is_err());
        assert!(validate_password_strength("PASSWORD1!").is_err());
        assert!(validate_password_strength("Pass1!").is_err());
    }

    #[test]
    fn test_validate_pagination() {
        assert!(validate_pagination(1, 10).is_ok());
        assert!(validate_pagination(0, 10).is_err());
        assert!(validate_pagination(1, -1).is_err());
    }
}
