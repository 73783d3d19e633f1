//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{DateTime, Utc};

use crate::utils::errors::AppError;

/// Validar y convertir string RFC3339 a instante UTC
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AppError::Validation(format!(
                "'{}' is not a valid RFC3339 timestamp",
                value
            ))
        })
}

/// Validar y convertir un instante opcional
pub fn parse_optional_instant(value: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    match value {
        Some(v) => parse_instant(v).map(Some),
        None => Ok(None),
    }
}

/// Validar que un string no esté vacío
pub fn require_not_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("'{}' is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_instant_accepts_rfc3339() {
        let dt = parse_instant("2025-03-01T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-01T10:30:00+00:00");
    }

    #[test]
    fn parse_instant_rejects_garbage() {
        assert!(parse_instant("ayer por la tarde").is_err());
        assert!(parse_instant("2025-13-01T00:00:00Z").is_err());
    }

    #[test]
    fn require_not_empty_rejects_blank() {
        assert!(require_not_empty("  ", "name").is_err());
        assert!(require_not_empty("Amritsar", "name").is_ok());
    }
}
