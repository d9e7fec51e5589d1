//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas desde los `#[validate(custom = ...)]` de los requests.

use std::collections::HashSet;

use uuid::Uuid;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Validar mes del calendario (1-12)
pub fn validate_month(value: u32) -> Result<(), ValidationError> {
    if !(1..=12).contains(&value) {
        let mut error = ValidationError::new("month");
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Eliminar ids repetidos conservando el orden de llegada
pub fn dedupe_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Ruta norte").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_dedupe_ids_keeps_first_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(dedupe_ids(&[a, b, a, b, a]), vec![a, b]);
        assert!(dedupe_ids(&[]).is_empty());
    }
}
