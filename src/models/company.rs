//! Modelo de Company
//!
//! Empresas creadas por un owner; los empleados se unen con el `join_code`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

/// Company - mapea exactamente a la tabla companies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub join_code: String,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Company con los datos de su owner, para el listado de administración
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyWithOwner {
    pub id: Uuid,
    pub name: String,
    pub join_code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
}

/// Request para crear una nueva company
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: String,
}

/// Vista pública de una company (sin código de invitación)
#[derive(Debug, Clone, Serialize)]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_company_name_is_rejected() {
        let request = CreateCompanyRequest {
            name: "   ".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_company_serialization_skips_deleted_flag() {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Reparto Sur".to_string(),
            created_by: Uuid::new_v4(),
            join_code: "AbCd1234".to_string(),
            deleted: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&company).unwrap();
        assert!(json.get("deleted").is_none());
        assert_eq!(json["join_code"], "AbCd1234");

        let summary = serde_json::to_value(CompanySummary::from(company)).unwrap();
        assert!(summary.get("join_code").is_none());
    }
}
