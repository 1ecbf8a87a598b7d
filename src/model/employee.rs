use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::model::department::Department;
use crate::utils::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "nik": "3174012345",
        "name": "Budi Santoso",
        "department_id": 2,
        "position": "Site Engineer",
        "email": "budi.santoso@company.com",
        "has_laptop": true,
        "has_meal_allowance": false,
        "created_at": "2026-01-05T08:30:00",
        "modified_at": null
    })
)]
pub struct Employee {
    pub id: u64,
    pub nik: String,
    pub name: String,
    pub department_id: u64,
    pub position: String,
    pub email: String,
    pub has_laptop: bool,
    pub has_meal_allowance: bool,
    pub created_at: NaiveDateTime,
    #[schema(nullable = true)]
    pub modified_at: Option<NaiveDateTime>,
}

/// An employee row that has not been persisted yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub nik: String,
    pub name: String,
    pub department_id: u64,
    pub position: String,
    pub email: String,
    pub has_laptop: bool,
    pub has_meal_allowance: bool,
    pub created_at: NaiveDateTime,
}

impl NewEmployee {
    pub fn into_employee(self, id: u64) -> Employee {
        Employee {
            id,
            nik: self.nik,
            name: self.name,
            department_id: self.department_id,
            position: self.position,
            email: self.email,
            has_laptop: self.has_laptop,
            has_meal_allowance: self.has_meal_allowance,
            created_at: self.created_at,
            modified_at: None,
        }
    }
}

/// Employee joined with its department, as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub department: Department,
}

/// The slice of an employee carried along with overtime rows.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeSummary {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "3174012345")]
    pub nik: String,
    #[schema(example = "Budi Santoso")]
    pub name: String,
    pub department: Department,
}

/// Create/edit payload for an employee.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EmployeeForm {
    #[schema(example = "3174012345")]
    #[validate(
        custom(function = "not_blank", message = "NIK is required"),
        length(max = 20, message = "NIK must not exceed 20 characters")
    )]
    #[serde(default)]
    pub nik: String,

    #[schema(example = "Budi Santoso")]
    #[validate(
        custom(function = "not_blank", message = "Employee name is required"),
        length(max = 150, message = "Employee name must not exceed 150 characters")
    )]
    #[serde(default)]
    pub name: String,

    #[schema(example = 2)]
    #[validate(required(message = "Department is required"))]
    pub department_id: Option<u64>,

    #[schema(example = "Site Engineer")]
    #[validate(
        custom(function = "not_blank", message = "Position is required"),
        length(max = 50, message = "Position must not exceed 50 characters")
    )]
    #[serde(default)]
    pub position: String,

    #[schema(example = "budi.santoso@company.com", format = "email")]
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Invalid email address")
    )]
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub has_laptop: bool,

    #[serde(default)]
    pub has_meal_allowance: bool,
}
