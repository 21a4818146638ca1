use serde::{Deserialize, Serialize};
use chrono::Utc;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub department_id: i32,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

// Department fields are None when the reference is dangling.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeWithDepartment {
    pub id: i32,
    pub name: String,
    pub created_at: chrono::DateTime<Utc>,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeInput {
    pub name: String,
    pub department_id: i32,
}
