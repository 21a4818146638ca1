use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::db::{DirectoryStore, StoreError};
use crate::errors::AppError;
use crate::models::employee::EmployeeInput;
use crate::utils::validation::validate_payload;

const REQUIRED_FIELDS: &str = "Name and department_id are required";

// Fields are optional so a missing one fails validation, not body parsing.
#[derive(Deserialize, Validate)]
pub struct EmployeePayload {
    #[validate(required, length(min = 1))]
    name: Option<String>,
    #[validate(required)]
    department_id: Option<i32>,
}

impl EmployeePayload {
    fn into_input(self) -> Result<EmployeeInput, AppError> {
        validate_payload(&self, REQUIRED_FIELDS)?;
        // Zero counts as absent; any other id goes to the store, which owns the FK check.
        match (self.name, self.department_id) {
            (Some(name), Some(department_id)) if department_id != 0 => {
                Ok(EmployeeInput { name, department_id })
            }
            _ => Err(AppError::BadRequest(REQUIRED_FIELDS.to_string())),
        }
    }
}

/// An id the store cannot take as an integer is a failure of the operation itself.
fn parse_employee_id(raw: &str, failure: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| {
        let err = StoreError::new(format!("invalid integer value for employee id: {:?}", raw));
        AppError::store(failure, &err)
    })
}

pub async fn get_employees(
    store: web::Data<dyn DirectoryStore>,
) -> Result<HttpResponse, actix_web::Error> {
    log::info!("Attempting to fetch employees...");

    let employees = store
        .list_employees()
        .await
        .map_err(|err| AppError::store("Failed to fetch employees", &err))?;

    // An empty table usually means the seed step was skipped.
    if employees.is_empty() {
        log::warn!("Query succeeded but no employees found");
        return Err(AppError::NotFound {
            error: "No employees found".to_string(),
            solution: Some("Seed the database with sample data".to_string()),
        }
        .into());
    }

    log::info!("Fetched {} employees successfully", employees.len());
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn create_employee(
    store: web::Data<dyn DirectoryStore>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, actix_web::Error> {
    let input = payload.into_inner().into_input()?;

    let employee = store
        .create_employee(&input)
        .await
        .map_err(|err| AppError::store("Failed to create employee", &err))?;

    Ok(HttpResponse::Created().json(employee))
}

pub async fn update_employee(
    store: web::Data<dyn DirectoryStore>,
    employee_id: web::Path<String>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, actix_web::Error> {
    let input = payload.into_inner().into_input()?;
    let employee_id = parse_employee_id(&employee_id, "Failed to update employee")?;

    let employee = store
        .update_employee(employee_id, &input)
        .await
        .map_err(|err| AppError::store("Failed to update employee", &err))?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    store: web::Data<dyn DirectoryStore>,
    employee_id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let employee_id = parse_employee_id(&employee_id, "Failed to delete employee")?;

    let deleted = store
        .delete_employee(employee_id)
        .await
        .map_err(|err| AppError::store("Failed to delete employee", &err))?;

    if deleted == 0 {
        return Err(AppError::not_found("Employee not found").into());
    }

    Ok(HttpResponse::NoContent().finish())
}
