use async_trait::async_trait;
use sqlx::postgres::PgDatabaseError;
use std::fmt;

use crate::models::department::Department;
use crate::models::employee::{Employee, EmployeeInput, EmployeeWithDepartment};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Failure reported by the store. `code` is the SQLSTATE and `hint` the
/// server-provided hint, when the backend supplies them.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    pub message: String,
    pub code: Option<String>,
    pub hint: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            hint: None,
        }
    }

    #[cfg(test)]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let hint = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.hint())
                    .map(str::to_string);
                StoreError {
                    message: db_err.message().to_string(),
                    code: db_err.code().map(|code| code.into_owned()),
                    hint,
                }
            }
            _ => StoreError::new(err.to_string()),
        }
    }
}

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Left join on departments, ordered by employee id.
    async fn list_employees(&self) -> Result<Vec<EmployeeWithDepartment>, StoreError>;

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError>;

    async fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, StoreError>;

    /// Returns `None` when no row has the given id.
    async fn update_employee(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError>;

    async fn delete_employee(&self, id: i32) -> Result<u64, StoreError>;

    /// No statement may be issued afterward.
    async fn close(&self);
}
