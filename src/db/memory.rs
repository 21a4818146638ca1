use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{DirectoryStore, StoreError};
use crate::models::department::Department;
use crate::models::employee::{Employee, EmployeeInput, EmployeeWithDepartment};

const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Default)]
struct Tables {
    departments: Vec<Department>,
    employees: Vec<Employee>,
    next_employee_id: i32,
    closed: bool,
    failure: Option<StoreError>,
}

/// In-process stand-in for PostgreSQL. Mirrors the referential constraint
/// on `employees.department_id` and store-generated ids and timestamps.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_employee_id: 1,
                ..Tables::default()
            }),
        }
    }

    pub fn with_departments(names: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.try_write().expect("fresh store is unlocked");
            tables.departments = names
                .iter()
                .enumerate()
                .map(|(i, name)| Department {
                    id: i as i32 + 1,
                    name: name.to_string(),
                })
                .collect();
        }
        store
    }

    /// Inserts a row bypassing the foreign key check, to model a dangling reference.
    pub async fn insert_unchecked(&self, name: &str, department_id: i32) -> Employee {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let employee = Employee {
            id: tables.next_employee_id,
            name: name.to_string(),
            department_id,
            created_at: now,
            updated_at: now,
        };
        tables.next_employee_id += 1;
        tables.employees.push(employee.clone());
        employee
    }

    /// Makes every following operation fail with `err`.
    pub async fn fail_with(&self, err: StoreError) {
        self.tables.write().await.failure = Some(err);
    }

    pub async fn employee_count(&self) -> usize {
        self.tables.read().await.employees.len()
    }

    pub async fn is_closed(&self) -> bool {
        self.tables.read().await.closed
    }
}

impl Tables {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::new("store connection is closed"));
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn check_department(&self, department_id: i32) -> Result<(), StoreError> {
        if self.departments.iter().any(|d| d.id == department_id) {
            Ok(())
        } else {
            Err(StoreError::new(format!(
                "insert or update on table \"employees\" violates foreign key constraint \
                 (department_id)=({}) is not present in table \"departments\"",
                department_id
            ))
            .with_code(FOREIGN_KEY_VIOLATION))
        }
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn list_employees(&self) -> Result<Vec<EmployeeWithDepartment>, StoreError> {
        let tables = self.tables.read().await;
        tables.check_available()?;

        let mut rows: Vec<EmployeeWithDepartment> = tables
            .employees
            .iter()
            .map(|e| {
                let department = tables.departments.iter().find(|d| d.id == e.department_id);
                EmployeeWithDepartment {
                    id: e.id,
                    name: e.name.clone(),
                    created_at: e.created_at,
                    department_id: department.map(|d| d.id),
                    department_name: department.map(|d| d.name.clone()),
                }
            })
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let tables = self.tables.read().await;
        tables.check_available()?;

        let mut rows = tables.departments.clone();
        rows.sort_by_key(|d| d.id);
        Ok(rows)
    }

    async fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_available()?;
        tables.check_department(input.department_id)?;

        let now = Utc::now();
        let employee = Employee {
            id: tables.next_employee_id,
            name: input.name.clone(),
            department_id: input.department_id,
            created_at: now,
            updated_at: now,
        };
        tables.next_employee_id += 1;
        tables.employees.push(employee.clone());
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_available()?;

        if !tables.employees.iter().any(|e| e.id == id) {
            return Ok(None);
        }
        tables.check_department(input.department_id)?;

        let now = Utc::now();
        let updated = tables.employees.iter_mut().find(|e| e.id == id).map(|e| {
            e.name = input.name.clone();
            e.department_id = input.department_id;
            e.updated_at = now;
            e.clone()
        });
        Ok(updated)
    }

    async fn delete_employee(&self, id: i32) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_available()?;

        let before = tables.employees.len();
        tables.employees.retain(|e| e.id != id);
        Ok((before - tables.employees.len()) as u64)
    }

    async fn close(&self) {
        self.tables.write().await.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, department_id: i32) -> EmployeeInput {
        EmployeeInput {
            name: name.to_string(),
            department_id,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryStore::with_departments(&["Engineering"]);

        let first = store.create_employee(&input("Ada", 1)).await.unwrap();
        let second = store.create_employee(&input("Grace", 1)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_department() {
        let store = MemoryStore::with_departments(&["Engineering"]);

        let err = store.create_employee(&input("Ada", 9)).await.unwrap_err();

        assert_eq!(err.code.as_deref(), Some(FOREIGN_KEY_VIOLATION));
        assert_eq!(store.employee_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_keeps_dangling_reference() {
        let store = MemoryStore::with_departments(&["Engineering"]);
        store.create_employee(&input("Ada", 1)).await.unwrap();
        store.insert_unchecked("Orphan", 42).await;

        let rows = store.list_employees().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].department_name.as_deref(), Some("Engineering"));
        assert_eq!(rows[1].department_id, None);
        assert_eq!(rows[1].department_name, None);
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_none() {
        let store = MemoryStore::with_departments(&["Engineering"]);

        let updated = store.update_employee(7, &input("Ada", 1)).await.unwrap();

        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let store = MemoryStore::with_departments(&["Engineering"]);
        let ada = store.create_employee(&input("Ada", 1)).await.unwrap();

        assert_eq!(store.delete_employee(ada.id).await.unwrap(), 1);
        assert_eq!(store.delete_employee(ada.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_store_rejects_queries() {
        let store = MemoryStore::with_departments(&["Engineering"]);
        store.close().await;

        assert!(store.is_closed().await);
        assert!(store.list_departments().await.is_err());
    }
}
