use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{DirectoryStore, StoreError};
use crate::config::Config;
use crate::models::department::Department;
use crate::models::employee::{Employee, EmployeeInput, EmployeeWithDepartment};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens the pool and verifies that a connection can be established.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DirectoryStore for PgStore {
    async fn list_employees(&self) -> Result<Vec<EmployeeWithDepartment>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeeWithDepartment>(
            r#"
            SELECT e.id, e.name, e.created_at,
                   d.id AS department_id, d.name AS department_name
            FROM employees e
            LEFT JOIN departments d ON e.department_id = d.id
            ORDER BY e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let rows = sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (name, department_id) VALUES ($1, $2) \
             RETURNING id, name, department_id, created_at, updated_at",
        )
        .bind(&input.name)
        .bind(input.department_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: i32,
        input: &EmployeeInput,
    ) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET name = $1, department_id = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $3
            RETURNING id, name, department_id, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.department_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn delete_employee(&self, id: i32) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
