use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{
    department::Department,
    employee::{Employee, EmployeeDetail, NewEmployee},
    overtime::{NewOvertime, Overtime, OvertimeDetail},
};

pub mod mysql;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique index on `employees.nik` rejected the write.
    #[error("NIK already exists")]
    DuplicateNik,

    #[error("Storage command exceeded {0:?}")]
    Timeout(Duration),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle registered as app data; opens one session per request.
#[async_trait]
pub trait SessionSource: Send + Sync + 'static {
    type Session: Storage + 'static;

    async fn session(&self) -> StoreResult<Self::Session>;
}

/// One unit of work against the relational store, scoped to a single request.
#[async_trait]
pub trait Storage: Send {
    async fn count_departments(&mut self) -> StoreResult<i64>;
    async fn list_departments(&mut self) -> StoreResult<Vec<Department>>;
    async fn department_exists(&mut self, id: u64) -> StoreResult<bool>;

    async fn count_employees(&mut self) -> StoreResult<i64>;
    /// Newest-created first, joined with department.
    async fn list_employees(&mut self, limit: u32, offset: u64)
    -> StoreResult<Vec<EmployeeDetail>>;
    /// Every employee ordered by name, joined with department.
    async fn employees_by_name(&mut self) -> StoreResult<Vec<EmployeeDetail>>;
    async fn find_employee(&mut self, id: u64) -> StoreResult<Option<Employee>>;
    async fn find_employee_detail(&mut self, id: u64) -> StoreResult<Option<EmployeeDetail>>;
    /// True when another employee (other than `exclude`) already holds `nik`.
    async fn nik_taken(&mut self, nik: &str, exclude: Option<u64>) -> StoreResult<bool>;
    async fn insert_employee(&mut self, employee: &NewEmployee) -> StoreResult<Employee>;
    async fn update_employee(&mut self, employee: &Employee) -> StoreResult<()>;
    async fn delete_employee(&mut self, id: u64) -> StoreResult<bool>;
    async fn employee_has_overtime(&mut self, employee_id: u64) -> StoreResult<bool>;

    async fn count_overtimes(&mut self) -> StoreResult<i64>;
    /// Latest overtime date first, joined with employee and department.
    async fn list_overtimes(&mut self, limit: u32, offset: u64)
    -> StoreResult<Vec<OvertimeDetail>>;
    async fn find_overtime(&mut self, id: u64) -> StoreResult<Option<Overtime>>;
    async fn find_overtime_detail(&mut self, id: u64) -> StoreResult<Option<OvertimeDetail>>;
    async fn insert_overtime(&mut self, overtime: &NewOvertime) -> StoreResult<Overtime>;
    async fn update_overtime(&mut self, overtime: &Overtime) -> StoreResult<()>;
    async fn delete_overtime(&mut self, id: u64) -> StoreResult<bool>;
    /// Sum of actual hours over all entries, zero when there are none.
    async fn total_actual_hours(&mut self) -> StoreResult<Decimal>;
}
