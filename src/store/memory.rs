use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDateTime, SubsecRound};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{
    department::Department,
    employee::{Employee, EmployeeDetail, EmployeeSummary, NewEmployee},
    overtime::{HOURS_SCALE, NewOvertime, Overtime, OvertimeDetail},
};
use crate::store::{SessionSource, Storage, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    departments: Vec<Department>,
    employees: Vec<Employee>,
    overtimes: Vec<Overtime>,
    last_employee_id: u64,
    last_overtime_id: u64,
}

/// In-process stand-in for the MySQL store, used by service and route tests.
/// Clones share the same tables, so a clone works as a per-request session.
/// Writes go through the same column coercion MySQL applies (`DATETIME`
/// seconds, `DECIMAL(12, 6)` hours) and the unique index on `employees.nik`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    /// Every insert/update/delete fails with a database error.
    pub fail_writes: bool,
    /// `nik_taken` always answers false, as if a concurrent insert
    /// landed between the check and the write.
    pub stale_nik_lookup: bool,
}

fn column_time(t: NaiveDateTime) -> NaiveDateTime {
    t.round_subsecs(0)
}

fn column_hours(h: Decimal) -> Decimal {
    h.round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn stored_employee(e: &Employee) -> Employee {
    Employee {
        created_at: column_time(e.created_at),
        modified_at: e.modified_at.map(column_time),
        ..e.clone()
    }
}

fn stored_overtime(o: &Overtime) -> Overtime {
    Overtime {
        time_start: column_time(o.time_start),
        time_finish: column_time(o.time_finish),
        actual_ot_hours: column_hours(o.actual_ot_hours),
        calculated_ot_hours: column_hours(o.calculated_ot_hours),
        created_at: column_time(o.created_at),
        modified_at: o.modified_at.map(column_time),
        ..o.clone()
    }
}

impl Tables {
    fn department(&self, id: u64) -> Department {
        self.departments
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .unwrap_or(Department {
                id,
                name: String::new(),
            })
    }

    fn employee_detail(&self, employee: &Employee) -> EmployeeDetail {
        EmployeeDetail {
            employee: employee.clone(),
            department: self.department(employee.department_id),
        }
    }

    fn overtime_detail(&self, overtime: &Overtime) -> OvertimeDetail {
        let employee = self
            .employees
            .iter()
            .find(|e| e.id == overtime.employee_id)
            .map(|e| EmployeeSummary {
                id: e.id,
                nik: e.nik.clone(),
                name: e.name.clone(),
                department: self.department(e.department_id),
            })
            .unwrap_or(EmployeeSummary {
                id: overtime.employee_id,
                nik: String::new(),
                name: String::new(),
                department: self.department(0),
            });
        OvertimeDetail {
            overtime: overtime.clone(),
            employee,
        }
    }

    fn nik_conflicts(&self, nik: &str, exclude: Option<u64>) -> bool {
        self.employees
            .iter()
            .any(|e| e.nik == nik && Some(e.id) != exclude)
    }

    fn overtimes_by_date(&self) -> Vec<&Overtime> {
        let mut sorted: Vec<&Overtime> = self.overtimes.iter().collect();
        sorted.sort_by(|a, b| {
            b.overtime_date
                .cmp(&a.overtime_date)
                .then(b.id.cmp(&a.id))
        });
        sorted
    }
}

impl MemoryStore {
    pub fn with_departments(names: &[&str]) -> Self {
        let departments = names
            .iter()
            .zip(1u64..)
            .map(|(name, id)| Department {
                id,
                name: name.to_string(),
            })
            .collect();
        let tables = Tables {
            departments,
            ..Tables::default()
        };
        Self {
            tables: Arc::new(Mutex::new(tables)),
            ..Self::default()
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.tables().employees.clone()
    }

    pub fn overtimes(&self) -> Vec<Overtime> {
        self.tables().overtimes.clone()
    }

    fn write_guard(&self) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn page<T>(items: Vec<T>, limit: u32, offset: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl SessionSource for MemoryStore {
    type Session = MemoryStore;

    async fn session(&self) -> StoreResult<MemoryStore> {
        Ok(self.clone())
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn count_departments(&mut self) -> StoreResult<i64> {
        Ok(self.tables().departments.len() as i64)
    }

    async fn list_departments(&mut self) -> StoreResult<Vec<Department>> {
        let mut departments = self.tables().departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn department_exists(&mut self, id: u64) -> StoreResult<bool> {
        Ok(self.tables().departments.iter().any(|d| d.id == id))
    }

    async fn count_employees(&mut self) -> StoreResult<i64> {
        Ok(self.tables().employees.len() as i64)
    }

    async fn list_employees(
        &mut self,
        limit: u32,
        offset: u64,
    ) -> StoreResult<Vec<EmployeeDetail>> {
        let tables = self.tables();
        let mut sorted: Vec<&Employee> = tables.employees.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let details = sorted.into_iter().map(|e| tables.employee_detail(e)).collect();
        Ok(page(details, limit, offset))
    }

    async fn employees_by_name(&mut self) -> StoreResult<Vec<EmployeeDetail>> {
        let tables = self.tables();
        let mut sorted: Vec<&Employee> = tables.employees.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sorted.into_iter().map(|e| tables.employee_detail(e)).collect())
    }

    async fn find_employee(&mut self, id: u64) -> StoreResult<Option<Employee>> {
        Ok(self.tables().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_employee_detail(&mut self, id: u64) -> StoreResult<Option<EmployeeDetail>> {
        let tables = self.tables();
        Ok(tables
            .employees
            .iter()
            .find(|e| e.id == id)
            .map(|e| tables.employee_detail(e)))
    }

    async fn nik_taken(&mut self, nik: &str, exclude: Option<u64>) -> StoreResult<bool> {
        if self.stale_nik_lookup {
            return Ok(false);
        }
        Ok(self.tables().nik_conflicts(nik, exclude))
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> StoreResult<Employee> {
        self.write_guard()?;
        let mut tables = self.tables();
        if tables.nik_conflicts(&employee.nik, None) {
            return Err(StoreError::DuplicateNik);
        }
        tables.last_employee_id += 1;
        // Answer like the MySQL session: the submitted values plus the new id.
        let created = employee.clone().into_employee(tables.last_employee_id);
        tables.employees.push(stored_employee(&created));
        Ok(created)
    }

    async fn update_employee(&mut self, employee: &Employee) -> StoreResult<()> {
        self.write_guard()?;
        let mut tables = self.tables();
        if tables.nik_conflicts(&employee.nik, Some(employee.id)) {
            return Err(StoreError::DuplicateNik);
        }
        if let Some(slot) = tables.employees.iter_mut().find(|e| e.id == employee.id) {
            *slot = stored_employee(employee);
        }
        Ok(())
    }

    async fn delete_employee(&mut self, id: u64) -> StoreResult<bool> {
        self.write_guard()?;
        let mut tables = self.tables();
        let before = tables.employees.len();
        tables.employees.retain(|e| e.id != id);
        Ok(tables.employees.len() < before)
    }

    async fn employee_has_overtime(&mut self, employee_id: u64) -> StoreResult<bool> {
        Ok(self
            .tables()
            .overtimes
            .iter()
            .any(|o| o.employee_id == employee_id))
    }

    async fn count_overtimes(&mut self) -> StoreResult<i64> {
        Ok(self.tables().overtimes.len() as i64)
    }

    async fn list_overtimes(
        &mut self,
        limit: u32,
        offset: u64,
    ) -> StoreResult<Vec<OvertimeDetail>> {
        let tables = self.tables();
        let details = tables
            .overtimes_by_date()
            .into_iter()
            .map(|o| tables.overtime_detail(o))
            .collect();
        Ok(page(details, limit, offset))
    }

    async fn find_overtime(&mut self, id: u64) -> StoreResult<Option<Overtime>> {
        Ok(self.tables().overtimes.iter().find(|o| o.id == id).cloned())
    }

    async fn find_overtime_detail(&mut self, id: u64) -> StoreResult<Option<OvertimeDetail>> {
        let tables = self.tables();
        Ok(tables
            .overtimes
            .iter()
            .find(|o| o.id == id)
            .map(|o| tables.overtime_detail(o)))
    }

    async fn insert_overtime(&mut self, overtime: &NewOvertime) -> StoreResult<Overtime> {
        self.write_guard()?;
        let mut tables = self.tables();
        tables.last_overtime_id += 1;
        let created = overtime.clone().into_overtime(tables.last_overtime_id);
        tables.overtimes.push(stored_overtime(&created));
        Ok(created)
    }

    async fn update_overtime(&mut self, overtime: &Overtime) -> StoreResult<()> {
        self.write_guard()?;
        let mut tables = self.tables();
        if let Some(slot) = tables.overtimes.iter_mut().find(|o| o.id == overtime.id) {
            *slot = stored_overtime(overtime);
        }
        Ok(())
    }

    async fn delete_overtime(&mut self, id: u64) -> StoreResult<bool> {
        self.write_guard()?;
        let mut tables = self.tables();
        let before = tables.overtimes.len();
        tables.overtimes.retain(|o| o.id != id);
        Ok(tables.overtimes.len() < before)
    }

    async fn total_actual_hours(&mut self) -> StoreResult<Decimal> {
        Ok(self.tables().overtimes.iter().map(|o| o.actual_ot_hours).sum())
    }
}
