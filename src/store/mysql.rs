use std::future::Future;
use std::time::Duration;

use actix_web::rt::time::timeout;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, pool::PoolConnection};
use tracing::debug;

use crate::model::{
    department::Department,
    employee::{Employee, EmployeeDetail, EmployeeSummary, NewEmployee},
    overtime::{NewOvertime, Overtime, OvertimeDetail},
};
use crate::store::{SessionSource, Storage, StoreError, StoreResult};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    command_timeout: Duration,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool, command_timeout: Duration) -> Self {
        Self {
            pool,
            command_timeout,
        }
    }
}

#[async_trait]
impl SessionSource for MySqlStore {
    type Session = MySqlSession;

    /// Checks a connection out of the pool. It goes back when the session drops.
    async fn session(&self) -> StoreResult<MySqlSession> {
        let conn = bounded(self.command_timeout, self.pool.acquire()).await?;
        Ok(MySqlSession {
            conn,
            command_timeout: self.command_timeout,
        })
    }
}

pub struct MySqlSession {
    conn: PoolConnection<MySql>,
    command_timeout: Duration,
}

async fn bounded<T, F>(limit: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

fn unique_violation(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateNik;
        }
    }
    StoreError::Database(e)
}

const EMPLOYEE_DETAIL_SELECT: &str = r#"
    SELECT
        e.id, e.nik, e.name, e.department_id, e.position, e.email,
        e.has_laptop, e.has_meal_allowance, e.created_at, e.modified_at,
        d.name AS department_name
    FROM employees e
    JOIN departments d ON d.id = e.department_id
"#;

const OVERTIME_DETAIL_SELECT: &str = r#"
    SELECT
        o.id, o.employee_id, o.overtime_date, o.time_start, o.time_finish,
        o.actual_ot_hours, o.calculated_ot_hours, o.description,
        o.created_at, o.modified_at,
        e.nik AS employee_nik, e.name AS employee_name,
        e.department_id, d.name AS department_name
    FROM overtimes o
    JOIN employees e ON e.id = o.employee_id
    JOIN departments d ON d.id = e.department_id
"#;

#[derive(sqlx::FromRow)]
struct EmployeeDetailRow {
    #[sqlx(flatten)]
    employee: Employee,
    department_name: String,
}

impl From<EmployeeDetailRow> for EmployeeDetail {
    fn from(row: EmployeeDetailRow) -> Self {
        let department = Department {
            id: row.employee.department_id,
            name: row.department_name,
        };
        Self {
            employee: row.employee,
            department,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OvertimeDetailRow {
    #[sqlx(flatten)]
    overtime: Overtime,
    employee_nik: String,
    employee_name: String,
    department_id: u64,
    department_name: String,
}

impl From<OvertimeDetailRow> for OvertimeDetail {
    fn from(row: OvertimeDetailRow) -> Self {
        let employee = EmployeeSummary {
            id: row.overtime.employee_id,
            nik: row.employee_nik,
            name: row.employee_name,
            department: Department {
                id: row.department_id,
                name: row.department_name,
            },
        };
        Self {
            overtime: row.overtime,
            employee,
        }
    }
}

#[async_trait]
impl Storage for MySqlSession {
    async fn count_departments(&mut self) -> StoreResult<i64> {
        let limit = self.command_timeout;
        bounded(
            limit,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments")
                .fetch_one(&mut *self.conn),
        )
        .await
    }

    async fn list_departments(&mut self) -> StoreResult<Vec<Department>> {
        let limit = self.command_timeout;
        bounded(
            limit,
            sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
                .fetch_all(&mut *self.conn),
        )
        .await
    }

    async fn department_exists(&mut self, id: u64) -> StoreResult<bool> {
        let limit = self.command_timeout;
        let count = bounded(
            limit,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments WHERE id = ?")
                .bind(id)
                .fetch_one(&mut *self.conn),
        )
        .await?;
        Ok(count > 0)
    }

    async fn count_employees(&mut self) -> StoreResult<i64> {
        let limit = self.command_timeout;
        bounded(
            limit,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
                .fetch_one(&mut *self.conn),
        )
        .await
    }

    async fn list_employees(
        &mut self,
        limit: u32,
        offset: u64,
    ) -> StoreResult<Vec<EmployeeDetail>> {
        let sql = format!(
            "{EMPLOYEE_DETAIL_SELECT} ORDER BY e.created_at DESC, e.id DESC LIMIT ? OFFSET ?"
        );
        debug!(sql = %sql, limit, offset, "Fetching employees");

        let ceiling = self.command_timeout;
        let rows = bounded(
            ceiling,
            sqlx::query_as::<_, EmployeeDetailRow>(&sql)
                .bind(limit as i64)
                .bind(offset as i64)
                .fetch_all(&mut *self.conn),
        )
        .await?;
        Ok(rows.into_iter().map(EmployeeDetail::from).collect())
    }

    async fn employees_by_name(&mut self) -> StoreResult<Vec<EmployeeDetail>> {
        let sql = format!("{EMPLOYEE_DETAIL_SELECT} ORDER BY e.name");
        let limit = self.command_timeout;
        let rows = bounded(
            limit,
            sqlx::query_as::<_, EmployeeDetailRow>(&sql).fetch_all(&mut *self.conn),
        )
        .await?;
        Ok(rows.into_iter().map(EmployeeDetail::from).collect())
    }

    async fn find_employee(&mut self, id: u64) -> StoreResult<Option<Employee>> {
        let limit = self.command_timeout;
        bounded(
            limit,
            sqlx::query_as::<_, Employee>(
                r#"
                SELECT id, nik, name, department_id, position, email,
                       has_laptop, has_meal_allowance, created_at, modified_at
                FROM employees
                WHERE id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(&mut *self.conn),
        )
        .await
    }

    async fn find_employee_detail(&mut self, id: u64) -> StoreResult<Option<EmployeeDetail>> {
        let sql = format!("{EMPLOYEE_DETAIL_SELECT} WHERE e.id = ?");
        let limit = self.command_timeout;
        let row = bounded(
            limit,
            sqlx::query_as::<_, EmployeeDetailRow>(&sql)
                .bind(id)
                .fetch_optional(&mut *self.conn),
        )
        .await?;
        Ok(row.map(EmployeeDetail::from))
    }

    async fn nik_taken(&mut self, nik: &str, exclude: Option<u64>) -> StoreResult<bool> {
        let limit = self.command_timeout;
        let count = match exclude {
            Some(id) => {
                bounded(
                    limit,
                    sqlx::query_scalar::<_, i64>(
                        "SELECT COUNT(*) FROM employees WHERE nik = ? AND id <> ?",
                    )
                    .bind(nik)
                    .bind(id)
                    .fetch_one(&mut *self.conn),
                )
                .await?
            }
            None => {
                bounded(
                    limit,
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE nik = ?")
                        .bind(nik)
                        .fetch_one(&mut *self.conn),
                )
                .await?
            }
        };
        Ok(count > 0)
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> StoreResult<Employee> {
        let limit = self.command_timeout;
        let result = timeout(
            limit,
            sqlx::query(
                r#"
                INSERT INTO employees
                (nik, name, department_id, position, email, has_laptop, has_meal_allowance, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&employee.nik)
            .bind(&employee.name)
            .bind(employee.department_id)
            .bind(&employee.position)
            .bind(&employee.email)
            .bind(employee.has_laptop)
            .bind(employee.has_meal_allowance)
            .bind(employee.created_at)
            .execute(&mut *self.conn),
        )
        .await
        .map_err(|_| StoreError::Timeout(limit))?
        .map_err(unique_violation)?;

        Ok(employee.clone().into_employee(result.last_insert_id()))
    }

    async fn update_employee(&mut self, employee: &Employee) -> StoreResult<()> {
        let limit = self.command_timeout;
        timeout(
            limit,
            sqlx::query(
                r#"
                UPDATE employees
                SET nik = ?, name = ?, department_id = ?, position = ?, email = ?,
                    has_laptop = ?, has_meal_allowance = ?, modified_at = ?
                WHERE id = ?
                "#,
            )
            .bind(&employee.nik)
            .bind(&employee.name)
            .bind(employee.department_id)
            .bind(&employee.position)
            .bind(&employee.email)
            .bind(employee.has_laptop)
            .bind(employee.has_meal_allowance)
            .bind(employee.modified_at)
            .bind(employee.id)
            .execute(&mut *self.conn),
        )
        .await
        .map_err(|_| StoreError::Timeout(limit))?
        .map_err(unique_violation)?;
        Ok(())
    }

    async fn delete_employee(&mut self, id: u64) -> StoreResult<bool> {
        let limit = self.command_timeout;
        let result = bounded(
            limit,
            sqlx::query("DELETE FROM employees WHERE id = ?")
                .bind(id)
                .execute(&mut *self.conn),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn employee_has_overtime(&mut self, employee_id: u64) -> StoreResult<bool> {
        let limit = self.command_timeout;
        let count = bounded(
            limit,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM overtimes WHERE employee_id = ?")
                .bind(employee_id)
                .fetch_one(&mut *self.conn),
        )
        .await?;
        Ok(count > 0)
    }

    async fn count_overtimes(&mut self) -> StoreResult<i64> {
        let limit = self.command_timeout;
        bounded(
            limit,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM overtimes")
                .fetch_one(&mut *self.conn),
        )
        .await
    }

    async fn list_overtimes(
        &mut self,
        limit: u32,
        offset: u64,
    ) -> StoreResult<Vec<OvertimeDetail>> {
        let sql = format!(
            "{OVERTIME_DETAIL_SELECT} ORDER BY o.overtime_date DESC, o.id DESC LIMIT ? OFFSET ?"
        );
        debug!(sql = %sql, limit, offset, "Fetching overtimes");

        let ceiling = self.command_timeout;
        let rows = bounded(
            ceiling,
            sqlx::query_as::<_, OvertimeDetailRow>(&sql)
                .bind(limit as i64)
                .bind(offset as i64)
                .fetch_all(&mut *self.conn),
        )
        .await?;
        Ok(rows.into_iter().map(OvertimeDetail::from).collect())
    }

    async fn find_overtime(&mut self, id: u64) -> StoreResult<Option<Overtime>> {
        let limit = self.command_timeout;
        bounded(
            limit,
            sqlx::query_as::<_, Overtime>(
                r#"
                SELECT id, employee_id, overtime_date, time_start, time_finish,
                       actual_ot_hours, calculated_ot_hours, description,
                       created_at, modified_at
                FROM overtimes
                WHERE id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(&mut *self.conn),
        )
        .await
    }

    async fn find_overtime_detail(&mut self, id: u64) -> StoreResult<Option<OvertimeDetail>> {
        let sql = format!("{OVERTIME_DETAIL_SELECT} WHERE o.id = ?");
        let limit = self.command_timeout;
        let row = bounded(
            limit,
            sqlx::query_as::<_, OvertimeDetailRow>(&sql)
                .bind(id)
                .fetch_optional(&mut *self.conn),
        )
        .await?;
        Ok(row.map(OvertimeDetail::from))
    }

    async fn insert_overtime(&mut self, overtime: &NewOvertime) -> StoreResult<Overtime> {
        let limit = self.command_timeout;
        let result = bounded(
            limit,
            sqlx::query(
                r#"
                INSERT INTO overtimes
                (employee_id, overtime_date, time_start, time_finish,
                 actual_ot_hours, calculated_ot_hours, description, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(overtime.employee_id)
            .bind(overtime.overtime_date)
            .bind(overtime.time_start)
            .bind(overtime.time_finish)
            .bind(overtime.actual_ot_hours)
            .bind(overtime.calculated_ot_hours)
            .bind(&overtime.description)
            .bind(overtime.created_at)
            .execute(&mut *self.conn),
        )
        .await?;

        Ok(overtime.clone().into_overtime(result.last_insert_id()))
    }

    async fn update_overtime(&mut self, overtime: &Overtime) -> StoreResult<()> {
        let limit = self.command_timeout;
        bounded(
            limit,
            sqlx::query(
                r#"
                UPDATE overtimes
                SET employee_id = ?, overtime_date = ?, time_start = ?, time_finish = ?,
                    actual_ot_hours = ?, calculated_ot_hours = ?, description = ?,
                    modified_at = ?
                WHERE id = ?
                "#,
            )
            .bind(overtime.employee_id)
            .bind(overtime.overtime_date)
            .bind(overtime.time_start)
            .bind(overtime.time_finish)
            .bind(overtime.actual_ot_hours)
            .bind(overtime.calculated_ot_hours)
            .bind(&overtime.description)
            .bind(overtime.modified_at)
            .bind(overtime.id)
            .execute(&mut *self.conn),
        )
        .await?;
        Ok(())
    }

    async fn delete_overtime(&mut self, id: u64) -> StoreResult<bool> {
        let limit = self.command_timeout;
        let result = bounded(
            limit,
            sqlx::query("DELETE FROM overtimes WHERE id = ?")
                .bind(id)
                .execute(&mut *self.conn),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn total_actual_hours(&mut self) -> StoreResult<Decimal> {
        let limit = self.command_timeout;
        let sum = bounded(
            limit,
            sqlx::query_scalar::<_, Option<Decimal>>(
                "SELECT SUM(actual_ot_hours) FROM overtimes",
            )
            .fetch_one(&mut *self.conn),
        )
        .await?;
        Ok(sum.unwrap_or(Decimal::ZERO))
    }
}
