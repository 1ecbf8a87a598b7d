use tracing::{info, warn};

use crate::error::AppError;
use crate::model::employee::{Employee, EmployeeDetail, EmployeeForm, NewEmployee};
use crate::store::{Storage, StoreError};
use crate::utils::pagination::{PAGE_SIZE, Page, offset};
use crate::utils::validation::{rejected, require, single, validate_form};

const DUPLICATE_NIK: &str = "NIK already exists";

pub async fn list<S: Storage>(store: &mut S, page: u32) -> Result<Page<EmployeeDetail>, AppError> {
    let total = store.count_employees().await?;
    let data = store.list_employees(PAGE_SIZE, offset(page)).await?;
    Ok(Page {
        data,
        page,
        per_page: PAGE_SIZE,
        total,
    })
}

pub async fn lookup<S: Storage>(store: &mut S) -> Result<Vec<EmployeeDetail>, AppError> {
    Ok(store.employees_by_name().await?)
}

pub async fn get<S: Storage>(store: &mut S, id: u64) -> Result<EmployeeDetail, AppError> {
    store
        .find_employee_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

/// Field checks shared by create and edit; returns the department id.
async fn check_form<S: Storage>(
    store: &mut S,
    form: &EmployeeForm,
    current: Option<u64>,
) -> Result<u64, AppError> {
    validate_form(form)?;
    let department_id = require(
        form,
        form.department_id,
        "department_id",
        "Department is required",
    )?;

    if store.nik_taken(&form.nik, current).await? {
        return Err(rejected(form, single("nik", DUPLICATE_NIK)));
    }
    if !store.department_exists(department_id).await? {
        return Err(rejected(form, single("department_id", "Department not found")));
    }
    Ok(department_id)
}

pub async fn create<S: Storage>(store: &mut S, form: EmployeeForm) -> Result<Employee, AppError> {
    let department_id = check_form(store, &form, None).await?;

    let new = NewEmployee {
        nik: form.nik.clone(),
        name: form.name.clone(),
        department_id,
        position: form.position.clone(),
        email: form.email.clone(),
        has_laptop: form.has_laptop,
        has_meal_allowance: form.has_meal_allowance,
        created_at: super::now(),
    };

    let employee = match store.insert_employee(&new).await {
        Ok(employee) => employee,
        Err(StoreError::DuplicateNik) => {
            warn!(nik = %form.nik, "NIK claimed concurrently");
            return Err(rejected(&form, single("nik", DUPLICATE_NIK)));
        }
        Err(e) => return Err(e.into()),
    };

    info!(employee_id = employee.id, nik = %employee.nik, "Employee created");
    Ok(employee)
}

pub async fn update<S: Storage>(
    store: &mut S,
    id: u64,
    form: EmployeeForm,
) -> Result<Employee, AppError> {
    let mut employee = store
        .find_employee(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let department_id = check_form(store, &form, Some(id)).await?;

    employee.nik = form.nik.clone();
    employee.name = form.name.clone();
    employee.department_id = department_id;
    employee.position = form.position.clone();
    employee.email = form.email.clone();
    employee.has_laptop = form.has_laptop;
    employee.has_meal_allowance = form.has_meal_allowance;
    employee.modified_at = Some(super::now());

    match store.update_employee(&employee).await {
        Ok(()) => {}
        Err(StoreError::DuplicateNik) => {
            warn!(employee_id = id, nik = %form.nik, "NIK claimed concurrently");
            return Err(rejected(&form, single("nik", DUPLICATE_NIK)));
        }
        Err(e) => return Err(e.into()),
    }

    info!(employee_id = id, "Employee updated");
    Ok(employee)
}

/// Removes an employee unless overtime entries still reference it.
pub async fn delete<S: Storage>(store: &mut S, id: u64) -> Result<(), AppError> {
    if store.find_employee(id).await?.is_none() {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    if store.employee_has_overtime(id).await? {
        return Err(AppError::Conflict(
            "Cannot delete employee with overtime entry".to_string(),
        ));
    }

    if !store.delete_employee(id).await? {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    info!(employee_id = id, "Employee deleted");
    Ok(())
}
