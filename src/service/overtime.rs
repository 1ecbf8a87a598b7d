use chrono::{NaiveDate, NaiveDateTime, SubsecRound};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::AppError;
use crate::model::overtime::{
    MAX_OT_HOURS, NewOvertime, Overtime, OvertimeDetail, OvertimeForm, actual_hours,
    calculated_hours, exceeds_cap,
};
use crate::store::Storage;
use crate::utils::pagination::{PAGE_SIZE, Page, offset};
use crate::utils::validation::{rejected, require, single, validate_form};

/// A form that passed every check, with hours already derived.
struct CheckedEntry {
    employee_id: u64,
    overtime_date: NaiveDate,
    time_start: NaiveDateTime,
    time_finish: NaiveDateTime,
    actual_ot_hours: Decimal,
    calculated_ot_hours: Decimal,
    description: Option<String>,
}

pub async fn list<S: Storage>(store: &mut S, page: u32) -> Result<Page<OvertimeDetail>, AppError> {
    let total = store.count_overtimes().await?;
    let data = store.list_overtimes(PAGE_SIZE, offset(page)).await?;
    Ok(Page {
        data,
        page,
        per_page: PAGE_SIZE,
        total,
    })
}

pub async fn get<S: Storage>(store: &mut S, id: u64) -> Result<OvertimeDetail, AppError> {
    store
        .find_overtime_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Overtime not found".to_string()))
}

async fn check_form<S: Storage>(store: &mut S, form: &OvertimeForm) -> Result<CheckedEntry, AppError> {
    validate_form(form)?;
    let employee_id = require(form, form.employee_id, "employee_id", "Employee is required")?;
    let overtime_date = require(
        form,
        form.overtime_date,
        "overtime_date",
        "Overtime date is required",
    )?;
    // DATETIME keeps whole seconds; hours are derived from what gets stored.
    let time_start = require(form, form.time_start, "time_start", "Start time is required")?
        .trunc_subsecs(0);
    let time_finish = require(form, form.time_finish, "time_finish", "Finish time is required")?
        .trunc_subsecs(0);

    if time_finish <= time_start {
        return Err(rejected(
            form,
            single("time_finish", "Finish time must be after start time"),
        ));
    }

    let actual = actual_hours(time_start, time_finish);
    if exceeds_cap(actual) {
        return Err(rejected(
            form,
            single(
                "actual_ot_hours",
                format!("Maximum OT hours is {MAX_OT_HOURS} hours"),
            ),
        ));
    }

    if store.find_employee(employee_id).await?.is_none() {
        return Err(rejected(form, single("employee_id", "Employee not found")));
    }

    Ok(CheckedEntry {
        employee_id,
        overtime_date,
        time_start,
        time_finish,
        actual_ot_hours: actual,
        calculated_ot_hours: calculated_hours(actual),
        description: form
            .description
            .clone()
            .filter(|d| !d.trim().is_empty()),
    })
}

pub async fn create<S: Storage>(store: &mut S, form: OvertimeForm) -> Result<Overtime, AppError> {
    let entry = check_form(store, &form).await?;

    let new = NewOvertime {
        employee_id: entry.employee_id,
        overtime_date: entry.overtime_date,
        time_start: entry.time_start,
        time_finish: entry.time_finish,
        actual_ot_hours: entry.actual_ot_hours,
        calculated_ot_hours: entry.calculated_ot_hours,
        description: entry.description,
        created_at: super::now(),
    };
    let overtime = store.insert_overtime(&new).await?;

    info!(
        overtime_id = overtime.id,
        employee_id = overtime.employee_id,
        actual_ot_hours = %overtime.actual_ot_hours,
        "Overtime created"
    );
    Ok(overtime)
}

/// Re-derives the hours from the submitted times even when they did not change.
pub async fn update<S: Storage>(
    store: &mut S,
    id: u64,
    form: OvertimeForm,
) -> Result<Overtime, AppError> {
    let mut overtime = store
        .find_overtime(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Overtime not found".to_string()))?;

    let entry = check_form(store, &form).await?;

    overtime.employee_id = entry.employee_id;
    overtime.overtime_date = entry.overtime_date;
    overtime.time_start = entry.time_start;
    overtime.time_finish = entry.time_finish;
    overtime.actual_ot_hours = entry.actual_ot_hours;
    overtime.calculated_ot_hours = entry.calculated_ot_hours;
    overtime.description = entry.description;
    overtime.modified_at = Some(super::now());

    store.update_overtime(&overtime).await?;

    info!(overtime_id = id, actual_ot_hours = %overtime.actual_ot_hours, "Overtime updated");
    Ok(overtime)
}

pub async fn delete<S: Storage>(store: &mut S, id: u64) -> Result<(), AppError> {
    if !store.delete_overtime(id).await? {
        return Err(AppError::NotFound("Overtime not found".to_string()));
    }

    info!(overtime_id = id, "Overtime deleted");
    Ok(())
}
