use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::model::{employee::EmployeeForm, overtime::OvertimeForm};

pub fn employee_form(nik: &str, department_id: u64) -> EmployeeForm {
    EmployeeForm {
        nik: nik.to_string(),
        name: format!("Employee {nik}"),
        department_id: Some(department_id),
        position: "Site Engineer".to_string(),
        email: format!("{nik}@company.com"),
        has_laptop: true,
        has_meal_allowance: false,
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).expect("valid date")
}

pub fn evening(d: u32) -> NaiveDateTime {
    day(d).and_hms_opt(17, 0, 0).expect("valid time")
}

/// Overtime on January `d`, starting 17:00 and lasting `minutes`.
pub fn overtime_form(employee_id: u64, d: u32, minutes: i64) -> OvertimeForm {
    let start = evening(d);
    OvertimeForm {
        employee_id: Some(employee_id),
        overtime_date: Some(day(d)),
        time_start: Some(start),
        time_finish: Some(start + Duration::minutes(minutes)),
        description: Some("Monthly closing".to_string()),
    }
}
