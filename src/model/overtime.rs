use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::model::employee::EmployeeSummary;

/// Upper bound on the actual hours of a single overtime entry.
pub const MAX_OT_HOURS: u32 = 3;

/// Payable hours are the actual hours times this factor.
pub const PAY_MULTIPLIER: u32 = 2;

/// Decimal places of the hour columns (`DECIMAL(12, 6)`).
pub const HOURS_SCALE: u32 = 6;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Elapsed time between `start` and `finish` in hours, rounded half away from
/// zero to the column scale the way MySQL stores it. Negative when `finish`
/// precedes `start`.
pub fn actual_hours(start: NaiveDateTime, finish: NaiveDateTime) -> Decimal {
    let millis = (finish - start).num_milliseconds();
    (Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR))
        .round_dp_with_strategy(HOURS_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

pub fn calculated_hours(actual: Decimal) -> Decimal {
    (actual * Decimal::from(PAY_MULTIPLIER)).normalize()
}

pub fn exceeds_cap(actual: Decimal) -> bool {
    actual > Decimal::from(MAX_OT_HOURS)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 10,
        "employee_id": 1,
        "overtime_date": "2026-01-05",
        "time_start": "2026-01-05T17:00:00",
        "time_finish": "2026-01-05T19:15:00",
        "actual_ot_hours": "2.25",
        "calculated_ot_hours": "4.5",
        "description": "Monthly closing",
        "created_at": "2026-01-05T19:20:00",
        "modified_at": null
    })
)]
pub struct Overtime {
    pub id: u64,
    pub employee_id: u64,
    pub overtime_date: NaiveDate,
    pub time_start: NaiveDateTime,
    pub time_finish: NaiveDateTime,
    pub actual_ot_hours: Decimal,
    pub calculated_ot_hours: Decimal,
    #[schema(nullable = true)]
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    #[schema(nullable = true)]
    pub modified_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewOvertime {
    pub employee_id: u64,
    pub overtime_date: NaiveDate,
    pub time_start: NaiveDateTime,
    pub time_finish: NaiveDateTime,
    pub actual_ot_hours: Decimal,
    pub calculated_ot_hours: Decimal,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewOvertime {
    pub fn into_overtime(self, id: u64) -> Overtime {
        Overtime {
            id,
            employee_id: self.employee_id,
            overtime_date: self.overtime_date,
            time_start: self.time_start,
            time_finish: self.time_finish,
            actual_ot_hours: self.actual_ot_hours,
            calculated_ot_hours: self.calculated_ot_hours,
            description: self.description,
            created_at: self.created_at,
            modified_at: None,
        }
    }
}

/// Overtime joined with its employee and the employee's department.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OvertimeDetail {
    #[serde(flatten)]
    pub overtime: Overtime,
    pub employee: EmployeeSummary,
}

/// Create/edit payload for an overtime entry. Hours are derived, never accepted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OvertimeForm {
    #[schema(example = 1)]
    #[validate(required(message = "Employee is required"))]
    pub employee_id: Option<u64>,

    #[schema(example = "2026-01-05")]
    #[validate(required(message = "Overtime date is required"))]
    pub overtime_date: Option<NaiveDate>,

    #[schema(example = "2026-01-05T17:00:00")]
    #[validate(required(message = "Start time is required"))]
    pub time_start: Option<NaiveDateTime>,

    #[schema(example = "2026-01-05T19:15:00")]
    #[validate(required(message = "Finish time is required"))]
    pub time_finish: Option<NaiveDateTime>,

    #[schema(example = "Monthly closing", nullable = true)]
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn two_hours_fifteen_is_exact() {
        let actual = actual_hours(at(17, 0), at(19, 15));
        assert_eq!(actual, dec!(2.25));
        assert_eq!(calculated_hours(actual), dec!(4.50));
        assert!(!exceeds_cap(actual));
    }

    #[test]
    fn cap_is_inclusive() {
        assert!(!exceeds_cap(actual_hours(at(17, 0), at(20, 0))));
        assert!(exceeds_cap(actual_hours(at(17, 0), at(20, 1))));
    }

    #[test]
    fn fractional_hours_fit_the_column_scale() {
        let start = at(17, 0);
        let actual = actual_hours(start, start + Duration::seconds(90));
        assert_eq!(actual, dec!(0.025));

        let third = actual_hours(start, at(17, 20));
        assert_eq!(third, dec!(0.333333));
        assert!(third.scale() <= HOURS_SCALE);

        // stored payable hours stay exactly twice the stored actual hours
        let payable = calculated_hours(third);
        assert_eq!(payable, dec!(0.666666));
        assert!(payable.scale() <= HOURS_SCALE);
    }

    #[test]
    fn sub_unit_remainders_round_half_away_from_zero() {
        let start = at(17, 0);
        // 2 s = 0.000555...h, 40 min = 0.666666...h
        assert_eq!(actual_hours(start, start + Duration::seconds(2)), dec!(0.000556));
        assert_eq!(actual_hours(start, at(17, 40)), dec!(0.666667));
    }

    #[test]
    fn finish_before_start_is_negative() {
        assert_eq!(actual_hours(at(18, 0), at(17, 30)), dec!(-0.5));
    }
}
