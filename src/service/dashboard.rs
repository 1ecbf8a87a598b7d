use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::overtime::OvertimeDetail;
use crate::store::Storage;

/// How many entries the dashboard shows under "recent overtime".
pub const RECENT_LIMIT: u32 = 5;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    #[schema(example = 42)]
    pub employee_count: i64,
    #[schema(example = 5)]
    pub department_count: i64,
    #[schema(example = 130)]
    pub overtime_count: i64,
    #[schema(example = "287.5")]
    pub total_actual_hours: Decimal,
    pub recent_overtimes: Vec<OvertimeDetail>,
}

pub async fn summary<S: Storage>(store: &mut S) -> Result<DashboardSummary, AppError> {
    Ok(DashboardSummary {
        employee_count: store.count_employees().await?,
        department_count: store.count_departments().await?,
        overtime_count: store.count_overtimes().await?,
        total_actual_hours: store.total_actual_hours().await?,
        recent_overtimes: store.list_overtimes(RECENT_LIMIT, 0).await?,
    })
}
