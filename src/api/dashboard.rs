use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::service;
use crate::store::SessionSource;

/// Dashboard statistics and the five latest overtime entries
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn dashboard<P: SessionSource>(
    store: web::Data<P>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let summary = service::dashboard::summary(&mut session).await?;
    Ok(HttpResponse::Ok().json(summary))
}
