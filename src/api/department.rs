use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::service;
use crate::store::SessionSource;

/// Department lookup list for the employee form
#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Departments ordered by name", body = [Department])
    ),
    tag = "Department"
)]
pub async fn list_departments<P: SessionSource>(
    store: web::Data<P>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let departments = service::department::list(&mut session).await?;
    Ok(HttpResponse::Ok().json(departments))
}
