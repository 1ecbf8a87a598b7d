use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::overtime::{OvertimeDetail, OvertimeForm};
use crate::service;
use crate::store::SessionSource;
use crate::utils::pagination::{Page, PageQuery};

#[derive(Serialize, ToSchema)]
pub struct OvertimeListResponse {
    pub data: Vec<OvertimeDetail>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 130)]
    pub total: i64,
}

impl From<Page<OvertimeDetail>> for OvertimeListResponse {
    fn from(page: Page<OvertimeDetail>) -> Self {
        Self {
            data: page.data,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/overtimes",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated overtime list, latest date first", body = OvertimeListResponse)
    ),
    tag = "Overtime"
)]
pub async fn list_overtimes<P: SessionSource>(
    store: web::Data<P>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let page = service::overtime::list(&mut session, query.page()).await?;
    Ok(HttpResponse::Ok().json(OvertimeListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/overtimes/{id}",
    params(
        ("id" = u64, Path, description = "Overtime ID")
    ),
    responses(
        (status = 200, description = "Overtime found", body = OvertimeDetail),
        (status = 404, description = "Overtime not found")
    ),
    tag = "Overtime"
)]
pub async fn get_overtime<P: SessionSource>(
    store: web::Data<P>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let overtime = service::overtime::get(&mut session, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(overtime))
}

/// Record overtime; actual and payable hours are derived from the times
#[utoipa::path(
    post,
    path = "/api/overtimes",
    request_body = OvertimeForm,
    responses(
        (status = 201, description = "Overtime created successfully", body = Object, example = json!({
            "success": true,
            "message": "Overtime created successfully",
            "data": { "id": 10, "actual_ot_hours": "2.25", "calculated_ot_hours": "4.5" }
        })),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "success": false,
            "message": "Validation failed",
            "errors": { "actual_ot_hours": ["Maximum OT hours is 3 hours"] }
        }))
    ),
    tag = "Overtime"
)]
pub async fn create_overtime<P: SessionSource>(
    store: web::Data<P>,
    payload: web::Json<OvertimeForm>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let overtime = service::overtime::create(&mut session, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Overtime created successfully",
        "data": overtime
    })))
}

#[utoipa::path(
    put,
    path = "/api/overtimes/{id}",
    params(
        ("id" = u64, Path, description = "Overtime ID")
    ),
    request_body = OvertimeForm,
    responses(
        (status = 200, description = "Overtime updated successfully"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Overtime not found")
    ),
    tag = "Overtime"
)]
pub async fn update_overtime<P: SessionSource>(
    store: web::Data<P>,
    path: web::Path<u64>,
    payload: web::Json<OvertimeForm>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let overtime =
        service::overtime::update(&mut session, path.into_inner(), payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Overtime updated successfully",
        "data": overtime
    })))
}

#[utoipa::path(
    delete,
    path = "/api/overtimes/{id}",
    params(
        ("id" = u64, Path, description = "Overtime ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "success": true,
            "message": "Overtime deleted successfully"
        })),
        (status = 404, description = "Overtime not found", body = Object, example = json!({
            "success": false,
            "message": "Overtime not found"
        }))
    ),
    tag = "Overtime"
)]
pub async fn delete_overtime<P: SessionSource>(
    store: web::Data<P>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    service::overtime::delete(&mut session, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Overtime deleted successfully"
    })))
}
