use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::employee::{EmployeeDetail, EmployeeForm};
use crate::service;
use crate::store::SessionSource;
use crate::utils::pagination::{Page, PageQuery};

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeDetail>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

impl From<Page<EmployeeDetail>> for EmployeeListResponse {
    fn from(page: Page<EmployeeDetail>) -> Self {
        Self {
            data: page.data,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
        }
    }
}

/// List employees, newest first
#[utoipa::path(
    get,
    path = "/api/employees",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees<P: SessionSource>(
    store: web::Data<P>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let page = service::employee::list(&mut session, query.page()).await?;
    Ok(HttpResponse::Ok().json(EmployeeListResponse::from(page)))
}

/// Employees ordered by name, for the overtime form
#[utoipa::path(
    get,
    path = "/api/employees/lookup",
    responses(
        (status = 200, description = "All employees with department", body = [EmployeeDetail])
    ),
    tag = "Employee"
)]
pub async fn lookup_employees<P: SessionSource>(
    store: web::Data<P>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let employees = service::employee::lookup(&mut session).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDetail),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee<P: SessionSource>(
    store: web::Data<P>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let employee = service::employee::get(&mut session, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeForm,
    responses(
        (status = 201, description = "Employee created successfully", body = Object, example = json!({
            "success": true,
            "message": "Employee created successfully",
            "data": { "id": 1, "nik": "3174012345" }
        })),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "success": false,
            "message": "Validation failed",
            "errors": { "nik": ["NIK already exists"] },
            "input": { "nik": "3174012345" }
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee<P: SessionSource>(
    store: web::Data<P>,
    payload: web::Json<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let employee = service::employee::create(&mut session, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Employee created successfully",
        "data": employee
    })))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee ID")
    ),
    request_body = EmployeeForm,
    responses(
        (status = 200, description = "Employee updated successfully", body = Object, example = json!({
            "success": true,
            "message": "Employee updated successfully"
        })),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn update_employee<P: SessionSource>(
    store: web::Data<P>,
    path: web::Path<u64>,
    payload: web::Json<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    let mut session = store.session().await?;
    let employee =
        service::employee::update(&mut session, path.into_inner(), payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee updated successfully",
        "data": employee
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "success": true,
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "success": false,
            "message": "Employee not found"
        })),
        (status = 409, description = "Employee still has overtime entries", body = Object, example = json!({
            "success": false,
            "message": "Cannot delete employee with overtime entry"
        })),
        (status = 500, description = "Storage failure", body = Object, example = json!({
            "success": false,
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee<P: SessionSource>(
    store: web::Data<P>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let mut session = store.session().await?;
    service::employee::delete(&mut session, employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee deleted successfully"
    })))
}
