use crate::api::employee::EmployeeListResponse;
use crate::api::overtime::OvertimeListResponse;
use crate::model::department::Department;
use crate::model::employee::{Employee, EmployeeDetail, EmployeeForm, EmployeeSummary};
use crate::model::overtime::{Overtime, OvertimeDetail, OvertimeForm};
use crate::service::dashboard::DashboardSummary;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Overtime Management API",
        version = "1.0.0",
        description = r#"
## Overtime Management

Internal record keeping for **employees**, **departments** and **overtime entries**.

### Key Rules
- **Employee NIK** must be unique across all employees
- **Overtime** is capped at **3 hours** per entry; payable hours are actual hours × 2
- Employees with recorded overtime cannot be deleted

### Response Format
- JSON bodies; failures answer `{"success": false, "message": ...}`
- Validation failures add `errors` (field → messages) and echo the submitted `input`
- List endpoints return 10 items per page, `page` is 1-based

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::lookup_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::overtime::list_overtimes,
        crate::api::overtime::get_overtime,
        crate::api::overtime::create_overtime,
        crate::api::overtime::update_overtime,
        crate::api::overtime::delete_overtime,

        crate::api::department::list_departments,
        crate::api::dashboard::dashboard
    ),
    components(
        schemas(
            Department,
            Employee,
            EmployeeDetail,
            EmployeeSummary,
            EmployeeForm,
            EmployeeListResponse,
            Overtime,
            OvertimeDetail,
            OvertimeForm,
            OvertimeListResponse,
            DashboardSummary
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Overtime", description = "Overtime management APIs"),
        (name = "Department", description = "Department lookup APIs"),
        (name = "Dashboard", description = "Dashboard statistics"),
    )
)]
pub struct ApiDoc;
