use crate::error::AppError;
use crate::model::department::Department;
use crate::store::Storage;

/// Departments ordered by name, for the employee form.
pub async fn list<S: Storage>(store: &mut S) -> Result<Vec<Department>, AppError> {
    Ok(store.list_departments().await?)
}
