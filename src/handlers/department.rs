use actix_web::{web, HttpResponse};

use crate::db::DirectoryStore;
use crate::errors::AppError;

pub async fn get_departments(
    store: web::Data<dyn DirectoryStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let departments = store
        .list_departments()
        .await
        .map_err(|err| AppError::store("Failed to fetch departments", &err))?;

    Ok(HttpResponse::Ok().json(departments))
}
