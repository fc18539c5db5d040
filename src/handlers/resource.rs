//! Resource CRUD handlers, generic over the resource type: create, list, read, update, delete.

use crate::error::{AppError, RepoError};
use crate::id::ID_FIELD;
use crate::resources::Resource;
use crate::response::{created, ok};
use crate::service::{RecordValidator, Repository};
use crate::store::Document;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|e| {
        tracing::debug!(error = %e, "unable to parse request payload");
        AppError::BadRequest(format!("unable to parse request payload: {}", e.body_text()))
    })
}

/// The `:id` segment. Segments that do not even decode to text are malformed identifiers too.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!(error = %e, "unable to extract identifier from path");
        RepoError::InvalidIdentifier(e.body_text()).into()
    })
}

fn body_to_map(value: Value) -> Result<Document, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// One payload object to a typed record: identifier dropped, schema checked, then deserialized.
fn record_from_value<T: Resource>(value: Value) -> Result<T, AppError> {
    let mut map = body_to_map(value)?;
    map.remove(ID_FIELD);
    RecordValidator::validate(&map, T::schema()).map_err(RepoError::from)?;
    serde_json::from_value(Value::Object(map))
        .map_err(|e| AppError::BadRequest(format!("invalid {}: {}", T::NAME, e)))
}

/// GET /{resource}?field=value: records matching every given field.
pub async fn list<T: Resource>(
    State(repo): State<Repository<T>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let records = repo.list_by_query(&params).await?;
    Ok(ok(records))
}

/// POST /{resource}: JSON array of records; responds 201 with the generated ids in input order.
pub async fn create<T: Resource>(
    State(repo): State<Repository<T>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let items = match json_body(body)? {
        Value::Array(arr) => arr,
        _ => return Err(AppError::BadRequest("body must be a JSON array".into())),
    };
    let records = items
        .into_iter()
        .map(record_from_value::<T>)
        .collect::<Result<Vec<_>, _>>()?;
    let ids = repo.insert_many(records).await?;
    Ok(created(ids))
}

pub async fn read<T: Resource>(
    State(repo): State<Repository<T>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let record = repo.get_by_id(&id).await?;
    Ok(ok(record))
}

/// PUT /{resource}/:id: partial JSON object merged into the stored record.
pub async fn update<T: Resource>(
    State(repo): State<Repository<T>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let patch = body_to_map(json_body(body)?)?;
    let record = repo.update(&id, &patch).await?;
    Ok(ok(record))
}

/// DELETE /{resource}/:id: responds with the deleted count (0 when nothing matched).
pub async fn delete<T: Resource>(
    State(repo): State<Repository<T>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let count = repo.delete(&id).await?;
    Ok(ok(count))
}
