use crate::dtos::{
    AddPersonResponse, DataResponse, DeletePersonParams, MessageResponse, NameLookup,
    PersonResponse, UpdatePersonParams,
};
use crate::models::{NamePattern, NewPerson, PersonId, PersonQuery, PersonUpdate};
use crate::services::record_store_operation;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde_json::{error::Category, Value};
use service_core::error::AppError;

pub const INVALID_FORMAT_MESSAGE: &str = "Invalid request format. Expecting an array.";

const LISTED_FOOD: &str = "burritos";
const LISTED_LIMIT: i64 = 2;

fn observe<T>(operation: &'static str, result: Result<T, AppError>) -> Result<T, AppError> {
    record_store_operation(operation, result.is_ok());
    result
}

#[tracing::instrument(skip(state, payload))]
pub async fn add_person(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AddPersonResponse>, AppError> {
    let items = match payload {
        Ok(Json(Value::Array(items))) => items,
        Ok(_) => return Err(AppError::BadRequest(anyhow::anyhow!(INVALID_FORMAT_MESSAGE))),
        Err(rejection) => {
            tracing::debug!("Unreadable add body: {}", rejection);
            return Err(AppError::BadRequest(anyhow::anyhow!(INVALID_FORMAT_MESSAGE)));
        }
    };

    let people = items
        .into_iter()
        .map(serde_json::from_value::<NewPerson>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Person validation failed: {}", e))
        })?;

    let inserted = observe("insert_many", state.store.insert_many(people).await)?;
    tracing::info!(count = inserted.len(), "People added");

    Ok(Json(AddPersonResponse {
        status: true,
        message: "Data was added".to_string(),
        inserted_people: inserted.into_iter().map(PersonResponse::from).collect(),
    }))
}

/// Two burrito lovers, alphabetically, without their age.
#[tracing::instrument(skip(state))]
pub async fn list_burrito_lovers(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<PersonResponse>>>, AppError> {
    let query = PersonQuery {
        favorite_food: Some(LISTED_FOOD.to_string()),
        limit: Some(LISTED_LIMIT),
        hide_age: true,
    };

    let people = observe("find", state.store.find(&query).await)?;

    Ok(Json(DataResponse::new(
        people.into_iter().map(PersonResponse::from).collect(),
    )))
}

/// Looks a person up by a name fragment sent in the request body.
#[tracing::instrument(skip(state, body))]
pub async fn get_person_by_name(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DataResponse<Option<PersonResponse>>>, AppError> {
    let lookup = if body.is_empty() {
        NameLookup::default()
    } else {
        serde_json::from_slice::<NameLookup>(&body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e)))?
    };

    let pattern = lookup
        .name
        .as_deref()
        .map(NamePattern::parse)
        .unwrap_or_else(NamePattern::any);

    let person = observe(
        "find_one_by_name",
        state.store.find_one_by_name(&pattern).await,
    )?;

    Ok(Json(DataResponse::new(person.map(PersonResponse::from))))
}

#[tracing::instrument(skip(state))]
pub async fn get_person_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Option<PersonResponse>>>, AppError> {
    let id: PersonId = id.parse()?;

    let person = observe("find_by_id", state.store.find_by_id(&id).await)?;

    Ok(Json(DataResponse::new(person.map(PersonResponse::from))))
}

/// Reads the update body. Without a JSON content type, or with an empty body,
/// nothing is overwritten.
fn parse_update(headers: &HeaderMap, body: &Bytes) -> Result<PersonUpdate, AppError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if !is_json || body.is_empty() {
        return Ok(PersonUpdate::default());
    }

    serde_json::from_slice(body).map_err(|e| match e.classify() {
        // Well-formed JSON whose values do not fit the schema.
        Category::Data => {
            AppError::InternalError(anyhow::anyhow!("Cast failed for update body: {}", e))
        }
        _ => AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e)),
    })
}

#[tracing::instrument(skip(state, headers, body))]
pub async fn update_person(
    State(state): State<AppState>,
    Query(params): Query<UpdatePersonParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DataResponse<Option<PersonResponse>>>, AppError> {
    let update = parse_update(&headers, &body)?;

    let Some(name) = params.name else {
        tracing::debug!("Update without a name matches nobody");
        return Ok(Json(DataResponse::new(None)));
    };

    let person = observe(
        "update_by_name",
        state.store.update_by_name(&name, &update).await,
    )?;

    Ok(Json(DataResponse::new(person.map(PersonResponse::from))))
}

/// Deletes by the `id` query parameter. Any path segment after
/// `/deletePerson/` is ignored.
#[tracing::instrument(skip(state))]
pub async fn delete_person(
    State(state): State<AppState>,
    Query(params): Query<DeletePersonParams>,
) -> Result<Json<MessageResponse>, AppError> {
    let id: PersonId = params.id.as_deref().unwrap_or_default().parse()?;

    let removed = observe("delete_by_id", state.store.delete_by_id(&id).await)?;
    tracing::info!(person_id = %id, removed, "Delete processed");

    Ok(Json(MessageResponse {
        status: true,
        message: "Person was removed".to_string(),
    }))
}
