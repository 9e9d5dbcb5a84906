use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use partyhub_auth::Permission;
use partyhub_core::PartyId;
use partyhub_parties::{PartyError, PartyFields};

use crate::app::dto::{ListPartiesQuery, PartyListResponse, PartyResponse};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz::authorize_request;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_parties).post(create_party))
        .route("/:id", get(get_party).put(update_party).post(create_party_with_id))
}

pub async fn list_parties(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<ListPartiesQuery>,
) -> axum::response::Response {
    if let Err(e) = authorize_request(&principal, &Permission::PARTIES_VIEW) {
        return errors::authz_error_to_response(e);
    }

    match services.parties.list(query.into()).await {
        Ok(parties) => {
            (StatusCode::OK, Json(PartyListResponse::from_parties(&parties))).into_response()
        }
        Err(e) => errors::party_error_to_response(e),
    }
}

pub async fn get_party(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authorize_request(&principal, &Permission::PARTIES_VIEW) {
        return errors::authz_error_to_response(e);
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.parties.get(id).await {
        Ok(party) => (StatusCode::OK, Json(PartyResponse::from(&party))).into_response(),
        Err(e) => errors::party_error_to_response(e),
    }
}

pub async fn create_party(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<PartyFields>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authorize_request(&principal, &Permission::PARTIES_CREATE) {
        return errors::authz_error_to_response(e);
    }

    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.parties.create(request, &principal.actor()).await {
        Ok(party) => (StatusCode::CREATED, Json(PartyResponse::from(&party))).into_response(),
        Err(e) => errors::party_error_to_response(e),
    }
}

/// `POST /parties/:id` is never valid: creates do not take an identifier.
pub async fn create_party_with_id(
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authorize_request(&principal, &Permission::PARTIES_CREATE) {
        return errors::authz_error_to_response(e);
    }
    errors::party_error_to_response(PartyError::UnexpectedIdentifier)
}

pub async fn update_party(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<PartyFields>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = authorize_request(&principal, &Permission::PARTIES_CREATE) {
        return errors::authz_error_to_response(e);
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.parties.update(id, request, &principal.actor()).await {
        Ok(party) => (StatusCode::OK, Json(PartyResponse::from(&party))).into_response(),
        Err(e) => errors::party_error_to_response(e),
    }
}

/// A malformed id cannot name a stored record, so it reads as not found.
fn parse_id(raw: &str) -> Result<PartyId, axum::response::Response> {
    raw.parse::<PartyId>()
        .map_err(|e| errors::party_error_to_response(PartyError::from(e)))
}
