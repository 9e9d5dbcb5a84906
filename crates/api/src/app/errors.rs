use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use partyhub_auth::AuthzError;
use partyhub_parties::PartyError;

pub fn party_error_to_response(err: PartyError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match err {
        // Backend detail stays in the logs.
        PartyError::Store(e) => {
            tracing::error!(error = %e, "party store failure");
            json_error(status, "store_error", "Error: party store unavailable")
        }
        other => json_error(status, other.code(), other.to_string()),
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "status": status.as_u16(),
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
