use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::payments::{find_plan, plans, Checkout};
use crate::session::{Session, SessionError, SessionStore, LOGIN_SUCCESS, SIGNUP_SUCCESS};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SignupRequest {
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutRequest {
    pub(crate) plan_id: String,
}

/// Pricing, checkout, and the mock account session.
pub fn account_router<S>(session: Session<S>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/plans", get(list_plans))
        .route("/api/v1/checkout", post(checkout::<S>))
        .route("/api/v1/auth/signup", post(signup::<S>))
        .route("/api/v1/auth/login", post(login::<S>))
        .route("/api/v1/auth/logout", post(logout::<S>))
        .route("/api/v1/auth/me", get(current_user::<S>))
        .with_state(session)
}

pub(crate) async fn list_plans() -> impl IntoResponse {
    Json(json!({ "plans": plans() }))
}

pub(crate) async fn checkout<S>(
    State(session): State<Session<S>>,
    Json(request): Json<CheckoutRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let Some(plan) = find_plan(&request.plan_id) else {
        return AppError::UnknownPlan(request.plan_id).into_response();
    };

    let payer = match session.current_user() {
        Ok(user) => user,
        Err(err) => return session_error_response(err),
    };

    Json(Checkout::begin(plan, payer.as_ref(), Utc::now())).into_response()
}

pub(crate) async fn signup<S>(
    State(session): State<Session<S>>,
    Json(request): Json<SignupRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match session.signup(&request.email, &request.password, &request.confirm_password) {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({ "message": SIGNUP_SUCCESS, "user": user })),
        )
            .into_response(),
        Err(err) => session_error_response(err),
    }
}

pub(crate) async fn login<S>(
    State(session): State<Session<S>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match session.login(&request.email, &request.password) {
        Ok(user) => (
            StatusCode::OK,
            Json(json!({ "message": LOGIN_SUCCESS, "user": user })),
        )
            .into_response(),
        Err(err) => session_error_response(err),
    }
}

pub(crate) async fn logout<S>(State(session): State<Session<S>>) -> Response
where
    S: SessionStore + 'static,
{
    match session.logout() {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "signed_out" }))).into_response(),
        Err(err) => session_error_response(err),
    }
}

pub(crate) async fn current_user<S>(State(session): State<Session<S>>) -> Response
where
    S: SessionStore + 'static,
{
    match session.current_user() {
        Ok(Some(user)) => Json(json!({ "authenticated": true, "user": user })).into_response(),
        Ok(None) => Json(json!({ "authenticated": false })).into_response(),
        Err(err) => session_error_response(err),
    }
}

fn session_error_response(err: SessionError) -> Response {
    let status = match &err {
        SessionError::InvalidEmail
        | SessionError::PasswordTooShort
        | SessionError::PasswordMismatch => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::DuplicateAccount => StatusCode::CONFLICT,
        SessionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        SessionError::Store(source) => {
            warn!(error = %source, "session store failure");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::session::InMemorySessionStore;

    fn session() -> Session<InMemorySessionStore> {
        Session::new(Arc::new(InMemorySessionStore::default()))
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let session = session();
        let request = || SignupRequest {
            email: "akinyi@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };

        let first = signup(State(session.clone()), Json(request())).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = signup(State(session), Json(request())).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn short_password_is_unprocessable() {
        let response = signup(
            State(session()),
            Json(SignupRequest {
                email: "akinyi@example.com".to_string(),
                password: "abc".to_string(),
                confirm_password: "abc".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn login_after_logout_restores_session() {
        let session = session();
        session
            .signup("otieno@example.com", "secret1", "secret1")
            .expect("signup succeeds");
        session.logout().expect("logout succeeds");

        let response = login(
            State(session.clone()),
            Json(LoginRequest {
                email: "otieno@example.com".to_string(),
                password: "secret1".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session.is_authenticated().expect("store readable"));
    }
}
