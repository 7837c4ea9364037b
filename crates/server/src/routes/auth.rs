//! Sign-in route handlers.

use axum::{Json, extract::State, http::StatusCode};
use inventrak_core::access::{Section, sections_for};
use inventrak_core::user::{SignupDetails, User};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(flatten)]
    pub details: SignupDetails,
    #[serde(default)]
    pub password: String,
}

/// The signed-in user and the sections their role may open.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: User,
    pub sections: Vec<Section>,
}

impl From<User> for SessionView {
    fn from(user: User) -> Self {
        let sections = sections_for(user.role);
        Self { user, sections }
    }
}

/// Sign in with email, password, and role.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionView>> {
    let user = state
        .session()
        .login(&body.email, &body.password, &body.role)
        .await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Json(user.into()))
}

/// Create a store account; the new user is always an admin.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let user = state.session().signup(&body.details, &body.password).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Sign out, forgetting the persisted session and emptying both carts.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode> {
    state.session().logout()?;
    state.reset_section_state();
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// Current user, or 401.
pub async fn session(RequireAuth(user): RequireAuth) -> Json<SessionView> {
    Json(user.into())
}
