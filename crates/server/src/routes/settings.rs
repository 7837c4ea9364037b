//! Account settings route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use inventrak_core::settings::NotificationSettings;
use inventrak_core::user::{ProfileUpdate, User};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, set_sentry_user};
use crate::middleware::RequireSettings;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

pub async fn profile(RequireSettings(user): RequireSettings) -> Json<User> {
    Json(user)
}

#[instrument(skip(state, _user, update))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireSettings(_user): RequireSettings,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    let user = state.session().update_profile(&update)?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Json(user))
}

pub async fn notifications(
    State(state): State<AppState>,
    RequireSettings(_user): RequireSettings,
) -> Json<NotificationSettings> {
    Json(*state.notifications())
}

#[instrument(skip(state, _user))]
pub async fn update_notifications(
    State(state): State<AppState>,
    RequireSettings(_user): RequireSettings,
    Json(settings): Json<NotificationSettings>,
) -> Json<NotificationSettings> {
    *state.notifications_mut() = settings;
    tracing::info!("Notification preferences saved");
    Json(settings)
}

#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    RequireSettings(_user): RequireSettings,
    Json(body): Json<PasswordChange>,
) -> Result<StatusCode> {
    state.session().change_password(
        &body.current_password,
        &body.new_password,
        &body.confirm_password,
    )?;
    Ok(StatusCode::NO_CONTENT)
}
