//! Landing route.

use axum::{Json, extract::State};
use inventrak_core::access::{Section, sections_for};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Landing {
    pub name: &'static str,
    pub version: &'static str,
    pub authenticated: bool,
    /// Sections the signed-in user may open; empty when signed out.
    pub sections: Vec<Section>,
}

/// Where a client lands: signed out it is pointed at the auth routes,
/// signed in it gets the dashboard navigation.
pub async fn landing(State(state): State<AppState>) -> Json<Landing> {
    let user = state.session().current_user();
    Json(Landing {
        name: "Inventrak",
        version: env!("CARGO_PKG_VERSION"),
        authenticated: user.is_some(),
        sections: user.map(|u| sections_for(u.role)).unwrap_or_default(),
    })
}
