//! HTML dashboard routes
//!
//! Form posts mutate the visitor's session and redirect back to `/`.

use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::Deserialize;

use crate::embedded_assets::serve_asset;
use crate::render::render_dashboard;
use crate::session::SESSION_COOKIE;
use crate::{chat, AppState};

#[derive(Deserialize)]
pub struct ChatForm {
    pub message: String,
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/chat", post(submit_chat))
        .route("/clear", post(clear_analysis))
        .route("/assets/*path", get(serve_asset))
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Session id from the cookie, issuing a new cookie when the session is unknown.
fn resolve_session(state: &AppState, jar: CookieJar) -> (CookieJar, String) {
    let existing = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (id, created) = state.sessions.ensure(existing.as_deref());
    if created {
        (jar.add(session_cookie(id.clone())), id)
    } else {
        (jar, id)
    }
}

async fn dashboard_page(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, id) = resolve_session(&state, jar);
    let session = state.sessions.snapshot(&id);
    (jar, Html(render_dashboard(session.as_ref(), Utc::now())))
}

async fn submit_chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ChatForm>,
) -> (CookieJar, Redirect) {
    let (jar, id) = resolve_session(&state, jar);
    chat::handle_message(&state, &id, &form.message).await;
    (jar, Redirect::to("/"))
}

async fn clear_analysis(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let (jar, id) = resolve_session(&state, jar);
    state.sessions.update(&id, |session| session.clear());
    tracing::debug!("Cleared analysis for session {}", id);
    (jar, Redirect::to("/"))
}
