//! # mb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.
//! `GET /` lists or searches; `POST /` dispatches on the `action` field.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use mb_core::error::AppError;
use mb_core::models::{filter_messages, Message, VoteDirection};
use mb_core::traits::{IdentityProvider, MessageRepo};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::extract::ActionPayload;
use crate::identity::{client_ip, ClientIdentity};

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn MessageRepo>,
    pub identity: Box<dyn IdentityProvider>,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Every field is optional so that malformed posts surface as a rejection
/// rather than an extractor error.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    pub action: Option<String>,
    pub message: Option<String>,
    pub id: Option<String>,
    pub vote: Option<String>,
}

/// Renders the board, filtered when `search` is present.
pub async fn index(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let identity = ClientIdentity::resolve(&req, &*data.identity)?;

    let mut messages = data.repo.list_messages().await?;
    if let Some(term) = &query.search {
        messages = filter_messages(messages, term);
    }

    let search = query.search.as_deref().unwrap_or_default();
    let html = mb_ui::render_board(&data.title, search, &messages)?;

    let mut response = HttpResponse::Ok();
    identity.attach(&mut response);
    Ok(response.content_type("text/html; charset=utf-8").body(html))
}

/// Handles the AJAX actions: `post` and `vote`.
pub async fn handle_action(
    data: web::Data<AppState>,
    req: HttpRequest,
    ActionPayload(form): ActionPayload,
) -> Result<HttpResponse, ApiError> {
    let identity = ClientIdentity::resolve(&req, &*data.identity)?;

    let body = match form.action.as_deref() {
        Some("post") => {
            let text = form.message.as_deref().unwrap_or_default();
            create_message(&data, &identity, &client_ip(&req), text).await?
        }
        Some("vote") => cast_vote(&data, form.id.as_deref(), form.vote.as_deref()).await?,
        Some(other) => {
            return Err(AppError::ValidationRejected(format!("unknown action '{other}'")).into())
        }
        None => return Err(AppError::ValidationRejected("missing action".into()).into()),
    };

    let mut response = HttpResponse::Ok();
    identity.attach(&mut response);
    Ok(response.json(body))
}

pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("ok")
}

async fn create_message(
    data: &AppState,
    identity: &ClientIdentity,
    ip: &str,
    text: &str,
) -> Result<Value, AppError> {
    let message = Message::compose(&identity.token, ip, text)?;
    log::info!("New message {} from {} ({})", message.id, message.user, message.ip);

    data.repo.append_message(message).await?;
    Ok(json!({ "status": "ok" }))
}

/// A missing target is a normal outcome here, not an error response.
async fn cast_vote(
    data: &AppState,
    id: Option<&str>,
    vote: Option<&str>,
) -> Result<Value, AppError> {
    let (Some(id), Some(vote)) = (id, vote) else {
        return Err(AppError::ValidationRejected("vote requires id and vote".into()));
    };
    let direction: VoteDirection = vote.parse()?;

    match data.repo.cast_vote(id, direction).await {
        Ok(tally) => Ok(json!({
            "status": "ok",
            "upvotes": tally.upvotes,
            "downvotes": tally.downvotes,
        })),
        Err(AppError::NotFound(id)) => {
            log::info!("Vote on unknown message {id}");
            Ok(json!({ "status": "not_found" }))
        }
        Err(e) => Err(e),
    }
}
