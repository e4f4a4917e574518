//! # Request Extraction
//!
//! `POST /` takes the same fields as either `application/x-www-form-urlencoded`
//! or `multipart/form-data` (what a browser `FormData` or `curl -F` sends).
//! Extractor failures are turned into `ValidationRejected` so clients always
//! get the JSON rejection body.

use std::future::Future;
use std::pin::Pin;

use actix_multipart::form::text::Text;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use mb_core::error::AppError;

use crate::error::ApiError;
use crate::handlers::ActionForm;

/// Default cap on a `POST /` body, in bytes.
pub const DEFAULT_FORM_LIMIT: usize = 64 * 1024;

/// The `action` fields of a `POST /`, whichever encoding carried them.
pub struct ActionPayload(pub ActionForm);

#[derive(MultipartForm)]
struct ActionUpload {
    action: Option<Text<String>>,
    message: Option<Text<String>>,
    id: Option<Text<String>>,
    vote: Option<Text<String>>,
}

impl From<ActionUpload> for ActionForm {
    fn from(upload: ActionUpload) -> Self {
        Self {
            action: upload.action.map(Text::into_inner),
            message: upload.message.map(Text::into_inner),
            id: upload.id.map(Text::into_inner),
            vote: upload.vote.map(Text::into_inner),
        }
    }
}

impl FromRequest for ActionPayload {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if req.content_type().eq_ignore_ascii_case("multipart/form-data") {
            let upload = MultipartForm::<ActionUpload>::from_request(req, payload);
            Box::pin(async move { Ok(Self(upload.await?.into_inner().into())) })
        } else {
            let form = web::Form::<ActionForm>::from_request(req, payload);
            Box::pin(async move { Ok(Self(form.await?.into_inner())) })
        }
    }
}

fn reject(reason: String) -> actix_web::Error {
    ApiError(AppError::ValidationRejected(reason)).into()
}

pub fn form_config(limit: usize) -> web::FormConfig {
    web::FormConfig::default()
        .limit(limit)
        .error_handler(|err, _req| reject(format!("unreadable form: {err}")))
}

pub fn multipart_config(limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(limit)
        .memory_limit(limit)
        .error_handler(|err, _req| reject(format!("unreadable multipart form: {err}")))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| reject(format!("bad query: {err}")))
}
