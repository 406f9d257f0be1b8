mod health_check;
mod home;
mod trick;

pub use health_check::*;
pub use home::*;
pub use trick::*;

use actix_web::{HttpRequest, HttpResponse, http::header::ContentType};
use anyhow::Context;

use crate::ajax::wants_json;
use crate::errors::ListError;
use crate::listing::BatchPayload;
use crate::pagination::SortDirection;

// ?order=ASC|DESC, anything else is left for the resolver to reject
#[derive(serde::Deserialize, Debug)]
pub struct OrderQuery {
    order: Option<String>,
}

impl OrderQuery {
    fn order_or(&self, fallback: SortDirection) -> String {
        self.order
            .clone()
            .unwrap_or_else(|| fallback.as_str().to_string())
    }
}

fn list_response(
    request: &HttpRequest,
    payload: impl FnOnce() -> BatchPayload,
    fragment: impl FnOnce() -> Result<String, askama::Error>,
) -> Result<HttpResponse, ListError> {
    if wants_json(request.headers()) {
        return Ok(HttpResponse::Ok().json(payload()));
    }
    let body = fragment().context("Failed to render a list fragment")?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
