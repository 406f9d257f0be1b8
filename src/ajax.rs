use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{ACCEPT, HeaderMap},
    middleware::Next,
};

use crate::errors::ListError;

pub const REQUESTED_WITH: &str = "X-Requested-With";
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

#[must_use]
pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case(XML_HTTP_REQUEST))
}

// browsers get the html fragment, the rust pager asks for json
#[must_use]
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

/// Load-more endpoints are only reachable from the page scripts.
#[allow(clippy::missing_errors_doc)]
pub async fn reject_non_ajax_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    if is_ajax(req.headers()) {
        next.call(req).await
    } else {
        tracing::warn!(path = %req.path(), "Rejected a non-AJAX call to an AJAX endpoint");
        Err(ListError::AjaxOnly.into())
    }
}
