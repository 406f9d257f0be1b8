use reqwest::header::ACCEPT;

use super::PagerError;
use crate::ajax::{REQUESTED_WITH, XML_HTTP_REQUEST};
use crate::listing::BatchPayload;
use crate::pagination::ListWindow;

/// Fetches one window of a list from the server.
#[allow(async_fn_in_trait)]
pub trait PageTransport {
    async fn fetch(&self, window: &ListWindow) -> Result<BatchPayload, PagerError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEndpoint {
    Tricks { locale: String },
    Comments { trick_token: String },
}

impl ListEndpoint {
    #[must_use]
    pub fn path(&self, window: &ListWindow) -> String {
        let (offset, limit, order) = (window.offset, window.limit, window.direction);
        match self {
            Self::Tricks { locale } => {
                format!("/{locale}/home-load-tricks/{offset}/{limit}?order={order}")
            }
            Self::Comments { trick_token } => {
                format!("/load-trick-comments/{trick_token}/{offset}/{limit}?order={order}")
            }
        }
    }
}

/// Talks to the load-more endpoints the way the page scripts do, but asks for json.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    endpoint: ListEndpoint,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, endpoint: ListEndpoint) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            endpoint,
        }
    }
}

impl PageTransport for HttpTransport {
    #[tracing::instrument(
        name = "Fetch list window",
        skip(self),
        fields(endpoint = ?self.endpoint)
    )]
    async fn fetch(&self, window: &ListWindow) -> Result<BatchPayload, PagerError> {
        let url = format!("{}{}", self.base_url, self.endpoint.path(window));
        let response = self
            .client
            .get(url)
            .header(REQUESTED_WITH, XML_HTTP_REQUEST)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(PagerError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PagerError::Status(status.as_u16()));
        }
        response.json().await.map_err(PagerError::Decode)
    }
}
