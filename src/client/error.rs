use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum PagerError {
    #[error("The server answered with status {0}")]
    Status(u16),
    #[error("No answer within {0:?}")]
    Timeout(Duration),
    #[error("The request could not be sent")]
    Transport(#[source] reqwest::Error),
    #[error("The response is not a list batch")]
    Decode(#[source] reqwest::Error),
}

impl PagerError {
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}
