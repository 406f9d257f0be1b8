// identifiers never leave the server as raw database keys
// a token is the url-safe base64 (no padding) of the 16 uuid bytes
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use uuid::Uuid;

pub const TOKEN_LEN: usize = 22;

#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("Token must be {TOKEN_LEN} characters long, got {0}")]
    Length(usize),
    #[error("Token is not valid base64")]
    Encoding(#[source] base64::DecodeError),
    #[error("Token does not hold a uuid")]
    NotAUuid(#[source] uuid::Error),
}

#[must_use]
pub fn encode_id(id: &Uuid) -> String {
    URL_SAFE_NO_PAD.encode(id.as_bytes())
}

#[allow(clippy::missing_errors_doc)]
pub fn decode_id(token: &str) -> Result<Uuid, TokenError> {
    if token.len() != TOKEN_LEN {
        return Err(TokenError::Length(token.len()));
    }
    // the engine rejects non-zero trailing bits, so every uuid has exactly one token
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(TokenError::Encoding)?;
    Uuid::from_slice(&bytes).map_err(TokenError::NotAUuid)
}
