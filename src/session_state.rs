use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

use crate::pagination::{CountSnapshots, ListScope};

// wrapper type for session
pub struct TypedSession(Session);

#[allow(clippy::missing_errors_doc)]
impl TypedSession {
    pub fn get_list_count(&self, scope: &ListScope) -> Result<Option<i64>, anyhow::Error> {
        self.0
            .get(&scope.snapshot_key())
            .map_err(|e| anyhow::anyhow!("Failed to read the {scope} count from the session: {e}"))
    }

    pub fn insert_list_count(&self, scope: &ListScope, count: i64) -> Result<(), anyhow::Error> {
        self.0
            .insert(scope.snapshot_key(), count)
            .map_err(|e| anyhow::anyhow!("Failed to store the {scope} count in the session: {e}"))
    }
}

// the session is where the last count shown to a visitor lives, for every list
impl CountSnapshots for TypedSession {
    fn previous_count(&self, scope: &ListScope) -> Result<Option<i64>, anyhow::Error> {
        self.get_list_count(scope)
    }

    fn remember_count(&self, scope: &ListScope, count: i64) -> Result<(), anyhow::Error> {
        self.insert_list_count(scope, count)
    }
}

impl FromRequest for TypedSession {
    // return the same error as Session's implementation of FromRequest
    type Error = <Session as FromRequest>::Error;

    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(req.get_session())))
    }
}
