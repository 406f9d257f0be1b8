// json shape of a list batch, what the rust client reads instead of the html fragment
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentRecord, CommentThreads, ListBatch, ListNotice, TrickRecord};
use crate::encoded_id::encode_id;
use crate::pagination::{ListWindow, Rank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPayload {
    pub token: String,
    pub rank: Option<Rank>,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<EntryPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPayload {
    pub total_count: i64,
    pub window: ListWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<ListNotice>,
    pub items: Vec<EntryPayload>,
}

impl From<&TrickRecord> for EntryPayload {
    fn from(trick: &TrickRecord) -> Self {
        Self {
            token: encode_id(&trick.trick_id),
            rank: trick.rank,
            title: trick.name.clone(),
            body: trick.description.clone(),
            created_at: trick.created_at,
            replies: Vec::new(),
        }
    }
}

impl From<&CommentRecord> for EntryPayload {
    fn from(comment: &CommentRecord) -> Self {
        Self {
            token: encode_id(&comment.comment_id),
            rank: comment.rank,
            title: comment.author.clone(),
            body: comment.content.clone(),
            created_at: comment.created_at,
            replies: Vec::new(),
        }
    }
}

impl From<&ListBatch<Vec<TrickRecord>>> for BatchPayload {
    fn from(batch: &ListBatch<Vec<TrickRecord>>) -> Self {
        Self {
            total_count: batch.total_count,
            window: batch.window,
            notice: batch.notice,
            items: batch.page.iter().map(EntryPayload::from).collect(),
        }
    }
}

impl From<&ListBatch<CommentThreads>> for BatchPayload {
    fn from(batch: &ListBatch<CommentThreads>) -> Self {
        let items = batch
            .page
            .root_slots()
            .iter()
            .filter_map(|slot| {
                let root = batch.page.item(*slot)?;
                let mut entry = EntryPayload::from(root);
                entry.replies = batch.page.children(*slot).map(EntryPayload::from).collect();
                Some(entry)
            })
            .collect();
        Self {
            total_count: batch.total_count,
            window: batch.window,
            notice: batch.notice,
            items,
        }
    }
}
