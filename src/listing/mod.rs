mod comments;
mod payload;
pub mod render;
mod source;
mod tricks;

pub use comments::{CommentRecord, CommentThreads, PgCommentSource};
pub use payload::{BatchPayload, EntryPayload};
pub use source::{ListBatch, ListNotice, ListSource, load_batch, load_first_window};
pub use tricks::{PgTrickSource, TrickRecord, find_trick};

use crate::pagination::SortDirection;

// created_at alone is not unique, the id breaks ties so every query sees the same order
fn order_by(direction: SortDirection, id_column: &str) -> String {
    let direction = direction.as_str();
    format!("created_at {direction}, {id_column} {direction}")
}
