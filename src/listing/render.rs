// html fragments for the browser pager
// every item carries data-offset (its rank) and data-count (the total at fetch time),
// a batch that was not served as asked starts with a data-error wrapper
use askama::Template;

use super::{CommentRecord, CommentThreads, ListBatch, TrickRecord};
use crate::encoded_id::encode_id;
use crate::pagination::{Rank, SortDirection};

struct TrickCard<'a> {
    token: String,
    rank: Option<Rank>,
    name: &'a str,
}

struct CommentCard<'a> {
    token: String,
    rank: Option<Rank>,
    author: &'a str,
    content: &'a str,
}

impl<'a> From<&'a CommentRecord> for CommentCard<'a> {
    fn from(comment: &'a CommentRecord) -> Self {
        Self {
            token: encode_id(&comment.comment_id),
            rank: comment.rank,
            author: &comment.author,
            content: &comment.content,
        }
    }
}

struct CommentThread<'a> {
    root: CommentCard<'a>,
    replies: Vec<CommentCard<'a>>,
}

#[derive(Template)]
#[template(path = "listing/tricks.html")]
struct TrickFragment<'a> {
    notice: Option<&'static str>,
    total_count: i64,
    locale: &'a str,
    cards: Vec<TrickCard<'a>>,
}

impl<'a> TrickFragment<'a> {
    fn new(batch: &'a ListBatch<Vec<TrickRecord>>, locale: &'a str) -> Self {
        Self {
            notice: batch.notice.map(|notice| notice.as_str()),
            total_count: batch.total_count,
            locale,
            cards: batch
                .page
                .iter()
                .map(|trick| TrickCard {
                    token: encode_id(&trick.trick_id),
                    rank: trick.rank,
                    name: &trick.name,
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "listing/comments.html")]
struct CommentFragment<'a> {
    notice: Option<&'static str>,
    total_count: i64,
    threads: Vec<CommentThread<'a>>,
}

impl<'a> CommentFragment<'a> {
    fn new(batch: &'a ListBatch<CommentThreads>) -> Self {
        let threads = batch
            .page
            .root_slots()
            .iter()
            .filter_map(|slot| {
                let root = batch.page.item(*slot)?;
                Some(CommentThread {
                    root: root.into(),
                    replies: batch.page.children(*slot).map(CommentCard::from).collect(),
                })
            })
            .collect();
        Self {
            notice: batch.notice.map(|notice| notice.as_str()),
            total_count: batch.total_count,
            threads,
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomePage {
    section_id: &'static str,
    total_count: i64,
    limit: i64,
    direction: SortDirection,
    fragment: String,
}

#[derive(Template)]
#[template(path = "trick.html")]
struct TrickPage<'a> {
    name: &'a str,
    description: &'a str,
    section_id: &'static str,
    total_count: i64,
    limit: i64,
    direction: SortDirection,
    fragment: String,
}

#[allow(clippy::missing_errors_doc)]
pub fn trick_fragment(
    batch: &ListBatch<Vec<TrickRecord>>,
    locale: &str,
) -> Result<String, askama::Error> {
    TrickFragment::new(batch, locale).render()
}

#[allow(clippy::missing_errors_doc)]
pub fn comment_fragment(batch: &ListBatch<CommentThreads>) -> Result<String, askama::Error> {
    CommentFragment::new(batch).render()
}

#[allow(clippy::missing_errors_doc)]
pub fn home_page(
    batch: &ListBatch<Vec<TrickRecord>>,
    locale: &str,
    limit: i64,
) -> Result<String, askama::Error> {
    HomePage {
        section_id: "trick-list",
        total_count: batch.total_count,
        limit,
        direction: batch.window.direction,
        fragment: trick_fragment(batch, locale)?,
    }
    .render()
}

#[allow(clippy::missing_errors_doc)]
pub fn trick_page(
    trick: &TrickRecord,
    comments: &ListBatch<CommentThreads>,
    limit: i64,
) -> Result<String, askama::Error> {
    TrickPage {
        name: &trick.name,
        description: &trick.description,
        section_id: "comment-list",
        total_count: comments.total_count,
        limit,
        direction: comments.window.direction,
        fragment: comment_fragment(comments)?,
    }
    .render()
}
