use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::{ListSource, order_by};
use crate::pagination::{
    ChildRankPolicy, Forest, ForestRanking, ListScope, ListWindow, Rank, RankIndex, Ranked,
    SortDirection, assign_forest_ranks,
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub comment_id: Uuid,
    pub trick_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub rank: Option<Rank>,
}

impl Ranked for CommentRecord {
    fn id(&self) -> Uuid {
        self.comment_id
    }

    fn rank(&self) -> Option<Rank> {
        self.rank
    }

    fn set_rank(&mut self, rank: Option<Rank>) {
        self.rank = rank;
    }
}

/// Root comments of one page with all of their replies.
pub type CommentThreads = Forest<CommentRecord>;

/// Root comments of a trick, paginated; replies come along with their parent.
pub struct PgCommentSource<'a> {
    pool: &'a PgPool,
    trick_id: Uuid,
    child_ranking: ChildRankPolicy,
}

impl<'a> PgCommentSource<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, trick_id: Uuid, child_ranking: ChildRankPolicy) -> Self {
        Self {
            pool,
            trick_id,
            child_ranking,
        }
    }

    async fn root_page(
        &self,
        window: &ListWindow,
        total_count: i64,
    ) -> Result<Vec<CommentRecord>, anyhow::Error> {
        let query = format!(
            r#"
            SELECT comment_id, trick_id, parent_id, author, content, created_at
            FROM comments
            WHERE trick_id = $1 AND parent_id IS NULL
            ORDER BY {}
            LIMIT $2 OFFSET $3"#,
            order_by(window.direction, "comment_id")
        );
        sqlx::query_as::<_, CommentRecord>(&query)
            .bind(self.trick_id)
            .bind(window.limit)
            .bind(window.row_offset(total_count))
            .fetch_all(self.pool)
            .await
            .context("Failed to fetch root comments")
    }

    // oldest reply first under each parent
    async fn replies(&self, parents: &[Uuid]) -> Result<Vec<CommentRecord>, anyhow::Error> {
        sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT comment_id, trick_id, parent_id, author, content, created_at
            FROM comments
            WHERE parent_id = ANY($1)
            ORDER BY created_at ASC, comment_id ASC"#,
        )
        .bind(parents)
        .fetch_all(self.pool)
        .await
        .context("Failed to fetch comment replies")
    }

    async fn reference_order(
        &self,
        direction: SortDirection,
        roots_only: bool,
    ) -> Result<Vec<Uuid>, anyhow::Error> {
        let filter = if roots_only { "AND parent_id IS NULL" } else { "" };
        let query = format!(
            "SELECT comment_id FROM comments WHERE trick_id = $1 {filter} ORDER BY {}",
            order_by(direction, "comment_id")
        );
        sqlx::query_scalar::<_, Uuid>(&query)
            .bind(self.trick_id)
            .fetch_all(self.pool)
            .await
            .context("Failed to fetch the comment reference order")
    }
}

impl ListSource for PgCommentSource<'_> {
    type Page = CommentThreads;

    fn scope(&self) -> ListScope {
        ListScope::TrickComments(self.trick_id)
    }

    #[tracing::instrument(name = "Count root comments", skip(self), fields(trick_id = %self.trick_id))]
    async fn count(&self) -> Result<i64, anyhow::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE trick_id = $1 AND parent_id IS NULL",
        )
        .bind(self.trick_id)
        .fetch_one(self.pool)
        .await
        .context("Failed to count comments")
    }

    #[tracing::instrument(name = "Fetch ranked comments", skip(self), fields(trick_id = %self.trick_id))]
    async fn fetch_ranked(
        &self,
        window: &ListWindow,
        total_count: i64,
    ) -> Result<CommentThreads, anyhow::Error> {
        let roots = self.root_page(window, total_count).await?;
        let root_ids: Vec<Uuid> = roots.iter().map(|root| root.comment_id).collect();
        let replies = self.replies(&root_ids).await?;
        let mut threads = build_threads(roots, replies);

        // sibling ranking only needs the roots, global ranks every comment in one order
        let roots_only = self.child_ranking == ChildRankPolicy::Sibling;
        let index = RankIndex::new(
            &self.reference_order(window.direction, roots_only).await?,
            window.direction,
        );
        let ranking = match self.child_ranking {
            ChildRankPolicy::Sibling => ForestRanking::Sibling { roots: &index },
            ChildRankPolicy::Global => ForestRanking::Global(&index),
        };
        assign_forest_ranks(&mut threads, &ranking);
        Ok(threads)
    }
}

fn build_threads(roots: Vec<CommentRecord>, replies: Vec<CommentRecord>) -> CommentThreads {
    let mut threads = Forest::new();
    let mut slots = HashMap::with_capacity(roots.len());
    for root in roots {
        let id = root.comment_id;
        slots.insert(id, threads.push_root(root));
    }
    for reply in replies {
        let parent = reply.parent_id.and_then(|parent| slots.get(&parent).copied());
        match parent {
            Some(slot) => {
                threads.push_child(slot, reply);
            }
            None => tracing::debug!(comment_id = %reply.comment_id, "Reply without a root on this page"),
        }
    }
    threads
}
