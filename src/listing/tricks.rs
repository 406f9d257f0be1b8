use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ListSource, order_by};
use crate::pagination::{ListScope, ListWindow, Rank, RankIndex, Ranked, SortDirection, assign_ranks};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrickRecord {
    pub trick_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub rank: Option<Rank>,
}

impl Ranked for TrickRecord {
    fn id(&self) -> Uuid {
        self.trick_id
    }

    fn rank(&self) -> Option<Rank> {
        self.rank
    }

    fn set_rank(&mut self, rank: Option<Rank>) {
        self.rank = rank;
    }
}

pub struct PgTrickSource<'a> {
    pool: &'a PgPool,
}

impl<'a> PgTrickSource<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl ListSource for PgTrickSource<'_> {
    type Page = Vec<TrickRecord>;

    fn scope(&self) -> ListScope {
        ListScope::Tricks
    }

    #[tracing::instrument(name = "Count tricks", skip(self))]
    async fn count(&self) -> Result<i64, anyhow::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tricks")
            .fetch_one(self.pool)
            .await
            .context("Failed to count tricks")
    }

    #[tracing::instrument(name = "Fetch ranked tricks", skip(self))]
    async fn fetch_ranked(
        &self,
        window: &ListWindow,
        total_count: i64,
    ) -> Result<Vec<TrickRecord>, anyhow::Error> {
        let query = format!(
            r#"
            SELECT trick_id, name, slug, description, created_at
            FROM tricks
            ORDER BY {}
            LIMIT $1 OFFSET $2"#,
            order_by(window.direction, "trick_id")
        );
        let mut tricks = sqlx::query_as::<_, TrickRecord>(&query)
            .bind(window.limit)
            .bind(window.row_offset(total_count))
            .fetch_all(self.pool)
            .await
            .context("Failed to fetch tricks")?;

        let reference = trick_reference_order(self.pool, window.direction).await?;
        assign_ranks(&mut tricks, &RankIndex::new(&reference, window.direction));
        Ok(tricks)
    }
}

// identifiers only, in the same order as the page query
async fn trick_reference_order(
    pool: &PgPool,
    direction: SortDirection,
) -> Result<Vec<Uuid>, anyhow::Error> {
    let query = format!(
        "SELECT trick_id FROM tricks ORDER BY {}",
        order_by(direction, "trick_id")
    );
    sqlx::query_scalar::<_, Uuid>(&query)
        .fetch_all(pool)
        .await
        .context("Failed to fetch the trick reference order")
}

#[allow(clippy::missing_errors_doc)]
#[tracing::instrument(name = "Find trick", skip(pool))]
pub async fn find_trick(pool: &PgPool, trick_id: Uuid) -> Result<Option<TrickRecord>, anyhow::Error> {
    sqlx::query_as::<_, TrickRecord>(
        r#"
        SELECT trick_id, name, slug, description, created_at
        FROM tricks
        WHERE trick_id = $1"#,
    )
    .bind(trick_id)
    .fetch_optional(pool)
    .await
    .context("Failed to look the trick up")
}
