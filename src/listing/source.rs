use crate::pagination::{
    CountSnapshots, ListScope, ListWindow, OffsetLimitResolver, OutdatedCountDetector,
    SortDirection, WindowRequest,
};

/// Why the window a client gets back is not the one it asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListNotice {
    // the list changed under the client, it was sent back to the default page
    Outdated,
    // the request made no sense and was replaced by the default page
    Reset,
}

impl ListNotice {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outdated => "outdated",
            Self::Reset => "reset",
        }
    }
}

/// A list the pager can read from: one scope, counted and fetched by window.
#[allow(async_fn_in_trait)]
pub trait ListSource {
    type Page: Default;

    fn scope(&self) -> ListScope;

    async fn count(&self) -> Result<i64, anyhow::Error>;

    /// Fetch the items of a non-empty window and rank them.
    async fn fetch_ranked(
        &self,
        window: &ListWindow,
        total_count: i64,
    ) -> Result<Self::Page, anyhow::Error>;
}

#[derive(Debug, Clone)]
pub struct ListBatch<P> {
    pub page: P,
    pub window: ListWindow,
    pub total_count: i64,
    pub notice: Option<ListNotice>,
}

/// Serve a "load more" request.
///
/// The count snapshot of the scope is checked first: when it moved since the
/// client last loaded the list, the requested window is dropped in favour of
/// the default window for the current count.
#[allow(clippy::missing_errors_doc)]
#[tracing::instrument(
    name = "Load list window",
    skip(source, snapshots, resolver),
    fields(scope = %source.scope(), total_count = tracing::field::Empty)
)]
pub async fn load_batch<S, C>(
    source: &S,
    snapshots: C,
    resolver: &OffsetLimitResolver,
    request: &WindowRequest,
) -> Result<ListBatch<S::Page>, anyhow::Error>
where
    S: ListSource,
    C: CountSnapshots,
{
    let scope = source.scope();
    let total_count = source.count().await?;
    tracing::Span::current().record("total_count", total_count);

    let staleness = OutdatedCountDetector::new(snapshots).check(&scope, total_count)?;
    let (window, notice) = if staleness.is_outdated() {
        let direction = SortDirection::parse(&request.order).unwrap_or_default();
        (
            resolver.default_window(direction, total_count),
            Some(ListNotice::Outdated),
        )
    } else {
        let resolved = resolver.resolve(request, total_count);
        (
            resolved.window,
            resolved.resolution.is_reset().then_some(ListNotice::Reset),
        )
    };

    let page = fetch_window(source, &window, total_count).await?;
    tracing::info!(
        offset = window.offset,
        limit = window.limit,
        notice = ?notice,
        "Served list window"
    );

    Ok(ListBatch {
        page,
        window,
        total_count,
        notice,
    })
}

/// The window a page opens on. Its count becomes the snapshot later requests
/// are checked against.
#[allow(clippy::missing_errors_doc)]
#[tracing::instrument(
    name = "Load first list window",
    skip(source, snapshots, resolver),
    fields(scope = %source.scope())
)]
pub async fn load_first_window<S, C>(
    source: &S,
    snapshots: C,
    resolver: &OffsetLimitResolver,
    direction: SortDirection,
) -> Result<ListBatch<S::Page>, anyhow::Error>
where
    S: ListSource,
    C: CountSnapshots,
{
    let total_count = source.count().await?;
    OutdatedCountDetector::new(snapshots).remember(&source.scope(), total_count)?;

    let window = resolver.default_window(direction, total_count);
    let page = fetch_window(source, &window, total_count).await?;

    Ok(ListBatch {
        page,
        window,
        total_count,
        notice: None,
    })
}

async fn fetch_window<S: ListSource>(
    source: &S,
    window: &ListWindow,
    total_count: i64,
) -> Result<S::Page, anyhow::Error> {
    if window.is_empty() {
        return Ok(S::Page::default());
    }
    source.fetch_ranked(window, total_count).await
}
