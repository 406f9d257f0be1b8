use serde::{Deserialize, Serialize};

// offsets and limits stay i64 end to end: postgres hands counts back as i64
// and clients are allowed to send negative offsets
pub const MIN_LIMIT: i64 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Asc,
    #[default]
    #[serde(alias = "desc")]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    // unknown directions are not an error here, the resolver decides what to do with them
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of ranks: `offset ..= offset + limit - 1`.
///
/// Rank 0 is the oldest item of the list whatever the direction, the direction
/// only says in which order the run is read and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWindow {
    pub offset: i64,
    pub limit: i64,
    pub direction: SortDirection,
}

impl ListWindow {
    #[must_use]
    pub const fn new(offset: i64, limit: i64, direction: SortDirection) -> Self {
        Self {
            offset,
            limit,
            direction,
        }
    }

    #[must_use]
    pub const fn empty(direction: SortDirection) -> Self {
        Self::new(0, 0, direction)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.limit <= 0
    }

    /// Exclusive upper rank, saturating at `i64::MAX`.
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.offset.saturating_add(self.limit)
    }

    /// Number of rows to skip when the list is read in `self.direction` order.
    #[must_use]
    pub fn row_offset(&self, total_count: i64) -> i64 {
        match self.direction {
            SortDirection::Asc => self.offset,
            SortDirection::Desc => total_count.saturating_sub(self.end()).max(0),
        }
    }
}

/// What the client asked for, before any correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub offset: i64,
    pub limit: Option<i64>,
    pub order: String,
}

impl WindowRequest {
    #[must_use]
    pub fn new(offset: i64, limit: Option<i64>, order: impl Into<String>) -> Self {
        Self {
            offset,
            limit,
            order: order.into(),
        }
    }

    #[must_use]
    pub fn from_window(window: &ListWindow) -> Self {
        Self::new(window.offset, Some(window.limit), window.direction.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    InvalidOrder,
    InvalidLimit,
    InvalidOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Unchanged,
    // trimmed to the list bounds, nothing to tell the user
    Clamped,
    // thrown away and replaced by the default page
    Reset(ResetCause),
    // the list has no items at all
    Empty,
    // the request starts past either end of the list
    Exhausted,
}

impl Resolution {
    #[must_use]
    pub const fn is_reset(&self) -> bool {
        matches!(self, Self::Reset(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub window: ListWindow,
    pub resolution: Resolution,
}

impl ResolvedWindow {
    const fn new(window: ListWindow, resolution: Resolution) -> Self {
        Self { window, resolution }
    }
}

/// Turns a raw offset/limit/order triple into a window that is safe to query.
///
/// Resolution is pure and deterministic. Any window it returns with
/// `limit >= 1` resolves to itself again with `Resolution::Unchanged`.
#[derive(Debug, Clone, Copy)]
pub struct OffsetLimitResolver {
    default_limit: i64,
}

impl OffsetLimitResolver {
    #[must_use]
    pub fn new(default_limit: i64) -> Self {
        Self {
            default_limit: default_limit.max(MIN_LIMIT),
        }
    }

    #[must_use]
    pub const fn default_limit(&self) -> i64 {
        self.default_limit
    }

    #[must_use]
    pub fn resolve(&self, request: &WindowRequest, total_count: i64) -> ResolvedWindow {
        let direction = SortDirection::parse(&request.order);
        if total_count <= 0 {
            return ResolvedWindow::new(
                ListWindow::empty(direction.unwrap_or_default()),
                Resolution::Empty,
            );
        }

        let max_offset = total_count - 1;
        let offset = request.offset;
        let limit = request.limit.unwrap_or(self.default_limit);

        let Some(direction) = direction else {
            return self.reset(SortDirection::Desc, total_count, ResetCause::InvalidOrder);
        };
        if limit < MIN_LIMIT {
            return self.reset(direction, total_count, ResetCause::InvalidLimit);
        }
        // a band end past i64::MAX means the limit is unusable
        let Some(upper_bound) = max_offset
            .checked_add(limit)
            .and_then(|bound| bound.checked_add(1))
        else {
            return self.reset(direction, total_count, ResetCause::InvalidLimit);
        };
        // one page of slack on both sides of the list
        let valid_offset = offset >= -limit && offset < upper_bound;
        if !valid_offset {
            return self.reset(direction, total_count, ResetCause::InvalidOffset);
        }

        let requested = ListWindow::new(offset, limit, direction);
        match clamp(requested, total_count) {
            None => ResolvedWindow::new(ListWindow::empty(direction), Resolution::Exhausted),
            Some(window) if window == requested => {
                ResolvedWindow::new(window, Resolution::Unchanged)
            }
            Some(window) => ResolvedWindow::new(window, Resolution::Clamped),
        }
    }

    /// The page a list opens on: the newest items for DESC, the oldest for ASC.
    #[must_use]
    pub fn default_window(&self, direction: SortDirection, total_count: i64) -> ListWindow {
        if total_count <= 0 {
            return ListWindow::empty(direction);
        }
        let offset = match direction {
            SortDirection::Desc => total_count - self.default_limit,
            SortDirection::Asc => 0,
        };
        clamp(
            ListWindow::new(offset, self.default_limit, direction),
            total_count,
        )
        .unwrap_or_else(|| ListWindow::empty(direction))
    }

    fn reset(&self, direction: SortDirection, total_count: i64, cause: ResetCause) -> ResolvedWindow {
        tracing::debug!(?cause, %direction, total_count, "Window reset to the default page");
        ResolvedWindow::new(
            self.default_window(direction, total_count),
            Resolution::Reset(cause),
        )
    }
}

// intersect the window with [0, total_count); None when nothing is left
fn clamp(window: ListWindow, total_count: i64) -> Option<ListWindow> {
    let start = window.offset.max(0);
    let end = window.end().min(total_count);
    (end > start).then(|| ListWindow::new(start, end - start, window.direction))
}
