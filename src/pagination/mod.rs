mod outdated;
mod rank;
mod scope;
mod window;

pub use outdated::{CountSnapshots, OutdatedCountDetector, Staleness};
pub use rank::{
    ChildRankPolicy, Forest, ForestRanking, Rank, RankIndex, Ranked, assign_forest_ranks,
    assign_ranks,
};
pub use scope::ListScope;
pub use window::{
    ListWindow, MIN_LIMIT, OffsetLimitResolver, ResetCause, Resolution, ResolvedWindow,
    SortDirection, WindowRequest,
};

#[cfg(test)]
pub(crate) use outdated::tests::MemorySnapshots;
