use super::ListScope;

/// Where the last count a client was shown is remembered between requests.
pub trait CountSnapshots {
    #[allow(clippy::missing_errors_doc)]
    fn previous_count(&self, scope: &ListScope) -> Result<Option<i64>, anyhow::Error>;

    #[allow(clippy::missing_errors_doc)]
    fn remember_count(&self, scope: &ListScope, count: i64) -> Result<(), anyhow::Error>;
}

impl<C: CountSnapshots + ?Sized> CountSnapshots for &C {
    fn previous_count(&self, scope: &ListScope) -> Result<Option<i64>, anyhow::Error> {
        (**self).previous_count(scope)
    }

    fn remember_count(&self, scope: &ListScope, count: i64) -> Result<(), anyhow::Error> {
        (**self).remember_count(scope, count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    // nothing remembered for this scope yet
    FirstSeen,
    Fresh,
    Outdated { previous: i64, current: i64 },
}

impl Staleness {
    #[must_use]
    pub const fn is_outdated(&self) -> bool {
        matches!(self, Self::Outdated { .. })
    }
}

pub struct OutdatedCountDetector<C> {
    snapshots: C,
}

impl<C: CountSnapshots> OutdatedCountDetector<C> {
    pub const fn new(snapshots: C) -> Self {
        Self { snapshots }
    }

    /// Compares `current_count` with the remembered one, then remembers
    /// `current_count` for the next request on the same scope.
    #[allow(clippy::missing_errors_doc)]
    pub fn check(&self, scope: &ListScope, current_count: i64) -> Result<Staleness, anyhow::Error> {
        let staleness = match self.snapshots.previous_count(scope)? {
            None => Staleness::FirstSeen,
            Some(previous) if previous == current_count => Staleness::Fresh,
            Some(previous) => {
                tracing::warn!(
                    %scope,
                    previous_count = previous,
                    current_count,
                    "List changed since the client last loaded it"
                );
                Staleness::Outdated {
                    previous,
                    current: current_count,
                }
            }
        };
        self.snapshots.remember_count(scope, current_count)?;
        Ok(staleness)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn remember(&self, scope: &ListScope, current_count: i64) -> Result<(), anyhow::Error> {
        self.snapshots.remember_count(scope, current_count)
    }
}
