use uuid::Uuid;

/// Which list a count or a window belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListScope {
    Tricks,
    // root comments of a single trick
    TrickComments(Uuid),
}

impl ListScope {
    #[must_use]
    pub fn snapshot_key(&self) -> String {
        match self {
            Self::Tricks => "list_count:tricks".to_string(),
            Self::TrickComments(trick_id) => format!("list_count:comments:{trick_id}"),
        }
    }
}

impl std::fmt::Display for ListScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tricks => f.write_str("tricks"),
            Self::TrickComments(trick_id) => write!(f, "comments of trick {trick_id}"),
        }
    }
}
