use std::collections::HashMap;
use uuid::Uuid;

use super::SortDirection;

/// Position of an item in the whole list, 0 being the oldest.
pub type Rank = i64;

pub trait Ranked {
    fn id(&self) -> Uuid;
    fn rank(&self) -> Option<Rank>;
    fn set_rank(&mut self, rank: Option<Rank>);
}

/// Lookup table built once from the identifier-only reference order of a list.
#[derive(Debug, Clone)]
pub struct RankIndex {
    positions: HashMap<Uuid, usize>,
    direction: SortDirection,
}

impl RankIndex {
    /// `reference_order` must be sorted the same way as the page it will rank.
    #[must_use]
    pub fn new(reference_order: &[Uuid], direction: SortDirection) -> Self {
        let positions = reference_order
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position))
            .collect();
        Self {
            positions,
            direction,
        }
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn rank_of(&self, id: &Uuid) -> Option<Rank> {
        let position = *self.positions.get(id)?;
        let rank = match self.direction {
            SortDirection::Asc => position,
            SortDirection::Desc => self.len() - 1 - position,
        };
        Rank::try_from(rank).ok()
    }
}

/// Ranks a flat page. Returns how many items could not be found in the index.
pub fn assign_ranks<T: Ranked>(items: &mut [T], index: &RankIndex) -> usize {
    let mut missing = 0;
    for item in items.iter_mut() {
        let rank = index.rank_of(&item.id());
        if rank.is_none() {
            missing += 1;
        }
        item.set_rank(rank);
    }
    if missing > 0 {
        // the reference query ran on a newer snapshot than the page query
        tracing::warn!(missing, "Items missing from the reference order, left unranked");
    }
    missing
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildRankPolicy {
    /// Replies are ranked among the replies of the same parent, oldest first.
    #[default]
    Sibling,
    /// Roots and replies are ranked together in the ordered list of every
    /// item of the scope.
    Global,
}

/// The rank domain of a forest. Every node of one forest is ranked in
/// exactly one of them, so two nodes never share a rank.
pub enum ForestRanking<'a> {
    /// Roots through the root-only index, replies by their position under
    /// their parent.
    Sibling { roots: &'a RankIndex },
    /// Roots and replies through one index covering both.
    Global(&'a RankIndex),
}

#[derive(Debug, Clone)]
struct Node<T> {
    item: T,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Items with at most one level of children, stored flat.
#[derive(Debug, Clone)]
pub struct Forest<T> {
    nodes: Vec<Node<T>>,
    roots: Vec<usize>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<T> Forest<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_root(&mut self, item: T) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(Node {
            item,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(slot);
        slot
    }

    /// Children are kept in insertion order. Returns `None` when `parent` is
    /// unknown or is itself a child: nesting stops at one level.
    pub fn push_child(&mut self, parent: usize, item: T) -> Option<usize> {
        if self.nodes.get(parent)?.parent.is_some() {
            return None;
        }
        let slot = self.nodes.len();
        self.nodes.push(Node {
            item,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(slot);
        Some(slot)
    }

    pub fn roots(&self) -> impl Iterator<Item = &T> {
        self.roots.iter().map(|slot| &self.nodes[*slot].item)
    }

    pub fn root_slots(&self) -> &[usize] {
        &self.roots
    }

    pub fn children(&self, slot: usize) -> impl Iterator<Item = &T> {
        self.nodes
            .get(slot)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|child| &self.nodes[*child].item)
    }

    pub fn item(&self, slot: usize) -> Option<&T> {
        self.nodes.get(slot).map(|node| &node.item)
    }
}

/// Ranks every node of the forest without recursion.
///
/// Returns how many nodes were left unranked.
pub fn assign_forest_ranks<T: Ranked>(
    forest: &mut Forest<T>,
    ranking: &ForestRanking<'_>,
) -> usize {
    let root_index = match ranking {
        ForestRanking::Sibling { roots } => *roots,
        ForestRanking::Global(index) => *index,
    };
    let mut missing = 0;
    let mut stack: Vec<(usize, Option<Rank>)> = forest
        .roots
        .iter()
        .rev()
        .map(|&slot| (slot, root_index.rank_of(&forest.nodes[slot].item.id())))
        .collect();

    while let Some((slot, rank)) = stack.pop() {
        if rank.is_none() {
            missing += 1;
        }
        forest.nodes[slot].item.set_rank(rank);

        let node = &forest.nodes[slot];
        for (position, &child) in node.children.iter().enumerate().rev() {
            let child_rank = match ranking {
                ForestRanking::Global(index) => index.rank_of(&forest.nodes[child].item.id()),
                // position among siblings, in insertion order
                ForestRanking::Sibling { .. } => Rank::try_from(position).ok(),
            };
            stack.push((child, child_rank));
        }
    }

    if missing > 0 {
        tracing::warn!(missing, "Nodes missing from the reference order, left unranked");
    }
    missing
}
