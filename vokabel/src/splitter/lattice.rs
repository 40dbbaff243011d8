//! Segmentation lattice for compound splitting.
//!
//! Nodes are stored by their end position. Every node keeps the best
//! predecessor found when it was inserted, so the best segmentation is read
//! by walking back from the end of the word.

use crate::config::SplitPolicy;

const INVALID_IDX: u16 = u16::MAX;

/// Linking morphemes, longest first within each initial letter.
pub(crate) const LINKS: &[&str] = &["es", "en", "e", "s", "n"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum NodeKind {
    Bos,
    /// A stem; the value is its id in the stem lexicon.
    Stem(u32),
    Link,
    LeadingFraction,
    TrailingFraction,
}

impl NodeKind {
    /// Returns `true` if a node of kind `self` may precede a node of kind `next`.
    #[inline(always)]
    fn precedes(self, next: Self) -> bool {
        match next {
            Self::Stem(_) => matches!(
                self,
                Self::Bos | Self::Stem(_) | Self::Link | Self::LeadingFraction
            ),
            Self::Link | Self::TrailingFraction => matches!(self, Self::Stem(_)),
            Self::LeadingFraction => matches!(self, Self::Bos),
            Self::Bos => false,
        }
    }

    #[inline(always)]
    pub fn is_stem(self) -> bool {
        matches!(self, Self::Stem(_))
    }

    #[inline(always)]
    fn is_component(self) -> bool {
        matches!(
            self,
            Self::Stem(_) | Self::LeadingFraction | Self::TrailingFraction
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub start: usize,
    min_idx: u16,
    components: u32,
    cost: u64,
    penalty: u64,
}

impl Node {
    #[inline(always)]
    fn key(&self) -> (u32, u64) {
        (self.components, self.cost.saturating_add(self.penalty))
    }
}

/// A node on the best path, with its end position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PathNode {
    pub kind: NodeKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Default)]
pub(crate) struct Lattice {
    ends: Vec<Vec<Node>>,
    len_char: usize,
}

impl Lattice {
    pub fn reset(&mut self, len_char: usize) {
        for v in self.ends.iter_mut() {
            v.clear();
        }
        if self.ends.len() < len_char + 1 {
            self.ends.resize_with(len_char + 1, Vec::new);
        }
        self.len_char = len_char;
        self.ends[0].push(Node {
            kind: NodeKind::Bos,
            start: 0,
            min_idx: INVALID_IDX,
            components: 0,
            cost: 0,
            penalty: 0,
        });
    }

    #[inline(always)]
    pub fn has_previous_node(&self, i: usize) -> bool {
        self.ends.get(i).is_some_and(|d| !d.is_empty())
    }

    /// Finds the best predecessor of a `kind` node starting at `start`.
    ///
    /// Ties keep the node inserted first, which makes the result depend only
    /// on the fixed insertion order.
    fn search_min_node(&self, start: usize, kind: NodeKind) -> Option<(u16, &Node)> {
        let mut best: Option<(u16, &Node)> = None;
        for (i, left) in self.ends[start].iter().enumerate() {
            if !left.kind.precedes(kind) {
                continue;
            }
            if best.is_none_or(|(_, b)| left.key() < b.key()) {
                best = Some((u16::try_from(i).ok()?, left));
            }
        }
        best
    }

    /// Inserts a node spanning `start..end`.
    ///
    /// # Arguments
    ///
    /// * `cost` - Cost of a stem, aggregated with the predecessor's cost.
    /// * `penalty` - Cost added on top of the aggregated stem costs.
    pub fn insert_node(
        &mut self,
        start: usize,
        end: usize,
        kind: NodeKind,
        cost: u64,
        penalty: u64,
        policy: &SplitPolicy,
    ) {
        debug_assert!(start < end && end <= self.len_char);
        let Some((min_idx, left)) = self.search_min_node(start, kind) else {
            return;
        };
        let node = Node {
            kind,
            start,
            min_idx,
            components: left.components + u32::from(kind.is_component()),
            cost: if matches!(kind, NodeKind::Stem(_)) {
                policy.aggregation.combine(left.cost, cost)
            } else {
                left.cost
            },
            penalty: left.penalty.saturating_add(penalty),
        };
        self.ends[end].push(node);
    }

    /// Returns the best complete path from the beginning to the end of the word.
    pub fn best_path(&self) -> Option<Vec<PathNode>> {
        let mut best: Option<(usize, &Node)> = None;
        for (i, node) in self.ends[self.len_char].iter().enumerate() {
            if !matches!(node.kind, NodeKind::Stem(_) | NodeKind::TrailingFraction) {
                continue;
            }
            if best.is_none_or(|(_, b)| node.key() < b.key()) {
                best = Some((i, node));
            }
        }
        let (mut idx, _) = best?;

        let mut path = vec![];
        let mut end = self.len_char;
        loop {
            let node = &self.ends[end][idx];
            if node.kind == NodeKind::Bos {
                break;
            }
            path.push(PathNode {
                kind: node.kind,
                start: node.start,
                end,
            });
            (end, idx) = (node.start, usize::from(node.min_idx));
        }
        path.reverse();
        Some(path)
    }
}
