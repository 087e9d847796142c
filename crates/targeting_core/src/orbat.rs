//! Order-of-battle tree with lazy expansion.
//!
//! Units arrive as a flat list linked by `parent_id`. [`OrbatTree::build`]
//! indexes children by parent in one pass, so producing the visible rows is
//! linear in the number of visible nodes.
//!
//! The source data is expected to be a forest, but that is only promised
//! by the backend. The tree therefore classifies what it was given:
//! - units whose parent is missing are *orphans*
//! - units whose parent chain loops are *cycle members*
//!
//! Neither is reachable from a root, so neither is rendered. Both are
//! reported so callers can flag the data instead of hiding it.

use std::collections::{HashMap, HashSet};

use crate::types::{Affiliation, Unit};

/// A unit positioned in the rendered tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeRow<'a> {
    /// Unit identifier
    pub id: &'a str,
    /// The unit itself
    pub unit: &'a Unit,
    /// Indentation level, roots are 0
    pub depth: usize,
    /// Whether the unit has any children
    pub has_children: bool,
    /// Whether the unit is currently expanded
    pub expanded: bool,
}

/// Set of expanded unit ids. Empty by default, so every node starts
/// collapsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandedSet {
    ids: HashSet<String>,
}

impl ExpandedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is expanded.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip the expansion state of `id` and return the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Expand `id`.
    pub fn expand(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    /// Collapse `id`.
    pub fn collapse(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Collapse everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of expanded ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Outcome of walking from a unit up to its root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AncestorWalk<'a> {
    /// The chain reached a root. Ancestors are listed nearest first.
    Root(Vec<&'a str>),
    /// The chain stopped at a unit whose parent does not exist.
    Orphaned {
        /// Ancestors visited before stopping, nearest first
        ancestors: Vec<&'a str>,
        /// The parent id that could not be found
        missing: &'a str,
    },
    /// The chain revisited a unit.
    Cycle {
        /// Ancestors visited before the repeat, nearest first
        ancestors: Vec<&'a str>,
        /// The first id seen twice
        repeated: &'a str,
    },
    /// The starting id is not in the tree.
    UnknownNode,
}

impl<'a> AncestorWalk<'a> {
    /// Ancestors visited, nearest first. Empty for an unknown node.
    pub fn ancestors(&self) -> &[&'a str] {
        match self {
            AncestorWalk::Root(ancestors)
            | AncestorWalk::Orphaned { ancestors, .. }
            | AncestorWalk::Cycle { ancestors, .. } => ancestors,
            AncestorWalk::UnknownNode => &[],
        }
    }

    /// Whether the walk ended at a root.
    pub fn is_complete(&self) -> bool {
        matches!(self, AncestorWalk::Root(_))
    }
}

/// Indexed order-of-battle forest.
#[derive(Clone, Debug, Default)]
pub struct OrbatTree {
    units: Vec<Unit>,
    index: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
    duplicates: Vec<String>,
    orphans: Vec<usize>,
    cycle_members: Vec<usize>,
}

impl OrbatTree {
    /// Index a flat unit list.
    ///
    /// Sibling order follows input order. When an id occurs more than once
    /// the first occurrence is kept and the id is listed in
    /// [`OrbatTree::duplicates`].
    pub fn build(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut tree = Self::default();

        for unit in units {
            if tree.index.contains_key(&unit.id) {
                tree.duplicates.push(unit.id);
                continue;
            }
            let pos = tree.units.len();
            tree.index.insert(unit.id.clone(), pos);
            if let Some(parent) = &unit.parent_id {
                tree.children.entry(parent.clone()).or_default().push(pos);
            }
            tree.units.push(unit);
        }

        tree.orphans = tree
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| {
                u.parent_id
                    .as_deref()
                    .is_some_and(|p| !tree.index.contains_key(p))
            })
            .map(|(pos, _)| pos)
            .collect();

        tree.cycle_members = tree.find_cycle_members();
        tree
    }

    /// Positions of units lying on a parent cycle.
    fn find_cycle_members(&self) -> Vec<usize> {
        let reachable = self.reachable_from_roots();
        let mut on_cycle: HashSet<usize> = HashSet::new();
        let mut settled: HashSet<usize> = HashSet::new();

        for start in 0..self.units.len() {
            if reachable.contains(&start) || settled.contains(&start) {
                continue;
            }
            // Walk up until something repeats or the chain leaves the tree.
            let mut path: Vec<usize> = Vec::new();
            let mut seen: HashSet<usize> = HashSet::new();
            let mut current = Some(start);
            while let Some(pos) = current {
                if settled.contains(&pos) {
                    break;
                }
                if !seen.insert(pos) {
                    let loop_start = path.iter().position(|p| *p == pos).unwrap_or_default();
                    on_cycle.extend(path[loop_start..].iter().copied());
                    break;
                }
                path.push(pos);
                current = self.parent_pos(pos);
            }
            settled.extend(path);
        }

        let mut members: Vec<usize> = on_cycle.into_iter().collect();
        members.sort_unstable();
        members
    }

    fn reachable_from_roots(&self) -> HashSet<usize> {
        let mut reachable = HashSet::new();
        let mut stack: Vec<usize> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_root())
            .map(|(pos, _)| pos)
            .collect();
        while let Some(pos) = stack.pop() {
            if reachable.insert(pos) {
                stack.extend(self.child_positions(&self.units[pos].id).iter().copied());
            }
        }
        reachable
    }

    fn parent_pos(&self, pos: usize) -> Option<usize> {
        self.units[pos]
            .parent_id
            .as_deref()
            .and_then(|p| self.index.get(p).copied())
    }

    fn child_positions(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the tree has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Look up a unit by id.
    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.index.get(id).map(|pos| &self.units[*pos])
    }

    /// All units in input order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Roots of the given affiliation, in input order.
    pub fn roots(&self, affiliation: Affiliation) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.is_root() && u.affiliation == affiliation)
    }

    /// Direct children of `id`, in input order.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &Unit> {
        self.child_positions(id).iter().map(|pos| &self.units[*pos])
    }

    /// Whether `id` has at least one child.
    pub fn has_children(&self, id: &str) -> bool {
        !self.child_positions(id).is_empty()
    }

    /// Ids that appeared more than once in the input.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Units whose parent does not exist.
    pub fn orphans(&self) -> impl Iterator<Item = &Unit> {
        self.orphans.iter().map(|pos| &self.units[*pos])
    }

    /// Units whose parent chain loops back on itself.
    pub fn cycle_members(&self) -> impl Iterator<Item = &Unit> {
        self.cycle_members.iter().map(|pos| &self.units[*pos])
    }

    /// Whether the input was a well-formed forest.
    pub fn is_well_formed(&self) -> bool {
        self.orphans.is_empty() && self.cycle_members.is_empty() && self.duplicates.is_empty()
    }

    /// Rows to render for one affiliation, depth-first in sibling order.
    ///
    /// Children are emitted only below expanded units.
    pub fn visible_rows(&self, affiliation: Affiliation, expanded: &ExpandedSet) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, usize)> = self
            .units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_root() && u.affiliation == affiliation)
            .map(|(pos, _)| (pos, 0))
            .collect();
        stack.reverse();

        while let Some((pos, depth)) = stack.pop() {
            let unit = &self.units[pos];
            let kids = self.child_positions(&unit.id);
            let is_expanded = expanded.contains(&unit.id);
            rows.push(TreeRow {
                id: &unit.id,
                unit,
                depth,
                has_children: !kids.is_empty(),
                expanded: is_expanded,
            });
            if is_expanded {
                stack.extend(kids.iter().rev().map(|child| (*child, depth + 1)));
            }
        }

        rows
    }

    /// Ids of `id` and every unit below it.
    pub fn subtree_ids(&self, id: &str) -> Vec<&str> {
        let Some(start) = self.index.get(id).copied() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            if !seen.insert(pos) {
                continue;
            }
            let unit = &self.units[pos];
            out.push(unit.id.as_str());
            stack.extend(self.child_positions(&unit.id).iter().rev().copied());
        }
        out
    }

    /// Walk from `id` towards its root.
    ///
    /// Stops at a missing parent or at the first repeated id instead of
    /// looping.
    pub fn ancestors(&self, id: &str) -> AncestorWalk<'_> {
        let Some(start) = self.index.get(id).copied() else {
            return AncestorWalk::UnknownNode;
        };

        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([start]);
        let mut pos = start;

        loop {
            let Some(parent_id) = self.units[pos].parent_id.as_deref() else {
                return AncestorWalk::Root(ancestors);
            };
            let Some(parent_pos) = self.index.get(parent_id).copied() else {
                return AncestorWalk::Orphaned {
                    ancestors,
                    missing: parent_id,
                };
            };
            if !seen.insert(parent_pos) {
                return AncestorWalk::Cycle {
                    ancestors,
                    repeated: &self.units[parent_pos].id,
                };
            }
            ancestors.push(self.units[parent_pos].id.as_str());
            pos = parent_pos;
        }
    }

    /// Expand every ancestor of `id` so that it becomes visible.
    ///
    /// Ancestors found before an orphan or cycle stop are still expanded.
    /// The walk is returned so callers can report a broken chain.
    pub fn expand_path_to<'a>(&'a self, expanded: &mut ExpandedSet, id: &str) -> AncestorWalk<'a> {
        let walk = self.ancestors(id);
        for ancestor in walk.ancestors() {
            expanded.expand(ancestor);
        }
        walk
    }

    /// Expand every unit that has children.
    pub fn expand_all(&self, expanded: &mut ExpandedSet) {
        for unit in &self.units {
            if self.has_children(&unit.id) {
                expanded.expand(&unit.id);
            }
        }
    }
}
