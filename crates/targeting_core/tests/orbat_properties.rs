//! Property tests for the ORBAT tree.
//!
//! Forests are generated so that every parent index is smaller than its
//! child's, which guarantees acyclic input.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use targeting_core::orbat::{ExpandedSet, OrbatTree, TreeRow};
use targeting_core::types::{Affiliation, Unit};

/// (parent choice, is_blue) per node; parent choice is reduced modulo the
/// node index, with `None` making a root.
fn forest_strategy() -> impl Strategy<Value = Vec<Unit>> {
    prop::collection::vec((prop::option::of(any::<usize>()), any::<bool>()), 1..40).prop_map(|shape| {
        shape.iter()
            .enumerate()
            .map(|(i, (parent, is_blue))| {
                let parent_id = match parent {
                    Some(p) if i > 0 => Some(format!("u{}", p % i)),
                    _ => None,
                };
                let affiliation = if *is_blue { Affiliation::Blue } else { Affiliation::Red };
                Unit::new(format!("u{}", i), format!("Unit {}", i), parent_id.as_deref(), affiliation)
            })
            .collect()
    })
}

fn all_rows<'a>(tree: &'a OrbatTree, expanded: &ExpandedSet) -> Vec<TreeRow<'a>> {
    let mut rows = tree.visible_rows(Affiliation::Blue, expanded);
    rows.extend(tree.visible_rows(Affiliation::Red, expanded));
    rows
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn every_unit_rendered_once_when_fully_expanded(units in forest_strategy()) {
        let tree = OrbatTree::build(units.clone());
        prop_assert!(tree.is_well_formed());

        let mut expanded = ExpandedSet::new();
        tree.expand_all(&mut expanded);
        let rows = all_rows(&tree, &expanded);

        prop_assert_eq!(rows.len(), units.len());
        let distinct: HashSet<&str> = rows.iter().map(|r| r.id).collect();
        prop_assert_eq!(distinct.len(), units.len());
    }

    #[test]
    fn rows_nest_strictly_under_their_parent(units in forest_strategy()) {
        let tree = OrbatTree::build(units);
        let mut expanded = ExpandedSet::new();
        tree.expand_all(&mut expanded);

        for affiliation in [Affiliation::Blue, Affiliation::Red] {
            let rows = tree.visible_rows(affiliation, &expanded);
            // Track the most recent row seen at each depth.
            let mut open: Vec<&str> = Vec::new();
            for row in &rows {
                open.truncate(row.depth);
                match row.unit.parent_id.as_deref() {
                    None => prop_assert_eq!(row.depth, 0),
                    Some(parent) => {
                        prop_assert!(row.depth >= 1);
                        prop_assert_eq!(open.last().copied(), Some(parent));
                    }
                }
                open.push(row.id);
            }
        }
    }

    #[test]
    fn toggling_only_affects_own_subtree(
        units in forest_strategy(),
        expanded_mask in prop::collection::vec(any::<bool>(), 40),
        pick in any::<prop::sample::Index>(),
    ) {
        let tree = OrbatTree::build(units.clone());
        let mut expanded = ExpandedSet::new();
        for (unit, on) in units.iter().zip(expanded_mask) {
            if on {
                expanded.expand(&unit.id);
            }
        }

        let target = &units[pick.index(units.len())].id;
        let subtree: HashSet<&str> = tree.subtree_ids(target).into_iter().collect();

        let outside = |rows: &[TreeRow<'_>]| -> Vec<(String, usize)> {
            rows.iter()
                .filter(|r| !subtree.contains(r.id))
                .map(|r| (r.id.to_string(), r.depth))
                .collect()
        };

        let before = all_rows(&tree, &expanded);
        let mut toggled = expanded.clone();
        toggled.toggle(target);
        let after = all_rows(&tree, &toggled);

        prop_assert_eq!(outside(&before), outside(&after));

        // The toggled node itself keeps its position and depth.
        let depth_of = |rows: &[TreeRow<'_>]| -> HashMap<String, usize> {
            rows.iter().map(|r| (r.id.to_string(), r.depth)).collect()
        };
        let depths_before = depth_of(&before);
        let depths_after = depth_of(&after);
        prop_assert_eq!(depths_before.get(target.as_str()), depths_after.get(target.as_str()));
    }

    #[test]
    fn ancestor_walk_reaches_root_for_forests(units in forest_strategy()) {
        let tree = OrbatTree::build(units.clone());
        for unit in &units {
            let mut expanded = ExpandedSet::new();
            let walk = tree.expand_path_to(&mut expanded, &unit.id);
            prop_assert!(walk.is_complete());

            let rows = all_rows(&tree, &expanded);
            prop_assert!(rows.iter().any(|r| r.id == unit.id));
        }
    }
}
