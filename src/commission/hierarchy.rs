use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use super::domain::{Reseller, ResellerId};

/// Error raised when a hierarchy lookup assumed presence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("reseller '{0}' is not part of the hierarchy snapshot")]
    NotFound(ResellerId),
}

/// Immutable view of the reseller forest for the duration of one calculation
/// pass. Mutation between periods happens outside this crate; the engine only
/// ever reads.
#[derive(Debug, Clone, Default)]
pub struct HierarchySnapshot {
    nodes: BTreeMap<ResellerId, Reseller>,
}

impl HierarchySnapshot {
    pub fn from_nodes(nodes: impl IntoIterator<Item = Reseller>) -> Self {
        Self {
            nodes: nodes
                .into_iter()
                .map(|node| (node.id.clone(), node))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lookup for call sites that assume the member exists.
    pub fn get(&self, id: &ResellerId) -> Result<&Reseller, HierarchyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| HierarchyError::NotFound(id.clone()))
    }

    /// Lookup for call sites where a missing member legitimately means
    /// "no result", such as the engine's own precondition check.
    pub fn lookup(&self, id: &ResellerId) -> Option<&Reseller> {
        self.nodes.get(id)
    }

    /// Direct descendants in the node's stored child order. Child ids that do
    /// not resolve are skipped rather than treated as an error; repairing a
    /// broken edge is a data-management concern, not a traversal one.
    pub fn children(&self, id: &ResellerId) -> Vec<&Reseller> {
        self.lookup(id)
            .map(|node| {
                node.child_ids
                    .iter()
                    .filter_map(|child_id| self.lookup(child_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Walks parent links starting at the node's parent. The chain is
    /// expected to be acyclic; the seen-set keeps a corrupted snapshot from
    /// looping instead of terminating at a root.
    pub fn ancestors<'a>(&'a self, id: &ResellerId) -> Ancestors<'a> {
        Ancestors {
            snapshot: self,
            next: self.lookup(id).and_then(|node| node.parent_id.as_ref()),
            seen: HashSet::new(),
        }
    }

    /// First ancestor satisfying the predicate, or `None` once a root is
    /// reached without a match.
    pub fn walk_up<P>(&self, id: &ResellerId, predicate: P) -> Option<&Reseller>
    where
        P: Fn(&Reseller) -> bool,
    {
        self.ancestors(id).find(|node| predicate(node))
    }

    /// Counts members of the subtree below `id` (the node itself excluded)
    /// that satisfy the predicate. The visited set bounds the traversal to
    /// one visit per node, so even a cyclic snapshot yields a finite count.
    pub fn count_downline<P>(&self, id: &ResellerId, predicate: P) -> usize
    where
        P: Fn(&Reseller) -> bool,
    {
        let Some(root) = self.lookup(id) else {
            return 0;
        };

        let mut visited: HashSet<&ResellerId> = HashSet::new();
        visited.insert(&root.id);

        let mut stack: Vec<&ResellerId> = root.child_ids.iter().collect();
        let mut count = 0;

        while let Some(child_id) = stack.pop() {
            if !visited.insert(child_id) {
                continue;
            }
            let Some(child) = self.lookup(child_id) else {
                continue;
            };
            if predicate(child) {
                count += 1;
            }
            stack.extend(child.child_ids.iter());
        }

        count
    }

    pub fn roots(&self) -> impl Iterator<Item = &Reseller> {
        self.nodes.values().filter(|node| node.parent_id.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reseller> {
        self.nodes.values()
    }
}

pub struct Ancestors<'a> {
    snapshot: &'a HierarchySnapshot,
    next: Option<&'a ResellerId>,
    seen: HashSet<&'a ResellerId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Reseller;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        if !self.seen.insert(id) {
            return None;
        }
        let node = self.snapshot.lookup(id)?;
        self.next = node.parent_id.as_ref();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::domain::Rank;
    use chrono::NaiveDate;

    fn member(id: &str, rank: Rank, parent: Option<&str>, children: &[&str]) -> Reseller {
        Reseller {
            id: ResellerId::new(id),
            name: id.to_uppercase(),
            rank,
            parent_id: parent.map(ResellerId::new),
            child_ids: children.iter().copied().map(ResellerId::new).collect(),
            personal_volume: 0,
            group_volume: 0,
            active: true,
            join_date: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
            promotion_date: None,
        }
    }

    fn chain() -> HierarchySnapshot {
        HierarchySnapshot::from_nodes([
            member("root", Rank::BusinessDirector, None, &["mid"]),
            member("mid", Rank::IndependentBusinessOwner, Some("root"), &["leaf"]),
            member("leaf", Rank::BusinessPartner, Some("mid"), &[]),
        ])
    }

    #[test]
    fn get_reports_missing_members() {
        let snapshot = chain();
        let missing = ResellerId::new("ghost");
        assert_eq!(
            snapshot.get(&missing),
            Err(HierarchyError::NotFound(missing.clone()))
        );
        assert!(snapshot.lookup(&missing).is_none());
    }

    #[test]
    fn children_preserve_stored_order_and_skip_dangling_ids() {
        let snapshot = HierarchySnapshot::from_nodes([
            member("root", Rank::IndependentBusinessOwner, None, &["b", "ghost", "a"]),
            member("b", Rank::BusinessPartner, Some("root"), &[]),
            member("a", Rank::BusinessPartner, Some("root"), &[]),
        ]);

        let ids: Vec<&str> = snapshot
            .children(&ResellerId::new("root"))
            .iter()
            .map(|child| child.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn walk_up_finds_nearest_matching_ancestor() {
        let snapshot = chain();
        let found = snapshot
            .walk_up(&ResellerId::new("leaf"), |node| {
                node.rank == Rank::BusinessDirector
            })
            .expect("root matches");
        assert_eq!(found.id.as_str(), "root");
    }

    #[test]
    fn walk_up_returns_none_past_the_root() {
        let snapshot = chain();
        assert!(snapshot
            .walk_up(&ResellerId::new("leaf"), |node| node.group_volume > 0)
            .is_none());
        assert!(snapshot
            .walk_up(&ResellerId::new("root"), |_| true)
            .is_none());
    }

    #[test]
    fn count_downline_excludes_the_node_itself() {
        let snapshot = chain();
        let total = snapshot.count_downline(&ResellerId::new("root"), |_| true);
        assert_eq!(total, 2);
    }

    #[test]
    fn count_downline_terminates_on_cyclic_input() {
        // "a" and "b" list each other as children, violating the forest
        // invariant on purpose.
        let snapshot = HierarchySnapshot::from_nodes([
            member("a", Rank::IndependentBusinessOwner, None, &["b"]),
            member("b", Rank::IndependentBusinessOwner, Some("a"), &["a"]),
        ]);

        let count = snapshot.count_downline(&ResellerId::new("a"), |_| true);
        assert_eq!(count, 1);
    }

    #[test]
    fn ancestors_stop_on_a_parent_cycle() {
        let a = member("a", Rank::BusinessPartner, Some("b"), &[]);
        let b = member("b", Rank::BusinessPartner, Some("a"), &[]);
        let snapshot = HierarchySnapshot::from_nodes([a, b]);

        let walked: Vec<&str> = snapshot
            .ancestors(&ResellerId::new("a"))
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(walked, vec!["b", "a"]);
    }
}
