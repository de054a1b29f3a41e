//! Collapsed-section tree discovered incrementally from page captures.
//!
//! Each oracle interpretation step returns one root-to-leaf chain with at
//! most one child per level, so the "tree" is effectively a set of
//! independent chains keyed by top-level section label. Breadth only arises
//! across roots.

use serde::{Deserialize, Serialize};

/// A labeled, collapsible UI section discovered on the page.
///
/// `label` is the verbatim on-page text identifying the section and the key
/// used for merge within a sibling set (exact, case-sensitive equality).
/// Children are recorded in discovery order, not page order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedElement {
    pub label: String,
    #[serde(default)]
    pub children: Vec<CollapsedElement>,
}

impl CollapsedElement {
    pub fn new(label: impl Into<String>, children: Vec<CollapsedElement>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// A childless node; the fallback shape when an expand input fails to
    /// parse as a tree.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new())
    }

    /// Deepest node reachable by always following the first child.
    pub fn deepest(&self) -> &CollapsedElement {
        let mut current = self;
        while let Some(child) = current.children.first() {
            current = child;
        }
        current
    }

    /// Number of nodes along the first-child chain, root included.
    pub fn chain_len(&self) -> usize {
        let mut len = 1;
        let mut current = self;
        while let Some(child) = current.children.first() {
            len += 1;
            current = child;
        }
        len
    }

    /// Renders the first-child chain as `Root -> Child -> Leaf.`, the
    /// format the oracle receives as already-explored context.
    pub fn chain_path(&self) -> String {
        let mut path = self.label.clone();
        let mut current = self;
        while let Some(child) = current.children.first() {
            path.push_str(" -> ");
            path.push_str(&child.label);
            current = child;
        }
        path.push('.');
        path
    }
}

/// Bounded-fan-out tree of discovered sections, roots in insertion order.
///
/// Nodes are never deleted within a session; a root rediscovered under the
/// same label is superseded in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTree {
    roots: Vec<CollapsedElement>,
}

impl SectionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[CollapsedElement] {
        &self.roots
    }

    /// Folds a freshly discovered chain into the tree.
    ///
    /// If a root with the exact same label exists it is replaced entirely;
    /// the oracle reports the complete currently-known branch each time, so
    /// this is a full subtree replacement, not a deep merge. Otherwise the
    /// node is appended as a new root.
    pub fn upsert_root(&mut self, node: CollapsedElement) {
        match self.roots.iter_mut().find(|root| root.label == node.label) {
            Some(existing) => *existing = node,
            None => self.roots.push(node),
        }
    }
}
