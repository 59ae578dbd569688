//! Shared prefix tree over rule tokens.
//!
//! Every node is keyed from its parent by a `(kind, token)` pair; the token
//! is empty unless the kind is `ExactMatch`. The four anchor kinds live
//! directly under the tree root and open sub-tries with distinct matching
//! semantics. Nodes are created lazily on insertion and never removed, so
//! lookups can run concurrently with insertions under the per-node
//! readers-writer lock.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::tokenizer::is_separator_token;
use crate::types::{NodeKind, ParsedRule, RuleModifiers};

/// Identifies a child edge within a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    kind: NodeKind,
    token: String,
}

impl NodeKey {
    /// Key of a root-level anchor node. The token is empty; the kind alone
    /// selects the sub-trie.
    pub(crate) fn anchor(kind: NodeKind) -> Self {
        Self {
            kind,
            token: String::new(),
        }
    }

    pub(crate) fn exact(token: &str) -> Self {
        Self {
            kind: NodeKind::ExactMatch,
            token: token.to_owned(),
        }
    }

    pub(crate) fn separator() -> Self {
        Self::anchor(NodeKind::Separator)
    }

    pub(crate) fn wildcard() -> Self {
        Self::anchor(NodeKind::Wildcard)
    }
}

/// A trie node.
///
/// `terminal` is populated at most once, when a rule ends here; readers
/// that observe the rule mark also observe the modifiers stored with it.
#[derive(Debug)]
pub(crate) struct Node {
    children: RwLock<HashMap<NodeKey, Arc<Node>>>,
    terminal: OnceCell<Option<RuleModifiers>>,
}

impl Node {
    pub(crate) fn new() -> Self {
        Self {
            children: RwLock::new(HashMap::new()),
            terminal: OnceCell::new(),
        }
    }

    pub(crate) fn find_child(&self, key: &NodeKey) -> Option<Arc<Node>> {
        self.children.read().get(key).map(Arc::clone)
    }

    /// Look up `key`, inserting a fresh node when absent. The write lock is
    /// held only for the insertion itself, and a child inserted by a
    /// concurrent writer is reused, never replaced.
    fn find_or_add_child(&self, key: NodeKey) -> Arc<Node> {
        {
            let children = self.children.read();
            if let Some(child) = children.get(&key) {
                return Arc::clone(child);
            }
        }
        let mut children = self.children.write();
        Arc::clone(
            children
                .entry(key)
                .or_insert_with(|| Arc::new(Node::new())),
        )
    }

    fn mark_rule(&self, modifiers: Option<RuleModifiers>) {
        // First write wins; re-inserting the same rule is a no-op.
        let _ = self.terminal.set(modifiers);
    }

    pub(crate) fn is_rule(&self) -> bool {
        self.terminal.get().is_some()
    }

    #[cfg(test)]
    pub(crate) fn modifiers(&self) -> Option<&RuleModifiers> {
        self.terminal.get().and_then(|modifiers| modifiers.as_ref())
    }

    /// Insert a parsed rule below this (root) node: descend into the anchor
    /// sub-trie, then one step per token, then mark the terminal.
    pub(crate) fn insert(&self, rule: &ParsedRule<'_>) {
        let mut node = self.find_or_add_child(NodeKey::anchor(rule.anchor));
        for token in &rule.tokens {
            node = match *token {
                "^" => node.find_or_add_child(NodeKey::separator()),
                "*" => node.find_or_add_child(NodeKey::wildcard()),
                token => node.find_or_add_child(NodeKey::exact(token)),
            };
        }
        node.mark_rule(rule.modifiers.clone());
    }

    /// Match `tokens` against the sub-trie rooted at `node`.
    ///
    /// Returns the terminal rule node and the remaining token suffix, or
    /// `None`. A terminal node is accepted greedily, without trying to
    /// extend the match. The separator and wildcard steps report the
    /// *caller's* suffix rather than their own: the hostname phase needs to
    /// see a consumed `.` to resume at the next label boundary.
    pub(crate) fn match_tokens<'t>(
        node: &Arc<Node>,
        tokens: &'t [&'t str],
    ) -> Option<(Arc<Node>, &'t [&'t str])> {
        if node.is_rule() {
            return Some((Arc::clone(node), tokens));
        }

        let Some((first, rest)) = tokens.split_first() else {
            // "^" also accepts the end of the address.
            let separator = node.find_child(&NodeKey::separator())?;
            if separator.is_rule() {
                return Some((separator, tokens));
            }
            return None;
        };

        if is_separator_token(first) {
            if let Some(separator) = node.find_child(&NodeKey::separator()) {
                if let Some((found, _)) = Self::match_tokens(&separator, rest) {
                    return Some((found, tokens));
                }
            }
        }

        if let Some(wildcard) = node.find_child(&NodeKey::wildcard()) {
            if let Some((found, _)) = Self::match_tokens(&wildcard, rest) {
                return Some((found, tokens));
            }
        }

        let child = node.find_child(&NodeKey::exact(first))?;
        Self::match_tokens(&child, rest)
    }

    /// Number of nodes in this sub-tree, itself included.
    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        1 + self
            .children
            .read()
            .values()
            .map(|child| child.node_count())
            .sum::<usize>()
    }
}
