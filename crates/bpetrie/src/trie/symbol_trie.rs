//! # Arena Symbol Trie

use ahash::AHashMap;

use crate::{TokenType, vocab::SymbolVocab};

/// Index of a node in a [`SymbolTrie`].
pub type NodeId = usize;

/// A single trie node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieNode<T: TokenType> {
    parent: Option<NodeId>,
    children: AHashMap<char, NodeId>,
    token: Option<T>,
}

impl<T: TokenType> TrieNode<T> {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: AHashMap::new(),
            token: None,
        }
    }

    /// The parent node; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The child reached by `c`, if any.
    pub fn child(
        &self,
        c: char,
    ) -> Option<NodeId> {
        self.children.get(&c).copied()
    }

    /// The number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// The token of the symbol ending here, if this node is terminal.
    pub fn token(&self) -> Option<T> {
        self.token
    }

    /// Returns true if a vocabulary symbol ends at this node.
    pub fn is_terminal(&self) -> bool {
        self.token.is_some()
    }
}

/// Prefix tree over vocabulary symbols.
///
/// The character path from the root to any terminal node spells that node's symbol.
/// The root has no parent, and is never terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTrie<T: TokenType> {
    nodes: Vec<TrieNode<T>>,
}

impl<T: TokenType> Default for SymbolTrie<T> {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::new(None)],
        }
    }
}

impl<T: TokenType> SymbolTrie<T> {
    /// The root node id.
    pub const ROOT: NodeId = 0;

    /// Build a trie over every learned symbol of `vocab`.
    ///
    /// The unknown symbol (token 0) is not inserted; it never matches text.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(vocab)))]
    pub fn from_vocab(vocab: &SymbolVocab<T>) -> Self {
        let mut trie = Self::default();
        for (token, symbol) in vocab.learned() {
            trie.insert(symbol, token);
        }
        log::debug!(
            "built trie: {} nodes over {} symbols",
            trie.len(),
            vocab.len() - 1
        );
        trie
    }

    /// Insert `symbol -> token`.
    ///
    /// ## Panics
    /// If `symbol` is empty, or already present with a different token.
    pub fn insert(
        &mut self,
        symbol: &str,
        token: T,
    ) {
        assert!(!symbol.is_empty(), "cannot insert an empty symbol");

        let mut node = Self::ROOT;
        for c in symbol.chars() {
            node = match self.nodes[node].child(c) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::new(Some(node)));
                    self.nodes[node].children.insert(c, child);
                    child
                }
            };
        }

        let terminal = &mut self.nodes[node];
        if let Some(existing) = terminal.token {
            assert_eq!(
                existing, token,
                "symbol {symbol:?} inserted with conflicting tokens"
            );
        }
        terminal.token = Some(token);
    }

    /// The number of nodes, including the root.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by id.
    pub fn node(
        &self,
        id: NodeId,
    ) -> &TrieNode<T> {
        &self.nodes[id]
    }

    /// The child of `id` reached by `c`, if any.
    #[inline]
    pub fn child(
        &self,
        id: NodeId,
        c: char,
    ) -> Option<NodeId> {
        self.nodes[id].child(c)
    }

    /// The parent of `id`; `None` for the root.
    #[inline]
    pub fn parent(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// The terminal token of `id`, if any.
    #[inline]
    pub fn token(
        &self,
        id: NodeId,
    ) -> Option<T> {
        self.nodes[id].token
    }

    /// Walk `text` from the root; `None` if the path leaves the trie.
    pub fn find_node(
        &self,
        text: &str,
    ) -> Option<NodeId> {
        text.chars()
            .try_fold(Self::ROOT, |node, c| self.child(node, c))
    }

    /// Exact symbol lookup.
    pub fn lookup(
        &self,
        symbol: &str,
    ) -> Option<T> {
        self.find_node(symbol).and_then(|node| self.token(node))
    }

    /// Reconstruct the character path from the root to `id`.
    pub fn path(
        &self,
        id: NodeId,
    ) -> String {
        let mut chars: Vec<char> = Vec::new();
        let mut node = id;
        while let Some(parent) = self.parent(node) {
            let c = self.nodes[parent]
                .children
                .iter()
                .find_map(|(&c, &child)| (child == node).then_some(c))
                .expect("parent links to child");
            chars.push(c);
            node = parent;
        }
        chars.iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    fn vocab(items: &[&str]) -> SymbolVocab<u32> {
        SymbolVocab::assemble(items.iter().map(|&s| Symbol::from(s)), "<unk>").unwrap()
    }

    #[test]
    fn test_from_vocab() {
        let vocab = vocab(&["e", "s", "t", "es", "est", "t_", "_"]);
        let trie = SymbolTrie::from_vocab(&vocab);

        // root, e, s, t, es, est, t_, _
        assert_eq!(trie.len(), 8);
        assert!(!trie.node(SymbolTrie::<u32>::ROOT).is_terminal());
        assert_eq!(trie.parent(SymbolTrie::<u32>::ROOT), None);

        for (token, symbol) in vocab.learned() {
            assert_eq!(trie.lookup(symbol), Some(token));
            let node = trie.find_node(symbol).unwrap();
            assert_eq!(trie.path(node), symbol);
        }

        assert_eq!(trie.lookup("<unk>"), None);
        assert_eq!(trie.lookup("x"), None);
        assert_eq!(trie.lookup(""), None);
    }

    #[test]
    fn test_interior_nodes() {
        let vocab = vocab(&["a", "abcd"]);
        let trie = SymbolTrie::from_vocab(&vocab);

        let ab = trie.find_node("ab").unwrap();
        assert!(!trie.node(ab).is_terminal());
        assert_eq!(trie.node(ab).num_children(), 1);
        assert_eq!(trie.token(trie.parent(ab).unwrap()), vocab.lookup_token("a"));
        assert_eq!(trie.lookup("abc"), None);
    }

    #[test]
    fn test_deterministic() {
        let a = SymbolTrie::from_vocab(&vocab(&["x", "y", "xy", "yx"]));
        let b = SymbolTrie::from_vocab(&vocab(&["yx", "xy", "y", "x"]));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "conflicting tokens")]
    fn test_conflicting_insert() {
        let mut trie = SymbolTrie::<u32>::default();
        trie.insert("ab", 1);
        trie.insert("ab", 2);
    }
}
