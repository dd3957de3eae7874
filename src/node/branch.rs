use std::fmt::Display;

use super::{Digest, Hasher, Node, ShortBytes, BRANCH_TAG, EMPTY_DIGEST};

/// Number of child slots of a branch, one per nibble value.
pub const BRANCH_WIDTH: usize = 16;

/// A branch is a node with up to 16 children, indexed by the next nibble of
/// the key, plus an optional terminal value for a key ending exactly here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Branch {
    children: [Option<Box<Node>>; BRANCH_WIDTH],
    terminal: Option<ShortBytes>,
}

impl Branch {
    /// Creates a branch with no children and no terminal value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the child at `index`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a nibble.
    pub fn child(&self, index: u8) -> Option<&Node> {
        self.children[index as usize].as_deref()
    }

    pub fn children(&self) -> &[Option<Box<Node>>; BRANCH_WIDTH] {
        &self.children
    }

    /// Places `node` at `index`. An [`Node::Empty`] clears the slot.
    pub fn set_child(&mut self, index: u8, node: Node) {
        self.children[index as usize] = match node {
            Node::Empty => None,
            node => Some(Box::new(node)),
        };
    }

    /// Detaches the child at `index`, leaving the slot empty.
    pub(crate) fn take_child(&mut self, index: u8) -> Node {
        self.children[index as usize]
            .take()
            .map_or(Node::Empty, |child| *child)
    }

    pub fn terminal(&self) -> Option<&[u8]> {
        self.terminal.as_deref()
    }

    /// Sets the value of the key ending at this branch. An empty value encodes
    /// exactly like an absent one, so it clears the terminal.
    pub fn set_terminal(&mut self, value: ShortBytes) {
        self.terminal = if value.is_empty() { None } else { Some(value) };
    }

    /// `tag || 16 * child_digest || terminal_len || terminal`
    ///
    /// Absent children are written as [`EMPTY_DIGEST`].
    pub fn encode<H: Hasher>(&self) -> Vec<u8> {
        let terminal = self.terminal.as_deref().unwrap_or_default();
        let mut encoded = Vec::with_capacity(2 + BRANCH_WIDTH * 32 + terminal.len());
        encoded.push(BRANCH_TAG);
        for child in self.children.iter() {
            match child {
                Some(child) => encoded.extend_from_slice(&child.hash::<H>()),
                None => encoded.extend_from_slice(&EMPTY_DIGEST),
            }
        }
        encoded.push(self.terminal.as_ref().map_or(0, ShortBytes::len_byte));
        encoded.extend_from_slice(terminal);
        encoded
    }

    pub fn hash<H: Hasher>(&self) -> Digest {
        H::hash(&self.encode::<H>())
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots: String = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.is_some())
            .map(|(index, _)| format!("{:x}", index))
            .collect();
        write!(
            f,
            "Branch {{ children: [{}], terminal: {} }}",
            slots,
            self.terminal.as_deref().map(hex::encode).unwrap_or_default()
        )
    }
}
