//! Core Merkle Patricia Trie implementation

use std::fmt::Debug;
use std::marker::PhantomData;

use log::trace;
use sha2::Sha256;

use crate::{
    nibbles::{common_prefix, to_nibbles},
    node::{Branch, Digest, Extension, Hasher, Leaf, Node, ShortBytes},
    Proof, TrieError,
};

/// Merkle Patricia Trie.
/// * `H` - Hasher that will be used to hash nodes.
///
/// The trie owns its whole node tree. Mutation goes through `&mut self`, so
/// sharing it across threads needs the usual exclusive-writer discipline
/// (e.g. an `RwLock`).
pub struct MPT<H: Hasher = Sha256> {
    root: Node,
    _phantom: PhantomData<fn() -> H>,
}

impl<H: Hasher> MPT<H> {
    /// Creates an empty trie. Its root hash is [`crate::EMPTY_DIGEST`].
    pub fn new() -> Self {
        Self::from_root(Node::Empty)
    }

    /// Wraps an externally built node tree. No structural validation is done.
    pub fn from_root(root: Node) -> Self {
        Self {
            root,
            _phantom: PhantomData,
        }
    }

    /// Root node of the trie.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Replaces the whole tree, e.g. when restoring a snapshot. The new root is
    /// trusted as is: a malformed tree gives meaningless hashes and proofs.
    pub fn set_root(&mut self, root: Node) {
        self.root = root;
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Digest committing to every key/value pair in the trie.
    pub fn root_hash(&self) -> Digest {
        self.root.hash::<H>()
    }

    /// Inserts `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`TrieError::LengthOverflow`] when the value is longer than
    /// 255 bytes or the key longer than 255 nibbles. The trie is left untouched
    /// in that case.
    ///
    /// An empty value is stored as is while its key sits in a leaf. Once a
    /// longer key splits that leaf, the key ends at a branch, where an empty
    /// terminal encodes like no terminal at all: the key becomes absent for
    /// [`MPT::get`] and [`MPT::prove`].
    pub fn update(&mut self, key: &[u8], value: &[u8]) -> Result<(), TrieError> {
        let nibbles = to_nibbles(key);
        if nibbles.len() > ShortBytes::MAX_LEN {
            return Err(TrieError::LengthOverflow { len: nibbles.len() });
        }
        let value = ShortBytes::try_from(value)?;
        let root = std::mem::take(&mut self.root);
        self.root = insert(root, &nibbles, value);
        Ok(())
    }

    /// Applies [`MPT::update`] to every pair, in iteration order. Stops at the
    /// first failing pair; the pairs applied before it stay applied.
    pub fn sync_states<K, V>(
        &mut self,
        states: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), TrieError>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        for (key, value) in states {
            self.update(key.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.walk_down(key, |_| {}).ok()
    }

    /// Walk down the trie from the root along the nibbles of `key`.
    /// * `for_each` - Closure executed on every non-empty node of the path,
    ///   root first, before descending into it.
    ///
    /// Returns the value the path ends at.
    pub fn walk_down(
        &self,
        key: &[u8],
        mut for_each: impl FnMut(&Node),
    ) -> Result<&[u8], TrieError> {
        let nibbles = to_nibbles(key);
        let mut remaining = nibbles.as_slice();
        let mut current = &self.root;
        loop {
            if current.is_empty() {
                trace!("walk_down: reached an empty node");
                return Err(TrieError::KeyNotFound);
            }
            trace!("walk_down: visiting {}", current);
            for_each(current);
            match current {
                Node::Empty => return Err(TrieError::KeyNotFound),
                Node::Leaf(leaf) => {
                    return if leaf.key() == remaining {
                        Ok(leaf.value())
                    } else {
                        Err(TrieError::KeyNotFound)
                    };
                }
                Node::Extension(extension) => {
                    let shared = common_prefix(extension.key(), remaining);
                    if shared != extension.key().len() {
                        return Err(TrieError::KeyNotFound);
                    }
                    remaining = &remaining[shared..];
                    current = extension.child();
                }
                Node::Branch(branch) => match remaining.split_first() {
                    None => return branch.terminal().ok_or(TrieError::KeyNotFound),
                    Some((&index, rest)) => {
                        current = branch.child(index).ok_or(TrieError::KeyNotFound)?;
                        remaining = rest;
                    }
                },
            }
        }
    }

    /// Builds the inclusion proof of `key`: the encoding of every node on its
    /// path, root first.
    pub fn prove(&self, key: &[u8]) -> Result<Proof, TrieError> {
        let mut nodes = Vec::new();
        self.walk_down(key, |node| nodes.push(node.encode::<H>()))?;
        Ok(Proof::new(nodes))
    }
}

impl<H: Hasher> Default for MPT<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hasher> Clone for MPT<H> {
    fn clone(&self) -> Self {
        Self::from_root(self.root.clone())
    }
}

impl<H: Hasher> Debug for MPT<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MPT")
            .field("root_hash", &hex::encode(self.root_hash()))
            .finish()
    }
}

/// Inserts `value` below `node` under the remaining nibbles `key` and returns
/// the node replacing it.
fn insert(node: Node, key: &[u8], value: ShortBytes) -> Node {
    match node {
        Node::Empty => Node::Leaf(Leaf::new(ShortBytes::from_bounded(key), value)),
        Node::Leaf(mut leaf) => {
            if leaf.key() == key {
                leaf.set_value(value);
                return Node::Leaf(leaf);
            }
            let shared = common_prefix(leaf.key(), key);
            let (leaf_key, leaf_value) = leaf.into_parts();
            let mut branch = Branch::new();
            attach_value(&mut branch, &leaf_key[shared..], leaf_value);
            attach_value(&mut branch, &key[shared..], value);
            wrap_branch(&leaf_key[..shared], branch)
        }
        Node::Extension(mut extension) => {
            let shared = common_prefix(extension.key(), key);
            if shared == extension.key().len() {
                let child = std::mem::take(extension.child_mut());
                *extension.child_mut() = insert(child, &key[shared..], value);
                return Node::Extension(extension);
            }
            let (extension_key, child) = extension.into_parts();
            let mut branch = Branch::new();
            // Nonempty: the match stopped before the end of the extension key.
            let suffix = &extension_key[shared..];
            let moved = if suffix.len() == 1 {
                child
            } else {
                Node::Extension(Extension::new(ShortBytes::from_bounded(&suffix[1..]), child))
            };
            branch.set_child(suffix[0], moved);
            attach_value(&mut branch, &key[shared..], value);
            wrap_branch(&extension_key[..shared], branch)
        }
        Node::Branch(mut branch) => {
            match key.split_first() {
                None => branch.set_terminal(value),
                Some((&index, rest)) => {
                    let child = branch.take_child(index);
                    branch.set_child(index, insert(child, rest, value));
                }
            }
            Node::Branch(branch)
        }
    }
}

/// Stores `value` in a freshly split `branch`: as its terminal when `suffix`
/// is exhausted, otherwise as a leaf in the slot of the first nibble.
fn attach_value(branch: &mut Branch, suffix: &[u8], value: ShortBytes) {
    match suffix.split_first() {
        None => branch.set_terminal(value),
        Some((&index, rest)) => branch.set_child(
            index,
            Node::Leaf(Leaf::new(ShortBytes::from_bounded(rest), value)),
        ),
    }
}

/// Puts `branch` behind an extension on `prefix`, unless `prefix` is empty.
fn wrap_branch(prefix: &[u8], branch: Branch) -> Node {
    if prefix.is_empty() {
        Node::Branch(branch)
    } else {
        Node::Extension(Extension::new(
            ShortBytes::from_bounded(prefix),
            Node::Branch(branch),
        ))
    }
}
