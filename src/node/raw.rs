//! Zero-copy parsing of encoded nodes, used wherever only the bytes of a node
//! are available (proof verification, proof compression).

use super::{Digest, BRANCH_TAG, BRANCH_WIDTH, EXTENSION_TAG, LEAF_TAG};
use crate::ProofError;

/// A node parsed out of its canonical encoding. Child nodes are only known by
/// their digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode<'a> {
    Leaf {
        key: &'a [u8],
        value: &'a [u8],
    },
    Extension {
        key: &'a [u8],
        child: Digest,
    },
    Branch {
        children: [Digest; BRANCH_WIDTH],
        terminal: &'a [u8],
    },
}

impl<'a> RawNode<'a> {
    /// Parses `bytes` as exactly one encoded node. Unknown tags, short buffers
    /// and trailing bytes are all [`ProofError::InvalidEncoding`].
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ProofError> {
        let mut reader = Reader(bytes);
        let node = match reader.byte()? {
            LEAF_TAG => {
                let key = reader.prefixed()?;
                let value = reader.prefixed()?;
                Self::Leaf { key, value }
            }
            EXTENSION_TAG => {
                let key = reader.prefixed()?;
                let child = reader.digest()?;
                Self::Extension { key, child }
            }
            BRANCH_TAG => {
                let mut children = [[0; 32]; BRANCH_WIDTH];
                for child in children.iter_mut() {
                    *child = reader.digest()?;
                }
                let terminal = reader.prefixed()?;
                Self::Branch { children, terminal }
            }
            _ => return Err(ProofError::InvalidEncoding),
        };
        if !reader.0.is_empty() {
            return Err(ProofError::InvalidEncoding);
        }
        Ok(node)
    }
}

struct Reader<'a>(&'a [u8]);

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], ProofError> {
        if self.0.len() < len {
            return Err(ProofError::InvalidEncoding);
        }
        let (head, tail) = self.0.split_at(len);
        self.0 = tail;
        Ok(head)
    }

    fn byte(&mut self) -> Result<u8, ProofError> {
        Ok(self.take(1)?[0])
    }

    /// A run of bytes preceded by its 1-byte length.
    fn prefixed(&mut self) -> Result<&'a [u8], ProofError> {
        let len = self.byte()? as usize;
        self.take(len)
    }

    fn digest(&mut self) -> Result<Digest, ProofError> {
        let mut digest = [0; 32];
        digest.copy_from_slice(self.take(32)?);
        Ok(digest)
    }
}

#[cfg(test)]
mod test {
    use sha2::Sha256;

    use super::RawNode;
    use crate::node::{Branch, Extension, Leaf, Node};
    use crate::ProofError;

    #[test]
    fn test_parse_leaf() {
        let leaf = Leaf::try_new(&[1, 2], b"value").unwrap();
        assert_eq!(
            RawNode::parse(&leaf.encode()),
            Ok(RawNode::Leaf {
                key: &[1, 2],
                value: b"value"
            })
        );
    }

    #[test]
    fn test_parse_extension() {
        let child = Node::Branch(Branch::new());
        let child_hash = child.hash::<Sha256>();
        let encoded = Extension::new(vec![7u8].try_into().unwrap(), child).encode::<Sha256>();
        assert_eq!(
            RawNode::parse(&encoded),
            Ok(RawNode::Extension {
                key: &[7],
                child: child_hash
            })
        );
    }

    #[test]
    fn test_parse_branch() {
        let mut branch = Branch::new();
        let child = Node::Leaf(Leaf::try_new(&[], b"c").unwrap());
        let child_hash = child.hash::<Sha256>();
        branch.set_child(9, child);
        branch.set_terminal(b"t".to_vec().try_into().unwrap());
        let encoded = branch.encode::<Sha256>();
        let Ok(RawNode::Branch { children, terminal }) = RawNode::parse(&encoded) else {
            panic!("expected a branch");
        };
        assert_eq!(children[9], child_hash);
        assert_eq!(children[0], [0; 32]);
        assert_eq!(terminal, b"t");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(RawNode::parse(&[]), Err(ProofError::InvalidEncoding));
        assert_eq!(RawNode::parse(&[0]), Err(ProofError::InvalidEncoding));
        assert_eq!(RawNode::parse(&[9, 0, 0]), Err(ProofError::InvalidEncoding));
        // key length runs past the buffer
        assert_eq!(RawNode::parse(&[1, 5, 1]), Err(ProofError::InvalidEncoding));
        // extension without its child digest
        assert_eq!(RawNode::parse(&[2, 1, 3]), Err(ProofError::InvalidEncoding));
        // branch cut short
        assert_eq!(
            RawNode::parse(&[3; 100]),
            Err(ProofError::InvalidEncoding)
        );
        // trailing garbage
        let mut encoded = Leaf::try_new(&[1], b"v").unwrap().encode();
        encoded.push(0);
        assert_eq!(RawNode::parse(&encoded), Err(ProofError::InvalidEncoding));
    }
}
