//! The decoder: leaf list plus descriptor in, nested structure out.
//!
//! Two forward cursors advance in lockstep, one over descriptor bytes and
//! one over the leaves. Leaf tags only steer leaf consumption; they carry
//! nothing into the rebuilt tree.
//!
//! The decoder checks the grammar while it walks, so raw descriptor text
//! from outside the encoder is safe to feed in.

use crate::config::CodecConfig;
use crate::descriptor::{Descriptor, DescriptorToken};
use crate::error::CodecError;
use crate::node::StructureNode;
use std::iter::Peekable;

/// Unflatten with the default configuration.
pub fn unflatten<L>(
    leaves: impl IntoIterator<Item = L>,
    descriptor: &Descriptor,
) -> Result<StructureNode<L>, CodecError> {
    Decoder::default().unflatten(leaves, descriptor)
}

/// Unflatten raw descriptor text with the default configuration.
pub fn unflatten_str<L>(
    leaves: impl IntoIterator<Item = L>,
    descriptor: &str,
) -> Result<StructureNode<L>, CodecError> {
    Decoder::default().unflatten_str(leaves, descriptor)
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn unflatten<L>(
        &self,
        leaves: impl IntoIterator<Item = L>,
        descriptor: &Descriptor,
    ) -> Result<StructureNode<L>, CodecError> {
        self.decode(leaves.into_iter(), descriptor.as_bytes())
    }

    pub fn unflatten_str<L>(
        &self,
        leaves: impl IntoIterator<Item = L>,
        descriptor: &str,
    ) -> Result<StructureNode<L>, CodecError> {
        self.decode(leaves.into_iter(), descriptor.as_bytes())
    }

    fn decode<L, I>(&self, leaves: I, bytes: &[u8]) -> Result<StructureNode<L>, CodecError>
    where
        I: Iterator<Item = L>,
    {
        if bytes.is_empty() {
            return Err(malformed(0, "empty descriptor"));
        }

        let mut cursor = Cursor {
            bytes: bytes.iter().copied().enumerate().peekable(),
            leaves,
            consumed: 0,
            requested: bytes
                .iter()
                .filter(|&&b| matches!(b, b'r' | b'n' | b'v'))
                .count(),
            depth: 0,
            max_depth: self.config.max_depth,
            end: bytes.len(),
        };
        let root = cursor.node()?;

        if let Some((offset, _)) = cursor.bytes.next() {
            return Err(malformed(offset, "trailing characters after top-level node"));
        }

        let extra = cursor.leaves.count();
        if extra > 0 {
            if !self.config.allow_trailing_leaves {
                return Err(CodecError::TrailingLeaves {
                    expected: cursor.consumed,
                    supplied: cursor.consumed + extra,
                });
            }
            tracing::debug!(extra, "ignoring trailing leaves");
        }

        tracing::debug!(leaves = cursor.consumed, "unflattened structure");
        Ok(root)
    }
}

struct Cursor<B, I>
where
    B: Iterator<Item = (usize, u8)>,
{
    bytes: Peekable<B>,
    leaves: I,
    consumed: usize,
    requested: usize,
    depth: usize,
    max_depth: usize,
    end: usize,
}

impl<B, I, L> Cursor<B, I>
where
    B: Iterator<Item = (usize, u8)>,
    I: Iterator<Item = L>,
{
    fn node(&mut self) -> Result<StructureNode<L>, CodecError> {
        let Some((offset, byte)) = self.bytes.next() else {
            return Err(malformed(self.end, "unexpected end of descriptor"));
        };
        let token = DescriptorToken::from_byte(byte).ok_or_else(|| {
            malformed(offset, format!("unexpected character {:?}", char::from(byte)))
        })?;

        match token {
            DescriptorToken::TupleOpen => {
                Ok(StructureNode::Tuple(self.children(DescriptorToken::TupleClose)?))
            }
            DescriptorToken::ListOpen => {
                Ok(StructureNode::List(self.children(DescriptorToken::ListClose)?))
            }
            DescriptorToken::Leaf(_) => match self.leaves.next() {
                Some(leaf) => {
                    self.consumed += 1;
                    Ok(StructureNode::Leaf(leaf))
                }
                None => Err(CodecError::DescriptorUnderflow {
                    requested: self.requested,
                    supplied: self.consumed,
                }),
            },
            DescriptorToken::TupleClose | DescriptorToken::ListClose => Err(malformed(
                offset,
                format!("unmatched {:?}", char::from(byte)),
            )),
        }
    }

    fn children(
        &mut self,
        close: DescriptorToken,
    ) -> Result<Vec<StructureNode<L>>, CodecError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(CodecError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }

        let mut children = Vec::new();
        loop {
            match self.bytes.peek().copied() {
                Some((_, byte)) if byte == close.as_byte() => {
                    self.bytes.next();
                    self.depth -= 1;
                    return Ok(children);
                }
                Some((offset, byte @ (b')' | b']'))) => {
                    return Err(malformed(
                        offset,
                        format!(
                            "{:?} closes a container expecting {:?}",
                            char::from(byte),
                            char::from(close.as_byte())
                        ),
                    ));
                }
                Some(_) => children.push(self.node()?),
                None => {
                    return Err(malformed(self.end, "unterminated container"));
                }
            }
        }
    }
}

fn malformed(offset: usize, reason: impl Into<String>) -> CodecError {
    CodecError::MalformedDescriptor {
        offset,
        reason: reason.into(),
    }
}
