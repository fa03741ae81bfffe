//! The encoder: nested structure in, leaf list plus descriptor out.

use crate::config::CodecConfig;
use crate::descriptor::{Descriptor, DescriptorToken, LeafTag};
use crate::error::CodecError;
use crate::node::{LeafToken, Shape, Structured};
use serde::Serialize;

/// Output of one flatten call.
///
/// `leaves` borrows from the input tree, in pre-order. `volatile` is true
/// iff some leaf is volatile, in which case every leaf in `descriptor` is
/// tagged `v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flattened<'a, L> {
    pub leaves: Vec<&'a L>,
    pub descriptor: Descriptor,
    pub volatile: bool,
}

/// Flatten with the default configuration.
pub fn flatten<S: Structured>(root: &S) -> Result<Flattened<'_, S::Leaf>, CodecError> {
    Encoder::default().flatten(root)
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn flatten<'a, S: Structured>(
        &self,
        root: &'a S,
    ) -> Result<Flattened<'a, S::Leaf>, CodecError> {
        let mut walk = Walk::new(self.config.max_depth);
        walk.visit(root)?;

        let Walk {
            leaves,
            mut descriptor,
            volatile,
            ..
        } = walk;

        // Leaves seen before the first volatile one were tagged with a
        // stale flag.
        if volatile {
            let retagged = descriptor.mark_all_volatile();
            tracing::trace!(retagged, "volatility fixup");
        }

        tracing::debug!(
            leaves = leaves.len(),
            descriptor = %descriptor,
            volatile,
            "flattened structure"
        );
        Ok(Flattened {
            leaves,
            descriptor,
            volatile,
        })
    }
}

/// Traversal state threaded through the recursion.
struct Walk<'a, S: Structured> {
    leaves: Vec<&'a S::Leaf>,
    descriptor: Descriptor,
    volatile: bool,
    path: Vec<usize>,
    max_depth: usize,
}

impl<'a, S: Structured> Walk<'a, S> {
    fn new(max_depth: usize) -> Self {
        Self {
            leaves: Vec::new(),
            descriptor: Descriptor::building(),
            volatile: false,
            path: Vec::new(),
            max_depth,
        }
    }

    fn visit(&mut self, node: &'a S) -> Result<(), CodecError> {
        match node.shape() {
            Shape::Tuple(children) => self.visit_container(
                children,
                DescriptorToken::TupleOpen,
                DescriptorToken::TupleClose,
            ),
            Shape::List(children) => self.visit_container(
                children,
                DescriptorToken::ListOpen,
                DescriptorToken::ListClose,
            ),
            Shape::Leaf(leaf) => {
                self.leaves.push(leaf);
                let tag = LeafTag::classify(leaf.requires_marking(), self.volatile);
                self.descriptor.push(DescriptorToken::Leaf(tag));
                if leaf.is_volatile() {
                    self.volatile = true;
                }
                Ok(())
            }
            Shape::Unsupported(type_name) => Err(CodecError::UnsupportedStructure {
                type_name,
                path: self.path.clone(),
            }),
        }
    }

    fn visit_container(
        &mut self,
        children: &'a [S],
        open: DescriptorToken,
        close: DescriptorToken,
    ) -> Result<(), CodecError> {
        if self.path.len() + 1 > self.max_depth {
            return Err(CodecError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.descriptor.push(open);
        for (idx, child) in children.iter().enumerate() {
            self.path.push(idx);
            let visited = self.visit(child);
            self.path.pop();
            visited?;
        }
        self.descriptor.push(close);
        Ok(())
    }
}
