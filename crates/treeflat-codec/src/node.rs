//! The structure model: nested tuples and lists with leaf tokens at the
//! terminals.
//!
//! Tuple and list are both ordered and may be empty or arbitrarily deep.
//! The distinction is purely structural, but it must survive a round trip.

use serde::{Deserialize, Serialize};

/// A leaf token as the codec sees it: an opaque value carrying two flags.
///
/// The codec never copies or mutates leaves. It reads both flags once,
/// during encoding, and otherwise only moves references around.
pub trait LeafToken {
    /// Whether the leaf requires marking (tagged `r` when not volatile).
    fn requires_marking(&self) -> bool;

    /// Whether the leaf is volatile. One volatile leaf makes the whole
    /// tree volatile.
    fn is_volatile(&self) -> bool;
}

impl<T: LeafToken + ?Sized> LeafToken for &T {
    fn requires_marking(&self) -> bool {
        (**self).requires_marking()
    }

    fn is_volatile(&self) -> bool {
        (**self).is_volatile()
    }
}

/// A concrete, caller-owned leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    pub id: String,
    #[serde(default)]
    pub requires_marking: bool,
    #[serde(default)]
    pub volatile: bool,
}

impl Leaf {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            requires_marking: false,
            volatile: false,
        }
    }

    pub fn marked(mut self) -> Self {
        self.requires_marking = true;
        self
    }

    pub fn volatile(mut self) -> Self {
        self.volatile = true;
        self
    }
}

impl LeafToken for Leaf {
    fn requires_marking(&self) -> bool {
        self.requires_marking
    }

    fn is_volatile(&self) -> bool {
        self.volatile
    }
}

/// A tree of tuples and lists over leaves of type `L`.
///
/// This is both the encoder's input and the decoder's output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureNode<L> {
    Leaf(L),
    Tuple(Vec<StructureNode<L>>),
    List(Vec<StructureNode<L>>),
}

impl<L> StructureNode<L> {
    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            StructureNode::Leaf(_) => 1,
            StructureNode::Tuple(children) | StructureNode::List(children) => {
                children.iter().map(StructureNode::leaf_count).sum()
            }
        }
    }

    /// Container nesting depth; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            StructureNode::Leaf(_) => 0,
            StructureNode::Tuple(children) | StructureNode::List(children) => {
                1 + children.iter().map(StructureNode::depth).max().unwrap_or(0)
            }
        }
    }

    /// Leaves in pre-order, left to right.
    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::with_capacity(self.leaf_count());
        collect_leaves(self, &mut out);
        out
    }

    /// Rebuild the same shape with every leaf transformed by `f`.
    pub fn map_leaves<M>(self, f: &mut impl FnMut(L) -> M) -> StructureNode<M> {
        match self {
            StructureNode::Leaf(leaf) => StructureNode::Leaf(f(leaf)),
            StructureNode::Tuple(children) => {
                StructureNode::Tuple(children.into_iter().map(|c| c.map_leaves(f)).collect())
            }
            StructureNode::List(children) => {
                StructureNode::List(children.into_iter().map(|c| c.map_leaves(f)).collect())
            }
        }
    }
}

fn collect_leaves<'a, L>(node: &'a StructureNode<L>, out: &mut Vec<&'a L>) {
    match node {
        StructureNode::Leaf(leaf) => out.push(leaf),
        StructureNode::Tuple(children) | StructureNode::List(children) => {
            for child in children {
                collect_leaves(child, out);
            }
        }
    }
}

/// The structural view of one value, as classified by its owner.
#[derive(Debug)]
pub enum Shape<'a, S, L> {
    Tuple(&'a [S]),
    List(&'a [S]),
    Leaf(&'a L),
    /// Anything else; carries the observed type name for diagnostics.
    Unsupported(String),
}

/// A value the encoder can walk.
///
/// Implementors supply the three-way tuple/list/leaf classification.
/// Values that fit none of them report [`Shape::Unsupported`], which the
/// encoder turns into an error.
pub trait Structured: Sized {
    type Leaf: LeafToken;

    fn shape(&self) -> Shape<'_, Self, Self::Leaf>;
}

impl<L: LeafToken> Structured for StructureNode<L> {
    type Leaf = L;

    fn shape(&self) -> Shape<'_, Self, L> {
        match self {
            StructureNode::Leaf(leaf) => Shape::Leaf(leaf),
            StructureNode::Tuple(children) => Shape::Tuple(children),
            StructureNode::List(children) => Shape::List(children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StructureNode<Leaf> {
        StructureNode::Tuple(vec![
            StructureNode::Leaf(Leaf::new("a").marked()),
            StructureNode::List(vec![StructureNode::Leaf(Leaf::new("b").volatile())]),
            StructureNode::Tuple(Vec::new()),
            StructureNode::Leaf(Leaf::new("c")),
        ])
    }

    #[test]
    fn counts_and_depth() {
        let tree = sample();
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(StructureNode::Leaf(Leaf::new("x")).depth(), 0);
    }

    #[test]
    fn leaves_in_preorder() {
        let tree = sample();
        let ids: Vec<&str> = tree.leaves().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn map_leaves_keeps_shape() {
        let mapped = sample().map_leaves(&mut |leaf: Leaf| leaf.id);
        assert_eq!(
            mapped,
            StructureNode::Tuple(vec![
                StructureNode::Leaf("a".to_string()),
                StructureNode::List(vec![StructureNode::Leaf("b".to_string())]),
                StructureNode::Tuple(Vec::new()),
                StructureNode::Leaf("c".to_string()),
            ])
        );
    }

    #[test]
    fn serde_uses_external_tags() {
        let tree = StructureNode::List(vec![StructureNode::Leaf(Leaf::new("a"))]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "list": [{"leaf": {"id": "a", "requiresMarking": false, "volatile": false}}]
            })
        );
    }
}
