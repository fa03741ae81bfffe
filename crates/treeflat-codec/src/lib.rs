//! # Treeflat Codec
//!
//! A structural flatten/unflatten codec. A nested tree of tuples and lists
//! with leaf tokens at the terminals is split into
//!
//! - the leaves, in pre-order,
//! - a descriptor string recording the shape plus one tag per leaf,
//! - an aggregate volatility flag;
//!
//! and rebuilt from the leaves and the descriptor alone.
//!
//! ## Architecture
//!
//! ```text
//! Structured / StructureNode   ← caller-classified tree (tuple | list | leaf)
//!     │
//! Encoder::flatten             ← pre-order walk + volatility fixup
//!     │
//! Flattened                    ← leaves + Descriptor + volatile flag
//!     │
//! Decoder::unflatten           ← lockstep recursive descent
//!     │
//! StructureNode                ← same shape, same leaves
//! ```
//!
//! Both directions are pure and keep all state local to one call, so they
//! can run concurrently on independent inputs.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod flatten;
pub mod json;
pub mod node;
pub mod unflatten;

pub use config::CodecConfig;
pub use descriptor::{Descriptor, DescriptorToken, LeafTag};
pub use error::{CodecError, ConfigError};
pub use flatten::{Encoder, Flattened, flatten};
pub use node::{Leaf, LeafToken, Shape, StructureNode, Structured};
pub use unflatten::{Decoder, unflatten, unflatten_str};
