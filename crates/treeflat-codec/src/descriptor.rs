//! The descriptor grammar shared by the encoder and the decoder.
//!
//! A descriptor is an ASCII string over `()[]rnv`:
//!
//! ```text
//! node  := tuple | list | leaf
//! tuple := '(' node* ')'
//! list  := '[' node* ']'
//! leaf  := 'r' | 'n' | 'v'
//! ```
//!
//! A well-formed descriptor parses to exactly one `node` with nothing
//! after it. Structure is self-delimiting, so a descriptor can be stored
//! or sent as an opaque byte string next to its leaf list.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-leaf classification carried in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafTag {
    /// `r`: requires marking, not volatile.
    Marked,
    /// `n`: does not require marking, not volatile.
    Unmarked,
    /// `v`: volatile, regardless of marking.
    Volatile,
}

impl LeafTag {
    /// Classify a leaf given the aggregate volatility seen so far.
    pub fn classify(requires_marking: bool, volatile_so_far: bool) -> Self {
        if volatile_so_far {
            LeafTag::Volatile
        } else if requires_marking {
            LeafTag::Marked
        } else {
            LeafTag::Unmarked
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            LeafTag::Marked => b'r',
            LeafTag::Unmarked => b'n',
            LeafTag::Volatile => b'v',
        }
    }
}

/// One symbol of the descriptor alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorToken {
    TupleOpen,
    TupleClose,
    ListOpen,
    ListClose,
    Leaf(LeafTag),
}

impl DescriptorToken {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'(' => Some(DescriptorToken::TupleOpen),
            b')' => Some(DescriptorToken::TupleClose),
            b'[' => Some(DescriptorToken::ListOpen),
            b']' => Some(DescriptorToken::ListClose),
            b'r' => Some(DescriptorToken::Leaf(LeafTag::Marked)),
            b'n' => Some(DescriptorToken::Leaf(LeafTag::Unmarked)),
            b'v' => Some(DescriptorToken::Leaf(LeafTag::Volatile)),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            DescriptorToken::TupleOpen => b'(',
            DescriptorToken::TupleClose => b')',
            DescriptorToken::ListOpen => b'[',
            DescriptorToken::ListClose => b']',
            DescriptorToken::Leaf(tag) => tag.as_byte(),
        }
    }

    /// The closer that terminates this opener, if it is one.
    fn closer(self) -> Option<Self> {
        match self {
            DescriptorToken::TupleOpen => Some(DescriptorToken::TupleClose),
            DescriptorToken::ListOpen => Some(DescriptorToken::ListClose),
            _ => None,
        }
    }
}

/// A validated shape descriptor.
///
/// Values of this type are always well-formed: they are either produced by
/// the encoder or accepted by [`Descriptor::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Descriptor(String);

impl Descriptor {
    /// Parse and validate descriptor text against the grammar.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        validate(text.as_bytes())?;
        Ok(Self(text.to_string()))
    }

    /// Start an empty descriptor for the encoder to fill.
    pub(crate) fn building() -> Self {
        Self(String::new())
    }

    pub(crate) fn push(&mut self, token: DescriptorToken) {
        self.0.push(char::from(token.as_byte()));
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the descriptor symbols in order.
    pub fn tokens(&self) -> impl Iterator<Item = DescriptorToken> + '_ {
        self.0.bytes().filter_map(DescriptorToken::from_byte)
    }

    /// Number of leaf symbols (`r`, `n`, `v`).
    pub fn leaf_count(&self) -> usize {
        self.tokens()
            .filter(|token| matches!(token, DescriptorToken::Leaf(_)))
            .count()
    }

    /// Whether any leaf is tagged volatile.
    pub fn is_volatile(&self) -> bool {
        self.0.contains('v')
    }

    /// Deepest bracket nesting level; a lone leaf has depth 0.
    pub fn max_depth(&self) -> usize {
        let mut depth = 0usize;
        let mut deepest = 0usize;
        for token in self.tokens() {
            match token {
                DescriptorToken::TupleOpen | DescriptorToken::ListOpen => {
                    depth += 1;
                    deepest = deepest.max(depth);
                }
                DescriptorToken::TupleClose | DescriptorToken::ListClose => {
                    depth = depth.saturating_sub(1);
                }
                DescriptorToken::Leaf(_) => {}
            }
        }
        deepest
    }

    /// Retag the leading run of `r`/`n` leaves as `v`.
    ///
    /// The scan stops at the first leaf already tagged `v`: once the encoder
    /// has seen a volatile leaf every later leaf is tagged `v`, so only the
    /// prefix before it can hold stale tags. Returns how many leaves were
    /// retagged.
    pub fn mark_all_volatile(&mut self) -> usize {
        let mut rewritten = String::with_capacity(self.0.len());
        let mut retagged = 0usize;
        let mut stopped = false;
        for ch in self.0.chars() {
            if !stopped {
                match ch {
                    'r' | 'n' => {
                        rewritten.push('v');
                        retagged += 1;
                        continue;
                    }
                    'v' => stopped = true,
                    _ => {}
                }
            }
            rewritten.push(ch);
        }
        self.0 = rewritten;
        retagged
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Descriptor {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Descriptor {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(value.as_bytes())?;
        Ok(Self(value))
    }
}

impl From<Descriptor> for String {
    fn from(value: Descriptor) -> Self {
        value.0
    }
}

impl AsRef<str> for Descriptor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn malformed(offset: usize, reason: impl Into<String>) -> CodecError {
    CodecError::MalformedDescriptor {
        offset,
        reason: reason.into(),
    }
}

fn validate(bytes: &[u8]) -> Result<(), CodecError> {
    if bytes.is_empty() {
        return Err(malformed(0, "empty descriptor"));
    }

    let mut open: Vec<DescriptorToken> = Vec::new();
    let mut complete = false;
    for (offset, &byte) in bytes.iter().enumerate() {
        if complete {
            return Err(malformed(offset, "trailing characters after top-level node"));
        }
        let token = DescriptorToken::from_byte(byte).ok_or_else(|| {
            malformed(
                offset,
                format!("unexpected character {:?}", char::from(byte)),
            )
        })?;
        match token {
            DescriptorToken::TupleOpen | DescriptorToken::ListOpen => open.push(token),
            DescriptorToken::TupleClose | DescriptorToken::ListClose => match open.pop() {
                Some(opener) if opener.closer() == Some(token) => {}
                Some(opener) => {
                    return Err(malformed(
                        offset,
                        format!(
                            "{:?} closes a container opened with {:?}",
                            char::from(byte),
                            char::from(opener.as_byte())
                        ),
                    ));
                }
                None => {
                    return Err(malformed(
                        offset,
                        format!("unmatched {:?}", char::from(byte)),
                    ));
                }
            },
            DescriptorToken::Leaf(_) => {}
        }
        if open.is_empty() {
            complete = true;
        }
    }

    if !open.is_empty() {
        return Err(malformed(
            bytes.len(),
            format!("{} unterminated container(s)", open.len()),
        ));
    }
    Ok(())
}
