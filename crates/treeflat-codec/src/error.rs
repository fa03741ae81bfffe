//! Error types for codec operations.

/// Errors arising from flattening, unflattening, or descriptor parsing.
///
/// All variants are terminal: no partial result is produced and nothing is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The encoder met a value that is neither a tuple, a list, nor a leaf.
    #[error(
        "only tuples, lists and leaf tokens are supported as inputs, but got {type_name} at {}",
        render_path(.path)
    )]
    UnsupportedStructure {
        type_name: String,
        /// Child-index path from the root to the offending value.
        path: Vec<usize>,
    },

    /// The descriptor asked for more leaves than were supplied.
    #[error("not enough leaves given to unflatten: descriptor requests {requested}, got {supplied}")]
    DescriptorUnderflow { requested: usize, supplied: usize },

    /// Leaves remained after the top-level node was rebuilt.
    #[error("too many leaves given to unflatten: descriptor requests {expected}, got {supplied}")]
    TrailingLeaves { expected: usize, supplied: usize },

    /// The descriptor text does not follow the descriptor grammar.
    #[error("malformed descriptor at byte {offset}: {reason}")]
    MalformedDescriptor { offset: usize, reason: String },

    /// Nesting went deeper than the configured bound.
    #[error("nesting depth exceeds configured limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

/// Errors from loading a [`crate::CodecConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn render_path(path: &[usize]) -> String {
    if path.is_empty() {
        return "root".to_string();
    }
    let segments: Vec<String> = path.iter().map(|idx| idx.to_string()).collect();
    format!("root/{}", segments.join("/"))
}
