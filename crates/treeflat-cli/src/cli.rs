use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "treeflat",
    about = "Treeflat: flatten nested tuple/list trees into leaves plus a shape descriptor",
    version
)]
pub struct Cli {
    /// Path to a codec config TOML (maxDepth, allowTrailingLeaves)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Emit debug logs on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten a host JSON tree into leaves, descriptor and volatility flag
    Flatten {
        /// Path to the host JSON tree
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild a host JSON tree from a leaf array and a descriptor
    Unflatten {
        /// Path to a JSON array of leaf objects
        leaves: String,

        /// Descriptor string, e.g. `(r[n])`
        #[arg(long, short)]
        descriptor: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a descriptor and summarize it
    Inspect {
        /// Descriptor string
        descriptor: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flatten then unflatten a host JSON tree and compare with the input
    Roundtrip {
        /// Path to the host JSON tree
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
