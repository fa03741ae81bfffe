//! Treeflat CLI: the `treeflat` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Flatten { input, json } => commands::flatten::run(input, config, json),

        Commands::Unflatten {
            leaves,
            descriptor,
            json,
        } => commands::unflatten::run(leaves, descriptor, config, json),

        Commands::Inspect { descriptor, json } => commands::inspect::run(descriptor, json),

        Commands::Roundtrip { input, json } => commands::roundtrip::run(input, config, json),
    }
}
