use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use treeflat_codec::{CodecConfig, CodecError};

pub const EXIT_CODEC: i32 = 1;
pub const EXIT_INPUT: i32 = 2;

pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_config_or_exit(path: Option<&str>) -> CodecConfig {
    let Some(path) = path else {
        return CodecConfig::default();
    };
    CodecConfig::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(EXIT_INPUT);
    })
}

pub fn read_json_or_exit(path: &str) -> Value {
    let path = Path::new(path);
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        std::process::exit(EXIT_INPUT);
    });
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse json {}: {e}", path.display());
        std::process::exit(EXIT_INPUT);
    })
}

pub fn codec_or_exit<T>(result: Result<T, CodecError>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(EXIT_CODEC);
    })
}

pub fn print_json_or_exit(payload: &Value) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|e| {
        eprintln!("error: failed to render json: {e}");
        std::process::exit(EXIT_INPUT);
    });
    println!("{rendered}");
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
