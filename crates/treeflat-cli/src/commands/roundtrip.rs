use crate::support::{EXIT_CODEC, codec_or_exit, print_json_or_exit, read_json_or_exit, yes_no};
use serde_json::json;
use treeflat_codec::json::to_host_json;
use treeflat_codec::{CodecConfig, Decoder, Encoder};

pub fn run(input: String, config: CodecConfig, json_output: bool) {
    let host = read_json_or_exit(&input);
    let flattened = codec_or_exit(Encoder::new(config).flatten(&host));
    let leaf_count = flattened.leaves.len();
    let rebuilt = codec_or_exit(
        Decoder::new(config).unflatten(flattened.leaves, &flattened.descriptor),
    );
    let matches = to_host_json(&rebuilt) == host;
    tracing::debug!(matches, leaf_count, "round trip compared");

    if json_output {
        print_json_or_exit(&json!({
            "descriptor": flattened.descriptor,
            "leafCount": leaf_count,
            "volatile": flattened.volatile,
            "matches": matches,
        }));
    } else {
        println!("treeflat roundtrip");
        println!("  Input: {input}");
        println!("  Descriptor: {}", flattened.descriptor);
        println!("  Matches: {}", yes_no(matches));
    }

    if !matches {
        std::process::exit(EXIT_CODEC);
    }
}
