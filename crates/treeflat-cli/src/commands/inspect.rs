use crate::support::{codec_or_exit, print_json_or_exit, yes_no};
use serde_json::json;
use treeflat_codec::Descriptor;

pub fn run(descriptor: String, json_output: bool) {
    let parsed = codec_or_exit(Descriptor::parse(&descriptor));

    if json_output {
        print_json_or_exit(&json!({
            "descriptor": parsed,
            "leafCount": parsed.leaf_count(),
            "maxDepth": parsed.max_depth(),
            "volatile": parsed.is_volatile(),
        }));
        return;
    }

    println!("treeflat inspect");
    println!("  Descriptor: {parsed}");
    println!("  Leaves: {}", parsed.leaf_count());
    println!("  Max depth: {}", parsed.max_depth());
    println!("  Volatile: {}", yes_no(parsed.is_volatile()));
}
