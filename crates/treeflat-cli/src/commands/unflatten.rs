use crate::support::{codec_or_exit, print_json_or_exit, read_json_or_exit};
use serde_json::json;
use treeflat_codec::json::{host_leaves, to_host_json};
use treeflat_codec::{CodecConfig, Decoder};

pub fn run(leaves: String, descriptor: String, config: CodecConfig, json_output: bool) {
    let raw = read_json_or_exit(&leaves);
    let leaf_objects = codec_or_exit(host_leaves(&raw));
    let supplied = leaf_objects.len();
    let tree = codec_or_exit(Decoder::new(config).unflatten_str(leaf_objects, &descriptor));
    let rendered = to_host_json(&tree);

    if json_output {
        print_json_or_exit(&json!({
            "descriptor": descriptor,
            "leafCount": supplied,
            "tree": rendered,
        }));
        return;
    }

    println!("treeflat unflatten");
    println!("  Leaves: {leaves} ({supplied})");
    println!("  Descriptor: {descriptor}");
    println!("  Tree: {rendered}");
}
