use crate::support::{codec_or_exit, print_json_or_exit, read_json_or_exit, yes_no};
use serde_json::{Value, json};
use treeflat_codec::json::leaf_var;
use treeflat_codec::{CodecConfig, Encoder};

pub fn run(input: String, config: CodecConfig, json_output: bool) {
    let host = read_json_or_exit(&input);
    let flattened = codec_or_exit(Encoder::new(config).flatten(&host));

    if json_output {
        let payload = json!({
            "descriptor": flattened.descriptor,
            "volatile": flattened.volatile,
            "leafCount": flattened.leaves.len(),
            "leaves": flattened
                .leaves
                .iter()
                .map(|leaf| Value::Object((*leaf).clone()))
                .collect::<Vec<_>>(),
        });
        print_json_or_exit(&payload);
        return;
    }

    let vars: Vec<&str> = flattened
        .leaves
        .iter()
        .map(|leaf| leaf_var(leaf).unwrap_or("?"))
        .collect();
    println!("treeflat flatten");
    println!("  Input: {input}");
    println!("  Leaves: {}", vars.join(", "));
    println!("  Descriptor: {}", flattened.descriptor);
    println!("  Volatile: {}", yes_no(flattened.volatile));
}
