use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "treeflat-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_treeflat<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_treeflat");
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("treeflat command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec_pretty(value).expect("json should render"))
        .expect("json fixture should be written");
}

fn sample_tree() -> Value {
    json!({"tuple": [
        {"var": "a", "requiresMarking": true},
        [{"var": "b", "volatile": true}],
        {"var": "c"},
    ]})
}

#[test]
fn flatten_json_reports_descriptor_and_leaves() {
    let tmp = TempDirGuard::new("flatten-json");
    let input = tmp.path().join("tree.json");
    write_json(&input, &sample_tree());

    let output = run_treeflat([
        OsStr::new("flatten"),
        input.as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["descriptor"], "(v[v]v)");
    assert_eq!(payload["volatile"], true);
    assert_eq!(payload["leafCount"], 3);
    assert_eq!(payload["leaves"][1]["var"], "b");
}

#[test]
fn flatten_text_output() {
    let tmp = TempDirGuard::new("flatten-text");
    let input = tmp.path().join("tree.json");
    write_json(&input, &json!([{"var": "x", "requiresMarking": true}, {"var": "y"}]));

    let output = run_treeflat([OsStr::new("flatten"), input.as_os_str()]);
    assert_success(&output);

    let stdout = stdout_text(&output);
    assert!(stdout.contains("Leaves: x, y"), "{stdout}");
    assert!(stdout.contains("Descriptor: [rn]"), "{stdout}");
    assert!(stdout.contains("Volatile: no"), "{stdout}");
}

#[test]
fn flatten_rejects_unsupported_values() {
    let tmp = TempDirGuard::new("flatten-unsupported");
    let input = tmp.path().join("tree.json");
    write_json(&input, &json!({"tuple": [{"var": "x"}, "oops"]}));

    let output = run_treeflat([OsStr::new("flatten"), input.as_os_str()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_text(&output);
    assert!(stderr.contains("but got string at root/1"), "{stderr}");
}

#[test]
fn unflatten_rebuilds_tree() {
    let tmp = TempDirGuard::new("unflatten");
    let leaves = tmp.path().join("leaves.json");
    write_json(&leaves, &json!([{"var": "a"}, {"var": "b"}]));

    let output = run_treeflat([
        OsStr::new("unflatten"),
        leaves.as_os_str(),
        OsStr::new("--descriptor"),
        OsStr::new("(n[n])"),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(
        payload["tree"],
        json!({"tuple": [{"var": "a"}, [{"var": "b"}]]})
    );
}

#[test]
fn unflatten_underflow_fails() {
    let tmp = TempDirGuard::new("unflatten-underflow");
    let leaves = tmp.path().join("leaves.json");
    write_json(&leaves, &json!([]));

    let output = run_treeflat([
        OsStr::new("unflatten"),
        leaves.as_os_str(),
        OsStr::new("-d"),
        OsStr::new("rn"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr_text(&output).contains("not enough leaves given to unflatten"),
        "{}",
        stderr_text(&output)
    );
}

#[test]
fn inspect_summarizes_descriptor() {
    let output = run_treeflat(["inspect", "([r][n(v)])", "--json"]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["leafCount"], 3);
    assert_eq!(payload["maxDepth"], 3);
    assert_eq!(payload["volatile"], true);
}

#[test]
fn inspect_rejects_malformed_descriptor() {
    let output = run_treeflat(["inspect", "(r]"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr_text(&output).contains("malformed descriptor at byte 2"),
        "{}",
        stderr_text(&output)
    );
}

#[test]
fn roundtrip_matches_input() {
    let tmp = TempDirGuard::new("roundtrip");
    let input = tmp.path().join("tree.json");
    write_json(&input, &sample_tree());

    let output = run_treeflat([
        OsStr::new("roundtrip"),
        input.as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&output);
    assert_eq!(parse_json_stdout(&output)["matches"], true);
}

#[test]
fn config_depth_limit_applies() {
    let tmp = TempDirGuard::new("config");
    let input = tmp.path().join("tree.json");
    write_json(&input, &json!([[[{"var": "deep"}]]]));
    let config = tmp.path().join("codec.toml");
    fs::write(&config, "maxDepth = 2\n").expect("config should be written");

    let output = run_treeflat([
        OsStr::new("--config"),
        config.as_os_str(),
        OsStr::new("flatten"),
        input.as_os_str(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr_text(&output).contains("nesting depth exceeds configured limit of 2"),
        "{}",
        stderr_text(&output)
    );
}

#[test]
fn bad_config_exits_with_input_error() {
    let tmp = TempDirGuard::new("bad-config");
    let config = tmp.path().join("codec.toml");
    fs::write(&config, "maxDepth = \"deep\"\n").expect("config should be written");

    let output = run_treeflat([
        OsStr::new("inspect"),
        OsStr::new("r"),
        OsStr::new("--config"),
        config.as_os_str(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_text(&output).contains("invalid config"));
}
