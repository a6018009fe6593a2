use std::io::Write;
use std::process::{Command, Output, Stdio};

fn recap(args: &[&str]) -> Output {
    let config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    Command::new(env!("CARGO_BIN_EXE_recap"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run CLI")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn extract_prints_ranked_sentences_as_json() {
    let output = recap(&["extract", "tests/fixtures/lecture.txt", "--sentences", "2", "--json"]);
    assert_success(&output);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        value["representative_sentences"],
        serde_json::json!([
            "When the owner goes out of scope, the value will be dropped.",
            "Thanks for watching and see you next time."
        ])
    );
}

#[test]
fn extract_reads_caption_files() {
    let output = recap(&["extract", "tests/fixtures/lecture.srt", "--json"]);
    assert_success(&output);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let sentences = value["representative_sentences"].as_array().expect("array");
    assert_eq!(sentences.len(), 3);
    assert_eq!(sentences[0], "welcome back to the channel.");
}

#[test]
fn extract_reads_stdin() {
    let config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    let mut child = Command::new(env!("CARGO_BIN_EXE_recap"))
        .arg("--config")
        .arg(config.path())
        .args(["extract", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");

    child
        .stdin
        .as_mut()
        .expect("stdin open")
        .write_all(b"Cats are mammals. Dogs are mammals too.")
        .expect("write stdin");

    let output = child.wait_with_output().expect("read CLI output");
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        value["representative_sentences"],
        serde_json::json!(["Cats are mammals.", "Dogs are mammals too."])
    );
}

#[test]
fn topics_respect_limits_and_seed() {
    let args = [
        "topics",
        "tests/fixtures/lecture.txt",
        "--topics",
        "2",
        "--keywords",
        "4",
        "--seed",
        "7",
        "--json",
    ];
    let first = recap(&args);
    let second = recap(&args);
    assert_success(&first);
    assert_eq!(first.stdout, second.stdout);

    let value: serde_json::Value = serde_json::from_slice(&first.stdout).expect("json output");
    let topics = value.as_object().expect("topic map");
    assert_eq!(topics.len(), 2);
    assert!(topics
        .values()
        .all(|keywords| keywords.as_array().map(Vec::len) == Some(4)));
}

#[test]
fn schema_describes_summary_fields() {
    let output = recap(&["schema"]);
    assert_success(&output);
    let schema = String::from_utf8_lossy(&output.stdout);
    for field in [
        "representative_sentences",
        "abstractive_summary",
        "topics",
        "entities",
    ] {
        assert!(schema.contains(field), "missing {field}");
    }
}

#[test]
fn missing_file_fails() {
    let output = recap(&["extract", "tests/fixtures/does-not-exist.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist.txt"));
}
