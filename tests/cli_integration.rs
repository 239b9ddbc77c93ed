//! Integration tests that run the CLI binary.

fn bin(data_dir: &std::path::Path) -> std::process::Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_reply", "-", "forge"));
    let mut cmd = std::process::Command::new(bin);
    cmd.env_remove("GEMINI_API_KEY")
        .env_remove("REPLY_FORGE_BACKEND")
        .env_remove("REPLY_FORGE_MAX_HISTORY")
        .env("REPLY_FORGE_DATA_DIR", data_dir)
        .current_dir(data_dir);
    cmd
}

fn history_unit(records: serde_json::Value) -> String {
    serde_json::json!({ "version": 1, "records": records }).to_string()
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reply"), "expected usage text in output");
    assert!(stdout.contains("history"));
}

#[test]
fn cli_version_succeeds() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("reply-forge"));
}

#[test]
fn history_list_on_fresh_data_dir_is_empty() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path()).args(["history", "list"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No history yet."));
}

#[test]
fn dry_run_prints_prompt_without_api_key() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["reply", "--dry-run", "--relationship", "colleague"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(No message was provided.)"));
    assert!(stdout.contains("Colleague"));
    assert!(!tmp.path().join("promptHistory").exists());
}

#[test]
fn reply_without_api_key_exits_with_error_before_any_request() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["reply", "-M", "hello", "-m", "models/gemini-1.5-flash"])
        // Unroutable proxy: if a request were attempted the error would differ.
        .env("REPLY_FORGE_BACKEND", "proxy")
        .env("REPLY_FORGE_PROXY_URL", "http://127.0.0.1:9")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No API key"), "got: {}", stderr);
}

#[test]
fn ask_without_model_exits_with_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["ask", "-Q", "why?", "--api-key", "k"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No model selected"), "got: {}", stderr);
}

#[test]
fn invalid_backend_is_a_config_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["history", "list"])
        .env("REPLY_FORGE_BACKEND", "carrier-pigeon")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("REPLY_FORGE_BACKEND"));
}

#[test]
fn history_show_and_delete_work_on_stored_records() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let unit = history_unit(serde_json::json!([
        {
            "settings": { "mode": "question", "question": "Second?", "selectedModel": "models/gemini-1.5-pro" },
            "prompt": "prompt two",
            "aiReply": "answer two",
            "timestamp": "2026-10-18T09:15:02.123Z"
        },
        {
            "settings": { "mode": "reply", "receivedMessage": "First?", "selectedModel": "models/gemini-1.5-flash" },
            "prompt": "prompt one",
            "aiReply": "answer one",
            "timestamp": "2026-10-17T09:15:02.123Z"
        }
    ]));
    std::fs::write(tmp.path().join("promptHistory"), unit).unwrap();

    let output = bin(tmp.path()).args(["history", "list"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("0\t[Question]"));
    assert!(lines[1].contains("answer one"));

    let output = bin(tmp.path())
        .args(["history", "show", "1", "--json"])
        .output()
        .unwrap();
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["prompt"], "prompt one");

    let output = bin(tmp.path())
        .args(["history", "delete", "0", "--yes"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = bin(tmp.path()).args(["history", "list"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("answer one"));
}

#[test]
fn restoring_into_the_wrong_mode_is_rejected() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let unit = history_unit(serde_json::json!([{
        "settings": { "mode": "question", "question": "Q", "selectedModel": "models/gemini-1.5-pro" },
        "prompt": "p",
        "aiReply": "a",
        "timestamp": "2026-10-18T09:15:02.123Z"
    }]));
    std::fs::write(tmp.path().join("promptHistory"), unit).unwrap();

    let output = bin(tmp.path())
        .args(["reply", "--from-history", "0", "--dry-run"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("use `ask`"));

    let output = bin(tmp.path())
        .args(["ask", "--from-history", "0", "--dry-run"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--- Question ---\nQ"));
}

#[test]
fn set_api_key_then_config_reports_it() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["config", "set-api-key", "abc123"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = bin(tmp.path()).arg("config").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("set ✓ (saved)"), "got: {}", stdout);
}
