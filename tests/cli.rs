use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn advisor_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_advisor"))
}

fn setup_test_env(provider: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(
        data_dir.join("catalog.json"),
        r#"{
  "products": {
    "OMX Sales": {"description": "CRM", "key_features": ["Leads"], "pricing": "$29", "demo_link": "https://example.com/s"},
    "OMX Flow": {"description": "Automation", "key_features": ["Bots"], "pricing": "$49", "demo_link": "https://example.com/f"}
  },
  "faqs": [
    {"question": "What is OMX Sales?", "answer": "Our CRM."},
    {"question": "How much does it cost?", "answer": "See pricing."}
  ],
  "onboarding": {"business_types": ["Retail"], "business_sizes": ["1-10"], "goals": ["Manage leads"]},
  "contact": {"support_email": "help@example.com", "phone": "+1 555 0100", "fallback_messages": ["Ask our team."]}
}"#,
    )
    .unwrap();

    let config_content = format!(
        r#"[catalog]
path = "../data/catalog.json"

[embedding]
provider = "{}"

[faq]
similarity_threshold = 0.65
fallback_seed = 1
"#,
        provider
    );

    let config_path = config_dir.join("advisor.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_advisor(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = advisor_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run advisor binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_check_reports_summary() {
    let (_tmp, config_path) = setup_test_env("hash");

    let (stdout, stderr, success) = run_advisor(&config_path, &["check"]);
    assert!(success, "check failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("faqs:       2"));
    assert!(stdout.contains("feature-hash"));
    assert!(stdout.contains("OK"));
}

#[test]
fn test_check_fails_when_embeddings_disabled() {
    let (_tmp, config_path) = setup_test_env("disabled");

    let (_, stderr, success) = run_advisor(&config_path, &["check"]);
    assert!(!success);
    assert!(stderr.contains("Failed to build FAQ index"));
}

#[test]
fn test_ask_exact_match() {
    let (_tmp, config_path) = setup_test_env("hash");

    let (stdout, stderr, success) =
        run_advisor(&config_path, &["ask", "HOW MUCH DOES IT COST?"]);
    assert!(success, "ask failed: stderr={}", stderr);

    let answer: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(answer["question"], "How much does it cost?");
    assert_eq!(answer["answer"], "See pricing.");
}

#[test]
fn test_ask_unmatched_prints_contact() {
    let (_tmp, config_path) = setup_test_env("hash");

    let (stdout, _, success) = run_advisor(&config_path, &["ask", "qqq"]);
    assert!(success);

    let answer: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(answer["answer"], "Ask our team.");
    assert_eq!(answer["contact"]["email"], "help@example.com");
}

#[test]
fn test_recommend_works_without_embeddings() {
    // The recommender never loads a model, so a disabled provider is fine.
    let (_tmp, config_path) = setup_test_env("disabled");

    let (stdout, stderr, success) = run_advisor(
        &config_path,
        &[
            "recommend",
            "--goal",
            "Customer support",
            "--business-type",
            "E-commerce",
        ],
    );
    assert!(success, "recommend failed: stderr={}", stderr);

    let rec: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rec["recommendation"], "OMX Flow");
    assert_eq!(rec["product"]["pricing"], "$49");
}

#[test]
fn test_recommend_defaults_to_sales() {
    let (_tmp, config_path) = setup_test_env("disabled");

    let (stdout, _, success) = run_advisor(&config_path, &["recommend"]);
    assert!(success);

    let rec: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rec["recommendation"], "OMX Sales");
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_advisor(&tmp.path().join("nope.toml"), &["check"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
