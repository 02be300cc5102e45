//! E2E scenarios for the tabsplit CLI.
//!
//! Covers:
//! - Receipt validation through `check` (stdin and file input)
//! - The encode -> decode -> claim share-link round trip
//! - Exit code verification for every rejection class
//! - Offline `analyze` failures (bad image, missing key)
//!
//! Every test here runs offline; nothing talks to the vision API.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tab_core::exit_codes::ExitCode;
use tempfile::tempdir;

/// Get a Command for the tabsplit binary.
fn tabsplit() -> Command {
    let mut cmd = cargo_bin_cmd!("tabsplit");
    cmd.env_remove("TABSPLIT_LOG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A receipt whose claim arithmetic is easy to check by hand:
/// claiming item `a` at split 2 owes 10.00 + 1.00 tax + 2.00 tip.
const RECEIPT: &str = r#"{
    "restaurantName": "Bill Cafe",
    "date": "2024-06-01",
    "currency": "$",
    "items": [
        {"id": "a", "description": "Steak Frites", "price": 20, "quantity": 1},
        {"id": "b", "description": "French Onion Soup", "price": 10, "quantity": 1}
    ],
    "subtotal": 30,
    "tax": 3,
    "tip": 6,
    "total": 39
}"#;

/// Encode the fixture receipt and return the bare share token.
fn share_token() -> String {
    let output = tabsplit()
        .args(["encode", "-f", "summary"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).unwrap().trim().to_string()
}

fn parse_stdout(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should be valid JSON")
}

// ============================================================================
// Check Command
// ============================================================================

mod check_command {
    use super::*;

    #[test]
    fn valid_receipt_exits_clean() {
        tabsplit()
            .args(["check", "-f", "summary"])
            .write_stdin(RECEIPT)
            .assert()
            .success()
            .stdout(predicate::str::contains("ok: Bill Cafe: 2 items, total $39.00"));
    }

    #[test]
    fn verdict_rides_the_json_envelope() {
        let output = tabsplit()
            .arg("check")
            .write_stdin(RECEIPT)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_stdout(&output);
        assert_eq!(json["schemaVersion"], "tabsplit/v1");
        assert!(json["runId"].as_str().unwrap().starts_with("run-"));
        assert!(json["generatedAt"].is_string());
        assert_eq!(json["check"]["status"], "ok");
        assert_eq!(json["check"]["receipt"]["restaurantName"], "Bill Cafe");
    }

    #[test]
    fn missing_items_is_receipt_error() {
        tabsplit()
            .args(["check", "-f", "summary"])
            .write_stdin(r#"{"restaurantName": "Orphan"}"#)
            .assert()
            .code(ExitCode::ReceiptInvalid.as_i32())
            .stdout(predicate::str::contains("invalid:"));
    }

    #[test]
    fn invalid_verdict_json_names_the_error() {
        let output = tabsplit()
            .arg("check")
            .write_stdin(r#"{"restaurantName": "Orphan"}"#)
            .assert()
            .code(ExitCode::ReceiptInvalid.as_i32())
            .get_output()
            .stdout
            .clone();

        let json = parse_stdout(&output);
        assert_eq!(json["check"]["status"], "invalid");
        assert_eq!(json["check"]["error"]["code"], 10);
        assert!(json["check"]["error"]["detail"].is_string());
    }

    #[test]
    fn non_json_input_is_receipt_error() {
        tabsplit()
            .arg("check")
            .write_stdin("this is not a receipt")
            .assert()
            .code(ExitCode::ReceiptInvalid.as_i32())
            .stderr(predicate::str::contains("input is not JSON"));
    }

    #[test]
    fn reads_receipt_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("receipt.json");
        fs::write(&path, RECEIPT).unwrap();

        tabsplit()
            .args(["check", "-f", "summary"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Bill Cafe"));
    }

    #[test]
    fn missing_file_is_io_error() {
        tabsplit()
            .args(["check", "/no/such/receipt.json"])
            .assert()
            .code(ExitCode::IoError.as_i32())
            .stderr(predicate::str::contains("cannot read"));
    }

    #[test]
    fn markup_is_stripped_before_display() {
        let tainted = RECEIPT.replace("Bill Cafe", "<b>Bill</b> Cafe");
        tabsplit()
            .args(["check", "-f", "summary"])
            .write_stdin(tainted)
            .assert()
            .success()
            .stdout(predicate::str::contains("ok: Bill Cafe"))
            .stdout(predicate::str::contains("<b>").not());
    }
}

// ============================================================================
// Share-Link Round Trip
// ============================================================================

mod share_link {
    use super::*;

    #[test]
    fn encode_emits_fragment_safe_token() {
        let token = share_token();
        assert!(!token.is_empty());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn encode_attaches_share_base() {
        tabsplit()
            .args([
                "encode",
                "-f",
                "summary",
                "--share-base",
                "https://tabsplit.app/split",
            ])
            .write_stdin(RECEIPT)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("https://tabsplit.app/split#"));
    }

    #[test]
    fn encode_json_carries_token_and_url() {
        let output = tabsplit()
            .arg("encode")
            .write_stdin(RECEIPT)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_stdout(&output);
        assert!(json["share"]["token"].as_str().unwrap().len() > 16);
        assert!(json["share"]["url"].is_null());
    }

    #[test]
    fn decode_round_trips_the_receipt() {
        let token = share_token();
        tabsplit()
            .args(["decode", &token, "-f", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Bill Cafe: 2 items, total $39.00"));
    }

    #[test]
    fn decode_accepts_full_url() {
        let url = format!("https://tabsplit.app/split#{}", share_token());
        tabsplit()
            .args(["decode", &url, "-f", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Bill Cafe"));
    }

    #[test]
    fn decode_rejects_garbage_token() {
        tabsplit()
            .args(["decode", "!!!not-a-token!!!"])
            .assert()
            .code(ExitCode::LinkInvalid.as_i32())
            .stderr(predicate::str::contains("Invalid Share Link"));
    }

    #[test]
    fn decode_rejects_truncated_token() {
        let token = share_token();
        let truncated = &token[..token.len() / 2];
        tabsplit()
            .args(["decode", truncated])
            .assert()
            .code(ExitCode::LinkInvalid.as_i32());
    }

    #[test]
    fn decode_rejects_empty_fragment() {
        tabsplit()
            .args(["decode", "https://tabsplit.app/split#"])
            .assert()
            .code(ExitCode::LinkInvalid.as_i32())
            .stderr(predicate::str::contains("nothing to decode"));
    }

    #[test]
    fn encode_rejects_invalid_receipt() {
        tabsplit()
            .arg("encode")
            .write_stdin(r#"{"items": []}"#)
            .assert()
            .code(ExitCode::ReceiptInvalid.as_i32())
            .stderr(predicate::str::contains("Invalid Receipt Data"));
    }
}

// ============================================================================
// Claim Command
// ============================================================================

mod claim_command {
    use super::*;

    #[test]
    fn split_claim_matches_hand_arithmetic() {
        let token = share_token();
        tabsplit()
            .args(["claim", &token, "--item", "a:2", "-f", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "your share: $13.00 (subtotal $10.00 + tax $1.00 + tip $2.00)",
            ));
    }

    #[test]
    fn claiming_everything_pays_the_whole_bill() {
        let token = share_token();
        tabsplit()
            .args([
                "claim", &token, "--item", "a", "--item", "b", "-f", "summary",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("your share: $39.00"));
    }

    #[test]
    fn stale_item_claims_nothing() {
        let token = share_token();
        tabsplit()
            .args(["claim", &token, "--item", "ghost", "-f", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains("your share: $0.00"));
    }

    #[test]
    fn md_with_no_live_claims_says_so() {
        let token = share_token();
        tabsplit()
            .args(["claim", &token, "--item", "ghost", "-f", "md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No items claimed."));
    }

    #[test]
    fn json_reports_each_claimed_item() {
        let token = share_token();
        let output = tabsplit()
            .args(["claim", &token, "--item", "a:2"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_stdout(&output);
        let claimed = json["claim"]["claimed"].as_array().unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0]["id"], "a");
        assert_eq!(claimed[0]["splitCount"], 2);
        assert!((claimed[0]["share"].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert!((json["claim"]["allocation"]["total"].as_f64().unwrap() - 13.0).abs() < 1e-9);
        assert_eq!(json["claim"]["currency"], "$");
    }

    #[test]
    fn split_count_zero_clamps_to_one() {
        let token = share_token();
        tabsplit()
            .args(["claim", &token, "--item", "a:0", "-f", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains("subtotal $20.00"));
    }

    #[test]
    fn duplicate_item_keeps_the_last_split() {
        let token = share_token();
        tabsplit()
            .args([
                "claim", &token, "--item", "a:4", "--item", "a:2", "-f", "summary",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("subtotal $10.00"));
    }

    #[test]
    fn missing_item_flag_is_args_error() {
        let token = share_token();
        tabsplit()
            .args(["claim", &token])
            .assert()
            .code(ExitCode::ArgsError.as_i32())
            .stderr(predicate::str::contains("--item"));
    }

    #[test]
    fn bad_link_is_link_error() {
        tabsplit()
            .args(["claim", "####", "--item", "a"])
            .assert()
            .code(ExitCode::LinkInvalid.as_i32());
    }
}

// ============================================================================
// Analyze Command (offline failures)
// ============================================================================

mod analyze_offline {
    use super::*;

    #[test]
    fn missing_api_key_is_args_error() {
        tabsplit()
            .env_remove("TABSPLIT_API_KEY")
            .args(["analyze", "photo.jpg"])
            .assert()
            .code(ExitCode::ArgsError.as_i32())
            .stderr(predicate::str::contains("--api-key"));
    }

    #[test]
    fn unreadable_image_is_io_error() {
        tabsplit()
            .args(["analyze", "/no/such/photo.jpg", "--api-key", "test-key"])
            .assert()
            .code(ExitCode::IoError.as_i32())
            .stderr(predicate::str::contains("cannot read"));
    }

    #[test]
    fn malformed_data_uri_is_analysis_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("receipt.txt");
        fs::write(&path, "data:image/png,percent-encoded-not-base64").unwrap();

        tabsplit()
            .args(["analyze", "--data-uri", "--api-key", "test-key"])
            .arg(&path)
            .assert()
            .code(ExitCode::AnalysisFailed.as_i32())
            .stderr(predicate::str::contains("Unusable Image"));
    }
}

// ============================================================================
// Languages Command and Global Surface
// ============================================================================

mod languages_command {
    use super::*;

    #[test]
    fn summary_lists_codes_in_order() {
        tabsplit()
            .args(["languages", "-f", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::diff("en es fr de it pt nl ja ko zh\n"));
    }

    #[test]
    fn md_names_languages() {
        tabsplit()
            .args(["languages", "-f", "md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# Supported Languages"))
            .stdout(predicate::str::contains("Japanese"));
    }

    #[test]
    fn json_pairs_code_and_name() {
        let output = tabsplit()
            .arg("languages")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_stdout(&output);
        let languages = json["languages"].as_array().unwrap();
        assert_eq!(languages.len(), 10);
        assert_eq!(languages[0]["code"], "en");
        assert_eq!(languages[0]["name"], "English");
    }
}

mod cli_surface {
    use super::*;

    #[test]
    fn help_lists_subcommands() {
        let output = tabsplit()
            .arg("--help")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let help = String::from_utf8(output).unwrap();
        for command in ["analyze", "encode", "decode", "check", "claim", "languages"] {
            assert!(help.contains(command), "help should mention {}", command);
        }
    }

    #[test]
    fn version_prints_semver() {
        tabsplit()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"\d+\.\d+\.\d+").unwrap());
    }

    #[test]
    fn unknown_flag_is_args_error() {
        tabsplit()
            .args(["check", "--definitely-not-a-flag"])
            .assert()
            .code(ExitCode::ArgsError.as_i32())
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_subcommand_is_args_error() {
        tabsplit()
            .arg("frobnicate")
            .assert()
            .code(ExitCode::ArgsError.as_i32())
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn invalid_format_is_args_error() {
        tabsplit()
            .args(["--format", "xml", "languages"])
            .assert()
            .code(ExitCode::ArgsError.as_i32());
    }

    #[test]
    fn quiet_keeps_stderr_silent_on_success() {
        tabsplit()
            .args(["languages", "-f", "summary", "-q"])
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }
}
