use std::io::Write;
use std::process::Command;

const TUNING: &str = r#"{
    "version": 2.0,
    "algorithms": [
        { "hdr": {
            "MultiExposure": {
                "cadence": [1, 2],
                "channel_map": { "short": 1, "long": 2 }
            }
        } }
    ]
}"#;

fn tuning_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ipactl-tune"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_列出模式() {
    let file = tuning_file(TUNING);
    let out = run(&[file.path().to_str().unwrap(), "--list", "--json"]);
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["algorithms"][0], "hdr");
    assert_eq!(report["hdr_modes"][0]["name"], "MultiExposure");
    assert_eq!(report["hdr_modes"][0]["cadence"], serde_json::json!([1, 2]));
}

#[test]
fn test_回放通道() {
    let file = tuning_file(TUNING);
    let out = run(&[
        file.path().to_str().unwrap(),
        "--mode",
        "MultiExposure",
        "--channels",
        "1,2,9",
        "--json",
    ]);
    assert!(out.status.success());
    let frames: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(frames[0]["hdr"]["channel"], "short");
    assert_eq!(frames[1]["hdr"]["channel"], "long");
    assert_eq!(frames[2]["resolved"], false);
    assert_eq!(frames[2]["hdr"]["channel"], "long");
}

#[test]
fn test_调校错误时退出() {
    let file = tuning_file(
        r#"{ "version": 2.0, "algorithms": [ { "hdr": { "Bad": { "cadence": [] } } } ] }"#,
    );
    let out = run(&[file.path().to_str().unwrap(), "--list"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_未知模式时退出() {
    let file = tuning_file(TUNING);
    let out = run(&[file.path().to_str().unwrap(), "--mode", "Night"]);
    assert_eq!(out.status.code(), Some(1));
}
