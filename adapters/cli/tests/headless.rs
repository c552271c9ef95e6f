use std::process::Command;

fn maze_chase(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_maze-chase"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the maze-chase binary");
    assert!(
        output.status.success(),
        "maze-chase {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

#[test]
fn headless_session_reports_a_json_snapshot() {
    let stdout = maze_chase(&["--frames", "120", "--steer", "0:left", "--json"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is json");

    assert_eq!(snapshot["level"], 1);
    assert_eq!(snapshot["maze"], "Classic");
    assert_eq!(snapshot["pursuers"].as_array().map(Vec::len), Some(4));
    assert_eq!(snapshot["player"]["body"]["direction"], "Left");
}

#[test]
fn exported_boards_can_be_imported() {
    let exported = maze_chase(&["--maze", "wall-growth", "--seed", "9", "--export"]);
    let encoded = exported.trim();
    assert!(encoded.starts_with("maze:v1:28x31:"));

    let reexported = maze_chase(&["--import", encoded, "--export"]);
    assert_eq!(reexported.trim(), encoded);

    let stdout = maze_chase(&["--import", encoded, "--frames", "10", "--json"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is json");
    assert_eq!(snapshot["maze"], "Custom");
}

#[test]
fn progress_reports_do_not_disturb_the_json_output() {
    let stdout = maze_chase(&["--frames", "30", "--report-every", "10", "--json"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is json");
    assert_eq!(snapshot["phase"], "Playing");
}
