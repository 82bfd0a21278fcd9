use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snake-puzzle"))
        .args(args)
        .output()
        .expect("failed to run snake-puzzle")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn map_file(tag: &str) -> PathBuf {
    let mut rows = vec![" ".repeat(15); 15];
    rows[0] = format!("SF{}", " ".repeat(13));
    let path = std::env::temp_dir().join(format!("snake-puzzle-{}-{tag}.map", std::process::id()));
    fs::write(&path, rows.join("\n")).expect("temp map written");
    path
}

fn created_level(tag: &str) -> String {
    let path = map_file(tag);
    let output = run(&["new", "--name", "Demo", "--map", path.to_str().expect("utf-8 path")]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success(), "new failed: {output:?}");
    stdout(&output).trim().to_owned()
}

#[test]
fn new_levels_verify_their_solution() {
    let level = created_level("new");
    assert!(level.starts_with("snake:v1:15x15:"));

    let accepted = run(&["verify", &level, "10"]);
    assert!(accepted.status.success());
    assert!(stdout(&accepted).contains("wins 'Demo'"));

    let rejected = run(&["verify", &level, "20"]);
    assert!(!rejected.status.success());
}

#[test]
fn edits_round_trip_through_transfer_strings() {
    let level = created_level("edits");

    let edited = run(&["edit", &level, "--set", "5,5,wall", "--solution", "10"]);
    assert!(edited.status.success(), "edit failed: {edited:?}");
    let edited = stdout(&edited).trim().to_owned();

    let shown = run(&["show", &edited]);
    assert!(shown.status.success());
    let text = stdout(&shown);
    assert!(text.contains("name:     Demo"));
    assert!(text.contains("solution: 10"));
    assert!(text.contains(&format!("|SF{}|", " ".repeat(13))));
}

#[test]
fn play_reports_events_and_outcome() {
    let level = created_level("play");

    let played = run(&["play", &level, "R"]);
    assert!(played.status.success(), "play failed: {played:?}");
    let text = stdout(&played);
    assert!(text.contains("eat at (1, 0)"));
    assert!(text.contains("done at (1, 0): won"));
    assert!(text.contains("steps:  1 (10)"));
}

#[test]
fn play_reports_only_selected_events() {
    let level = created_level("filter");

    let played = run(&["play", &level, "R", "--events", "done"]);
    assert!(played.status.success(), "play failed: {played:?}");
    let text = stdout(&played);
    assert!(text.contains("done at (1, 0): won"));
    assert!(!text.contains("eat at"));

    let rejected = run(&["play", &level, "R", "--events", "eat,bogus"]);
    assert!(!rejected.status.success());
}

#[test]
fn edit_reports_selected_level_events_on_stderr() {
    let level = created_level("edit-events");

    let edited = run(&[
        "edit",
        &level,
        "--set",
        "4,4,snake",
        "--events",
        "snakeMove,resize",
    ]);
    assert!(edited.status.success(), "edit failed: {edited:?}");
    assert!(stdout(&edited).trim().starts_with("snake:v1:15x15:"));
    let reported = String::from_utf8_lossy(&edited.stderr);
    assert!(reported.contains("snake start moved (0, 0) -> (4, 4)"));
    assert!(!reported.contains("resized"));
}

#[test]
fn malformed_transfer_strings_fail() {
    let output = run(&["show", "board:v1:15x15:e30"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not supported"));
}
