//! End-to-end tests for the `glossa` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn glossa(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_glossa"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run glossa")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_export_then_list_chapters() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("clips")).unwrap();
    std::fs::write(dir.path().join("clips/p1.wav"), b"RIFF----WAVEfmt ").unwrap();
    std::fs::write(
        dir.path().join("request.json"),
        r#"{
  "title": "Lesson: One?",
  "paragraphs": ["Guten Morgen, wie geht es dir?", "Mir geht es gut."],
  "translations": { "0": "Good morning, how are you?" },
  "analyses": { "1": "**gut**: *good*" },
  "paragraph_audio": { "1": "clips/p1.wav" }
}"#,
    )
    .unwrap();

    let output = glossa(&["export", "request.json"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));

    // Path-hostile characters in the title are replaced.
    let epub = dir.path().join("Lesson_ One_.epub");
    assert!(epub.exists(), "{}", stdout(&output));

    let output = glossa(&["chapters", "Lesson_ One_.epub", "--json"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));

    let chapters: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let chapters = chapters.as_array().unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0]["id"], 1);
    assert_eq!(chapters[0]["title"], "Lesson: One?");
    let content = chapters[0]["content"].as_str().unwrap();
    assert!(content.contains("Good morning, how are you?"));
    assert!(content.contains("gut: good"));
}

#[test]
fn test_export_with_explicit_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("req.json"),
        r#"{ "title": "T", "paragraphs": ["Un paragraphe assez long."] }"#,
    )
    .unwrap();

    let output = glossa(
        &["export", "req.json", "-o", "custom.epub", "--level", "9", "--lang", "fr", "-q"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(dir.path().join("custom.epub").exists());

    let output = glossa(&["chapters", "custom.epub", "--min-chars", "0"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("Chapters: 1"));
}

#[test]
fn test_missing_audio_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("req.json"),
        r#"{ "title": "T", "paragraphs": ["x"], "chapter_audio": "nope.wav" }"#,
    )
    .unwrap();

    let output = glossa(&["export", "req.json"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: "));
    assert!(stderr(&output).contains("nope.wav"));
}

#[test]
fn test_invalid_epub_reports_format_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.epub"), b"not a zip").unwrap();

    let output = glossa(&["chapters", "bad.epub"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).trim(), "error: not a valid container");
}
