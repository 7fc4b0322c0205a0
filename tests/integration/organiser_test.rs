// File organiser end-to-end tests
// Exercise the library API and the `organise` binary against real directories

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tidymark::organiser::{
    Category, CollisionPolicy, ExtensionMap, OrganiseOptions, Organiser, OrganiserConfig,
    SkipReason,
};

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, name.as_bytes()).expect("Failed to create test file");
    path
}

fn default_organiser() -> Organiser {
    Organiser::new(ExtensionMap::builtin(), OrganiseOptions::default())
}

fn organise_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_organise"))
}

#[test]
fn test_recognised_extension_lands_in_category_folder() {
    let dir = TempDir::new().unwrap();
    let original = touch(dir.path(), "report.pdf");

    let report = default_organiser().organise(dir.path()).unwrap();

    assert!(!original.exists());
    assert!(dir.path().join("Documents").join("report.pdf").is_file());
    assert_eq!(report.moved_in(Category::Documents), 1);
    assert_eq!(report.moves[0].category, Category::Documents);
}

#[test]
fn test_unknown_and_missing_extensions_go_to_others() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "data.xyz");
    touch(dir.path(), "Makefile");
    touch(dir.path(), ".bashrc");

    let report = default_organiser().organise(dir.path()).unwrap();

    let others = dir.path().join("Others");
    assert!(others.join("data.xyz").is_file());
    assert!(others.join("Makefile").is_file());
    assert!(others.join(".bashrc").is_file());
    assert_eq!(report.moved_in(Category::Others), 3);
}

#[test]
fn test_extension_case_is_ignored() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "photo.JPG");
    touch(dir.path(), "photo.jpg");

    let report = default_organiser().organise(dir.path()).unwrap();

    assert_eq!(report.moved_in(Category::Images), 2);
    assert!(dir.path().join("Images").join("photo.JPG").is_file());
    assert!(dir.path().join("Images").join("photo.jpg").is_file());
}

#[test]
fn test_second_run_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    for name in ["a.jpg", "b.mp3", "c.zip", "notes.md", "deck.key"] {
        touch(dir.path(), name);
    }

    let first = default_organiser().organise(dir.path()).unwrap();
    assert_eq!(first.total_moved(), 5);

    let second = default_organiser().organise(dir.path()).unwrap();
    assert_eq!(second.total_moved(), 0);
    assert!(second.skipped.is_empty());
    assert!(dir.path().join("Presentations").join("deck.key").is_file());
    assert!(dir.path().join("TextDocs").join("notes.md").is_file());
}

#[test]
fn test_collision_reported_and_both_files_untouched() {
    let dir = TempDir::new().unwrap();
    let images = dir.path().join("Images");
    fs::create_dir(&images).unwrap();
    fs::write(images.join("a.jpg"), b"already sorted").unwrap();
    fs::write(dir.path().join("a.jpg"), b"new arrival").unwrap();

    let report = default_organiser().organise(dir.path()).unwrap();

    assert_eq!(report.total_moved(), 0);
    assert_eq!(report.collisions().count(), 1);
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::Collision { ref destination } if destination == &images.join("a.jpg")
    ));
    assert_eq!(fs::read(images.join("a.jpg")).unwrap(), b"already sorted");
    assert_eq!(fs::read(dir.path().join("a.jpg")).unwrap(), b"new arrival");
}

#[test]
fn test_rename_policy_keeps_both_files() {
    let dir = TempDir::new().unwrap();
    let images = dir.path().join("Images");
    fs::create_dir(&images).unwrap();
    fs::write(images.join("a.jpg"), b"old").unwrap();
    fs::write(images.join("a_1.jpg"), b"older").unwrap();
    fs::write(dir.path().join("a.jpg"), b"new").unwrap();

    let organiser = Organiser::new(
        ExtensionMap::builtin(),
        OrganiseOptions {
            collision_policy: CollisionPolicy::Rename,
            dry_run: false,
        },
    );
    let report = organiser.organise(dir.path()).unwrap();

    assert_eq!(report.total_moved(), 1);
    assert_eq!(fs::read(images.join("a_2.jpg")).unwrap(), b"new");
    assert_eq!(fs::read(images.join("a.jpg")).unwrap(), b"old");
}

#[test]
fn test_config_overrides_builtin_table() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "shot.cr2");
    touch(dir.path(), "readme.txt");

    let config = OrganiserConfig::from_yaml(
        "extensions:\n  Images: [\".cr2\"]\n  TextDocs: [\"txt\"]\n",
    )
    .unwrap();
    let organiser = Organiser::new(config.extension_map(), OrganiseOptions::default());
    organiser.organise(dir.path()).unwrap();

    assert!(dir.path().join("Images").join("shot.cr2").is_file());
    assert!(dir.path().join("TextDocs").join("readme.txt").is_file());
}

#[test]
fn test_cli_reports_collision_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("Images")).unwrap();
    touch(&dir.path().join("Images"), "a.jpg");
    touch(dir.path(), "a.jpg");
    touch(dir.path(), "song.mp3");

    let output = organise_bin().arg(dir.path()).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Moved 1 file(s), skipped 1"));
    assert!(stdout.contains("a.jpg: already exists"));
    assert!(dir.path().join("Audio").join("song.mp3").is_file());
}

#[test]
fn test_cli_json_dry_run() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "clip.mp4");

    let output = organise_bin()
        .arg(dir.path())
        .args(["--dry-run", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["moved"]["Videos"], 1);
    assert_eq!(json["moves"][0]["file_name"], "clip.mp4");
    assert!(dir.path().join("clip.mp4").is_file());
    assert!(!dir.path().join("Videos").exists());
}

#[test]
fn test_cli_missing_directory_exits_one() {
    let dir = TempDir::new().unwrap();

    let output = organise_bin()
        .arg(dir.path().join("does-not-exist"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_bad_config_exits_one() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("organise.yaml");
    fs::write(&config, "extensions:\n  Pictures: [\".png\"]\n").unwrap();
    touch(dir.path(), "a.png");

    let output = organise_bin()
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(dir.path().join("a.png").is_file());
}

#[test]
fn test_cli_usage_error_exits_two() {
    let output = organise_bin().arg("--recursive").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_logs_to_piped_stderr_without_colour_codes() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "photo.jpg");

    let output = organise_bin().arg(dir.path()).output().unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("photo.jpg"), "expected log lines, got: {}", stderr);
    assert!(!stderr.contains('\u{1b}'), "escape codes in piped logs: {:?}", stderr);
}
