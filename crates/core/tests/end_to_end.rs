//! Matching and learning against real files on disk

use std::fs;
use std::path::Path;

use rmfile_core::{MatchEvaluator, PatternKind, PatternSet, Scanner, store};
use tempfile::TempDir;

const HELLO_SHA1: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";
const HELLO_GCID: &str = "67becf85308acf0261750da1075681ee5c412f05";

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn seeded_names_match_by_base_name() {
    let sets = vec![PatternSet::new(
        "name.txt",
        PatternKind::Name,
        ["abc.txt", "", "  def.txt  "],
    )];
    assert_eq!(sets[0].all_values(), vec!["abc.txt", "def.txt"]);

    let evaluator = MatchEvaluator::new(sets).unwrap();
    // Name sets never touch the file, so these paths need not exist
    assert!(evaluator.matches(Path::new("/tmp/abc.txt")).unwrap());
    assert!(evaluator.matches(Path::new("/tmp/def.txt")).unwrap());
    assert!(!evaluator.matches(Path::new("/tmp/ABD.txt")).unwrap());

    let ievaluator = MatchEvaluator::new(vec![PatternSet::new(
        "iname.txt",
        PatternKind::IName,
        ["abc.txt"],
    )])
    .unwrap();
    assert!(ievaluator.matches(Path::new("/tmp/ABC.txt")).unwrap());
    assert!(!ievaluator.matches(Path::new("/tmp/ABD.txt")).unwrap());
}

#[test]
fn content_sets_match_by_digest() {
    let dir = TempDir::new().unwrap();
    let hello = write(&dir, "hello.txt", b"hello world");
    let other = write(&dir, "other.txt", b"something else");

    let evaluator = MatchEvaluator::new(vec![
        PatternSet::new("sha1.txt", PatternKind::Sha1, [HELLO_SHA1]),
        PatternSet::new("gcid.txt", PatternKind::Gcid, [HELLO_GCID.to_uppercase()]),
    ])
    .unwrap();

    assert!(evaluator.matches(&hello).unwrap());
    assert!(!evaluator.matches(&other).unwrap());
}

#[test]
fn name_and_content_combine() {
    let dir = TempDir::new().unwrap();
    let hello = write(&dir, "hello.txt", b"hello world");
    let renamed = write(&dir, "renamed.txt", b"hello world");

    let evaluator = MatchEvaluator::new(vec![
        PatternSet::new("iname.txt", PatternKind::IName, ["HELLO.TXT"]),
        PatternSet::new("sha1.txt", PatternKind::Sha1, [HELLO_SHA1]),
    ])
    .unwrap();

    assert!(evaluator.matches(&hello).unwrap());
    assert!(!evaluator.matches(&renamed).unwrap());
}

#[test]
fn unreadable_file_is_an_error_not_a_mismatch() {
    let dir = TempDir::new().unwrap();
    let evaluator = MatchEvaluator::new(vec![PatternSet::new(
        "sha1.txt",
        PatternKind::Sha1,
        [HELLO_SHA1],
    )])
    .unwrap();

    assert!(evaluator.matches(&dir.path().join("gone.txt")).is_err());
}

#[test]
fn learn_then_persist_then_match() {
    let patterns = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    write(&files, "a.bin", b"hello world");
    write(&files, "b.bin", b"");

    let sha1_path = patterns.path().join("sha1.txt");
    let gcid_path = patterns.path().join("gcid.txt");
    let sets = vec![
        store::load(&sha1_path, PatternKind::Sha1).unwrap(),
        store::load(&gcid_path, PatternKind::Gcid).unwrap(),
    ];

    let mut evaluator = MatchEvaluator::new(sets).unwrap();
    for path in Scanner::new(files.path()).scan().unwrap() {
        evaluator.observe(&path).unwrap();
    }

    for set in evaluator.into_sets() {
        assert!(set.has_observed());
        store::save(&set).unwrap();
    }

    let empty = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
    assert_eq!(
        fs::read_to_string(&sha1_path).unwrap(),
        format!("{HELLO_SHA1}\n{empty}")
    );
    assert_eq!(
        fs::read_to_string(&gcid_path).unwrap(),
        format!("{HELLO_GCID}\n{empty}")
    );

    // Reloaded sets now match the files they learned from
    let evaluator = MatchEvaluator::new(vec![
        store::load(&sha1_path, PatternKind::Sha1).unwrap(),
        store::load(&gcid_path, PatternKind::Gcid).unwrap(),
    ])
    .unwrap();
    for path in Scanner::new(files.path()).scan().unwrap() {
        assert!(evaluator.matches(&path).unwrap(), "{}", path.display());
    }
}
