/*!
 * Tests for file system utilities
 */

use clipcap::file_utils::FileManager;

use crate::common;

/// Test file and directory existence checks
#[test]
fn test_existence_checks_withRealEntries_shouldDistinguishKinds() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir_path = temp_dir.path().to_path_buf();
    let file_path = common::create_test_file(&dir_path, "probe.txt", "content").unwrap();

    assert!(FileManager::file_exists(&file_path));
    assert!(!FileManager::file_exists(&dir_path));
    assert!(FileManager::dir_exists(&dir_path));
    assert!(!FileManager::dir_exists(&file_path));
    assert!(!FileManager::file_exists(dir_path.join("missing.txt")));
}

/// Test directory creation with parents
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));

    // Idempotent on an existing directory
    FileManager::ensure_dir(&nested).unwrap();
}

/// Test string read/write round-trip and parent creation
#[test]
fn test_write_string_withNestedTarget_shouldCreateParentsAndRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("deep").join("file.ass");

    FileManager::write_string(&path, "[Script Info]\n").unwrap();
    let content = FileManager::read_to_string(&path).unwrap();

    assert_eq!(content, "[Script Info]\n");
}

/// Test numbered artifact path generation
#[test]
fn test_numbered_path_withAndWithoutSuffix_shouldFormatNames() {
    let with_suffix = FileManager::numbered_path("out", 2, "captions", "mp4");
    assert_eq!(with_suffix, std::path::PathBuf::from("out/short_2_captions.mp4"));

    let without_suffix = FileManager::numbered_path("out", 1, "", "ass");
    assert_eq!(without_suffix, std::path::PathBuf::from("out/short_1.ass"));
}

/// Test extension search finds files case-insensitively
#[test]
fn test_find_files_withMixedExtensions_shouldMatchCaseInsensitive() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir_path = temp_dir.path().to_path_buf();

    common::create_test_file(&dir_path, "one.vtt", "WEBVTT").unwrap();
    common::create_test_file(&dir_path, "two.VTT", "WEBVTT").unwrap();
    common::create_test_file(&dir_path, "other.srt", "1").unwrap();

    let found = FileManager::find_files(&dir_path, "vtt").unwrap();
    assert_eq!(found.len(), 2);

    let found_with_dot = FileManager::find_files(&dir_path, ".vtt").unwrap();
    assert_eq!(found_with_dot.len(), 2);
}
