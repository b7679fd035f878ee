// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use redline::Sentence;

pub mod fixtures;

/// Test fixture helper for creating temporary directories with draft files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Write a draft file with given content
    pub fn create_draft_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        // Create parent directories if needed
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Session file location inside the fixture
    pub fn session_path(&self) -> PathBuf {
        self.root_path.join("sessions").join("letter.json")
    }
}

/// Display text of each sentence
pub fn texts(sentences: &[Sentence]) -> Vec<&str> {
    sentences.iter().map(Sentence::as_str).collect()
}

/// Join sentences with single spaces, the way a re-rendered draft reads
pub fn join(sentences: &[Sentence]) -> String {
    redline::segmenter::join_sentences(sentences)
}

/// Compare rendered lines one by one, providing detailed diff on mismatch
pub fn assert_golden_lines(actual: &[String], expected: &str, context: &str) {
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context, expected_lines.len(), actual.len()
        );
    }

    for (i, (actual_line, expected_line)) in actual.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context, i + 1, expected_line, actual_line
            );
        }
    }
}
