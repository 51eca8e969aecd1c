use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::models::LessonId;

/// Create a temporary lessons directory
pub fn create_test_lessons_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Write `<id>.lesson` into the lessons directory
pub fn create_test_lesson(lessons_dir: &TempDir, lesson_id: LessonId, content: &str) -> PathBuf {
    let file_path = lessons_dir.path().join(format!("{lesson_id}.lesson"));
    fs::write(&file_path, content).unwrap();
    file_path
}
