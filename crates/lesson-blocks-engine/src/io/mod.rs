use crate::models::LessonId;
use log::info;
use relative_path::RelativePathBuf;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const LESSON_EXTENSION: &str = "lesson";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Lesson not found: {0}")]
    NotFound(LessonId),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid lessons directory: {0}")]
    InvalidLessonsDir(String),
}

/// Where lesson content is read from and saved to.
///
/// Content is passed through untouched: callers hand in serializer output and
/// get back whatever string was stored.
pub trait LessonStore {
    fn load_lesson_content(&self, lesson_id: LessonId) -> Result<String, StoreError>;
    fn save_lesson_content(&self, lesson_id: LessonId, content: &str) -> Result<(), StoreError>;
}

/// Stores each lesson as `<root>/<id>.lesson`
#[derive(Debug, Clone)]
pub struct FileLessonStore {
    root: PathBuf,
}

impl FileLessonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lesson_path(&self, lesson_id: LessonId) -> PathBuf {
        RelativePathBuf::from(format!("{lesson_id}.{LESSON_EXTENSION}")).to_path(&self.root)
    }

    /// Ids of all stored lessons, ascending
    pub fn lesson_ids(&self) -> Result<Vec<LessonId>, StoreError> {
        validate_lessons_dir(&self.root)?;
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == LESSON_EXTENSION)
                && let Some(id) = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.parse().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

impl LessonStore for FileLessonStore {
    fn load_lesson_content(&self, lesson_id: LessonId) -> Result<String, StoreError> {
        let path = self.lesson_path(lesson_id);
        if !path.exists() {
            return Err(StoreError::NotFound(lesson_id));
        }
        fs::read_to_string(&path).map_err(StoreError::Io)
    }

    fn save_lesson_content(&self, lesson_id: LessonId, content: &str) -> Result<(), StoreError> {
        let path = self.lesson_path(lesson_id);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)?;
        info!("Saved lesson {lesson_id} to {}", path.display());
        Ok(())
    }
}

/// In-memory store for tests and previews
#[derive(Debug, Default)]
pub struct MemoryLessonStore {
    lessons: Mutex<HashMap<LessonId, String>>,
}

impl MemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lesson(self, lesson_id: LessonId, content: impl Into<String>) -> Self {
        self.lessons
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(lesson_id, content.into());
        self
    }
}

impl LessonStore for MemoryLessonStore {
    fn load_lesson_content(&self, lesson_id: LessonId) -> Result<String, StoreError> {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        let lessons = self.lessons.lock().unwrap_or_else(|e| e.into_inner());
        lessons
            .get(&lesson_id)
            .cloned()
            .ok_or(StoreError::NotFound(lesson_id))
    }

    fn save_lesson_content(&self, lesson_id: LessonId, content: &str) -> Result<(), StoreError> {
        let mut lessons = self.lessons.lock().unwrap_or_else(|e| e.into_inner());
        lessons.insert(lesson_id, content.to_string());
        Ok(())
    }
}

pub fn validate_lessons_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() || !path.is_dir() {
        return Err(StoreError::InvalidLessonsDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_lesson, create_test_lessons_dir};

    #[test]
    fn test_load_existing_lesson() {
        let dir = create_test_lessons_dir();
        create_test_lesson(&dir, 1, "<p>Hello</p>");

        let store = FileLessonStore::new(dir.path());
        assert_eq!(store.load_lesson_content(1).unwrap(), "<p>Hello</p>");
    }

    #[test]
    fn test_load_missing_lesson() {
        let dir = create_test_lessons_dir();
        let store = FileLessonStore::new(dir.path());
        let result = store.load_lesson_content(42);
        assert!(matches!(result, Err(StoreError::NotFound(42))));
    }

    #[test]
    fn test_save_creates_root_directory() {
        let dir = create_test_lessons_dir();
        let store = FileLessonStore::new(dir.path().join("course-1").join("lessons"));

        store.save_lesson_content(3, r#"{"blocks":[]}"#).unwrap();

        assert!(store.root().is_dir());
        assert_eq!(store.load_lesson_content(3).unwrap(), r#"{"blocks":[]}"#);
    }

    #[test]
    fn test_save_overwrites_existing() {
        let dir = create_test_lessons_dir();
        create_test_lesson(&dir, 5, "old");
        let store = FileLessonStore::new(dir.path());

        store.save_lesson_content(5, "new").unwrap();

        assert_eq!(store.load_lesson_content(5).unwrap(), "new");
    }

    #[test]
    fn test_lesson_ids_ignore_other_files() {
        let dir = create_test_lessons_dir();
        create_test_lesson(&dir, 10, "a");
        create_test_lesson(&dir, 2, "b");
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("draft.lesson"), "x").unwrap();

        let store = FileLessonStore::new(dir.path());
        assert_eq!(store.lesson_ids().unwrap(), vec![2, 10]);
    }

    #[test]
    fn test_validate_lessons_dir_not_exists() {
        let result = validate_lessons_dir(Path::new("/nonexistent/path"));
        assert!(matches!(result, Err(StoreError::InvalidLessonsDir(_))));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryLessonStore::new().with_lesson(1, "one");
        store.save_lesson_content(2, "two").unwrap();
        assert_eq!(store.load_lesson_content(1).unwrap(), "one");
        assert_eq!(store.load_lesson_content(2).unwrap(), "two");
        assert!(matches!(
            store.load_lesson_content(3),
            Err(StoreError::NotFound(3))
        ));
    }
}
