use std::sync::Arc;

use log::info;

use crate::codec;
use crate::context::SessionContext;
use crate::editing::{EditingSession, SessionError};
use crate::io::{LessonStore, StoreError};
use crate::models::{LessonId, content_preview};
use crate::render::render_document;

pub const DEFAULT_PREVIEW_LENGTH: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Access denied: {0}")]
    AccessDenied(String),
}

/// A lesson ready for a read-only view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLesson {
    pub html: String,
    pub preview: String,
    /// Content was stored in the legacy text format
    pub legacy: bool,
}

#[derive(Clone)]
pub struct LessonService {
    store: Arc<dyn LessonStore>,
    context: SessionContext,
    preview_length: usize,
}

impl LessonService {
    pub fn new(store: Arc<dyn LessonStore>, context: SessionContext) -> Self {
        Self {
            store,
            context,
            preview_length: DEFAULT_PREVIEW_LENGTH,
        }
    }

    pub fn with_preview_length(mut self, preview_length: usize) -> Self {
        self.preview_length = preview_length;
        self
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn view_lesson(&self, lesson_id: LessonId) -> Result<RenderedLesson, ServiceError> {
        let raw = self.store.load_lesson_content(lesson_id)?;
        let document = codec::deserialize(&raw);
        Ok(RenderedLesson {
            html: render_document(&document),
            preview: content_preview(&raw, self.preview_length),
            legacy: document.is_legacy(),
        })
    }

    /// Start authoring a lesson. A lesson with no stored content opens empty.
    pub fn open_for_editing(&self, lesson_id: LessonId) -> Result<EditingSession, ServiceError> {
        self.require_teacher("edit lessons")?;
        let raw = match self.store.load_lesson_content(lesson_id) {
            Ok(raw) => raw,
            Err(StoreError::NotFound(_)) => String::new(),
            Err(e) => return Err(e.into()),
        };
        let mut session = EditingSession::new();
        session.load(&raw)?;
        Ok(session)
    }

    /// Persist the session's current snapshot and clear its dirty flag
    pub fn save(
        &self,
        lesson_id: LessonId,
        session: &mut EditingSession,
    ) -> Result<(), ServiceError> {
        self.require_teacher("save lessons")?;
        let snapshot = session.current_snapshot();
        self.store.save_lesson_content(lesson_id, &snapshot)?;
        session.mark_saved();
        info!("Lesson {lesson_id} saved ({} blocks)", session.document().len());
        Ok(())
    }

    fn require_teacher(&self, action: &str) -> Result<(), ServiceError> {
        if self.context.is_teacher() {
            Ok(())
        } else {
            Err(ServiceError::AccessDenied(format!(
                "only teachers can {action}"
            )))
        }
    }
}
