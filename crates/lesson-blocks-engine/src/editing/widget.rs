use crate::blocks::Document;

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("Editor widget failed to initialize: {0}")]
    Init(String),
}

/// A rich-text editing surface owned by exactly one session.
pub trait EditorWidget {
    /// Tear down the underlying instance. Called once per acquired widget.
    fn release(&mut self);
}

/// Creates editing surfaces for a session, one per `load`.
pub trait WidgetHost {
    fn acquire(&mut self, document: &Document) -> Result<Box<dyn EditorWidget>, WidgetError>;
}

/// Host for sessions with no attached editing surface.
#[derive(Debug, Default)]
pub struct HeadlessHost;

#[derive(Debug)]
struct HeadlessWidget;

impl EditorWidget for HeadlessWidget {
    fn release(&mut self) {}
}

impl WidgetHost for HeadlessHost {
    fn acquire(&mut self, _document: &Document) -> Result<Box<dyn EditorWidget>, WidgetError> {
        Ok(Box::new(HeadlessWidget))
    }
}

/// Owning handle for at most one widget.
///
/// Acquiring again releases the previous widget first; dropping the slot
/// releases whatever it holds.
#[derive(Default)]
pub struct WidgetSlot {
    current: Option<Box<dyn EditorWidget>>,
}

impl WidgetSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, widget: Box<dyn EditorWidget>) {
        self.release();
        self.current = Some(widget);
    }

    /// Safe to call repeatedly
    pub fn release(&mut self) {
        if let Some(mut widget) = self.current.take() {
            widget.release();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.current.is_some()
    }
}

impl std::fmt::Debug for WidgetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Drop for WidgetSlot {
    fn drop(&mut self) {
        self.release();
    }
}
