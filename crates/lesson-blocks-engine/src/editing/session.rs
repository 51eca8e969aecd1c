use log::warn;

use crate::blocks::{Block, Document, TableError, TableGrid};
use crate::codec::{self, EMPTY_CONTENT};
use crate::editing::widget::{HeadlessHost, WidgetHost, WidgetSlot};
use crate::editing::{BlockId, Cmd, Patch, TableEdit};

/// Lifecycle of an editing session.
///
/// `Uninitialized -> Loaded -> Editing -> Disposed`. Every successful edit
/// (re-)enters `Editing`; `load` may be called again from `Loaded` or
/// `Editing` and re-enters `Loaded`. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loaded,
    Editing,
    Disposed,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Editing session has been disposed")]
    SessionClosed,
    #[error("Editing session has no content loaded")]
    NotLoaded,
    #[error("No block with id {0}")]
    UnknownBlock(BlockId),
    #[error("Position {index} is out of range (document has {len} blocks)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Block {0} is not a table")]
    NotATable(BlockId),
    #[error("Table edit failed: {0}")]
    Table(#[from] TableError),
}

type ChangeListener = Box<dyn FnMut(&str)>;

/// Mutable authoring state for one lesson document.
///
/// The session owns its document, a session-local [`BlockId`] per block, and
/// the editor widget acquired on `load`. Every successful edit publishes a
/// fresh serialized snapshot to the change listener. If a snapshot cannot be
/// produced the failure is logged and the last good snapshot is kept.
///
/// ```rust
/// # use lesson_blocks_engine::{Block, EditingSession};
/// let mut session = EditingSession::new();
/// session.load("<p>Old lesson</p>").unwrap();
/// session.append_block(Block::heading(2, "Summary")).unwrap();
///
/// let saved = session.current_snapshot();
/// assert!(saved.starts_with(r#"{"blocks":["#));
///
/// session.dispose();
/// assert!(session.append_block(Block::Delimiter).is_err());
/// ```
pub struct EditingSession {
    state: SessionState,
    document: Document,
    ids: Vec<BlockId>,
    version: u64,
    dirty: bool,
    last_snapshot: String,
    host: Box<dyn WidgetHost>,
    widget: WidgetSlot,
    notifications_active: bool,
    listener: Option<ChangeListener>,
}

impl EditingSession {
    /// Session with no attached editing surface
    pub fn new() -> Self {
        Self::with_widget_host(HeadlessHost)
    }

    pub fn with_widget_host(host: impl WidgetHost + 'static) -> Self {
        Self {
            state: SessionState::Uninitialized,
            document: Document::new(),
            ids: Vec::new(),
            version: 0,
            dirty: false,
            last_snapshot: EMPTY_CONTENT.to_string(),
            host: Box::new(host),
            widget: WidgetSlot::new(),
            notifications_active: false,
            listener: None,
        }
    }

    /// Register the callback that receives a snapshot after every edit.
    /// Replaces any previous listener.
    pub fn on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Replace the session's content with `raw` and reset change tracking.
    ///
    /// Any previously acquired widget is released before a new one is
    /// acquired. If acquisition fails the session stays usable, but change
    /// notifications stay off until a later `load` succeeds.
    pub fn load(&mut self, raw: &str) -> Result<(), SessionError> {
        if self.state == SessionState::Disposed {
            return Err(SessionError::SessionClosed);
        }

        self.widget.release();
        self.document = codec::deserialize(raw);
        self.ids = self.document.blocks().iter().map(|_| BlockId::new()).collect();
        self.version = 0;
        self.dirty = false;
        self.last_snapshot = match codec::serialize(&self.document) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Could not snapshot loaded content, keeping it as given: {e}");
                raw.to_string()
            }
        };

        match self.host.acquire(&self.document) {
            Ok(widget) => {
                self.widget.replace(widget);
                self.notifications_active = true;
            }
            Err(e) => {
                warn!("Editing without change notifications: {e}");
                self.notifications_active = false;
            }
        }

        self.state = SessionState::Loaded;
        Ok(())
    }

    /// Apply an edit and publish the resulting snapshot.
    ///
    /// A failed command leaves the document, version and state untouched.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, SessionError> {
        match self.state {
            SessionState::Disposed => return Err(SessionError::SessionClosed),
            SessionState::Uninitialized => return Err(SessionError::NotLoaded),
            SessionState::Loaded | SessionState::Editing => {}
        }

        let (changed, removed) = self.execute(cmd)?;
        self.version += 1;
        self.dirty = true;
        self.state = SessionState::Editing;
        self.publish();

        Ok(Patch {
            changed,
            removed,
            version: self.version,
        })
    }

    pub fn insert_block(&mut self, at: usize, block: Block) -> Result<BlockId, SessionError> {
        let patch = self.apply(Cmd::InsertBlock { at, block })?;
        Ok(patch.changed[0])
    }

    pub fn append_block(&mut self, block: Block) -> Result<BlockId, SessionError> {
        self.insert_block(self.document.len(), block)
    }

    pub fn update_block(&mut self, id: BlockId, block: Block) -> Result<(), SessionError> {
        self.apply(Cmd::UpdateBlock { id, block }).map(|_| ())
    }

    pub fn remove_block(&mut self, id: BlockId) -> Result<(), SessionError> {
        self.apply(Cmd::RemoveBlock { id }).map(|_| ())
    }

    pub fn move_block(&mut self, id: BlockId, to: usize) -> Result<(), SessionError> {
        self.apply(Cmd::MoveBlock { id, to }).map(|_| ())
    }

    pub fn edit_table(&mut self, id: BlockId, edit: TableEdit) -> Result<(), SessionError> {
        self.apply(Cmd::EditTable { id, edit }).map(|_| ())
    }

    /// Serialized form of the current content. Has no effect on the session.
    pub fn current_snapshot(&self) -> String {
        match codec::serialize(&self.document) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Snapshot failed, returning last good snapshot: {e}");
                self.last_snapshot.clone()
            }
        }
    }

    /// Release the widget and stop notifications. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.widget.release();
        self.listener = None;
        self.notifications_active = false;
        self.state = SessionState::Disposed;
    }

    /// Clear the dirty flag after the caller has persisted a snapshot
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Ids in document order
    pub fn block_ids(&self) -> &[BlockId] {
        &self.ids
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.position(id).and_then(|i| self.document.get(i))
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn notifications_active(&self) -> bool {
        self.notifications_active
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_attached()
    }

    fn execute(&mut self, cmd: Cmd) -> Result<(Vec<BlockId>, Vec<BlockId>), SessionError> {
        match cmd {
            Cmd::InsertBlock { at, block } => {
                let len = self.document.len();
                if at > len {
                    return Err(SessionError::IndexOutOfRange { index: at, len });
                }
                let id = BlockId::new();
                self.document.insert(at, block);
                self.ids.insert(at, id);
                Ok((vec![id], vec![]))
            }
            Cmd::UpdateBlock { id, block } => {
                let index = self.index_of(id)?;
                self.document.replace(index, block);
                Ok((vec![id], vec![]))
            }
            Cmd::RemoveBlock { id } => {
                let index = self.index_of(id)?;
                self.document.remove(index);
                self.ids.remove(index);
                Ok((vec![], vec![id]))
            }
            Cmd::MoveBlock { id, to } => {
                let index = self.index_of(id)?;
                let len = self.document.len();
                if to >= len {
                    return Err(SessionError::IndexOutOfRange { index: to, len });
                }
                let block = self.document.remove(index);
                self.ids.remove(index);
                self.document.insert(to, block);
                self.ids.insert(to, id);
                Ok((vec![id], vec![]))
            }
            Cmd::EditTable { id, edit } => {
                let index = self.index_of(id)?;
                let Some(Block::Table(data)) = self.document.get(index) else {
                    return Err(SessionError::NotATable(id));
                };
                let mut grid = TableGrid::from_data(data);
                edit.apply_to(&mut grid)?;
                self.document.replace(index, Block::table(&grid));
                Ok((vec![id], vec![]))
            }
        }
    }

    fn index_of(&self, id: BlockId) -> Result<usize, SessionError> {
        self.position(id).ok_or(SessionError::UnknownBlock(id))
    }

    fn publish(&mut self) {
        match codec::serialize(&self.document) {
            Ok(snapshot) => self.last_snapshot = snapshot,
            Err(e) => warn!("Snapshot failed, keeping last good snapshot: {e}"),
        }
        if !self.notifications_active {
            return;
        }
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.last_snapshot);
        }
    }
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingSession")
            .field("state", &self.state)
            .field("blocks", &self.document.len())
            .field("version", &self.version)
            .field("dirty", &self.dirty)
            .field("widget", &self.widget)
            .field("notifications_active", &self.notifications_active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{ListStyle, TableData};
    use crate::editing::widget::{EditorWidget, WidgetError};
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn loaded(raw: &str) -> EditingSession {
        let mut session = EditingSession::new();
        session.load(raw).unwrap();
        session
    }

    fn recording(session: &mut EditingSession) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.on_change(move |snapshot| sink.borrow_mut().push(snapshot.to_string()));
        seen
    }

    struct FailingHost;

    impl WidgetHost for FailingHost {
        fn acquire(&mut self, _: &Document) -> Result<Box<dyn EditorWidget>, WidgetError> {
            Err(WidgetError::Init("no container element".into()))
        }
    }

    struct TrackingWidget(Rc<Cell<u32>>);

    impl EditorWidget for TrackingWidget {
        fn release(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct TrackingHost {
        acquired: Rc<Cell<u32>>,
        released: Rc<Cell<u32>>,
    }

    impl WidgetHost for TrackingHost {
        fn acquire(&mut self, _: &Document) -> Result<Box<dyn EditorWidget>, WidgetError> {
            self.acquired.set(self.acquired.get() + 1);
            Ok(Box::new(TrackingWidget(self.released.clone())))
        }
    }

    #[test]
    fn starts_uninitialized_and_rejects_edits() {
        let mut session = EditingSession::new();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(session.current_snapshot(), EMPTY_CONTENT);
        assert!(matches!(
            session.append_block(Block::Delimiter),
            Err(SessionError::NotLoaded)
        ));
    }

    #[test]
    fn edits_move_through_editing_state() {
        let mut session = loaded("");
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(!session.is_dirty());

        session.append_block(Block::paragraph("Hi")).unwrap();
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.is_dirty());
        assert_eq!(session.version(), 1);

        session.load("").unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.version(), 0);
        assert!(!session.is_dirty());
    }

    #[test]
    fn every_edit_notifies_in_order() {
        let mut session = loaded("");
        let seen = recording(&mut session);

        let first = session.append_block(Block::paragraph("one")).unwrap();
        session.append_block(Block::paragraph("two")).unwrap();
        session.remove_block(first).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("one") && !seen[0].contains("two"));
        assert!(seen[1].contains("one") && seen[1].contains("two"));
        assert!(!seen[2].contains("one"));
        assert_eq!(seen[2], session.current_snapshot());
    }

    #[test]
    fn failed_command_changes_nothing() {
        let mut session = loaded("");
        let seen = recording(&mut session);
        let err = session.insert_block(5, Block::Delimiter).unwrap_err();
        assert!(matches!(
            err,
            SessionError::IndexOutOfRange { index: 5, len: 0 }
        ));
        assert_eq!(session.version(), 0);
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn update_keeps_id_and_position() {
        let mut session = loaded("");
        let a = session.append_block(Block::paragraph("a")).unwrap();
        let b = session.append_block(Block::paragraph("b")).unwrap();
        session.update_block(a, Block::heading(1, "A")).unwrap();
        assert_eq!(session.block_ids(), &[a, b]);
        assert_eq!(session.block(a), Some(&Block::heading(1, "A")));
    }

    #[test]
    fn move_block_reorders_ids_with_blocks() {
        let mut session = loaded("");
        let a = session.append_block(Block::paragraph("a")).unwrap();
        let b = session.append_block(Block::paragraph("b")).unwrap();
        let c = session.append_block(Block::paragraph("c")).unwrap();
        session.move_block(a, 2).unwrap();
        assert_eq!(session.block_ids(), &[b, c, a]);
        assert_eq!(session.document().get(2), Some(&Block::paragraph("a")));
        assert!(matches!(
            session.move_block(a, 3),
            Err(SessionError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn unknown_block_id_is_rejected() {
        let mut session = loaded("");
        let stray = BlockId::new();
        assert!(matches!(
            session.remove_block(stray),
            Err(SessionError::UnknownBlock(id)) if id == stray
        ));
    }

    #[test]
    fn table_edits_go_through_grid() {
        let mut session = loaded("");
        let id = session.append_block(Block::create("table", None).unwrap()).unwrap();
        session
            .edit_table(
                id,
                TableEdit::SetCell {
                    row: 0,
                    column: 0,
                    text: "Term".into(),
                },
            )
            .unwrap();
        session.edit_table(id, TableEdit::SetHeadings(false)).unwrap();

        let Some(Block::Table(TableData {
            with_headings,
            content,
        })) = session.block(id)
        else {
            panic!("expected table");
        };
        assert!(!with_headings);
        assert_eq!(content[0][0], "Term");
        assert_eq!(content.len(), 3);
    }

    #[test]
    fn table_edit_on_other_kind_fails() {
        let mut session = loaded("");
        let id = session
            .append_block(Block::list(ListStyle::Unordered, vec![]))
            .unwrap();
        assert!(matches!(
            session.edit_table(id, TableEdit::AddRow),
            Err(SessionError::NotATable(_))
        ));
    }

    #[test]
    fn table_edit_out_of_range_surfaces_table_error() {
        let mut session = loaded("");
        let id = session.append_block(Block::create("table", None).unwrap()).unwrap();
        assert!(matches!(
            session.edit_table(id, TableEdit::RemoveColumn(7)),
            Err(SessionError::Table(TableError::ColumnOutOfRange { column: 7, .. }))
        ));
    }

    #[test]
    fn dispose_is_terminal_and_idempotent() {
        let mut session = loaded("<p>x</p>");
        session.dispose();
        session.dispose();
        assert_eq!(session.state(), SessionState::Disposed);
        assert!(matches!(
            session.append_block(Block::Delimiter),
            Err(SessionError::SessionClosed)
        ));
        assert!(matches!(session.load(""), Err(SessionError::SessionClosed)));
        // Snapshots remain readable after disposal.
        assert!(session.current_snapshot().contains("<p>x</p>"));
    }

    #[test]
    fn failed_widget_init_leaves_session_usable_without_notifications() {
        let mut session = EditingSession::with_widget_host(FailingHost);
        session.load("").unwrap();
        let seen = recording(&mut session);

        session.append_block(Block::paragraph("still works")).unwrap();
        assert!(!session.notifications_active());
        assert!(!session.has_widget());
        assert!(seen.borrow().is_empty());
        assert!(session.current_snapshot().contains("still works"));
    }

    #[test]
    fn reload_releases_previous_widget() {
        let acquired = Rc::new(Cell::new(0));
        let released = Rc::new(Cell::new(0));
        let mut session = EditingSession::with_widget_host(TrackingHost {
            acquired: acquired.clone(),
            released: released.clone(),
        });

        session.load("a").unwrap();
        session.load("b").unwrap();
        assert_eq!((acquired.get(), released.get()), (2, 1));

        session.dispose();
        session.dispose();
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn dropping_session_releases_widget() {
        let released = Rc::new(Cell::new(0));
        {
            let mut session = EditingSession::with_widget_host(TrackingHost {
                acquired: Rc::new(Cell::new(0)),
                released: released.clone(),
            });
            session.load("").unwrap();
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn snapshot_has_no_side_effects() {
        let mut session = loaded("");
        session.append_block(Block::code("x")).unwrap();
        let before = (session.version(), session.is_dirty(), session.state());
        let first = session.current_snapshot();
        let second = session.current_snapshot();
        assert_eq!(first, second);
        assert_eq!(
            (session.version(), session.is_dirty(), session.state()),
            before
        );
    }

    #[test]
    fn untouched_legacy_content_snapshots_verbatim() {
        let session = loaded("<p>Hello</p>");
        let snapshot = session.current_snapshot();
        assert_eq!(snapshot, "<p>Hello</p>");

        let reloaded = codec::deserialize(&snapshot);
        assert_eq!(&reloaded, session.document());
        assert_eq!(
            crate::render::render_document(&reloaded),
            crate::render::render_document(session.document())
        );
    }

    #[test]
    fn editing_legacy_content_upgrades_it() {
        let mut session = loaded("<p>Intro</p>");
        assert!(session.document().is_legacy());
        session.append_block(Block::Delimiter).unwrap();
        assert!(!session.document().is_legacy());
        assert_eq!(
            session.current_snapshot(),
            r#"{"blocks":[{"type":"paragraph","data":{"text":"<p>Intro</p>"}},{"type":"delimiter","data":{}}]}"#
        );
    }
}
