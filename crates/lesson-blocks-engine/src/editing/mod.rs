/*!
 * # Editing Session Module
 *
 * Authoring-time ownership of one lesson document.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Owner
 * - An **`EditingSession`** owns the `Document` being authored and the editor
 *   widget attached to it
 * - Read-only views never go through a session; they deserialize and render
 *
 * ### 2. Command-Based Editing
 * - All edits are **Commands** (`Cmd`) applied through `EditingSession::apply`
 * - Each successful command returns a **`Patch`** and bumps the version
 * - Table edits go through `TableGrid`, so saving always re-derives
 *   `withHeadings` from whether a header section exists
 *
 * ### 3. Stable Block IDs
 * - Every block in a session has a **`BlockId`** that survives reordering
 *   and updates
 * - Ids are session-local and never persisted
 *
 * ### 4. Snapshots and Change Notification
 * - `current_snapshot()` serializes on demand without side effects
 * - Each edit pushes a fresh snapshot to the registered listener
 * - A snapshot failure is logged and the last good snapshot is kept
 *
 * ### 5. Widget Lifecycle
 * - A `WidgetHost` acquires an `EditorWidget` on every `load`
 * - Re-acquiring releases the previous widget; `dispose` and drop release it
 * - Acquisition failure is non-fatal: notifications stay off until the next
 *   successful `load`
 *
 * ## Module Structure
 *
 * - **`session`**: `EditingSession` and its state machine
 * - **`commands`**: `Cmd` and `TableEdit`
 * - **`patch`**: edit result metadata
 * - **`widget`**: widget traits and the owning `WidgetSlot`
 */

pub mod commands;
pub mod patch;
pub mod session;
pub mod widget;

pub use commands::{Cmd, TableEdit};
pub use patch::Patch;
pub use session::{EditingSession, SessionError, SessionState};
pub use widget::{EditorWidget, HeadlessHost, WidgetError, WidgetHost, WidgetSlot};

use std::fmt;

use uuid::Uuid;

/// Session-local identity of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
