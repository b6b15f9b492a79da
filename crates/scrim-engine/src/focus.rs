#![forbid(unsafe_code)]

//! Focus trap and restoration.
//!
//! Opening a widget captures whatever held focus as the trigger
//! reference; the first focusable descendant of the overlay content is
//! focused on the next frame. Closing restores the captured element
//! and clears the reference so a later open captures a fresh one. Tab
//! at the boundary wraps inside the widget; everywhere else the host's
//! default traversal is left alone.
//!
//! # Invariants
//!
//! - Zero focusable descendants make every operation here a no-op.
//! - The trigger reference is cleared on restore; a second close for
//!   the same open is a no-op.

use scrim_core::{HostTree, NodeId, Role};
use tracing::trace;

use crate::engine::{Engine, child_with_role};
use crate::focusable::focusable_descendants;

impl Engine {
    /// Open transition: remember what held focus so close can restore
    /// it.
    pub(crate) fn capture_trigger<T: HostTree>(&mut self, tree: &T, widget: NodeId) {
        let focused = tree.focused();
        if let Some(state) = self.widgets.get_mut(&widget) {
            state.trigger = focused;
        }
    }

    /// Frame task after an open transition: focus the first focusable
    /// descendant of the overlay content. Re-checks the host open state
    /// because the widget may have closed before the frame ran.
    pub(crate) fn focus_first<T: HostTree>(&mut self, tree: &mut T, widget: NodeId) {
        if !tree.is_open(widget) {
            return;
        }
        let scope = child_with_role(tree, widget, Role::Content).unwrap_or(widget);
        if let Some(&first) = focusable_descendants(tree, scope).first() {
            trace!(widget = widget.raw(), target = first.raw(), "focus first");
            tree.focus(first);
        }
    }

    /// Close transition: restore focus to the stored trigger reference,
    /// if one survives, and clear it.
    pub(crate) fn restore_focus<T: HostTree>(&mut self, tree: &mut T, widget: NodeId) {
        let Some(state) = self.widgets.get_mut(&widget) else {
            return;
        };
        if let Some(trigger) = state.trigger.take() {
            trace!(widget = widget.raw(), target = trigger.raw(), "restore focus");
            tree.focus(trigger);
        }
    }

    /// Tab handling while a dialog is open: wrap at either boundary,
    /// otherwise leave the host's default traversal alone.
    pub(crate) fn trap_tab<T: HostTree>(&mut self, tree: &mut T, widget: NodeId, reverse: bool) {
        let focusables = focusable_descendants(tree, widget);
        let (Some(&first), Some(&last)) = (focusables.first(), focusables.last()) else {
            return;
        };
        let active = tree.focused();
        if reverse {
            if active == Some(first) {
                tree.focus(last);
            }
        } else if active == Some(last) {
            tree.focus(first);
        }
    }
}
