#![forbid(unsafe_code)]

//! Viewport positioner and geometry probe.
//!
//! Runs once per open transition, after layout settles (frame task).
//! The probe reads the content box rect and viewport from the host; the
//! pure functions below turn them into an [`Adjustment`] the host
//! styling layer applies. Primary overlays anchor to their handle; a
//! sub-overlay anchors to the parent overlay row it sits in, and its
//! adjustment never touches the parent's.
//!
//! # Invariants
//!
//! - All overflow checks evaluate the single probed rect; later fields
//!   override earlier ones (the left-edge clamp beats right-anchoring).
//! - After adjustment, a primary overlay's projected left edge is
//!   non-negative and a sub-overlay's box is fully inside the viewport
//!   on the vertical axis.
//!
//! # Failure Modes
//!
//! - No content box: the widget is skipped entirely.
//! - No handle: the vertical flip (which needs the handle's offset) is
//!   skipped; horizontal correction still applies against the probed
//!   rect.

use scrim_core::{Adjustment, HostTree, Margin, NodeFlags, NodeId, Offset, Rect, Role, Size};
use tracing::trace;

use crate::engine::{Engine, child_with_role};

/// Compute the adjustment for a primary overlay's content box.
///
/// `handle` is the widget's toggle element, when present;
/// `right_aligned` reports whether the host styling already anchors the
/// widget to the right.
#[must_use]
pub fn primary_adjustment(
    content: Rect,
    handle: Option<Rect>,
    viewport: Size,
    right_aligned: bool,
) -> Adjustment {
    let mut adj = Adjustment::default();
    // Where the left edge ends up after any horizontal re-anchoring,
    // so the clamp below judges the adjusted position.
    let mut left_edge = content.x;

    if content.right() > viewport.width as i32 && !right_aligned {
        adj.right = Some(Offset::Px(0));
        adj.left = Some(Offset::Auto);
        if let Some(h) = handle {
            left_edge = h.right() - content.width as i32;
        }
    }

    if content.bottom() > viewport.height as i32
        && let Some(h) = handle
        && h.y > content.height as i32
    {
        adj.top = Some(Offset::Auto);
        adj.bottom = Some(Offset::FullSpan);
        adj.margin_top = Some(Margin::Zero);
        adj.margin_bottom = Some(Margin::Gap);
    }

    if left_edge < 0 {
        adj.left = Some(Offset::Px(0));
        adj.right = Some(Offset::Auto);
    }

    adj
}

/// Compute the adjustment for a sub-overlay's content box, anchored to
/// its parent overlay rather than the viewport trigger.
#[must_use]
pub fn submenu_adjustment(content: Rect, viewport: Size) -> Adjustment {
    let mut adj = Adjustment::default();

    if content.right() > viewport.width as i32 {
        // Flip to the parent's left side.
        adj.left = Some(Offset::Auto);
        adj.right = Some(Offset::FullSpan);
        adj.margin_left = Some(Margin::Zero);
        adj.margin_right = Some(Margin::Gap);
    }

    if content.x < 0 {
        // Flip to the parent's right side.
        adj.left = Some(Offset::FullSpan);
        adj.right = Some(Offset::Auto);
        adj.margin_left = Some(Margin::Gap);
        adj.margin_right = Some(Margin::Zero);
    }

    if content.bottom() > viewport.height as i32 {
        // Shift up by exactly the overflow.
        adj.top = Some(Offset::Px(viewport.height as i32 - content.bottom()));
    }

    if content.y < 0 {
        // Shift down by exactly the negative offset.
        adj.top = Some(Offset::Px(-content.y));
    }

    adj
}

impl Engine {
    /// Frame task after a menu open: probe and correct its content box.
    pub(crate) fn position_widget<T: HostTree>(&mut self, tree: &mut T, widget: NodeId) {
        if !tree.is_open(widget) {
            return;
        }
        let Some(content) = child_with_role(tree, widget, Role::Content) else {
            return;
        };
        let rect = tree.bounding_rect(content);
        let viewport = tree.viewport();
        let handle = child_with_role(tree, widget, Role::Handle).map(|h| tree.bounding_rect(h));
        let right_aligned = tree.flags(widget).contains(NodeFlags::RIGHT_ALIGNED);

        let adj = primary_adjustment(rect, handle, viewport, right_aligned);
        if !adj.is_empty() {
            trace!(widget = widget.raw(), ?adj, "reposition overlay");
            tree.apply_adjustment(content, &adj);
        }
    }

    /// Frame task after a sub-overlay open: probe and correct its
    /// content box against the parent overlay.
    pub(crate) fn position_submenu<T: HostTree>(&mut self, tree: &mut T, submenu: NodeId) {
        if !tree.is_open(submenu) {
            return;
        }
        let Some(content) = child_with_role(tree, submenu, Role::Content) else {
            return;
        };
        let rect = tree.bounding_rect(content);
        let viewport = tree.viewport();

        let adj = submenu_adjustment(rect, viewport);
        if !adj.is_empty() {
            trace!(submenu = submenu.raw(), ?adj, "reposition sub-overlay");
            tree.apply_adjustment(content, &adj);
        }
    }
}
