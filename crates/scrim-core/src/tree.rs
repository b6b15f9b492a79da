#![forbid(unsafe_code)]

//! The host document tree contract.
//!
//! The engine enhances overlay widgets that the host markup layer
//! already renders; everything it needs from the host is expressed on
//! the [`HostTree`] trait. Nodes are identified by opaque [`NodeId`]s
//! assigned by the host, classified by structural [`Role`]s, and carry
//! a small set of [`NodeFlags`].
//!
//! # Invariants
//!
//! - A node's open/closed state lives only on the host
//!   (`is_open`/`set_open`); the engine reads it on demand and never
//!   mirrors it into its own state.
//! - `set_open` changing the state obligates the host to later deliver
//!   an `Event::Toggle` for the node; a call that does not change the
//!   state must not produce one.
//! - Detached nodes keep their `NodeId`; re-inserting markup creates
//!   fresh nodes with fresh ids.
//!
//! # Failure Modes
//!
//! - Queries on unknown/detached ids must degrade (empty children,
//!   `Role::Other`, zero rect), never panic — enhancement is additive
//!   and the engine absorbs missing structure silently.

use core::time::Duration;

use bitflags::bitflags;

use crate::geometry::{Rect, Size};
use crate::style::Adjustment;

/// Opaque host-assigned node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw host id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

bitflags! {
    /// Per-node state bits shared between the host markup layer and the
    /// engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Enhancement marker; the sole idempotency guard for the
        /// enhancement pass.
        const ENHANCED = 1 << 0;
        /// Excluded from focus and item navigation.
        const DISABLED = 1 << 1;
        /// A non-functional item target; activating it closes the menu
        /// without navigating.
        const PLACEHOLDER = 1 << 2;
        /// Set by the engine while an alert's exit animation runs.
        const DISMISSING = 1 << 3;
        /// The widget is laid out right-aligned by the host styling.
        const RIGHT_ALIGNED = 1 << 4;
    }
}

/// Structural role of a node, per the markup layer's documented
/// conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Top-level menu widget.
    Menu,
    /// Nested menu inside a menu (one level only).
    Submenu,
    /// Modal dialog widget.
    Dialog,
    /// Ephemeral alert element.
    Alert,
    /// The element that toggles its widget open/closed (a menu's
    /// summary). Escape returns focus here.
    Handle,
    /// An overlay's positioned content box.
    Content,
    /// A navigable menu item.
    Item,
    /// A dialog's full-screen backdrop.
    Backdrop,
    /// A close control (dialog close button, alert close button).
    Close,
    /// A host-owned stacking container for alerts in one slot.
    AlertContainer(Slot),
    /// Anything the engine does not care about.
    Other,
}

/// Named screen region where alerts of that slot stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Alert severity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlertKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Host-side description of alert markup. Icon and text assembly are
/// the host's business; the engine only hands over the content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertBlueprint {
    pub kind: AlertKind,
    pub title: Option<String>,
    pub message: Option<String>,
    /// When true the host includes a `Role::Close` control.
    pub closable: bool,
    /// Solid (filled) visual variant instead of outline.
    pub solid: bool,
}

/// The host document tree, as seen by the engine.
///
/// Implementations back the trait with whatever the host actually is —
/// a DOM bridge, a retained widget tree, or the in-memory fixture in
/// `scrim-harness`.
pub trait HostTree {
    /// The document root.
    fn root(&self) -> NodeId;

    /// A node's parent, `None` for the root or detached nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// A node's children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Structural role of a node.
    fn role(&self, node: NodeId) -> Role;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Current flags of a node.
    fn flags(&self, node: NodeId) -> NodeFlags;

    /// Set the given flags on a node (or-assign).
    fn insert_flags(&mut self, node: NodeId, flags: NodeFlags);

    /// Read the host-owned open state. Single source of truth.
    fn is_open(&self, node: NodeId) -> bool;

    /// Request an open-state change. The host delivers the matching
    /// `Event::Toggle` if (and only if) the state actually changed.
    fn set_open(&mut self, node: NodeId, open: bool);

    /// The element currently holding input focus, if any.
    fn focused(&self) -> Option<NodeId>;

    /// Move input focus to a node.
    fn focus(&mut self, node: NodeId);

    /// The host's focus-eligibility heuristic (enabled controls,
    /// reachable tab position). Disabled-ness is reported separately
    /// via `NodeFlags::DISABLED`.
    fn is_focusable(&self, node: NodeId) -> bool;

    /// A node's bounding rectangle in viewport coordinates, as
    /// currently laid out.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Current viewport dimensions.
    fn viewport(&self) -> Size;

    /// Apply positional overrides to an overlay content box.
    fn apply_adjustment(&mut self, node: NodeId, adjustment: &Adjustment);

    /// Remove a node (and its subtree) from the document.
    fn detach(&mut self, node: NodeId);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Auto-dismiss duration declared on alert markup, if any.
    fn auto_dismiss(&self, node: NodeId) -> Option<Duration>;

    /// Whether the host supports the overlay toggle primitive at all.
    /// When false, menu enhancement is disabled entirely.
    fn supports_toggle(&self) -> bool {
        true
    }

    /// Build a detached alert element from a blueprint (markup and icon
    /// assembly are host-side).
    fn build_alert(&mut self, blueprint: &AlertBlueprint) -> NodeId;

    /// Resolve the stacking container for a slot, creating it lazily on
    /// first use. Containers are never destroyed by the engine.
    fn slot_container(&mut self, slot: Slot) -> NodeId;
}
