#![forbid(unsafe_code)]

//! Enhancement passes and the structural change watcher.
//!
//! Enhancement is a scan for overlay elements lacking the `ENHANCED`
//! marker; the marker is the sole idempotency guard, so re-running a
//! pass never re-binds (and in particular never re-arms an alert's
//! auto-dismiss timer). The pass flags are engine-owned state: set
//! after a successful pass, reset when a structural change surfaces
//! unmarked elements.
//!
//! # Failure Modes
//!
//! - Host without the toggle primitive: menu enhancement is disabled
//!   entirely (warned once); dialogs and alerts are unaffected.
//! - A pass over a tree with no overlay elements leaves the pass flag
//!   unset for menus (matching the original early-return) and set for
//!   dialogs/alerts.

use scrim_core::{HostTree, NodeFlags, NodeId, Role};
use tracing::{debug, warn};

use crate::engine::{Engine, WidgetKind, WidgetState};
use crate::focusable::descendants_matching;

struct StalePasses {
    menus: bool,
    overlays: bool,
}

impl Engine {
    /// Run the enhancement pass over the whole document. Idempotent:
    /// already-marked elements are skipped, and a completed pass
    /// short-circuits until the watcher resets it.
    pub fn enhance<T: HostTree>(&mut self, tree: &mut T) {
        self.enhance_menus(tree);
        self.enhance_overlays(tree);
    }

    fn enhance_menus<T: HostTree>(&mut self, tree: &mut T) {
        if !tree.supports_toggle() {
            if !self.passes.toggle_warned {
                warn!("host lacks the overlay toggle primitive; menu enhancement disabled");
                self.passes.toggle_warned = true;
            }
            return;
        }
        if self.passes.menus_done {
            return;
        }
        let menus = unmarked(tree, Role::Menu);
        if menus.is_empty() {
            return;
        }
        for &menu in &menus {
            tree.insert_flags(menu, NodeFlags::ENHANCED);
            self.widgets.insert(
                menu,
                WidgetState {
                    kind: WidgetKind::Menu,
                    trigger: None,
                },
            );
            for submenu in descendants_matching(tree, menu, |t, n| t.role(n) == Role::Submenu) {
                self.submenus.insert(submenu, menu);
            }
        }
        self.passes.menus_done = true;
        debug!(count = menus.len(), "enhanced menus");
    }

    fn enhance_overlays<T: HostTree>(&mut self, tree: &mut T) {
        if self.passes.overlays_done {
            return;
        }
        let dialogs = unmarked(tree, Role::Dialog);
        for &dialog in &dialogs {
            tree.insert_flags(dialog, NodeFlags::ENHANCED);
            self.widgets.insert(
                dialog,
                WidgetState {
                    kind: WidgetKind::Dialog,
                    trigger: None,
                },
            );
        }
        let alerts = unmarked(tree, Role::Alert);
        for &alert in &alerts {
            tree.insert_flags(alert, NodeFlags::ENHANCED);
            self.register_alert(alert, tree.auto_dismiss(alert));
        }
        self.passes.overlays_done = true;
        if !dialogs.is_empty() || !alerts.is_empty() {
            debug!(
                dialogs = dialogs.len(),
                alerts = alerts.len(),
                "enhanced dialogs and alerts"
            );
        }
    }

    /// Structural change watcher: on an insertion batch, re-query for
    /// unmarked overlay elements and re-run the pass over them only.
    pub(crate) fn on_inserted<T: HostTree>(&mut self, tree: &mut T, nodes: &[NodeId]) {
        if nodes.is_empty() {
            return;
        }
        let stale = stale_passes(tree);
        if !stale.menus && !stale.overlays {
            return;
        }
        if stale.menus {
            self.passes.menus_done = false;
        }
        if stale.overlays {
            self.passes.overlays_done = false;
        }
        self.enhance(tree);
    }
}

/// All nodes of `role` in the document still lacking the marker.
fn unmarked<T: HostTree>(tree: &T, role: Role) -> Vec<NodeId> {
    descendants_matching(tree, tree.root(), |t, n| {
        t.role(n) == role && !t.flags(n).contains(NodeFlags::ENHANCED)
    })
}

/// One walk answering both "any unmarked menus?" and "any unmarked
/// dialogs/alerts?".
fn stale_passes<T: HostTree>(tree: &T) -> StalePasses {
    let mut stale = StalePasses {
        menus: false,
        overlays: false,
    };
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        if !tree.flags(node).contains(NodeFlags::ENHANCED) {
            match tree.role(node) {
                Role::Menu => stale.menus = true,
                Role::Dialog | Role::Alert => stale.overlays = true,
                _ => {}
            }
        }
        if stale.menus && stale.overlays {
            break;
        }
        stack.extend(tree.children(node));
    }
    stale
}
