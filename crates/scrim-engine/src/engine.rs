#![forbid(unsafe_code)]

//! Overlay lifecycle controller.
//!
//! One [`Engine`] coordinates every enhanced widget in a document:
//! it owns the per-widget state, routes host events to the focus,
//! keyboard, positioning, and alert components, and drives deferred
//! work through the scheduler.
//!
//! # Invariants
//!
//! - Open/closed state is read from the host on demand; the engine
//!   never caches it.
//! - Per-widget state is independent; cross-widget interleaving of
//!   deferred work is harmless.
//! - Deferred tasks re-check host state when they run (a widget closed
//!   before its frame task fires is left alone).
//!
//! # Failure Modes
//!
//! - Events about unknown nodes are ignored.
//! - A missing backdrop, close control, content box, or handle skips
//!   only the wiring that needs it.

use core::time::Duration;

use ahash::AHashMap;
use scrim_core::{Event, HostTree, KeyEventKind, NodeId, Role, Scheduler};

use crate::alert::AlertState;

/// Deferred engine work. Tasks are data so the scheduler stays free of
/// callbacks and borrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    /// Focus the first focusable descendant of a freshly opened widget.
    FocusFirst(NodeId),
    /// Reposition a menu's content box against the viewport.
    Position(NodeId),
    /// Reposition a sub-overlay's content box against its parent.
    PositionSub(NodeId),
    /// Auto-dismiss timer expiry for an alert.
    AutoDismiss(NodeId),
    /// Fallback removal for an alert whose exit animation never
    /// completed.
    RemoveFallback(NodeId),
}

/// Widget kind, driving which interactions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WidgetKind {
    Menu,
    Dialog,
}

/// Per-widget engine state. Everything else lives on the host tree.
#[derive(Debug)]
pub(crate) struct WidgetState {
    pub(crate) kind: WidgetKind,
    /// The element focused when the widget last opened; restored on
    /// close and cleared by the restore (or by Escape, which places
    /// focus on the handle instead).
    pub(crate) trigger: Option<NodeId>,
}

/// Enhancement pass bookkeeping, owned by the engine instance: reset
/// when unmarked elements appear, set after a successful pass.
#[derive(Debug, Default)]
pub(crate) struct PassFlags {
    pub(crate) menus_done: bool,
    pub(crate) overlays_done: bool,
    pub(crate) toggle_warned: bool,
}

/// Engine tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// How long to wait for the dismiss animation before removing an
    /// alert anyway (300 ms animation + 100 ms buffer).
    pub fallback_removal: Duration,
    /// The styling effect name that marks a finished dismiss animation.
    pub dismiss_effect: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_removal: Duration::from_millis(400),
            dismiss_effect: "alert-slide-out".to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the fallback removal delay.
    #[must_use]
    pub fn fallback_removal(mut self, delay: Duration) -> Self {
        self.fallback_removal = delay;
        self
    }

    /// Set the dismiss-effect name to match on animation completion.
    #[must_use]
    pub fn dismiss_effect(mut self, effect: impl Into<String>) -> Self {
        self.dismiss_effect = effect.into();
        self
    }
}

/// The overlay interaction engine.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) sched: Scheduler<Task>,
    pub(crate) widgets: AHashMap<NodeId, WidgetState>,
    /// Sub-overlay node → its parent menu.
    pub(crate) submenus: AHashMap<NodeId, NodeId>,
    pub(crate) alerts: AHashMap<NodeId, AlertState>,
    pub(crate) passes: PassFlags,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with explicit configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            sched: Scheduler::new(),
            widgets: AHashMap::new(),
            submenus: AHashMap::new(),
            alerts: AHashMap::new(),
            passes: PassFlags::default(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of widgets currently enhanced.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Route one host event. Runs to completion; deferred side effects
    /// land on the scheduler.
    pub fn handle_event<T: HostTree>(&mut self, tree: &mut T, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(tree, key),
            Event::Key(_) => {}
            Event::PointerDown { target } => self.on_pointer_down(tree, *target),
            Event::Toggle { node, open } => self.on_toggle(tree, *node, *open),
            Event::AnimationEnd { target, effect } => {
                self.on_animation_end(tree, *target, effect);
            }
            Event::Inserted(nodes) => self.on_inserted(tree, nodes),
        }
    }

    /// Run the work deferred to the next frame (focus moves and
    /// positioning, after layout has settled).
    pub fn on_frame<T: HostTree>(&mut self, tree: &mut T) {
        for task in self.sched.take_frame() {
            self.run_task(tree, task);
        }
    }

    /// Advance the virtual clock and fire due timers (auto-dismiss,
    /// fallback removal).
    pub fn advance<T: HostTree>(&mut self, tree: &mut T, dt: Duration) {
        for task in self.sched.advance(dt) {
            self.run_task(tree, task);
        }
    }

    fn run_task<T: HostTree>(&mut self, tree: &mut T, task: Task) {
        match task {
            Task::FocusFirst(widget) => self.focus_first(tree, widget),
            Task::Position(widget) => self.position_widget(tree, widget),
            Task::PositionSub(submenu) => self.position_submenu(tree, submenu),
            Task::AutoDismiss(alert) => self.dismiss(tree, alert),
            Task::RemoveFallback(alert) => self.finish_fallback(tree, alert),
        }
    }

    fn on_toggle<T: HostTree>(&mut self, tree: &mut T, node: NodeId, open: bool) {
        let Some(kind) = self.widgets.get(&node).map(|state| state.kind) else {
            if open && self.submenus.contains_key(&node) {
                self.sched.defer_frame(Task::PositionSub(node));
            }
            return;
        };
        if open {
            self.capture_trigger(tree, node);
            self.sched.defer_frame(Task::FocusFirst(node));
            if kind == WidgetKind::Menu {
                self.sched.defer_frame(Task::Position(node));
            }
        } else {
            self.restore_focus(tree, node);
        }
    }

    fn on_pointer_down<T: HostTree>(&mut self, tree: &mut T, target: Option<NodeId>) {
        if let Some(node) = target {
            match tree.role(node) {
                Role::Backdrop => {
                    if let Some((dialog, WidgetKind::Dialog)) = self.enclosing_widget(tree, node) {
                        tree.set_open(dialog, false);
                    }
                }
                Role::Close => {
                    if let Some(alert) = self.enclosing_alert(tree, node) {
                        self.dismiss(tree, alert);
                    } else if let Some((dialog, WidgetKind::Dialog)) =
                        self.enclosing_widget(tree, node)
                    {
                        tree.set_open(dialog, false);
                    }
                }
                _ => {}
            }
        }
        self.close_outside_menus(tree, target);
    }

    /// Document-level outside-click: every open menu not containing the
    /// click target closes. A click inside a sub-overlay is inside its
    /// parent menu by containment, so it never counts as outside.
    fn close_outside_menus<T: HostTree>(&mut self, tree: &mut T, target: Option<NodeId>) {
        let menus: Vec<NodeId> = self
            .widgets
            .iter()
            .filter(|(_, state)| state.kind == WidgetKind::Menu)
            .map(|(&id, _)| id)
            .collect();
        for menu in menus {
            if !tree.is_open(menu) {
                continue;
            }
            let inside = target.is_some_and(|t| tree.contains(menu, t));
            if !inside {
                tree.set_open(menu, false);
            }
        }
    }

    /// The nearest enhanced primary widget containing `node` (the node
    /// itself included). Sub-overlays resolve to their parent menu.
    pub(crate) fn enclosing_widget<T: HostTree>(
        &self,
        tree: &T,
        node: NodeId,
    ) -> Option<(NodeId, WidgetKind)> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let Some(state) = self.widgets.get(&n) {
                return Some((n, state.kind));
            }
            cur = tree.parent(n);
        }
        None
    }

    /// The nearest registered alert containing `node`.
    pub(crate) fn enclosing_alert<T: HostTree>(&self, tree: &T, node: NodeId) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.alerts.contains_key(&n) {
                return Some(n);
            }
            cur = tree.parent(n);
        }
        None
    }
}

/// First direct child of `node` with the given role, if any.
pub(crate) fn child_with_role<T: HostTree>(tree: &T, node: NodeId, role: Role) -> Option<NodeId> {
    tree.children(node)
        .into_iter()
        .find(|&child| tree.role(child) == role)
}
