#![forbid(unsafe_code)]

//! In-memory host tree fixture for exercising the scrim engine.
//!
//! [`TestTree`] is an arena-backed implementation of
//! [`scrim_core::HostTree`] with just enough layout semantics to make
//! the engine's behavior observable:
//!
//! - `set_open` queues the `Event::Toggle` the real host would emit;
//!   tests drain it with [`TestTree::take_events`] and feed it back to
//!   the engine.
//! - Applied [`Adjustment`]s are recorded and resolved against the
//!   content box's anchor (its parent node's rect), so containment
//!   properties can be asserted on real coordinates.
//! - Focus moves and detaches are logged, which makes exactly-once and
//!   idempotency claims checkable by counting.
//!
//! The fixture deliberately has no clock and no event loop of its own;
//! the test drives `Engine::on_frame` / `Engine::advance` explicitly.

use core::time::Duration;

use ahash::AHashMap;
use scrim_core::{
    Adjustment, AlertBlueprint, Event, HostTree, Margin, NodeFlags, NodeId, Offset, Rect, Role,
    Size, Slot,
};

/// The host's standard spacing unit, in pixels.
pub const GAP: i32 = 4;

#[derive(Debug, Clone)]
struct Node {
    role: Role,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    flags: NodeFlags,
    open: bool,
    focusable: bool,
    auto_dismiss: Option<Duration>,
    adjustment: Option<Adjustment>,
}

impl Node {
    fn new(role: Role, parent: Option<NodeId>, rect: Rect) -> Self {
        Self {
            role,
            parent,
            children: Vec::new(),
            rect,
            flags: NodeFlags::empty(),
            open: false,
            focusable: false,
            auto_dismiss: None,
            adjustment: None,
        }
    }
}

/// Handles to the parts of a generated menu (or submenu) fixture.
#[derive(Debug, Clone, Copy)]
pub struct MenuParts {
    pub menu: NodeId,
    pub handle: NodeId,
    pub content: NodeId,
}

/// Handles to the parts of a generated dialog fixture.
#[derive(Debug, Clone, Copy)]
pub struct DialogParts {
    pub dialog: NodeId,
    pub backdrop: NodeId,
    pub content: NodeId,
    pub close: NodeId,
}

/// An arena-backed in-memory host tree.
pub struct TestTree {
    nodes: Vec<Node>,
    root: NodeId,
    viewport: Size,
    focused: Option<NodeId>,
    pending: Vec<Event>,
    focus_log: Vec<NodeId>,
    detach_log: Vec<NodeId>,
    containers: AHashMap<Slot, NodeId>,
    toggle_support: bool,
}

impl TestTree {
    /// Create a tree with a root node spanning the given viewport.
    #[must_use]
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        let viewport = Size::new(viewport_width, viewport_height);
        let root_rect = Rect::new(0, 0, viewport_width, viewport_height);
        Self {
            nodes: vec![Node::new(Role::Other, None, root_rect)],
            root: NodeId::new(0),
            viewport,
            focused: None,
            pending: Vec::new(),
            focus_log: Vec::new(),
            detach_log: Vec::new(),
            containers: AHashMap::new(),
            toggle_support: true,
        }
    }

    /// Simulate a host without the overlay toggle primitive.
    #[must_use]
    pub fn without_toggle_support(mut self) -> Self {
        self.toggle_support = false;
        self
    }

    fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.raw() as usize)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node.raw() as usize)
    }

    fn alloc(&mut self, role: Role, parent: Option<NodeId>, rect: Rect) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u64);
        self.nodes.push(Node::new(role, parent, rect));
        if let Some(p) = parent
            && let Some(pn) = self.get_mut(p)
        {
            pn.children.push(id);
        }
        id
    }

    // --- Fixture construction ---

    /// Add a node with the given role and rect under `parent`.
    pub fn add(&mut self, parent: NodeId, role: Role, rect: Rect) -> NodeId {
        self.alloc(role, Some(parent), rect)
    }

    /// Mark a node focus-eligible (the host heuristic saying yes).
    pub fn set_focusable(&mut self, node: NodeId, focusable: bool) {
        if let Some(n) = self.get_mut(node) {
            n.focusable = focusable;
        }
    }

    /// Set flags directly on a node (markup-declared state).
    pub fn flag(&mut self, node: NodeId, flags: NodeFlags) {
        if let Some(n) = self.get_mut(node) {
            n.flags |= flags;
        }
    }

    /// Override a node's laid-out rect.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.get_mut(node) {
            n.rect = rect;
        }
    }

    /// Declare a markup auto-dismiss duration on an alert node.
    pub fn set_auto_dismiss(&mut self, node: NodeId, duration: Duration) {
        if let Some(n) = self.get_mut(node) {
            n.auto_dismiss = Some(duration);
        }
    }

    /// Build a menu widget: the widget node (anchored at the handle
    /// row), its handle, and its content box.
    pub fn add_menu(&mut self, parent: NodeId, handle: Rect, content: Rect) -> MenuParts {
        self.add_menu_like(parent, Role::Menu, handle, content)
    }

    /// Build a one-level submenu under a menu's content box. The
    /// submenu node's rect is the item row it occupies; its content
    /// anchors there.
    pub fn add_submenu(&mut self, parent: NodeId, item_row: Rect, content: Rect) -> MenuParts {
        self.add_menu_like(parent, Role::Submenu, item_row, content)
    }

    fn add_menu_like(&mut self, parent: NodeId, role: Role, anchor: Rect, content: Rect) -> MenuParts {
        let menu = self.alloc(role, Some(parent), anchor);
        let handle = self.alloc(Role::Handle, Some(menu), anchor);
        self.set_focusable(handle, true);
        let content = self.alloc(Role::Content, Some(menu), content);
        MenuParts {
            menu,
            handle,
            content,
        }
    }

    /// Add a focusable navigable item to a menu content box.
    pub fn add_item(&mut self, content: NodeId, rect: Rect) -> NodeId {
        let item = self.alloc(Role::Item, Some(content), rect);
        self.set_focusable(item, true);
        item
    }

    /// Build a dialog widget with backdrop, content box, and close
    /// control.
    pub fn add_dialog(&mut self, parent: NodeId, content: Rect) -> DialogParts {
        let dialog = self.alloc(Role::Dialog, Some(parent), content);
        let backdrop_rect = Rect::new(0, 0, self.viewport.width, self.viewport.height);
        let backdrop = self.alloc(Role::Backdrop, Some(dialog), backdrop_rect);
        let content_id = self.alloc(Role::Content, Some(dialog), content);
        let close = self.alloc(Role::Close, Some(content_id), Rect::new(content.right() - 16, content.y, 16, 16));
        self.set_focusable(close, true);
        DialogParts {
            dialog,
            backdrop,
            content: content_id,
            close,
        }
    }

    /// Add pre-existing alert markup under `parent`. Returns the alert
    /// node and, when closable, its close control.
    pub fn add_alert(&mut self, parent: NodeId, closable: bool) -> (NodeId, Option<NodeId>) {
        let alert = self.alloc(Role::Alert, Some(parent), Rect::new(0, 0, 320, 80));
        let close = closable.then(|| {
            let close = self.alloc(Role::Close, Some(alert), Rect::new(296, 8, 16, 16));
            self.set_focusable(close, true);
            close
        });
        (alert, close)
    }

    // --- Observation ---

    /// Drain the host-emitted events queued since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        core::mem::take(&mut self.pending)
    }

    /// Every focus move in order, for counting effect invocations.
    #[must_use]
    pub fn focus_history(&self) -> &[NodeId] {
        &self.focus_log
    }

    /// How many times a node has been detached. Anything above one is a
    /// double-removal bug.
    #[must_use]
    pub fn detach_count(&self, node: NodeId) -> usize {
        self.detach_log.iter().filter(|&&n| n == node).count()
    }

    /// Whether the node is currently attached to the document (its
    /// parent chain reaches the root).
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == self.root {
                return true;
            }
            cur = self.get(n).and_then(|x| x.parent);
        }
        false
    }

    /// The adjustment last applied to a node, if any.
    #[must_use]
    pub fn adjustment(&self, node: NodeId) -> Option<Adjustment> {
        self.get(node).and_then(|n| n.adjustment)
    }

    /// The container node for a slot, if one has been created.
    #[must_use]
    pub fn container_for(&self, slot: Slot) -> Option<NodeId> {
        self.containers.get(&slot).copied()
    }

    /// Resolve a content box's rect with its applied adjustment
    /// interpreted against its anchor (the parent node's rect), the way
    /// the host styling layer would.
    #[must_use]
    pub fn resolved_rect(&self, node: NodeId) -> Rect {
        let Some(n) = self.get(node) else {
            return Rect::default();
        };
        let base = n.rect;
        let Some(adj) = n.adjustment else {
            return base;
        };
        let anchor = n
            .parent
            .and_then(|p| self.get(p))
            .map_or(base, |p| p.rect);
        let w = base.width as i32;
        let h = base.height as i32;
        let mut x = base.x;
        let mut y = base.y;

        match (adj.left, adj.right) {
            (Some(Offset::Auto), Some(Offset::Px(p))) => x = anchor.right() - w - p,
            (Some(Offset::Auto), Some(Offset::FullSpan)) => {
                x = anchor.x - w;
                if adj.margin_right == Some(Margin::Gap) {
                    x -= GAP;
                }
            }
            (Some(Offset::FullSpan), Some(Offset::Auto)) => {
                x = anchor.right();
                if adj.margin_left == Some(Margin::Gap) {
                    x += GAP;
                }
            }
            (Some(Offset::Px(p)), _) => x = anchor.x + p,
            _ => {}
        }

        match (adj.top, adj.bottom) {
            (Some(Offset::Auto), Some(Offset::FullSpan)) => {
                y = anchor.y - h;
                if adj.margin_bottom == Some(Margin::Gap) {
                    y -= GAP;
                }
            }
            (Some(Offset::Px(p)), _) => y = base.y + p,
            _ => {}
        }

        Rect::new(x, y, base.width, base.height)
    }
}

impl HostTree for TestTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn role(&self, node: NodeId) -> Role {
        self.get(node).map_or(Role::Other, |n| n.role)
    }

    fn flags(&self, node: NodeId) -> NodeFlags {
        self.get(node).map_or(NodeFlags::empty(), |n| n.flags)
    }

    fn insert_flags(&mut self, node: NodeId, flags: NodeFlags) {
        if let Some(n) = self.get_mut(node) {
            n.flags |= flags;
        }
    }

    fn is_open(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|n| n.open)
    }

    fn set_open(&mut self, node: NodeId, open: bool) {
        let changed = match self.get_mut(node) {
            Some(n) if n.open != open => {
                n.open = open;
                true
            }
            _ => false,
        };
        if changed {
            self.pending.push(Event::Toggle { node, open });
        }
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
        self.focus_log.push(node);
    }

    fn is_focusable(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|n| n.focusable) && self.is_attached(node)
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.resolved_rect(node)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn apply_adjustment(&mut self, node: NodeId, adjustment: &Adjustment) {
        if let Some(n) = self.get_mut(node) {
            n.adjustment = Some(*adjustment);
        }
    }

    fn detach(&mut self, node: NodeId) {
        self.detach_log.push(node);
        let parent = self.get(node).and_then(|n| n.parent);
        if let Some(p) = parent
            && let Some(pn) = self.get_mut(p)
        {
            pn.children.retain(|&c| c != node);
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = None;
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let valid = self.get(parent).is_some() && self.get(child).is_some();
        if !valid {
            return;
        }
        if let Some(n) = self.get_mut(child) {
            n.parent = Some(parent);
        }
        if let Some(pn) = self.get_mut(parent) {
            pn.children.push(child);
        }
    }

    fn auto_dismiss(&self, node: NodeId) -> Option<Duration> {
        self.get(node).and_then(|n| n.auto_dismiss)
    }

    fn supports_toggle(&self) -> bool {
        self.toggle_support
    }

    fn build_alert(&mut self, blueprint: &AlertBlueprint) -> NodeId {
        let alert = self.alloc(Role::Alert, None, Rect::new(0, 0, 320, 80));
        if blueprint.closable {
            let close = self.alloc(Role::Close, Some(alert), Rect::new(296, 8, 16, 16));
            self.set_focusable(close, true);
        }
        alert
    }

    fn slot_container(&mut self, slot: Slot) -> NodeId {
        if let Some(&existing) = self.containers.get(&slot) {
            return existing;
        }
        let root = self.root;
        let container = self.alloc(Role::AlertContainer(slot), Some(root), Rect::default());
        self.containers.insert(slot, container);
        container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_open_queues_toggle_only_on_change() {
        let mut tree = TestTree::new(800, 600);
        let parts = tree.add_menu(tree.root(), Rect::new(10, 10, 80, 20), Rect::new(10, 30, 160, 100));

        tree.set_open(parts.menu, true);
        tree.set_open(parts.menu, true);
        let events = tree.take_events();
        assert_eq!(
            events,
            vec![Event::Toggle {
                node: parts.menu,
                open: true
            }]
        );
        assert!(tree.take_events().is_empty());
    }

    #[test]
    fn detach_prunes_from_parent() {
        let mut tree = TestTree::new(800, 600);
        let (alert, _) = tree.add_alert(tree.root(), true);
        assert!(tree.is_attached(alert));

        tree.detach(alert);
        assert!(!tree.is_attached(alert));
        assert!(!tree.children(tree.root()).contains(&alert));
        assert_eq!(tree.detach_count(alert), 1);
    }

    #[test]
    fn slot_container_is_created_once() {
        let mut tree = TestTree::new(800, 600);
        let a = tree.slot_container(Slot::TopRight);
        let b = tree.slot_container(Slot::TopRight);
        let c = tree.slot_container(Slot::BottomLeft);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn resolved_rect_right_anchor() {
        let mut tree = TestTree::new(400, 300);
        let parts = tree.add_menu(tree.root(), Rect::new(300, 10, 80, 20), Rect::new(300, 30, 200, 100));
        let adj = Adjustment {
            left: Some(Offset::Auto),
            right: Some(Offset::Px(0)),
            ..Default::default()
        };
        tree.apply_adjustment(parts.content, &adj);

        let resolved = tree.resolved_rect(parts.content);
        // Content's right edge lands on the anchor's right edge.
        assert_eq!(resolved.right(), Rect::new(300, 10, 80, 20).right());
        assert_eq!(resolved.width, 200);
    }

    #[test]
    fn resolved_rect_vertical_flip() {
        let mut tree = TestTree::new(400, 300);
        let parts = tree.add_menu(tree.root(), Rect::new(10, 250, 80, 20), Rect::new(10, 270, 160, 100));
        let adj = Adjustment {
            top: Some(Offset::Auto),
            bottom: Some(Offset::FullSpan),
            margin_top: Some(Margin::Zero),
            margin_bottom: Some(Margin::Gap),
            ..Default::default()
        };
        tree.apply_adjustment(parts.content, &adj);

        let resolved = tree.resolved_rect(parts.content);
        // Opens upward: bottom edge sits a gap above the anchor's top.
        assert_eq!(resolved.bottom(), 250 - GAP);
    }
}
