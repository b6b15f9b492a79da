#![forbid(unsafe_code)]

//! Keyboard navigator.
//!
//! Key events route to the nearest enhanced primary widget enclosing
//! the focused element; keys pressed inside a sub-overlay therefore act
//! on the parent menu (Escape closes the whole menu, arrows traverse
//! submenu items too).
//!
//! Menus: Escape closes and focuses the handle; ArrowDown/ArrowUp move
//! through enabled items with circular wrap, only while open;
//! Enter/Space on a placeholder item closes without navigating.
//! Dialogs: Escape closes; Tab defers to the focus trap.

use scrim_core::{HostTree, KeyCode, KeyEvent, Modifiers, NodeFlags, NodeId, Role};

use crate::engine::{Engine, WidgetKind, child_with_role};
use crate::focusable::descendants_matching;

/// Traversal direction for item navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Prev,
}

impl Engine {
    pub(crate) fn on_key<T: HostTree>(&mut self, tree: &mut T, key: &KeyEvent) {
        let Some(focused) = tree.focused() else {
            return;
        };
        let Some((widget, kind)) = self.enclosing_widget(tree, focused) else {
            return;
        };
        match kind {
            WidgetKind::Menu => self.menu_key(tree, widget, key),
            WidgetKind::Dialog => self.dialog_key(tree, widget, key),
        }
    }

    fn menu_key<T: HostTree>(&mut self, tree: &mut T, menu: NodeId, key: &KeyEvent) {
        match key.code {
            KeyCode::Escape => {
                // Escape places focus on the handle, not the stored
                // trigger: clear the reference first so the toggle-close
                // restoration becomes a no-op.
                if let Some(state) = self.widgets.get_mut(&menu) {
                    state.trigger = None;
                }
                tree.set_open(menu, false);
                if let Some(handle) = child_with_role(tree, menu, Role::Handle) {
                    tree.focus(handle);
                }
            }
            KeyCode::ArrowDown if tree.is_open(menu) => {
                self.move_item_focus(tree, menu, Direction::Next);
            }
            KeyCode::ArrowUp if tree.is_open(menu) => {
                self.move_item_focus(tree, menu, Direction::Prev);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(focused) = tree.focused()
                    && tree.role(focused) == Role::Item
                    && tree.flags(focused).contains(NodeFlags::PLACEHOLDER)
                {
                    tree.set_open(menu, false);
                }
            }
            _ => {}
        }
    }

    fn dialog_key<T: HostTree>(&mut self, tree: &mut T, dialog: NodeId, key: &KeyEvent) {
        if !tree.is_open(dialog) {
            return;
        }
        match key.code {
            KeyCode::Escape => tree.set_open(dialog, false),
            KeyCode::Tab => {
                let reverse = key.modifiers.contains(Modifiers::SHIFT);
                self.trap_tab(tree, dialog, reverse);
            }
            _ => {}
        }
    }

    /// Move focus to the next/previous enabled item, wrapping. When the
    /// active element is not in the item list, ArrowDown lands on the
    /// first item and ArrowUp on the last.
    fn move_item_focus<T: HostTree>(&mut self, tree: &mut T, menu: NodeId, direction: Direction) {
        let items = navigable_items(tree, menu);
        if items.is_empty() {
            return;
        }
        let current = tree
            .focused()
            .and_then(|focused| items.iter().position(|&item| item == focused));
        let next = match direction {
            Direction::Next => current.map_or(0, |i| (i + 1) % items.len()),
            Direction::Prev => match current {
                None | Some(0) => items.len() - 1,
                Some(i) => i - 1,
            },
        };
        tree.focus(items[next]);
    }
}

/// Ordered navigable items of a menu: `Role::Item` descendants not
/// marked disabled, submenu items included.
fn navigable_items<T: HostTree>(tree: &T, menu: NodeId) -> Vec<NodeId> {
    descendants_matching(tree, menu, |t, n| {
        t.role(n) == Role::Item && !t.flags(n).contains(NodeFlags::DISABLED)
    })
}

#[cfg(test)]
mod tests {
    use scrim_core::{Event, HostTree, KeyCode, KeyEvent, NodeFlags, Rect};
    use scrim_harness::{MenuParts, TestTree};

    use crate::engine::Engine;

    fn pump(engine: &mut Engine, tree: &mut TestTree) {
        loop {
            let events = tree.take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                engine.handle_event(tree, &event);
            }
        }
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::press(code))
    }

    fn open_menu_with_items(
        item_count: usize,
    ) -> (Engine, TestTree, MenuParts, Vec<scrim_core::NodeId>) {
        let mut tree = TestTree::new(800, 600);
        let parts = tree.add_menu(
            tree.root(),
            Rect::new(10, 10, 80, 20),
            Rect::new(10, 30, 160, 100),
        );
        let items = (0..item_count)
            .map(|i| tree.add_item(parts.content, Rect::new(10, 30 + 20 * i as i32, 160, 20)))
            .collect();

        let mut engine = Engine::new();
        engine.enhance(&mut tree);
        tree.set_open(parts.menu, true);
        pump(&mut engine, &mut tree);
        (engine, tree, parts, items)
    }

    #[test]
    fn escape_closes_menu_and_focuses_handle() {
        let (mut engine, mut tree, parts, items) = open_menu_with_items(2);
        tree.focus(items[1]);

        engine.handle_event(&mut tree, &press(KeyCode::Escape));
        pump(&mut engine, &mut tree);

        assert!(!tree.is_open(parts.menu));
        assert_eq!(tree.focused(), Some(parts.handle));
    }

    #[test]
    fn escape_focus_survives_toggle_restoration() {
        // Something else held focus when the menu opened; Escape must
        // land on the handle, not restore that element.
        let mut tree = TestTree::new(800, 600);
        let parts = tree.add_menu(
            tree.root(),
            Rect::new(10, 10, 80, 20),
            Rect::new(10, 30, 160, 100),
        );
        let item = tree.add_item(parts.content, Rect::new(10, 30, 160, 20));
        let button = tree.add(tree.root(), scrim_core::Role::Other, Rect::default());
        tree.set_focusable(button, true);

        let mut engine = Engine::new();
        engine.enhance(&mut tree);
        tree.focus(button);
        tree.set_open(parts.menu, true);
        pump(&mut engine, &mut tree);
        tree.focus(item);

        engine.handle_event(&mut tree, &press(KeyCode::Escape));
        pump(&mut engine, &mut tree);
        assert_eq!(tree.focused(), Some(parts.handle));
    }

    #[test]
    fn arrow_down_wraps_circularly() {
        let (mut engine, mut tree, _parts, items) = open_menu_with_items(3);
        tree.focus(items[2]);

        engine.handle_event(&mut tree, &press(KeyCode::ArrowDown));
        assert_eq!(tree.focused(), Some(items[0]));
    }

    #[test]
    fn arrow_up_from_first_wraps_to_last() {
        let (mut engine, mut tree, _parts, items) = open_menu_with_items(3);
        tree.focus(items[0]);

        engine.handle_event(&mut tree, &press(KeyCode::ArrowUp));
        assert_eq!(tree.focused(), Some(items[2]));
    }

    #[test]
    fn arrow_down_with_focus_outside_items_lands_on_first() {
        let (mut engine, mut tree, parts, items) = open_menu_with_items(3);
        tree.focus(parts.handle);

        engine.handle_event(&mut tree, &press(KeyCode::ArrowDown));
        assert_eq!(tree.focused(), Some(items[0]));
    }

    #[test]
    fn disabled_items_are_skipped() {
        let (mut engine, mut tree, _parts, items) = open_menu_with_items(3);
        tree.flag(items[1], NodeFlags::DISABLED);
        tree.focus(items[0]);

        engine.handle_event(&mut tree, &press(KeyCode::ArrowDown));
        assert_eq!(tree.focused(), Some(items[2]));
    }

    #[test]
    fn arrows_do_nothing_while_closed() {
        let (mut engine, mut tree, parts, _items) = open_menu_with_items(2);
        tree.set_open(parts.menu, false);
        pump(&mut engine, &mut tree);
        tree.focus(parts.handle);
        let moves_before = tree.focus_history().len();

        engine.handle_event(&mut tree, &press(KeyCode::ArrowDown));
        assert_eq!(tree.focus_history().len(), moves_before);
    }

    #[test]
    fn enter_on_placeholder_item_closes_menu() {
        let (mut engine, mut tree, parts, items) = open_menu_with_items(2);
        tree.flag(items[0], NodeFlags::PLACEHOLDER);
        tree.focus(items[0]);

        engine.handle_event(&mut tree, &press(KeyCode::Enter));
        pump(&mut engine, &mut tree);
        assert!(!tree.is_open(parts.menu));
    }

    #[test]
    fn space_on_regular_item_leaves_menu_open() {
        let (mut engine, mut tree, parts, items) = open_menu_with_items(2);
        tree.focus(items[0]);

        engine.handle_event(&mut tree, &press(KeyCode::Char(' ')));
        pump(&mut engine, &mut tree);
        assert!(tree.is_open(parts.menu));
    }

    #[test]
    fn escape_inside_submenu_closes_parent_menu() {
        let (mut engine, mut tree, parts, _items) = open_menu_with_items(1);
        let sub = tree.add_submenu(
            parts.content,
            Rect::new(10, 50, 160, 20),
            Rect::new(170, 50, 160, 80),
        );
        let sub_item = tree.add_item(sub.content, Rect::new(170, 50, 160, 20));
        tree.focus(sub_item);

        engine.handle_event(&mut tree, &press(KeyCode::Escape));
        pump(&mut engine, &mut tree);
        assert!(!tree.is_open(parts.menu));
    }

    #[test]
    fn arrow_navigation_spans_submenu_items() {
        let (mut engine, mut tree, parts, items) = open_menu_with_items(1);
        let sub = tree.add_submenu(
            parts.content,
            Rect::new(10, 50, 160, 20),
            Rect::new(170, 50, 160, 80),
        );
        let sub_item = tree.add_item(sub.content, Rect::new(170, 50, 160, 20));
        tree.focus(items[0]);

        engine.handle_event(&mut tree, &press(KeyCode::ArrowDown));
        assert_eq!(tree.focused(), Some(sub_item));
    }
}
