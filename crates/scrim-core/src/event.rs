#![forbid(unsafe_code)]

//! Host notifications consumed by the engine.
//!
//! The host feeds every event through `Engine::handle_event`; handlers
//! run to completion before the next event is processed. The host is
//! responsible for emitting [`Event::Toggle`] after an overlay's open
//! attribute actually changes (including changes the engine itself
//! requested via `HostTree::set_open`), and [`Event::AnimationEnd`]
//! when a named styling effect finishes on a specific element.

use bitflags::bitflags;

use crate::tree::NodeId;

bitflags! {
    /// Key modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// Key identity, reduced to the keys the engine reacts to plus a
/// passthrough for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Tab,
    Enter,
    ArrowUp,
    ArrowDown,
    Char(char),
}

/// Press/release discrimination. The engine acts on presses only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A keyboard event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press with no modifiers.
    #[must_use]
    pub const fn press(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }
}

/// A host notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed or released while the host had input focus.
    Key(KeyEvent),
    /// A pointer-down somewhere in the document. `target` is the
    /// deepest tracked node under the pointer, or `None` when the click
    /// landed outside every tracked node.
    PointerDown { target: Option<NodeId> },
    /// An overlay's open attribute changed.
    Toggle { node: NodeId, open: bool },
    /// A named styling effect finished on `target`. Consumed by the
    /// engine only when both the target and the effect name match.
    AnimationEnd { target: NodeId, effect: String },
    /// A batch of nodes was inserted into the document subtree.
    Inserted(Vec<NodeId>),
}
