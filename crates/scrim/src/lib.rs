#![forbid(unsafe_code)]

//! Scrim public facade.
//!
//! Re-exports the host-tree contract from `scrim-core` and the overlay
//! interaction engine from `scrim-engine` under one roof. Most hosts
//! only need [`Engine`], [`Event`], and an implementation of
//! [`HostTree`].

pub use scrim_core::{
    Adjustment, AlertBlueprint, AlertKind, Event, HostTree, KeyCode, KeyEvent, KeyEventKind,
    Margin, Modifiers, NodeFlags, NodeId, Offset, Rect, Role, Scheduler, Size, Slot,
};
pub use scrim_engine::{AlertConfig, DismissPhase, Engine, EngineConfig};

/// Commonly used items, for glob import.
pub mod prelude {
    pub use scrim_core::{Event, HostTree, NodeId, Role};
    pub use scrim_engine::{AlertConfig, Engine};
}

/// Crate version marker.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
