#![forbid(unsafe_code)]

//! Host-tree contract, geometry, events, and scheduling for scrim.
//!
//! This crate defines the seam between the overlay interaction engine
//! (`scrim-engine`) and the host document tree it enhances:
//!
//! - [`HostTree`] — the trait the host implements (structure, roles,
//!   focus, geometry, open state, styling hooks).
//! - [`Event`] — the notifications the host feeds into the engine.
//! - [`Adjustment`] — the typed positional overrides the engine hands
//!   back to the host styling layer.
//! - [`Scheduler`] — next-frame and timer queues over a virtual clock,
//!   driven by the host's own loop.
//!
//! Nothing here performs I/O or touches a real clock; the host owns both.

pub mod event;
pub mod geometry;
pub mod sched;
pub mod style;
pub mod tree;

pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use geometry::{Rect, Size};
pub use sched::Scheduler;
pub use style::{Adjustment, Margin, Offset};
pub use tree::{AlertBlueprint, AlertKind, HostTree, NodeFlags, NodeId, Role, Slot};

/// Crate version marker.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
