#![forbid(unsafe_code)]

//! The scrim overlay interaction engine.
//!
//! A host document tree renders markup-only overlay widgets — menus,
//! dialogs, transient alerts — that already open and close on their
//! own. This crate layers interaction discipline on top, strictly
//! additively:
//!
//! - **Focus trap & restoration**: opening a widget captures the
//!   previously focused element; the first focusable descendant is
//!   focused on the next frame; closing restores the captured element;
//!   Tab wraps at the boundary.
//! - **Keyboard navigation**: Escape closes, arrows traverse enabled
//!   menu items with wraparound, activating a placeholder item closes
//!   without navigating.
//! - **Viewport positioning**: overlay content that would overflow the
//!   viewport is re-anchored or shifted; sub-overlays reposition
//!   relative to their parent overlay, independently of it.
//! - **Alert dismissal**: a `Visible → Dismissing → Removed` state
//!   machine where an animation-completion signal races a fallback
//!   timer into one exactly-once removal.
//! - **Idempotent enhancement**: re-running the pass never re-binds an
//!   already-enhanced element; newly inserted elements are picked up
//!   via [`scrim_core::Event::Inserted`].
//!
//! The engine owns no clock and no event loop. The host feeds
//! [`scrim_core::Event`]s into [`Engine::handle_event`], runs
//! [`Engine::on_frame`] once layout has settled after each turn, and
//! reports elapsed time through [`Engine::advance`].
//!
//! # Failure Modes
//!
//! No operation here returns an error or panics on malformed trees:
//! missing optional sub-elements degrade only the dependent feature,
//! empty focusable sets make focus operations no-ops, and duplicate
//! dismissal triggers are absorbed by the state machine.

mod alert;
mod engine;
mod enhance;
mod factory;
mod focus;
mod focusable;
mod keys;
mod position;

pub use alert::DismissPhase;
pub use engine::{Engine, EngineConfig};
pub use factory::AlertConfig;
pub use position::{primary_adjustment, submenu_adjustment};

/// Crate version marker.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
