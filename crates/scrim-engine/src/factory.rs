#![forbid(unsafe_code)]

//! Alert factory: programmatic alert creation.
//!
//! The engine decides lifecycle (marker, container slot, registration,
//! the single auto-dismiss timer); the host assembles the markup and
//! icons from the [`AlertBlueprint`]. The created node is returned as a
//! handle for further external manipulation.

use core::time::Duration;

use scrim_core::{AlertBlueprint, AlertKind, HostTree, NodeFlags, NodeId, Slot};
use tracing::debug;

use crate::engine::Engine;

/// Default auto-dismiss duration for factory-created alerts.
pub const DEFAULT_AUTO_DISMISS: Duration = Duration::from_millis(5000);

/// Configuration for a programmatically created alert.
///
/// Defaults mirror the markup layer's conventions: an info alert in the
/// top-right slot, closable, outline-styled, auto-dismissing after
/// five seconds. `auto_dismiss(None)` (or an explicit zero) makes the
/// alert persistent until manually dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertConfig {
    pub kind: AlertKind,
    pub title: Option<String>,
    pub message: Option<String>,
    pub position: Slot,
    pub auto_dismiss: Option<Duration>,
    pub closable: bool,
    pub solid: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            kind: AlertKind::Info,
            title: None,
            message: None,
            position: Slot::TopRight,
            auto_dismiss: Some(DEFAULT_AUTO_DISMISS),
            closable: true,
            solid: false,
        }
    }
}

impl AlertConfig {
    /// Create a config with the defaults above.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the severity variant.
    #[must_use]
    pub fn kind(mut self, kind: AlertKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the title line.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the message body.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the positional slot.
    #[must_use]
    pub fn position(mut self, position: Slot) -> Self {
        self.position = position;
        self
    }

    /// Set or disable the auto-dismiss duration.
    #[must_use]
    pub fn auto_dismiss(mut self, duration: Option<Duration>) -> Self {
        self.auto_dismiss = duration;
        self
    }

    /// Set whether the alert carries a close control.
    #[must_use]
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    /// Set the solid (filled) visual variant.
    #[must_use]
    pub fn solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    fn blueprint(&self) -> AlertBlueprint {
        AlertBlueprint {
            kind: self.kind,
            title: self.title.clone(),
            message: self.message.clone(),
            closable: self.closable,
            solid: self.solid,
        }
    }
}

impl Engine {
    /// Build an alert from `config`, place it in its slot container,
    /// and register it with the dismissal state machine. Returns the
    /// created node as a handle.
    pub fn create_alert<T: HostTree>(&mut self, tree: &mut T, config: AlertConfig) -> NodeId {
        let alert = tree.build_alert(&config.blueprint());
        // Marker first: a structural-change rescan racing this call
        // must not re-register the alert.
        tree.insert_flags(alert, NodeFlags::ENHANCED);

        let container = tree.slot_container(config.position);
        tree.append_child(container, alert);

        self.register_alert(alert, config.auto_dismiss);
        debug!(alert = alert.raw(), slot = ?config.position, "alert created");
        alert
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use scrim_core::{AlertKind, Event, HostTree, NodeFlags, Role, Slot};
    use scrim_harness::TestTree;

    use crate::alert::DismissPhase;
    use crate::engine::Engine;
    use crate::factory::{AlertConfig, DEFAULT_AUTO_DISMISS};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn defaults_match_markup_conventions() {
        let config = AlertConfig::new();
        assert_eq!(config.kind, AlertKind::Info);
        assert_eq!(config.position, Slot::TopRight);
        assert_eq!(config.auto_dismiss, Some(DEFAULT_AUTO_DISMISS));
        assert!(config.closable);
        assert!(!config.solid);
        assert!(config.title.is_none());
        assert!(config.message.is_none());
    }

    #[test]
    fn created_alert_lands_in_slot_container_marked() {
        let mut tree = TestTree::new(800, 600);
        let mut engine = Engine::new();

        let alert = engine.create_alert(&mut tree, AlertConfig::new());
        let container = tree.container_for(Slot::TopRight).unwrap();
        assert!(tree.children(container).contains(&alert));
        assert!(tree.flags(alert).contains(NodeFlags::ENHANCED));
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Visible));
    }

    #[test]
    fn alerts_in_one_slot_share_the_container() {
        let mut tree = TestTree::new(800, 600);
        let mut engine = Engine::new();

        let a = engine.create_alert(&mut tree, AlertConfig::new());
        let b = engine.create_alert(&mut tree, AlertConfig::new());
        let c = engine.create_alert(
            &mut tree,
            AlertConfig::new().position(Slot::BottomLeft),
        );

        let top_right = tree.container_for(Slot::TopRight).unwrap();
        let bottom_left = tree.container_for(Slot::BottomLeft).unwrap();
        assert_eq!(tree.children(top_right), vec![a, b]);
        assert_eq!(tree.children(bottom_left), vec![c]);
    }

    #[test]
    fn default_duration_arms_the_timer() {
        let mut tree = TestTree::new(800, 600);
        let mut engine = Engine::new();
        let alert = engine.create_alert(&mut tree, AlertConfig::new());

        engine.advance(&mut tree, DEFAULT_AUTO_DISMISS);
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Dismissing));
    }

    #[test]
    fn disabled_auto_dismiss_stays_until_closed() {
        let mut tree = TestTree::new(800, 600);
        let mut engine = Engine::new();

        let alert = engine.create_alert(
            &mut tree,
            AlertConfig::new()
                .kind(AlertKind::Error)
                .message("Failed")
                .auto_dismiss(None),
        );

        engine.advance(&mut tree, ms(60_000));
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Visible));
        assert!(tree.is_attached(alert));

        // Only the close control takes it down.
        let close = tree
            .children(alert)
            .into_iter()
            .find(|&n| tree.role(n) == Role::Close);
        engine.handle_event(&mut tree, &Event::PointerDown { target: close });
        engine.advance(&mut tree, ms(400));
        assert!(!tree.is_attached(alert));
        assert_eq!(tree.detach_count(alert), 1);
    }

    #[test]
    fn non_closable_alert_has_no_close_control() {
        let mut tree = TestTree::new(800, 600);
        let mut engine = Engine::new();
        let alert = engine.create_alert(&mut tree, AlertConfig::new().closable(false));

        let has_close = tree
            .children(alert)
            .into_iter()
            .any(|n| tree.role(n) == Role::Close);
        assert!(!has_close);
    }

    #[test]
    fn rescan_does_not_rearm_factory_created_alert() {
        let mut tree = TestTree::new(800, 600);
        let mut engine = Engine::new();
        let alert = engine.create_alert(&mut tree, AlertConfig::new().auto_dismiss(Some(ms(100))));

        // A structural change triggers a rescan; the marked alert must
        // not get a second timer (which would show up as a second
        // dismissal attempt after the first completes).
        let inserted = tree.add(tree.root(), Role::Other, scrim_core::Rect::default());
        engine.handle_event(&mut tree, &Event::Inserted(vec![inserted]));

        engine.advance(&mut tree, ms(100));
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Dismissing));
        engine.advance(&mut tree, ms(400));
        assert_eq!(tree.detach_count(alert), 1);
    }
}
