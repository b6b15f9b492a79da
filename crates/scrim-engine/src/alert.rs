#![forbid(unsafe_code)]

//! Alert dismissal state machine.
//!
//! `Visible → Dismissing → Removed`, terminal at `Removed`. Entering
//! `Dismissing` is idempotent (concurrent timer expiry and manual click
//! collapse into one transition). While dismissing, two completion
//! paths race: the host's animation-completion signal for this specific
//! element and effect name, and a fixed fallback timer covering hosts
//! that never animate (reduced motion, missing styling). Whichever
//! fires first removes the element; the loser finds the terminal state
//! and no-ops.
//!
//! # Invariants
//!
//! - Phase transitions are monotonic; `Removed` detaches exactly once.
//! - One auto-dismiss timer per alert, armed at registration only.
//! - Animation signals for other targets or other effects are ignored;
//!   the fallback timer is the safety net.

use core::time::Duration;

use scrim_core::{HostTree, NodeFlags, NodeId};
use tracing::trace;

use crate::engine::{Engine, Task};

/// Lifecycle stage of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissPhase {
    Visible,
    Dismissing,
    Removed,
}

/// Per-alert engine state.
#[derive(Debug)]
pub(crate) struct AlertState {
    pub(crate) phase: DismissPhase,
}

impl Engine {
    /// Register an alert with the state machine, arming the single
    /// auto-dismiss timer when a nonzero duration is configured. Both
    /// the discovery pass and the factory funnel through here.
    pub(crate) fn register_alert(&mut self, alert: NodeId, auto_dismiss: Option<Duration>) {
        self.alerts.insert(
            alert,
            AlertState {
                phase: DismissPhase::Visible,
            },
        );
        if let Some(duration) = auto_dismiss.filter(|d| !d.is_zero()) {
            self.sched.defer_after(duration, Task::AutoDismiss(alert));
        }
    }

    /// Begin dismissal of an alert. Idempotent: a no-op unless the
    /// alert is currently `Visible`.
    pub fn dismiss_alert<T: HostTree>(&mut self, tree: &mut T, alert: NodeId) {
        self.dismiss(tree, alert);
    }

    /// The current dismissal phase of a registered alert.
    #[must_use]
    pub fn alert_phase(&self, alert: NodeId) -> Option<DismissPhase> {
        self.alerts.get(&alert).map(|state| state.phase)
    }

    pub(crate) fn dismiss<T: HostTree>(&mut self, tree: &mut T, alert: NodeId) {
        let Some(state) = self.alerts.get_mut(&alert) else {
            return;
        };
        if state.phase != DismissPhase::Visible {
            return;
        }
        state.phase = DismissPhase::Dismissing;
        trace!(alert = alert.raw(), "alert dismissing");

        // The host animates anything flagged dismissing; if it never
        // signals completion, the fallback timer removes the element.
        tree.insert_flags(alert, NodeFlags::DISMISSING);
        let fallback = self.config.fallback_removal;
        self.sched.defer_after(fallback, Task::RemoveFallback(alert));
    }

    /// Animation-completion path: only the matching target and effect
    /// name complete the dismissal.
    pub(crate) fn on_animation_end<T: HostTree>(
        &mut self,
        tree: &mut T,
        target: NodeId,
        effect: &str,
    ) {
        if effect != self.config.dismiss_effect {
            return;
        }
        if self.alert_phase(target) != Some(DismissPhase::Dismissing) {
            return;
        }
        self.remove_alert(tree, target);
    }

    /// Fallback-timer path: removes the alert only if the animation
    /// signal has not already done so.
    pub(crate) fn finish_fallback<T: HostTree>(&mut self, tree: &mut T, alert: NodeId) {
        if self.alert_phase(alert) != Some(DismissPhase::Dismissing) {
            return;
        }
        self.remove_alert(tree, alert);
    }

    fn remove_alert<T: HostTree>(&mut self, tree: &mut T, alert: NodeId) {
        if let Some(state) = self.alerts.get_mut(&alert) {
            state.phase = DismissPhase::Removed;
        }
        trace!(alert = alert.raw(), "alert removed");
        tree.detach(alert);
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use scrim_core::{Event, HostTree, NodeFlags};
    use scrim_harness::TestTree;

    use super::DismissPhase;
    use crate::engine::Engine;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn discovered_alert(auto_dismiss: Option<Duration>) -> (Engine, TestTree, scrim_core::NodeId) {
        let mut tree = TestTree::new(800, 600);
        let (alert, _close) = tree.add_alert(tree.root(), true);
        if let Some(d) = auto_dismiss {
            tree.set_auto_dismiss(alert, d);
        }
        let mut engine = Engine::new();
        engine.enhance(&mut tree);
        (engine, tree, alert)
    }

    #[test]
    fn manual_dismiss_enters_dismissing_and_flags_node() {
        let (mut engine, mut tree, alert) = discovered_alert(None);
        engine.dismiss_alert(&mut tree, alert);

        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Dismissing));
        assert!(tree.flags(alert).contains(NodeFlags::DISMISSING));
        assert!(tree.is_attached(alert));
    }

    #[test]
    fn animation_end_removes_the_alert() {
        let (mut engine, mut tree, alert) = discovered_alert(None);
        engine.dismiss_alert(&mut tree, alert);

        engine.handle_event(
            &mut tree,
            &Event::AnimationEnd {
                target: alert,
                effect: "alert-slide-out".to_string(),
            },
        );
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Removed));
        assert_eq!(tree.detach_count(alert), 1);
    }

    #[test]
    fn fallback_timer_removes_when_no_animation_runs() {
        let (mut engine, mut tree, alert) = discovered_alert(None);
        engine.dismiss_alert(&mut tree, alert);

        engine.advance(&mut tree, ms(399));
        assert!(tree.is_attached(alert));
        engine.advance(&mut tree, ms(1));
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Removed));
        assert_eq!(tree.detach_count(alert), 1);
    }

    #[test]
    fn fallback_after_animation_end_does_not_detach_twice() {
        let (mut engine, mut tree, alert) = discovered_alert(None);
        engine.dismiss_alert(&mut tree, alert);

        engine.handle_event(
            &mut tree,
            &Event::AnimationEnd {
                target: alert,
                effect: "alert-slide-out".to_string(),
            },
        );
        // The fallback timer still fires later; it must find the
        // terminal state and skip.
        engine.advance(&mut tree, ms(400));
        assert_eq!(tree.detach_count(alert), 1);
    }

    #[test]
    fn wrong_effect_name_is_ignored() {
        let (mut engine, mut tree, alert) = discovered_alert(None);
        engine.dismiss_alert(&mut tree, alert);

        engine.handle_event(
            &mut tree,
            &Event::AnimationEnd {
                target: alert,
                effect: "alert-slide-in".to_string(),
            },
        );
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Dismissing));
        assert!(tree.is_attached(alert));
    }

    #[test]
    fn wrong_target_is_ignored() {
        let mut tree = TestTree::new(800, 600);
        let (alert, _) = tree.add_alert(tree.root(), true);
        let (sibling, _) = tree.add_alert(tree.root(), true);
        let mut engine = Engine::new();
        engine.enhance(&mut tree);

        engine.dismiss_alert(&mut tree, alert);
        // A sibling's animation finishing must not complete this one.
        engine.handle_event(
            &mut tree,
            &Event::AnimationEnd {
                target: sibling,
                effect: "alert-slide-out".to_string(),
            },
        );
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Dismissing));
        assert!(tree.is_attached(alert));
    }

    #[test]
    fn animation_end_while_visible_is_ignored() {
        let (mut engine, mut tree, alert) = discovered_alert(None);
        engine.handle_event(
            &mut tree,
            &Event::AnimationEnd {
                target: alert,
                effect: "alert-slide-out".to_string(),
            },
        );
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Visible));
        assert!(tree.is_attached(alert));
    }

    #[test]
    fn auto_dismiss_timer_fires_at_configured_duration() {
        let (mut engine, mut tree, alert) = discovered_alert(Some(ms(100)));

        engine.advance(&mut tree, ms(99));
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Visible));
        engine.advance(&mut tree, ms(1));
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Dismissing));
    }

    #[test]
    fn manual_dismiss_racing_timer_removes_exactly_once() {
        let (mut engine, mut tree, alert) = discovered_alert(Some(ms(100)));

        engine.advance(&mut tree, ms(50));
        engine.dismiss_alert(&mut tree, alert);
        // Auto-dismiss fires at 100 ms into an already-dismissing
        // alert; fallback fires at 450 ms.
        engine.advance(&mut tree, ms(500));

        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Removed));
        assert_eq!(tree.detach_count(alert), 1);
    }

    #[test]
    fn repeated_manual_dismiss_is_idempotent() {
        let (mut engine, mut tree, alert) = discovered_alert(None);
        engine.dismiss_alert(&mut tree, alert);
        engine.dismiss_alert(&mut tree, alert);
        engine.dismiss_alert(&mut tree, alert);
        engine.advance(&mut tree, ms(400));
        assert_eq!(tree.detach_count(alert), 1);
    }

    #[test]
    fn zero_duration_never_arms_a_timer() {
        let (mut engine, mut tree, alert) = discovered_alert(Some(Duration::ZERO));
        engine.advance(&mut tree, ms(60_000));
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Visible));
        assert!(tree.is_attached(alert));
    }

    #[test]
    fn close_button_click_dismisses_enclosing_alert() {
        let mut tree = TestTree::new(800, 600);
        let (alert, close) = tree.add_alert(tree.root(), true);
        let mut engine = Engine::new();
        engine.enhance(&mut tree);

        engine.handle_event(&mut tree, &Event::PointerDown { target: close });
        assert_eq!(engine.alert_phase(alert), Some(DismissPhase::Dismissing));
    }

    #[test]
    fn dismissing_an_unknown_node_is_a_noop() {
        let mut tree = TestTree::new(800, 600);
        let stray = tree.add(tree.root(), scrim_core::Role::Other, scrim_core::Rect::default());
        let mut engine = Engine::new();
        engine.dismiss_alert(&mut tree, stray);
        assert_eq!(engine.alert_phase(stray), None);
        assert!(tree.is_attached(stray));
    }
}
