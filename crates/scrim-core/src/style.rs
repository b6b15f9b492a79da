#![forbid(unsafe_code)]

//! Typed positional overrides handed back to the host styling layer.
//!
//! The engine never writes raw style strings; it emits an [`Adjustment`]
//! and the host interprets it against its own layout model. Fields that
//! are `None` leave the corresponding property untouched.
//!
//! # Invariants
//!
//! - An adjustment is transient: recomputed on every open/expand
//!   transition, never persisted across opens.
//! - Adjustments target an overlay's content box only; the engine never
//!   adjusts a widget's own box or its parent's.

/// An edge offset, mirroring the host styling vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Offset {
    /// Unset the property (host default placement).
    Auto,
    /// Fixed pixel offset from the anchor edge.
    Px(i32),
    /// Offset by the anchor box's full extent on that axis (the host's
    /// "100%" — pins the content past the opposite edge of its anchor).
    FullSpan,
}

/// A margin override. `Gap` is the host's standard spacing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Margin {
    Zero,
    Gap,
}

/// A set of positional style overrides for one content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adjustment {
    pub left: Option<Offset>,
    pub right: Option<Offset>,
    pub top: Option<Offset>,
    pub bottom: Option<Offset>,
    pub margin_left: Option<Margin>,
    pub margin_right: Option<Margin>,
    pub margin_top: Option<Margin>,
    pub margin_bottom: Option<Margin>,
}

impl Adjustment {
    /// True when no field is set; the host can skip applying it.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left.is_none()
            && self.right.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.margin_left.is_none()
            && self.margin_right.is_none()
            && self.margin_top.is_none()
            && self.margin_bottom.is_none()
    }
}
