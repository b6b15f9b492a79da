#![forbid(unsafe_code)]

//! Focusable query: ordered descendant collection.
//!
//! The host supplies the focus-eligibility heuristic
//! (`HostTree::is_focusable`); this module only walks the tree in
//! document order and filters. Disabled elements are excluded here so
//! every caller (trap, navigator) agrees on the same list.

use scrim_core::{HostTree, NodeFlags, NodeId};

/// Collect the descendants of `scope` (excluding `scope` itself, in
/// depth-first document order) for which `pred` holds.
pub(crate) fn descendants_matching<T: HostTree>(
    tree: &T,
    scope: NodeId,
    mut pred: impl FnMut(&T, NodeId) -> bool,
) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect(tree, scope, &mut pred, &mut out);
    out
}

fn collect<T: HostTree>(
    tree: &T,
    node: NodeId,
    pred: &mut impl FnMut(&T, NodeId) -> bool,
    out: &mut Vec<NodeId>,
) {
    for child in tree.children(node) {
        if pred(tree, child) {
            out.push(child);
        }
        collect(tree, child, pred, out);
    }
}

/// The ordered list of elements inside `scope` eligible to receive
/// input focus. Empty when the scope has none; callers treat that as a
/// no-op, never an error.
pub(crate) fn focusable_descendants<T: HostTree>(tree: &T, scope: NodeId) -> Vec<NodeId> {
    descendants_matching(tree, scope, |t, n| {
        t.is_focusable(n) && !t.flags(n).contains(NodeFlags::DISABLED)
    })
}
