/// Painter's ordering of screen triangles
use std::cmp::Ordering;

use crate::screen::ScreenTriangle;

/// Descending by depth, so that `a` goes first when it is at least as far as `b`
pub fn farther_first(a: &ScreenTriangle, b: &ScreenTriangle) -> Ordering {
    b.depth.total_cmp(&a.depth)
}

/// Sort back to front (largest mean depth first). Nearer triangles end up
/// last and overdraw farther ones.
///
/// The sort is stable: triangles with equal depth keep the order they were
/// produced in, so a frame always draws in the same order.
pub fn sort_back_to_front(triangles: &mut [ScreenTriangle]) {
    triangles.sort_by(farther_first);
}
