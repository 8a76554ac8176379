use crate::types::{TriangleOut, Viewport};

/// Coarse, vertex-level rejection of a projected triangle.
///
/// A triangle is dropped when it faces away from the viewer, when any vertex
/// depth leaves `[0, 1]`, or when any vertex leaves the screen. Nothing is
/// split: a triangle straddling a plane or the screen edge is dropped whole.
pub fn is_cullable(tri: &TriangleOut, viewport: Viewport) -> bool {
    // positive Z points away from the screen
    if tri.normal.z > 0.0 {
        return true;
    }

    let (w, h) = (viewport.width as f32, viewport.height as f32);
    tri.v.iter().any(|v| {
        let p = v.pos;
        !(0.0..=1.0).contains(&p.z) || p.x < 0.0 || p.x > w || p.y < 0.0 || p.y > h
    })
}
