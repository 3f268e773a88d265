use crate::prelude::{Point3, Vector3};

/// Bone vector pointing from `from` to `to` (`to - from`).
pub fn vector_from_points(from: &Point3, to: &Point3) -> Vector3 {
    to - from
}

/// Unsigned angle between two vectors in `[0, π]`.
///
/// Returns `None` when either vector has zero or non-finite length, where
/// `arccos(dot / norms)` has no value. The test is independent of the
/// coordinate scale. Round-off that pushes a valid ratio just outside
/// `[-1, 1]` is clamped.
pub fn angle_between(a: &Vector3, b: &Vector3) -> Option<f64> {
    let (norm_a, norm_b) = (a.norm(), b.norm());
    let usable = |norm: f64| norm > 0.0 && norm.is_finite();
    if !usable(norm_a) || !usable(norm_b) {
        return None;
    }
    // Divide one norm at a time so tiny or huge coordinates neither underflow
    // nor overflow the denominator.
    let ratio = a.dot(b) / norm_a / norm_b;
    if !ratio.is_finite() {
        return None;
    }
    Some(ratio.clamp(-1.0, 1.0).acos())
}
