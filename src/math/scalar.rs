/// Absolute tolerance used by the `approx_eq` helpers.
pub const EPSILON: f32 = 1e-6;

/// Returns `true` when `a` and `b` differ by at most [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

/// Returns `true` when `a` and `b` differ by at most `eps`.
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
