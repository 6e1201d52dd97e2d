//! Scalar element trait shared by the tensor substrate and the transform kernels.

// Minimal float trait for the generic transform (no_std, libm for the rest)
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    /// Narrow (or pass through) a filter tap stored as `f64`.
    fn from_f64(x: f64) -> Self;
    fn to_f64(self) -> f64;
    fn abs(self) -> Self;
    /// `self * a + b` with ordinary rounding (no fused instruction), so that the
    /// scalar and parallel paths stay bit-identical on every target.
    #[inline(always)]
    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }
}

impl Float for f32 {
    fn zero() -> Self {
        0.0
    }
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn abs(self) -> Self {
        libm::fabsf(self)
    }
}

impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn from_f64(x: f64) -> Self {
        x
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn abs(self) -> Self {
        libm::fabs(self)
    }
}
