//! Small linear-algebra library used by the transform, camera and renderer.
//!
//! The types here are plain `#[repr(C)]` value types so they can be handed to
//! the GPU through [`bytemuck`] without conversion:
//!
//! - [`Vec2`], [`Vec3`], [`Vec4`]: componentwise arithmetic, inner products,
//!   lengths and normalization
//! - [`Mat4`]: column-major 4×4 matrices with builders for scale, rotation,
//!   translation, projections and look-at views
//!
//! # Conventions
//!
//! | Topic            | Convention                                              |
//! |------------------|---------------------------------------------------------|
//! | Storage          | Column-major, `m.<column>.<row>`                        |
//! | Multiplication   | Column vectors, `a * b` applies `b` first               |
//! | Handedness       | Right-handed, camera looks down −Z                      |
//! | Clip depth       | `[0, 1]` (wgpu), near plane → 0, far plane → 1          |
//! | Rotation sign    | Positive angles turn clockwise looking down the axis    |
//!
//! Conversions to and from [`glam`] are provided for interop with the wider
//! ecosystem.

/// Componentwise operators and inner-product helpers shared by every vector size.
macro_rules! impl_vec_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl std::ops::Add for $ty {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl std::ops::AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl std::ops::Sub for $ty {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl std::ops::SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl std::ops::Mul for $ty {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl std::ops::Mul<f32> for $ty {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl std::ops::Mul<$ty> for f32 {
            type Output = $ty;

            #[inline]
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl std::ops::MulAssign<f32> for $ty {
            #[inline]
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$field *= rhs;)+
            }
        }

        impl std::ops::Div<f32> for $ty {
            type Output = Self;

            #[inline]
            fn div(self, rhs: f32) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl std::ops::Neg for $ty {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl $ty {
            /// Multiplies every component by `s`.
            #[inline]
            pub fn scale(self, s: f32) -> Self {
                self * s
            }

            /// Standard inner product.
            #[inline]
            pub fn dot(self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            /// Same as [`dot`](Self::dot); kept for call sites written against
            /// the `mul_inner` naming.
            #[inline]
            pub fn mul_inner(self, rhs: Self) -> f32 {
                self.dot(rhs)
            }

            #[inline]
            pub fn length_squared(self) -> f32 {
                self.dot(self)
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Returns the vector scaled to unit length.
            ///
            /// There is no zero check: a zero-length input produces NaN
            /// components. Use [`try_normalize`](Self::try_normalize) or
            /// [`normalize_or_zero`](Self::normalize_or_zero) when the input
            /// may be degenerate.
            #[inline]
            pub fn normalize(self) -> Self {
                self * (1.0 / self.length())
            }

            /// Returns `None` when the length is zero or not finite.
            pub fn try_normalize(self) -> Option<Self> {
                let len = self.length();
                if len > 0.0 && len.is_finite() {
                    Some(self * (1.0 / len))
                } else {
                    None
                }
            }

            pub fn normalize_or_zero(self) -> Self {
                self.try_normalize().unwrap_or(Self::ZERO)
            }

            /// Componentwise minimum.
            #[inline]
            pub fn min(self, rhs: Self) -> Self {
                Self { $($field: self.$field.min(rhs.$field)),+ }
            }

            /// Componentwise maximum.
            #[inline]
            pub fn max(self, rhs: Self) -> Self {
                Self { $($field: self.$field.max(rhs.$field)),+ }
            }

            /// Componentwise comparison within [`EPSILON`](crate::math::EPSILON).
            pub fn approx_eq(self, rhs: Self) -> bool {
                true $(&& crate::math::approx_eq(self.$field, rhs.$field))+
            }
        }
    };
}

mod mat4;
mod scalar;
mod vec2;
mod vec3;
mod vec4;

pub use mat4::Mat4;
pub use scalar::{EPSILON, approx_eq, approx_eq_eps};
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
