//! Keyframe value types and their interpolation rules.

use glam::{Quat, Vec3, Vec4};

/// A value a [`KeyframeTrack`](super::tracks::KeyframeTrack) can blend between keyframes.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// glTF cubic-spline interpolation. Tangents are given per second, so
    /// they are scaled by the keyframe interval `dt`.
    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self;
}

/// Hermite basis weights `[p0, m0, p1, m1]` at `t`.
#[inline]
fn hermite_basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    [1.0 - s2, s3 - t2 + t, s2, s3]
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let [b0, b1, b2, b3] = hermite_basis(t);
        b0 * v0 + b1 * out_tangent0 * dt + b2 * v1 + b3 * in_tangent1 * dt
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let [b0, b1, b2, b3] = hermite_basis(t);
        v0 * b0 + out_tangent0 * (b1 * dt) + v1 * b2 + in_tangent1 * (b3 * dt)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let [b0, b1, b2, b3] = hermite_basis(t);
        let blended = Vec4::from(v0) * b0
            + Vec4::from(out_tangent0) * (b1 * dt)
            + Vec4::from(v1) * b2
            + Vec4::from(in_tangent1) * (b3 * dt);
        Quat::from_vec4(blended).normalize()
    }
}
