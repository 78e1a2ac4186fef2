//! Vector helpers shared by the per-tick components.
//!
//! World convention: Y is up, the field is the XZ plane, +Z is downfield.

use nalgebra::{UnitQuaternion, Vector2, Vector3};

pub type Vec3 = Vector3<f32>;
pub type Vec2 = Vector2<f32>;
pub type Orientation = UnitQuaternion<f32>;

const EPSILON: f32 = 0.0001;

#[inline]
pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

/// Project onto the ground plane (drop the vertical component).
#[inline]
pub fn ground(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let len = v.norm();
    if len < EPSILON {
        Vec3::zeros()
    } else {
        v / len
    }
}

/// Stick axes map to the ground plane: horizontal → X, vertical → Z.
#[inline]
pub fn input_to_world(v: Vec2) -> Vec3 {
    Vec3::new(v.x, 0.0, v.y)
}

pub fn lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    from + (to - from) * t
}

/// Hermite smoothstep on [0, 1].
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Turn `current` toward a ground direction by `rate * dt` of the remaining arc.
pub fn turn_toward(current: Orientation, direction: Vec3, rate: f32, dt: f32) -> Orientation {
    let dir = normalize_or_zero(ground(direction));
    if dir == Vec3::zeros() {
        return current;
    }
    let target = UnitQuaternion::face_towards(&dir, &Vec3::y());
    let t = (rate * dt).clamp(0.0, 1.0);
    current.try_slerp(&target, t, 1.0e-6).unwrap_or(target)
}

/// Critically damped spring toward `target`; `velocity` carries state between calls.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(EPSILON);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * exp;
    let mut output = target + (change + temp) * exp;

    // Never overshoot the target.
    if (target - current).dot(&(output - target)) > 0.0 {
        output = target;
        *velocity = Vec3::zeros();
    }
    output
}
