//! Receiver selection and lead/arc/force computation for passes.

use crate::models::{EntityId, Roster};

use super::math::{normalize_or_zero, Vec3};

const DIRECTION_WEIGHT: f32 = 0.7;
const PROXIMITY_WEIGHT: f32 = 0.3;
const PROXIMITY_FALLOFF: f32 = 0.1;

const ARC_PER_UNIT: f32 = 0.1;
const ARC_MIN: f32 = 2.0;
const ARC_MAX: f32 = 8.0;

const FORCE_REFERENCE_DISTANCE: f32 = 15.0;
const FORCE_SCALE_MIN: f32 = 0.8;
const FORCE_SCALE_MAX: f32 = 2.5;
const FORCE_DISTANCE_BONUS: f32 = 0.05;

/// Below this a target is treated as sitting on the ball.
const MIN_THROW_DISTANCE: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassPlan {
    pub target: EntityId,
    /// Unit launch direction.
    pub direction: Vec3,
    pub force: f32,
}

impl PassPlan {
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.force
    }
}

#[derive(Debug, Clone)]
pub struct PassTargeting {
    /// Stick magnitude below which no target is picked.
    pub deadband: f32,
    /// Base throw force; also the assumed ball speed for leading.
    pub base_force: f32,
}

impl Default for PassTargeting {
    fn default() -> Self {
        Self { deadband: 0.1, base_force: 15.0 }
    }
}

impl PassTargeting {
    pub fn new(deadband: f32, base_force: f32) -> Self {
        Self { deadband, base_force }
    }

    pub fn score(input: Vec3, carrier: Vec3, candidate: Vec3) -> f32 {
        let alignment = normalize_or_zero(input).dot(&normalize_or_zero(candidate - carrier));
        let distance = (candidate - carrier).norm();
        let proximity = 1.0 / (1.0 + PROXIMITY_FALLOFF * distance);
        DIRECTION_WEIGHT * alignment + PROXIMITY_WEIGHT * proximity
    }

    /// Best eligible receiver for a stick direction. Strictly greater scores
    /// win, so the first of equal scores keeps the pick.
    pub fn select_target(&self, input: Vec3, carrier: Vec3, roster: &Roster) -> Option<EntityId> {
        if input.norm() < self.deadband {
            return None;
        }
        let mut best: Option<(EntityId, f32)> = None;
        for entity in roster.iter().filter(|e| e.role.is_pass_eligible()) {
            let score = Self::score(input, carrier, entity.position);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entity.id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Unit launch direction: aim where the target will be after the ball's
    /// travel time, then tilt up by a distance-scaled arc.
    pub fn compute_throw(&self, ball: Vec3, target: Vec3, target_velocity: Vec3) -> Vec3 {
        let distance = (target - ball).norm();
        if distance < MIN_THROW_DISTANCE {
            return Vec3::y();
        }
        let time_to_target = distance / self.base_force;
        let lead = target + target_velocity * time_to_target;
        let mut direction = normalize_or_zero(lead - ball);
        direction.y += (distance * ARC_PER_UNIT).clamp(ARC_MIN, ARC_MAX) / distance;
        normalize_or_zero(direction)
    }

    pub fn compute_force(&self, ball: Vec3, target: Vec3) -> f32 {
        let distance = (target - ball).norm();
        let scale = (distance / FORCE_REFERENCE_DISTANCE).clamp(FORCE_SCALE_MIN, FORCE_SCALE_MAX);
        self.base_force * scale * (1.0 + distance * FORCE_DISTANCE_BONUS)
    }

    /// Select, lead and size a pass in one go. `velocity_of` supplies the
    /// receiver's current route velocity.
    pub fn plan(
        &self,
        input: Vec3,
        ball: Vec3,
        carrier: Vec3,
        roster: &Roster,
        velocity_of: impl Fn(EntityId) -> Vec3,
    ) -> Option<PassPlan> {
        let target = self.select_target(input, carrier, roster)?;
        let target_position = roster.position(target)?;
        Some(PassPlan {
            target,
            direction: self.compute_throw(ball, target_position, velocity_of(target)),
            force: self.compute_force(ball, target_position),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use proptest::prelude::*;

    #[test]
    fn higher_score_wins_regardless_of_order() {
        let mut roster = Roster::new();
        roster.spawn("QB", Role::Qb, 0, Vec3::zeros());
        // 0.7 + 0.3 / 2.0 = 0.85, listed first
        let far = roster.spawn("WR2", Role::Wr2, 0, Vec3::new(10.0, 0.0, 0.0));
        // 0.7 + 0.3 / 1.5 = 0.9
        let near = roster.spawn("WR1", Role::Wr1, 0, Vec3::new(5.0, 0.0, 0.0));

        let carrier = Vec3::zeros();
        let input = Vec3::new(1.0, 0.0, 0.0);
        let near_score = PassTargeting::score(input, carrier, Vec3::new(5.0, 0.0, 0.0));
        let far_score = PassTargeting::score(input, carrier, Vec3::new(10.0, 0.0, 0.0));
        assert!((near_score - 0.9).abs() < 1e-6);
        assert!((far_score - 0.85).abs() < 1e-6);

        let picked = PassTargeting::default().select_target(input, carrier, &roster);
        assert_eq!(picked, Some(near));
        assert_ne!(picked, Some(far));
    }

    #[test]
    fn no_target_inside_deadband() {
        let mut roster = Roster::new();
        roster.spawn("WR1", Role::Wr1, 0, Vec3::new(5.0, 0.0, 0.0));
        let targeting = PassTargeting::default();
        assert_eq!(targeting.select_target(Vec3::new(0.05, 0.0, 0.0), Vec3::zeros(), &roster), None);
    }

    #[test]
    fn linemen_and_passer_are_never_targets() {
        let mut roster = Roster::new();
        for role in [Role::Qb, Role::C, Role::Lg, Role::Rg, Role::Lt, Role::Rt] {
            roster.spawn(role.as_str(), role, 0, Vec3::new(3.0, 0.0, 0.0));
        }
        let targeting = PassTargeting::default();
        assert_eq!(targeting.select_target(Vec3::x(), Vec3::zeros(), &roster), None);
    }

    #[test]
    fn equal_scores_keep_the_first() {
        let mut roster = Roster::new();
        let first = roster.spawn("TE1", Role::Te1, 0, Vec3::new(0.0, 0.0, 8.0));
        roster.spawn("TE2", Role::Te2, 0, Vec3::new(0.0, 0.0, 8.0));
        let picked = PassTargeting::default().select_target(Vec3::z(), Vec3::zeros(), &roster);
        assert_eq!(picked, Some(first));
    }

    #[test]
    fn throw_leads_a_moving_receiver() {
        let targeting = PassTargeting::default();
        let ball = Vec3::new(0.0, 1.5, 0.0);
        let target = Vec3::new(0.0, 1.5, 15.0);
        let still = targeting.compute_throw(ball, target, Vec3::zeros());
        let moving = targeting.compute_throw(ball, target, Vec3::new(7.0, 0.0, 0.0));
        assert!((still.norm() - 1.0).abs() < 1e-5);
        assert!(still.x.abs() < 1e-6);
        assert!(moving.x > 0.0, "leads toward the receiver's motion");
        // arc: clamp(1.5, 2, 8) / 15 added before renormalizing
        let expected = Vec3::new(0.0, 2.0 / 15.0, 1.0).normalize();
        assert!((still - expected).norm() < 1e-5);
    }

    #[test]
    fn throw_at_zero_distance_goes_straight_up() {
        let targeting = PassTargeting::default();
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(targeting.compute_throw(p, p, Vec3::zeros()), Vec3::y());
    }

    #[test]
    fn force_matches_reference_distance() {
        let targeting = PassTargeting::default();
        let force = targeting.compute_force(Vec3::zeros(), Vec3::new(0.0, 0.0, 15.0));
        assert!((force - 15.0 * 1.0 * 1.75).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn force_stays_within_clamped_bounds(d in 0.0f32..200.0) {
            let targeting = PassTargeting::default();
            let force = targeting.compute_force(Vec3::zeros(), Vec3::new(d, 0.0, 0.0));
            let bonus = 1.0 + d * FORCE_DISTANCE_BONUS;
            prop_assert!(force >= 15.0 * FORCE_SCALE_MIN * bonus - 1e-3);
            prop_assert!(force <= 15.0 * FORCE_SCALE_MAX * bonus + 1e-3);
        }

        #[test]
        fn throw_direction_is_unit_and_climbs(
            x in -40.0f32..40.0,
            z in 1.0f32..60.0,
            vx in -8.0f32..8.0,
            vz in -8.0f32..8.0,
        ) {
            let targeting = PassTargeting::default();
            let ball = Vec3::new(0.0, 1.5, 0.0);
            let dir = targeting.compute_throw(ball, Vec3::new(x, 0.0, z), Vec3::new(vx, 0.0, vz));
            prop_assert!((dir.norm() - 1.0).abs() < 1e-4);
            prop_assert!(dir.y > -1.0);
        }

        #[test]
        fn selected_target_has_the_top_score(
            positions in proptest::collection::vec((-30.0f32..30.0, -30.0f32..30.0), 1..6),
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let roles = [Role::Rb, Role::Wr1, Role::Wr2, Role::Te1, Role::Te2, Role::Rb];
            let mut roster = Roster::new();
            let mut ids = Vec::new();
            for (i, (x, z)) in positions.iter().enumerate() {
                ids.push(roster.spawn("R", roles[i], 0, Vec3::new(*x, 0.0, *z)));
            }
            let input = Vec3::new(angle.cos(), 0.0, angle.sin());
            let picked = PassTargeting::default().select_target(input, Vec3::zeros(), &roster);
            let picked = picked.expect("eligible receivers exist");
            let top = roster
                .iter()
                .map(|e| PassTargeting::score(input, Vec3::zeros(), e.position))
                .fold(f32::MIN, f32::max);
            let chosen = PassTargeting::score(input, Vec3::zeros(), roster.position(picked).unwrap());
            prop_assert_eq!(chosen, top);
        }
    }
}
