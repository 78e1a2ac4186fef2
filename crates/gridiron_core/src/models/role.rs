//! Formation roles (positions on the offense)

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 11 offensive formation positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "QB")]
    Qb,
    #[serde(rename = "RB")]
    Rb,
    #[serde(rename = "WR1")]
    Wr1,
    #[serde(rename = "WR2")]
    Wr2,
    #[serde(rename = "TE1")]
    Te1,
    #[serde(rename = "TE2")]
    Te2,
    C,
    #[serde(rename = "LG")]
    Lg,
    #[serde(rename = "RG")]
    Rg,
    #[serde(rename = "LT")]
    Lt,
    #[serde(rename = "RT")]
    Rt,
}

impl Role {
    pub const COUNT: usize = 11;

    pub const ALL: [Role; Role::COUNT] = [
        Role::Qb,
        Role::Rb,
        Role::Wr1,
        Role::Wr2,
        Role::Te1,
        Role::Te2,
        Role::C,
        Role::Lg,
        Role::Rg,
        Role::Lt,
        Role::Rt,
    ];

    /// Switching order among user-controllable roles.
    pub const CONTROL_PRIORITY: [Role; 6] =
        [Role::Qb, Role::Rb, Role::Wr1, Role::Wr2, Role::Te1, Role::Te2];

    /// Dense index, stable across builds (declaration order).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Qb => "QB",
            Role::Rb => "RB",
            Role::Wr1 => "WR1",
            Role::Wr2 => "WR2",
            Role::Te1 => "TE1",
            Role::Te2 => "TE2",
            Role::C => "C",
            Role::Lg => "LG",
            Role::Rg => "RG",
            Role::Lt => "LT",
            Role::Rt => "RT",
        }
    }

    pub fn is_lineman(self) -> bool {
        matches!(self, Role::C | Role::Lg | Role::Rg | Role::Lt | Role::Rt)
    }

    /// Skill positions only: QB, RB, both WRs, both TEs.
    pub fn is_user_controllable(self) -> bool {
        !self.is_lineman()
    }

    /// Pass targets exclude the passer and the five linemen.
    pub fn is_pass_eligible(self) -> bool {
        self != Role::Qb && !self.is_lineman()
    }

    /// Position in [`Role::CONTROL_PRIORITY`], `None` for linemen.
    pub fn control_priority(self) -> Option<usize> {
        Role::CONTROL_PRIORITY.iter().position(|r| *r == self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_declaration_order() {
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }

    #[test]
    fn only_skill_positions_are_controllable() {
        let controllable: Vec<Role> =
            Role::ALL.iter().copied().filter(|r| r.is_user_controllable()).collect();
        assert_eq!(controllable, Role::CONTROL_PRIORITY.to_vec());
    }

    #[test]
    fn quarterback_is_not_a_pass_target() {
        assert!(!Role::Qb.is_pass_eligible());
        assert!(!Role::Lt.is_pass_eligible());
        assert!(Role::Rb.is_pass_eligible());
        assert!(Role::Te2.is_pass_eligible());
    }

    #[test]
    fn serde_uses_position_tags() {
        let json = serde_json::to_string(&Role::Wr2).unwrap();
        assert_eq!(json, "\"WR2\"");
        let back: Role = serde_json::from_str("\"LG\"").unwrap();
        assert_eq!(back, Role::Lg);
    }
}
