use std::fmt;

use crate::contract::model::PowerTier;

impl PowerTier {
    pub fn for_power(power: u32) -> Self {
        match power {
            0..=9 => Self::Beginner,
            10..=29 => Self::Novice,
            30..=59 => Self::Intermediate,
            60..=99 => Self::Advanced,
            100..=199 => Self::Expert,
            _ => Self::Master,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Novice => "Novice",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Master => "Master",
        }
    }

    /// Power needed to reach the next tier, `None` at the top.
    pub fn next_threshold(&self) -> Option<u32> {
        match self {
            Self::Beginner => Some(10),
            Self::Novice => Some(30),
            Self::Intermediate => Some(60),
            Self::Advanced => Some(100),
            Self::Expert => Some(200),
            Self::Master => None,
        }
    }
}

impl fmt::Display for PowerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
