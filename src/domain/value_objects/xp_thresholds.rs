//! Encounter-building tables: per-level XP thresholds and monster-count multipliers

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: i64 = 1;
pub const MAX_LEVEL: i64 = 20;

/// XP budget of one character (or a whole party) for each difficulty tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpThresholds {
    pub easy: u32,
    pub medium: u32,
    pub difficult: u32,
    pub deadly: u32,
}

impl XpThresholds {
    pub const fn new(easy: u32, medium: u32, difficult: u32, deadly: u32) -> Self {
        Self {
            easy,
            medium,
            difficult,
            deadly,
        }
    }

    /// Thresholds for a character level. Levels outside 1..=20 clamp to the nearest edge.
    pub fn for_level(level: i64) -> Self {
        let index = level.clamp(MIN_LEVEL, MAX_LEVEL) - MIN_LEVEL;
        XP_THRESHOLDS_PER_LEVEL[index as usize]
    }
}

impl Add for XpThresholds {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            easy: self.easy + other.easy,
            medium: self.medium + other.medium,
            difficult: self.difficult + other.difficult,
            deadly: self.deadly + other.deadly,
        }
    }
}

impl AddAssign for XpThresholds {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

const XP_THRESHOLDS_PER_LEVEL: [XpThresholds; 20] = [
    XpThresholds::new(25, 50, 75, 100),
    XpThresholds::new(50, 100, 150, 200),
    XpThresholds::new(75, 150, 225, 400),
    XpThresholds::new(125, 250, 375, 500),
    XpThresholds::new(250, 500, 750, 1100),
    XpThresholds::new(300, 600, 900, 1400),
    XpThresholds::new(350, 750, 1100, 1700),
    XpThresholds::new(450, 900, 1400, 2100),
    XpThresholds::new(550, 1100, 1600, 2400),
    XpThresholds::new(600, 1200, 1900, 2800),
    XpThresholds::new(800, 1600, 2400, 3600),
    XpThresholds::new(1000, 2000, 3000, 4500),
    XpThresholds::new(1100, 2200, 3400, 5100),
    XpThresholds::new(1250, 2500, 3800, 5700),
    XpThresholds::new(1400, 2800, 4300, 6400),
    XpThresholds::new(1600, 3200, 4800, 7200),
    XpThresholds::new(2000, 3900, 5900, 8800),
    XpThresholds::new(2100, 4200, 6300, 9500),
    XpThresholds::new(2400, 4900, 7300, 10900),
    XpThresholds::new(2800, 5700, 8500, 12700),
];

/// Encounter XP multiplier, stored in halves so 1.5 and 2.5 stay exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "f64")]
pub struct Multiplier {
    halves: u32,
}

impl Multiplier {
    pub const ZERO: Self = Self::from_halves(0);

    pub const fn from_halves(halves: u32) -> Self {
        Self { halves }
    }

    pub fn halves(&self) -> u32 {
        self.halves
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.halves) / 2.0
    }

    /// Scale an XP total by this multiplier
    pub fn apply(&self, xp: u32) -> f64 {
        f64::from(xp) * self.as_f64()
    }
}

impl From<Multiplier> for f64 {
    fn from(multiplier: Multiplier) -> f64 {
        multiplier.as_f64()
    }
}

impl std::fmt::Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.halves % 2 == 0 {
            write!(f, "{}", self.halves / 2)
        } else {
            write!(f, "{}.5", self.halves / 2)
        }
    }
}

/// One breakpoint of the monster-count table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplierStep {
    /// Smallest monster count this step applies to
    pub min_count: usize,
    pub multiplier: Multiplier,
}

pub const ENCOUNTER_MULTIPLIERS: [MultiplierStep; 6] = [
    MultiplierStep { min_count: 1, multiplier: Multiplier::from_halves(2) },
    MultiplierStep { min_count: 2, multiplier: Multiplier::from_halves(3) },
    MultiplierStep { min_count: 3, multiplier: Multiplier::from_halves(4) },
    MultiplierStep { min_count: 7, multiplier: Multiplier::from_halves(5) },
    MultiplierStep { min_count: 11, multiplier: Multiplier::from_halves(6) },
    MultiplierStep { min_count: 15, multiplier: Multiplier::from_halves(8) },
];

/// Index of the breakpoint with the greatest `min_count` not exceeding `count`.
///
/// Returns `None` for an empty roster.
pub fn step_index_for_count(count: usize) -> Option<usize> {
    ENCOUNTER_MULTIPLIERS
        .iter()
        .rposition(|step| count >= step.min_count)
}

pub fn multiplier_for_count(count: usize) -> Multiplier {
    step_index_for_count(count)
        .map(|index| ENCOUNTER_MULTIPLIERS[index].multiplier)
        .unwrap_or(Multiplier::ZERO)
}
