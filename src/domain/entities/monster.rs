//! Monster template entity - Bestiary entries

use serde::{Deserialize, Serialize};

use crate::domain::services::hit_points;
use crate::domain::value_objects::MonsterId;

/// A bestiary entry as stored in the campaign records
///
/// Stat fields keep the free-text form the bestiary uses (`"45 (6d10+12)"`,
/// `"14 (+2)"`); they are only interpreted through the hit point parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: MonsterId,
    pub name: String,
    /// Challenge XP (`px`)
    pub px: String,
    /// Hit point notation, flat or `"<total> (<N>d<die>+<bonus>)"`
    pub hp: String,
    /// Dexterity notation containing a parenthesized modifier
    pub dex: String,
    pub armor: String,
}

impl MonsterTemplate {
    pub fn new(id: impl Into<MonsterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            px: String::new(),
            hp: String::new(),
            dex: String::new(),
            armor: String::new(),
        }
    }

    pub fn with_xp(mut self, px: impl Into<String>) -> Self {
        self.px = px.into();
        self
    }

    pub fn with_hit_points(mut self, hp: impl Into<String>) -> Self {
        self.hp = hp.into();
        self
    }

    pub fn with_dexterity(mut self, dex: impl Into<String>) -> Self {
        self.dex = dex.into();
        self
    }

    pub fn with_armor(mut self, armor: impl Into<String>) -> Self {
        self.armor = armor.into();
        self
    }

    /// Challenge XP, 0 when the record holds something unparsable
    pub fn challenge_xp(&self) -> u32 {
        u32::try_from(hit_points::leading_integer(&self.px)).unwrap_or(0)
    }

    pub fn dexterity_modifier(&self) -> i32 {
        hit_points::dexterity_modifier(&self.dex)
    }

    pub fn armor_class(&self) -> Option<i32> {
        if self.armor.trim().is_empty() {
            None
        } else {
            Some(hit_points::leading_integer(&self.armor))
        }
    }
}
