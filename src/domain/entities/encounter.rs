//! Encounter entity - A planned fight with its participants resolved

use serde::{Deserialize, Serialize};

use super::{Character, MonsterTemplate};
use crate::domain::value_objects::{CampaignId, EncounterId};

/// An encounter as read from the campaign records
///
/// `monsters` keeps one entry per placed monster in placement order, so a
/// template placed three times appears three times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: EncounterId,
    pub name: String,
    pub campaign_id: Option<CampaignId>,
    pub characters: Vec<Character>,
    pub monsters: Vec<MonsterTemplate>,
}

impl Encounter {
    pub fn new(id: impl Into<EncounterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            campaign_id: None,
            characters: Vec::new(),
            monsters: Vec::new(),
        }
    }

    pub fn with_campaign(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    pub fn with_monster(mut self, monster: MonsterTemplate) -> Self {
        self.monsters.push(monster);
        self
    }
}
