//! Read-only encounter repository over the campaign SQLite database

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::application::ports::outbound::EncounterRepositoryPort;
use crate::domain::entities::{Character, Encounter, MonsterTemplate};
use crate::domain::value_objects::{CampaignId, EncounterId};

/// Reads encounters with their characters and monster placements.
///
/// The campaign database belongs to the record editor; this adapter never
/// writes to it. Numeric columns are cast in SQL because older rows may hold
/// them as text.
pub struct SqliteEncounterRepository {
    pool: SqlitePool,
}

impl SqliteEncounterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn characters(&self, id: &EncounterId) -> Result<Vec<Character>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name,
                   CAST(c.level AS INTEGER) AS level,
                   CAST(c.maxHitPoints AS INTEGER) AS max_hp,
                   CAST(c.currentHitPoints AS INTEGER) AS current_hp,
                   CAST(c.temporaryHitPoints AS INTEGER) AS temp_hp,
                   CAST(c.armorClass AS INTEGER) AS armor_class,
                   CAST(c.dexterity AS INTEGER) AS dexterity,
                   CAST(c.experiencePoints AS INTEGER) AS experience_points
            FROM characters c
            JOIN encounter_characters ec ON c.id = ec.character_id
            WHERE ec.encounter_id = ?
            ORDER BY ec.id
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query encounter characters")?;

        rows.iter().map(row_to_character).collect()
    }

    async fn monsters(&self, id: &EncounterId) -> Result<Vec<MonsterTemplate>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id,
                   COALESCE(m.name, '') AS name,
                   COALESCE(CAST(m.px AS TEXT), '') AS px,
                   COALESCE(CAST(m.hp AS TEXT), '') AS hp,
                   COALESCE(CAST(m.dex AS TEXT), '') AS dex,
                   COALESCE(CAST(m.armor AS TEXT), '') AS armor
            FROM monsters m
            JOIN encounter_monsters em ON m.id = em.monster_id
            WHERE em.encounter_id = ?
            ORDER BY em.id
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to query encounter monsters")?;

        rows.iter().map(row_to_monster).collect()
    }
}

#[async_trait]
impl EncounterRepositoryPort for SqliteEncounterRepository {
    async fn get(&self, id: &EncounterId) -> Result<Option<Encounter>> {
        let row = sqlx::query("SELECT id, name, campaign_id FROM encounters WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query encounter")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let campaign_id: Option<String> = row.try_get("campaign_id")?;
        let encounter = Encounter {
            id: EncounterId::new(row.try_get::<String, _>("id")?),
            name: row.try_get("name")?,
            campaign_id: campaign_id.map(CampaignId::from),
            characters: self.characters(id).await?,
            monsters: self.monsters(id).await?,
        };

        debug!(
            encounter_id = %id,
            characters = encounter.characters.len(),
            monsters = encounter.monsters.len(),
            "Loaded encounter"
        );
        Ok(Some(encounter))
    }
}

fn row_to_character(row: &SqliteRow) -> Result<Character> {
    let level: Option<i64> = row.try_get("level")?;
    Ok(Character {
        id: row.try_get::<String, _>("id")?.into(),
        name: row.try_get("name")?,
        // Missing or zero levels count as level 1
        level: level.filter(|l| *l != 0).unwrap_or(1),
        max_hit_points: narrow(row.try_get("max_hp")?).unwrap_or(0),
        current_hit_points: narrow(row.try_get("current_hp")?).unwrap_or(0),
        temporary_hit_points: narrow(row.try_get("temp_hp")?).unwrap_or(0),
        armor_class: narrow(row.try_get("armor_class")?),
        dexterity: narrow(row.try_get("dexterity")?),
        experience_points: row.try_get("experience_points")?,
    })
}

fn row_to_monster(row: &SqliteRow) -> Result<MonsterTemplate> {
    Ok(MonsterTemplate {
        id: row.try_get::<String, _>("id")?.into(),
        name: row.try_get("name")?,
        px: row.try_get("px")?,
        hp: row.try_get("hp")?,
        dex: row.try_get("dex")?,
        armor: row.try_get("armor")?,
    })
}

fn narrow(value: Option<i64>) -> Option<i32> {
    value.map(|v| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}
