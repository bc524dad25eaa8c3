//! Character persistence for save/load functionality.
//!
//! Two layers:
//! - [`ActorRecord`] and `Actor::to_dict`/`Actor::from_dict`, a plain
//!   serde snapshot of an actor for callers that store it themselves
//! - [`SavedCharacter`], a versioned JSON save file with metadata that can
//!   be peeked without loading the full record

use crate::actor::{Actor, ActorId};
use crate::class_data::CharacterClass;
use crate::equipment::Equipment;
use crate::error::GameError;
use crate::inventory::Inventory;
use crate::stats::StatBlock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid character data: {0}")]
    Game(#[from] GameError),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

// ============================================================================
// Actor Records
// ============================================================================

/// Everything needed to rebuild an actor.
///
/// Effective stats are not stored; they are recomputed from base stats,
/// class and equipment on load. Stat names are kept as plain strings so an
/// unknown name is reported as a game error rather than a JSON one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub id: ActorId,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub class: Option<CharacterClass>,
    pub base_stats: BTreeMap<String, i32>,
    pub health: i32,
    pub mana: i32,
    pub stamina: i32,
    #[serde(default)]
    pub defending: bool,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub inventory: Inventory,
}

impl Actor {
    pub fn to_record(&self) -> ActorRecord {
        ActorRecord {
            id: self.id,
            name: self.name().to_string(),
            level: self.level(),
            experience: self.experience(),
            class: self.class(),
            base_stats: self
                .stats()
                .base_values()
                .iter()
                .map(|(stat, value)| (stat.name().to_string(), *value))
                .collect(),
            health: self.health(),
            mana: self.mana(),
            stamina: self.stamina(),
            defending: self.is_defending(),
            equipment: self.equipment().clone(),
            inventory: self.inventory.clone(),
        }
    }

    /// Rebuild an actor. Equipment goes through the normal slot checks and
    /// pools are clamped to the recomputed maxima.
    pub fn from_record(record: ActorRecord) -> Result<Self, GameError> {
        if record.level == 0 {
            return Err(GameError::invalid("level must be at least 1"));
        }

        let mut stats = StatBlock::new();
        for (stat, value) in &record.base_stats {
            stats.set_base_named(stat, *value)?;
        }
        let mut actor = Actor::new(record.name, stats)?;
        actor.id = record.id;
        actor.set_class(record.class);
        actor.set_level_unchecked(record.level);
        actor.set_experience(record.experience);

        // Slots iterate main weapon first, so offhand weapons see it.
        for (slot, item) in record.equipment.iter() {
            actor.equip_to(slot, item.clone())?;
        }
        actor.set_pools(record.health, record.mana, record.stamina);
        if record.defending {
            actor.begin_defending();
        }
        actor.inventory = record.inventory;
        Ok(actor)
    }

    /// Snapshot as a JSON value.
    pub fn to_dict(&self) -> Result<serde_json::Value, PersistError> {
        Ok(serde_json::to_value(self.to_record())?)
    }

    /// Rebuild from a value produced by [`Actor::to_dict`].
    pub fn from_dict(value: serde_json::Value) -> Result<Self, PersistError> {
        let record: ActorRecord = serde_json::from_value(value)?;
        Ok(Self::from_record(record)?)
    }
}

// ============================================================================
// Save Files
// ============================================================================

/// A saved character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCharacter {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created.
    pub saved_at: String,

    pub actor: ActorRecord,

    pub metadata: SaveMetadata,
}

/// Summary shown in save listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub character_name: String,

    #[serde(default)]
    pub class: Option<String>,

    pub level: u32,

    #[serde(default)]
    pub gold: u32,

    /// Duplicated from the parent for peek access.
    #[serde(default)]
    pub saved_at: String,
}

impl SavedCharacter {
    pub fn new(actor: &Actor) -> Self {
        let saved_at = chrono_now();
        let metadata = SaveMetadata {
            character_name: actor.name().to_string(),
            class: actor.class().map(|c| c.name().to_string()),
            level: actor.level(),
            gold: actor.inventory.gold(),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            actor: actor.to_record(),
            metadata,
        }
    }

    /// Rebuild the saved actor.
    pub fn into_actor(self) -> Result<Actor, PersistError> {
        Ok(Actor::from_record(self.actor)?)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;
        check_version(saved.version)?;
        Ok(saved)
    }

    /// Read only the metadata of a save file.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;
        check_version(partial.version)?;
        Ok(partial.metadata)
    }
}

fn check_version(found: u32) -> Result<(), PersistError> {
    if found != SAVE_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SAVE_VERSION,
            found,
        });
    }
    Ok(())
}

/// A save file found on disk.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    pub path: PathBuf,
    pub metadata: SaveMetadata,
}

/// List readable character saves in a directory, newest first.
///
/// Files that are not valid saves are skipped.
pub async fn list_character_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            match SavedCharacter::peek_metadata(&path).await {
                Ok(metadata) => saves.push(SaveInfo { path, metadata }),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping file"),
            }
        }
    }

    saves.sort_by(|a, b| {
        b.metadata
            .saved_at
            .cmp(&a.metadata.saved_at)
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(saves)
}

/// Save file path for a character name.
pub fn character_save_path(base_dir: impl AsRef<Path>, character_name: &str) -> PathBuf {
    let sanitized = character_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    base_dir.as_ref().join(format!("{sanitized}.json"))
}

/// Seconds since the Unix epoch, as a string.
fn chrono_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::Slot;
    use crate::stats::StatName;
    use crate::items::{Item, ItemKind};
    use crate::testing::{create_sample_goblin, create_sample_warrior};
    use tempfile::tempdir;

    fn geared_warrior() -> Actor {
        let mut warrior = create_sample_warrior("Brakka");
        warrior
            .equip(Item::new("Longsword", ItemKind::Sword).with_modifier(StatName::Attack, 6))
            .unwrap();
        warrior.inventory.add_gold(40);
        warrior.take_damage(15);
        warrior
    }

    #[test]
    fn test_dict_restores_actor() {
        let warrior = geared_warrior();
        let value = warrior.to_dict().unwrap();
        assert_eq!(value["name"], "Brakka");
        assert_eq!(value["class"], "warrior");

        let restored = Actor::from_dict(value).unwrap();
        assert_eq!(restored.id, warrior.id);
        assert_eq!(restored.health(), warrior.health());
        assert_eq!(restored.effective_stats(), warrior.effective_stats());
        assert_eq!(
            restored.equipped(Slot::Weapon).map(|i| i.name.as_str()),
            Some("Longsword")
        );
        assert_eq!(restored.inventory.gold(), 40);
    }

    #[test]
    fn test_from_dict_rejects_bad_data() {
        let mut value = create_sample_goblin("Snik").to_dict().unwrap();
        value["level"] = serde_json::json!(0);
        let err = Actor::from_dict(value).unwrap_err();
        assert!(matches!(err, PersistError::Game(GameError::InvalidArgument(_))));

        let err = Actor::from_dict(serde_json::json!({ "name": "x" })).unwrap_err();
        assert!(matches!(err, PersistError::Json(_)));
    }

    #[test]
    fn test_unknown_stat_rejected() {
        let mut value = create_sample_goblin("Snik").to_dict().unwrap();
        value["base_stats"]["luck"] = serde_json::json!(7);
        let err = Actor::from_dict(value).unwrap_err();
        assert!(matches!(err, PersistError::Game(GameError::InvalidArgument(_))));
    }

    #[test]
    fn test_misplaced_equipment_rejected() {
        let armor = Item::new("Chain", ItemKind::ChainMail).with_modifier(StatName::Defense, 6);
        let mut record = create_sample_goblin("Snik").to_record();
        record.equipment.insert(Slot::Weapon, armor);
        let err = Actor::from_record(record).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));

        let sword = Item::new("Sword", ItemKind::Sword).with_modifier(StatName::Attack, 5);
        let axe = Item::new("Axe", ItemKind::Axe).with_modifier(StatName::Attack, 9);
        let mut record = create_sample_goblin("Snik").to_record();
        record.equipment.insert(Slot::Weapon, sword);
        record.equipment.insert(Slot::Offhand, axe);
        let err = Actor::from_record(record).unwrap_err();
        assert!(matches!(err, GameError::SlotConflict { slot: Slot::Offhand, .. }));
    }

    #[test]
    fn test_dual_wield_survives_reload() {
        let dagger = Item::new("Dagger", ItemKind::Dagger)
            .with_modifier(StatName::Attack, 3)
            .with_dual_wield();
        let mut rogue = create_sample_goblin("Snik");
        rogue.equip(dagger.clone()).unwrap();
        rogue.equip_to(Slot::Offhand, dagger).unwrap();

        let restored = Actor::from_dict(rogue.to_dict().unwrap()).unwrap();
        assert!(restored.equipment().is_dual_wielding());
        assert_eq!(restored.effective_stats(), rogue.effective_stats());
    }

    #[test]
    fn test_pools_clamped_on_load() {
        let mut record = create_sample_goblin("Snik").to_record();
        record.health = 9_999;
        let actor = Actor::from_record(record).unwrap();
        assert_eq!(actor.health(), actor.max_health());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let warrior = geared_warrior();
        let path = character_save_path(dir.path(), warrior.name());

        SavedCharacter::new(&warrior).save_json(&path).await.unwrap();

        let loaded = SavedCharacter::load_json(&path).await.unwrap();
        assert_eq!(loaded.metadata.character_name, "Brakka");
        assert_eq!(loaded.metadata.class.as_deref(), Some("Warrior"));
        let actor = loaded.into_actor().unwrap();
        assert_eq!(actor.health(), warrior.health());
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.json");
        let mut saved = SavedCharacter::new(&create_sample_goblin("Snik"));
        saved.version = 99;
        saved.save_json(&path).await.unwrap();

        let err = SavedCharacter::load_json(&path).await.unwrap_err();
        assert!(matches!(
            err,
            PersistError::VersionMismatch { expected: 1, found: 99 }
        ));
        assert!(SavedCharacter::peek_metadata(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_list_character_saves_skips_junk() {
        let dir = tempdir().unwrap();
        SavedCharacter::new(&create_sample_goblin("Snik"))
            .save_json(character_save_path(dir.path(), "Snik"))
            .await
            .unwrap();
        SavedCharacter::new(&geared_warrior())
            .save_json(character_save_path(dir.path(), "Brakka"))
            .await
            .unwrap();
        fs::write(dir.path().join("notes.json"), "not a save").await.unwrap();
        fs::write(dir.path().join("readme.txt"), "hello").await.unwrap();

        let saves = list_character_saves(dir.path()).await.unwrap();
        let mut names: Vec<_> = saves
            .iter()
            .map(|s| s.metadata.character_name.as_str())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Brakka", "Snik"]);
    }

    #[test]
    fn test_save_path_sanitizes_name() {
        let path = character_save_path("/saves", "Sir Brakka/II");
        assert_eq!(path, PathBuf::from("/saves/Sir_Brakka_II.json"));
    }
}
