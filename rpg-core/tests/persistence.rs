//! Save and reload characters between encounters.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rpg_core::persist::{character_save_path, list_character_saves};
use rpg_core::testing::create_sample_goblin;
use rpg_core::{
    AlwaysAttack, CharacterBuilder, CharacterClass, CombatResolver, ItemRegistry, SavedCharacter,
    Slot,
};
use tempfile::tempdir;

#[tokio::test]
async fn test_winner_survives_save_round() {
    let dir = tempdir().unwrap();
    let registry = ItemRegistry::standard();
    let mut rng = StdRng::seed_from_u64(11);
    let mut hero = CharacterBuilder::new()
        .name("Aria")
        .class(CharacterClass::Warrior)
        .build_with_kit(&registry, &mut rng)
        .unwrap();
    let mut goblin = create_sample_goblin("Snik");

    let mut resolver = CombatResolver::new(StdRng::seed_from_u64(11));
    let outcome = resolver
        .resolve(&mut hero, &mut goblin, &mut AlwaysAttack)
        .unwrap();
    assert_eq!(outcome.winner_name(), Some("Aria"));

    let path = character_save_path(dir.path(), hero.name());
    SavedCharacter::new(&hero).save_json(&path).await.unwrap();

    let meta = SavedCharacter::peek_metadata(&path).await.unwrap();
    assert_eq!(meta.character_name, "Aria");
    assert_eq!(meta.gold, hero.inventory.gold());

    let restored = SavedCharacter::load_json(&path)
        .await
        .unwrap()
        .into_actor()
        .unwrap();
    assert_eq!(restored.id, hero.id);
    assert_eq!(restored.health(), hero.health());
    assert_eq!(restored.experience(), hero.experience());
    assert_eq!(restored.effective_stats(), hero.effective_stats());
    assert_eq!(restored.equipped(Slot::Armor), hero.equipped(Slot::Armor));
    assert_eq!(
        restored.inventory.quantity_of("Rusty Dagger"),
        hero.inventory.quantity_of("Rusty Dagger")
    );

    let saves = list_character_saves(dir.path()).await.unwrap();
    assert_eq!(saves.len(), 1);
}
