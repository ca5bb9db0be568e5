#[cfg(test)]
mod tests {
    use crate::battle::engine::{end_turn, resolve_skipped_turn, resolve_turn, TurnAction};
    use crate::battle::state::BattleStatus;
    use crate::battle::status_effects::ensure_confuse_slots_for_turn;
    use crate::battle::tests::common::{
        create_duel, create_test_battle, seeded_rng, status, test_move, TestCombatantBuilder,
    };
    use crate::combatant::StatusBlock;
    use crate::side::Side;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;
    use schema::{EffectKind, ElementType};

    fn confused(slots: Vec<u8>) -> StatusBlock {
        status(|s| {
            s.confuse_pending = slots.len() as u8;
            s.confuse_slots = slots;
        })
    }

    // --- Face selection ---

    #[test]
    fn test_confused_faces_are_distinct_open_slots() {
        for seed in 0..50 {
            let mut combatant = TestCombatantBuilder::new("Cinder")
                .with_slot(1, "Flame")
                .with_slot(3, "Tackle")
                .with_slot(5, "Rest")
                .with_status(status(|s| s.confuse_pending = 2))
                .build();
            let mut rng = StdRng::seed_from_u64(seed);

            ensure_confuse_slots_for_turn(&mut combatant, &mut rng);

            let slots = &combatant.status.confuse_slots;
            assert_eq!(slots.len(), 2, "seed {}", seed);
            assert_eq!(combatant.status.confuse_pending, 2, "seed {}", seed);
            assert_ne!(slots[0], slots[1], "seed {}", seed);
            assert!(
                slots.iter().all(|s| [1, 3, 5].contains(s)),
                "seed {} picked a locked slot: {:?}",
                seed,
                slots
            );
        }
    }

    #[test]
    fn test_confusion_capped_by_open_slots() {
        let mut combatant = TestCombatantBuilder::new("Cinder")
            .with_slot(6, "Flame")
            .with_status(status(|s| s.confuse_pending = 3))
            .build();

        ensure_confuse_slots_for_turn(&mut combatant, &mut seeded_rng());

        assert_eq!(combatant.status.confuse_slots, vec![6]);
        assert_eq!(combatant.status.confuse_pending, 1);
    }

    #[test]
    fn test_stacked_confusion_on_small_loadout_matches_faces() {
        // Arrange: Leafy only has two moves but gets confused three times over
        let state = create_duel(
            TestCombatantBuilder::new("Cinder").with_moves(&["Spook"]).build(),
            TestCombatantBuilder::new("Leafy")
                .with_slot(2, "Vine")
                .with_slot(5, "Leaf")
                .with_status(status(|s| s.confuse_pending = 1))
                .build(),
        );
        let action = TurnAction {
            attacker: Side::Player,
            move_data: Some(test_move(
                "Spook",
                ElementType::Ghost,
                0,
                &[(EffectKind::Confuse, 2)],
            )),
            selected_slot: Some(1),
            pre_messages: Vec::new(),
        };

        // Act
        let after_hit = resolve_turn(&state, action, &mut seeded_rng());
        let next = end_turn(&after_hit, &mut seeded_rng());

        // Assert
        let leafy = next.active(Side::Opponent).unwrap();
        assert_eq!(leafy.status.confuse_slots, vec![2, 5]);
        assert_eq!(leafy.status.confuse_pending, 2);
    }

    #[test]
    fn test_faces_are_not_repicked() {
        let mut combatant = TestCombatantBuilder::new("Cinder")
            .with_moves(&["A", "B", "C", "D", "E", "F"])
            .with_status(status(|s| {
                s.confuse_pending = 2;
                s.confuse_slots = vec![4];
            }))
            .build();

        ensure_confuse_slots_for_turn(&mut combatant, &mut seeded_rng());

        assert_eq!(combatant.status.confuse_slots, vec![4]);
    }

    #[test]
    fn test_no_pending_confusion_picks_nothing() {
        let mut combatant = TestCombatantBuilder::new("Cinder")
            .with_moves(&["A", "B", "C"])
            .build();

        ensure_confuse_slots_for_turn(&mut combatant, &mut seeded_rng());

        assert!(combatant.status.confuse_slots.is_empty());
    }

    #[test]
    fn test_end_turn_prepares_next_actor() {
        // Arrange: Leafy was confused during Cinder's turn
        let state = create_duel(
            TestCombatantBuilder::new("Cinder").with_moves(&["Flame"]).build(),
            TestCombatantBuilder::new("Leafy")
                .with_moves(&["Vine", "Leaf", "Root"])
                .with_status(status(|s| s.confuse_pending = 1))
                .build(),
        );

        // Act
        let next = end_turn(&state, &mut seeded_rng());

        // Assert
        assert_eq!(next.turn, Side::Opponent);
        let slots = &next.active(Side::Opponent).unwrap().status.confuse_slots;
        assert_eq!(slots.len(), 1);
        assert!([1, 2, 3].contains(&slots[0]));
    }

    // --- Resolution ---

    #[test]
    fn test_confused_face_costs_twenty_and_cancels_move() {
        // Arrange
        let state = create_duel(
            TestCombatantBuilder::new("Cinder")
                .with_moves(&["Tackle", "Flame"])
                .with_status(confused(vec![2]))
                .build(),
            TestCombatantBuilder::new("Leafy").with_moves(&["Vine"]).build(),
        );
        let action = TurnAction {
            attacker: Side::Player,
            move_data: Some(test_move("Flame", ElementType::Fire, 30, &[(EffectKind::Burn, 1)])),
            selected_slot: Some(2),
            pre_messages: Vec::new(),
        };

        // Act
        let next = resolve_turn(&state, action, &mut seeded_rng());

        // Assert
        let cinder = next.active(Side::Player).unwrap();
        let leafy = next.active(Side::Opponent).unwrap();
        assert_eq!(cinder.health, 80);
        assert_eq!(leafy.health, 100);
        assert!(leafy.status.is_clear());
        assert_eq!(
            next.last_turn_messages,
            vec!["Cinder hurt itself in confusion! (20 damage)".to_string()]
        );
        assert_eq!(cinder.status.confuse_pending, 0);
        assert!(cinder.status.confuse_slots.is_empty());
    }

    #[rstest]
    #[case::move_used(Some(1))]
    #[case::no_selection(None)]
    fn test_confusion_expires_after_own_turn(#[case] selected_slot: Option<u8>) {
        let state = create_duel(
            TestCombatantBuilder::new("Cinder")
                .with_moves(&["Tackle", "Flame"])
                .with_status(confused(vec![2]))
                .build(),
            TestCombatantBuilder::new("Leafy").with_moves(&["Vine"]).build(),
        );
        let action = TurnAction {
            attacker: Side::Player,
            move_data: Some(test_move("Tackle", ElementType::Normal, 20, &[])),
            selected_slot,
            pre_messages: Vec::new(),
        };

        let next = resolve_turn(&state, action, &mut seeded_rng());

        let cinder = next.active(Side::Player).unwrap();
        assert_eq!(cinder.health, 100);
        assert_eq!(cinder.status, StatusBlock::default());
        assert_eq!(next.active(Side::Opponent).unwrap().health, 80);
    }

    #[test]
    fn test_confusion_self_knockout_switches_and_still_ticks() {
        // Arrange
        let state = create_test_battle(
            vec![
                TestCombatantBuilder::new("Cinder")
                    .with_moves(&["Tackle", "Flame"])
                    .with_hp(15)
                    .with_status(confused(vec![2]))
                    .build(),
                TestCombatantBuilder::new("Reserve").with_moves(&["Tackle"]).build(),
            ],
            vec![TestCombatantBuilder::new("Leafy")
                .with_moves(&["Vine"])
                .with_status(status(|s| s.burn = 1))
                .build()],
        );
        let action = TurnAction {
            attacker: Side::Player,
            move_data: Some(test_move("Flame", ElementType::Fire, 30, &[])),
            selected_slot: Some(2),
            pre_messages: Vec::new(),
        };

        // Act
        let next = resolve_turn(&state, action, &mut seeded_rng());

        // Assert
        let cinder = &next.player.team[0];
        assert!(cinder.fainted);
        assert_eq!(cinder.health, 0);
        assert!(cinder.status.confuse_slots.is_empty());
        assert_eq!(next.player.active_index, 1);
        assert_eq!(next.active(Side::Opponent).unwrap().health, 95);
        assert_eq!(next.status, BattleStatus::InProgress);
        assert_eq!(
            next.last_turn_messages,
            vec![
                "Cinder hurt itself in confusion! (20 damage)".to_string(),
                "Cinder fainted!".to_string(),
                "Player sent out Reserve!".to_string(),
                "Leafy is hurt by its burn! (5 damage)".to_string(),
            ]
        );
    }

    #[test]
    fn test_confusion_self_knockout_of_last_member_loses() {
        let state = create_duel(
            TestCombatantBuilder::new("Cinder")
                .with_moves(&["Tackle"])
                .with_hp(20)
                .with_status(confused(vec![1]))
                .build(),
            TestCombatantBuilder::new("Leafy").with_moves(&["Vine"]).build(),
        );
        let action = TurnAction {
            attacker: Side::Player,
            move_data: Some(test_move("Tackle", ElementType::Normal, 20, &[])),
            selected_slot: Some(1),
            pre_messages: Vec::new(),
        };

        let next = resolve_turn(&state, action, &mut seeded_rng());

        assert_eq!(next.status, BattleStatus::Finished);
        assert_eq!(next.winner, Some(Side::Opponent));
        assert_eq!(
            next.last_turn_messages.last().map(String::as_str),
            Some("Opponent has won the battle!")
        );
    }

    #[test]
    fn test_skipped_turn_clears_confusion() {
        let mut state = create_duel(
            TestCombatantBuilder::new("Cinder")
                .with_moves(&["Tackle", "Flame"])
                .with_status(status(|s| {
                    s.sleep = 2;
                    s.confuse_pending = 1;
                    s.confuse_slots = vec![2];
                }))
                .build(),
            TestCombatantBuilder::new("Leafy")
                .with_moves(&["Vine"])
                .with_status(status(|s| s.confuse_pending = 1))
                .build(),
        );
        state.turn = Side::Player;

        let asleep = "Cinder is asleep and cannot move.".to_string();
        let next = resolve_skipped_turn(&state, vec![asleep]);

        let cinder = next.active(Side::Player).unwrap();
        assert_eq!(cinder.status.confuse_pending, 0);
        assert!(cinder.status.confuse_slots.is_empty());
        assert_eq!(cinder.status.sleep, 2);
        // The defender keeps its own pending confusion.
        assert_eq!(next.active(Side::Opponent).unwrap().status.confuse_pending, 1);
        assert_eq!(
            next.last_turn_messages,
            vec!["Cinder is asleep and cannot move.".to_string()]
        );
    }
}
