#[cfg(test)]
mod tests {
    use crate::battle::events::{BattleEvent, EventBus};
    use crate::battle::provider::ScriptedProvider;
    use crate::battle::state::Side;
    use crate::battle::tests::common::*;
    use crate::battle::turn_orchestrator::ActionRecord;
    use crate::combatant::PlayerAction;
    use crate::errors::{ActionError, SelectionError};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_switch_resolves_before_attacks_and_new_creature_attacks() {
        let a = create_test_player("Sacha", vec![salameche(), carapuce()]);
        let b = create_test_player("Regis", vec![bulbizarre()]);
        let mut session = create_test_battle(a, b);

        let mut provider = ScriptedProvider::new(vec![
            PlayerAction::Switch { index: 1 },
            PlayerAction::Attack,
        ]);
        let mut rng = predictable_rng(2);
        let mut bus = EventBus::new();
        let report = run_test_turn(&mut session, &mut provider, &mut rng, &mut bus);

        assert_eq!(
            report.actions[0],
            ActionRecord::Switched {
                side: Side::A,
                from: Some(0),
                to: 1
            }
        );
        assert_eq!(session.combatant(Side::A).active_index(), Some(1));

        // Water into Plant is resisted: (15 - 4) * 0.5 floors to 5.
        match &report.actions[1] {
            ActionRecord::Attacked {
                side,
                attacker,
                outcome,
                ..
            } => {
                assert_eq!(*side, Side::A);
                assert_eq!(attacker, "Carapuce");
                assert_eq!(outcome.damage(), 5);
            }
            other => panic!("Expected Carapuce's attack, got {:?}", other),
        }

        // Bulbizarre hits the incoming Carapuce: (15 - 5) * 2.
        match &report.actions[2] {
            ActionRecord::Attacked {
                defender, outcome, ..
            } => {
                assert_eq!(defender, "Carapuce");
                assert_eq!(outcome.damage(), 20);
            }
            other => panic!("Expected Bulbizarre's attack, got {:?}", other),
        }

        let roster = session.combatant(Side::A).roster();
        assert_eq!(roster[0].current_hp(), roster[0].max_hp());
        assert_eq!(roster[1].current_hp(), 45 - 20);

        assert!(bus.events().contains(&BattleEvent::CreatureSwitched {
            side: Side::A,
            old_creature: Some("Salameche".to_string()),
            new_creature: "Carapuce".to_string(),
        }));
    }

    #[test]
    fn test_out_of_range_switch_falls_back_to_attack() {
        let a = create_test_player("Sacha", vec![salameche(), carapuce()]);
        let b = create_test_player("Regis", vec![bulbizarre()]);
        let mut session = create_test_battle(a, b);

        let mut provider = ScriptedProvider::new(vec![PlayerAction::Switch { index: 5 }]);
        let mut rng = predictable_rng(2);
        let mut bus = EventBus::new();
        let report = run_test_turn(&mut session, &mut provider, &mut rng, &mut bus);

        assert_eq!(session.combatant(Side::A).active_index(), Some(0));
        assert_eq!(
            provider.rejections(),
            &[(
                Side::A,
                PlayerAction::Switch { index: 5 },
                ActionError::InvalidSelection(SelectionError::IndexOutOfRange(5))
            )]
        );
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.damage_dealt_by(Side::A), 22);
        assert!(bus
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::ActionRejected { side: Side::A, .. })));
    }

    #[test]
    fn test_switch_to_active_or_fainted_is_rejected() {
        let fainted = TestCreatureBuilder::new("Carapuce", schema::ElementType::Water, 5)
            .with_hp(0)
            .build();
        let a = create_test_player("Sacha", vec![salameche(), fainted]);
        let b = create_test_player("Regis", vec![bulbizarre()]);
        let mut session = create_test_battle(a, b);

        let mut provider = ScriptedProvider::new(vec![
            PlayerAction::Switch { index: 0 },
            PlayerAction::Attack,
            PlayerAction::Switch { index: 1 },
            PlayerAction::Attack,
        ]);
        let mut rng = predictable_rng(4);
        let mut bus = EventBus::new();
        run_test_turn(&mut session, &mut provider, &mut rng, &mut bus);
        run_test_turn(&mut session, &mut provider, &mut rng, &mut bus);

        let errors: Vec<_> = provider.rejections().iter().map(|r| r.2.clone()).collect();
        assert_eq!(
            errors,
            vec![
                ActionError::InvalidSelection(SelectionError::AlreadyActive(0)),
                ActionError::InvalidSelection(SelectionError::TargetIncapacitated(1)),
            ]
        );
        assert_eq!(session.combatant(Side::A).active_index(), Some(0));
    }

    #[test]
    fn test_policy_switches_out_of_disadvantage() {
        // Bulbizarre is resisted by Salameche's type; the policy brings in Ponyta.
        let ponyta = TestCreatureBuilder::new("Ponyta", schema::ElementType::Fire, 5).build();
        let a = create_test_player("Sacha", vec![salameche()]);
        let b = create_test_npc("Regis", vec![bulbizarre(), ponyta]);
        let mut session = create_test_battle(a, b);

        let mut provider = ScriptedProvider::new(vec![]);
        let mut rng = predictable_rng(2);
        let mut bus = EventBus::new();
        let report = run_test_turn(&mut session, &mut provider, &mut rng, &mut bus);

        assert_eq!(
            report.actions[0],
            ActionRecord::Switched {
                side: Side::B,
                from: Some(0),
                to: 1
            }
        );
        // Neutral exchange: (15 - 4) = 11 each way.
        let npc = session.combatant(Side::B);
        assert_eq!(npc.active_creature().unwrap().name, "Ponyta");
        assert_eq!(npc.active_creature().unwrap().current_hp(), 45 - 11);
        assert_eq!(npc.roster()[0].current_hp(), 55);
        assert_eq!(
            session.combatant(Side::A).active_creature().unwrap().current_hp(),
            45 - 11
        );
    }

    #[test]
    fn test_policy_decides_against_the_creature_just_switched_in() {
        // Against Salameche the policy would bring in Ponyta; against the
        // incoming Carapuce, Bulbizarre holds the advantage and stays out.
        let ponyta = TestCreatureBuilder::new("Ponyta", schema::ElementType::Fire, 5).build();
        let a = create_test_player("Sacha", vec![salameche(), carapuce()]);
        let b = create_test_npc("Regis", vec![bulbizarre(), ponyta]);
        let mut session = create_test_battle(a, b);

        let mut provider = ScriptedProvider::new(vec![PlayerAction::Switch { index: 1 }]);
        let mut rng = predictable_rng(2);
        let mut bus = EventBus::new();
        let report = run_test_turn(&mut session, &mut provider, &mut rng, &mut bus);

        let switches: Vec<_> = report
            .actions
            .iter()
            .filter(|record| matches!(record, ActionRecord::Switched { .. }))
            .collect();
        assert_eq!(
            switches,
            vec![&ActionRecord::Switched {
                side: Side::A,
                from: Some(0),
                to: 1
            }]
        );

        let npc = session.combatant(Side::B);
        assert_eq!(npc.active_creature().unwrap().name, "Bulbizarre");
        // Carapuce into Bulbizarre is resisted: 5. Bulbizarre answers with 20.
        assert_eq!(npc.active_creature().unwrap().current_hp(), 55 - 5);
        assert_eq!(npc.roster()[1].current_hp(), npc.roster()[1].max_hp());
        assert_eq!(
            session.combatant(Side::A).active_creature().unwrap().current_hp(),
            45 - 20
        );
    }

    #[test]
    fn test_policy_side_does_not_consume_provider_actions() {
        let a = create_test_player("Sacha", vec![salameche()]);
        let b = create_test_npc("Regis", vec![carapuce()]);
        let mut session = create_test_battle(a, b);

        // A policy side never asks the provider, so the second scripted
        // action stays queued.
        let mut provider = ScriptedProvider::new(vec![
            PlayerAction::Attack,
            PlayerAction::Switch { index: 3 },
        ]);
        let mut rng = predictable_rng(2);
        let mut bus = EventBus::new();
        run_test_turn(&mut session, &mut provider, &mut rng, &mut bus);

        assert!(provider.rejections().is_empty());
    }
}
