use crate::combatant::{Combatant, PolicyKind, DEFAULT_ROSTER_CAPACITY};
use crate::creature::Creature;
use crate::errors::{TemplateError, TemplateResult};
use schema::{CreatureTemplate, ElementType, Rank, TeamTemplate};
use serde::Deserialize;
use std::sync::LazyLock;

const TEAM_SOURCE: &str = include_str!("../data/teams.ron");

#[derive(Debug, Deserialize)]
struct TeamData {
    starters: Vec<CreatureTemplate>,
    champions: Vec<TeamTemplate>,
}

// Parsed once on first access.
static TEAM_DATA: LazyLock<Result<TeamData, TemplateError>> = LazyLock::new(|| {
    ron::from_str(TEAM_SOURCE).map_err(|e| TemplateError::MalformedData(e.to_string()))
});

fn team_data() -> TemplateResult<&'static TeamData> {
    TEAM_DATA.as_ref().map_err(Clone::clone)
}

/// Build a fresh creature from a template.
pub fn create_creature(template: &CreatureTemplate) -> Creature {
    Creature::new(template.name.clone(), template.element, template.level)
}

/// All starter templates, in menu order.
pub fn starters() -> TemplateResult<&'static [CreatureTemplate]> {
    Ok(&team_data()?.starters)
}

/// The starter creature of the given element.
pub fn starter(element: ElementType) -> TemplateResult<Creature> {
    starters()?
        .iter()
        .find(|t| t.element == element)
        .map(create_creature)
        .ok_or_else(|| TemplateError::TeamNotFound(format!("{element} starter")))
}

pub fn champions() -> TemplateResult<&'static [TeamTemplate]> {
    Ok(&team_data()?.champions)
}

/// The team of the champion guarding the arena of the given element.
pub fn champion(element: ElementType) -> TemplateResult<&'static TeamTemplate> {
    champions()?
        .iter()
        .find(|t| t.specialty == Some(element))
        .ok_or_else(|| TemplateError::TeamNotFound(format!("{element} champion")))
}

/// Convert a team template into an AI-controlled combatant.
pub fn build_combatant(template: &TeamTemplate) -> TemplateResult<Combatant> {
    build_combatant_with_capacity(template, DEFAULT_ROSTER_CAPACITY)
}

pub fn build_combatant_with_capacity(
    template: &TeamTemplate,
    capacity: usize,
) -> TemplateResult<Combatant> {
    let mut combatant =
        Combatant::with_capacity(template.name.clone(), capacity).with_policy(PolicyKind::Heuristic);
    if template.rank == Rank::Champion {
        let Some(specialty) = template.specialty else {
            return Err(TemplateError::MalformedData(format!(
                "champion {} has no specialty",
                template.name
            )));
        };
        combatant.rank = Rank::Champion;
        combatant.specialty = Some(specialty);
    }

    if template.creatures.is_empty() {
        return Err(TemplateError::MalformedData(format!(
            "team {} has no creatures",
            template.name
        )));
    }
    for creature in &template.creatures {
        combatant.add_creature(create_creature(creature))?;
    }
    Ok(combatant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_data_parses() {
        assert_eq!(starters().unwrap().len(), 3);
        assert_eq!(champions().unwrap().len(), 3);
    }

    #[test]
    fn test_every_element_has_a_starter_and_champion() {
        for element in [ElementType::Fire, ElementType::Water, ElementType::Plant] {
            let creature = starter(element).unwrap();
            assert_eq!(creature.element(), element);
            assert_eq!(creature.level(), 5);

            let team = champion(element).unwrap();
            assert_eq!(team.rank, Rank::Champion);
            assert_eq!(team.specialty, Some(element));
        }
    }

    #[test]
    fn test_starter_stats() {
        let salameche = starter(ElementType::Fire).unwrap();
        assert_eq!(salameche.name, "Salameche");
        assert_eq!(salameche.attack(), 15);
    }

    #[test]
    fn test_build_champion_combatant() {
        let combatant = build_combatant(champion(ElementType::Water).unwrap()).unwrap();
        assert!(combatant.is_champion());
        assert!(combatant.policy.is_some());
        assert_eq!(combatant.specialty, Some(ElementType::Water));
        assert_eq!(combatant.roster().len(), 3);
        assert_eq!(combatant.active_index(), Some(0));
    }

    #[test]
    fn test_build_combatant_respects_capacity() {
        let team = champion(ElementType::Plant).unwrap();
        let result = build_combatant_with_capacity(team, 2);
        assert!(matches!(result, Err(TemplateError::Roster(_))));
    }

    #[test]
    fn test_champion_without_specialty_is_malformed() {
        let template = TeamTemplate {
            name: "Nobody".to_string(),
            rank: Rank::Champion,
            specialty: None,
            creatures: vec![],
        };
        assert!(matches!(
            build_combatant(&template),
            Err(TemplateError::MalformedData(_))
        ));
    }

    #[test]
    fn test_trainer_team_builds_npc() {
        let template = TeamTemplate {
            name: "Gamin".to_string(),
            rank: Rank::Trainer,
            specialty: None,
            creatures: vec![CreatureTemplate {
                name: "Ptitard".to_string(),
                element: ElementType::Water,
                level: 3,
            }],
        };
        let combatant = build_combatant(&template).unwrap();
        assert!(!combatant.is_champion());
        assert_eq!(combatant.count_available(), 1);
    }
}
