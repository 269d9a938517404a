//! Prompts for the battle narration.

use crate::cloud::CompletionBackend;
use crate::error::Result;

const NARRATOR_PROMPT: &str = "You are narrating a battle in a fantasy game between a hero called {hero} and a monster called {monster}. \
Please use the below details to create the narrative. Make it dramatic.";

const INTRO_PROMPT: &str =
    "Introduce the battle. The setting is a futuristic city. Make it dramatic. 150 words max.";

const COMBAT_SUFFIX: &str = " Only describe the combat, no introduction or information about the surrounding area. 50 words only. ";

/// What just happened, from the narrator's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeKind {
    Intro,
    HeroHit { monster_hp: u32 },
    MonsterHit { hero_hp: u32 },
    HeroMiss,
    MonsterMiss,
    HeroDeath,
    MonsterDeath,
}

impl NarrativeKind {
    pub fn user_prompt(&self) -> String {
        let base = match self {
            Self::Intro => return INTRO_PROMPT.to_string(),
            Self::HeroHit { monster_hp } => format!(
                "The user has hit the monster, the monster now has {} health.",
                monster_hp
            ),
            Self::MonsterHit { hero_hp } => format!(
                "The user has been hit by a monster and now has {} health.",
                hero_hp
            ),
            Self::HeroMiss => "The user missed the monster.".to_string(),
            Self::MonsterMiss => "The monster missed the user.".to_string(),
            Self::HeroDeath => "The user was killed by the monster".to_string(),
            Self::MonsterDeath => "The user has killed the monster".to_string(),
        };
        base + COMBAT_SUFFIX
    }
}

pub fn system_prompt(hero_name: &str, monster_name: &str) -> String {
    NARRATOR_PROMPT
        .replace("{hero}", hero_name)
        .replace("{monster}", monster_name)
}

pub async fn narrate(
    backend: &dyn CompletionBackend,
    hero_name: &str,
    monster_name: &str,
    kind: NarrativeKind,
) -> Result<String> {
    tracing::debug!(?kind, "narrating");
    let text = backend
        .complete(&system_prompt(hero_name, monster_name), &kind.user_prompt())
        .await?;
    Ok(text.trim().to_string())
}
