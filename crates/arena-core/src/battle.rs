//! Turn-based battle between the hero and a generated monster.
//!
//! Mechanics are resolved synchronously from an injected RNG; only the
//! monster and the narration come from the completion backend. A turn is
//! applied to a copy of the battle and committed once its narration arrives,
//! so a failed API call leaves the battle exactly as it was.

use crate::cloud::CompletionBackend;
use crate::error::{ArenaError, Result};
use crate::hero::Hero;
use crate::monster::{create_monster, Monster};
use crate::narrative::{narrate, NarrativeKind};
use crate::settings::CombatRules;
use rand::Rng;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Hero,
    Monster,
}

impl Turn {
    pub fn other(self) -> Self {
        match self {
            Self::Hero => Self::Monster,
            Self::Monster => Self::Hero,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    pub hero: Hero,
    pub monster: Monster,
    pub turn: Turn,
    pub phase: Phase,
    /// Every narrative of this battle, oldest first.
    pub log: Vec<String>,
    pub round: u32,
}

impl Battle {
    pub fn new(hero: Hero, monster: Monster, intro: String) -> Self {
        Self {
            hero,
            monster,
            turn: Turn::Hero,
            phase: Phase::InProgress,
            log: vec![intro],
            round: 1,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase != Phase::InProgress
    }

    pub fn current_narrative(&self) -> &str {
        self.log.last().map(String::as_str).unwrap_or_default()
    }

    pub fn turn_label(&self) -> &'static str {
        match self.turn {
            Turn::Hero => "Hero's Turn!",
            Turn::Monster => "Monster's Turn!",
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self.turn {
            Turn::Hero => "Attack!",
            Turn::Monster => "Next Turn",
        }
    }

    /// Rolls the current side's attack, applies it and hands the turn over.
    /// Returns what the narrator should describe.
    pub fn resolve_turn<R: Rng>(&mut self, rules: &CombatRules, rng: &mut R) -> NarrativeKind {
        let kind = match self.turn {
            Turn::Hero => {
                if rng.gen_bool(rules.hero_hit_chance) {
                    let damage = rng.gen_range(rules.hero_damage.range());
                    let monster_hp = self.monster.take_damage(damage);
                    tracing::debug!(damage, monster_hp, "hero hits");
                    if self.monster.is_defeated() {
                        self.phase = Phase::Victory;
                        NarrativeKind::MonsterDeath
                    } else {
                        NarrativeKind::HeroHit { monster_hp }
                    }
                } else {
                    NarrativeKind::HeroMiss
                }
            }
            Turn::Monster => {
                if rng.gen_bool(rules.monster_hit_chance) {
                    let damage = rng.gen_range(rules.monster_damage.range());
                    let hero_hp = self.hero.take_damage(damage);
                    tracing::debug!(damage, hero_hp, "monster hits");
                    if self.hero.is_defeated() {
                        self.phase = Phase::Defeat;
                        NarrativeKind::HeroDeath
                    } else {
                        NarrativeKind::MonsterHit { hero_hp }
                    }
                } else {
                    NarrativeKind::MonsterMiss
                }
            }
        };

        if self.turn == Turn::Monster {
            self.round += 1;
        }
        self.turn = self.turn.other();
        kind
    }
}

/// Runs battles against a completion backend.
#[derive(Clone)]
pub struct Arena {
    backend: Arc<dyn CompletionBackend>,
    rules: CombatRules,
}

impl Arena {
    pub fn new(backend: Arc<dyn CompletionBackend>, rules: CombatRules) -> Self {
        Self { backend, rules }
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    /// Generates a monster, narrates the intro and returns a fresh battle with
    /// the hero to move. Refused while `current` is still being fought.
    pub async fn start_battle<R: Rng + Send>(
        &self,
        current: Option<&Battle>,
        rng: &mut R,
    ) -> Result<Battle> {
        if current.is_some_and(|battle| !battle.is_over()) {
            return Err(ArenaError::BattleInProgress);
        }

        let monster_hp = rng.gen_range(self.rules.monster_hp.range());
        let hero = Hero::with_hp(self.rules.hero_hp);
        let monster = create_monster(self.backend.as_ref(), monster_hp).await?;
        let intro = narrate(
            self.backend.as_ref(),
            &hero.name,
            &monster.name,
            NarrativeKind::Intro,
        )
        .await?;

        tracing::info!(monster = %monster.name, monster_hp, "battle started");
        Ok(Battle::new(hero, monster, intro))
    }

    /// Plays one turn for whichever side is to move.
    pub async fn play_turn<R: Rng + Send>(&self, battle: &mut Battle, rng: &mut R) -> Result<()> {
        if battle.is_over() {
            return Err(ArenaError::BattleOver);
        }

        let mut next = battle.clone();
        let kind = next.resolve_turn(&self.rules, rng);
        let text = narrate(
            self.backend.as_ref(),
            &next.hero.name,
            &next.monster.name,
            kind,
        )
        .await?;
        next.log.push(text);

        match next.phase {
            Phase::Victory => tracing::info!(rounds = next.round, "monster defeated"),
            Phase::Defeat => tracing::info!(rounds = next.round, "hero defeated"),
            Phase::InProgress => {}
        }
        *battle = next;
        Ok(())
    }
}
