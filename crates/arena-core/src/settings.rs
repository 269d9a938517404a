use crate::credential::{self, Credential};
use crate::error::Result;
use crate::theme::ThemeVariant;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "ARENA_";

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("model name is empty")]
    Model,
    #[error("API base URL is empty")]
    ApiBase,
    #[error("{0} hit chance must be between 0 and 1")]
    HitChance(&'static str),
    #[error("{0} range is empty or starts at zero")]
    Range(&'static str),
    #[error("hero starting HP must be positive")]
    HeroHp,
}

/// Inclusive `min..=max` range as it appears in `config.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    fn is_valid(&self) -> bool {
        self.min > 0 && self.min <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CombatRules {
    pub hero_hp: u32,
    pub hero_hit_chance: f64,
    pub monster_hit_chance: f64,
    // tables after plain values so the TOML output stays valid
    pub hero_damage: Span,
    pub monster_damage: Span,
    pub monster_hp: Span,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            hero_hp: 30,
            hero_hit_chance: 0.7,
            monster_hit_chance: 0.6,
            hero_damage: Span::new(5, 15),
            monster_damage: Span::new(3, 12),
            monster_hp: Span::new(5, 50),
        }
    }
}

impl CombatRules {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.hero_hit_chance) {
            return Err(ValidationError::HitChance("hero"));
        }
        if !(0.0..=1.0).contains(&self.monster_hit_chance) {
            return Err(ValidationError::HitChance("monster"));
        }
        if !self.hero_damage.is_valid() {
            return Err(ValidationError::Range("hero damage"));
        }
        if !self.monster_damage.is_valid() {
            return Err(ValidationError::Range("monster damage"));
        }
        if !self.monster_hp.is_valid() {
            return Err(ValidationError::Range("monster HP"));
        }
        if self.hero_hp == 0 {
            return Err(ValidationError::HeroHp);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub theme: ThemeVariant,
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub rules: CombatRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            rules: CombatRules::default(),
        }
    }
}

impl Settings {
    /// Loads `config.toml` from the working directory.
    pub fn new() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Defaults, then the TOML file (if present), then `ARENA_*` variables.
    /// Nested keys use a double underscore: `ARENA_RULES__HERO_HP=40`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        settings.is_valid()?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(CONFIG_FILE)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }

    pub fn is_valid(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::Model);
        }
        if self.api_base.trim().is_empty() {
            return Err(ValidationError::ApiBase);
        }
        self.rules.validate()
    }
}

/// Everything read at startup, built once and handed to the components that
/// need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub credential: Option<Credential>,
    pub env_file: PathBuf,
}

impl Config {
    /// Reads `config.toml` and the env file. Settings errors are returned;
    /// a missing credential is not an error until the first API call.
    pub fn load() -> Result<Self> {
        let settings = Settings::new()?;
        let env_file = credential::env_file_path();
        let credential = credential::load_credential(&env_file);
        Ok(Self {
            settings,
            credential,
            env_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeVariant::NeonNight);
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.api_base, "https://api.openai.com/v1");
        assert_eq!(settings.rules.hero_hp, 30);
        assert_eq!(settings.rules.monster_hp, Span::new(5, 50));
        assert!(settings.is_valid().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let settings = Settings::load_from("does-not-exist.toml").unwrap();
            assert_eq!(settings, Settings::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_are_merged() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                model = "gpt-4o-mini"

                [rules]
                hero_hp = 45
                "#,
            )?;
            jail.set_env("ARENA_RULES__MONSTER_HIT_CHANCE", "0.25");

            let settings = Settings::load_from("config.toml").unwrap();
            assert_eq!(settings.model, "gpt-4o-mini");
            assert_eq!(settings.rules.hero_hp, 45);
            assert_eq!(settings.rules.monster_hit_chance, 0.25);
            // untouched keys keep their defaults
            assert_eq!(settings.rules.hero_damage, Span::new(5, 15));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_rules_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[rules]\nhero_hit_chance = 1.5\n")?;
            let err = Settings::load_from("config.toml").unwrap_err();
            assert!(matches!(
                err,
                crate::ArenaError::InvalidSettings(ValidationError::HitChance("hero"))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_empty_range_is_invalid() {
        let mut rules = CombatRules::default();
        rules.monster_damage = Span::new(10, 2);
        assert_eq!(
            rules.validate(),
            Err(ValidationError::Range("monster damage"))
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.theme = ThemeVariant::NeonDay;
        settings.model = "gpt-4.1".to_string();
        settings.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let reloaded: Settings = toml::from_str(&contents).unwrap();
        assert_eq!(reloaded, settings);
    }
}
