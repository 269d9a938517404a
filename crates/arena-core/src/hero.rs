use serde::{Deserialize, Serialize};

pub const DEFAULT_HERO_NAME: &str = "Cyber Knight";
pub const DEFAULT_HERO_HP: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub weapons: Vec<String>,
    pub hp: u32,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            name: DEFAULT_HERO_NAME.to_string(),
            weapons: vec!["Energy Sword".to_string(), "Plasma Shield".to_string()],
            hp: DEFAULT_HERO_HP,
        }
    }
}

impl Hero {
    /// The default hero, starting with `hp` hit points.
    pub fn with_hp(hp: u32) -> Self {
        Self {
            hp,
            ..Self::default()
        }
    }

    /// Returns the remaining hit points. Never goes below zero.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hero() {
        let hero = Hero::default();
        assert_eq!(hero.name, "Cyber Knight");
        assert_eq!(hero.weapons, vec!["Energy Sword", "Plasma Shield"]);
        assert_eq!(hero.hp, 30);
    }

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut hero = Hero::with_hp(10);
        assert_eq!(hero.take_damage(4), 6);
        assert!(!hero.is_defeated());
        assert_eq!(hero.take_damage(12), 0);
        assert!(hero.is_defeated());
    }
}
