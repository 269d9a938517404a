use crate::cloud::CompletionBackend;
use crate::error::Result;
use serde::{Deserialize, Serialize};

const MONSTER_SYSTEM_PROMPT: &str = r#"You are a game API that must return ONLY valid JSON matching this exact format:
{"monster": {"name": "MONSTER_NAME", "description": "MONSTER_DESCRIPTION", "weapons": ["WEAPON1", "WEAPON2"], "hp": HP_VALUE}}

Rules:
1. The response must be ONLY the JSON object, no other text
2. The "hp" value must be the number provided
3. "weapons" must be an array of strings
4. All values must use double quotes
5. No trailing commas
"#;

const MONSTER_USER_PROMPT: &str =
    "Create a unique monster with exactly HP {hp}. Return only the JSON object.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub description: String,
    pub weapons: Vec<String>,
    pub hp: u32,
}

impl Monster {
    /// Stand-in used when the model's reply cannot be parsed.
    pub fn fallback(hp: u32) -> Self {
        Self {
            name: "Fallback Monster".to_string(),
            description: "A mysterious creature".to_string(),
            weapons: vec!["claws".to_string()],
            hp,
        }
    }

    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

#[derive(Deserialize)]
struct MonsterEnvelope {
    monster: MonsterFields,
}

// `hp` is ignored; the requested value always wins.
#[derive(Deserialize)]
struct MonsterFields {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    weapons: Vec<String>,
}

/// Asks the model for a monster with exactly `hp` hit points.
///
/// Network and authentication failures propagate. A reply that is not the
/// expected JSON yields [`Monster::fallback`].
pub async fn create_monster(backend: &dyn CompletionBackend, hp: u32) -> Result<Monster> {
    let user_prompt = MONSTER_USER_PROMPT.replace("{hp}", &hp.to_string());
    let reply = backend.complete(MONSTER_SYSTEM_PROMPT, &user_prompt).await?;

    match parse_monster(&reply, hp) {
        Some(monster) => {
            tracing::info!(name = %monster.name, hp, "monster created");
            Ok(monster)
        }
        None => {
            tracing::warn!(raw = %reply, "monster reply was not valid JSON; using fallback");
            Ok(Monster::fallback(hp))
        }
    }
}

/// Parses a monster reply, tolerating markdown code fences and stray text
/// around the JSON object.
pub fn parse_monster(reply: &str, hp: u32) -> Option<Monster> {
    let cleaned = strip_code_fences(reply);
    let envelope = serde_json::from_str::<MonsterEnvelope>(cleaned)
        .ok()
        .or_else(|| {
            let start = cleaned.find('{')?;
            let end = cleaned.rfind('}')?;
            if end < start {
                return None;
            }
            serde_json::from_str::<MonsterEnvelope>(&cleaned[start..=end]).ok()
        })?;

    let fields = envelope.monster;
    if fields.name.trim().is_empty() {
        return None;
    }
    Some(Monster {
        name: fields.name,
        description: fields.description,
        weapons: fields.weapons,
        hp,
    })
}

fn strip_code_fences(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArenaError;
    use crate::testing::ScriptedBackend;

    const NEON_WYRM: &str = r#"{"monster": {"name": "Neon Wyrm", "description": "A serpent of living light", "weapons": ["Laser Fangs", "Static Coil"], "hp": 99}}"#;

    #[test]
    fn test_parse_plain_json_forces_hp() {
        let monster = parse_monster(NEON_WYRM, 23).unwrap();
        assert_eq!(monster.name, "Neon Wyrm");
        assert_eq!(monster.weapons, vec!["Laser Fangs", "Static Coil"]);
        assert_eq!(monster.hp, 23);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", NEON_WYRM);
        assert_eq!(parse_monster(&fenced, 7).unwrap().name, "Neon Wyrm");

        let bare_fence = format!("  ```\n{}\n```  ", NEON_WYRM);
        assert_eq!(parse_monster(&bare_fence, 7).unwrap().name, "Neon Wyrm");
    }

    #[test]
    fn test_parse_json_with_chatter() {
        let chatty = format!("Here is your monster:\n{}\nEnjoy!", NEON_WYRM);
        assert_eq!(parse_monster(&chatty, 12).unwrap().hp, 12);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_monster("a monster appears!", 10).is_none());
        assert!(parse_monster(r#"{"name": "No envelope"}"#, 10).is_none());
        assert!(parse_monster(r#"{"monster": {"name": "  "}}"#, 10).is_none());
    }

    #[tokio::test]
    async fn test_create_monster_sends_hp_in_prompt() {
        let backend = ScriptedBackend::new([NEON_WYRM]);
        let monster = create_monster(&backend, 42).await.unwrap();

        assert_eq!(monster.hp, 42);
        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains("ONLY valid JSON"));
        assert_eq!(
            prompts[0].1,
            "Create a unique monster with exactly HP 42. Return only the JSON object."
        );
    }

    #[tokio::test]
    async fn test_create_monster_falls_back_on_bad_json() {
        let backend = ScriptedBackend::new(["{\"monster\": {\"name\": \"Broken\","]);
        let monster = create_monster(&backend, 17).await.unwrap();
        assert_eq!(monster, Monster::fallback(17));
    }

    #[tokio::test]
    async fn test_create_monster_propagates_auth_errors() {
        let backend = ScriptedBackend::default();
        backend.push_error(ArenaError::Authentication("no key".into()));
        let err = create_monster(&backend, 5).await.unwrap_err();
        assert!(err.is_authentication());
    }
}
