//! Reading configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct DivinationConfig {
    /// Name the reader introduces themselves with
    #[serde(default = "default_persona_name")]
    pub persona_name: String,

    /// Fixed seed for every draw; only for reproducible test runs
    pub draw_seed: Option<u64>,
}

impl DivinationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.persona_name.trim().is_empty() {
            return Err(ValidationError::BlankPersonaName);
        }
        Ok(())
    }
}

impl Default for DivinationConfig {
    fn default() -> Self {
        Self {
            persona_name: default_persona_name(),
            draw_seed: None,
        }
    }
}

fn default_persona_name() -> String {
    "Luna".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_draw_from_entropy() {
        let config = DivinationConfig::default();
        assert_eq!(config.persona_name, "Luna");
        assert!(config.draw_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_persona_is_rejected() {
        let config = DivinationConfig {
            persona_name: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::BlankPersonaName));
    }
}
