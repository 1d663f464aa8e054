use super::runner::{GameRegistration, RateSetter};
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UPDATE_RATE: u32 = 40;
pub const DEFAULT_PUSH_RATE: u32 = 25;

/// Initial cadences of a game, in invocations per second.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub update_rate: u32,
    pub push_rate: u32,
}

impl GameSettings {
    /// missing fields fall back to the defaults
    pub fn from_json(json: &str) -> Result<GameSettings> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            update_rate: DEFAULT_UPDATE_RATE,
            push_rate: DEFAULT_PUSH_RATE,
        }
    }
}

/// Live view of a game's cadences. Setting a rate retunes the shared timer
/// directly; 0 pauses the slot.
#[derive(Clone, Debug)]
pub struct GameConfiguration {
    update: RateSetter,
    push: RateSetter,
}

impl GameConfiguration {
    pub(crate) fn new(registration: GameRegistration, settings: GameSettings) -> GameConfiguration {
        let configuration = GameConfiguration {
            update: registration.update_rate,
            push: registration.push_rate,
        };
        configuration.set_update_rate(settings.update_rate);
        configuration.set_push_rate(settings.push_rate);
        configuration
    }

    pub fn update_rate(&self) -> u32 {
        self.update.get()
    }

    pub fn set_update_rate(&self, rate: u32) {
        self.update.set(rate);
    }

    pub fn push_rate(&self) -> u32 {
        self.push.get()
    }

    pub fn set_push_rate(&self, rate: u32) {
        self.push.set(rate);
    }

    pub fn settings(&self) -> GameSettings {
        GameSettings {
            update_rate: self.update_rate(),
            push_rate: self.push_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn settings_defaults() {
        assert_eq!(
            GameSettings::default(),
            GameSettings {
                update_rate: 40,
                push_rate: 25
            }
        );
        assert_eq!(GameSettings::from_json("{}").unwrap(), GameSettings::default());
        let partial = GameSettings::from_json(r#"{"push_rate": 10}"#).unwrap();
        assert_eq!(partial.update_rate, DEFAULT_UPDATE_RATE);
        assert_eq!(partial.push_rate, 10);
    }

    #[test]
    fn malformed_settings() {
        assert!(matches!(
            GameSettings::from_json(r#"{"update_rate": "fast"}"#),
            Err(SimError::Settings(_))
        ));
    }

    #[test]
    fn settings_serialize() {
        let settings = GameSettings {
            update_rate: 60,
            push_rate: 30,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"update_rate":60,"push_rate":30}"#);
    }
}
