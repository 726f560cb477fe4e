//! Types exchanged with the settings surface.

use formulary_core::{Config, ConfigError, ConfigPatch};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Message delivered over the extension runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentMessage {
    /// New configuration from the settings surface.
    ConfigUpdate { config: ConfigPatch },
    /// Liveness check.
    Ping,
}

impl ContentMessage {
    /// The configuration this message asks for, laid over the defaults and
    /// validated. `None` for messages that carry no configuration.
    pub fn resolve(&self) -> Result<Option<Config>, ConfigError> {
        match self {
            ContentMessage::ConfigUpdate { config } => {
                Config::default().try_merged(config).map(Some)
            }
            ContentMessage::Ping => Ok(None),
        }
    }
}

/// Response sent back for every recognized message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct Ack {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn rejected(error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formulary_core::{DocumentationPosition, EditorTheme};

    fn decode(json: &str) -> ContentMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_config_update() {
        let message = decode(
            r#"{"type":"CONFIG_UPDATE","config":{"editorTheme":"dark","documentationPosition":"left"}}"#,
        );
        let config = message.resolve().unwrap().unwrap();
        assert_eq!(config.editor_theme, EditorTheme::Dark);
        assert_eq!(config.documentation_position, DocumentationPosition::Left);
        assert_eq!(config.modal_width, Config::default().modal_width);
    }

    #[test]
    fn decodes_ping() {
        let message = decode(r#"{"type":"PING"}"#);
        assert_eq!(message, ContentMessage::Ping);
        assert_eq!(message.resolve().unwrap(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let message = decode(r#"{"type":"CONFIG_UPDATE","config":{"legacyFlag":true}}"#);
        assert_eq!(message.resolve().unwrap(), Some(Config::default()));
    }

    #[test]
    fn out_of_range_update_is_rejected() {
        let message = decode(r#"{"type":"CONFIG_UPDATE","config":{"editorFontSize":40}}"#);
        let err = message.resolve().unwrap_err();
        let ack = Ack::rejected(&err);
        assert!(!ack.ok);
        assert!(ack.error.unwrap().contains("editorFontSize"));
    }

    #[test]
    fn unknown_type_does_not_decode() {
        assert!(serde_json::from_str::<ContentMessage>(r#"{"type":"OTHER"}"#).is_err());
    }

    #[test]
    fn ack_omits_empty_error() {
        assert_eq!(serde_json::to_string(&Ack::ok()).unwrap(), r#"{"ok":true}"#);
        assert_eq!(
            serde_json::to_string(&Ack::rejected("bad")).unwrap(),
            r#"{"ok":false,"error":"bad"}"#
        );
    }
}
