//! Typed subset of the Connect server settings responses.

use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumIter,
};

/// Response of `GET server_settings`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default, rename = "Launcher")]
    pub launcher: Option<Launcher>,
}

impl ServerSettings {
    pub fn runs_on_kubernetes(&self) -> bool {
        self.launcher
            .as_ref()
            .and_then(|launcher| launcher.kubernetes)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct License {
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default, rename = "anonymous-servers")]
    pub anonymous_servers: Option<bool>,
    #[serde(default, rename = "unrestricted-servers")]
    pub unrestricted_servers: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Launcher {
    #[serde(default, rename = "Kubernetes")]
    pub kubernetes: Option<bool>,
}

/// Response of `GET v1/server_settings/<runtime>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Installations {
    #[serde(default)]
    pub installations: Vec<Installation>,
}

impl Installations {
    /// Comma separated versions, `None` when nothing is installed.
    pub fn versions_label(&self) -> String {
        if self.installations.is_empty() {
            return "None".to_string();
        }
        self.installations
            .iter()
            .map(|installation| installation.version.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Installation {
    #[serde(default)]
    pub version: String,
}

/// Runtimes whose installations are listed, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize)]
pub enum Runtime {
    R,
    Python,
    Quarto,
    TensorFlow,
}

impl Runtime {
    pub fn settings_path(&self) -> &'static str {
        match self {
            Runtime::R => "v1/server_settings/r",
            Runtime::Python => "v1/server_settings/python",
            Runtime::Quarto => "v1/server_settings/quarto",
            Runtime::TensorFlow => "v1/server_settings/tensorflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_server_settings() {
        let settings: ServerSettings = serde_json::from_value(serde_json::json!({
            "version": "2024.08.0",
            "build": "v2024.08.0-12-gabc",
            "license": {"tier": "enhanced", "anonymous-servers": true, "unrestricted-servers": null},
            "Launcher": {"Kubernetes": true},
            "hostname": "connect"
        }))
        .unwrap();

        assert_eq!(settings.version.as_deref(), Some("2024.08.0"));
        assert!(settings.runs_on_kubernetes());
        let license = settings.license.unwrap();
        assert_eq!(license.anonymous_servers, Some(true));
        assert_eq!(license.unrestricted_servers, None);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let settings: ServerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ServerSettings::default());
        assert!(!settings.runs_on_kubernetes());
    }

    #[test]
    fn versions_are_joined_in_order() {
        let installations: Installations = serde_json::from_value(serde_json::json!({
            "installations": [{"version": "3.12.4", "path": "/opt/python"}, {"version": "3.11.9"}]
        }))
        .unwrap();
        assert_eq!(installations.versions_label(), "3.12.4, 3.11.9");
        assert_eq!(Installations::default().versions_label(), "None");
    }
}
