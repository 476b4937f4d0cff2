//! Server, license and runtime summary built from the administrative API.
//!
//! Unlike metrics, this data is never defaulted: any failed call fails the whole record.

use crate::{
    client::AdminClient,
    error::AdminError,
    settings::{
        Installations,
        Runtime,
        ServerSettings,
    },
};
use serde::Serialize;
use std::collections::BTreeMap;
use strum::{
    Display,
    IntoEnumIterator,
};

pub const PRODUCT: &str = "Posit Connect";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ExecutionType {
    Kubernetes,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum LicenseEntitlement {
    Unrestricted,
    #[strum(serialize = "Public Access")]
    #[serde(rename = "Public Access")]
    PublicAccess,
    #[strum(serialize = "None")]
    #[serde(rename = "None")]
    NotEntitled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub product: String,
    pub version: String,
    pub build: String,
    pub execution_type: ExecutionType,
    pub license_tier: String,
    pub license_entitlement: LicenseEntitlement,
    /// Versions label per runtime, `None` when nothing is installed.
    pub runtime_versions: BTreeMap<Runtime, String>,
}

impl SystemInfo {
    pub fn from_parts(settings: &ServerSettings, installations: &BTreeMap<Runtime, Installations>) -> Self {
        let license = settings.license.clone().unwrap_or_default();

        let license_entitlement = if license.unrestricted_servers.unwrap_or(false) {
            LicenseEntitlement::Unrestricted
        } else if license.anonymous_servers.unwrap_or(false) {
            LicenseEntitlement::PublicAccess
        } else {
            LicenseEntitlement::NotEntitled
        };

        let execution_type = if settings.runs_on_kubernetes() {
            ExecutionType::Kubernetes
        } else {
            ExecutionType::Local
        };

        let runtime_versions = Runtime::iter()
            .map(|runtime| {
                let label = installations
                    .get(&runtime)
                    .map(Installations::versions_label)
                    .unwrap_or_else(|| "None".to_string());
                (runtime, label)
            })
            .collect();

        Self {
            product: PRODUCT.to_string(),
            version: settings.version.clone().unwrap_or_else(|| "Unknown".to_string()),
            build: settings.build.clone().unwrap_or_else(|| "Unknown".to_string()),
            execution_type,
            license_tier: license.tier.unwrap_or_else(|| "N/A".to_string()),
            license_entitlement,
            runtime_versions,
        }
    }

    /// Display rows in their fixed order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            ("Product".to_string(), self.product.clone()),
            ("Version".to_string(), self.version.clone()),
            ("Build".to_string(), self.build.clone()),
            ("Execution Type".to_string(), self.execution_type.to_string()),
            ("License Tier".to_string(), self.license_tier.clone()),
            ("License Entitlement".to_string(), self.license_entitlement.to_string()),
        ];
        entries.extend(
            self.runtime_versions
                .iter()
                .map(|(runtime, versions)| (format!("{runtime} Versions"), versions.clone())),
        );
        entries
    }
}

/// Query the settings and every runtime's installations, one call after another.
#[instrument(level = "debug", skip(client), fields(api = %client.base_url()))]
pub async fn system_info(client: &AdminClient) -> Result<SystemInfo, AdminError> {
    let settings = client.server_settings().await?;

    let mut installations = BTreeMap::new();
    for runtime in Runtime::iter() {
        installations.insert(runtime, client.installations(runtime).await?);
    }

    Ok(SystemInfo::from_parts(&settings, &installations))
}
