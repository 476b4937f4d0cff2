//! # Dashboard Module
//!
//! - **`Section` trait**: one titled table of the dashboard plus its JSON summary
//! - **`sections`**: the sections built from the metrics aggregates and the system information
//! - **`Dashboard`**: fetches everything once and renders the sections in order

mod sections;

pub use sections::{
    ActiveUsers,
    CountsSection,
    CurrentlyRunningSection,
    IntegrationMatrix,
    IntegrationUsage,
    SystemInfoSection,
};

use chrono::{
    DateTime,
    Local,
};
use color_eyre::Result;
use connect_dashboard_admin::{
    system_info,
    AdminClient,
    SystemInfo,
};
use connect_dashboard_config::DashboardConfig;
use connect_dashboard_metrics::{
    fetch_snapshot,
    MetricsReport,
};

/// One part of the dashboard.
pub trait Section {
    /// Key of the section in the JSON summary.
    fn name(&self) -> &'static str;

    /// Render as a terminal table.
    fn format(&self) -> String;

    /// Section data as JSON.
    fn summary(&self) -> serde_json::Value;
}

pub struct Dashboard {
    loaded_at: DateTime<Local>,
    sections: Vec<Box<dyn Section>>,
}

impl Dashboard {
    /// Fetch the metrics and, unless skipped, the system information once.
    ///
    /// Metrics failures are absorbed into an empty report. A system information failure is shown in its section.
    pub async fn load(config: &DashboardConfig, skip_system_info: bool) -> Result<Self> {
        let loaded_at = Local::now();
        let http = reqwest::Client::builder().timeout(config.request_timeout()).build()?;

        info!(url = %config.metrics_url, "fetching metrics");
        let snapshot = fetch_snapshot(&http, &config.metrics_url).await;
        let report = MetricsReport::from_snapshot(&snapshot);

        let system = if skip_system_info {
            None
        } else {
            Some(load_system_info(config).await)
        };

        Ok(Self::from_parts(loaded_at, &report, system))
    }

    pub fn from_parts(loaded_at: DateTime<Local>, report: &MetricsReport, system: Option<Result<SystemInfo>>) -> Self {
        let content = &report.content;
        let mut sections: Vec<Box<dyn Section>> = vec![
            Box::new(ActiveUsers::new(report.user_activity.clone())),
            Box::new(CountsSection::new(
                "content",
                "📦 CONTENT",
                "Total Content",
                content.by_type.clone(),
            )),
            Box::new(CountsSection::new(
                "runtime_versions",
                "🐍 RUNTIME VERSIONS",
                "Total Content",
                content.by_runtime_version.clone(),
            )),
            Box::new(IntegrationMatrix::new(report.integrations.clone())),
            Box::new(CountsSection::new(
                "access_control",
                "🔒 ACCESS CONTROL",
                "Total",
                report.access_control.clone(),
            )),
            Box::new(IntegrationUsage::new(&report.integrations)),
            Box::new(CurrentlyRunningSection::new(
                report.currently_running,
                report.applications.clone(),
                report.processes.clone(),
            )),
            Box::new(CountsSection::new(
                "schedules",
                "⏰ SCHEDULES",
                "Total Schedules",
                report.schedules.clone(),
            )),
        ];

        if let Some(system) = system {
            sections.push(Box::new(SystemInfoSection::new(system)));
        }

        Self { loaded_at, sections }
    }

    pub fn sections(&self) -> impl Iterator<Item = &dyn Section> {
        self.sections.iter().map(|section| section.as_ref() as &dyn Section)
    }
}

impl Section for Dashboard {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn format(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("\n{}\n", "=".repeat(80)));
        report.push_str(&format!("{:^80}\n", "POSIT CONNECT DASHBOARD"));
        report.push_str(&format!("{}\n", "=".repeat(80)));
        report.push_str(&format!(
            "\nLast Updated: {}\n",
            self.loaded_at.format("%Y-%m-%d %H:%M:%S")
        ));

        for section in &self.sections {
            report.push('\n');
            report.push_str(&section.format());
        }

        report
    }

    fn summary(&self) -> serde_json::Value {
        let mut json_data = serde_json::json!({
            "loaded_at": self.loaded_at.to_rfc3339(),
        });
        for section in &self.sections {
            json_data[section.name()] = section.summary();
        }
        json_data
    }
}

async fn load_system_info(config: &DashboardConfig) -> Result<SystemInfo> {
    let client = AdminClient::from_config(config)?;
    let info = system_info(&client).await.inspect_err(|err| {
        warn!("failed to load system information: {err}");
    })?;
    Ok(info)
}
