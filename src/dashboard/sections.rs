use super::Section;
use color_eyre::Result;
use comfy_table::{
    presets,
    Attribute,
    Cell,
    CellAlignment,
    Color,
    ContentArrangement,
    Table,
};
use connect_dashboard_admin::SystemInfo;
use connect_dashboard_metrics::{
    CurrentlyRunning,
    DimensionedCount,
    Matrix,
    WindowedCount,
};
use serde_json::json;
use std::collections::BTreeMap;

fn table(title: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new(title).add_attribute(Attribute::Bold).fg(Color::Cyan)]);
    table
}

fn label(text: impl ToString) -> Cell {
    Cell::new(text.to_string()).add_attribute(Attribute::Bold)
}

fn count(value: u64) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn no_data(table: &mut Table) {
    table.add_row(vec![Cell::new("No data").fg(Color::DarkGrey)]);
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// DAU, WAU, MAU and YAU. Windows the server did not report show as 0.
pub struct ActiveUsers {
    users: WindowedCount,
}

impl ActiveUsers {
    pub fn new(users: WindowedCount) -> Self {
        Self { users }
    }
}

impl Section for ActiveUsers {
    fn name(&self) -> &'static str {
        "active_users"
    }

    fn format(&self) -> String {
        let mut table = table("👥 ACTIVE USERS");
        for (window, value) in self.users.iter() {
            table.add_row(vec![label(window.caption()), count(value.unwrap_or_default())]);
        }
        format!("{table}\n")
    }

    fn summary(&self) -> serde_json::Value {
        json!(self.users)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// A total followed by one row per dimension value.
pub struct CountsSection {
    name: &'static str,
    title: &'static str,
    total_label: &'static str,
    counts: DimensionedCount,
}

impl CountsSection {
    pub fn new(
        name: &'static str,
        title: &'static str,
        total_label: &'static str,
        counts: DimensionedCount,
    ) -> Self {
        Self {
            name,
            title,
            total_label,
            counts,
        }
    }
}

impl Section for CountsSection {
    fn name(&self) -> &'static str {
        self.name
    }

    fn format(&self) -> String {
        let mut table = table(self.title);
        table.add_row(vec![label(self.total_label), count(self.counts.total).fg(Color::Green)]);
        for (dimension, value) in &self.counts.by_dimension {
            table.add_row(vec![Cell::new(dimension), count(*value)]);
        }
        format!("{table}\n")
    }

    fn summary(&self) -> serde_json::Value {
        json!(self.counts)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// OAuth integrations, auth types by templates. Empty cells show as `.`.
pub struct IntegrationMatrix {
    matrix: Matrix,
}

impl IntegrationMatrix {
    pub fn new(matrix: Matrix) -> Self {
        Self { matrix }
    }
}

impl Section for IntegrationMatrix {
    fn name(&self) -> &'static str {
        "integrations"
    }

    fn format(&self) -> String {
        let mut output = String::from("🔑 OAUTH INTEGRATIONS\n");
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if self.matrix.is_empty() {
            no_data(&mut table);
            output.push_str(&format!("{table}\n"));
            return output;
        }

        let mut header = vec![label("Auth Type")];
        header.extend(self.matrix.cols().map(label));
        table.set_header(header);

        for row in self.matrix.rows() {
            let mut cells = vec![label(row)];
            cells.extend(self.matrix.cols().map(|col| match self.matrix.get(row, col) {
                0 => Cell::new(".").set_alignment(CellAlignment::Right).fg(Color::DarkGrey),
                value => count(value),
            }));
            table.add_row(cells);
        }

        output.push_str(&format!("{table}\n"));
        output
    }

    fn summary(&self) -> serde_json::Value {
        json!(self.matrix)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Integrations per template, summed over auth types.
pub struct IntegrationUsage {
    per_template: BTreeMap<String, u64>,
}

impl IntegrationUsage {
    pub fn new(matrix: &Matrix) -> Self {
        Self {
            per_template: matrix.col_totals(),
        }
    }
}

impl Section for IntegrationUsage {
    fn name(&self) -> &'static str {
        "integration_usage"
    }

    fn format(&self) -> String {
        let mut table = table("📈 OAUTH INTEGRATION USAGE");
        if self.per_template.is_empty() {
            no_data(&mut table);
        }
        for (template, value) in &self.per_template {
            table.add_row(vec![label(template), count(*value)]);
        }
        format!("{table}\n")
    }

    fn summary(&self) -> serde_json::Value {
        json!(self.per_template)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

pub struct CurrentlyRunningSection {
    running: CurrentlyRunning,
    applications: DimensionedCount,
    processes: DimensionedCount,
}

impl CurrentlyRunningSection {
    pub fn new(running: CurrentlyRunning, applications: DimensionedCount, processes: DimensionedCount) -> Self {
        Self {
            running,
            applications,
            processes,
        }
    }
}

impl Section for CurrentlyRunningSection {
    fn name(&self) -> &'static str {
        "currently_running"
    }

    fn format(&self) -> String {
        let mut table = table("🏃 CURRENTLY RUNNING");
        table.add_row(vec![label("Applications"), count(self.running.applications).fg(Color::Green)]);
        for (application_type, value) in &self.applications.by_dimension {
            table.add_row(vec![Cell::new(format!("  {application_type}")), count(*value)]);
        }
        table.add_row(vec![label("Processes"), count(self.running.processes).fg(Color::Green)]);
        for (tag, value) in &self.processes.by_dimension {
            table.add_row(vec![Cell::new(format!("  {tag}")), count(*value)]);
        }
        format!("{table}\n")
    }

    fn summary(&self) -> serde_json::Value {
        json!({
            "applications": self.running.applications,
            "processes": self.running.processes,
            "by_application_type": self.applications.by_dimension,
            "by_process_tag": self.processes.by_dimension,
        })
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Product, license and runtimes, or the reason they could not be loaded.
pub struct SystemInfoSection {
    info: Result<SystemInfo, String>,
}

impl SystemInfoSection {
    pub fn new(info: Result<SystemInfo>) -> Self {
        Self {
            info: info.map_err(|err| err.to_string()),
        }
    }
}

impl Section for SystemInfoSection {
    fn name(&self) -> &'static str {
        "system_info"
    }

    fn format(&self) -> String {
        let mut table = table("🖥️  SYSTEM INFO");
        match &self.info {
            Ok(info) => {
                for (key, value) in info.entries() {
                    table.add_row(vec![label(key), Cell::new(value)]);
                }
            }
            Err(err) => {
                table.add_row(vec![label("Error"), Cell::new(err).fg(Color::Red)]);
            }
        }
        format!("{table}\n")
    }

    fn summary(&self) -> serde_json::Value {
        match &self.info {
            Ok(info) => json!(info),
            Err(err) => json!({ "error": err }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_dashboard_admin::{
        Installations,
        ServerSettings,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_windows_render_as_zero() {
        let mut users = WindowedCount::default();
        users.set(connect_dashboard_metrics::Window::Day, 120);
        let text = ActiveUsers::new(users).format();
        assert!(text.contains("120"));
        assert!(text.contains("MAU (30d)"));
        assert!(text.contains('0'));
    }

    #[test]
    fn matrix_marks_empty_cells() {
        let mut matrix = Matrix::default();
        matrix.record("viewer", "connect", 10);
        matrix.record("service_account", "snowflake", 2);

        let text = IntegrationMatrix::new(matrix.clone()).format();
        assert!(text.contains("Auth Type"));
        assert!(text.contains('.'));
        assert_eq!(
            IntegrationUsage::new(&matrix).summary(),
            json!({"connect": 10, "snowflake": 2})
        );
    }

    #[test]
    fn empty_matrix_shows_no_data() {
        assert!(IntegrationMatrix::new(Matrix::default()).format().contains("No data"));
    }

    #[test]
    fn system_info_rows_keep_their_order() {
        let info = SystemInfo::from_parts(&ServerSettings::default(), &BTreeMap::<_, Installations>::new());
        let text = SystemInfoSection::new(Ok(info)).format();

        let product = text.find("Product").unwrap();
        let tensorflow = text.find("TensorFlow Versions").unwrap();
        assert!(product < tensorflow);
        assert!(text.contains("Posit Connect"));
    }
}
