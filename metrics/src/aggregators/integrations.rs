use super::INTEGRATIONS_COUNT;
use crate::{
    aggregates::Matrix,
    partition::{
        Partition,
        Rule,
    },
    snapshot::MetricsSnapshot,
};

pub const INTEGRATION_TEMPLATE: &str = "integration_template";
pub const INTEGRATION_AUTH_TYPE: &str = "integration_auth_type";

fn partition() -> Partition<()> {
    Partition::new(
        &[INTEGRATION_TEMPLATE, INTEGRATION_AUTH_TYPE],
        vec![Rule::new((), &[INTEGRATION_TEMPLATE, INTEGRATION_AUTH_TYPE])],
    )
}

/// OAuth integrations by auth type (rows) and template (columns).
///
/// Samples missing either label are dropped.
pub fn integration_matrix(snapshot: &MetricsSnapshot) -> Matrix {
    let partition = partition();
    let mut matrix = Matrix::default();

    for sample in snapshot.samples(INTEGRATIONS_COUNT) {
        let labels = sample.labels();
        if partition.route(labels).is_none() {
            continue;
        }
        if let (Some(auth_type), Some(template)) = (labels.get(INTEGRATION_AUTH_TYPE), labels.get(INTEGRATION_TEMPLATE)) {
            matrix.record(auth_type, template, sample.count());
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposition::parse;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn single_integration() {
        let snapshot =
            parse("integrations_count{integration_template=\"connect\",integration_auth_type=\"viewer\"} 10\n").unwrap();
        let matrix = integration_matrix(&snapshot);

        assert_eq!(matrix.rows().collect::<Vec<_>>(), vec!["viewer"]);
        assert_eq!(matrix.cols().collect::<Vec<_>>(), vec!["connect"]);
        assert_eq!(matrix.get("viewer", "connect"), 10);
        assert_eq!(matrix.get("viewer", "snowflake"), 0);
        assert_eq!(matrix.get("service_account", "connect"), 0);
    }

    #[test]
    fn incomplete_samples_are_dropped_and_keys_sorted() {
        let snapshot = parse(
            r#"
integrations_count 12
integrations_count{integration_template="snowflake"} 3
integrations_count{integration_template="snowflake",integration_auth_type="viewer"} 2
integrations_count{integration_template="databricks",integration_auth_type="service_account"} 4
integrations_count{integration_template="connect",integration_auth_type="viewer"} 6
"#,
        )
        .unwrap();
        let matrix = integration_matrix(&snapshot);

        assert_eq!(matrix.rows().collect::<Vec<_>>(), vec!["service_account", "viewer"]);
        assert_eq!(matrix.cols().collect::<Vec<_>>(), vec!["connect", "databricks", "snowflake"]);
        assert_eq!(matrix.row_total("viewer"), 8);
        assert_eq!(matrix.col_total("snowflake"), 2);
    }

    #[test]
    fn repeated_cell_keeps_the_last_sample() {
        let snapshot = parse(
            r#"
integrations_count{integration_template="connect",integration_auth_type="viewer"} 10
integrations_count{integration_template="connect",integration_auth_type="viewer"} 4
"#,
        )
        .unwrap();
        let matrix = integration_matrix(&snapshot);

        assert_eq!(matrix.get("viewer", "connect"), 4);
        assert_eq!(matrix.row_total("viewer"), 4);
    }

    #[test]
    fn missing_family_gives_empty_matrix() {
        assert!(integration_matrix(&MetricsSnapshot::empty()).is_empty());
    }

    proptest! {
        #[test]
        fn cells_match_input_and_missing_cells_are_zero(
            cells in prop::collection::btree_map(("[a-c]", "[x-z]"), 0u32..1000, 0..6)
        ) {
            let payload: String = cells
                .iter()
                .map(|((auth, template), count)| {
                    format!("integrations_count{{integration_template=\"{template}\",integration_auth_type=\"{auth}\"}} {count}\n")
                })
                .collect();
            let matrix = integration_matrix(&parse(&payload).unwrap());

            for auth in ["a", "b", "c"] {
                for template in ["x", "y", "z"] {
                    let expected = cells
                        .get(&(auth.to_string(), template.to_string()))
                        .map_or(0, |count| u64::from(*count));
                    prop_assert_eq!(matrix.get(auth, template), expected);
                }
            }
        }
    }
}
