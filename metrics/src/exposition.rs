//! # Exposition Module
//!
//! Parser for the single-line text exposition format served by the metrics endpoint.
//!
//! ```text
//! # HELP content_count Number of content items.
//! # TYPE content_count gauge
//! content_count 500
//! content_count{content_type="unknown"} 50
//! ```
//!
//! Samples are grouped into the family opened by the closest `# TYPE`/`# HELP` line when their name
//! matches it (including the suffixes the declared type allows), otherwise they open an untyped family
//! of their own. `HELP` and `TYPE` metadata is kept but never used for aggregation.

use crate::snapshot::{
    Labels,
    MetricFamily,
    MetricKind,
    MetricsSnapshot,
    Sample,
};
use eyre::{
    eyre,
    Result,
};
use nom::{
    branch::alt,
    bytes::complete::{
        escaped_transform,
        is_not,
        take_till1,
        take_while1,
    },
    character::complete::{
        char,
        space0,
        space1,
    },
    combinator::{
        all_consuming,
        map_res,
        opt,
        value,
    },
    multi::separated_list0,
    sequence::{
        delimited,
        preceded,
        separated_pair,
        terminated,
    },
    IResult,
    Parser,
};
use std::str::FromStr;

/// Parse a whole exposition payload. A single malformed line rejects the payload.
pub fn parse(text: &str) -> Result<MetricsSnapshot> {
    let mut families: Vec<MetricFamily> = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            apply_directive(&mut families, comment.trim_start());
            continue;
        }

        let (name, sample) = match all_consuming(terminated(sample_line, space0)).parse(line) {
            Ok((_, parsed)) => parsed,
            Err(err) => return Err(eyre!("line {}: malformed sample {line:?}: {err}", index + 1)),
        };

        match families.last_mut() {
            Some(current) if current.owns_sample(name) => current.push(sample),
            _ => {
                let mut family = MetricFamily::new(name, MetricKind::Untyped);
                family.push(sample);
                families.push(family);
            }
        }
    }

    Ok(families.into_iter().collect())
}

/// Handle `# TYPE` and `# HELP` lines, every other comment is ignored.
///
/// Not done using nom, splitting on whitespace is all the structure these lines have.
fn apply_directive(families: &mut Vec<MetricFamily>, comment: &str) {
    let mut parts = comment.splitn(3, char::is_whitespace);
    let (Some(keyword), Some(name)) = (parts.next(), parts.next()) else {
        return;
    };
    let rest = parts.next().unwrap_or_default().trim();

    match keyword {
        "TYPE" => {
            let kind = MetricKind::from_str(rest).unwrap_or_else(|_| {
                debug!(name, kind = rest, "unrecognized metric type, treating as untyped");
                MetricKind::Untyped
            });
            let family_name = match kind {
                MetricKind::Counter => name.strip_suffix("_total").unwrap_or(name),
                _ => name,
            };

            // A preceding HELP line for the same family has already opened it.
            if let Some(current) = families.last_mut() {
                if current.samples().is_empty() && (current.name() == family_name || current.name() == name) {
                    let mut family = MetricFamily::new(family_name, kind);
                    if let Some(help) = current.help() {
                        family.set_help(help);
                    }
                    *current = family;
                    return;
                }
            }
            families.push(MetricFamily::new(family_name, kind));
        }
        "HELP" => match families.last_mut() {
            Some(current) if current.samples().is_empty() && current.owns_sample(name) => current.set_help(rest),
            _ => {
                let mut family = MetricFamily::new(name, MetricKind::Untyped);
                family.set_help(rest);
                families.push(family);
            }
        },
        _ => {}
    }
}

fn sample_line(input: &str) -> IResult<&str, (&str, Sample)> {
    let (input, (name, labels, _, value, _timestamp)) = (
        metric_name,
        opt(label_set),
        space0,
        map_res(take_till1(char::is_whitespace), |token: &str| token.parse::<f64>()),
        opt(preceded(space1, take_till1(char::is_whitespace))),
    )
        .parse(input)?;

    Ok((input, (name, Sample::new(labels.unwrap_or_default(), value))))
}

fn metric_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == ':').parse(input)
}

fn label_set(input: &str) -> IResult<&str, Labels> {
    let (input, pairs) = delimited(
        char('{'),
        terminated(separated_list0(char(','), label), opt(char(','))),
        preceded(space0, char('}')),
    )
    .parse(input)?;

    Ok((input, pairs.into_iter().collect()))
}

fn label(input: &str) -> IResult<&str, (&str, String)> {
    separated_pair(
        delimited(space0, metric_name, space0),
        char('='),
        delimited(space0, label_value, space0),
    )
    .parse(input)
}

/// A double quoted label value with `\\`, `\"` and `\n` escapes.
fn label_value(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        opt(escaped_transform(
            is_not("\\\""),
            '\\',
            alt((value("\\", char('\\')), value("\"", char('"')), value("\n", char('n')))),
        )),
        char('"'),
    )
    .map(Option::unwrap_or_default)
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs.iter().copied().collect()
    }

    #[test]
    fn parses_typed_families_with_labels() {
        let text = r#"
# HELP users_active Number of active users.
# TYPE users_active gauge
users_active{window="24h"} 120
users_active{window="7d"} 800.0
# TYPE content_count gauge
content_count 500
content_count{content_type="unknown"} 50
"#;
        let snapshot = parse(text).unwrap();

        let users = snapshot.family("users_active").unwrap();
        assert_eq!(users.kind(), MetricKind::Gauge);
        assert_eq!(users.help(), Some("Number of active users."));
        assert_eq!(
            users.samples(),
            &[
                Sample::new(labels(&[("window", "24h")]), 120.0),
                Sample::new(labels(&[("window", "7d")]), 800.0),
            ]
        );

        let content = snapshot.samples("content_count");
        assert_eq!(content.len(), 2);
        assert!(content[0].labels().is_empty());
        assert_eq!(content[1].labels().get("content_type"), Some("unknown"));
    }

    #[test]
    fn untyped_samples_open_their_own_family() {
        let snapshot = parse("foo 1\nfoo{a=\"b\"} 2\nbar 3\n").unwrap();
        assert_eq!(snapshot.samples("foo").len(), 2);
        assert_eq!(snapshot.samples("bar").len(), 1);
        assert_eq!(snapshot.family("bar").unwrap().kind(), MetricKind::Untyped);
    }

    #[test]
    fn counter_samples_are_grouped_under_the_family_name() {
        let text = "# TYPE http_requests_total counter\nhttp_requests_total{code=\"200\"} 7\nhttp_requests_created 1.7e9\n";
        let snapshot = parse(text).unwrap();
        let family = snapshot.family("http_requests").unwrap();
        assert_eq!(family.kind(), MetricKind::Counter);
        assert_eq!(family.samples().len(), 2);
        assert!(snapshot.family("http_requests_total").is_none());
    }

    #[test]
    fn histogram_suffixes_stay_in_family() {
        let text = "\
# TYPE latency histogram
latency_bucket{le=\"0.5\"} 3
latency_bucket{le=\"+Inf\"} 4
latency_sum 1.5
latency_count 4
";
        let snapshot = parse(text).unwrap();
        assert_eq!(snapshot.samples("latency").len(), 4);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn label_values_support_escapes_and_trailing_comma() {
        let snapshot = parse(r#"m{path="C:\\dir",quote="say \"hi\"",multi="a\nb",} 1"#).unwrap();
        let sample = &snapshot.samples("m")[0];
        assert_eq!(sample.labels().get("path"), Some(r"C:\dir"));
        assert_eq!(sample.labels().get("quote"), Some(r#"say "hi""#));
        assert_eq!(sample.labels().get("multi"), Some("a\nb"));
    }

    #[test]
    fn accepts_empty_label_sets_special_values_and_timestamps() {
        let snapshot = parse("a{} 1 1700000000000\nb NaN\nc +Inf\nd -Inf\ne{x=\"\"} 2\n").unwrap();
        assert_eq!(snapshot.samples("a")[0].value(), 1.0);
        assert!(snapshot.samples("b")[0].value().is_nan());
        assert_eq!(snapshot.samples("c")[0].value(), f64::INFINITY);
        assert_eq!(snapshot.samples("d")[0].value(), f64::NEG_INFINITY);
        assert_eq!(snapshot.samples("e")[0].labels().get("x"), Some(""));
    }

    #[test]
    fn non_contiguous_families_are_merged() {
        let snapshot = parse("a 1\nb 2\na 3\n").unwrap();
        let values: Vec<f64> = snapshot.samples("a").iter().map(Sample::value).collect();
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let snapshot = parse("# just a comment\n\n# EOF\n").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn malformed_lines_reject_the_payload() {
        assert!(parse("a{b=\"c\" 1").is_err());
        assert!(parse("a not_a_number").is_err());
        assert!(parse("a 1 2 3").is_err());
        assert!(parse("{a=\"b\"} 1").is_err());
        assert!(parse(r#"m{a="tab\there"} 1"#).is_err());
        assert!(parse(r#"m{a="unterminated} 1"#).is_err());

        let err = parse("ok 1\nbroken{ 2\n").unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{err}");
    }
}
