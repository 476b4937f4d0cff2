use super::USERS_ACTIVE;
use crate::{
    aggregates::{
        Window,
        WindowedCount,
    },
    snapshot::MetricsSnapshot,
};
use std::str::FromStr;

const WINDOW: &str = "window";

/// Active users per window. Windows that were not reported stay absent.
///
/// The source is not expected to emit the same window twice; if it does, the sample iterated last wins.
pub fn user_activity(snapshot: &MetricsSnapshot) -> WindowedCount {
    let mut result = WindowedCount::default();

    for sample in snapshot.samples(USERS_ACTIVE) {
        let window = sample.labels().get(WINDOW).and_then(|value| Window::from_str(value).ok());
        if let Some(window) = window {
            result.set(window, sample.count());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposition::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn reported_windows_are_set_and_others_absent() {
        let snapshot = parse("users_active{window=\"24h\"} 120\nusers_active{window=\"7d\"} 800\n").unwrap();
        assert_eq!(
            user_activity(&snapshot),
            WindowedCount {
                day: Some(120),
                week: Some(800),
                month: None,
                year: None,
            }
        );
    }

    #[test]
    fn zero_is_distinct_from_absent() {
        let snapshot = parse("users_active{window=\"30d\"} 0\n").unwrap();
        let activity = user_activity(&snapshot);
        assert_eq!(activity.get(Window::Month), Some(0));
        assert_eq!(activity.get(Window::Year), None);
    }

    #[test]
    fn unknown_windows_and_unlabeled_samples_are_ignored() {
        let snapshot = parse("users_active 5\nusers_active{window=\"90d\"} 9\nusers_active{window=\"1y\"} 3.0\n").unwrap();
        assert_eq!(
            user_activity(&snapshot),
            WindowedCount {
                year: Some(3),
                ..Default::default()
            }
        );
    }

    #[test]
    fn duplicate_window_keeps_last_sample() {
        let snapshot = parse("users_active{window=\"24h\"} 1\nusers_active{window=\"24h\"} 2\n").unwrap();
        assert_eq!(user_activity(&snapshot).day, Some(2));
    }

    #[test]
    fn empty_snapshot_reports_nothing() {
        assert_eq!(user_activity(&MetricsSnapshot::empty()), WindowedCount::default());
    }
}
