use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::DailyLabelCount;

/// Count timestamps per UTC calendar day, oldest day first.
pub fn daily_counts(times: &[DateTime<Utc>]) -> Vec<DailyLabelCount> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for ts in times {
        *days.entry(ts.date_naive()).or_default() += 1;
    }
    days.into_iter()
        .map(|(date, count)| DailyLabelCount {
            date: date.format("%Y-%m-%d").to_string(),
            count_of_label: count,
        })
        .collect()
}

/// Drop days with fewer than `min_count` labels.
pub fn keep_busy_days(counts: Vec<DailyLabelCount>, min_count: u64) -> Vec<DailyLabelCount> {
    counts
        .into_iter()
        .filter(|day| day.count_of_label >= min_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_daily_counts_sorted_by_day() {
        let times = vec![
            Utc.with_ymd_and_hms(2024, 2, 2, 23, 59, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap(),
        ];
        let counts = daily_counts(&times);
        assert_eq!(
            counts,
            vec![
                DailyLabelCount {
                    date: "2024-02-01".into(),
                    count_of_label: 1
                },
                DailyLabelCount {
                    date: "2024-02-02".into(),
                    count_of_label: 2
                },
            ]
        );
    }

    #[test]
    fn test_keep_busy_days() {
        let counts = vec![
            DailyLabelCount {
                date: "2024-02-01".into(),
                count_of_label: 1,
            },
            DailyLabelCount {
                date: "2024-02-02".into(),
                count_of_label: 2,
            },
        ];
        let kept = keep_busy_days(counts, 2);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, "2024-02-02");
    }

    #[test]
    fn test_no_times_no_days() {
        assert!(daily_counts(&[]).is_empty());
    }
}
