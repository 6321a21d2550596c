use chrono::{Datelike, Duration, NaiveDate, Utc};

/// Monday–Sunday week window containing `date` (today when omitted).
///
/// This is the single source of week-boundary logic; the settlement engine
/// and the report aggregator both call it so their windows can never drift
/// apart. Bounds are inclusive dates, compared with BETWEEN against the
/// DATE-typed `job_date` column.
pub fn week_bounds(date: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let week_start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let week_end = week_start + Duration::days(6);
    (week_start, week_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_starts_monday_and_ends_sunday() {
        // 2025-01-15 is a Wednesday
        let (start, end) = week_bounds(Some(d(2025, 1, 15)));
        assert_eq!(start, d(2025, 1, 13));
        assert_eq!(end, d(2025, 1, 19));
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(end.weekday(), Weekday::Sun);
    }

    #[test]
    fn every_day_of_a_week_maps_to_the_same_window() {
        let monday = d(2025, 6, 2);
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            assert_eq!(week_bounds(Some(day)), (d(2025, 6, 2), d(2025, 6, 8)));
        }
    }

    #[test]
    fn monday_is_its_own_week_start() {
        let (start, end) = week_bounds(Some(d(2025, 3, 3)));
        assert_eq!(start, d(2025, 3, 3));
        assert_eq!(end, d(2025, 3, 9));
    }

    #[test]
    fn sunday_belongs_to_the_preceding_monday() {
        let (start, end) = week_bounds(Some(d(2025, 3, 9)));
        assert_eq!(start, d(2025, 3, 3));
        assert_eq!(end, d(2025, 3, 9));
    }

    #[test]
    fn window_spans_a_year_boundary() {
        // 2026-01-01 is a Thursday; its week starts in 2025
        let (start, end) = week_bounds(Some(d(2026, 1, 1)));
        assert_eq!(start, d(2025, 12, 29));
        assert_eq!(end, d(2026, 1, 4));
    }

    #[test]
    fn reference_date_is_always_inside_its_window() {
        let mut day = d(2025, 1, 1);
        while day < d(2025, 3, 1) {
            let (start, end) = week_bounds(Some(day));
            assert!(start <= day && day <= end);
            assert_eq!(end - start, Duration::days(6));
            day = day + Duration::days(1);
        }
    }
}
