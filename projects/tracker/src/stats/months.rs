use chrono::{Datelike, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// One trailing calendar month. `start` is the first day, `end` the last
/// calendar day (inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
    pub year: i32,
}

/// Walks back from the month containing `today` and returns `months_back`
/// windows, oldest first, ending at the current month. Both aggregators
/// bucket through this function so their month boundaries cannot drift.
pub fn trailing_month_windows(today: NaiveDate, months_back: usize) -> Vec<MonthWindow> {
    let mut windows = Vec::with_capacity(months_back);

    for i in 0..months_back {
        let month_diff = (months_back - 1 - i) as i32;

        let mut year = today.year();
        let mut month = today.month() as i32 - month_diff;
        while month <= 0 {
            month += 12;
            year -= 1;
        }

        let start = first_of_month(year, month as u32);
        let next_month_start = if month == 12 {
            first_of_month(year + 1, 1)
        } else {
            first_of_month(year, month as u32 + 1)
        };
        let end = next_month_start.pred_opt().unwrap_or(start);

        windows.push(MonthWindow {
            start,
            end,
            label: start.format("%b").to_string(),
            year,
        });
    }

    windows
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Unix timestamp of local midnight on `date`. Falls back to UTC when the
/// local offset is undefined at that instant.
pub fn local_midnight_ts(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
        LocalResult::None => midnight.and_utc().timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn twelve_contiguous_windows_ending_at_the_current_month() {
        let windows = trailing_month_windows(date(2024, 3, 15), 12);

        assert_eq!(windows.len(), 12);
        assert_eq!(windows[0].start, date(2023, 4, 1));
        assert_eq!(windows[0].end, date(2023, 4, 30));
        assert_eq!(windows[0].label, "Apr");
        assert_eq!(windows[0].year, 2023);
        assert_eq!(windows[11].start, date(2024, 3, 1));
        assert_eq!(windows[11].end, date(2024, 3, 31));
        assert_eq!(windows[11].label, "Mar");
        assert_eq!(windows[11].year, 2024);

        for pair in windows.windows(2) {
            assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
        }
    }

    #[test]
    fn leap_year_february_ends_on_the_29th() {
        let windows = trailing_month_windows(date(2024, 2, 10), 1);

        assert_eq!(windows[0].end, date(2024, 2, 29));
    }

    #[test]
    fn non_leap_february_ends_on_the_28th() {
        let windows = trailing_month_windows(date(2023, 2, 10), 1);

        assert_eq!(windows[0].end, date(2023, 2, 28));
    }

    #[test]
    fn year_boundary_is_walked_correctly() {
        let windows = trailing_month_windows(date(2024, 1, 5), 12);

        assert_eq!(windows[0].start, date(2023, 2, 1));
        assert_eq!(windows[10].start, date(2023, 12, 1));
        assert_eq!(windows[10].year, 2023);
        assert_eq!(windows[11].start, date(2024, 1, 1));
        assert_eq!(windows[11].year, 2024);
    }
}
