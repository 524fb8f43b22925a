use chrono::{Days, Local, NaiveDate};

/// Inclusive `startDate`/`endDate` range sent to the news API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Days covered before `today`; the API window spans three calendar days.
    pub const LOOKBACK_DAYS: u64 = 2;

    /// Window ending on `today` and starting [`Self::LOOKBACK_DAYS`] earlier.
    #[must_use]
    pub fn recent(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(Self::LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// [`Self::recent`] for the local calendar date.
    #[must_use]
    pub fn today() -> Self {
        Self::recent(Local::now().date_naive())
    }

    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.format("%Y%m%d").to_string()
    }

    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn recent_spans_three_days() {
        let window = DateWindow::recent(date(2025, 5, 3));
        assert_eq!(window.start_param(), "20250501");
        assert_eq!(window.end_param(), "20250503");
    }

    #[test]
    fn recent_crosses_month_and_year_boundaries() {
        let window = DateWindow::recent(date(2025, 1, 1));
        assert_eq!(window.start_param(), "20241230");
        assert_eq!(window.end_param(), "20250101");
    }
}
