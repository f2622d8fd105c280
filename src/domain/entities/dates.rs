use chrono::{DateTime, Datelike, Months, NaiveDate};

/// Parses the date shapes the admin forms send: `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM`
/// (first of the month) and RFC 3339 timestamps (date part kept).
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// `Jan 2024` style label used by the timeline endpoints.
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Calendar difference between two dates in whole years, months and remaining days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Span {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        let mut total_months =
            (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
        if start.day() > end.day() {
            total_months -= 1;
        }
        let total_months = total_months.max(0) as u32;

        let anchor = start
            .checked_add_months(Months::new(total_months))
            .unwrap_or(start);
        let days = (end - anchor).num_days().max(0) as u32;

        Self {
            years: total_months / 12,
            months: total_months % 12,
            days,
        }
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Human duration: `N year(s)[ M month(s)]`, else `M month(s)`, else `D day(s)`.
pub fn human_duration(start: NaiveDate, end: NaiveDate) -> String {
    let span = Span::between(start, end);

    if span.years > 0 {
        let mut out = plural(span.years, "year");
        if span.months > 0 {
            out.push(' ');
            out.push_str(&plural(span.months, "month"));
        }
        out
    } else if span.months > 0 {
        plural(span.months, "month")
    } else {
        plural(span.days, "day")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_flexible_date("2023-04-15"), Some(d(2023, 4, 15)));
        assert_eq!(parse_flexible_date("2023/04/15"), Some(d(2023, 4, 15)));
        assert_eq!(parse_flexible_date("2023-04"), Some(d(2023, 4, 1)));
        assert_eq!(parse_flexible_date("2023-04-15T10:00:00Z"), Some(d(2023, 4, 15)));
        assert_eq!(parse_flexible_date(" 2023-04-15 "), Some(d(2023, 4, 15)));
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("yesterday"), None);
        assert_eq!(parse_flexible_date("2023-13-01"), None);
    }

    #[test]
    fn month_year_label() {
        assert_eq!(format_month_year(d(2021, 9, 30)), "Sep 2021");
    }

    #[test]
    fn durations_pick_the_largest_unit() {
        assert_eq!(human_duration(d(2020, 1, 1), d(2022, 4, 1)), "2 years 3 months");
        assert_eq!(human_duration(d(2020, 1, 1), d(2021, 1, 15)), "1 year");
        assert_eq!(human_duration(d(2020, 1, 1), d(2021, 2, 1)), "1 year 1 month");
        assert_eq!(human_duration(d(2023, 1, 10), d(2023, 6, 9)), "4 months");
        assert_eq!(human_duration(d(2023, 3, 1), d(2023, 3, 20)), "19 days");
        assert_eq!(human_duration(d(2023, 3, 1), d(2023, 3, 2)), "1 day");
    }

    #[test]
    fn same_day_span_is_zero_days() {
        assert_eq!(human_duration(d(2023, 3, 1), d(2023, 3, 1)), "0 days");
    }

    #[test]
    fn span_clamps_to_short_months() {
        let span = Span::between(d(2023, 1, 31), d(2023, 3, 1));
        assert_eq!(span, Span { years: 0, months: 1, days: 1 });
    }
}
