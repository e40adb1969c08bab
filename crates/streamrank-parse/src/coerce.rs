// Text-to-value coercions. Every function returns `None` instead of an
// error: a bad cell makes the value absent, never the run fail.

use chrono::NaiveDate;

/// Date layouts seen in the ranking's release date column.
///
/// `%B` also accepts the three-letter month abbreviation when parsing.
const DATE_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
];

pub fn parse_rank(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Parse a stream count in billions. Non-finite values count as absent.
pub fn parse_streams(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank(" 12 "), Some(12));
        assert_eq!(parse_rank("—"), None);
        assert_eq!(parse_rank(""), None);
    }

    #[test]
    fn test_parse_streams() {
        assert_eq!(parse_streams("4.912"), Some(4.912));
        assert_eq!(parse_streams(" 3 "), Some(3.0));
        assert_eq!(parse_streams("n/a"), None);
        assert_eq!(parse_streams("1,234"), None);
        assert_eq!(parse_streams("NaN"), None);
        assert_eq!(parse_streams("inf"), None);
    }

    #[test]
    fn test_parse_release_date_layouts() {
        assert_eq!(parse_release_date("29 November 2019"), Some(date(2019, 11, 29)));
        assert_eq!(parse_release_date("6 January 2017"), Some(date(2017, 1, 6)));
        assert_eq!(parse_release_date("November 29, 2019"), Some(date(2019, 11, 29)));
        assert_eq!(parse_release_date("2019-11-29"), Some(date(2019, 11, 29)));
        assert_eq!(parse_release_date("11/29/2019"), Some(date(2019, 11, 29)));
        assert_eq!(parse_release_date("6 Jan 2017"), Some(date(2017, 1, 6)));
    }

    #[test]
    fn test_parse_release_date_invalid() {
        assert_eq!(parse_release_date("not a date"), None);
        assert_eq!(parse_release_date("31 February 2020"), None);
        assert_eq!(parse_release_date(""), None);
    }
}
