use time::format_description::FormatItem;
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime};

/// Day-key format used for grouping and for `startDate`/`endDate` query
/// parameters. All normalization is UTC; no per-user timezone is inferred.
pub const DAY_FMT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// `YYYY-MM-DD` key for the instant's own UTC calendar day.
pub fn day_key(at: OffsetDateTime) -> String {
    // the format can only fail on out-of-range components, which a valid
    // Date cannot carry
    at.date().format(DAY_FMT).unwrap_or_default()
}

pub fn parse_day(s: &str) -> anyhow::Result<Date> {
    Date::parse(s, DAY_FMT).map_err(|e| anyhow::anyhow!("invalid date {s:?}: {e}"))
}

/// Midnight lower bound of an inclusive day range, in UTC.
pub fn start_of_day(day: Date) -> OffsetDateTime {
    day.midnight().assume_utc()
}

/// 23:59:59.999 upper bound of an inclusive day range, in UTC.
pub fn end_of_day(day: Date) -> OffsetDateTime {
    day.with_time(time!(23:59:59.999)).assume_utc()
}

/// Inclusive range bounds from optional `YYYY-MM-DD` query parameters.
/// Either bound may be omitted independently.
pub fn parse_range(
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<(Option<OffsetDateTime>, Option<OffsetDateTime>)> {
    let from = start.map(parse_day).transpose()?.map(start_of_day);
    let until = end.map(parse_day).transpose()?.map(end_of_day);
    Ok((from, until))
}

/// Serde adapter for `time::Date` fields carried as `YYYY-MM-DD` strings.
pub mod day_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::DAY_FMT;

    pub fn serialize<S: Serializer>(date: &Date, ser: S) -> Result<S::Ok, S::Error> {
        let s = date.format(DAY_FMT).map_err(serde::ser::Error::custom)?;
        ser.serialize_str(&s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Date, D::Error> {
        let s = String::deserialize(de)?;
        Date::parse(&s, DAY_FMT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn day_key_uses_utc_calendar_day() {
        assert_eq!(day_key(datetime!(2024-03-05 23:59 UTC)), "2024-03-05");
        assert_eq!(day_key(datetime!(2024-03-06 00:00 UTC)), "2024-03-06");
    }

    #[test]
    fn parse_day_roundtrips() {
        let d = parse_day("2024-03-05").unwrap();
        assert_eq!(d, date!(2024 - 03 - 05));
        assert!(parse_day("05/03/2024").is_err());
    }

    #[test]
    fn day_bounds_are_inclusive() {
        let d = date!(2024 - 03 - 05);
        assert_eq!(start_of_day(d), datetime!(2024-03-05 00:00 UTC));
        assert_eq!(end_of_day(d), datetime!(2024-03-05 23:59:59.999 UTC));
        assert!(start_of_day(d) < end_of_day(d));
    }
}
