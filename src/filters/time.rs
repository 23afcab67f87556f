// ABOUTME: SMPP time format: absolute "YYMMDDhhmmsstnnp" and relative "YYMMDDhhmmss000R"
// ABOUTME: Relative values decode to the current time advanced by each stated component

use crate::types::Value;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Timelike, Utc};

pub(crate) fn encode(value: Value) -> Value {
    match value {
        Value::Time(time) => Value::Str(format_absolute(&time)),
        Value::Str(s) => {
            let len = s.chars().count();
            if s.is_empty() || len > 12 {
                Value::Str(s)
            } else {
                Value::Str(format!("{s:0>12}000R"))
            }
        }
        other => other,
    }
}

pub(crate) fn decode(value: Value) -> Value {
    decode_at(value, Utc::now())
}

/// Decode relative to `now`. Strings that do not parse are kept verbatim.
pub(crate) fn decode_at(value: Value, now: DateTime<Utc>) -> Value {
    let Value::Str(s) = value else {
        return value;
    };
    if s.is_empty() {
        return Value::Str(s);
    }
    let parsed = if s.ends_with('R') {
        parse_relative(&s, now)
    } else {
        parse_absolute(&s, now.year())
    };
    match parsed {
        Some(time) => Value::Time(time),
        None => Value::Str(s),
    }
}

/// Absolute time in UTC with a zero quarter-hour offset.
pub fn format_absolute(time: &DateTime<Utc>) -> String {
    format!(
        "{:02}{:02}{:02}{:02}{:02}{:02}{}00+",
        time.year().rem_euclid(100),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second(),
        time.timestamp_subsec_millis() / 100
    )
}

fn pairs(s: &str) -> Option<[u32; 6]> {
    let digits = s.get(..12)?;
    let mut out = [0u32; 6];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = digits.get(i * 2..i * 2 + 2)?.parse().ok()?;
    }
    Some(out)
}

fn parse_relative(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let [years, months, days, hours, minutes, seconds] = pairs(s)?;
    now.checked_add_months(Months::new(years * 12 + months))?
        .checked_add_signed(Duration::days(i64::from(days)))?
        .checked_add_signed(Duration::hours(i64::from(hours)))?
        .checked_add_signed(Duration::minutes(i64::from(minutes)))?
        .checked_add_signed(Duration::seconds(i64::from(seconds)))
}

fn parse_absolute(s: &str, current_year: i32) -> Option<DateTime<Utc>> {
    let [yy, month, day, hour, minute, second] = pairs(s)?;
    let century = current_year.div_euclid(100) * 100;
    let tenths = s
        .get(12..13)
        .and_then(|t| t.parse::<u32>().ok())
        .unwrap_or(0);

    let naive = NaiveDate::from_ymd_opt(century + yy as i32, month, day)?
        .and_hms_milli_opt(hour, minute, second, tenths * 100)?;
    let mut time = Utc.from_utc_datetime(&naive);

    if s.len() >= 16 {
        let quarters: i64 = s.get(13..15)?.parse().ok()?;
        let offset = Duration::minutes(quarters * 15);
        match s.get(15..16)? {
            "+" => time -= offset,
            "-" => time += offset,
            _ => {}
        }
    }
    Some(time)
}
