use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

use crate::error::{Result, TaskError};

/// Unix timestamp of 2001-01-01T00:00:00Z, the epoch `dueDate` values are stored against.
pub const REFERENCE_EPOCH_UNIX_SECS: i64 = 978_307_200;

pub fn reference_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(REFERENCE_EPOCH_UNIX_SECS, 0)
        .single()
        .unwrap_or_default()
}

/// Seconds from the reference epoch to `instant`, with microsecond precision.
pub fn to_reference_seconds(instant: DateTime<Utc>) -> f64 {
    let delta = instant - reference_epoch();
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

/// Inverse of [`to_reference_seconds`]. `None` for non-finite or out of range values.
pub fn from_reference_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }
    reference_epoch().checked_add_signed(Duration::microseconds(micros as i64))
}

/// Seconds from `now` until `instant`; negative once `instant` has passed.
pub fn seconds_until(instant: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = instant - now;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TaskError::InvalidInput("Empty duration string".to_string()));
    }
    if !input.is_ascii() {
        return Err(TaskError::InvalidInput(format!("Invalid duration: {}", input)));
    }

    let len = input.len();
    let (num_str, unit) = input.split_at(len - 1);

    let num: i64 = num_str
        .parse()
        .map_err(|_| TaskError::InvalidInput(format!("Invalid duration number: {}", input)))?;

    let duration = match unit.to_lowercase().as_str() {
        "m" => Duration::try_minutes(num),
        "h" => Duration::try_hours(num),
        "d" => Duration::try_days(num),
        "w" => Duration::try_weeks(num),
        _ => return Err(TaskError::InvalidInput(format!("Unknown duration unit: {}", unit))),
    };
    duration.ok_or_else(|| TaskError::InvalidInput(format!("Duration out of range: {}", input)))
}

/// Parses a due date: either an offset from now (`30m`, `2h`, `3d`) or a human date.
pub fn parse_due(input: &str) -> Result<DateTime<Utc>> {
    parse_due_at(input, Local::now())
}

pub fn parse_due_at(input: &str, now: DateTime<Local>) -> Result<DateTime<Utc>> {
    if !is_offset(input) {
        return parse_human_date_at(input, now);
    }
    let offset = parse_duration(input)?;
    now.with_timezone(&Utc)
        .checked_add_signed(offset)
        .ok_or_else(|| out_of_range(input))
}

/// `<integer><m|h|d|w>`, regardless of whether the amount fits in a duration.
/// A leading `+` is left to the human date parser (`+3d` is end of day).
fn is_offset(input: &str) -> bool {
    let input = input.trim();
    if input.starts_with('+') {
        return false;
    }
    match input.char_indices().last() {
        Some((idx, unit)) if idx > 0 && "mhdwMHDW".contains(unit) => input[..idx].parse::<i64>().is_ok(),
        _ => false,
    }
}

pub fn parse_human_date(input: &str) -> Result<DateTime<Utc>> {
    parse_human_date_at(input, Local::now())
}

pub fn parse_human_date_at(input: &str, now: DateTime<Local>) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let today = now.date_naive();

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return end_of_day(today),
        "tomorrow" | "tom" => return end_of_day(add_days(today, 1)?),
        "eow" => {
            // End of week (Sunday)
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday() as i64) % 7;
            return end_of_day(add_days(today, days_to_sunday)?);
        }
        "eom" => return end_of_day(last_day_of_month(today.year(), today.month())?),
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw, +Nm)
    if let Some(rest) = input.strip_prefix('+') {
        if rest.len() < 2 || !rest.is_ascii() {
            return Err(TaskError::InvalidInput(format!("Invalid relative format: {}", input)));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: i64 = num_str
            .parse()
            .map_err(|_| TaskError::InvalidInput(format!("Invalid relative format: {}", input)))?;

        let target = match unit {
            "d" => add_days(today, count)?,
            "w" => add_days(today, count.checked_mul(7).ok_or_else(|| out_of_range(input))?)?,
            "m" => add_months(today, count)?,
            _ => {
                return Err(TaskError::InvalidInput(format!(
                    "Unknown unit in relative time: {}",
                    unit
                )))
            }
        };
        return end_of_day(target);
    }

    // 3. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed: i64 = target_weekday.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 1 means the next occurrence, count = 2 the one after that
            let days_needed = (count - 1)
                .checked_mul(7)
                .and_then(|extra| extra.checked_add(days_needed))
                .ok_or_else(|| out_of_range(input))?;

            return end_of_day(add_days(today, days_needed)?);
        }
    }

    // 4. Fallback to standard formats
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return local_to_utc(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return local_to_utc(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return end_of_day(d);
    }

    Err(TaskError::InvalidInput(format!("Could not parse date: {}", input)))
}

fn out_of_range(input: &str) -> TaskError {
    TaskError::InvalidInput(format!("Date out of range: {}", input))
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|offset| date.checked_add_signed(offset))
        .ok_or_else(|| out_of_range(&format!("{} + {}d", date, days)))
}

fn add_months(date: NaiveDate, count: i64) -> Result<NaiveDate> {
    let months = (date.month0() as i64)
        .checked_add(count)
        .ok_or_else(|| TaskError::InvalidInput(format!("Month offset out of range: {}", count)))?;
    let year = date.year() as i64 + months.div_euclid(12);
    let month = (months.rem_euclid(12) + 1) as u32;
    let year = i32::try_from(year)
        .map_err(|_| TaskError::InvalidInput(format!("Month offset out of range: {}", count)))?;
    match NaiveDate::from_ymd_opt(year, month, date.day()) {
        Some(d) => Ok(d),
        // Jan 31 + 1m lands on the last day of February
        None => last_day_of_month(year, month),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let next = if month == 12 {
        year.checked_add(1).and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt())
        .ok_or_else(|| TaskError::InvalidInput(format!("Invalid month: {}-{}", year, month)))
}

fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    let local_dt = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| TaskError::InvalidInput(format!("Invalid date: {}", date)))?;
    local_to_utc(local_dt)
}

fn local_to_utc(dt: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| TaskError::InvalidInput(format!("Nonexistent local time: {}", dt)))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    if input.contains(':') {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() == 2 {
            if let Ok(count) = parts[0].parse::<i64>() {
                if count >= 1 {
                    return Some((count, parts[1]));
                }
            }
        }
    } else {
        // Just "fri" means 1:fri
        return Some((1, input));
    }
    None
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(TaskError::InvalidInput(format!("Invalid weekday: {}", s))),
    }
}
