//! Standard 5-field cron expressions evaluated as sets of values.

use std::fmt;

use jiff::civil::Date;

use crate::error::{LocalCronError, Span};
use crate::field::CronFieldPosition;

/// A set of small integers (0..64), stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ValueSet(u64);

impl ValueSet {
    pub const EMPTY: ValueSet = ValueSet(0);

    /// Every value in `min..=max`.
    pub fn range(min: u8, max: u8) -> Self {
        let mut set = Self::EMPTY;
        for v in min..=max {
            set.insert(v);
        }
        set
    }

    pub fn single(value: u8) -> Self {
        let mut set = Self::EMPTY;
        set.insert(value);
        set
    }

    pub fn insert(&mut self, value: u8) {
        debug_assert!(value < 64);
        self.0 |= 1u64 << value;
    }

    pub fn contains(&self, value: u8) -> bool {
        value < 64 && self.0 & (1u64 << value) != 0
    }

    pub fn union(self, other: ValueSet) -> ValueSet {
        ValueSet(self.0 | other.0)
    }

    /// Values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..64).filter(move |v| self.contains(*v))
    }

    /// Weekday set moved by `days`, wrapping around the week.
    pub fn rotate_weekdays(&self, days: i32) -> ValueSet {
        let mut set = Self::EMPTY;
        for v in self.iter() {
            set.insert((v as i32 + days).rem_euclid(7) as u8);
        }
        set
    }
}

impl FromIterator<u8> for ValueSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for v in iter {
            set.insert(v);
        }
        set
    }
}

/// Render a set as a compact cron list.
///
/// The full `min..=max` range renders as `*`; runs of two or more
/// consecutive values render as `a-b`.
pub fn format_values(values: ValueSet, min: u8, max: u8) -> String {
    if values == ValueSet::range(min, max) {
        return "*".to_string();
    }
    let mut parts = Vec::new();
    let mut run: Option<(u8, u8)> = None;
    for v in values.iter() {
        run = match run {
            Some((start, end)) if end + 1 == v => Some((start, v)),
            Some(done) => {
                parts.push(format_run(done));
                Some((v, v))
            }
            None => Some((v, v)),
        };
    }
    if let Some(done) = run {
        parts.push(format_run(done));
    }
    parts.join(",")
}

fn format_run((start, end): (u8, u8)) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

/// A parsed standard crontab: one value set per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSpec {
    fields: [String; 5],
    pub minutes: ValueSet,
    pub hours: ValueSet,
    pub days: ValueSet,
    pub months: ValueSet,
    pub weekdays: ValueSet,
    day_star: bool,
    weekday_star: bool,
}

impl CronSpec {
    /// Parse a 5-field crontab.
    ///
    /// Each field is a comma list of `*`, `?`, `N`, `A-B`, `*/S`, `A-B/S` or
    /// `A/S`. Months and weekdays also accept three-letter names.
    pub fn parse(cron: &str) -> Result<Self, LocalCronError> {
        let tokens: Vec<(&str, Span)> = cron
            .split_whitespace()
            .map(|t| {
                let start = t.as_ptr() as usize - cron.as_ptr() as usize;
                (t, Span::new(start, start + t.len()))
            })
            .collect();
        if tokens.len() != 5 {
            return Err(LocalCronError::field(
                format!("expected 5 cron fields, got {}", tokens.len()),
                Span::trimmed(cron),
                cron,
            ));
        }

        let mut sets = [ValueSet::EMPTY; 5];
        for (i, (token, span)) in tokens.iter().enumerate() {
            sets[i] = parse_field(token, CronFieldPosition::ALL[i])
                .map_err(|message| LocalCronError::field(message, *span, cron))?;
        }

        let is_star = |t: &str| t.starts_with('*') || t.starts_with('?');
        Ok(Self {
            fields: [0, 1, 2, 3, 4].map(|i| tokens[i].0.to_string()),
            minutes: sets[0],
            hours: sets[1],
            days: sets[2],
            months: sets[3],
            weekdays: sets[4],
            day_star: is_star(tokens[2].0),
            weekday_star: is_star(tokens[4].0),
        })
    }

    pub fn day_field(&self) -> &str {
        &self.fields[2]
    }

    pub fn weekday_field(&self) -> &str {
        &self.fields[4]
    }

    /// True when the day-of-month field places no restriction at all.
    pub fn every_day_of_month(&self) -> bool {
        self.day_star && self.days == ValueSet::range(1, 31)
    }

    /// Day-of-month / weekday match, ignoring the month.
    ///
    /// When either field starts with a wildcard both must match, otherwise
    /// either one is enough.
    pub fn matches_day(&self, date: Date) -> bool {
        let dom = self.days.contains(date.day() as u8);
        let dow = self
            .weekdays
            .contains(date.weekday().to_sunday_zero_offset() as u8);
        if self.day_star || self.weekday_star {
            dom && dow
        } else {
            dom || dow
        }
    }

    pub fn matches_date(&self, date: Date) -> bool {
        self.months.contains(date.month() as u8) && self.matches_day(date)
    }

    /// Every `(hour, minute)` firing within a matching day, ascending.
    pub fn times(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.hours
            .iter()
            .flat_map(move |h| self.minutes.iter().map(move |m| (h, m)))
    }
}

impl fmt::Display for CronSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join(" "))
    }
}

/// Smallest and largest value of a field. Weekday 7 is accepted on input as Sunday.
fn bounds(field: CronFieldPosition) -> (u8, u8) {
    match field {
        CronFieldPosition::Minute => (0, 59),
        CronFieldPosition::Hour => (0, 23),
        CronFieldPosition::Day => (1, 31),
        CronFieldPosition::Month => (1, 12),
        CronFieldPosition::Weekday | CronFieldPosition::Year => (0, 6),
    }
}

fn parse_field(token: &str, field: CronFieldPosition) -> Result<ValueSet, String> {
    let (min, max) = bounds(field);
    let mut set = ValueSet::EMPTY;

    for part in token.split(',') {
        let (range, step) = match part.split_once('/') {
            Some((range, step_str)) => {
                let step: u32 = step_str
                    .parse()
                    .map_err(|_| format!("invalid {field} step: {step_str}"))?;
                if step == 0 {
                    return Err("step cannot be 0".to_string());
                }
                (range, Some(step))
            }
            None => (part, None),
        };

        let (start, end) = if range == "*" || range == "?" {
            (min, max)
        } else if let Some((s, e)) = range.split_once('-') {
            let start = parse_value(s, field)?;
            let end = parse_value(e, field)?;
            if start > end {
                return Err(format!("range start must be <= end: {s}-{e}"));
            }
            (start, end)
        } else {
            let value = parse_value(range, field)?;
            // A single value with a step runs to the end of the field.
            match step {
                Some(_) => (value, max.max(value)),
                None => (value, value),
            }
        };

        for v in (start..=end).step_by(step.unwrap_or(1) as usize) {
            let value = if field == CronFieldPosition::Weekday && v == 7 {
                0
            } else {
                v
            };
            set.insert(value);
        }
    }

    Ok(set)
}

/// Parse a single value (number or name) and check it against the field's bounds.
fn parse_value(s: &str, field: CronFieldPosition) -> Result<u8, String> {
    let (min, max) = bounds(field);
    let max = if field == CronFieldPosition::Weekday {
        7
    } else {
        max
    };

    let value = match s.parse::<u8>() {
        Ok(n) => n,
        Err(_) => match field {
            CronFieldPosition::Month => parse_month_name(s),
            CronFieldPosition::Weekday => parse_weekday_name(s),
            _ => None,
        }
        .ok_or_else(|| format!("invalid {field} value: {s}"))?,
    };

    if value < min || value > max {
        return Err(format!("{field} must be {min}-{max}, got {value}"));
    }
    Ok(value)
}

fn parse_month_name(s: &str) -> Option<u8> {
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(s))
        .map(|i| i as u8 + 1)
}

fn parse_weekday_name(s: &str) -> Option<u8> {
    const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
    WEEKDAYS
        .iter()
        .position(|d| d.eq_ignore_ascii_case(s))
        .map(|i| i as u8)
}
