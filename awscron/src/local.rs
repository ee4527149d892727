//! Expansion of a crontab written in local time into UTC crontabs.
//!
//! A local schedule such as `0 10 * * *` in `America/New_York` fires at
//! 15:00 UTC in winter and 14:00 UTC in summer. [`LocalCron`] evaluates every
//! firing of one calendar year through the tz database and groups the
//! results back into as few 5-field UTC crontabs as it can.

use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::Zoned;

use crate::error::LocalCronError;
use crate::expr::{format_values, CronSpec, ValueSet};

/// Something that re-expresses a local-time standard crontab in UTC.
///
/// Implementations return one crontab per UTC offset needed to cover the
/// year and must report unknown timezones as
/// [`LocalCronError::UnknownTimezone`].
pub trait UtcExpander {
    fn to_utc_crons(
        &self,
        crontab: &str,
        timezone: &str,
        year: Option<i16>,
    ) -> Result<Vec<String>, LocalCronError>;
}

/// [`UtcExpander`] backed by [`LocalCron`] and jiff's tz database.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzdbExpander;

impl UtcExpander for TzdbExpander {
    fn to_utc_crons(
        &self,
        crontab: &str,
        timezone: &str,
        year: Option<i16>,
    ) -> Result<Vec<String>, LocalCronError> {
        let local = LocalCron::new(crontab, timezone)?;
        match year {
            Some(year) => local.with_year(year).to_utc_crons(),
            None => local.to_utc_crons(),
        }
    }
}

/// A standard crontab bound to an IANA timezone.
#[derive(Debug, Clone)]
pub struct LocalCron {
    spec: CronSpec,
    tz: TimeZone,
    tz_name: String,
    year: Option<i16>,
}

impl LocalCron {
    /// Parse `crontab` and resolve `timezone`.
    ///
    /// Unless [`with_year`](Self::with_year) is called, the reference year
    /// is the current year in `timezone`, read when it is needed.
    pub fn new(crontab: &str, timezone: &str) -> Result<Self, LocalCronError> {
        let spec = CronSpec::parse(crontab)?;
        let tz = TimeZone::get(timezone)
            .map_err(|e| LocalCronError::unknown_timezone(timezone, e.to_string()))?;
        Ok(Self {
            spec,
            tz,
            tz_name: timezone.to_string(),
            year: None,
        })
    }

    /// Evaluate DST transitions of `year` instead of the current one.
    pub fn with_year(mut self, year: i16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn year(&self) -> i16 {
        self.year
            .unwrap_or_else(|| Zoned::now().with_time_zone(self.tz.clone()).year())
    }

    pub fn spec(&self) -> &CronSpec {
        &self.spec
    }

    pub fn timezone(&self) -> &str {
        &self.tz_name
    }

    /// UTC crontabs that together fire exactly when the local crontab does
    /// during the reference year, taken as a UTC calendar year.
    pub fn to_utc_crons(&self) -> Result<Vec<String>, LocalCronError> {
        let year = self.year();
        let groups = self.shift_groups(year)?;
        let mut entries: Vec<Entry> = Vec::new();
        for group in &groups {
            tracing::trace!(
                shift = group.shift,
                dates = group.dates.len(),
                first = %group.dates[0],
                "shift group"
            );
            for entry in self.group_entries(group, year)? {
                match entries.iter_mut().find(|e| e.same_except_month(&entry)) {
                    Some(existing) => existing.months = existing.months.union(entry.months),
                    None => entries.push(entry),
                }
            }
        }

        let crons: Vec<String> = entries.iter().map(Entry::render).collect();
        tracing::debug!(
            crontab = %self.spec,
            timezone = %self.tz_name,
            year,
            groups = groups.len(),
            crons = crons.len(),
            "expanded local crontab to UTC"
        );
        Ok(crons)
    }

    /// Local dates grouped by day shift and UTC firing times, in order of
    /// first occurrence.
    ///
    /// The local days just outside `year` are evaluated too. Only firings
    /// whose UTC date falls in `year` are kept.
    fn shift_groups(&self, year: i16) -> Result<Vec<ShiftGroup>, LocalCronError> {
        let jan1 = Date::new(year, 1, 1).map_err(civil)?;
        let dec31 = Date::new(year, 12, 31).map_err(civil)?;
        let first = jan1.yesterday().unwrap_or(jan1);
        let last = dec31.tomorrow().unwrap_or(dec31);

        let mut groups: Vec<ShiftGroup> = Vec::new();
        let mut date = first;
        loop {
            if self.spec.matches_date(date) {
                let mut by_shift: BTreeMap<i32, BTreeSet<(u8, u8)>> = BTreeMap::new();
                for (hour, minute) in self.spec.times() {
                    let local = date.at(hour as i8, minute as i8, 0, 0);
                    // Gaps resolve forward, folds to the earlier offset.
                    let utc = self
                        .tz
                        .to_zoned(local)
                        .map_err(civil)?
                        .with_time_zone(TimeZone::UTC);
                    if utc.year() != year {
                        continue;
                    }
                    let shift = date.until(utc.date()).map_err(civil)?.get_days();
                    by_shift
                        .entry(shift)
                        .or_default()
                        .insert((utc.hour() as u8, utc.minute() as u8));
                }
                for (shift, times) in by_shift {
                    match groups
                        .iter_mut()
                        .find(|g| g.shift == shift && g.times == times)
                    {
                        Some(group) => group.dates.push(date),
                        None => groups.push(ShiftGroup {
                            shift,
                            times,
                            dates: vec![date],
                        }),
                    }
                }
            }
            if date >= last {
                break;
            }
            date = date.tomorrow().map_err(civil)?;
        }
        Ok(groups)
    }

    fn group_entries(&self, group: &ShiftGroup, year: i16) -> Result<Vec<Entry>, LocalCronError> {
        let rule = self.day_rule(group.shift);

        // UTC days of each month, all within `year`.
        let mut by_month: BTreeMap<i8, ValueSet> = BTreeMap::new();
        for local in &group.dates {
            let utc = local
                .checked_add(jiff::Span::new().days(group.shift))
                .map_err(civil)?;
            by_month
                .entry(utc.month())
                .or_default()
                .insert(utc.day() as u8);
        }

        let mut parts: Vec<DatePart> = Vec::new();
        let mut rule_part: Option<usize> = None;
        for (&month, &days) in &by_month {
            if let Some(rule) = &rule {
                if rule.days_in(year, month)? == days {
                    match rule_part {
                        Some(i) => parts[i].months.insert(month as u8),
                        None => {
                            let (day, weekday) = rule.fields();
                            rule_part = Some(parts.len());
                            parts.push(DatePart {
                                day,
                                weekday,
                                months: ValueSet::single(month as u8),
                            });
                        }
                    }
                    continue;
                }
            }
            let month_len = Date::new(year, month, 1).map_err(civil)?.days_in_month();
            parts.push(DatePart {
                day: format_values(days, 1, month_len as u8),
                weekday: "*".to_string(),
                months: ValueSet::single(month as u8),
            });
        }

        let blocks = time_blocks(&group.times);
        let mut entries = Vec::with_capacity(parts.len() * blocks.len());
        for part in parts {
            for (minutes, hours) in &blocks {
                entries.push(Entry {
                    minute: format_values(*minutes, 0, 59),
                    hour: format_values(*hours, 0, 23),
                    day: part.day.clone(),
                    weekday: part.weekday.clone(),
                    months: part.months,
                });
            }
        }
        Ok(entries)
    }

    /// Day/weekday fields that can describe whole months of a group.
    ///
    /// Unshifted groups reuse the original fields. A shifted group can only
    /// be described by rule when the day-of-month is unrestricted, in which
    /// case the weekdays move with the shift.
    fn day_rule(&self, shift: i32) -> Option<DayRule<'_>> {
        if shift == 0 {
            Some(DayRule::Original(&self.spec))
        } else if self.spec.every_day_of_month() {
            Some(DayRule::Weekdays(self.spec.weekdays.rotate_weekdays(shift)))
        } else {
            None
        }
    }
}

fn civil(e: jiff::Error) -> LocalCronError {
    LocalCronError::civil(e.to_string())
}

struct ShiftGroup {
    /// Days between the local date and the UTC date of its firings.
    shift: i32,
    times: BTreeSet<(u8, u8)>,
    dates: Vec<Date>,
}

enum DayRule<'a> {
    Original(&'a CronSpec),
    Weekdays(ValueSet),
}

impl DayRule<'_> {
    fn matches(&self, date: Date) -> bool {
        match self {
            Self::Original(spec) => spec.matches_day(date),
            Self::Weekdays(weekdays) => {
                weekdays.contains(date.weekday().to_sunday_zero_offset() as u8)
            }
        }
    }

    /// Days of `month` in `year` selected by the rule.
    fn days_in(&self, year: i16, month: i8) -> Result<ValueSet, LocalCronError> {
        let mut date = Date::new(year, month, 1).map_err(civil)?;
        let mut days = ValueSet::EMPTY;
        loop {
            if self.matches(date) {
                days.insert(date.day() as u8);
            }
            if date.day() == date.days_in_month() {
                return Ok(days);
            }
            date = date.tomorrow().map_err(civil)?;
        }
    }

    fn fields(&self) -> (String, String) {
        match self {
            Self::Original(spec) => (
                spec.day_field().to_string(),
                spec.weekday_field().to_string(),
            ),
            Self::Weekdays(weekdays) => ("*".to_string(), format_values(*weekdays, 0, 6)),
        }
    }
}

struct DatePart {
    day: String,
    weekday: String,
    months: ValueSet,
}

struct Entry {
    minute: String,
    hour: String,
    day: String,
    weekday: String,
    months: ValueSet,
}

impl Entry {
    fn same_except_month(&self, other: &Entry) -> bool {
        self.minute == other.minute
            && self.hour == other.hour
            && self.day == other.day
            && self.weekday == other.weekday
    }

    fn render(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.minute,
            self.hour,
            self.day,
            format_values(self.months, 1, 12),
            self.weekday
        )
    }
}

/// Split `(hour, minute)` pairs into `(minutes, hours)` blocks whose hours
/// share the same minute set, ordered by first hour.
fn time_blocks(times: &BTreeSet<(u8, u8)>) -> Vec<(ValueSet, ValueSet)> {
    let mut per_hour: BTreeMap<u8, ValueSet> = BTreeMap::new();
    for &(hour, minute) in times {
        per_hour.entry(hour).or_default().insert(minute);
    }
    let mut blocks: Vec<(ValueSet, ValueSet)> = Vec::new();
    for (hour, minutes) in per_hour {
        match blocks.iter_mut().find(|(m, _)| *m == minutes) {
            Some((_, hours)) => hours.insert(hour),
            None => blocks.push((minutes, ValueSet::single(hour))),
        }
    }
    blocks
}
