//! Free-text weekly schedules such as `"Mon-Fri 08:00-17:00; Sat 08:00-12:00"`.
//!
//! A schedule is a `;`-separated list of segments. Each segment names its days
//! (a single day, a comma-delimited list, or an inclusive `Day1-Day2` range)
//! followed by a 24-hour `HH:MM-HH:MM` interval.
//!
//! Two weekday conventions meet here. Schedule text is Monday-first: ranges
//! walk forward from Monday to Sunday and wrap through Sunday when the end day
//! comes before the start day. Raw per-day data from upstream records is keyed
//! Sunday-first (`0` is Sunday). Instants are evaluated through
//! [`chrono::Weekday`], which carries no numeric convention of its own, and the
//! tables below are the only places a numeric day index is translated.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Timelike, Weekday};

use crate::clock::{ClockTime, TimeRange};

/// Weekdays in schedule-text order, `Monday = 0`.
pub const MONDAY_FIRST: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekdays in the order used by raw per-day records, `Sunday = 0`.
pub const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Resolve a Sunday-first index (`0` is Sunday, `6` is Saturday).
#[must_use]
pub fn weekday_from_sunday_index(index: usize) -> Option<Weekday> {
    SUNDAY_FIRST.get(index).copied()
}

/// Sunday-first index of a weekday (`0` is Sunday, `6` is Saturday).
#[must_use]
pub fn sunday_index(day: Weekday) -> usize {
    match day {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Spelled-out English day name.
#[must_use]
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised while parsing schedule text.
pub enum ScheduleError {
    /// A day token is not a recognizable weekday.
    #[error("Unknown day: {0:?}")]
    UnknownDay(String),
    /// A time token is not a valid `HH:MM` value.
    #[error("Invalid time: {0:?}")]
    InvalidTime(String),
    /// The hours part of a segment is not an `open-close` pair.
    #[error("Invalid time range: {0:?}")]
    InvalidTimeRange(String),
    /// A segment has hours but no days.
    #[error("Missing days in segment: {0:?}")]
    MissingDays(String),
    /// A segment has days but no hours.
    #[error("Missing hours in segment: {0:?}")]
    MissingHours(String),
    /// Closing time is not strictly after opening time.
    #[error("Closing time {close} is not after opening time {open}")]
    EmptyRange {
        /// Parsed opening time.
        open: ClockTime,
        /// Parsed closing time.
        close: ClockTime,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayForm {
    List,
    Range(Weekday, Weekday),
}

#[derive(Debug, Clone, Eq)]
/// Ordered set of weekdays a segment applies to.
///
/// Equality is set equality: `Mon-Wed` equals `Wed,Tue,Mon`.
pub struct DaySet {
    days: Vec<Weekday>,
    mask: u8,
    form: DayForm,
}

impl DaySet {
    fn empty(form: DayForm) -> Self {
        Self {
            days: Vec::new(),
            mask: 0,
            form,
        }
    }

    fn insert(&mut self, day: Weekday) {
        let bit = 1 << day.num_days_from_monday();
        if self.mask & bit == 0 {
            self.mask |= bit;
            self.days.push(day);
        }
    }

    /// Whether the set covers `day`.
    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.mask & (1 << day.num_days_from_monday()) != 0
    }

    /// Days in the order they were written (ranges in walking order).
    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Number of distinct days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl PartialEq for DaySet {
    fn eq(&self, other: &Self) -> bool {
        self.mask == other.mask
    }
}

impl fmt::Display for DaySet {
    /// `Monday - Sunday` for written ranges, `Monday, Wednesday` for lists.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let DayForm::Range(first, last) = self.form
            && first != last
        {
            return write!(formatter, "{} - {}", day_name(first), day_name(last));
        }
        let names: Vec<&str> = self.days.iter().copied().map(day_name).collect();
        write!(formatter, "{}", names.join(", "))
    }
}

/// Expand a day specification into its ordered day set.
///
/// # Errors
///
/// Returns [`ScheduleError::UnknownDay`] for any token that is not a weekday
/// and [`ScheduleError::MissingDays`] for an empty specification.
pub fn expand_days(spec: &str) -> Result<DaySet, ScheduleError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(ScheduleError::MissingDays(spec.to_owned()));
    }

    if spec.contains(',') {
        let mut set = DaySet::empty(DayForm::List);
        for token in spec.split(',') {
            set.insert(parse_day(token)?);
        }
        return Ok(set);
    }

    if let Some((first, last)) = spec.split_once('-') {
        let first = parse_day(first)?;
        let last = parse_day(last)?;
        let mut set = DaySet::empty(DayForm::Range(first, last));
        let mut day = first;
        set.insert(day);
        while day != last {
            day = day.succ();
            set.insert(day);
        }
        return Ok(set);
    }

    let mut set = DaySet::empty(DayForm::List);
    set.insert(parse_day(spec)?);
    Ok(set)
}

fn parse_day(token: &str) -> Result<Weekday, ScheduleError> {
    let token = token.trim();
    token
        .parse::<Weekday>()
        .map_err(|_parse_error| ScheduleError::UnknownDay(token.to_owned()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One `<days> <open>-<close>` clause.
pub struct ScheduleSegment {
    /// Days the clause applies to.
    pub days: DaySet,
    /// Opening interval, `open < close` always holds.
    pub hours: TimeRange,
}

impl FromStr for ScheduleSegment {
    type Err = ScheduleError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let segment = segment.trim();
        let split_at = segment
            .find(|ch: char| ch.is_ascii_digit())
            .ok_or_else(|| ScheduleError::MissingHours(segment.to_owned()))?;
        let (days, hours) = segment.split_at(split_at);
        if days.trim().is_empty() {
            return Err(ScheduleError::MissingDays(segment.to_owned()));
        }

        let (open, close) = hours
            .split_once('-')
            .ok_or_else(|| ScheduleError::InvalidTimeRange(hours.trim().to_owned()))?;
        let open: ClockTime = open.parse()?;
        let close: ClockTime = close.parse()?;
        if close <= open {
            return Err(ScheduleError::EmptyRange { open, close });
        }

        Ok(Self {
            days: expand_days(days)?,
            hours: TimeRange { open, close },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Parsed weekly schedule. An empty schedule is closed every day.
pub struct Schedule {
    segments: Vec<ScheduleSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Segments sharing an identical day set, merged for display.
pub struct HoursGroup<'schedule> {
    /// Day set of the first segment in the group.
    pub days: &'schedule DaySet,
    /// Intervals in the order they appear in the schedule text.
    pub ranges: Vec<TimeRange>,
}

impl Schedule {
    /// Parse schedule text. Blank text yields an empty schedule.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] for the first malformed segment; no segment
    /// is ever skipped.
    pub fn parse(text: &str) -> Result<Self, ScheduleError> {
        let segments = text
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ScheduleSegment>, _>>()?;
        Ok(Self { segments })
    }

    /// Parsed segments in text order.
    #[must_use]
    pub fn segments(&self) -> &[ScheduleSegment] {
        &self.segments
    }

    /// Whether the schedule has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Intervals that apply on `day`, in text order.
    pub fn hours_on(&self, day: Weekday) -> impl Iterator<Item = TimeRange> + '_ {
        self.segments
            .iter()
            .filter(move |segment| segment.days.contains(day))
            .map(|segment| segment.hours)
    }

    /// Whether any segment covers `day`.
    #[must_use]
    pub fn is_open_on(&self, day: Weekday) -> bool {
        self.hours_on(day).next().is_some()
    }

    /// Whether any segment covers the weekday of `date`.
    #[must_use]
    pub fn open_today<D: Datelike>(&self, date: &D) -> bool {
        self.is_open_on(date.weekday())
    }

    /// Whether `instant` falls in `[open, close)` of a segment covering its weekday.
    #[must_use]
    pub fn open_now<T: Datelike + Timelike>(&self, instant: &T) -> bool {
        let time = ClockTime::of(instant);
        self.hours_on(instant.weekday())
            .any(|range| range.contains(time))
    }

    /// `"Open today: ..."` with every interval for the weekday of `date`, or
    /// `"Closed today"`.
    #[must_use]
    pub fn todays_hours<D: Datelike>(&self, date: &D) -> String {
        let ranges: Vec<String> = self
            .hours_on(date.weekday())
            .map(|range| range.to_string())
            .collect();
        if ranges.is_empty() {
            return "Closed today".to_owned();
        }
        format!("Open today: {}", ranges.join(", "))
    }

    /// Segments merged by identical day set, in order of first appearance.
    #[must_use]
    pub fn groups(&self) -> Vec<HoursGroup<'_>> {
        let mut groups: Vec<HoursGroup<'_>> = Vec::new();
        for segment in &self.segments {
            match groups.iter_mut().find(|group| *group.days == segment.days) {
                Some(group) => group.ranges.push(segment.hours),
                None => groups.push(HoursGroup {
                    days: &segment.days,
                    ranges: vec![segment.hours],
                }),
            }
        }
        groups
    }

    /// Full weekly hours, one `"<days>: <ranges>"` group per distinct day set,
    /// groups separated by `"; "`.
    #[must_use]
    pub fn full_hours(&self) -> String {
        if self.is_empty() {
            return "Closed".to_owned();
        }
        self.groups()
            .iter()
            .map(HoursGroup::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for HoursGroup<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(TimeRange::to_string).collect();
        write!(formatter, "{}: {}", self.days, ranges.join(" and from "))
    }
}

impl FromStr for Schedule {
    type Err = ScheduleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Parse schedule text into a [`Schedule`].
///
/// # Errors
///
/// See [`Schedule::parse`].
pub fn parse_schedule(text: &str) -> Result<Schedule, ScheduleError> {
    Schedule::parse(text)
}

/// Render the merged weekly hours of `text`.
///
/// # Errors
///
/// See [`Schedule::parse`].
pub fn full_hours(text: &str) -> Result<String, ScheduleError> {
    Ok(Schedule::parse(text)?.full_hours())
}

/// Whether `text` has hours on the weekday of `date`.
///
/// # Errors
///
/// See [`Schedule::parse`].
pub fn open_today<D: Datelike>(text: &str, date: &D) -> Result<bool, ScheduleError> {
    Ok(Schedule::parse(text)?.open_today(date))
}

/// Whether `text` is open at `instant`, open minute inclusive and close minute
/// exclusive.
///
/// # Errors
///
/// See [`Schedule::parse`].
pub fn open_now<T: Datelike + Timelike>(text: &str, instant: &T) -> Result<bool, ScheduleError> {
    Ok(Schedule::parse(text)?.open_now(instant))
}

/// Render today's hours of `text` for the weekday of `date`.
///
/// # Errors
///
/// See [`Schedule::parse`].
pub fn todays_hours<D: Datelike>(text: &str, date: &D) -> Result<String, ScheduleError> {
    Ok(Schedule::parse(text)?.todays_hours(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    // 2024-01-07 is a Sunday.
    fn on(day: Weekday) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap() + chrono::Days::new(sunday_index(day) as u64)
    }

    fn at(day: Weekday, hour: u32, minute: u32) -> NaiveDateTime {
        on(day).and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn translation_tables_agree() {
        for (index, day) in SUNDAY_FIRST.iter().enumerate() {
            assert_eq!(sunday_index(*day), index);
            assert_eq!(weekday_from_sunday_index(index), Some(*day));
            assert_eq!(on(*day).weekday(), *day);
        }
        assert_eq!(weekday_from_sunday_index(7), None);
        assert_eq!(MONDAY_FIRST.first(), Some(&Weekday::Mon));
    }

    #[test]
    fn expands_ranges_inclusively() {
        let set = expand_days("Mon-Wed").unwrap();
        assert_eq!(set.days(), &[Weekday::Mon, Weekday::Tue, Weekday::Wed]);

        let set = expand_days("Wed-Sun").unwrap();
        assert_eq!(set.len(), 5);
        assert!(set.contains(Weekday::Sun));
        assert!(!set.contains(Weekday::Mon));
    }

    #[test]
    fn wraps_ranges_through_sunday() {
        let set = expand_days("Sat-Mon").unwrap();
        assert_eq!(set.days(), &[Weekday::Sat, Weekday::Sun, Weekday::Mon]);
    }

    #[test]
    fn lists_keep_literal_order_and_dedup() {
        let set = expand_days("Wed, Mon,Wed,Sun").unwrap();
        assert_eq!(set.days(), &[Weekday::Wed, Weekday::Mon, Weekday::Sun]);
        assert_eq!(set, expand_days("Sun,Mon,Wed").unwrap());
    }

    #[test]
    fn rejects_unknown_days() {
        assert_eq!(
            expand_days("Mon,Funday"),
            Err(ScheduleError::UnknownDay("Funday".to_owned()))
        );
        assert!(matches!(
            Schedule::parse("Xyz 08:00-12:00"),
            Err(ScheduleError::UnknownDay(_))
        ));
    }

    #[test]
    fn rejects_malformed_segments() {
        assert!(matches!(
            Schedule::parse("Mon 8h-12h"),
            Err(ScheduleError::InvalidTime(_) | ScheduleError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            Schedule::parse("Mon 08:00"),
            Err(ScheduleError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            Schedule::parse("Mon-Fri"),
            Err(ScheduleError::MissingHours(_))
        ));
        assert!(matches!(
            Schedule::parse("08:00-12:00"),
            Err(ScheduleError::MissingDays(_))
        ));
    }

    #[test]
    fn rejects_non_increasing_ranges() {
        assert!(matches!(
            Schedule::parse("Mon 12:00-12:00"),
            Err(ScheduleError::EmptyRange { .. })
        ));
        assert!(matches!(
            Schedule::parse("Mon 08:00-17:00; Tue 17:00-08:00"),
            Err(ScheduleError::EmptyRange { .. })
        ));
    }

    #[test]
    fn blank_text_is_closed_every_day() {
        let schedule = Schedule::parse("  ").unwrap();
        assert!(schedule.is_empty());
        assert!(!schedule.open_today(&on(Weekday::Mon)));
        assert_eq!(schedule.todays_hours(&on(Weekday::Mon)), "Closed today");
        assert_eq!(schedule.full_hours(), "Closed");
    }

    #[test]
    fn full_hours_expands_ranges_and_formats_times() {
        let hours = full_hours("Mon-Sun 08:00-17:00").unwrap();
        assert!(hours.contains("Monday - Sunday"), "{hours}");
        assert!(hours.contains("8:00 am - 5:00 pm"), "{hours}");
    }

    #[test]
    fn full_hours_merges_identical_day_sets() {
        let hours = full_hours("Mon,Tue,Wed,Sun 08:00-12:00; Mon,Tue,Wed,Sun 13:30-17:00").unwrap();
        assert_eq!(hours.matches("Monday, Tuesday, Wednesday, Sunday").count(), 1);
        assert!(
            hours.contains("8:00 am - 12:00 pm and from 1:30 pm - 5:00 pm"),
            "{hours}"
        );
    }

    #[test]
    fn full_hours_merges_non_adjacent_segments() {
        let hours = full_hours("Mon-Wed 08:00-12:00; Sat 09:00-11:00; Mon-Wed 13:00-16:00").unwrap();
        assert_eq!(
            hours,
            "Monday - Wednesday: 8:00 am - 12:00 pm and from 1:00 pm - 4:00 pm; \
             Saturday: 9:00 am - 11:00 am"
        );
        assert_eq!(hours.matches("Monday").count(), 1);
    }

    #[test]
    fn open_today_covers_range_endpoints() {
        let text = "Mon-Sat 08:00-17:00";
        assert!(open_today(text, &on(Weekday::Mon)).unwrap());
        assert!(open_today(text, &on(Weekday::Wed)).unwrap());
        assert!(open_today(text, &on(Weekday::Sat)).unwrap());
        assert!(!open_today(text, &on(Weekday::Sun)).unwrap());
    }

    #[test]
    fn open_today_on_ranges_ending_sunday() {
        let text = "Wed-Sun 08:00-17:00";
        assert!(open_today(text, &on(Weekday::Wed)).unwrap());
        assert!(open_today(text, &on(Weekday::Thu)).unwrap());
        assert!(open_today(text, &on(Weekday::Sun)).unwrap());
        assert!(!open_today(text, &on(Weekday::Tue)).unwrap());
        assert!(open_today("Mon-Sun 08:00-17:00", &on(Weekday::Sun)).unwrap());
    }

    #[test]
    fn open_today_with_lists_and_combined_segments() {
        let text = "Wed,Fri,Sat,Sun 08:00-15:30";
        assert!(open_today(text, &on(Weekday::Sat)).unwrap());
        assert!(!open_today(text, &on(Weekday::Mon)).unwrap());

        let text = "Mon-Wed 08:00-15:30; Sat 08:00-15:30";
        assert!(open_today(text, &on(Weekday::Mon)).unwrap());
        assert!(open_today(text, &on(Weekday::Sat)).unwrap());
        assert!(!open_today(text, &on(Weekday::Sun)).unwrap());
    }

    #[test]
    fn open_now_is_inclusive_at_open_and_exclusive_at_close() {
        let text = "Mon-Wed 08:00-15:30; Sat 08:00-12:30";
        assert!(!open_now(text, &at(Weekday::Sun, 10, 0)).unwrap());
        assert!(open_now(text, &at(Weekday::Mon, 8, 0)).unwrap());
        assert!(!open_now(text, &at(Weekday::Mon, 15, 30)).unwrap());
        assert!(open_now(text, &at(Weekday::Mon, 12, 30)).unwrap());
        assert!(!open_now(text, &at(Weekday::Mon, 7, 30)).unwrap());
        assert!(open_now(text, &at(Weekday::Sat, 8, 0)).unwrap());
        assert!(!open_now(text, &at(Weekday::Sat, 12, 30)).unwrap());
    }

    #[test]
    fn open_now_checks_every_split_shift() {
        let schedule = Schedule::parse("Mon 08:00-12:00; Mon 13:30-17:00").unwrap();
        assert!(schedule.open_now(&at(Weekday::Mon, 11, 59)));
        assert!(!schedule.open_now(&at(Weekday::Mon, 12, 45)));
        assert!(schedule.open_now(&at(Weekday::Mon, 13, 30)));
    }

    #[test]
    fn todays_hours_reports_open_and_closed_days() {
        let text = "Mon-Wed 08:00-15:30; Sat 08:00-12:30";
        assert!(todays_hours(text, &on(Weekday::Sun)).unwrap().contains("Closed"));
        let monday = todays_hours(text, &on(Weekday::Mon)).unwrap();
        assert!(monday.contains("Open"));
        assert!(monday.contains("8:00 am"));
        assert!(monday.contains("3:30 pm"));
    }

    #[test]
    fn todays_hours_joins_split_shifts() {
        let text = "Mon,Tue,Wed,Sun 08:00-12:00; Mon,Tue,Wed,Sun 13:30-17:00";
        let hours = todays_hours(text, &on(Weekday::Mon)).unwrap();
        assert!(hours.contains("8:00 am - 12:00 pm, 1:30 pm - 5:00 pm"), "{hours}");
    }

    #[test]
    fn ignores_empty_segments_between_separators() {
        let schedule = Schedule::parse("Mon 08:00-12:00;; Tue 08:00-12:00;").unwrap();
        assert_eq!(schedule.segments().len(), 2);
    }

    fn arb_segment() -> impl Strategy<Value = (Vec<usize>, u32, u32)> {
        (
            prop::collection::vec(0..7_usize, 1..4),
            0..1439_u32,
        )
            .prop_flat_map(|(days, open)| (Just(days), Just(open), (open + 1)..=1440))
    }

    fn render((days, open, close): &(Vec<usize>, u32, u32)) -> String {
        let names: Vec<String> = days
            .iter()
            .filter_map(|index| MONDAY_FIRST.get(*index))
            .map(ToString::to_string)
            .collect();
        format!(
            "{} {:02}:{:02}-{:02}:{:02}",
            names.join(","),
            open / 60,
            open % 60,
            close / 60,
            close % 60
        )
    }

    proptest! {
        #[test]
        fn open_today_matches_union_of_day_sets(
            segments in prop::collection::vec(arb_segment(), 0..5),
            day_index in 0..7_usize,
        ) {
            let text = segments.iter().map(render).collect::<Vec<_>>().join("; ");
            let day = SUNDAY_FIRST[day_index];
            let expected = segments.iter().any(|(days, _, _)| {
                days.iter().any(|index| MONDAY_FIRST[*index] == day)
            });
            prop_assert_eq!(open_today(&text, &on(day)).unwrap(), expected);
        }

        #[test]
        fn full_hours_has_one_group_per_distinct_day_set(
            segments in prop::collection::vec(arb_segment(), 1..6),
        ) {
            let text = segments.iter().map(render).collect::<Vec<_>>().join("; ");
            let schedule = Schedule::parse(&text).unwrap();
            let mut distinct: Vec<&DaySet> = Vec::new();
            for segment in schedule.segments() {
                if !distinct.contains(&&segment.days) {
                    distinct.push(&segment.days);
                }
            }
            prop_assert_eq!(schedule.groups().len(), distinct.len());
            prop_assert_eq!(schedule.full_hours().split("; ").count(), distinct.len());
        }
    }
}
