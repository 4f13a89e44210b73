//! Property value types and their wire syntax (RFC 2445 §4.3).
//!
//! Each variant of [`Value`] owns the parsed, logical form of a value; the
//! raw wire text is reproduced by [`Value::serialize_raw`]. Parsing is strict
//! per declared kind — the kind is decided by the property (its default value
//! type or an explicit VALUE parameter), never guessed from the text.

use std::cmp::Ordering;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// The value text does not conform to the declared value type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("value does not conform to its declared type")]
pub struct ValueTypeError;

type ValueResult<T> = Result<T, ValueTypeError>;

/// A calendar date (RFC 2445 §4.3.4), wire form `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Parses a `YYYYMMDD` date, rejecting days that do not exist in the
    /// proleptic Gregorian calendar.
    pub fn parse(s: &str) -> ValueResult<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueTypeError);
        }
        let year: u16 = s[0..4].parse().map_err(|_| ValueTypeError)?;
        let month: u8 = s[4..6].parse().map_err(|_| ValueTypeError)?;
        let day: u8 = s[6..8].parse().map_err(|_| ValueTypeError)?;

        if chrono::NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .is_none()
        {
            return Err(ValueTypeError);
        }
        Ok(Self { year, month, day })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// A wall-clock time, wire form `HHMMSS[Z]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Whether the value carried the UTC designator `Z`.
    pub utc: bool,
}

impl Time {
    pub fn parse(s: &str) -> ValueResult<Self> {
        let (digits, utc) = match s.strip_suffix('Z') {
            Some(stripped) => (stripped, true),
            None => (s, false),
        };
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueTypeError);
        }
        let hour: u8 = digits[0..2].parse().map_err(|_| ValueTypeError)?;
        let minute: u8 = digits[2..4].parse().map_err(|_| ValueTypeError)?;
        let second: u8 = digits[4..6].parse().map_err(|_| ValueTypeError)?;

        // 60 allowed for leap seconds
        if hour > 23 || minute > 59 || second > 60 {
            return Err(ValueTypeError);
        }
        Ok(Self {
            hour,
            minute,
            second,
            utc,
        })
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)?;
        if self.utc {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// A date with a time of day (RFC 2445 §4.3.5), wire form `YYYYMMDDTHHMMSS[Z]`.
///
/// A TZID parameter, when present, stays on the owning property; the value
/// itself only distinguishes UTC from local forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

impl DateTime {
    pub fn parse(s: &str) -> ValueResult<Self> {
        let (date_str, time_str) = s.split_once('T').ok_or(ValueTypeError)?;
        Ok(Self {
            date: Date::parse(date_str)?,
            time: Time::parse(time_str)?,
        })
    }

    /// Ordering key ignoring the UTC designator.
    fn key(self) -> (Date, u8, u8, u8) {
        (self.date, self.time.hour, self.time.minute, self.time.second)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

/// A duration of time (RFC 2445 §4.3.6), wire form `[+|-]PnW` or
/// `[+|-]P[nD][T[nH][nM][nS]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    pub negative: bool,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Duration {
    pub fn parse(s: &str) -> ValueResult<Self> {
        let mut dur = Self::default();
        let rest = if let Some(r) = s.strip_prefix('-') {
            dur.negative = true;
            r
        } else {
            s.strip_prefix('+').unwrap_or(s)
        };
        let body = rest.strip_prefix('P').ok_or(ValueTypeError)?;

        let mut in_time = false;
        let mut saw_component = false;
        let mut digits = String::new();
        for c in body.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if c == 'T' {
                if in_time || !digits.is_empty() {
                    return Err(ValueTypeError);
                }
                in_time = true;
                continue;
            }
            let n: u32 = digits.parse().map_err(|_| ValueTypeError)?;
            digits.clear();
            saw_component = true;
            match (c, in_time) {
                ('W', false) => dur.weeks = n,
                ('D', false) => dur.days = n,
                ('H', true) => dur.hours = n,
                ('M', true) => dur.minutes = n,
                ('S', true) => dur.seconds = n,
                _ => return Err(ValueTypeError),
            }
        }
        if !digits.is_empty() || !saw_component {
            return Err(ValueTypeError);
        }
        Ok(dur)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        if self.weeks > 0 {
            return write!(f, "{}W", self.weeks);
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            write!(f, "T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0 {
                write!(f, "{}S", self.seconds)?;
            }
        } else if self.days == 0 {
            // Zero duration still needs one component on the wire.
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

/// An offset from UTC (RFC 2445 §4.3.14), wire form `(+|-)HHMM[SS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset {
    pub seconds: i32,
}

impl UtcOffset {
    pub fn parse(s: &str) -> ValueResult<Self> {
        let (sign, digits) = match s.split_at_checked(1) {
            Some(("+", rest)) => (1, rest),
            Some(("-", rest)) => (-1, rest),
            _ => return Err(ValueTypeError),
        };
        if !(digits.len() == 4 || digits.len() == 6) || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ValueTypeError);
        }
        let hours: i32 = digits[0..2].parse().map_err(|_| ValueTypeError)?;
        let minutes: i32 = digits[2..4].parse().map_err(|_| ValueTypeError)?;
        let seconds: i32 = if digits.len() == 6 {
            digits[4..6].parse().map_err(|_| ValueTypeError)?
        } else {
            0
        };
        if minutes > 59 || seconds > 59 {
            return Err(ValueTypeError);
        }
        Ok(Self {
            seconds: sign * (hours * 3600 + minutes * 60 + seconds),
        })
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.seconds.abs();
        let (h, m, s) = (total / 3600, total / 60 % 60, total % 60);
        write!(f, "{}{h:02}{m:02}", if self.seconds < 0 { "-" } else { "+" })?;
        if s > 0 {
            write!(f, "{s:02}")?;
        }
        Ok(())
    }
}

/// A span of time (RFC 2445 §4.3.9): start plus either an explicit end or a
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime,
    pub end: PeriodEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodEnd {
    Until(DateTime),
    For(Duration),
}

impl Period {
    pub fn parse(s: &str) -> ValueResult<Self> {
        let (start, end) = s.split_once('/').ok_or(ValueTypeError)?;
        let start = DateTime::parse(start)?;
        let end = if end.starts_with('P') || end.starts_with('+') || end.starts_with('-') {
            PeriodEnd::For(Duration::parse(end)?)
        } else {
            PeriodEnd::Until(DateTime::parse(end)?)
        };
        Ok(Self { start, end })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            PeriodEnd::Until(dt) => write!(f, "{}/{}", self.start, dt),
            PeriodEnd::For(d) => write!(f, "{}/{}", self.start, d),
        }
    }
}

/// The value types a property may declare (RFC 2445 §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Binary,
    CalAddress,
    Date,
    DateTime,
    Duration,
    Geo,
    Integer,
    Period,
    Recur,
    Text,
    Uri,
    UtcOffset,
}

impl ValueKind {
    /// The VALUE parameter spelling for this kind.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Binary => "BINARY",
            Self::CalAddress => "CAL-ADDRESS",
            Self::Date => "DATE",
            Self::DateTime => "DATE-TIME",
            Self::Duration => "DURATION",
            Self::Geo => "FLOAT",
            Self::Integer => "INTEGER",
            Self::Period => "PERIOD",
            Self::Recur => "RECUR",
            Self::Text => "TEXT",
            Self::Uri => "URI",
            Self::UtcOffset => "UTC-OFFSET",
        }
    }

    /// Parses a VALUE parameter spelling (case-insensitive).
    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BINARY" => Some(Self::Binary),
            "CAL-ADDRESS" => Some(Self::CalAddress),
            "DATE" => Some(Self::Date),
            "DATE-TIME" => Some(Self::DateTime),
            "DURATION" => Some(Self::Duration),
            "FLOAT" => Some(Self::Geo),
            "INTEGER" => Some(Self::Integer),
            "PERIOD" => Some(Self::Period),
            "RECUR" => Some(Self::Recur),
            "TEXT" => Some(Self::Text),
            "URI" => Some(Self::Uri),
            "UTC-OFFSET" => Some(Self::UtcOffset),
            _ => None,
        }
    }
}

/// A parsed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Binary(Vec<u8>),
    CalAddress(String),
    Date(Date),
    DateList(Vec<Date>),
    DateTime(DateTime),
    DateTimeList(Vec<DateTime>),
    Duration(Duration),
    Geo { lat: f64, lon: f64 },
    Integer(i32),
    Period(Period),
    PeriodList(Vec<Period>),
    Recur(String),
    Text(String),
    Uri(String),
    UtcOffset(UtcOffset),
}

impl Value {
    /// Parses raw wire text as the given kind. `lists` permits
    /// comma-separated multi-valued date/date-time/period text (EXDATE,
    /// RDATE, FREEBUSY).
    pub fn parse(kind: ValueKind, raw: &str, lists: bool) -> ValueResult<Self> {
        match kind {
            ValueKind::Text => Ok(Self::Text(unescape_text(raw))),
            ValueKind::Integer => raw
                .parse::<i32>()
                .map(Self::Integer)
                .map_err(|_| ValueTypeError),
            ValueKind::Date => parse_listable(raw, lists, Date::parse, Self::Date, Self::DateList),
            ValueKind::DateTime => parse_listable(
                raw,
                lists,
                DateTime::parse,
                Self::DateTime,
                Self::DateTimeList,
            ),
            ValueKind::Period => {
                parse_listable(raw, lists, Period::parse, Self::Period, Self::PeriodList)
            }
            ValueKind::Duration => Duration::parse(raw).map(Self::Duration),
            ValueKind::UtcOffset => UtcOffset::parse(raw).map(Self::UtcOffset),
            ValueKind::Uri => parse_moniker(raw).map(Self::Uri),
            ValueKind::CalAddress => parse_moniker(raw).map(Self::CalAddress),
            ValueKind::Geo => {
                let (lat, lon) = raw.split_once(';').ok_or(ValueTypeError)?;
                let lat: f64 = lat.parse().map_err(|_| ValueTypeError)?;
                let lon: f64 = lon.parse().map_err(|_| ValueTypeError)?;
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(ValueTypeError);
                }
                Ok(Self::Geo { lat, lon })
            }
            ValueKind::Recur => parse_recur(raw).map(Self::Recur),
            ValueKind::Binary => BASE64
                .decode(raw)
                .map(Self::Binary)
                .map_err(|_| ValueTypeError),
        }
    }

    /// The kind this value belongs to (list variants report their element
    /// kind).
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Binary(_) => ValueKind::Binary,
            Self::CalAddress(_) => ValueKind::CalAddress,
            Self::Date(_) | Self::DateList(_) => ValueKind::Date,
            Self::DateTime(_) | Self::DateTimeList(_) => ValueKind::DateTime,
            Self::Duration(_) => ValueKind::Duration,
            Self::Geo { .. } => ValueKind::Geo,
            Self::Integer(_) => ValueKind::Integer,
            Self::Period(_) | Self::PeriodList(_) => ValueKind::Period,
            Self::Recur(_) => ValueKind::Recur,
            Self::Text(_) => ValueKind::Text,
            Self::Uri(_) => ValueKind::Uri,
            Self::UtcOffset(_) => ValueKind::UtcOffset,
        }
    }

    /// Renders the wire text of this value, escaping as the kind requires.
    #[must_use]
    pub fn serialize_raw(&self) -> String {
        match self {
            Self::Text(s) => escape_text(s),
            Self::Integer(n) => n.to_string(),
            Self::Date(d) => d.to_string(),
            Self::DateList(ds) => join_display(ds),
            Self::DateTime(dt) => dt.to_string(),
            Self::DateTimeList(dts) => join_display(dts),
            Self::Duration(d) => d.to_string(),
            Self::Period(p) => p.to_string(),
            Self::PeriodList(ps) => join_display(ps),
            Self::UtcOffset(o) => o.to_string(),
            Self::Uri(s) | Self::CalAddress(s) | Self::Recur(s) => s.clone(),
            Self::Geo { lat, lon } => format!("{lat};{lon}"),
            Self::Binary(data) => BASE64.encode(data),
        }
    }

    /// Compares two values of the same temporal kind.
    ///
    /// Returns `None` for any cross-kind pair: ordering a DATE against a
    /// DATE-TIME is undefined and callers must treat it as a violation, not
    /// pick an arbitrary answer. The UTC designator does not participate.
    #[must_use]
    pub fn compare_same_kind(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.key().cmp(&b.key())),
            _ => None,
        }
    }

    /// Returns the logical text if this is a TEXT value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<&Date> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_duration(&self) -> Option<&Duration> {
        match self {
            Self::Duration(d) => Some(d),
            _ => None,
        }
    }
}

fn parse_listable<T>(
    raw: &str,
    lists: bool,
    parse_one: impl Fn(&str) -> ValueResult<T>,
    scalar: impl Fn(T) -> Value,
    list: impl Fn(Vec<T>) -> Value,
) -> ValueResult<Value> {
    if lists && raw.contains(',') {
        let items: Vec<T> = raw.split(',').map(&parse_one).collect::<ValueResult<_>>()?;
        Ok(list(items))
    } else {
        parse_one(raw).map(scalar)
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// URI and cal-address values: require a scheme separator and no embedded
/// whitespace or control characters.
fn parse_moniker(raw: &str) -> ValueResult<String> {
    if raw.is_empty() || !raw.contains(':') || raw.chars().any(|c| c.is_whitespace() || c < ' ') {
        return Err(ValueTypeError);
    }
    Ok(raw.to_string())
}

const FREQUENCIES: [&str; 7] = [
    "SECONDLY", "MINUTELY", "HOURLY", "DAILY", "WEEKLY", "MONTHLY", "YEARLY",
];

/// Recurrence rules are kept as validated raw text: every part must be a
/// `NAME=value` pair and FREQ must name a known frequency. Expansion is out
/// of scope for this library.
fn parse_recur(raw: &str) -> ValueResult<String> {
    let mut freq = None;
    for part in raw.split(';') {
        let (name, value) = part.split_once('=').ok_or(ValueTypeError)?;
        if name.eq_ignore_ascii_case("FREQ") {
            freq = Some(value.to_ascii_uppercase());
        }
    }
    match freq {
        Some(f) if FREQUENCIES.contains(&f.as_str()) => Ok(raw.to_string()),
        _ => Err(ValueTypeError),
    }
}

/// Reverses TEXT escaping (RFC 2445 §4.3.11). Unknown escapes are kept
/// verbatim rather than rejected.
#[must_use]
pub fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ ('\\' | ',' | ';')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Applies TEXT escaping (RFC 2445 §4.3.11), the exact inverse of
/// [`unescape_text`] for the characters it produces.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}
