//! Session TTL with a human-readable wire form.
//!
//! Accepted input: a sequence of decimal numbers, each with an optional
//! fraction and a unit suffix (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`), e.g.
//! `"20h"`, `"1h30m"`, `"1.5s"`. A lone `"0"` is zero. A bare JSON/YAML
//! number is taken as nanoseconds. Output is canonical (`"20h0m0s"`), so
//! formatting then parsing is lossless.

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

// More fractional digits than this cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

/// Maximum lifetime of a session granted by a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionTtl(Duration);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration {input:?}: {reason}")]
pub struct DurationParseError {
    input: String,
    reason: &'static str,
}

impl SessionTtl {
    pub const ZERO: SessionTtl = SessionTtl(Duration::ZERO);

    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub fn from_hours(hours: u64) -> Self {
        Self(Duration::from_secs(hours * 3600))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for SessionTtl {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl From<SessionTtl> for Duration {
    fn from(value: SessionTtl) -> Self {
        value.0
    }
}

impl FromStr for SessionTtl {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_nanos(s).map(|nanos| Self(duration_from_nanos(nanos)))
    }
}

impl fmt::Display for SessionTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }
        if nanos < NANOS_PER_MICRO {
            return write!(f, "{nanos}ns");
        }
        if nanos < NANOS_PER_MILLI {
            return write!(f, "{}µs", decimal(nanos, NANOS_PER_MICRO, 3));
        }
        if nanos < NANOS_PER_SEC {
            return write!(f, "{}ms", decimal(nanos, NANOS_PER_MILLI, 6));
        }

        let hours = nanos / NANOS_PER_HOUR;
        let minutes = (nanos % NANOS_PER_HOUR) / NANOS_PER_MIN;
        let seconds = decimal(nanos % NANOS_PER_MIN, NANOS_PER_SEC, 9);
        if hours > 0 {
            write!(f, "{hours}h{minutes}m{seconds}s")
        } else if minutes > 0 {
            write!(f, "{minutes}m{seconds}s")
        } else {
            write!(f, "{seconds}s")
        }
    }
}

impl Serialize for SessionTtl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SessionTtl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SessionTtlVisitor)
    }
}

struct SessionTtlVisitor;

impl Visitor<'_> for SessionTtlVisitor {
    type Value = SessionTtl;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration string such as \"20h\" or a number of nanoseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(SessionTtl(Duration::from_nanos(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(|nanos| SessionTtl(Duration::from_nanos(nanos)))
            .map_err(|_| E::custom("session ttl must not be negative"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() || v < 0.0 || v > u64::MAX as f64 {
            return Err(E::custom("session ttl out of range"));
        }
        Ok(SessionTtl(Duration::from_nanos(v as u64)))
    }
}

fn parse_nanos(input: &str) -> Result<u128, DurationParseError> {
    let fail = |reason| DurationParseError {
        input: input.to_string(),
        reason,
    };

    let s = input.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.starts_with('-') {
        return Err(fail("negative durations are not allowed"));
    }
    if s.is_empty() {
        return Err(fail("empty duration"));
    }
    if s == "0" {
        return Ok(0);
    }

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        rest = tail;

        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => NANOS_PER_MIN,
            "h" => NANOS_PER_HOUR,
            "" => return Err(fail("missing unit")),
            _ => return Err(fail("unknown unit")),
        };

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(fail("expected a number"));
        }
        if fraction.contains('.') {
            return Err(fail("malformed number"));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| fail("number out of range"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| fail("duration out of range"))?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = digits.parse().map_err(|_| fail("malformed number"))?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos = nanos
                .checked_add(numerator * scale / denominator)
                .ok_or_else(|| fail("duration out of range"))?;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| fail("duration out of range"))?;
    }

    if total / NANOS_PER_SEC > u128::from(u64::MAX) {
        return Err(fail("duration out of range"));
    }
    Ok(total)
}

fn duration_from_nanos(nanos: u128) -> Duration {
    // Range is checked by parse_nanos.
    let secs = (nanos / NANOS_PER_SEC) as u64;
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}

/// `value / unit` rendered with up to `precision` fractional digits,
/// trailing zeros trimmed.
fn decimal(value: u128, unit: u128, precision: usize) -> String {
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0precision$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
