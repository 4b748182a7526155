//! Quota report - every derived metric evaluated at a single instant

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

use super::{format_bytes, Clock, Quota, QuotaError};

/// A point-in-time evaluation of a [`Quota`]
#[derive(Debug, Clone, Serialize)]
pub struct QuotaReport {
    /// Instant all time-relative figures refer to
    pub captured_at: DateTime<Utc>,

    pub start: NaiveDate,
    pub end: NaiveDate,

    pub limit: u64,
    pub used: u64,
    pub available: u64,

    pub percent_used: f64,
    pub percent_available: f64,
    pub percent_elapsed: f64,
    pub percent_remaining: f64,

    /// Average consumption since the period started
    pub bytes_per_second: f64,

    /// Projected surplus (positive) or deficit (negative) at period end
    pub leftover: i64,

    pub will_suffice: bool,

    /// When the allowance runs out at the current rate; absent if never
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depletion: Option<DateTime<Utc>>,
}

impl QuotaReport {
    /// Evaluate `quota` at the clock's current instant
    pub fn capture(quota: &Quota, clock: &dyn Clock) -> Result<Self, QuotaError> {
        Self::at(quota, clock.now())
    }

    /// Evaluate `quota` at `now`
    pub fn at(quota: &Quota, now: DateTime<Utc>) -> Result<Self, QuotaError> {
        Ok(Self {
            captured_at: now,
            start: quota.start,
            end: quota.end(),
            limit: quota.limit,
            used: quota.used,
            available: quota.available(),
            percent_used: quota.percent_used(),
            percent_available: quota.percent_available(),
            percent_elapsed: quota.percent_elapsed(now),
            percent_remaining: quota.percent_remaining(now),
            bytes_per_second: quota.bytes_per_second(now)?,
            leftover: quota.leftover(now)?,
            will_suffice: quota.will_suffice(now)?,
            depletion: quota.depletion(now)?,
        })
    }

    /// Single-line JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Zero counts as left over, matching `will_suffice`
    fn leftover_text(&self) -> String {
        let amount = format_bytes(self.leftover.unsigned_abs());
        if self.leftover >= 0 {
            format!("{} to be left at the end of the interval", amount)
        } else {
            format!("{} to be missing until the end of the interval", amount)
        }
    }

    fn depletion_text(&self) -> String {
        match self.depletion {
            Some(at) => at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            None => "never".to_string(),
        }
    }
}

impl fmt::Display for QuotaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} ({:.0}%) used after {:.0}% of the time ({:.0} bytes/s), estimating {}, depleted {}",
            format_bytes(self.used),
            format_bytes(self.limit),
            self.percent_used,
            self.percent_elapsed,
            self.bytes_per_second,
            self.leftover_text(),
            self.depletion_text(),
        )
    }
}
