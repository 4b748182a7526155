//! Quota model - one billing period's allowance, consumption and projections
//!
//! Every time-relative metric takes `now` explicitly; see [`super::Clock`].

use chrono::{DateTime, Months, NaiveDate, NaiveTime, TimeDelta, Utc};

use super::QuotaError;

/// Data allowance and consumption for one billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// First day of the billing period
    pub start: NaiveDate,

    /// Bytes allowed for the period
    pub limit: u64,

    /// Bytes consumed so far
    pub used: u64,
}

impl Quota {
    pub fn new(start: NaiveDate, limit: u64, used: u64) -> Self {
        Self { start, limit, used }
    }

    /// Last day of the period (exclusive): start plus one calendar month.
    ///
    /// Days missing from the next month clamp to its last day, so Jan 31
    /// ends on Feb 28/29.
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Start of the period as an instant (midnight UTC)
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// End of the period as an instant (midnight UTC)
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end().and_time(NaiveTime::MIN).and_utc()
    }

    pub fn duration(&self) -> TimeDelta {
        self.end_time() - self.start_time()
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.start_time()
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        self.end_time() - now
    }

    pub fn percent_elapsed(&self, now: DateTime<Utc>) -> f64 {
        100.0 * seconds(self.elapsed(now)) / seconds(self.duration())
    }

    pub fn percent_remaining(&self, now: DateTime<Utc>) -> f64 {
        100.0 * seconds(self.remaining(now)) / seconds(self.duration())
    }

    /// Bytes still available; zero once usage exceeds the limit
    pub fn available(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }

    pub fn percent_used(&self) -> f64 {
        if self.limit > 0 {
            100.0 * self.used as f64 / self.limit as f64
        } else {
            100.0
        }
    }

    pub fn percent_available(&self) -> f64 {
        if self.limit > 0 {
            100.0 * self.available() as f64 / self.limit as f64
        } else {
            0.0
        }
    }

    /// Average consumption since the period started.
    ///
    /// Fails with [`QuotaError::NoElapsedTime`] when `now` is not after the start.
    pub fn bytes_per_second(&self, now: DateTime<Utc>) -> Result<f64, QuotaError> {
        let elapsed = seconds(self.elapsed(now));
        if elapsed <= 0.0 {
            return Err(QuotaError::NoElapsedTime { start: self.start });
        }
        Ok(self.used as f64 / elapsed)
    }

    /// Projected consumption over `span` at the current rate. Negative spans count as zero.
    pub fn usage_over(&self, span: TimeDelta, now: DateTime<Utc>) -> Result<u64, QuotaError> {
        let rate = self.bytes_per_second(now)?;
        Ok((rate * seconds(span).max(0.0)) as u64)
    }

    /// How long `bytes` last at the current rate.
    ///
    /// `None` when nothing is being consumed, or when the rate is so low that
    /// the span does not fit in a [`TimeDelta`].
    pub fn sufficient_for(
        &self,
        bytes: u64,
        now: DateTime<Utc>,
    ) -> Result<Option<TimeDelta>, QuotaError> {
        let rate = self.bytes_per_second(now)?;
        if rate <= 0.0 {
            return Ok(None);
        }
        let millis = bytes as f64 / rate * 1000.0;
        if millis >= i64::MAX as f64 {
            return Ok(None);
        }
        Ok(TimeDelta::try_milliseconds(millis as i64))
    }

    /// Projected surplus (positive) or deficit (negative) at the end of the period
    pub fn leftover(&self, now: DateTime<Utc>) -> Result<i64, QuotaError> {
        let projected = self.usage_over(self.remaining(now), now)?;
        Ok(to_signed(self.available()) - to_signed(projected))
    }

    /// When the available bytes run out at the current rate.
    ///
    /// `None` means never: no consumption, or a depletion instant beyond what
    /// a [`DateTime`] can represent.
    pub fn depletion(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, QuotaError> {
        let lasts = self.sufficient_for(self.available(), now)?;
        Ok(lasts.and_then(|d| now.checked_add_signed(d)))
    }

    pub fn will_suffice(&self, now: DateTime<Utc>) -> Result<bool, QuotaError> {
        Ok(self.leftover(now)? >= 0)
    }
}

fn seconds(d: TimeDelta) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

fn to_signed(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}
