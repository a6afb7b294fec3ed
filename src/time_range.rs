use crate::error::BillingNotifierError;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::convert::TryFrom;

/// Reporting window: the calendar day before `now`, evaluated in UTC+9.
#[derive(Debug, PartialEq)]
pub struct TimeRange {
    pub start: chrono::DateTime<Utc>,
    pub end: chrono::DateTime<Utc>,
}

impl TryFrom<DateTime<Utc>> for TimeRange {
    type Error = BillingNotifierError;

    fn try_from(date_time: DateTime<Utc>) -> Result<Self, Self::Error> {
        let tokyo =
            FixedOffset::east_opt(9 * 3600).ok_or(BillingNotifierError::InvalidTimeRange)?;
        let now: DateTime<FixedOffset> = date_time.with_timezone(&tokyo);
        let yesterday = now
            .date_naive()
            .pred_opt()
            .ok_or(BillingNotifierError::InvalidTimeRange)?;

        let start = tokyo
            .from_local_datetime(
                &yesterday
                    .and_hms_opt(0, 0, 0)
                    .ok_or(BillingNotifierError::InvalidTimeRange)?,
            )
            .single()
            .ok_or(BillingNotifierError::InvalidTimeRange)?;

        // End bound is inclusive-of-day: the last whole second of yesterday.
        let end = tokyo
            .from_local_datetime(
                &yesterday
                    .and_hms_opt(23, 59, 59)
                    .ok_or(BillingNotifierError::InvalidTimeRange)?,
            )
            .single()
            .ok_or(BillingNotifierError::InvalidTimeRange)?;

        Ok(TimeRange {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        })
    }
}
