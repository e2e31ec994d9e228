//! Event volume over time.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use netlog_ingest::NormalizedRecord;
use plotly::common::{Line, Mode, Title};
use plotly::layout::{Axis, Legend};
use plotly::{Layout, Plot, Scatter};
use tracing::info;

use crate::error::{ReportError, Result};
use crate::render::{ChartOutput, TAB20, emit};

/// Upper bound on the number of buckets a single resample may produce.
pub const MAX_BUCKETS: usize = 1_000_000;

const LINE_WIDTH_PX: usize = 1800;
const LINE_HEIGHT_PX: usize = 750;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Fixed resample interval, written as an offset alias such as `30S` or `5min`.
///
/// Accepted units: `ms`/`L` (milliseconds), `S`/`s`/`sec` (seconds),
/// `min`/`T` (minutes), `H`/`h` (hours) and `D`/`d` (days). A missing count
/// means 1 and a missing unit means seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketWidth {
    alias: String,
    delta: TimeDelta,
}

impl BucketWidth {
    pub fn delta(&self) -> TimeDelta {
        self.delta
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self {
            alias: "30S".to_string(),
            delta: TimeDelta::seconds(30),
        }
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alias)
    }
}

impl FromStr for BucketWidth {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = |reason| ReportError::InvalidBucketWidth {
            value: value.to_string(),
            reason,
        };
        let alias = value.trim();
        let split = alias
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(alias.len());
        let (count, unit) = alias.split_at(split);
        if count.is_empty() && unit.is_empty() {
            return Err(invalid("empty width"));
        }
        let count: i64 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid("count out of range"))?
        };
        if count == 0 {
            return Err(invalid("width must be positive"));
        }
        let delta = match unit {
            "ms" | "L" => TimeDelta::try_milliseconds(count),
            "" | "S" | "s" | "sec" => TimeDelta::try_seconds(count),
            "min" | "T" => TimeDelta::try_minutes(count),
            "H" | "h" => TimeDelta::try_hours(count),
            "D" | "d" => TimeDelta::try_days(count),
            _ => return Err(invalid("unknown unit")),
        }
        .ok_or_else(|| invalid("count out of range"))?;
        Ok(Self {
            alias: alias.to_string(),
            delta,
        })
    }
}

/// One resample bucket `[start, start + width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub start: NaiveDateTime,
    pub count: u64,
}

/// Dense bucket series: consecutive buckets, empty ones included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBuckets {
    pub width: TimeDelta,
    pub buckets: Vec<Bucket>,
}

impl TimeBuckets {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }
}

/// Sums `event_count` into left-closed buckets of `width`.
///
/// Records without a datetime are dropped; `Ok(None)` means none were left.
/// Buckets are laid out from midnight of the earliest event's day, so for
/// widths that divide a day they sit on wall-clock boundaries. The series
/// starts at the bucket holding the earliest event and ends at the one
/// holding the latest.
pub fn resample_event_counts<'a>(
    records: impl IntoIterator<Item = &'a NormalizedRecord>,
    width: &BucketWidth,
) -> Result<Option<TimeBuckets>> {
    let mut events: Vec<(NaiveDateTime, u32)> = records
        .into_iter()
        .filter_map(|record| record.datetime.map(|dt| (dt, record.event_count)))
        .collect();
    if events.is_empty() {
        return Ok(None);
    }
    events.sort_by_key(|(dt, _)| *dt);

    let step = width
        .delta()
        .num_nanoseconds()
        .filter(|nanos| *nanos > 0)
        .ok_or_else(|| ReportError::Resample {
            message: format!("bucket width {width} is not representable"),
        })?;
    let origin = events[0].0.date().and_time(NaiveTime::MIN);
    let bucket_index = |dt: NaiveDateTime| -> Result<i64> {
        (dt - origin)
            .num_nanoseconds()
            .map(|offset| offset.div_euclid(step))
            .ok_or_else(|| ReportError::Resample {
                message: format!("timestamp {dt} too far from {origin}"),
            })
    };

    let first = bucket_index(events[0].0)?;
    let last = bucket_index(events[events.len() - 1].0)?;
    let span = usize::try_from(last - first)
        .ok()
        .and_then(|span| span.checked_add(1))
        .filter(|len| *len <= MAX_BUCKETS)
        .ok_or_else(|| ReportError::Resample {
            message: format!(
                "{} to {} at {width} needs more than {MAX_BUCKETS} buckets",
                events[0].0,
                events[events.len() - 1].0
            ),
        })?;

    let mut counts = vec![0u64; span];
    for (dt, count) in &events {
        let slot = (bucket_index(*dt)? - first) as usize;
        counts[slot] += u64::from(*count);
    }

    let first_start = origin + TimeDelta::nanoseconds(first * step);
    let buckets = counts
        .into_iter()
        .enumerate()
        .map(|(offset, count)| Bucket {
            start: first_start + TimeDelta::nanoseconds(offset as i64 * step),
            count,
        })
        .collect();
    Ok(Some(TimeBuckets {
        width: width.delta(),
        buckets,
    }))
}

/// Resamples the records and renders the connections line chart.
///
/// Returns `Ok(None)` without rendering when there are no valid timestamps
/// or the resample produced no buckets.
pub fn plot_connections_over_time<'a>(
    records: impl IntoIterator<Item = &'a NormalizedRecord>,
    width: &BucketWidth,
    output: &ChartOutput,
) -> Result<Option<TimeBuckets>> {
    let Some(series) = resample_event_counts(records, width)? else {
        info!("No valid timestamps found for line chart.");
        return Ok(None);
    };
    if series.is_empty() {
        info!(bin = %width, "No data after resampling for the selected frequency.");
        return Ok(None);
    }

    let plot = build_line(&series, width);
    emit(&plot, output, LINE_WIDTH_PX, LINE_HEIGHT_PX)?;
    info!(
        bin = %width,
        buckets = series.buckets.len(),
        events = series.total(),
        "rendered connections line chart"
    );
    Ok(Some(series))
}

fn build_line(series: &TimeBuckets, width: &BucketWidth) -> Plot {
    let x: Vec<String> = series
        .buckets
        .iter()
        .map(|bucket| bucket.start.format(TIME_FORMAT).to_string())
        .collect();
    let y: Vec<u64> = series.buckets.iter().map(|bucket| bucket.count).collect();

    let trace = Scatter::new(x, y)
        .mode(Mode::Lines)
        .name("Connections")
        .line(Line::new().color(TAB20[0]));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title(Title::from(
                format!("Connections over time (bin={width})").as_str(),
            ))
            .x_axis(Axis::new().title(Title::from("Time")))
            .y_axis(Axis::new().title(Title::from("Connections (count)")))
            .show_legend(true)
            .legend(Legend::new().x(0.0).y(1.0))
            .width(LINE_WIDTH_PX)
            .height(LINE_HEIGHT_PX),
    );
    plot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_width() {
        let cases = [
            ("30S", TimeDelta::seconds(30)),
            ("30s", TimeDelta::seconds(30)),
            ("45", TimeDelta::seconds(45)),
            ("5min", TimeDelta::minutes(5)),
            ("5T", TimeDelta::minutes(5)),
            ("1H", TimeDelta::hours(1)),
            ("D", TimeDelta::days(1)),
            ("500ms", TimeDelta::milliseconds(500)),
        ];
        for (alias, expected) in cases {
            let width: BucketWidth = alias.parse().unwrap();
            assert_eq!(width.delta(), expected, "{alias}");
            assert_eq!(width.to_string(), alias);
        }
    }

    #[test]
    fn test_parse_bucket_width_rejects_invalid() {
        for alias in ["", "0S", "10 parsecs", "-5S", "99999999999999999999S"] {
            assert!(
                matches!(
                    alias.parse::<BucketWidth>(),
                    Err(ReportError::InvalidBucketWidth { .. })
                ),
                "{alias}"
            );
        }
    }

    #[test]
    fn test_default_width() {
        assert_eq!(BucketWidth::default(), "30S".parse().unwrap());
    }
}
