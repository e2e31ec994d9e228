//! Event share by application protocol.

use std::collections::BTreeMap;

use netlog_ingest::{
    CombinedDataset, NormalizedRecord, UNKNOWN_LOG_TYPE, UNKNOWN_PROTOCOL, UNKNOWN_SERVICE,
};
use plotly::common::Title;
use plotly::{Layout, Pie, Plot};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::render::{ChartOutput, TAB20, emit};

/// Transport-layer and placeholder labels that are not application protocols.
pub const EXCLUDED_PROTOCOLS: [&str; 8] = [
    "tcp",
    "udp",
    "icmp",
    "arp",
    "unknown_transport",
    UNKNOWN_PROTOCOL,
    UNKNOWN_SERVICE,
    UNKNOWN_LOG_TYPE,
];

/// Number of protocols plotted before the rest is merged into [`OTHER_LABEL`].
pub const TOP_N: usize = 8;

pub const OTHER_LABEL: &str = "other";

pub const PIE_TITLE: &str = "Application Protocol share by event count";

/// Pie start angle in degrees, counter-clockwise from 3 o'clock.
const START_ANGLE: f64 = 90.0;
const PIE_SIZE_PX: usize = 1200;

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolSlice {
    pub protocol: String,
    pub count: u64,
    /// Share of the plotted total, in percent.
    pub percent: f64,
}

/// Slices in plotting order: top protocols by count, then `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProtocolShare {
    pub slices: Vec<ProtocolSlice>,
}

impl ProtocolShare {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.slices.iter().map(|slice| slice.count).sum()
    }
}

/// Sums `event_count` per application protocol.
///
/// Excluded labels are dropped, the remainder sorted by count (descending,
/// ties by protocol name) and everything past [`TOP_N`] merged into `other`.
pub fn aggregate_protocol_share<'a>(
    records: impl IntoIterator<Item = &'a NormalizedRecord>,
) -> ProtocolShare {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        let protocol = record.unified_protocol.as_str();
        if EXCLUDED_PROTOCOLS.contains(&protocol) {
            continue;
        }
        *counts.entry(protocol).or_default() += u64::from(record.event_count);
    }

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(protocol, count)| (protocol.to_string(), count))
        .collect();
    // BTreeMap order is by name, so a stable sort keeps ties alphabetical.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    if ranked.len() > TOP_N {
        let rest = ranked.split_off(TOP_N);
        let other: u64 = rest.iter().map(|(_, count)| count).sum();
        ranked.push((OTHER_LABEL.to_string(), other));
    }

    let total: u64 = ranked.iter().map(|(_, count)| count).sum();
    let slices = ranked
        .into_iter()
        .map(|(protocol, count)| ProtocolSlice {
            percent: percent_of(count, total),
            protocol,
            count,
        })
        .collect();
    ProtocolShare { slices }
}

fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Aggregates the dataset and renders the protocol share pie.
///
/// Returns `Ok(None)` without rendering when no application protocol is left
/// after exclusion.
pub fn plot_protocol_pie(
    dataset: &CombinedDataset,
    output: &ChartOutput,
) -> Result<Option<ProtocolShare>> {
    let share = aggregate_protocol_share(dataset);
    if share.is_empty() {
        info!(
            records = dataset.len(),
            "No application protocol data to plot for pie chart."
        );
        return Ok(None);
    }

    let plot = build_pie(&share);
    emit(&plot, output, PIE_SIZE_PX, PIE_SIZE_PX)?;
    info!(
        slices = share.slices.len(),
        events = share.total(),
        "rendered protocol share pie"
    );
    Ok(Some(share))
}

fn build_pie(share: &ProtocolShare) -> Plot {
    let labels: Vec<String> = share
        .slices
        .iter()
        .map(|slice| slice.protocol.clone())
        .collect();
    let values: Vec<u64> = share.slices.iter().map(|slice| slice.count).collect();

    // Plotly's first slice starts at 12 o'clock, i.e. at rotation 0.
    let trace = Pie::new(values)
        .labels(labels)
        .text_template("%{label}<br>%{percent:.1%}")
        .rotation(90.0 - START_ANGLE)
        .sort(false);

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title(Title::from(PIE_TITLE))
            .colorway(TAB20.to_vec())
            .width(PIE_SIZE_PX)
            .height(PIE_SIZE_PX),
    );
    plot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(counts: &[(&str, usize)]) -> Vec<NormalizedRecord> {
        counts
            .iter()
            .flat_map(|(protocol, count)| {
                std::iter::repeat_n(
                    NormalizedRecord {
                        datetime: None,
                        unified_protocol: (*protocol).to_string(),
                        total_bytes: 0.0,
                        event_count: 1,
                    },
                    *count,
                )
            })
            .collect()
    }

    #[test]
    fn test_ties_break_by_name() {
        let records = records(&[("ssl", 2), ("dns", 2), ("http", 3)]);
        let share = aggregate_protocol_share(&records);

        let order: Vec<&str> = share.slices.iter().map(|s| s.protocol.as_str()).collect();
        assert_eq!(order, vec!["http", "dns", "ssl"]);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let records = records(&[("dns", 1), ("http", 2)]);
        let share = aggregate_protocol_share(&records);

        let sum: f64 = share.slices.iter().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((share.slices[0].percent - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_exactly_top_n_has_no_other() {
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let counts: Vec<(&str, usize)> = names.iter().map(|n| (*n, 1)).collect();
        let share = aggregate_protocol_share(&records(&counts));

        assert_eq!(share.slices.len(), TOP_N);
        assert!(share.slices.iter().all(|s| s.protocol != OTHER_LABEL));
    }
}
