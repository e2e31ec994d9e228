//! Reduction of a raw log export to [`NormalizedRecord`]s.
//!
//! Each output field is resolved by an ordered rule table of
//! `(condition, source)` pairs. Conditions only look at the file (its name
//! and header), so a rule is picked once per file and then applied to every
//! row. The first matching rule wins.
//!
//! # Protocol resolution
//!
//! 1. Connection log with a `service` column: comma-separated service list,
//!    one record per entry
//! 2. `proto` column, lowercased
//! 3. Log type from the file name
//! 4. `unknown_log_type`
//!
//! # Byte resolution
//!
//! 1. `orig_bytes` + `resp_bytes` (missing side counts as 0)
//! 2. `response_body_len`
//! 3. `total_bytes` of the file-transfer log
//! 4. 0

use chrono::NaiveDateTime;

use crate::csv::RawLog;
use crate::record::NormalizedRecord;
use crate::values::{coerce_bytes, epoch_to_datetime, parse_f64};

/// Label for connection rows without a service.
pub const UNKNOWN_SERVICE: &str = "unknown_service";
/// Label for rows whose `proto` cell is missing.
pub const UNKNOWN_PROTOCOL: &str = "unknown_protocol";
/// Label for files whose name yields no log type.
pub const UNKNOWN_LOG_TYPE: &str = "unknown_log_type";

const EVENT_COUNT: u32 = 1;

type Condition = fn(&RawLog) -> bool;

/// Where the `unified_protocol` values of a file come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolSource {
    /// Exploded `service` list of the connection log.
    ServiceList,
    /// Generic `proto` column.
    Proto,
    /// Log type derived from the file name.
    LogType,
    /// Nothing usable.
    UnknownLogType,
}

/// Where the `total_bytes` values of a file come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSource {
    OrigPlusResp,
    ResponseBodyLen,
    FileTotalBytes,
    Zero,
}

const PROTOCOL_RULES: [(Condition, ProtocolSource); 4] = [
    (has_service_list, ProtocolSource::ServiceList),
    (has_proto, ProtocolSource::Proto),
    (has_log_type, ProtocolSource::LogType),
    (always, ProtocolSource::UnknownLogType),
];

const BYTE_RULES: [(Condition, ByteSource); 4] = [
    (has_orig_and_resp_bytes, ByteSource::OrigPlusResp),
    (has_response_body_len, ByteSource::ResponseBodyLen),
    (has_file_total_bytes, ByteSource::FileTotalBytes),
    (always, ByteSource::Zero),
];

fn has_service_list(raw: &RawLog) -> bool {
    raw.source.is_conn() && raw.has_column("service")
}

fn has_proto(raw: &RawLog) -> bool {
    raw.has_column("proto")
}

fn has_log_type(raw: &RawLog) -> bool {
    !raw.source.log_type.is_empty()
}

fn has_orig_and_resp_bytes(raw: &RawLog) -> bool {
    raw.has_column("orig_bytes") && raw.has_column("resp_bytes")
}

fn has_response_body_len(raw: &RawLog) -> bool {
    raw.has_column("response_body_len")
}

fn has_file_total_bytes(raw: &RawLog) -> bool {
    raw.source.is_files() && raw.has_column("total_bytes")
}

fn always(_: &RawLog) -> bool {
    true
}

fn first_match<T: Copy>(rules: &[(Condition, T)], raw: &RawLog) -> Option<T> {
    rules
        .iter()
        .find(|(condition, _)| condition(raw))
        .map(|(_, source)| *source)
}

impl ProtocolSource {
    pub fn resolve(raw: &RawLog) -> Self {
        first_match(&PROTOCOL_RULES, raw).unwrap_or(Self::UnknownLogType)
    }
}

impl ByteSource {
    pub fn resolve(raw: &RawLog) -> Self {
        first_match(&BYTE_RULES, raw).unwrap_or(Self::Zero)
    }
}

/// Per-row protocol labels of one file.
enum ProtocolValues {
    Services(Vec<Option<String>>),
    Protos(Vec<Option<String>>),
    Constant(String),
}

impl ProtocolValues {
    fn extract(raw: &RawLog, source: ProtocolSource) -> Self {
        match source {
            ProtocolSource::ServiceList => {
                Self::Services(raw.text_column("service").unwrap_or_default())
            }
            ProtocolSource::Proto => Self::Protos(raw.text_column("proto").unwrap_or_default()),
            ProtocolSource::LogType => Self::Constant(raw.source.log_type.to_lowercase()),
            ProtocolSource::UnknownLogType => Self::Constant(UNKNOWN_LOG_TYPE.to_string()),
        }
    }

    fn for_row(&self, row: usize) -> Vec<String> {
        match self {
            Self::Services(values) => split_service_list(cell(values, row)),
            Self::Protos(values) => vec![
                cell(values, row)
                    .map(str::to_lowercase)
                    .unwrap_or_else(|| UNKNOWN_PROTOCOL.to_string()),
            ],
            Self::Constant(label) => vec![label.clone()],
        }
    }
}

fn cell(values: &[Option<String>], row: usize) -> Option<&str> {
    values.get(row).and_then(Option::as_deref)
}

/// Splits a `service` cell like `"gssapi,DCE_RPC"` into lowercase entries.
///
/// Blank entries are dropped rather than exploded into empty labels, so
/// `"http,"` yields only `http`. A missing cell, or one with only blank
/// entries, yields `unknown_service`.
fn split_service_list(value: Option<&str>) -> Vec<String> {
    let entries: Vec<String> = value
        .unwrap_or("")
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect();
    if entries.is_empty() {
        vec![UNKNOWN_SERVICE.to_string()]
    } else {
        entries
    }
}

fn numeric_column(raw: &RawLog, name: &str) -> Vec<Option<f64>> {
    match raw.text_column(name) {
        Some(values) => values
            .iter()
            .map(|value| value.as_deref().and_then(parse_f64))
            .collect(),
        None => vec![None; raw.height()],
    }
}

fn byte_values(raw: &RawLog, source: ByteSource) -> Vec<f64> {
    let single = |name: &str| -> Vec<f64> {
        numeric_column(raw, name)
            .into_iter()
            .map(|value| coerce_bytes(value.unwrap_or(0.0)))
            .collect()
    };
    match source {
        ByteSource::OrigPlusResp => single("orig_bytes")
            .into_iter()
            .zip(single("resp_bytes"))
            .map(|(orig, resp)| orig + resp)
            .collect(),
        ByteSource::ResponseBodyLen => single("response_body_len"),
        ByteSource::FileTotalBytes => single("total_bytes"),
        ByteSource::Zero => vec![0.0; raw.height()],
    }
}

fn datetime_values(raw: &RawLog) -> Vec<Option<NaiveDateTime>> {
    numeric_column(raw, "ts")
        .into_iter()
        .map(|seconds| seconds.and_then(epoch_to_datetime))
        .collect()
}

/// Normalizes one raw export into its records.
///
/// Records come out in row order; an exploded row yields its entries
/// consecutively in list order. Unresolvable cells default, so this never fails.
pub fn normalize_log(raw: &RawLog) -> impl Iterator<Item = NormalizedRecord> {
    let protocol_source = ProtocolSource::resolve(raw);
    let byte_source = ByteSource::resolve(raw);
    tracing::debug!(
        file = %raw.source.file_name,
        log_type = %raw.source.log_type,
        ?protocol_source,
        ?byte_source,
        "resolved normalization rules"
    );

    let protocols = ProtocolValues::extract(raw, protocol_source);
    let bytes = byte_values(raw, byte_source);
    let datetimes = datetime_values(raw);

    (0..raw.height()).flat_map(move |row| {
        let datetime = datetimes.get(row).copied().flatten();
        let total_bytes = bytes.get(row).copied().unwrap_or(0.0);
        protocols
            .for_row(row)
            .into_iter()
            .map(move |unified_protocol| NormalizedRecord {
                datetime,
                unified_protocol,
                total_bytes,
                event_count: EVENT_COUNT,
            })
    })
}
