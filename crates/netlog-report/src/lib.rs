//! Charts over normalized network log records.
//!
//! Two independent reports consume the output of `netlog-ingest`:
//!
//! - [`plot_protocol_pie`]: share of events per application protocol
//! - [`plot_connections_over_time`]: event volume per fixed time bucket
//!
//! Both return the aggregated data they plotted, or `None` when there was
//! nothing to plot (the skip is logged, not raised).

mod error;
mod protocol_share;
mod render;
mod timeline;

pub use error::{ReportError, Result};
pub use protocol_share::{
    EXCLUDED_PROTOCOLS, OTHER_LABEL, PIE_TITLE, ProtocolShare, ProtocolSlice, TOP_N,
    aggregate_protocol_share, plot_protocol_pie,
};
pub use render::{ChartOutput, ImageFormat, KALEIDO_PATH_ENV, TAB20, kaleido_executable};
pub use timeline::{
    Bucket, BucketWidth, MAX_BUCKETS, TimeBuckets, plot_connections_over_time,
    resample_event_counts,
};
