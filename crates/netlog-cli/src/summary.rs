use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use netlog_report::{BucketWidth, OTHER_LABEL, ProtocolShare, TimeBuckets};

/// How report summaries are printed to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    #[default]
    Table,
    Json,
}

pub fn print_protocol_share(share: &ProtocolShare, format: SummaryFormat) -> Result<()> {
    match format {
        SummaryFormat::Table => println!("{}", protocol_share_table(share)),
        SummaryFormat::Json => {
            let json = serde_json::to_string_pretty(share).context("serialize protocol share")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn protocol_share_table(share: &ProtocolShare) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Protocol"),
        header_cell("Events"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for slice in &share.slices {
        let protocol = if slice.protocol == OTHER_LABEL {
            Cell::new(&slice.protocol).add_attribute(Attribute::Dim)
        } else {
            Cell::new(&slice.protocol)
        };
        table.add_row(vec![
            protocol,
            Cell::new(slice.count),
            Cell::new(format!("{:.1}%", slice.percent)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(share.total()).add_attribute(Attribute::Bold),
        Cell::new("100.0%").add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn print_timeline(series: &TimeBuckets, width: &BucketWidth) {
    println!("{}", timeline_table(series, width));
}

pub fn timeline_table(series: &TimeBuckets, width: &BucketWidth) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Bin"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let first = series.buckets.first().map(|b| b.start.to_string());
    let last = series.buckets.last().map(|b| b.start.to_string());
    let peak = series.buckets.iter().max_by_key(|b| b.count);
    let empty = series.buckets.iter().filter(|b| b.count == 0).count();

    table.add_row(vec![Cell::new("Width"), Cell::new(width)]);
    table.add_row(vec![Cell::new("Buckets"), Cell::new(series.buckets.len())]);
    table.add_row(vec![Cell::new("Empty buckets"), Cell::new(empty)]);
    table.add_row(vec![
        Cell::new("First bucket"),
        Cell::new(first.unwrap_or_default()),
    ]);
    table.add_row(vec![
        Cell::new("Last bucket"),
        Cell::new(last.unwrap_or_default()),
    ]);
    if let Some(peak) = peak {
        table.add_row(vec![
            Cell::new("Peak"),
            Cell::new(format!("{} at {}", peak.count, peak.start)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Connections")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(series.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlog_report::ProtocolSlice;

    #[test]
    fn test_protocol_share_table_lists_slices_and_total() {
        let share = ProtocolShare {
            slices: vec![
                ProtocolSlice {
                    protocol: "dns".to_string(),
                    count: 3,
                    percent: 75.0,
                },
                ProtocolSlice {
                    protocol: OTHER_LABEL.to_string(),
                    count: 1,
                    percent: 25.0,
                },
            ],
        };

        let rendered = protocol_share_table(&share).to_string();
        assert!(rendered.contains("dns"));
        assert!(rendered.contains("75.0%"));
        assert!(rendered.contains("other"));
        assert!(rendered.contains("TOTAL"));
    }
}
