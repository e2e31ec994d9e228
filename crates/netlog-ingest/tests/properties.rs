//! Property tests for per-row normalization invariants.

use std::fs;

use netlog_ingest::{load_and_standardize_log, read_raw_log};
use proptest::prelude::*;
use tempfile::TempDir;

fn service_entry() -> impl Strategy<Value = String> {
    "[a-z_]{1,8}"
}

fn byte_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1_000_000).prop_map(|v| v.to_string()),
        Just("-".to_string()),
        Just("(empty)".to_string()),
        Just(String::new()),
        Just("junk".to_string()),
    ]
}

fn conn_row() -> impl Strategy<Value = (Vec<String>, String, String)> {
    (
        prop::collection::vec(service_entry(), 1..4),
        byte_cell(),
        byte_cell(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_conn_rows_expand_to_one_record_per_service(rows in prop::collection::vec(conn_row(), 1..12)) {
        let dir = TempDir::new().unwrap();
        let mut content = String::from("ts,service,orig_bytes,resp_bytes\n");
        for (idx, (services, orig, resp)) in rows.iter().enumerate() {
            content.push_str(&format!(
                "{}.0,\"{}\",{},{}\n",
                1_704_067_200 + idx,
                services.join(","),
                orig,
                resp
            ));
        }
        let path = dir.path().join("conn.log.csv");
        fs::write(&path, &content).unwrap();

        let raw = read_raw_log(&path).unwrap();
        prop_assert_eq!(raw.height(), rows.len());

        let records = load_and_standardize_log(&path).unwrap();
        let expected: usize = rows.iter().map(|(services, _, _)| services.len()).sum();
        prop_assert_eq!(records.len(), expected);
        for record in &records {
            prop_assert_eq!(record.event_count, 1);
            prop_assert!(record.total_bytes >= 0.0);
            prop_assert!(record.datetime.is_some());
        }
    }
}
