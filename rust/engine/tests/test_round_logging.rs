use std::fs;

use coup_engine::logger::{RoundLogger, RoundRecord};
use coup_engine::shoe::Shoe;

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rounds/out.jsonl");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    let mut shoe = Shoe::new_with_seed(5);
    for _ in 0..3 {
        let id = logger.next_id();
        let coup = shoe.deal_coup();
        logger
            .write(&RoundRecord::from_coup(id, Some(5), &coup))
            .expect("write");
    }
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));

    let content = String::from_utf8(bytes).unwrap();
    let records: Vec<RoundRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid record"))
        .collect();
    assert_eq!(records.len(), 3);
    assert!(records[2].round_id.ends_with("-000003"));
    assert!(records.iter().all(|r| r.ts.is_some()));
}

#[test]
fn sequential_ids_increment() {
    let mut logger = RoundLogger::with_seq_for_test("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
}

#[test]
fn preset_timestamp_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ts.jsonl");
    let mut logger = RoundLogger::create(&path).unwrap();
    let coup = Shoe::new_with_seed(8).deal_coup();
    let rec = RoundRecord {
        ts: Some("2030-01-01T00:00:00Z".to_string()),
        ..RoundRecord::from_coup("20300101-000001".into(), None, &coup)
    };
    logger.write(&rec).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("2030-01-01T00:00:00Z"));
}
