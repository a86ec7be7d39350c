//! Integration tests for reconciliation-core

use bigdecimal::BigDecimal;
use reconciliation_core::{
    check_report_integrity, reconcile, utils::MemorySource, AmountIssue, ColumnMapping, LedgerSide,
    RecordParser, ReconError, ReconciliationConfig, ReconciliationEngine,
};
use std::collections::HashMap;
use std::str::FromStr;

const DDIN_EXPORT: &str = "\
Date,Transaction_reference,Service_name,Amount,Phone
2024-05-02 08:14:09,DD-1001,Airtime,1000,0788000001
2024-05-02 08:20:44,DD-1002,Electricity,15000.50,0788000002
2024-05-02 09:01:10,DD-1003,Water,n/a,0788000003
2024-05-02 09:30:00,DD-1004,Airtime,500,0788000004
,,,,
2024-05-02 10:00:00,DD-1002,Electricity,200,0788000002
";

const EFASHE_EXPORT: &str = "\
Date,Transaction_reference,Service_name,Amount,Status
2024-05-02 08:14:11,DD-1001,Airtime,1000,SUCCESS
2024-05-02 08:20:50,DD-1002,Electricity,15000.00,SUCCESS
2024-05-02 09:31:00,DD-1004,Airtime,450,SUCCESS
2024-05-02 11:00:00,EF-9001,TV,7000,SUCCESS
";

#[test]
fn test_reference_scenario() {
    let parser = RecordParser::default();
    let row = |reference: &str, amount: &str| {
        HashMap::from([
            ("Transaction_reference".to_string(), reference.to_string()),
            ("Amount".to_string(), amount.to_string()),
        ])
    };

    let a = parser.parse_rows(LedgerSide::A, "A", vec![row("T1", "100"), row("T2", "50")]);
    let b = parser.parse_rows(LedgerSide::B, "B", vec![row("T1", "100"), row("T3", "30")]);

    let report = reconcile(&a, &b);

    assert_eq!(report.matched().len(), 1);
    let pair = &report.matched()[0];
    assert_eq!(pair.reference(), "T1");
    assert_eq!(pair.amount_a(), &BigDecimal::from(100));
    assert_eq!(pair.amount_b(), &BigDecimal::from(100));

    assert_eq!(report.unmatched_a().len(), 1);
    assert_eq!(report.unmatched_a()[0].record.reference, "T2");
    assert_eq!(report.unmatched_a()[0].record.amount, BigDecimal::from(50));
    assert_eq!(report.unmatched_b().len(), 1);
    assert_eq!(report.unmatched_b()[0].record.reference, "T3");
    assert_eq!(report.unmatched_b()[0].record.amount, BigDecimal::from(30));

    let totals = report.totals();
    assert_eq!(totals.total_a, BigDecimal::from(150));
    assert_eq!(totals.total_b, BigDecimal::from(130));
    assert_eq!(totals.matched_a, BigDecimal::from(100));
    assert_eq!(totals.matched_b, BigDecimal::from(100));
    assert_eq!(totals.unmatched_a, BigDecimal::from(50));
    assert_eq!(totals.unmatched_b, BigDecimal::from(30));
}

#[test]
fn test_complete_reconciliation_workflow() {
    let engine = ReconciliationEngine::with_config(
        ReconciliationConfig::new().labels("DDIN", "Efashe"),
    )
    .unwrap();

    let report = engine
        .reconcile_csv(DDIN_EXPORT.as_bytes(), EFASHE_EXPORT.as_bytes())
        .unwrap();

    // DD-1002 appears twice in DDIN; both rows pair with the single Efashe row
    let matched: Vec<(&str, usize)> = report
        .matched()
        .iter()
        .map(|p| (p.reference(), p.counterpart_position))
        .collect();
    assert_eq!(
        matched,
        vec![("DD-1001", 0), ("DD-1002", 1), ("DD-1004", 2), ("DD-1002", 1)]
    );

    let unmatched: Vec<(&str, &str)> = report
        .unmatched()
        .map(|u| (u.source.as_str(), u.record.reference.as_str()))
        .collect();
    assert_eq!(unmatched, vec![("DDIN", "DD-1003"), ("Efashe", "EF-9001")]);

    // the malformed amount counts as zero and is surfaced
    let summary_a = report.parse_summary(LedgerSide::A);
    assert_eq!(summary_a.rows, 5);
    assert_eq!(summary_a.skipped_rows, 1);
    assert_eq!(summary_a.amount_warnings, 1);

    let totals = report.totals();
    assert_eq!(totals.total_a, BigDecimal::from_str("16700.50").unwrap());
    assert_eq!(totals.matched_a, BigDecimal::from_str("16700.50").unwrap());
    assert_eq!(totals.unmatched_a, BigDecimal::from(0));
    assert_eq!(totals.total_b, BigDecimal::from(23450));
    assert_eq!(totals.matched_b, BigDecimal::from(31450));
    assert_eq!(totals.unmatched_b, BigDecimal::from(7000));
    assert!(totals.a_balances());
    assert!(!totals.b_balances());

    let discrepancies: Vec<&str> = report.discrepancies().map(|p| p.reference()).collect();
    assert_eq!(discrepancies, vec!["DD-1002", "DD-1004", "DD-1002"]);

    let integrity = check_report_integrity(&report);
    assert!(!integrity.is_consistent);
    assert_eq!(integrity.shared_counterparts, 1);
    assert_eq!(integrity.shadowed_b_records, 0);
    assert_eq!(integrity.amount_warnings, 1);
    assert_eq!(integrity.amount_discrepancies, 3);

    let comparison = report.comparison();
    assert_eq!(comparison.len(), 5);
    assert_eq!(comparison[2].record.reference, "DD-1003");
    assert!(comparison[2].counterpart_amount.is_none());
    assert_eq!(comparison[4].counterpart_amount, Some(&BigDecimal::from_str("15000.00").unwrap()));

    let pair = &report.matched()[0];
    assert_eq!(pair.record.field("Phone"), Some("0788000001"));
    assert_eq!(pair.counterpart.field("Status"), Some("SUCCESS"));
    assert!(pair.record.date.as_timestamp().is_some());
}

#[test]
fn test_empty_ledger_a_against_non_empty_b() {
    let engine = ReconciliationEngine::new();
    let report = engine
        .reconcile_csv(
            "Transaction_reference,Amount\n".as_bytes(),
            EFASHE_EXPORT.as_bytes(),
        )
        .unwrap();

    assert!(report.matched().is_empty());
    assert!(report.unmatched_a().is_empty());
    assert_eq!(report.unmatched_b().len(), 4);
    assert_eq!(report.totals().total_a, BigDecimal::from(0));
    assert_eq!(report.totals().unmatched_b, report.totals().total_b);
}

#[test]
fn test_unreadable_input_aborts_before_matching() {
    let engine = ReconciliationEngine::new();
    let result = engine.reconcile_csv("".as_bytes(), EFASHE_EXPORT.as_bytes());

    match result {
        Err(ReconError::InputFormat(message)) => assert!(message.contains("A")),
        other => panic!("expected input format error, got {:?}", other.map(|r| r.id())),
    }
}

#[test]
fn test_exponent_amount_is_reported_not_expanded() {
    let engine = ReconciliationEngine::new();
    let a = "Transaction_reference,Amount\nT1,1e200000000\nT2,0.01\n";
    let b = "Transaction_reference,Amount\nT1,1\n";

    let report = engine.reconcile_csv(a.as_bytes(), b.as_bytes()).unwrap();

    assert_eq!(report.parse_summary(LedgerSide::A).amount_warnings, 1);
    assert_eq!(report.matched()[0].amount_a(), &BigDecimal::from(0));
    assert_eq!(report.totals().total_a, BigDecimal::from_str("0.01").unwrap());
    assert_eq!(report.totals().matched_b, BigDecimal::from(1));
}

#[test]
fn test_custom_column_mapping() {
    let columns = ColumnMapping {
        reference: "Ref".to_string(),
        amount: "Value".to_string(),
        date: "When".to_string(),
        service_name: "Product".to_string(),
    };
    let engine = ReconciliationEngine::with_config(
        ReconciliationConfig::new().columns(columns).delimiter(b'\t'),
    )
    .unwrap();

    let a = "Ref\tValue\tWhen\tProduct\nX1\t10\t2024-01-01\tGas\nX2\tbad\t2024-01-02\tGas\n";
    let b = "Ref\tValue\tWhen\tProduct\nX1\t10\t2024-01-01\tGas\n";

    let report = engine.reconcile_csv(a.as_bytes(), b.as_bytes()).unwrap();

    assert_eq!(report.matched().len(), 1);
    assert_eq!(report.matched()[0].record.service_name, "Gas");
    assert_eq!(report.unmatched_a()[0].record.reference, "X2");
    assert!(!report.is_fully_matched());

    let parsed = engine
        .parse_ledger(LedgerSide::A, a.as_bytes())
        .unwrap();
    assert_eq!(parsed.warnings[0].issue, AmountIssue::Invalid);
    assert_eq!(parsed.warnings[0].column, "Value");
}

#[test]
fn test_repeated_runs_are_independent() {
    let engine = ReconciliationEngine::new();

    let first = engine
        .reconcile_csv(DDIN_EXPORT.as_bytes(), EFASHE_EXPORT.as_bytes())
        .unwrap();
    let second = engine
        .reconcile_csv(DDIN_EXPORT.as_bytes(), EFASHE_EXPORT.as_bytes())
        .unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(first.matched(), second.matched());
    assert_eq!(first.unmatched_a(), second.unmatched_a());
    assert_eq!(first.unmatched_b(), second.unmatched_b());
    assert_eq!(first.totals(), second.totals());
}

#[tokio::test]
async fn test_reconcile_from_sources() {
    let engine = ReconciliationEngine::with_config(
        ReconciliationConfig::new().labels("DDIN", "Efashe"),
    )
    .unwrap();

    let ddin = MemorySource::from_csv("ddin.csv", DDIN_EXPORT);
    let efashe = MemorySource::from_csv("efashe.csv", EFASHE_EXPORT);

    let report = engine.reconcile_sources(&ddin, &efashe).await.unwrap();

    assert_eq!(report.matched().len(), 4);
    assert_eq!(report.label(LedgerSide::B), "Efashe");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["label_a"], "DDIN");
    assert_eq!(json["parse_a"]["amount_warnings"], 1);
}
