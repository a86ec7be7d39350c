//! Reconcile two CSV exports and print the report
//!
//! Usage: `cargo run --example reconcile_csv [ledger_a.csv ledger_b.csv]`.
//! Without arguments two small built-in exports are used. Set `RUST_LOG`
//! to see the engine's log output.

use reconciliation_core::utils::MemorySource;
use reconciliation_core::{
    check_report_integrity, LedgerSide, ReconciliationConfig, ReconciliationEngine,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const SAMPLE_A: &str = "\
Date,Transaction_reference,Service_name,Amount
2024-05-02 08:14:09,DD-1001,Airtime,1000
2024-05-02 08:20:44,DD-1002,Electricity,15000.50
2024-05-02 09:01:10,DD-1003,Water,n/a
2024-05-02 09:30:00,DD-1004,Airtime,500
";

const SAMPLE_B: &str = "\
Date,Transaction_reference,Service_name,Amount
2024-05-02 08:14:11,DD-1001,Airtime,1000
2024-05-02 08:20:50,DD-1002,Electricity,15000.00
2024-05-02 11:00:00,EF-9001,TV,7000
";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reconciliation_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (source_a, source_b) = match args.as_slice() {
        [path_a, path_b] => (
            MemorySource::new(path_a.as_str(), std::fs::read(path_a)?),
            MemorySource::new(path_b.as_str(), std::fs::read(path_b)?),
        ),
        _ => (
            MemorySource::from_csv("sample-a", SAMPLE_A),
            MemorySource::from_csv("sample-b", SAMPLE_B),
        ),
    };

    let engine =
        ReconciliationEngine::with_config(ReconciliationConfig::new().labels("DDIN", "Efashe"))?;
    let report = engine.reconcile_sources(&source_a, &source_b).await?;

    let label_a = report.label(LedgerSide::A);
    let label_b = report.label(LedgerSide::B);

    println!("🔎 Reconciliation {} ({} vs {})\n", report.id(), label_a, label_b);

    println!("✅ Matched Transactions");
    for pair in report.matched() {
        println!(
            "  {:<12} {:>12} {:>12}{}",
            pair.reference(),
            pair.amount_a(),
            pair.amount_b(),
            if pair.amounts_agree() { "" } else { "  ⚠ differs" }
        );
    }
    println!("  Total matched in {}: {}", label_a, report.totals().matched_a);
    println!("  Total matched in {}: {}\n", label_b, report.totals().matched_b);

    println!("❌ Unmatched Transactions");
    for unmatched in report.unmatched() {
        println!(
            "  {:<12} {:>12}  {}",
            unmatched.record.reference, unmatched.record.amount, unmatched.source
        );
    }
    println!("  Total unmatched in {}: {}", label_a, report.totals().unmatched_a);
    println!("  Total unmatched in {}: {}\n", label_b, report.totals().unmatched_b);

    println!("📊 Comparison Results");
    for row in report.comparison() {
        let counterpart = row
            .counterpart_amount
            .map(|amount| amount.to_string())
            .unwrap_or_else(|| "No Match".to_string());
        println!(
            "  {:<12} {:>12} {:>12}",
            row.record.reference, row.record.amount, counterpart
        );
    }
    println!("  {} Total: {}", label_a, report.totals().total_a);
    println!("  {} Total: {}\n", label_b, report.totals().total_b);

    let integrity = check_report_integrity(&report);
    if integrity.issues.is_empty() {
        println!("✓ Totals are consistent");
    } else {
        println!("⚠ Integrity notes:");
        for issue in &integrity.issues {
            println!("  - {}", issue);
        }
    }
    if integrity.amount_warnings > 0 {
        println!(
            "⚠ {} amount(s) could not be parsed and were counted as 0",
            integrity.amount_warnings
        );
    }

    Ok(())
}
