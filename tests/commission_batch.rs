//! Batch-level behavior: status filtering, skip records, rule validation,
//! and report shaping over the demo network.

use chrono::NaiveDate;

use sunx_commission::commission::{
    sample, CommissionKind, CommissionReport, CommissionRun, ResellerId, RuleConfig,
    RuleConfigError, Sale, SaleChannel, SaleId, SaleStatus,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 31).expect("valid date")
}

#[test]
fn demo_batch_pays_only_the_four_outright_discounts() {
    let snapshot = sample::demo_network();
    let rules = RuleConfig::sunx_standard();

    let run = CommissionRun::execute(&sample::demo_sales(), &snapshot, &rules)
        .expect("batch runs");

    // No IBO in the demo network clears the override headcount, user1 is 12
    // IBOs short of the service-fee gate, and no sale comes from a BD, so
    // the discounts are the whole payout.
    assert_eq!(run.entries.len(), 4);
    assert!(run
        .entries
        .iter()
        .all(|entry| entry.kind == CommissionKind::OutrightDiscount));
    assert_eq!(run.total_payout(), 23_400);

    assert_eq!(run.total_for(&ResellerId::new("user4")), 1_800);
    assert_eq!(run.total_for(&ResellerId::new("user5")), 5_600);
    assert_eq!(run.total_for(&ResellerId::new("user7")), 3_750);
    assert_eq!(run.total_for(&ResellerId::new("user2")), 12_250);
    assert_eq!(run.total_for(&ResellerId::new("user1")), 0);
}

#[test]
fn pending_sales_never_reach_the_totals() {
    let snapshot = sample::demo_network();
    let rules = RuleConfig::sunx_standard();

    let run = CommissionRun::execute(&sample::demo_sales(), &snapshot, &rules)
        .expect("batch runs");

    // Sale 5 is user3's pending order; confirming it would add its premium
    // discount to the payout.
    assert!(run.entries.iter().all(|entry| entry.sale_id != SaleId(5)));
    assert_eq!(run.total_for(&ResellerId::new("user3")), 0);

    let mut confirmed = sample::demo_sales();
    confirmed[4].status = SaleStatus::Confirmed;
    let rerun = CommissionRun::execute(&confirmed, &snapshot, &rules).expect("batch runs");
    assert_eq!(rerun.total_for(&ResellerId::new("user3")), 7_200);
}

#[test]
fn unknown_reseller_sales_are_skipped_with_a_reason() {
    let snapshot = sample::demo_network();
    let rules = RuleConfig::sunx_standard();

    let mut sales = sample::demo_sales();
    sales.push(Sale {
        id: SaleId(99),
        reseller_id: ResellerId::new("ghost"),
        amount: 50_000,
        date: as_of(),
        channel: SaleChannel::PointOfSale,
        status: SaleStatus::Confirmed,
        product: "SUNX-PREMIUM".to_string(),
    });

    let run = CommissionRun::execute(&sales, &snapshot, &rules).expect("batch runs");

    assert_eq!(run.total_payout(), 23_400);
    assert_eq!(run.skipped.len(), 1);
    assert_eq!(run.skipped[0].sale_id, SaleId(99));
    assert!(run.skipped[0].reason.contains("ghost"));
}

#[test]
fn malformed_rule_table_fails_the_whole_batch() {
    let snapshot = sample::demo_network();
    let mut rules = RuleConfig::sunx_standard();
    rules.group_override.tiers.reverse();

    let error = CommissionRun::execute(&sample::demo_sales(), &snapshot, &rules)
        .expect_err("reversed tiers rejected");
    assert_eq!(error, RuleConfigError::OverrideTierOrder);
}

#[test]
fn repeated_runs_produce_identical_totals() {
    let snapshot = sample::demo_network();
    let rules = RuleConfig::sunx_standard();
    let sales = sample::demo_sales();

    let first = CommissionRun::execute(&sales, &snapshot, &rules).expect("batch runs");
    let second = CommissionRun::execute(&sales, &snapshot, &rules).expect("batch runs");

    assert_eq!(first.entries, second.entries);
    assert_eq!(first.totals, second.totals);
}

#[test]
fn report_ranks_recipients_and_covers_every_commission_type() {
    let snapshot = sample::demo_network();
    let rules = RuleConfig::sunx_standard();

    let run = CommissionRun::execute(&sample::demo_sales(), &snapshot, &rules)
        .expect("batch runs");
    let report = CommissionReport::build(&run, &snapshot, &rules, as_of());

    assert_eq!(report.total_payout, 23_400);

    // Every commission type appears in the breakdown even when unpaid.
    assert_eq!(report.totals_by_kind.len(), 5);
    let discount = report
        .totals_by_kind
        .iter()
        .find(|kind| kind.kind_label == "outright_discount")
        .expect("discount row");
    assert_eq!(discount.total, 23_400);
    assert_eq!(discount.entry_count, 4);

    // Recipients are ranked by total earned, highest first.
    let order: Vec<&str> = report
        .recipients
        .iter()
        .map(|recipient| recipient.reseller_id.as_str())
        .collect();
    assert_eq!(order, vec!["user2", "user5", "user7", "user4"]);

    // Qualification views cover the two IBO legs, the single BD, and every BP.
    assert_eq!(report.override_qualifications.len(), 3);
    assert_eq!(report.service_fee_status.len(), 1);
    assert_eq!(report.promotion_candidates.len(), 4);
    assert!(report.skipped_sales.is_empty());
}
