//! End-to-end load path: CSV sales export plus JSON hierarchy snapshot into
//! a commission run.

use sunx_commission::commission::{
    snapshot_from_json_reader, CommissionRun, ResellerId, RuleConfig, SalesCsvImporter,
};

const SNAPSHOT_JSON: &str = r#"{
    "user2": {
        "id": "user2",
        "name": "Juan Dela Cruz",
        "rank": "IBO",
        "parent_id": null,
        "child_ids": ["user4", "user5"],
        "personal_volume": 85000,
        "group_volume": 220000,
        "active": true,
        "join_date": "2023-03-20",
        "promotion_date": "2023-05-20"
    },
    "user4": {
        "id": "user4",
        "name": "Carlos Reyes",
        "rank": "BP",
        "parent_id": "user2",
        "personal_volume": 12000,
        "group_volume": 12000,
        "active": true,
        "join_date": "2023-05-12"
    },
    "user5": {
        "id": "user5",
        "name": "Ana Garcia",
        "rank": "BP",
        "parent_id": "user2",
        "personal_volume": 8000,
        "group_volume": 8000,
        "active": true,
        "join_date": "2023-06-08"
    }
}"#;

const SALES_CSV: &str = "\
id,reseller_id,amount,date,channel,status,product
1,user4,12000,2024-07-01,POS,confirmed,SUNX-BASIC
2,user5,28000,2024-07-02,Sale Order,pending,SUNX-STANDARD
3,user5,oops,2024-07-02,POS,confirmed,SUNX-STANDARD
4,user2,35000,2024-07-04,Sale Order,confirmed,SUNX-STANDARD
";

#[test]
fn imported_batch_evaluates_like_an_in_memory_one() {
    let snapshot = snapshot_from_json_reader(SNAPSHOT_JSON.as_bytes()).expect("snapshot parses");
    let import = SalesCsvImporter::from_reader(SALES_CSV.as_bytes()).expect("csv parses");

    // Row 3 is malformed and only warns; the rest of the file still loads.
    assert_eq!(import.warnings.len(), 1);
    assert_eq!(import.warnings[0].line, 4);
    assert_eq!(import.sales.len(), 3);

    let rules = RuleConfig::sunx_standard();
    let run = CommissionRun::execute(&import.sales, &snapshot, &rules).expect("batch runs");

    // Sale 2 stays pending, so only the two confirmed discounts pay out.
    assert_eq!(run.total_for(&ResellerId::new("user4")), 1_800);
    assert_eq!(run.total_for(&ResellerId::new("user5")), 0);
    assert_eq!(run.total_for(&ResellerId::new("user2")), 12_250);
    assert!(run.skipped.is_empty());
}

#[test]
fn snapshot_and_roundtrip_survive_reserialization() {
    let snapshot = snapshot_from_json_reader(SNAPSHOT_JSON.as_bytes()).expect("snapshot parses");
    let user2 = snapshot
        .lookup(&ResellerId::new("user2"))
        .expect("user2 present");
    assert_eq!(user2.child_ids.len(), 2);

    let json = serde_json::to_string(user2).expect("node serializes");
    assert!(json.contains("\"rank\":\"IBO\""));
}
