//! Canned demo network and sales batch matching the figures in the SUNX
//! product documentation. Used by the CLI demo mode and by scenario tests.

use chrono::NaiveDate;

use super::domain::{Rank, Reseller, ResellerId, Sale, SaleChannel, SaleId, SaleStatus};
use super::hierarchy::HierarchySnapshot;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid demo date")
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: &str,
    name: &str,
    rank: Rank,
    parent: Option<&str>,
    children: &[&str],
    personal_volume: u64,
    group_volume: u64,
    join_date: NaiveDate,
    promotion_date: Option<NaiveDate>,
) -> Reseller {
    Reseller {
        id: ResellerId::new(id),
        name: name.to_string(),
        rank,
        parent_id: parent.map(ResellerId::new),
        child_ids: children.iter().copied().map(ResellerId::new).collect(),
        personal_volume,
        group_volume,
        active: true,
        join_date,
        promotion_date,
    }
}

/// The eight-member demo network: one BD over two IBO legs with BP and IBO
/// downlines.
pub fn demo_network() -> HierarchySnapshot {
    HierarchySnapshot::from_nodes([
        member(
            "user1",
            "Maria Santos",
            Rank::BusinessDirector,
            None,
            &["user2", "user3"],
            125_000,
            4_500_000,
            date(2023, 1, 15),
            None,
        ),
        member(
            "user2",
            "Juan Dela Cruz",
            Rank::IndependentBusinessOwner,
            Some("user1"),
            &["user4", "user5", "user6"],
            85_000,
            220_000,
            date(2023, 3, 20),
            Some(date(2023, 5, 20)),
        ),
        member(
            "user3",
            "Rosa Mendoza",
            Rank::IndependentBusinessOwner,
            Some("user1"),
            &["user7", "user8"],
            78_000,
            185_000,
            date(2023, 2, 10),
            Some(date(2023, 4, 10)),
        ),
        member(
            "user4",
            "Carlos Reyes",
            Rank::BusinessPartner,
            Some("user2"),
            &[],
            12_000,
            12_000,
            date(2023, 5, 12),
            None,
        ),
        member(
            "user5",
            "Ana Garcia",
            Rank::BusinessPartner,
            Some("user2"),
            &[],
            8_000,
            8_000,
            date(2023, 6, 8),
            None,
        ),
        member(
            "user6",
            "Pedro Morales",
            Rank::IndependentBusinessOwner,
            Some("user2"),
            &[],
            25_000,
            25_000,
            date(2023, 4, 15),
            Some(date(2023, 6, 15)),
        ),
        member(
            "user7",
            "Carmen Lopez",
            Rank::BusinessPartner,
            Some("user3"),
            &[],
            15_000,
            15_000,
            date(2023, 7, 22),
            None,
        ),
        member(
            "user8",
            "Rico Hernandez",
            Rank::BusinessPartner,
            Some("user3"),
            &[],
            5_000,
            5_000,
            date(2023, 8, 10),
            None,
        ),
    ])
}

/// Five demo sales: four confirmed, one still pending.
pub fn demo_sales() -> Vec<Sale> {
    vec![
        Sale {
            id: SaleId(1),
            reseller_id: ResellerId::new("user4"),
            amount: 12_000,
            date: date(2024, 7, 1),
            channel: SaleChannel::PointOfSale,
            status: SaleStatus::Confirmed,
            product: "SUNX-BASIC".to_string(),
        },
        Sale {
            id: SaleId(2),
            reseller_id: ResellerId::new("user5"),
            amount: 28_000,
            date: date(2024, 7, 2),
            channel: SaleChannel::SaleOrder,
            status: SaleStatus::Confirmed,
            product: "SUNX-STANDARD".to_string(),
        },
        Sale {
            id: SaleId(3),
            reseller_id: ResellerId::new("user7"),
            amount: 15_000,
            date: date(2024, 7, 3),
            channel: SaleChannel::PointOfSale,
            status: SaleStatus::Confirmed,
            product: "SUNX-PREMIUM".to_string(),
        },
        Sale {
            id: SaleId(4),
            reseller_id: ResellerId::new("user2"),
            amount: 35_000,
            date: date(2024, 7, 4),
            channel: SaleChannel::SaleOrder,
            status: SaleStatus::Confirmed,
            product: "SUNX-STANDARD".to_string(),
        },
        Sale {
            id: SaleId(5),
            reseller_id: ResellerId::new("user3"),
            amount: 18_000,
            date: date(2024, 7, 5),
            channel: SaleChannel::PointOfSale,
            status: SaleStatus::Pending,
            product: "SUNX-PREMIUM".to_string(),
        },
    ]
}
