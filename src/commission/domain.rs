use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for members of the reseller network.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResellerId(pub String);

impl ResellerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rank ladder of the network. Every evaluator matches exhaustively so a new
/// rank is a compile-time change, not a scattered string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "BP")]
    BusinessPartner,
    #[serde(rename = "IBO")]
    IndependentBusinessOwner,
    #[serde(rename = "BD")]
    BusinessDirector,
}

impl Rank {
    pub const fn label(self) -> &'static str {
        match self {
            Rank::BusinessPartner => "BP",
            Rank::IndependentBusinessOwner => "IBO",
            Rank::BusinessDirector => "BD",
        }
    }
}

/// One member of the reseller tree, as captured in a period snapshot.
///
/// `personal_volume` is the member's own accrued sales volume (GPPIS) and
/// `group_volume` the volume of the whole group (GGPIS), both in whole pesos.
/// `child_ids` keeps enrollment order; every listed child is expected to name
/// this node as its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reseller {
    pub id: ResellerId,
    pub name: String,
    pub rank: Rank,
    pub parent_id: Option<ResellerId>,
    #[serde(default)]
    pub child_ids: Vec<ResellerId>,
    pub personal_volume: u64,
    pub group_volume: u64,
    pub active: bool,
    pub join_date: NaiveDate,
    #[serde(default)]
    pub promotion_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SaleId(pub u64);

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel a sale was recorded through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleChannel {
    #[serde(rename = "POS")]
    PointOfSale,
    #[serde(rename = "Sale Order")]
    SaleOrder,
}

impl SaleChannel {
    pub const fn label(self) -> &'static str {
        match self {
            SaleChannel::PointOfSale => "POS",
            SaleChannel::SaleOrder => "Sale Order",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Confirmed,
}

impl SaleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Confirmed => "confirmed",
        }
    }
}

/// An immutable sale record. Only confirmed sales participate in commission
/// batches; the pending-to-confirmed transition happens outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub reseller_id: ResellerId,
    pub amount: u64,
    pub date: NaiveDate,
    pub channel: SaleChannel,
    pub status: SaleStatus,
    pub product: String,
}

/// The distinct payout policies a single sale can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionKind {
    OutrightDiscount,
    GroupOverride,
    LifetimeIncentive,
    BdServiceFee,
    BdOverride,
}

impl CommissionKind {
    pub const fn label(self) -> &'static str {
        match self {
            CommissionKind::OutrightDiscount => "outright_discount",
            CommissionKind::GroupOverride => "group_override",
            CommissionKind::LifetimeIncentive => "lifetime_incentive",
            CommissionKind::BdServiceFee => "bd_service_fee",
            CommissionKind::BdOverride => "bd_override",
        }
    }

    pub const fn ordered() -> [CommissionKind; 5] {
        [
            CommissionKind::OutrightDiscount,
            CommissionKind::GroupOverride,
            CommissionKind::LifetimeIncentive,
            CommissionKind::BdServiceFee,
            CommissionKind::BdOverride,
        ]
    }
}

/// One policy hit produced by the engine. Entries are derived values, never
/// written back into the hierarchy; they are the sole interface to the
/// aggregation and reporting layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommissionEntry {
    pub recipient_id: ResellerId,
    pub recipient_name: String,
    pub kind: CommissionKind,
    pub rate_bps: u32,
    pub amount: u64,
    pub sale_id: SaleId,
    /// Qualification tier label, for tiered policies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<&'static str>,
    /// Whose volume generated a pass-through payout, when not the recipient's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}
