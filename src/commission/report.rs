//! Serializable summaries consumed by reporting collaborators.
//!
//! These views carry raw peso integers and labels only; currency formatting
//! and rendering belong to the consumer.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{CommissionRun, SkippedSale};
use super::domain::{CommissionKind, Rank, ResellerId};
use super::eligibility::{
    active_downline_ibos, bd_service_fee_tier, group_override_tier, promotion_status,
    qualifying_direct_bps,
};
use super::hierarchy::HierarchySnapshot;
use super::rules::RuleConfig;

#[derive(Debug, Clone, Serialize)]
pub struct KindTotalEntry {
    pub kind: CommissionKind,
    pub kind_label: &'static str,
    pub total: u64,
    pub entry_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientSummaryEntry {
    pub reseller_id: ResellerId,
    pub name: String,
    pub rank: Rank,
    pub rank_label: &'static str,
    pub total: u64,
    pub entry_count: usize,
}

/// Override standing of one IBO, independent of any sale.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideQualificationView {
    pub reseller_id: ResellerId,
    pub name: String,
    pub qualifying_directs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_bps: Option<u32>,
}

/// Service-fee standing of one BD, independent of any sale.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceFeeStatusView {
    pub reseller_id: ResellerId,
    pub name: String,
    pub active_ibos: usize,
    pub required_ibos: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_bps: Option<u32>,
}

/// Promotion tracking of one BP as of the report date.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionCandidateView {
    pub reseller_id: ResellerId,
    pub name: String,
    pub personal_volume: u64,
    pub volume_threshold: u64,
    pub eligible: bool,
    pub progress_pct: u32,
    pub months_tracked: u32,
    pub months_remaining: u32,
    pub volume_needed: u64,
}

/// Full reporting payload for one batch: payout totals plus the standalone
/// eligibility dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionReport {
    pub as_of: NaiveDate,
    pub total_payout: u64,
    pub totals_by_kind: Vec<KindTotalEntry>,
    pub recipients: Vec<RecipientSummaryEntry>,
    pub override_qualifications: Vec<OverrideQualificationView>,
    pub service_fee_status: Vec<ServiceFeeStatusView>,
    pub promotion_candidates: Vec<PromotionCandidateView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_sales: Vec<SkippedSale>,
}

impl CommissionReport {
    pub fn build(
        run: &CommissionRun,
        snapshot: &HierarchySnapshot,
        config: &RuleConfig,
        as_of: NaiveDate,
    ) -> Self {
        let totals_by_kind = CommissionKind::ordered()
            .into_iter()
            .map(|kind| {
                let matching = run.entries.iter().filter(|entry| entry.kind == kind);
                let (mut total, mut entry_count) = (0u64, 0usize);
                for entry in matching {
                    total = total.saturating_add(entry.amount);
                    entry_count += 1;
                }
                KindTotalEntry {
                    kind,
                    kind_label: kind.label(),
                    total,
                    entry_count,
                }
            })
            .collect();

        let mut recipients: Vec<RecipientSummaryEntry> = run
            .totals
            .iter()
            .filter_map(|(id, breakdown)| {
                let node = snapshot.lookup(id)?;
                Some(RecipientSummaryEntry {
                    reseller_id: id.clone(),
                    name: node.name.clone(),
                    rank: node.rank,
                    rank_label: node.rank.label(),
                    total: breakdown.total,
                    entry_count: breakdown.entries.len(),
                })
            })
            .collect();
        recipients.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.reseller_id.cmp(&b.reseller_id))
        });

        Self {
            as_of,
            total_payout: run.total_payout(),
            totals_by_kind,
            recipients,
            override_qualifications: override_qualifications(snapshot, config),
            service_fee_status: service_fee_status(snapshot, config),
            promotion_candidates: promotion_candidates(snapshot, config, as_of),
            skipped_sales: run.skipped.clone(),
        }
    }
}

/// Override standing for every IBO in the snapshot, in id order.
pub fn override_qualifications(
    snapshot: &HierarchySnapshot,
    config: &RuleConfig,
) -> Vec<OverrideQualificationView> {
    snapshot
        .iter()
        .filter(|node| node.rank == Rank::IndependentBusinessOwner)
        .map(|node| {
            let tier = group_override_tier(node, snapshot, config);
            OverrideQualificationView {
                reseller_id: node.id.clone(),
                name: node.name.clone(),
                qualifying_directs: qualifying_direct_bps(node, snapshot, config),
                tier: tier.map(|tier| tier.name.label()),
                rate_bps: tier.map(|tier| tier.rate_bps),
            }
        })
        .collect()
}

/// Service-fee standing for every BD in the snapshot, in id order.
pub fn service_fee_status(
    snapshot: &HierarchySnapshot,
    config: &RuleConfig,
) -> Vec<ServiceFeeStatusView> {
    snapshot
        .iter()
        .filter(|node| node.rank == Rank::BusinessDirector)
        .map(|node| {
            let tier = bd_service_fee_tier(node, snapshot, config);
            ServiceFeeStatusView {
                reseller_id: node.id.clone(),
                name: node.name.clone(),
                active_ibos: active_downline_ibos(node, snapshot, config),
                required_ibos: config.bd_service_fee.min_active_ibos,
                tier: tier.map(|tier| tier.level.label()),
                rate_bps: tier.map(|tier| tier.rate_bps),
            }
        })
        .collect()
}

/// Promotion tracking for every BP in the snapshot, in id order.
pub fn promotion_candidates(
    snapshot: &HierarchySnapshot,
    config: &RuleConfig,
    as_of: NaiveDate,
) -> Vec<PromotionCandidateView> {
    snapshot
        .iter()
        .filter_map(|node| {
            let status = promotion_status(node, config, as_of)?;
            Some(PromotionCandidateView {
                reseller_id: node.id.clone(),
                name: node.name.clone(),
                personal_volume: node.personal_volume,
                volume_threshold: config.promotion.volume_threshold,
                eligible: status.eligible,
                progress_pct: status.progress_pct,
                months_tracked: status.months_tracked,
                months_remaining: status.months_remaining,
                volume_needed: status.volume_needed,
            })
        })
        .collect()
}
