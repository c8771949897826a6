//! Per-sale commission derivation.
//!
//! One confirmed sale can pay out to several members of the upline at once.
//! Each policy step below is independent; the engine always runs all five
//! and concatenates whatever they emit.

use super::domain::{CommissionEntry, CommissionKind, Rank, Reseller, Sale};
use super::eligibility::{bd_service_fee_tier, group_override_tier};
use super::hierarchy::HierarchySnapshot;
use super::rules::{apply_rate, RuleConfig};

/// Stateless evaluator binding one hierarchy snapshot to one rule table.
/// Every `commissions_for_sale` call is side-effect-free, so sales may be
/// evaluated in any order or in parallel.
pub struct CommissionEngine<'a> {
    snapshot: &'a HierarchySnapshot,
    config: &'a RuleConfig,
}

impl<'a> CommissionEngine<'a> {
    pub fn new(snapshot: &'a HierarchySnapshot, config: &'a RuleConfig) -> Self {
        Self { snapshot, config }
    }

    /// Every commission entry the sale generates, in policy order. A seller
    /// missing from the snapshot or flagged inactive earns nothing at all,
    /// discount included; that is intended policy, not an error.
    pub fn commissions_for_sale(&self, sale: &Sale) -> Vec<CommissionEntry> {
        let Some(reseller) = self.snapshot.lookup(&sale.reseller_id) else {
            return Vec::new();
        };
        if !reseller.active {
            return Vec::new();
        }

        let mut entries = Vec::new();
        self.outright_discount(sale, reseller, &mut entries);
        self.group_override(sale, reseller, &mut entries);
        self.lifetime_incentive(sale, reseller, &mut entries);
        self.bd_service_fees(sale, reseller, &mut entries);
        self.bd_override(sale, reseller, &mut entries);
        entries
    }

    /// The seller's own discount. Always emitted as the base record, even
    /// when the product/rank pair resolves to a zero rate.
    fn outright_discount(
        &self,
        sale: &Sale,
        reseller: &Reseller,
        entries: &mut Vec<CommissionEntry>,
    ) {
        let rate_bps = self.config.discount_rate_bps(&sale.product, reseller.rank);
        entries.push(CommissionEntry {
            recipient_id: reseller.id.clone(),
            recipient_name: reseller.name.clone(),
            kind: CommissionKind::OutrightDiscount,
            rate_bps,
            amount: apply_rate(sale.amount, rate_bps),
            sale_id: sale.id,
            tier: None,
            source_name: None,
        });
    }

    /// Group override on the sale amount for a tier-qualified IBO seller.
    fn group_override(
        &self,
        sale: &Sale,
        reseller: &Reseller,
        entries: &mut Vec<CommissionEntry>,
    ) {
        let Some(tier) = group_override_tier(reseller, self.snapshot, self.config) else {
            return;
        };
        entries.push(CommissionEntry {
            recipient_id: reseller.id.clone(),
            recipient_name: reseller.name.clone(),
            kind: CommissionKind::GroupOverride,
            rate_bps: tier.rate_bps,
            amount: apply_rate(sale.amount, tier.rate_bps),
            sale_id: sale.id,
            tier: Some(tier.name.label()),
            source_name: None,
        });
    }

    /// Lifetime incentive for the nearest upline IBO. The policy applies to
    /// IBO-to-IBO relationships only, and the payout fans out over every
    /// qualifying first-level IBO under the ancestor, not just the seller
    /// whose sale triggered it: one entry per qualifying child, each on that
    /// child's personal volume.
    fn lifetime_incentive(
        &self,
        sale: &Sale,
        reseller: &Reseller,
        entries: &mut Vec<CommissionEntry>,
    ) {
        if reseller.rank != Rank::IndependentBusinessOwner {
            return;
        }
        let Some(ancestor) = self.snapshot.walk_up(&reseller.id, |node| {
            node.rank == Rank::IndependentBusinessOwner
        }) else {
            return;
        };

        let policy = &self.config.lifetime_incentive;
        if ancestor.personal_volume < policy.min_self_volume
            || reseller.personal_volume < policy.min_downline_volume
        {
            return;
        }

        for child in self.snapshot.children(&ancestor.id) {
            if child.rank != Rank::IndependentBusinessOwner
                || child.personal_volume < policy.min_downline_volume
            {
                continue;
            }
            entries.push(CommissionEntry {
                recipient_id: ancestor.id.clone(),
                recipient_name: ancestor.name.clone(),
                kind: CommissionKind::LifetimeIncentive,
                rate_bps: policy.rate_bps,
                amount: apply_rate(child.personal_volume, policy.rate_bps),
                sale_id: sale.id,
                tier: None,
                source_name: Some(child.name.clone()),
            });
        }
    }

    /// Service fee for every qualifying BD up the chain. Unlike the other
    /// upline policies this one does not stop at the nearest match; each BD
    /// ancestor is evaluated on its own standing.
    fn bd_service_fees(
        &self,
        sale: &Sale,
        reseller: &Reseller,
        entries: &mut Vec<CommissionEntry>,
    ) {
        for ancestor in self.snapshot.ancestors(&reseller.id) {
            if ancestor.rank != Rank::BusinessDirector {
                continue;
            }
            let Some(tier) = bd_service_fee_tier(ancestor, self.snapshot, self.config) else {
                continue;
            };
            entries.push(CommissionEntry {
                recipient_id: ancestor.id.clone(),
                recipient_name: ancestor.name.clone(),
                kind: CommissionKind::BdServiceFee,
                rate_bps: tier.rate_bps,
                amount: apply_rate(sale.amount, tier.rate_bps),
                sale_id: sale.id,
                tier: Some(tier.level.label()),
                source_name: None,
            });
        }
    }

    /// Override for the nearest BD above a BD seller, on the seller's group
    /// volume. The walk stops at the first BD ancestor whether or not the
    /// joint volume condition holds.
    fn bd_override(&self, sale: &Sale, reseller: &Reseller, entries: &mut Vec<CommissionEntry>) {
        if reseller.rank != Rank::BusinessDirector {
            return;
        }
        let Some(ancestor) = self.snapshot.walk_up(&reseller.id, |node| {
            node.rank == Rank::BusinessDirector
        }) else {
            return;
        };

        let policy = &self.config.bd_override;
        if ancestor.group_volume < policy.min_group_volume_both
            || reseller.group_volume < policy.min_group_volume_both
        {
            return;
        }

        entries.push(CommissionEntry {
            recipient_id: ancestor.id.clone(),
            recipient_name: ancestor.name.clone(),
            kind: CommissionKind::BdOverride,
            rate_bps: policy.rate_bps,
            amount: apply_rate(reseller.group_volume, policy.rate_bps),
            sale_id: sale.id,
            tier: None,
            source_name: Some(reseller.name.clone()),
        });
    }
}
