//! Batch evaluation and per-recipient folding.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::domain::{CommissionEntry, ResellerId, Sale, SaleId, SaleStatus};
use super::engine::CommissionEngine;
use super::hierarchy::HierarchySnapshot;
use super::rules::{RuleConfig, RuleConfigError};

/// Running total plus the encounter-ordered entries behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipientBreakdown {
    pub total: u64,
    pub entries: Vec<CommissionEntry>,
}

/// Folds entries into per-recipient totals. Totals are exact sums and each
/// recipient's entry list preserves encounter order, so breakdown output is
/// deterministic. Recipients with no entries simply never appear.
pub fn aggregate(
    entries: impl IntoIterator<Item = CommissionEntry>,
) -> BTreeMap<ResellerId, RecipientBreakdown> {
    let mut by_recipient: BTreeMap<ResellerId, RecipientBreakdown> = BTreeMap::new();
    for entry in entries {
        let breakdown = by_recipient.entry(entry.recipient_id.clone()).or_default();
        breakdown.total = breakdown.total.saturating_add(entry.amount);
        breakdown.entries.push(entry);
    }
    by_recipient
}

/// A sale left out of a batch, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSale {
    pub sale_id: SaleId,
    pub reason: String,
}

/// Outcome of evaluating a batch of sales against one snapshot and one rule
/// table.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionRun {
    pub entries: Vec<CommissionEntry>,
    pub totals: BTreeMap<ResellerId, RecipientBreakdown>,
    pub skipped: Vec<SkippedSale>,
}

impl CommissionRun {
    /// Evaluates every confirmed sale in order.
    ///
    /// The rule table is validated once up front; a malformed table
    /// invalidates the whole batch. A sale naming an unknown reseller is
    /// skipped with a warning instead of aborting the run, so one bad record
    /// never blocks unrelated sales. Pending sales are ignored entirely.
    pub fn execute(
        sales: &[Sale],
        snapshot: &HierarchySnapshot,
        config: &RuleConfig,
    ) -> Result<Self, RuleConfigError> {
        config.validate()?;

        let engine = CommissionEngine::new(snapshot, config);
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        for sale in sales {
            if sale.status != SaleStatus::Confirmed {
                continue;
            }
            if snapshot.lookup(&sale.reseller_id).is_none() {
                warn!(
                    sale = sale.id.0,
                    reseller = %sale.reseller_id,
                    "skipping sale for unknown reseller"
                );
                skipped.push(SkippedSale {
                    sale_id: sale.id,
                    reason: format!("reseller '{}' not in snapshot", sale.reseller_id),
                });
                continue;
            }
            entries.extend(engine.commissions_for_sale(sale));
        }

        let totals = aggregate(entries.iter().cloned());
        Ok(Self {
            entries,
            totals,
            skipped,
        })
    }

    pub fn total_payout(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |total, entry| total.saturating_add(entry.amount))
    }

    pub fn total_for(&self, id: &ResellerId) -> u64 {
        self.totals
            .get(id)
            .map(|breakdown| breakdown.total)
            .unwrap_or(0)
    }
}
