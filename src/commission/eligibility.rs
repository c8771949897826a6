//! Pure qualification checks over a hierarchy snapshot and a rule table.
//!
//! Nothing here looks at a sale; the same functions back both the commission
//! engine and the standalone dashboard queries.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{Rank, Reseller};
use super::hierarchy::HierarchySnapshot;
use super::rules::{OverrideTier, RuleConfig, ServiceFeeTier};

/// Direct BP children currently counting toward override tiers: rank BP and
/// personal volume at or above the BP active floor.
pub fn qualifying_direct_bps(
    node: &Reseller,
    snapshot: &HierarchySnapshot,
    config: &RuleConfig,
) -> usize {
    snapshot
        .children(&node.id)
        .into_iter()
        .filter(|child| {
            child.rank == Rank::BusinessPartner
                && child.personal_volume >= config.activity.bp_active_min
        })
        .count()
}

/// Group-override tier for an IBO, or `None` for any other rank.
///
/// Tiers are scanned highest first and each tier's joint condition is
/// evaluated independently: an IBO meeting Diamond's headcount but only
/// Gold's volume earns Gold only if Gold's own headcount and volume both
/// hold, and earns nothing when no tier's joint condition does. Partial
/// matches never fall through to a lower tier.
pub fn group_override_tier<'a>(
    node: &Reseller,
    snapshot: &HierarchySnapshot,
    config: &'a RuleConfig,
) -> Option<&'a OverrideTier> {
    if node.rank != Rank::IndependentBusinessOwner {
        return None;
    }

    let qualifying = qualifying_direct_bps(node, snapshot, config);
    config
        .group_override
        .tiers
        .iter()
        .find(|tier| {
            qualifying >= tier.min_active_directs && node.group_volume >= tier.min_group_volume
        })
}

/// IBOs anywhere in the subtree below the node whose personal volume meets
/// the BD-counting floor. The whole downline counts, not just direct
/// children.
pub fn active_downline_ibos(
    node: &Reseller,
    snapshot: &HierarchySnapshot,
    config: &RuleConfig,
) -> usize {
    snapshot.count_downline(&node.id, |member| {
        member.rank == Rank::IndependentBusinessOwner
            && member.personal_volume >= config.activity.ibo_bd_active_min
    })
}

/// Service-fee tier for a BD, or `None` for any other rank.
///
/// Two gates run before any band is considered: the BD's own personal
/// volume, then the recursive active-IBO headcount. A BD failing either
/// gate earns nothing regardless of group volume.
pub fn bd_service_fee_tier<'a>(
    node: &Reseller,
    snapshot: &HierarchySnapshot,
    config: &'a RuleConfig,
) -> Option<&'a ServiceFeeTier> {
    if node.rank != Rank::BusinessDirector {
        return None;
    }
    if node.personal_volume < config.activity.bd_active_min {
        return None;
    }
    if active_downline_ibos(node, snapshot, config) < config.bd_service_fee.min_active_ibos {
        return None;
    }

    config
        .bd_service_fee
        .tiers
        .iter()
        .find(|tier| node.group_volume >= tier.min_group_volume)
}

/// Progress toward the BP-to-IBO volume pathway, evaluated as of a
/// reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromotionStatus {
    pub eligible: bool,
    /// Volume progress in whole percent, truncated toward zero and capped
    /// at 100; one peso short of the threshold reads 99.
    pub progress_pct: u32,
    /// Months under tracking, capped at the promotion window.
    pub months_tracked: u32,
    /// Months left in the window, floored at zero.
    pub months_remaining: u32,
    /// Volume still needed to clear the threshold.
    pub volume_needed: u64,
}

/// Promotion tracking for a BP, or `None` for any other rank.
pub fn promotion_status(
    node: &Reseller,
    config: &RuleConfig,
    as_of: NaiveDate,
) -> Option<PromotionStatus> {
    if node.rank != Rank::BusinessPartner {
        return None;
    }

    let policy = &config.promotion;
    let elapsed = whole_months_between(node.join_date, as_of);
    let progress_pct = if policy.volume_threshold == 0 {
        100
    } else {
        (node
            .personal_volume
            .saturating_mul(100)
            .checked_div(policy.volume_threshold)
            .unwrap_or(100))
        .min(100) as u32
    };

    Some(PromotionStatus {
        eligible: progress_pct >= 100,
        progress_pct,
        months_tracked: elapsed.saturating_add(1).min(policy.window_months),
        months_remaining: policy
            .window_months
            .saturating_sub(elapsed.saturating_add(1)),
        volume_needed: policy.volume_threshold.saturating_sub(node.personal_volume),
    })
}

/// Whole calendar months elapsed between two dates, clamped at zero when the
/// start postdates the end.
fn whole_months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let span =
        (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    span.max(0) as u32
}
