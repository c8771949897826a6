//! Policy tables for the SUNX compensation plan.
//!
//! All rates are basis points over whole-peso amounts so chained rate
//! applications never accumulate floating-point drift. The configuration is
//! an explicit value passed into every evaluator; alternate tables (what-if
//! analysis, historical rule versions) can coexist in one process.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::Rank;

/// 10_000 basis points make 100%.
pub const FULL_RATE_BPS: u32 = 10_000;

/// Applies a basis-point rate to a whole-peso amount, flooring the result.
pub fn apply_rate(amount: u64, rate_bps: u32) -> u64 {
    (u128::from(amount) * u128::from(rate_bps) / u128::from(FULL_RATE_BPS)) as u64
}

/// Outright discount rates for one product, per rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRates {
    pub bp_bps: u32,
    pub ibo_bps: u32,
    pub bd_bps: u32,
}

impl ProductRates {
    pub const fn for_rank(self, rank: Rank) -> u32 {
        match rank {
            Rank::BusinessPartner => self.bp_bps,
            Rank::IndependentBusinessOwner => self.ibo_bps,
            Rank::BusinessDirector => self.bd_bps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideTierName {
    Silver,
    Gold,
    Diamond,
}

impl OverrideTierName {
    pub const fn label(self) -> &'static str {
        match self {
            OverrideTierName::Silver => "Silver",
            OverrideTierName::Gold => "Gold",
            OverrideTierName::Diamond => "Diamond",
        }
    }
}

/// One group-override band. A tier only applies when both requirements hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideTier {
    pub name: OverrideTierName,
    pub min_active_directs: usize,
    pub min_group_volume: u64,
    pub rate_bps: u32,
}

/// Group-override bands for IBOs, listed in descending evaluation order
/// (highest tier first). `validate` enforces the ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOverridePolicy {
    pub tiers: Vec<OverrideTier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFeeLevel {
    Tier1,
    Tier2,
    Tier3,
}

impl ServiceFeeLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ServiceFeeLevel::Tier1 => "Tier 1",
            ServiceFeeLevel::Tier2 => "Tier 2",
            ServiceFeeLevel::Tier3 => "Tier 3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFeeTier {
    pub level: ServiceFeeLevel,
    pub min_group_volume: u64,
    pub rate_bps: u32,
}

/// BD group service fee: volume bands in descending evaluation order, gated
/// on the BD's own activity and a recursive active-IBO headcount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFeePolicy {
    pub min_active_ibos: usize,
    pub tiers: Vec<ServiceFeeTier>,
}

/// Lifetime incentive an upline IBO earns on first-level IBO volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeIncentivePolicy {
    pub rate_bps: u32,
    pub min_self_volume: u64,
    pub min_downline_volume: u64,
}

/// BD-to-BD override on a first-level BD's group volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BdOverridePolicy {
    pub rate_bps: u32,
    pub min_group_volume_both: u64,
}

/// Personal-volume floors that gate "active" status per rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityThresholds {
    /// A BP below this floor does not count toward override tiers.
    pub bp_active_min: u64,
    /// An IBO below this floor does not count toward BD service-fee gates.
    pub ibo_bd_active_min: u64,
    /// A BD below this floor earns no service fee at all.
    pub bd_active_min: u64,
}

/// BP-to-IBO volume pathway parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionPolicy {
    pub volume_threshold: u64,
    pub window_months: u32,
    pub bond_amount: u64,
}

/// The full, immutable policy table for one commission run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub product_discounts: BTreeMap<String, ProductRates>,
    pub group_override: GroupOverridePolicy,
    pub lifetime_incentive: LifetimeIncentivePolicy,
    pub bd_service_fee: ServiceFeePolicy,
    pub bd_override: BdOverridePolicy,
    pub activity: ActivityThresholds,
    pub promotion: PromotionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleConfigError {
    #[error("{context} rate of {rate_bps} bps exceeds 100%")]
    RateOutOfRange {
        context: &'static str,
        rate_bps: u32,
    },
    #[error("group override tiers must be listed in strictly descending requirement order")]
    OverrideTierOrder,
    #[error("service fee tiers must be listed in strictly descending volume order")]
    ServiceFeeTierOrder,
    #[error("promotion window must cover at least one month")]
    EmptyPromotionWindow,
}

impl RuleConfig {
    /// The published SUNX plan.
    pub fn sunx_standard() -> Self {
        let product_discounts = BTreeMap::from([
            (
                "SUNX-PREMIUM".to_string(),
                ProductRates {
                    bp_bps: 2_500,
                    ibo_bps: 4_000,
                    bd_bps: 4_000,
                },
            ),
            (
                "SUNX-STANDARD".to_string(),
                ProductRates {
                    bp_bps: 2_000,
                    ibo_bps: 3_500,
                    bd_bps: 3_500,
                },
            ),
            (
                "SUNX-BASIC".to_string(),
                ProductRates {
                    bp_bps: 1_500,
                    ibo_bps: 2_800,
                    bd_bps: 2_800,
                },
            ),
        ]);

        Self {
            product_discounts,
            group_override: GroupOverridePolicy {
                tiers: vec![
                    OverrideTier {
                        name: OverrideTierName::Diamond,
                        min_active_directs: 8,
                        min_group_volume: 180_000,
                        rate_bps: 800,
                    },
                    OverrideTier {
                        name: OverrideTierName::Gold,
                        min_active_directs: 5,
                        min_group_volume: 100_000,
                        rate_bps: 600,
                    },
                    OverrideTier {
                        name: OverrideTierName::Silver,
                        min_active_directs: 3,
                        min_group_volume: 50_000,
                        rate_bps: 500,
                    },
                ],
            },
            lifetime_incentive: LifetimeIncentivePolicy {
                rate_bps: 200,
                min_self_volume: 10_000,
                min_downline_volume: 10_000,
            },
            bd_service_fee: ServiceFeePolicy {
                min_active_ibos: 15,
                tiers: vec![
                    ServiceFeeTier {
                        level: ServiceFeeLevel::Tier3,
                        min_group_volume: 4_000_000,
                        rate_bps: 700,
                    },
                    ServiceFeeTier {
                        level: ServiceFeeLevel::Tier2,
                        min_group_volume: 2_500_000,
                        rate_bps: 600,
                    },
                    ServiceFeeTier {
                        level: ServiceFeeLevel::Tier1,
                        min_group_volume: 1_000_000,
                        rate_bps: 500,
                    },
                ],
            },
            bd_override: BdOverridePolicy {
                rate_bps: 100,
                min_group_volume_both: 1_000_000,
            },
            activity: ActivityThresholds {
                bp_active_min: 2_000,
                ibo_bd_active_min: 10_000,
                bd_active_min: 10_000,
            },
            promotion: PromotionPolicy {
                volume_threshold: 50_000,
                window_months: 2,
                bond_amount: 25_000,
            },
        }
    }

    /// Discount rate for a product/rank pair. An unknown product is a zero
    /// rate, not an error.
    pub fn discount_rate_bps(&self, product: &str, rank: Rank) -> u32 {
        self.product_discounts
            .get(product)
            .map(|rates| rates.for_rank(rank))
            .unwrap_or(0)
    }

    /// Checks the table once at load time. A malformed table invalidates
    /// every result derived from it, so callers fail fast instead of
    /// validating per calculation.
    pub fn validate(&self) -> Result<(), RuleConfigError> {
        for (context, rate_bps) in self.all_rates() {
            if rate_bps > FULL_RATE_BPS {
                return Err(RuleConfigError::RateOutOfRange { context, rate_bps });
            }
        }

        let descending = self.group_override.tiers.windows(2).all(|pair| {
            pair[0].min_active_directs > pair[1].min_active_directs
                && pair[0].min_group_volume > pair[1].min_group_volume
        });
        if !descending {
            return Err(RuleConfigError::OverrideTierOrder);
        }

        let descending = self
            .bd_service_fee
            .tiers
            .windows(2)
            .all(|pair| pair[0].min_group_volume > pair[1].min_group_volume);
        if !descending {
            return Err(RuleConfigError::ServiceFeeTierOrder);
        }

        if self.promotion.window_months == 0 {
            return Err(RuleConfigError::EmptyPromotionWindow);
        }

        Ok(())
    }

    fn all_rates(&self) -> Vec<(&'static str, u32)> {
        let mut rates = Vec::new();
        for product in self.product_discounts.values() {
            rates.push(("product discount", product.bp_bps));
            rates.push(("product discount", product.ibo_bps));
            rates.push(("product discount", product.bd_bps));
        }
        for tier in &self.group_override.tiers {
            rates.push(("group override", tier.rate_bps));
        }
        for tier in &self.bd_service_fee.tiers {
            rates.push(("service fee", tier.rate_bps));
        }
        rates.push(("lifetime incentive", self.lifetime_incentive.rate_bps));
        rates.push(("bd override", self.bd_override.rate_bps));
        rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_validates() {
        assert_eq!(RuleConfig::sunx_standard().validate(), Ok(()));
    }

    #[test]
    fn apply_rate_floors_exactly() {
        assert_eq!(apply_rate(12_000, 1_500), 1_800);
        assert_eq!(apply_rate(10_000, 200), 200);
        assert_eq!(apply_rate(3, 3_333), 0);
        assert_eq!(apply_rate(u64::MAX, FULL_RATE_BPS), u64::MAX);
    }

    #[test]
    fn unknown_product_or_rank_combination_yields_zero_rate() {
        let config = RuleConfig::sunx_standard();
        assert_eq!(
            config.discount_rate_bps("SUNX-DELUXE", Rank::BusinessPartner),
            0
        );
        assert_eq!(
            config.discount_rate_bps("SUNX-BASIC", Rank::BusinessPartner),
            1_500
        );
    }

    #[test]
    fn misordered_override_tiers_fail_validation() {
        let mut config = RuleConfig::sunx_standard();
        config.group_override.tiers.reverse();
        assert_eq!(config.validate(), Err(RuleConfigError::OverrideTierOrder));
    }

    #[test]
    fn misordered_service_fee_tiers_fail_validation() {
        let mut config = RuleConfig::sunx_standard();
        config.bd_service_fee.tiers.swap(0, 2);
        assert_eq!(config.validate(), Err(RuleConfigError::ServiceFeeTierOrder));
    }

    #[test]
    fn rates_above_one_hundred_percent_fail_validation() {
        let mut config = RuleConfig::sunx_standard();
        config.lifetime_incentive.rate_bps = 10_001;
        assert_eq!(
            config.validate(),
            Err(RuleConfigError::RateOutOfRange {
                context: "lifetime incentive",
                rate_bps: 10_001,
            })
        );
    }

    #[test]
    fn zero_month_promotion_window_fails_validation() {
        let mut config = RuleConfig::sunx_standard();
        config.promotion.window_months = 0;
        assert_eq!(config.validate(), Err(RuleConfigError::EmptyPromotionWindow));
    }
}
