//! Multi-level commission computation for the SUNX reseller network.
//!
//! The flow runs bottom-up through this module: a [`rules::RuleConfig`] and a
//! [`hierarchy::HierarchySnapshot`] feed the pure [`eligibility`] evaluators,
//! the [`engine::CommissionEngine`] turns a confirmed sale into commission
//! entries, and [`aggregate`] folds batches into per-recipient totals that
//! [`report`] shapes for consumers.

pub mod aggregate;
pub mod domain;
pub mod eligibility;
pub mod engine;
pub mod hierarchy;
pub mod import;
pub mod report;
pub mod rules;
pub mod sample;

pub use aggregate::{aggregate, CommissionRun, RecipientBreakdown, SkippedSale};
pub use domain::{
    CommissionEntry, CommissionKind, Rank, Reseller, ResellerId, Sale, SaleChannel, SaleId,
    SaleStatus,
};
pub use eligibility::{
    active_downline_ibos, bd_service_fee_tier, group_override_tier, promotion_status,
    qualifying_direct_bps, PromotionStatus,
};
pub use engine::CommissionEngine;
pub use hierarchy::{HierarchyError, HierarchySnapshot};
pub use import::{
    snapshot_from_json_path, snapshot_from_json_reader, RowWarning, SalesCsvImporter, SalesImport,
    SalesImportError, SnapshotImportError,
};
pub use report::CommissionReport;
pub use rules::{RuleConfig, RuleConfigError};
