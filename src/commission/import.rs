//! Loading sale batches and hierarchy snapshots from external exports.
//!
//! The CSV importer tolerates bad rows: a malformed record is logged and
//! recorded, never fatal, so one corrupted line cannot block an unrelated
//! payout. Unreadable files and malformed JSON still fail the whole load.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::domain::{Reseller, ResellerId, Sale, SaleChannel, SaleId, SaleStatus};
use super::hierarchy::HierarchySnapshot;

#[derive(Debug, Error)]
pub enum SalesImportError {
    #[error("failed to read sales export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sales CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum SnapshotImportError {
    #[error("failed to read hierarchy snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hierarchy snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One rejected CSV row and why it was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    /// 1-based file line, counting the header.
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct SalesImport {
    pub sales: Vec<Sale>,
    pub warnings: Vec<RowWarning>,
}

/// Reads sales batches from the CSV export format
/// (`id,reseller_id,amount,date,channel,status,product`).
pub struct SalesCsvImporter;

impl SalesCsvImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<SalesImport, SalesImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SalesImport, SalesImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut import = SalesImport::default();
        for (index, record) in csv_reader.deserialize::<SalesRow>().enumerate() {
            let line = index as u64 + 2; // header occupies line 1
            let row = match record {
                Ok(row) => row,
                Err(err) => {
                    warn!(line, error = %err, "skipping malformed sales row");
                    import.warnings.push(RowWarning {
                        line,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            match row.into_sale() {
                Ok(sale) => import.sales.push(sale),
                Err(reason) => {
                    warn!(line, %reason, "skipping malformed sales row");
                    import.warnings.push(RowWarning { line, reason });
                }
            }
        }

        Ok(import)
    }
}

#[derive(Debug, Deserialize)]
struct SalesRow {
    id: u64,
    reseller_id: String,
    amount: u64,
    date: String,
    channel: String,
    status: String,
    product: String,
}

impl SalesRow {
    fn into_sale(self) -> Result<Sale, String> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|err| format!("bad date '{}': {err}", self.date))?;

        let channel = match self.channel.as_str() {
            "POS" => SaleChannel::PointOfSale,
            "Sale Order" => SaleChannel::SaleOrder,
            other => return Err(format!("unknown channel '{other}'")),
        };

        let status = match self.status.to_ascii_lowercase().as_str() {
            "pending" => SaleStatus::Pending,
            "confirmed" => SaleStatus::Confirmed,
            other => return Err(format!("unknown status '{other}'")),
        };

        if self.amount == 0 {
            return Err("sale amount must be positive".to_string());
        }
        if self.product.is_empty() {
            return Err("missing product".to_string());
        }

        Ok(Sale {
            id: SaleId(self.id),
            reseller_id: ResellerId(self.reseller_id),
            amount: self.amount,
            date,
            channel,
            status,
            product: self.product,
        })
    }
}

/// Loads a hierarchy snapshot from the JSON map format produced by the
/// enrollment tooling (`{"user1": { ... }, ...}`). Nodes are keyed by their
/// own ids after load, so a mismatched map key is harmless.
pub fn snapshot_from_json_path(
    path: impl AsRef<Path>,
) -> Result<HierarchySnapshot, SnapshotImportError> {
    let file = std::fs::File::open(path)?;
    snapshot_from_json_reader(file)
}

pub fn snapshot_from_json_reader<R: Read>(
    reader: R,
) -> Result<HierarchySnapshot, SnapshotImportError> {
    let nodes: BTreeMap<ResellerId, Reseller> = serde_json::from_reader(reader)?;
    Ok(HierarchySnapshot::from_nodes(nodes.into_values()))
}
