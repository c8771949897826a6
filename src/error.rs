use std::fmt;

use crate::commission::hierarchy::HierarchyError;
use crate::commission::import::{SalesImportError, SnapshotImportError};
use crate::commission::rules::RuleConfigError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Rules(RuleConfigError),
    SalesImport(SalesImportError),
    SnapshotImport(SnapshotImportError),
    Hierarchy(HierarchyError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Rules(err) => write!(f, "rule table error: {err}"),
            AppError::SalesImport(err) => write!(f, "sales import error: {err}"),
            AppError::SnapshotImport(err) => write!(f, "snapshot import error: {err}"),
            AppError::Hierarchy(err) => write!(f, "hierarchy error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::SalesImport(err) => Some(err),
            AppError::SnapshotImport(err) => Some(err),
            AppError::Hierarchy(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RuleConfigError> for AppError {
    fn from(value: RuleConfigError) -> Self {
        Self::Rules(value)
    }
}

impl From<SalesImportError> for AppError {
    fn from(value: SalesImportError) -> Self {
        Self::SalesImport(value)
    }
}

impl From<SnapshotImportError> for AppError {
    fn from(value: SnapshotImportError) -> Self {
        Self::SnapshotImport(value)
    }
}

impl From<HierarchyError> for AppError {
    fn from(value: HierarchyError) -> Self {
        Self::Hierarchy(value)
    }
}
