//! Report model
//!
//! A provenance record for a generated report: who asked for it, with which
//! filters, in which format, and where the artifact was written.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::ids::{ReportId, UserId};
use super::period::DATE_FORMAT;

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    /// Whether this format produces an artifact handed to the file transport
    pub fn is_file_backed(&self) -> bool {
        matches!(self, Self::Csv | Self::Pdf)
    }

    /// File extension for file-backed formats
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

/// A format name outside text/csv/pdf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedFormat(pub String);

impl fmt::Display for UnsupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported report format '{}'", self.0)
    }
}

impl std::error::Error for UnsupportedFormat {}

/// Query parameters used to produce a report; all optional and conjunctive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ReportFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Reject windows with both bounds present and `start > end`
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(format!(
                    "Start date {} is after end date {}",
                    start.format(DATE_FORMAT),
                    end.format(DATE_FORMAT)
                ));
            }
        }
        Ok(())
    }
}

/// A stored report record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub user_id: UserId,
    pub creation_date: NaiveDateTime,
    pub filters: ReportFilters,
    pub file_path: Option<PathBuf>,
    pub format: ReportFormat,
}

/// A report record that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: UserId,
    pub format: ReportFormat,
    pub filters: ReportFilters,
    pub file_path: Option<PathBuf>,
}

impl NewReport {
    pub fn new(
        user_id: UserId,
        format: ReportFormat,
        filters: ReportFilters,
        file_path: Option<PathBuf>,
    ) -> Self {
        Self {
            user_id,
            format,
            filters,
            file_path,
        }
    }

    /// A file path must be present exactly when the format is file-backed
    pub fn validate(&self) -> Result<(), String> {
        match (self.format.is_file_backed(), &self.file_path) {
            (true, None) => Err(format!("{} reports require a file path", self.format)),
            (false, Some(_)) => Err(format!("{} reports cannot have a file path", self.format)),
            _ => Ok(()),
        }
    }
}
