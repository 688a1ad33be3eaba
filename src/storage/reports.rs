//! Report repository
//!
//! Provenance records for generated reports. The row and the artifact it
//! points to are separate resources; this module only manages the row.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use super::database::Database;
use crate::error::{LedgerError, LedgerResult};
use crate::models::expense::{now_timestamp, TIMESTAMP_FORMAT};
use crate::models::{NewReport, Report, ReportFilters, ReportFormat, ReportId, UserId};

const SELECT_COLUMNS: &str =
    "SELECT report_id, user_id, creation_date, filters, file_path, format FROM reports";

/// Repository for report records
pub struct ReportRepository {
    db: Arc<Database>,
}

impl ReportRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a report record stamped with the current time
    pub fn insert(&self, report: &NewReport) -> LedgerResult<ReportId> {
        report.validate().map_err(LedgerError::Validation)?;
        let filters = serde_json::to_string(&report.filters)?;
        let file_path = report
            .file_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let id = self.db.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO reports (user_id, creation_date, filters, file_path, format)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    report.user_id.get(),
                    now_timestamp().format(TIMESTAMP_FORMAT).to_string(),
                    filters,
                    file_path,
                    report.format.as_str(),
                ],
            )?;
            Ok(ReportId::new(tx.last_insert_rowid()))
        })?;

        debug!("Logged {} report {} for {}", report.format, id, report.user_id);
        Ok(id)
    }

    pub fn get(&self, user_id: UserId, id: ReportId) -> LedgerResult<Option<Report>> {
        self.db.with_transaction(|tx| {
            let sql = format!("{} WHERE user_id = ?1 AND report_id = ?2", SELECT_COLUMNS);
            Ok(tx
                .query_row(&sql, params![user_id.get(), id.get()], row_to_report)
                .optional()?)
        })
    }

    /// All of the user's report records, oldest first
    pub fn list(&self, user_id: UserId) -> LedgerResult<Vec<Report>> {
        self.db.with_transaction(|tx| {
            let sql = format!("{} WHERE user_id = ?1 ORDER BY report_id ASC", SELECT_COLUMNS);
            let mut stmt = tx.prepare(&sql)?;
            let reports = stmt
                .query_map(params![user_id.get()], row_to_report)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(reports)
        })
    }

    /// Remove a report record, returning it if it existed
    pub fn delete(&self, user_id: UserId, id: ReportId) -> LedgerResult<Option<Report>> {
        self.db.with_transaction(|tx| {
            let sql = format!("{} WHERE user_id = ?1 AND report_id = ?2", SELECT_COLUMNS);
            let existing = tx
                .query_row(&sql, params![user_id.get(), id.get()], row_to_report)
                .optional()?;
            if existing.is_some() {
                tx.execute(
                    "DELETE FROM reports WHERE report_id = ?1 AND user_id = ?2",
                    params![id.get(), user_id.get()],
                )?;
            }
            Ok(existing)
        })
    }

    /// Every file path referenced by any report record, across all users
    pub fn referenced_paths(&self) -> LedgerResult<HashSet<PathBuf>> {
        self.db.with_transaction(|tx| {
            let mut stmt =
                tx.prepare("SELECT file_path FROM reports WHERE file_path IS NOT NULL")?;
            let paths = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .map(|p| p.map(PathBuf::from))
                .collect::<Result<HashSet<_>, _>>()?;
            Ok(paths)
        })
    }
}

fn row_to_report(row: &Row<'_>) -> rusqlite::Result<Report> {
    let creation_date: String = row.get(2)?;
    let creation_date = NaiveDateTime::parse_from_str(&creation_date, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let filters: String = row.get(3)?;
    let filters: ReportFilters = serde_json::from_str(&filters)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    let format: String = row.get(5)?;
    let format: ReportFormat = format
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Report {
        id: ReportId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        creation_date,
        filters,
        file_path: row.get::<_, Option<String>>(4)?.map(PathBuf::from),
        format,
    })
}
