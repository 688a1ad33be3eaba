//! Report engine
//!
//! Fetches a user's expenses through optional filters, renders them in the
//! requested format and either returns the text inline or hands the bytes to
//! a [`FileTransport`]. Also owns the report provenance records.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::aggregate::{aggregate_by_category, CategoryTotals};
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::export::pdf::fits_on_page;
use crate::export::{render_csv, render_pdf, render_text, ReportDocument};
use crate::i18n::Translator;
use crate::models::{Expense, NewReport, Report, ReportFilters, ReportFormat, ReportId, UserId};
use crate::storage::{absolute_path, ExpenseQuery, PreferenceStore, Storage};
use crate::transport::FileTransport;

/// Where a file-backed report should be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub directory: PathBuf,
    pub filename: String,
}

impl Destination {
    pub fn new(directory: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
        }
    }

    /// Split a full path into directory and file name
    pub fn from_path(path: &Path) -> LedgerResult<Self> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                LedgerError::Validation(format!("'{}' is not a file path", path.display()))
            })?;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self::new(directory, filename))
    }
}

/// Parameters of one `generate` call
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub user_id: UserId,
    pub format: ReportFormat,
    pub filters: ReportFilters,
    /// Output location for csv/pdf; defaults to the configured reports directory
    pub destination: Option<Destination>,
    /// Insert a report record for a file-backed report
    pub record: bool,
}

impl ReportRequest {
    pub fn new(user_id: UserId, format: ReportFormat) -> Self {
        Self {
            user_id,
            format,
            filters: ReportFilters::default(),
            destination: None,
            record: false,
        }
    }

    pub fn with_filters(mut self, filters: ReportFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn to_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn recorded(mut self) -> Self {
        self.record = true;
        self
    }
}

/// Result of `generate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutput {
    /// No expense matched the filters; nothing was written
    Empty,
    /// Text report content
    Inline(String),
    /// A csv/pdf artifact and, when requested, its record
    File {
        path: PathBuf,
        report_id: Option<ReportId>,
    },
}

impl ReportOutput {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Report generation and provenance over a storage handle
pub struct ReportEngine<'a> {
    storage: &'a Storage,
    transport: &'a dyn FileTransport,
    translator: &'a dyn Translator,
    preferences: &'a PreferenceStore,
    settings: &'a Settings,
    reports_dir: PathBuf,
}

impl<'a> ReportEngine<'a> {
    pub fn new(
        storage: &'a Storage,
        transport: &'a dyn FileTransport,
        translator: &'a dyn Translator,
        preferences: &'a PreferenceStore,
        settings: &'a Settings,
        reports_dir: PathBuf,
    ) -> Self {
        Self {
            storage,
            transport,
            translator,
            preferences,
            settings,
            reports_dir,
        }
    }

    /// Default directory for file-backed reports
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// The user's expenses matching every present filter, oldest ID first
    pub fn fetch(&self, user_id: UserId, filters: &ReportFilters) -> LedgerResult<Vec<Expense>> {
        filters.validate().map_err(LedgerError::Validation)?;
        let query = ExpenseQuery {
            start: filters.start,
            end: filters.end,
            category: filters.category.as_deref(),
        };
        self.storage.expenses.find(user_id, &query)
    }

    /// Totals per category over the filtered expenses
    pub fn category_totals(
        &self,
        user_id: UserId,
        filters: &ReportFilters,
    ) -> LedgerResult<CategoryTotals> {
        aggregate_by_category(&self.fetch(user_id, filters)?)
    }

    /// Produce a report
    ///
    /// An empty match yields [`ReportOutput::Empty`] for every format and
    /// writes nothing. Text is returned inline and never recorded.
    pub fn generate(&self, request: &ReportRequest) -> LedgerResult<ReportOutput> {
        let expenses = self.fetch(request.user_id, &request.filters)?;
        if expenses.is_empty() {
            info!(
                "No expenses matched {} report for {}",
                request.format, request.user_id
            );
            return Ok(ReportOutput::Empty);
        }

        let locale = self.preferences.language(request.user_id)?;
        let bytes = match request.format {
            ReportFormat::Text => {
                let doc = ReportDocument::build(&expenses, self.translator, &locale);
                return Ok(ReportOutput::Inline(render_text(&doc)));
            }
            ReportFormat::Csv => render_csv(&expenses)?,
            ReportFormat::Pdf => {
                if !fits_on_page(expenses.len()) {
                    warn!(
                        "{} expenses exceed one PDF page; trailing lines will be cut off",
                        expenses.len()
                    );
                }
                let doc = ReportDocument::build(&expenses, self.translator, &locale);
                render_pdf(&doc)
            }
        };

        let destination = match &request.destination {
            Some(destination) => destination.clone(),
            None => Destination::new(
                self.reports_dir.clone(),
                self.settings.report_file_name(request.user_id, request.format),
            ),
        };
        let saved = self
            .transport
            .save(&bytes, &destination.directory, &destination.filename)?;
        let path = absolute_path(&saved)?;
        info!(
            "Wrote {} report with {} expenses to {}",
            request.format,
            expenses.len(),
            path.display()
        );

        let report_id = if request.record {
            let record = NewReport::new(
                request.user_id,
                request.format,
                request.filters.clone(),
                Some(path.clone()),
            );
            match self.storage.reports.insert(&record) {
                Ok(id) => Some(id),
                Err(e) => {
                    // Leave no artifact without the record that was asked for
                    if let Err(cleanup) = self.transport.delete(&path) {
                        warn!("Failed to remove {}: {}", path.display(), cleanup);
                    }
                    return Err(e);
                }
            }
        } else {
            None
        };

        Ok(ReportOutput::File { path, report_id })
    }

    /// Record a report explicitly; the file path is stored in absolute form
    pub fn log_report(
        &self,
        user_id: UserId,
        format: ReportFormat,
        filters: ReportFilters,
        file_path: Option<PathBuf>,
    ) -> LedgerResult<ReportId> {
        let file_path = file_path.as_deref().map(absolute_path).transpose()?;
        self.storage
            .reports
            .insert(&NewReport::new(user_id, format, filters, file_path))
    }

    pub fn list_reports(&self, user_id: UserId) -> LedgerResult<Vec<Report>> {
        self.storage.reports.list(user_id)
    }

    pub fn get_report(&self, user_id: UserId, id: ReportId) -> LedgerResult<Option<Report>> {
        self.storage.reports.get(user_id, id)
    }

    /// Delete a report record, then its file
    ///
    /// Returns the removed record, or `None` if the user has no such report.
    /// The file removal is best effort: a failure is logged and left for
    /// [`sweep_orphaned_files`](Self::sweep_orphaned_files).
    pub fn delete_report(&self, user_id: UserId, id: ReportId) -> LedgerResult<Option<Report>> {
        let Some(report) = self.storage.reports.delete(user_id, id)? else {
            debug!("No report {} for {}", id, user_id);
            return Ok(None);
        };

        if let Some(path) = &report.file_path {
            match self.transport.delete(path) {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    debug!("Report file {} was already gone", path.display());
                }
                Err(e) => warn!(
                    "Report {} deleted but its file {} remains: {}",
                    id,
                    path.display(),
                    e
                ),
            }
        }

        info!("Deleted report {} for {}", id, user_id);
        Ok(Some(report))
    }

    /// Remove csv/pdf files in `directory` that no report record references
    pub fn sweep_orphaned_files(&self, directory: &Path) -> LedgerResult<Vec<PathBuf>> {
        let referenced = self
            .storage
            .reports
            .referenced_paths()?
            .iter()
            .map(|p| absolute_path(p))
            .collect::<LedgerResult<HashSet<_>>>()?;
        let mut removed = Vec::new();

        for path in self.transport.list(directory)? {
            let is_report = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    [ReportFormat::Csv, ReportFormat::Pdf]
                        .iter()
                        .any(|f| f.extension().eq_ignore_ascii_case(ext))
                })
                .unwrap_or(false);
            if !is_report || referenced.contains(&absolute_path(&path)?) {
                continue;
            }

            match self.transport.delete(&path) {
                Ok(()) => removed.push(path),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        if !removed.is_empty() {
            info!("Swept {} orphaned report files", removed.len());
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;
    use crate::models::{BudgetPeriod, DateWindow, Money, NewBudget, NewExpense};
    use crate::services::BudgetService;
    use crate::transport::LocalFileTransport;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct Fixture {
        storage: Storage,
        transport: LocalFileTransport,
        catalog: Catalog,
        preferences: PreferenceStore,
        settings: Settings,
        root: PathBuf,
        _temp_dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            Self {
                storage: Storage::in_memory().unwrap(),
                transport: LocalFileTransport::new(),
                catalog: Catalog::new(),
                preferences: PreferenceStore::in_memory("en"),
                settings: Settings::default(),
                root: std::fs::canonicalize(temp_dir.path()).unwrap(),
                _temp_dir: temp_dir,
            }
        }

        fn engine(&self) -> ReportEngine<'_> {
            ReportEngine::new(
                &self.storage,
                &self.transport,
                &self.catalog,
                &self.preferences,
                &self.settings,
                self.root.join("reports"),
            )
        }

        /// Groceries 100 (Food), Lunch 40 (Food), Bus 15 (Transport)
        fn seed(&self, user: UserId) {
            let day = NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            for (cents, description, category) in [
                (10000, "Groceries", "Food"),
                (4000, "Lunch", "Food"),
                (1500, "Bus", "Transport"),
            ] {
                self.storage
                    .expenses
                    .insert(
                        &NewExpense::new(user, Money::from_cents(cents), description)
                            .with_category(category)
                            .at(day),
                    )
                    .unwrap();
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_scenario_budget_exceeded() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        fx.storage
            .budgets
            .insert(&NewBudget::new(
                user,
                "Food",
                Money::from_units(100),
                BudgetPeriod::Monthly,
                window,
            ))
            .unwrap();
        fx.storage
            .expenses
            .insert(
                &NewExpense::new(user, Money::from_units(110), "Dinner")
                    .with_category("Food")
                    .at(date(2024, 1, 20).and_hms_opt(20, 0, 0).unwrap()),
            )
            .unwrap();

        let status = BudgetService::new(&fx.storage)
            .check_budget_status(user, "Food", window.start(), window.end())
            .unwrap();
        assert!(status.is_exceeded());
        assert_eq!(status.total(), Money::from_units(250));
        assert_eq!(status.limit(), Some(Money::from_units(100)));
    }

    #[test]
    fn test_scenario_csv_food_rows() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);

        let request = ReportRequest::new(user, ReportFormat::Csv)
            .with_filters(ReportFilters::new().in_category("Food"));
        let output = fx.engine().generate(&request).unwrap();

        let ReportOutput::File { path, report_id } = output else {
            panic!("expected a file, got {:?}", output);
        };
        assert_eq!(path, fx.root.join("reports").join("1_report.csv"));
        assert!(report_id.is_none());

        let mut reader = ::csv::Reader::from_path(&path).unwrap();
        let descriptions: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[3].to_string())
            .collect();
        assert_eq!(descriptions, vec!["Groceries", "Lunch"]);
    }

    #[test]
    fn test_scenario_delete_report_removes_row_and_file() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        let engine = fx.engine();

        let request = ReportRequest::new(user, ReportFormat::Pdf)
            .to_destination(Destination::new(&fx.root, "jan.pdf"))
            .recorded();
        let ReportOutput::File { path, report_id } = engine.generate(&request).unwrap() else {
            panic!("expected a file");
        };
        let report_id = report_id.unwrap();
        assert!(path.exists());
        assert_eq!(
            engine.get_report(user, report_id).unwrap().unwrap().file_path,
            Some(path.clone())
        );

        let deleted = engine.delete_report(user, report_id).unwrap().unwrap();
        assert_eq!(deleted.file_path, Some(path.clone()));
        assert!(!path.exists());
        assert!(engine.get_report(user, report_id).unwrap().is_none());
        assert!(engine.delete_report(user, report_id).unwrap().is_none());
    }

    #[test]
    fn test_empty_result_for_every_format() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        let engine = fx.engine();
        let filters = ReportFilters::new().in_category("Travel");

        for format in [ReportFormat::Text, ReportFormat::Csv, ReportFormat::Pdf] {
            let request = ReportRequest::new(user, format)
                .with_filters(filters.clone())
                .recorded();
            assert_eq!(engine.generate(&request).unwrap(), ReportOutput::Empty);
        }
        assert!(engine.list_reports(user).unwrap().is_empty());
        assert!(!engine.reports_dir().exists());
    }

    #[test]
    fn test_text_report_inline_and_unrecorded() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        let engine = fx.engine();

        let output = engine
            .generate(&ReportRequest::new(user, ReportFormat::Text).recorded())
            .unwrap();
        let ReportOutput::Inline(text) = output else {
            panic!("expected inline text");
        };
        assert!(text.starts_with("Expense Report"));
        assert!(text.contains("Description: Bus"));
        assert!(text.ends_with("Total expenses: 3"));
        assert!(engine.list_reports(user).unwrap().is_empty());
    }

    #[test]
    fn test_text_report_uses_user_language() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        fx.preferences.set_language(user, "es").unwrap();

        let output = fx
            .engine()
            .generate(&ReportRequest::new(user, ReportFormat::Text))
            .unwrap();
        let ReportOutput::Inline(text) = output else {
            panic!("expected inline text");
        };
        assert!(text.starts_with("Reporte de gastos"));
        assert!(text.ends_with("Total de gastos: 3"));
    }

    #[test]
    fn test_fetch_filters_are_conjunctive() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        fx.storage
            .expenses
            .insert(
                &NewExpense::new(user, Money::from_units(30), "Snacks")
                    .with_category("Food")
                    .at(date(2024, 2, 2).and_hms_opt(8, 0, 0).unwrap()),
            )
            .unwrap();
        let engine = fx.engine();

        let feb_food = ReportFilters::new()
            .since(date(2024, 2, 1))
            .until(date(2024, 2, 29))
            .in_category("Food");
        let rows = engine.fetch(user, &feb_food).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Snacks");

        let all = engine.fetch(user, &ReportFilters::new()).unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let inverted = ReportFilters::new()
            .since(date(2024, 2, 1))
            .until(date(2024, 1, 1));
        assert!(engine.fetch(user, &inverted).unwrap_err().is_validation());
    }

    #[test]
    fn test_category_totals() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);

        let totals = fx
            .engine()
            .category_totals(user, &ReportFilters::new())
            .unwrap();
        assert_eq!(totals[&Some("Food".to_string())], Money::from_units(140));
        assert_eq!(totals[&Some("Transport".to_string())], Money::from_units(15));
    }

    #[test]
    fn test_log_report_enforces_file_path() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        let engine = fx.engine();

        let text_id = engine
            .log_report(user, ReportFormat::Text, ReportFilters::new(), None)
            .unwrap();
        assert!(engine
            .log_report(user, ReportFormat::Csv, ReportFilters::new(), None)
            .unwrap_err()
            .is_validation());

        let reports = engine.list_reports(user).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, text_id);
        assert!(engine.list_reports(UserId::new(2)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_report_tolerates_missing_file() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        let engine = fx.engine();
        let gone = fx.root.join("gone.csv");

        let id = engine
            .log_report(user, ReportFormat::Csv, ReportFilters::new(), Some(gone.clone()))
            .unwrap();
        let deleted = engine.delete_report(user, id).unwrap().unwrap();
        assert_eq!(deleted.file_path, Some(gone));
    }

    #[test]
    fn test_delete_report_of_other_user_is_noop() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let id = engine
            .log_report(UserId::new(1), ReportFormat::Text, ReportFilters::new(), None)
            .unwrap();

        assert!(engine.delete_report(UserId::new(2), id).unwrap().is_none());
        assert!(engine.get_report(UserId::new(1), id).unwrap().is_some());
    }

    #[test]
    fn test_sweep_orphaned_files() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        let engine = fx.engine();
        let dir = fx.root.join("out");

        let kept = engine
            .generate(
                &ReportRequest::new(user, ReportFormat::Csv)
                    .to_destination(Destination::new(&dir, "kept.csv"))
                    .recorded(),
            )
            .unwrap();
        let orphan = engine
            .generate(
                &ReportRequest::new(user, ReportFormat::Pdf)
                    .to_destination(Destination::new(&dir, "orphan.pdf")),
            )
            .unwrap();
        std::fs::write(dir.join("notes.md"), "keep me").unwrap();

        let removed = engine.sweep_orphaned_files(&dir).unwrap();
        assert_eq!(removed, vec![dir.join("orphan.pdf")]);
        assert!(matches!(orphan, ReportOutput::File { .. }));
        let ReportOutput::File { path, .. } = kept else {
            panic!("expected a file");
        };
        assert!(path.exists());
        assert!(dir.join("notes.md").exists());

        assert!(engine.sweep_orphaned_files(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_sweep_keeps_report_recorded_through_dotted_path() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        fx.seed(user);
        let engine = fx.engine();
        std::fs::create_dir_all(fx.root.join("sub")).unwrap();
        let dotted = fx.root.join("sub").join("..").join("out");

        let ReportOutput::File { path, report_id } = engine
            .generate(
                &ReportRequest::new(user, ReportFormat::Csv)
                    .to_destination(Destination::new(&dotted, "jan.csv"))
                    .recorded(),
            )
            .unwrap()
        else {
            panic!("expected a file");
        };
        let kept = fx.root.join("out").join("jan.csv");
        assert_eq!(path, kept);
        assert_eq!(
            engine.get_report(user, report_id.unwrap()).unwrap().unwrap().file_path,
            Some(kept.clone())
        );

        assert!(engine.sweep_orphaned_files(&dotted).unwrap().is_empty());
        assert!(engine
            .sweep_orphaned_files(&fx.root.join("out"))
            .unwrap()
            .is_empty());
        assert!(kept.exists());
    }

    #[test]
    fn test_log_report_stores_absolute_path() {
        let fx = Fixture::new();
        let user = UserId::new(1);
        let engine = fx.engine();
        let relative = Path::new("ledger-relative-out").join("r.csv");

        let id = engine
            .log_report(user, ReportFormat::Csv, ReportFilters::new(), Some(relative.clone()))
            .unwrap();
        let stored = engine.get_report(user, id).unwrap().unwrap().file_path.unwrap();
        assert!(stored.is_absolute());
        assert!(stored.ends_with(&relative));
    }

    #[test]
    fn test_destination_from_path() {
        let dest = Destination::from_path(Path::new("/tmp/out/r.csv")).unwrap();
        assert_eq!(dest, Destination::new("/tmp/out", "r.csv"));
        assert!(Destination::from_path(Path::new("/")).is_err());
    }
}
