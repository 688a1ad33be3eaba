//! Report CLI commands

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

use super::CliContext;
use crate::error::LedgerResult;
use crate::models::expense::TIMESTAMP_FORMAT;
use crate::models::period::parse_date;
use crate::models::{ReportFilters, ReportFormat, ReportId};
use crate::reports::{Destination, ReportOutput, ReportRequest};

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate a report of your expenses
    Generate {
        /// Output format: text, csv or pdf
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Earliest date (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Output file for csv/pdf (defaults to the reports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep a record of the generated file
        #[arg(long)]
        record: bool,
    },

    /// List recorded reports
    #[command(alias = "ls")]
    List,

    /// Delete a recorded report and its file
    #[command(alias = "rm")]
    Delete {
        /// Report ID
        id: ReportId,
    },

    /// Remove report files that no record refers to
    Sweep {
        /// Directory to sweep (defaults to the reports directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(ctx: &CliContext<'_>, cmd: ReportCommands) -> LedgerResult<()> {
    let user_id = ctx.user_id;
    let engine = ctx.report_engine();

    match cmd {
        ReportCommands::Generate {
            format,
            from,
            to,
            category,
            output,
            record,
        } => {
            let format: ReportFormat = format.parse()?;
            let filters = ReportFilters {
                start: from,
                end: to,
                category: category.filter(|c| !c.trim().is_empty()),
            };

            let mut request = ReportRequest::new(user_id, format).with_filters(filters);
            if let Some(output) = output {
                request = request.to_destination(Destination::from_path(&output)?);
            }
            if record {
                request = request.recorded();
            }

            match engine.generate(&request)? {
                ReportOutput::Empty => ctx.say("no_report_data", &[])?,
                ReportOutput::Inline(text) => println!("{}", text),
                ReportOutput::File { path, report_id } => {
                    ctx.say("file_saved", &[("path", path.display().to_string())])?;
                    if let Some(id) = report_id {
                        ctx.say("report_logged", &[("id", id.get().to_string())])?;
                    }
                }
            }
        }

        ReportCommands::List => {
            let reports = engine.list_reports(user_id)?;
            if reports.is_empty() {
                return ctx.say("no_reports_found", &[]);
            }
            ctx.say("here_are_your_reports", &[])?;
            for report in &reports {
                ctx.say(
                    "report_line",
                    &[
                        ("id", report.id.get().to_string()),
                        ("format", report.format.to_string()),
                        (
                            "date",
                            report.creation_date.format(TIMESTAMP_FORMAT).to_string(),
                        ),
                        (
                            "path",
                            report
                                .file_path
                                .as_ref()
                                .map(|p| p.display().to_string())
                                .unwrap_or_else(|| "-".into()),
                        ),
                    ],
                )?;
            }
        }

        ReportCommands::Delete { id } => {
            let key = match engine.delete_report(user_id, id)? {
                Some(_) => "report_deleted",
                None => "report_not_found",
            };
            ctx.say(key, &[("id", id.get().to_string())])?;
        }

        ReportCommands::Sweep { dir } => {
            let dir = dir.unwrap_or_else(|| engine.reports_dir().to_path_buf());
            let removed = engine.sweep_orphaned_files(&dir)?;
            ctx.say("orphans_removed", &[("count", removed.len().to_string())])?;
        }
    }

    Ok(())
}
