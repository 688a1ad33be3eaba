use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_ledger::cli::{
    handle_budget_command, handle_expense_command, handle_language_command,
    handle_report_command, BudgetCommands, CliContext, ExpenseCommands, LanguageCommands,
    ReportCommands,
};
use expense_ledger::config::{LedgerPaths, Settings};
use expense_ledger::i18n::Catalog;
use expense_ledger::models::UserId;
use expense_ledger::storage::{PreferenceStore, Storage};
use expense_ledger::transport::LocalFileTransport;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Personal expense ledger with budgets and reports",
    long_about = "Track expenses per user, set category budgets over date windows, \
                  and export filtered reports as text, CSV or PDF."
)]
struct Cli {
    /// Acting user ID
    #[arg(short, long, global = true, env = "LEDGER_USER_ID", default_value = "1")]
    user: UserId,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Language preference commands
    #[command(subcommand, alias = "lang")]
    Language(LanguageCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("ledger - personal expense ledger");
        println!();
        println!("Run 'ledger --help' for usage information.");
        return Ok(());
    };

    if let Commands::Config = command {
        println!("Expense Ledger Configuration");
        println!("============================");
        println!("Base directory:    {}", paths.base_dir().display());
        println!("Database:          {}", paths.database_file().display());
        println!("Reports directory: {}", settings.reports_dir(&paths).display());
        println!("Settings file:     {}", paths.settings_file().display());
        println!();
        println!("Settings:");
        println!("  Default locale:   {}", settings.default_locale);
        println!("  Report file stem: {}", settings.report_file_stem);
        return Ok(());
    }

    // Initialize storage
    let storage = Storage::open(&paths)?;
    let preferences =
        PreferenceStore::load(paths.preferences_file(), settings.default_locale.clone())?;
    let catalog = Catalog::new();
    let transport = LocalFileTransport::new();

    let ctx = CliContext {
        storage: &storage,
        paths: &paths,
        settings: &settings,
        preferences: &preferences,
        translator: &catalog,
        transport: &transport,
        user_id: cli.user,
    };

    match command {
        Commands::Expense(cmd) => handle_expense_command(&ctx, cmd)?,
        Commands::Budget(cmd) => handle_budget_command(&ctx, cmd)?,
        Commands::Report(cmd) => handle_report_command(&ctx, cmd)?,
        Commands::Language(cmd) => handle_language_command(&ctx, cmd)?,
        Commands::Config => {}
    }

    Ok(())
}
