//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::workbook::WorkbookSession;
use crate::workbook::schema::SchemaRegistry;

#[derive(Parser)]
#[command(
    name = "engins-cli",
    version,
    about = "View, edit and summarize equipment maintenance workbooks"
)]
pub struct Cli {
    /// Path to the maintenance workbook
    #[arg(long, global = true, default_value = "ENGINS.xlsx")]
    pub file: PathBuf,

    /// TOML file replacing the built-in sheet schemas
    #[arg(long, global = true)]
    pub schemas: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List workbook sheets and their recognition status
    Sheets,

    /// Print a normalized sheet
    Show {
        /// Sheet name
        sheet: String,
        /// Keep only rows of this section (BG/YSF sheets)
        #[arg(long)]
        section: Option<String>,
        /// Keep only rows matching this value of the sheet's filter column
        #[arg(long)]
        filter: Option<String>,
        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Update numeric fields of one row and save the workbook
    Update {
        /// Sheet name
        sheet: String,
        /// Equipment identifier of the row to edit
        #[arg(long)]
        equipment: String,
        /// Sub-assembly of the row to edit
        #[arg(long)]
        subassembly: String,
        /// Field assignment, e.g. --set "Quantité SE installée=4" (repeatable)
        #[arg(long = "set", value_name = "COLUMN=VALUE", required = true)]
        set: Vec<String>,
        /// Validate without modifying the workbook
        #[arg(long)]
        dry_run: bool,
    },

    /// List the distinct values of a column
    Values {
        /// Sheet name
        sheet: String,
        /// Column label (aliases accepted)
        column: String,
        /// Scope to one equipment, e.g. its sub-assembly list
        #[arg(long)]
        equipment: Option<String>,
    },

    /// Export a normalized sheet to CSV or Excel
    Export {
        /// Sheet name
        sheet: String,
        /// Output path; the extension picks the format (.csv or .xlsx)
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print statistics and stock alerts
    Dashboard {
        /// Sheet name; all recognized sheets when omitted
        sheet: Option<String>,
        /// Also write a formatted Excel report
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn run(cli: Cli) -> Result<()> {
    let registry = match &cli.schemas {
        Some(path) => SchemaRegistry::load(path)?,
        None => SchemaRegistry::builtin(),
    };
    let mut session = WorkbookSession::load(&cli.file, registry)?;

    match cli.command {
        Commands::Sheets => commands::sheets::handle_sheets(&session),
        Commands::Show {
            sheet,
            section,
            filter,
            limit,
            format,
        } => commands::show::handle_show(
            &session,
            &sheet,
            section.as_deref(),
            filter.as_deref(),
            limit,
            format,
        ),
        Commands::Update {
            sheet,
            equipment,
            subassembly,
            set,
            dry_run,
        } => commands::update::handle_update(
            &mut session,
            &sheet,
            &equipment,
            &subassembly,
            &set,
            dry_run,
        ),
        Commands::Values {
            sheet,
            column,
            equipment,
        } => commands::values::handle_values(&session, &sheet, &column, equipment.as_deref()),
        Commands::Export {
            sheet,
            output,
            section,
            filter,
        } => commands::export::handle_export(
            &session,
            &sheet,
            &output,
            section.as_deref(),
            filter.as_deref(),
        ),
        Commands::Dashboard { sheet, report } => {
            commands::dashboard::handle_dashboard(&session, sheet.as_deref(), report.as_deref())
        }
    }
}
