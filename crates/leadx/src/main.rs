use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use leadx_core::config::Config;
use leadx_core::export::export_leads;
use leadx_core::filters::{
    AutomationCriteria, AutomationSort, DateField, DateRange, LeadCriteria, LeadSort,
    MessageCriteria, MessageSort, Selection, SheetCriteria, TemplateCriteria,
};
use leadx_core::mapping::LeadField;
use leadx_core::seed::Dataset;
use leadx_core::templates::known_category;
use leadx_core::types::{
    Channel, DeliveryStatus, LeadSource, LeadStatus, SyncStatus, TemplateKind, Trigger,
};
use leadx_core::workspace::{MappingSession, Workspace};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

const DATA_ENV: &str = "LEADX_DATA";
const PREVIEW_ROWS: usize = 3;

#[derive(Parser, Debug)]
#[command(author, version, about = "LeadX leads, automations and templates", long_about = None)]
struct Cli {
    /// JSON data file to use instead of the built-in demo data (or LEADX_DATA)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// TOML configuration file (or LEADX_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List leads
    Leads(LeadsArgs),
    /// Show one lead's profile, optionally editing its tags and notes first
    Lead(LeadArgs),
    /// List automations, optionally toggling one first
    Automations(AutomationsArgs),
    /// List message logs
    Messages(MessagesArgs),
    /// List connected sheets
    Sheets(SheetsArgs),
    /// List templates
    Templates(TemplatesArgs),
    /// Map the columns of a sheet export to lead fields
    Mapping(MappingArgs),
    /// Show credit usage
    Billing,
    /// Show dashboard totals
    Dashboard,
    /// Write leads to a CSV file
    ExportLeads(ExportArgs),
}

#[derive(Args, Debug, Default)]
struct LeadsArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: Selection<LeadStatus>,
    #[arg(long, default_value = "all")]
    source: Selection<LeadSource>,
    /// Date the range applies to: created or last-contacted
    #[arg(long, default_value = "created")]
    date_field: DateField,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    /// none, name, newest or contacted
    #[arg(long, default_value = "none")]
    sort: LeadSort,
}

impl LeadsArgs {
    fn criteria(&self) -> LeadCriteria {
        LeadCriteria {
            search: self.search.clone(),
            status: self.status.clone(),
            category: self.source.clone(),
            date_range: DateRange {
                from: self.from,
                to: self.to,
                field: self.date_field,
            },
        }
    }
}

#[derive(Args, Debug, Default)]
struct LeadArgs {
    id: String,
    #[arg(long = "add-tag")]
    add_tags: Vec<String>,
    #[arg(long = "remove-tag")]
    remove_tags: Vec<String>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug, Default)]
struct AutomationsArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    trigger: Selection<Trigger>,
    #[arg(long)]
    sheet: Option<String>,
    /// Flip the enabled flag of this automation before listing
    #[arg(long)]
    toggle: Option<String>,
    /// Order by run count, most first
    #[arg(long)]
    most_runs: bool,
}

#[derive(Args, Debug, Default)]
struct MessagesArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: Selection<DeliveryStatus>,
    #[arg(long, default_value = "all")]
    channel: Selection<Channel>,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long)]
    oldest_first: bool,
    /// Show the full log entry with this id
    #[arg(long)]
    show: Option<String>,
}

#[derive(Args, Debug, Default)]
struct SheetsArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: Selection<SyncStatus>,
}

#[derive(Args, Debug, Default)]
struct TemplatesArgs {
    #[arg(long, default_value = "all")]
    kind: Selection<TemplateKind>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Args, Debug, Default)]
struct MappingArgs {
    /// CSV export of the sheet; the first row holds the headers
    sheet: PathBuf,
    /// Name shown in messages; defaults to the file name
    #[arg(long)]
    sheet_name: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    source: Option<String>,
    /// Ask the assistant for a mapping before applying explicit columns
    #[arg(long)]
    auto: bool,
    #[arg(long)]
    save: bool,
    /// Import the mapped rows as leads
    #[arg(long)]
    import: bool,
}

#[derive(Args, Debug, Default)]
struct ExportArgs {
    path: PathBuf,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: Selection<LeadStatus>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let workspace = load_workspace(cli.data.as_deref(), cli.config.as_deref())?;
    let json = cli.json;

    match cli.command {
        Command::Leads(args) => {
            let leads = workspace.leads(&args.criteria(), args.sort).await?;
            render::emit(json, leads.as_slice(), render::leads)
        }
        Command::Lead(args) => handle_lead(&workspace, args, json).await,
        Command::Automations(args) => handle_automations(&workspace, args, json).await,
        Command::Messages(args) => handle_messages(&workspace, args, json).await,
        Command::Sheets(args) => {
            let criteria = SheetCriteria {
                search: args.search,
                status: args.status,
                ..SheetCriteria::default()
            };
            let sheets = workspace.sheets(&criteria).await?;
            render::emit(json, sheets.as_slice(), render::sheets)
        }
        Command::Templates(args) => {
            let category = template_category(&args.kind, args.category.as_deref())?;
            let criteria = TemplateCriteria {
                search: args.search,
                status: args.kind,
                category,
                ..TemplateCriteria::default()
            };
            let templates = workspace.templates(&criteria).await?;
            render::emit(json, templates.as_slice(), render::templates)
        }
        Command::Mapping(args) => handle_mapping(&workspace, args, json).await,
        Command::Billing => {
            let credits = workspace.credits();
            render::emit(json, &credits, render::billing)
        }
        Command::Dashboard => {
            let dashboard = workspace.dashboard().await?;
            render::emit(json, &dashboard, render::dashboard)
        }
        Command::ExportLeads(args) => {
            let criteria = LeadCriteria {
                search: args.search,
                status: args.status,
                ..LeadCriteria::default()
            };
            let leads = workspace.leads(&criteria, LeadSort::Unsorted).await?;
            let written = export_leads(&leads, &args.path)
                .with_context(|| format!("failed to export leads to {}", args.path.display()))?;
            println!("Exported {written} lead(s) to {}.", args.path.display());
            Ok(())
        }
    }
}

fn load_workspace(data: Option<&Path>, config: Option<&Path>) -> Result<Workspace> {
    let config = match config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::from_env().context("failed to load config from LEADX_CONFIG")?,
    };

    let data_path = data
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(DATA_ENV).map(PathBuf::from));
    let dataset = match data_path {
        Some(path) => Dataset::from_json_path(&path)
            .with_context(|| format!("failed to load data file {}", path.display()))?,
        None => Dataset::seed().context("built-in demo data is invalid")?,
    };

    Ok(Workspace::from_dataset(dataset, &config))
}

/// Resolves `--category` against the categories offered for the selected kind.
fn template_category(kind: &Selection<TemplateKind>, raw: Option<&str>) -> Result<Selection<String>> {
    let Some(raw) = raw else {
        return Ok(Selection::All);
    };
    let kind = match kind {
        Selection::All => None,
        Selection::Only(kind) => Some(*kind),
    };
    let category = known_category(kind, raw)
        .with_context(|| format!("unknown template category '{raw}'"))?;
    Ok(Selection::Only(category.to_string()))
}

async fn handle_lead(workspace: &Workspace, args: LeadArgs, json: bool) -> Result<()> {
    let id = args.id.as_str();
    for tag in &args.add_tags {
        workspace
            .add_lead_tag(id, tag)
            .await
            .with_context(|| format!("failed to tag lead '{id}'"))?;
    }
    for tag in &args.remove_tags {
        workspace
            .remove_lead_tag(id, tag)
            .await
            .with_context(|| format!("failed to untag lead '{id}'"))?;
    }
    if let Some(note) = &args.note {
        workspace
            .add_lead_note(id, note)
            .await
            .with_context(|| format!("failed to add a note to lead '{id}'"))?;
    }

    let lead = workspace
        .lead(id)
        .await
        .with_context(|| format!("failed to load lead '{id}'"))?;
    render::emit(json, &lead, render::lead_profile)
}

async fn handle_automations(workspace: &Workspace, args: AutomationsArgs, json: bool) -> Result<()> {
    if let Some(id) = &args.toggle {
        let outcome = workspace
            .toggle_automation(id)
            .await
            .with_context(|| format!("failed to toggle automation '{id}'"))?;
        println!("{}: {}", outcome.notice, outcome.automation.name);
    }

    let criteria = AutomationCriteria {
        search: args.search,
        status: args.trigger,
        category: args.sheet.map(Selection::Only).unwrap_or_default(),
        ..AutomationCriteria::default()
    };
    let sort = if args.most_runs {
        AutomationSort::MostRuns
    } else {
        AutomationSort::Unsorted
    };
    let automations = workspace.automations(&criteria, sort).await?;
    render::emit(json, automations.as_slice(), render::automations)
}

async fn handle_messages(workspace: &Workspace, args: MessagesArgs, json: bool) -> Result<()> {
    if let Some(id) = &args.show {
        let log = workspace
            .message(id)
            .await
            .with_context(|| format!("failed to load message '{id}'"))?;
        return render::emit(json, &log, render::message_detail);
    }

    let criteria = MessageCriteria {
        search: args.search,
        status: args.status,
        category: args.channel,
        date_range: DateRange {
            from: args.from,
            to: args.to,
            field: DateField::Primary,
        },
    };
    let sort = if args.oldest_first {
        MessageSort::OldestFirst
    } else {
        MessageSort::NewestFirst
    };
    let logs = workspace.messages(&criteria, sort).await?;
    render::emit(json, logs.as_slice(), render::messages)
}

async fn handle_mapping(workspace: &Workspace, args: MappingArgs, json: bool) -> Result<()> {
    let contents = std::fs::read_to_string(&args.sheet)
        .with_context(|| format!("failed to read sheet {}", args.sheet.display()))?;
    let table = leadx_sheets::read_sheet(&contents)
        .with_context(|| format!("failed to parse sheet {}", args.sheet.display()))?;
    let sheet_name = args.sheet_name.clone().unwrap_or_else(|| {
        args.sheet
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet".to_string())
    });
    let mut session = MappingSession::new(sheet_name, table);

    if args.auto {
        match workspace.auto_map(&mut session).await {
            Ok(mapping) => println!(
                "AI Mapping Applied: {} field(s) matched automatically.",
                mapping.mapped_count()
            ),
            Err(err) => {
                warn!(error = %err, "auto-map failed, keeping the current mapping");
                eprintln!("Auto-map failed: {err}");
            }
        }
    }

    let explicit = [
        (LeadField::Name, &args.name),
        (LeadField::Email, &args.email),
        (LeadField::Phone, &args.phone),
        (LeadField::Status, &args.status),
        (LeadField::Source, &args.source),
    ];
    for (field, column) in explicit {
        if let Some(column) = column {
            session
                .assign(field, column)
                .with_context(|| format!("cannot map {field} to '{column}'"))?;
        }
    }

    render::emit(json, &session.mapping, |_| render::mapping(&session, PREVIEW_ROWS))?;

    if args.save {
        let saved = workspace
            .save_mapping(&session)
            .await
            .context("Mapping incomplete")?;
        println!("Mapping Saved: {}", saved.message());
    }

    if args.import {
        let report = workspace
            .import_sheet(&session, Local::now().naive_local())
            .await
            .context("import failed")?;
        info!(
            imported = report.leads.len(),
            skipped = report.skipped.len(),
            "sheet imported"
        );
        render::emit(json, &report, render::import_report)?;
    }

    Ok(())
}
