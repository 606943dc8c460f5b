//! Project populator CLI - template-driven project boards and progress reports.

mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use populator_core::{ProjectTemplate, Time};
use populator_directory::{DryRunDirectory, GraphqlDirectory, ProjectDirectory};
use populator_progress::{aggregate, Portfolio};
use populator_report::{
    portfolio_report_name, project_report_name, render_listing, render_portfolio,
    render_project, write_report,
};
use populator_sync::{
    create_batch, resolve_owner_identity, BatchClient, BatchOutcome, Pacing, Populator,
    RunSummary, SyncError,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::settings::{Required, Settings};

#[derive(Parser)]
#[command(name = "populator")]
#[command(about = "Populate project boards from a template and report on their progress", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile labels, project and fields, then create every template task
    Populate {
        /// Run against a simulated directory, writing nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Create one empty project per client
    BatchCreate {
        /// Create the projects instead of printing the plan
        #[arg(long)]
        yes: bool,
        /// JSON file with a list of clients
        #[arg(long)]
        clients: Option<PathBuf>,
    },
    /// List the owner's projects
    List,
    /// Write a progress report for one project
    Report {
        /// Project number. Falls back to PROJECT_NUMBER.
        #[arg(long)]
        project: Option<u64>,
        /// Print the aggregate as JSON instead of writing a report
        #[arg(long)]
        json: bool,
    },
    /// Write a portfolio report across every project
    ReportAll,
    /// Show the template and its warnings
    Template,
}

impl Commands {
    fn required(&self) -> &'static [Required] {
        match self {
            Commands::Populate { dry_run: true } => &[Required::Owner, Required::Repo],
            Commands::Populate { dry_run: false } => {
                &[Required::Token, Required::Owner, Required::Repo]
            }
            Commands::BatchCreate { .. }
            | Commands::List
            | Commands::Report { .. }
            | Commands::ReportAll => &[Required::Token, Required::Owner],
            Commands::Template => &[],
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if let Some(sync) = err.downcast_ref::<SyncError>() {
                for detail in sync.details() {
                    eprintln!("  - {}", detail);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings;
    settings.validate_for(cli.command.required())?;

    match cli.command {
        Commands::Populate { dry_run } => populate(&settings, dry_run).await,
        Commands::BatchCreate { yes, clients } => {
            batch_create(&settings, yes, clients.as_deref()).await
        }
        Commands::List => list(&settings).await,
        Commands::Report { project, json } => report(&settings, project, json).await,
        Commands::ReportAll => report_all(&settings).await,
        Commands::Template => show_template(&settings),
    }
}

fn live_directory(settings: &Settings) -> GraphqlDirectory {
    GraphqlDirectory::new(settings.token()).with_endpoint(settings.graphql_url.clone())
}

fn load_template(settings: &Settings) -> Result<ProjectTemplate> {
    let template = settings.load_template().context("failed to load template")?;
    for warning in template.validate() {
        warn!("template: {}", warning);
    }
    Ok(template)
}

async fn populate(settings: &Settings, dry_run: bool) -> Result<()> {
    let template = load_template(settings)?;
    let (directory, pacing): (Box<dyn ProjectDirectory>, Pacing) = if dry_run {
        info!("dry run, nothing will be written");
        (Box::new(DryRunDirectory::new()), Pacing::none())
    } else {
        (Box::new(live_directory(settings)), Pacing::default())
    };

    let summary = Populator::new(directory.as_ref(), &template)
        .with_pacing(pacing)
        .run(&settings.target())
        .await?;

    print_summary(&summary, dry_run);
    Ok(())
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    if dry_run {
        println!("Dry run complete, nothing was written.");
    }
    let origin = if summary.project_created { "created" } else { "existing" };
    println!(
        "Project #{} ({}): {}",
        summary.project_number, origin, summary.project_title
    );
    println!(
        "Labels created: {}, fields created: {}",
        summary.labels_created, summary.fields_created
    );
    println!(
        "Tasks created: {}/{}",
        summary.created(),
        summary.attempted()
    );

    let failed: Vec<_> = summary.failed().collect();
    if !failed.is_empty() {
        println!("Failed tasks:");
        for (task, reason) in failed {
            println!("  - [{}] {}: {}", task.phase, task.title, reason);
        }
    }
    println!("View project: {}", summary.project_url);
}

fn read_clients(path: Option<&Path>) -> Result<Vec<BatchClient>> {
    let Some(path) = path else {
        return Ok(BatchClient::defaults());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read clients from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("invalid client list in {}", path.display()))
}

async fn batch_create(settings: &Settings, yes: bool, clients: Option<&Path>) -> Result<()> {
    let template = load_template(settings)?;
    let clients = read_clients(clients)?;

    println!("Projects for {}:", settings.owner());
    for client in &clients {
        println!(
            "  - {} ({}, {})",
            populator_sync::project_title(&client.name, &template.name),
            client.site_type,
            client.developer
        );
    }

    if !yes {
        println!();
        println!("Nothing created. Rerun with --yes to create these projects.");
        return Ok(());
    }

    let directory = live_directory(settings);
    let outcome = create_batch(
        &directory,
        settings.owner(),
        &clients,
        &template.name,
        Pacing::default(),
    )
    .await?;

    print_batch(&outcome);
    Ok(())
}

fn print_batch(outcome: &BatchOutcome) {
    println!();
    println!("| # | Client | Type | Developer | URL |");
    println!("|---|--------|------|-----------|-----|");
    for project in &outcome.created {
        println!(
            "| {} | {} | {} | {} | {} |",
            project.number,
            project.client.name,
            project.client.site_type,
            project.client.developer,
            project.url
        );
    }

    if !outcome.failed.is_empty() {
        println!();
        println!("Failed:");
        for (client, reason) in &outcome.failed {
            println!("  - {}: {}", client.name, reason);
        }
    }

    if !outcome.created.is_empty() {
        println!();
        println!("Populate each project with:");
        for project in &outcome.created {
            println!(
                "  PROJECT_NUMBER={} CLIENT_NAME=\"{}\" populator populate",
                project.number, project.client.name
            );
        }
    }
}

async fn list(settings: &Settings) -> Result<()> {
    let directory = live_directory(settings);
    let owner = resolve_owner_identity(&directory, settings.owner())
        .await
        .context("failed to resolve owner")?;

    let projects = directory
        .list_projects(&owner.login, owner.kind)
        .await
        .context("failed to list projects")?;
    debug!(count = projects.len(), "projects listed");

    print!("{}", render_listing(&owner.login, &projects));
    Ok(())
}

async fn report(settings: &Settings, project: Option<u64>, json: bool) -> Result<()> {
    let number = project
        .or(settings.project_number)
        .ok_or_else(|| SyncError::Configuration {
            missing: vec![Required::ProjectNumber.env_name().to_string()],
        })?;

    let directory = live_directory(settings);
    let owner = resolve_owner_identity(&directory, settings.owner())
        .await
        .context("failed to resolve owner")?;

    let snapshot = directory
        .fetch_project_with_items(&owner.login, owner.kind, number)
        .await
        .with_context(|| format!("failed to fetch project #{}", number))?;
    let agg = aggregate(&snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(&agg)?);
        return Ok(());
    }

    let generated_at: Time = chrono::Utc::now();
    let contents = render_project(&snapshot, &agg, &generated_at);
    let name = project_report_name(snapshot.number, &snapshot.title, &generated_at);
    let path = write_report(&settings.out_dir, &name, &contents).await?;

    println!(
        "{}: {}% complete ({}/{} tasks)",
        snapshot.title, agg.progress_percent, agg.completed, agg.total_tasks
    );
    println!("Report written to {}", path.display());
    Ok(())
}

async fn report_all(settings: &Settings) -> Result<()> {
    let directory = live_directory(settings);
    let owner = resolve_owner_identity(&directory, settings.owner())
        .await
        .context("failed to resolve owner")?;

    let snapshots = directory
        .fetch_all_projects_with_items(&owner.login, owner.kind)
        .await
        .context("failed to fetch projects")?;
    let portfolio = Portfolio::new(&snapshots);

    let generated_at: Time = chrono::Utc::now();
    let contents = render_portfolio(&portfolio, &generated_at);
    let path = write_report(
        &settings.out_dir,
        &portfolio_report_name(&generated_at),
        &contents,
    )
    .await?;

    let totals = &portfolio.totals;
    println!(
        "{} projects, {}/{} tasks complete ({}%)",
        totals.projects, totals.completed, totals.total_tasks, totals.overall_progress
    );
    let attention = portfolio.requiring_attention();
    if !attention.is_empty() {
        println!("{} project(s) need attention", attention.len());
    }
    println!("Report written to {}", path.display());
    Ok(())
}

fn show_template(settings: &Settings) -> Result<()> {
    let template = settings.load_template().context("failed to load template")?;

    println!("{}", template.name);
    if !template.description.is_empty() {
        println!("{}", template.description);
    }
    println!();
    println!(
        "{} phases, {} tasks, {} fields, {} labels",
        template.phases.len(),
        template.task_count(),
        template.fields.len(),
        template.labels.len()
    );
    for phase in &template.phases {
        println!(
            "  {} - {}% over {} days, {} tasks",
            phase.name,
            phase.percentage,
            phase.days,
            phase.tasks.len()
        );
    }

    let warnings = template.validate();
    if warnings.is_empty() {
        println!();
        println!("No warnings.");
    } else {
        println!();
        println!("Warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}
