//! `triage` - command-line host for the guide triage engine
//!
//! # Commands
//! - `search <query>` - ranked guides for a support request
//! - `show <id>` - guide detail with hybrid-composed steps
//! - `categories` - distinct guide categories
//! - `validate <path>` - check a catalog file
//!
//! Output goes to stdout (colored text or `--json`); logs go to stderr and
//! are controlled with `RUST_LOG`.

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use guide_triage::hybrid::build_hybrid_steps;
use guide_triage::rank::rank;
use guide_triage::{
    joined_copy_payloads, Catalog, Guide, Platform, RankedGuide, Step, TriageConfig,
    TriageError, TriageOptions,
};

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "triage", version, about = "Match support requests to self-help guides")]
struct Cli {
    /// Catalog file to use instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank guides for a free-text request
    Search {
        /// Request text, e.g. "wifi connected but no internet"
        #[arg(required = true)]
        query: Vec<String>,

        /// Device hint: windows, macos, ios, android
        #[arg(long, short)]
        device: Option<String>,

        /// Only show guides in this category
        #[arg(long, short)]
        category: Option<String>,

        /// Maximum number of results
        #[arg(long, short)]
        limit: Option<usize>,

        /// Include scores and match evidence
        #[arg(long)]
        explain: bool,

        #[arg(long)]
        json: bool,
    },

    /// Show a guide with steps composed for a device
    Show {
        id: String,

        #[arg(long, short)]
        device: Option<String>,

        /// Only the guide's own steps, without related guides
        #[arg(long)]
        no_hybrid: bool,

        #[arg(long)]
        json: bool,
    },

    /// List guide categories
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Load and validate a catalog file
    Validate { path: PathBuf },
}

// ============================================================================
// Output Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GuideDetail<'a> {
    #[serde(flatten)]
    guide: &'a Guide,
    device: Platform,
    hybrid: bool,
    composed_steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    copy_all: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), TriageError> {
    let config = TriageConfig::from_env()?;
    debug!("Config: {:?}", config);

    if let Command::Validate { path } = &cli.command {
        return validate(path);
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => config.load_catalog()?,
    };
    info!(
        "Loaded catalog v{} with {} guides",
        catalog.version(),
        catalog.len()
    );

    match cli.command {
        Command::Search {
            query,
            device,
            category,
            limit,
            explain,
            json,
        } => {
            let device = resolve_device(device.as_deref(), &config);
            let options = TriageOptions {
                category,
                limit: Some(limit.unwrap_or(config.max_results)),
                ..TriageOptions::default()
            };
            let ranked = rank(&catalog, &query.join(" "), device, &options);
            print_ranked(&ranked, explain, json)
        }
        Command::Show {
            id,
            device,
            no_hybrid,
            json,
        } => {
            let guide = catalog
                .get_guide(&id)
                .ok_or_else(|| TriageError::UnknownGuide(id.clone()))?;
            let device = resolve_device(device.as_deref(), &config).unwrap_or(Platform::Windows);
            let base = guide.resolve_steps(device);
            let composed_steps = if no_hybrid {
                base.to_vec()
            } else {
                build_hybrid_steps(&catalog, &guide.id, device, base)
            };
            let detail = GuideDetail {
                guide,
                device,
                hybrid: !no_hybrid,
                copy_all: joined_copy_payloads(&composed_steps),
                image: guide.resolve_media(device),
                composed_steps,
            };
            print_detail(&detail, json)
        }
        Command::Categories { json } => {
            let categories = catalog.list_categories();
            if json {
                println!("{}", serde_json::to_string(categories)?);
            } else {
                for category in categories {
                    println!("{}", category);
                }
            }
            Ok(())
        }
        Command::Validate { .. } => Ok(()),
    }
}

/// Explicit flag, else the configured default; unknown tags mean no hint
fn resolve_device(flag: Option<&str>, config: &TriageConfig) -> Option<Platform> {
    match flag {
        Some(raw) => {
            let parsed = Platform::parse_lenient(raw);
            if parsed.is_none() {
                warn!("Ignoring unknown device {:?}", raw);
            }
            parsed
        }
        None => config.default_device,
    }
}

fn validate(path: &Path) -> Result<(), TriageError> {
    let catalog = Catalog::load(path)?;
    println!(
        "{} {} v{}: {} guides, {} categories",
        "ok".green().bold(),
        path.display(),
        catalog.version(),
        catalog.len(),
        catalog.list_categories().len()
    );
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

fn print_ranked(ranked: &[RankedGuide], explain: bool, json: bool) -> Result<(), TriageError> {
    if json {
        if explain {
            println!("{}", serde_json::to_string(ranked)?);
        } else {
            let summaries: Vec<_> = ranked.iter().map(|r| &r.summary).collect();
            println!("{}", serde_json::to_string(&summaries)?);
        }
        return Ok(());
    }

    if ranked.is_empty() {
        println!("{}", "No matching guides.".dimmed());
        return Ok(());
    }

    for (i, r) in ranked.iter().enumerate() {
        let minutes = r
            .summary
            .minutes
            .map(|m| format!(" ~{} min", m))
            .unwrap_or_default();
        println!(
            "{:>2}. {} [{}]{}",
            i + 1,
            r.summary.title.bold(),
            r.summary.category.cyan(),
            minutes.dimmed()
        );
        println!("    {}", r.summary.id.dimmed());
        if let Some(why) = &r.summary.why {
            println!("    {}", why);
        }
        if explain {
            println!(
                "    {} {}",
                format!("score {:.2}", r.score).yellow(),
                r.evidence.join(", ").dimmed()
            );
        }
    }
    Ok(())
}

fn print_detail(detail: &GuideDetail<'_>, json: bool) -> Result<(), TriageError> {
    if json {
        println!("{}", serde_json::to_string(detail)?);
        return Ok(());
    }

    let guide = detail.guide;
    println!("{} [{}]", guide.title.bold(), guide.category.cyan());
    if let Some(why) = &guide.why {
        println!("{}", why);
    }
    println!(
        "{}",
        format!(
            "{} steps for {}{}",
            detail.composed_steps.len(),
            detail.device,
            if detail.hybrid { " (with related fixes)" } else { "" }
        )
        .dimmed()
    );

    for (i, step) in detail.composed_steps.iter().enumerate() {
        println!("{:>2}. {}", i + 1, step.text);
        if let Some(copy) = &step.copy {
            println!("      {}", copy.green());
        }
    }

    if !guide.tips.is_empty() {
        println!("\n{}", "Tips".bold());
        for tip in &guide.tips {
            println!("  - {}", tip);
        }
    }
    if !guide.links.is_empty() || !guide.actions.is_empty() {
        println!("\n{}", "Links".bold());
        for link in &guide.links {
            println!("  {} {}", link.label, link.url.blue());
        }
        for action in &guide.actions {
            if let Some(url) = &action.url {
                println!("  {} {}", action.label, url.blue());
            }
            if let Some(copy) = &action.copy {
                println!("  {} {}", action.label, copy.green());
            }
        }
    }
    if let Some(image) = detail.image {
        println!("\n{} {}", "Image".bold(), image);
    }
    Ok(())
}
