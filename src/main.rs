use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;
use tabled::{settings::Style, Table, Tabled};

use planrs::config::AppConfig;
use planrs::error::{PlanRsError, Result};
use planrs::logging::{self, LogLevel};
use planrs::models::{Category, Metric};
use planrs::storage::FsStore;
use planrs::{catalog, loader, render};

/// planrs - Structured Workout Catalog CLI
///
/// Browse, inspect, and transcribe a library of structured triathlon
/// workouts (bike, run, swim) stored as JSON files.
#[derive(Parser)]
#[command(name = "planrs")]
#[command(version = "0.1.0")]
#[command(about = "Structured workout catalog CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Workout library root (overrides the configured directory)
    #[arg(short, long, value_name = "DIR")]
    library: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and filter the workout collection
    Search {
        /// Sport category (Bike, Run, Swim)
        category: String,

        /// Sub-category filter (e.g. "threshold", "recovery")
        #[arg(short, long)]
        sub_category: Option<String>,

        /// Target metric (HR, Power, Pace, Meters)
        #[arg(short, long)]
        metric: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (table, plain)
        #[arg(short = 'f', long, default_value = "table")]
        format: String,
    },

    /// Print a workout's stored JSON without interpreting it
    Show {
        /// Sport category (Bike, Run, Swim)
        category: String,

        /// Workout filename, with or without extension
        filename: String,

        /// Target metric (HR, Power, Pace, Meters)
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Render a workout as a readable transcript
    Render {
        /// Sport category (Bike, Run, Swim)
        category: String,

        /// Workout filename, with or without extension
        filename: String,

        /// Target metric (HR, Power, Pace, Meters)
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// List the sub-category tokens recognized for a category
    Tokens {
        /// Sport category (Bike, Run, Swim)
        category: String,

        /// Verify every advertised token matches at least one workout
        /// in the library
        #[arg(long)]
        check: bool,
    },
}

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err.user_message().red());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .map_err(|err| PlanRsError::Configuration(err.to_string()))?,
        None => AppConfig::load_or_default(),
    };

    if cli.verbose > 0 {
        config.log.level = LogLevel::from_verbosity(cli.verbose);
    }

    logging::init_logging(&config.log)
        .map_err(|err| PlanRsError::Configuration(err.to_string()))?;

    let library_dir = cli
        .library
        .unwrap_or_else(|| config.settings.library_dir.clone());
    let store = FsStore::new(library_dir);
    let vocab = catalog::Vocabulary::builtin();

    match cli.command {
        Commands::Search {
            category,
            sub_category,
            metric,
            limit,
            format,
        } => {
            let query = catalog::SearchQuery {
                category: &category,
                sub_category: sub_category.as_deref(),
                metric: metric.as_deref().or(Some(config.settings.default_metric.as_str())),
                limit: limit.unwrap_or(config.settings.search_limit),
            };

            let hits = catalog::search(&store, &vocab, &query)?;

            if hits.is_empty() {
                println!("{}", "No workouts matched the query".yellow());
                return Ok(());
            }

            match format.as_str() {
                "plain" => {
                    for hit in &hits {
                        println!("{}", render::summary_line(hit));
                    }
                }
                _ => {
                    let rows: Vec<SearchRow> = hits
                        .iter()
                        .map(|hit| SearchRow {
                            file: hit.record.filename.clone(),
                            duration: planrs::format::duration_minutes(
                                hit.summary.duration_seconds,
                            ),
                            metric: hit.record.metric.to_string(),
                            summary: hit.summary.excerpt.clone(),
                        })
                        .collect();

                    let mut table = Table::new(rows);
                    table.with(Style::rounded());
                    println!("{}", table);
                }
            }

            println!(
                "{}",
                format!("✓ {} workout(s) found", hits.len()).green()
            );
        }

        Commands::Show {
            category,
            filename,
            metric,
        } => {
            let (category, metric) = parse_scope(&category, metric.as_deref(), &config)?;
            let content = loader::raw_content(&store, category, metric, &filename)?;
            println!("{}", content);
        }

        Commands::Render {
            category,
            filename,
            metric,
        } => {
            let (category, metric) = parse_scope(&category, metric.as_deref(), &config)?;
            let transcript = render::transcript_for(&store, category, metric, &filename)?;
            print!("{}", transcript);
        }

        Commands::Tokens { category, check } => {
            let category = Category::parse(&category).ok_or_else(|| {
                planrs::error::CatalogError::InvalidCategory {
                    value: category.clone(),
                }
            })?;

            println!("{}", format!("{} sub-categories:", category).bold());
            for token in vocab.tokens(category) {
                println!("  {}", token);
            }

            if check {
                vocab.validate(&store)?;
                println!("{}", "✓ every token matches at least one workout".green());
            }
        }
    }

    Ok(())
}

/// Resolve the category/metric pair shared by the single-workout commands
fn parse_scope(
    category: &str,
    metric: Option<&str>,
    config: &AppConfig,
) -> Result<(Category, Metric)> {
    let category = Category::parse(category).ok_or_else(|| {
        planrs::error::CatalogError::InvalidCategory {
            value: category.to_string(),
        }
    })?;

    let metric_input = metric.unwrap_or(config.settings.default_metric.as_str());
    let metric = Metric::parse(metric_input).ok_or_else(|| {
        planrs::error::CatalogError::InvalidMetric {
            value: metric_input.to_string(),
        }
    })?;

    Ok((category, metric))
}
