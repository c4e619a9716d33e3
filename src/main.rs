use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use bibsift::config::Config;
use bibsift::lexicon::stats;
use bibsift::output::terminal;
use bibsift::pipeline::{self, stages, Vocabularies};
use bibsift::records::dedup;
use bibsift::records::Record;

/// Bibsift: turn raw literature-search exports into a curated, clustered
/// reading list.
///
/// Input files are JSON arrays of records (field name -> string), as written
/// by a BibTeX-to-JSON converter.
#[derive(Parser)]
#[command(name = "bibsift", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consolidate exports and drop duplicate records
    Dedupe {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Where to write the unique records (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Deduplicate, then apply the inclusion criteria
    Filter {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip corpus-level dedup before the criteria
        #[arg(long)]
        no_dedup: bool,
    },

    /// Cluster abstracts and show the top terms per cluster
    Cluster {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of clusters (default: BIBSIFT_CLUSTERS or 10)
        #[arg(long)]
        clusters: Option<usize>,

        /// Seed for centroid initialization
        #[arg(long)]
        seed: Option<u64>,

        /// Keep only records whose abstract mentions this phrase, grouped by cluster
        #[arg(long)]
        keyword: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Year distribution, merged keywords and frequent n-grams
    Summarize {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Rows per table (default: 10)
        #[arg(long, default_value = "10")]
        top: usize,

        /// JSON object of keyword aliases (exact -> canonical)
        #[arg(long)]
        aliases: Option<PathBuf>,
    },

    /// Run every stage and write a JSON report
    Run {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        aliases: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bibsift=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Dedupe { files, output } => {
            let sources = load_sources(&files)?;
            let (outcome, tally) = dedup::consolidate_sources(sources);
            for (path, dupes) in files.iter().zip(&tally.per_source) {
                info!(file = %path.display(), duplicates = dupes, "Source checked");
            }

            terminal::display_before_after(
                "removing duplicates",
                tally.total,
                outcome.unique.len(),
            );
            write_output(output.as_deref(), &outcome.unique)?;
        }

        Commands::Filter {
            files,
            output,
            no_dedup,
        } => {
            if no_dedup {
                config.corpus_dedup = false;
            }
            let records = load_records(&files)?;
            let before = records.len();
            let dedup = stages::consolidate(records, &config);
            let screened = stages::screen(dedup.unique, &config);

            terminal::display_rejections(&screened.rejections_by_criterion());
            println!();
            terminal::display_before_after("applying criteria", before, screened.kept.len());
            if screened.malformed_count() > 0 {
                println!(
                    "{}",
                    format!(
                        "  {} records had a malformed field (see log)",
                        screened.malformed_count()
                    )
                    .yellow()
                );
            }
            write_output(output.as_deref(), &screened.kept)?;
        }

        Commands::Cluster {
            files,
            clusters,
            seed,
            keyword,
            output,
        } => {
            if let Some(k) = clusters {
                config.clusters = k;
            }
            if let Some(s) = seed {
                config.seed = s;
            }
            config.validate()?;

            let records = load_records(&files)?;
            let vocab = Vocabularies::english();
            let clustering = stages::cluster(&records, &config, &vocab)?;
            terminal::display_clusters(&clustering);

            if let Some(keyword) = keyword {
                let traced = bibsift::clustering::assign::trace_by_keyword(
                    &clustering.documents,
                    &clustering.labels,
                    &keyword,
                    clustering.k,
                );
                println!();
                terminal::display_before_after(
                    &format!("tracing \"{keyword}\""),
                    records.len(),
                    traced.len(),
                );
                if !traced.is_empty() {
                    let path = output.unwrap_or_else(|| {
                        PathBuf::from(format!("filtered_articles_{}.json", keyword.replace(' ', "_")))
                    });
                    write_output(Some(path.as_path()), &traced)?;
                }
            } else {
                write_output(output.as_deref(), &clustering)?;
            }
        }

        Commands::Summarize {
            files,
            top,
            aliases,
        } => {
            let records = load_records(&files)?;
            let vocab = vocabularies(aliases.as_deref())?;
            let summary = stages::summarize(&records, &config, &vocab)?;

            terminal::display_years(&summary.years);
            let keywords = stats::rank(&summary.keywords, 1, top);
            terminal::display_ranked(&format!("Top {top} keywords"), &keywords);

            let ngrams: Vec<(String, usize)> = summary
                .ngrams
                .iter()
                .take(top)
                .map(|(g, c)| (g.clone(), *c))
                .collect();
            terminal::display_ranked(
                &format!("Top {top} n-grams (count >= {})", config.frequency_floor),
                &ngrams,
            );
        }

        Commands::Run {
            files,
            aliases,
            output,
        } => {
            let records = load_records(&files)?;
            let vocab = vocabularies(aliases.as_deref())?;
            let report = pipeline::run(records, &config, &vocab)?;

            terminal::display_stage_counts(&report.counts);
            terminal::display_rejections(&report.rejections_by_criterion);
            terminal::display_clusters(&report.clustering);
            write_output(output.as_deref(), &report)?;
        }
    }

    Ok(())
}

/// Load each export file as its own batch of records.
fn load_sources(files: &[PathBuf]) -> Result<Vec<Vec<Record>>> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Loading [{bar:30}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        pb.set_message(path.display().to_string());
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let records: Vec<Record> = serde_json::from_str(&json)
            .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
        info!(file = %path.display(), records = records.len(), "Loaded export");
        sources.push(records);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(sources)
}

fn load_records(files: &[PathBuf]) -> Result<Vec<Record>> {
    Ok(load_sources(files)?.into_iter().flatten().collect())
}

fn vocabularies(aliases: Option<&Path>) -> Result<Vocabularies> {
    let mut vocab = Vocabularies::english();
    if let Some(path) = aliases {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read aliases from {}", path.display()))?;
        let map: IndexMap<String, String> = serde_json::from_str(&json)
            .with_context(|| format!("{} is not a JSON object of aliases", path.display()))?;
        vocab.aliases = map;
    }
    Ok(vocab)
}

fn write_output<T: serde::Serialize + ?Sized>(path: Option<&Path>, value: &T) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved to {}", path.display().to_string().bold());
    Ok(())
}
