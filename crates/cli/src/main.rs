use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use enrichment::{CrustDataClient, BATCH_PAUSE, DEFAULT_BATCH_SIZE};
use pipeline::{ColumnProjector, FilterConfig, FilterStats};
use profile_loader::{extract_urls, load_company_list, load_name_list, read_table, write_table};
use profile_store::{ProfileStore, SupabaseClient, ENRICHMENT_REFRESH_MONTHS};
use screener::{persist_profiles, AppConfig, ScreeningOrchestrator, ScreeningReport, DEFAULT_SCREEN_COUNT};
use screening_client::{FitLevel, OpenAiScorer};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// recruit-ops - LinkedIn candidate screening pipeline
#[derive(Parser)]
#[command(name = "recruit-ops")]
#[command(about = "Enrich, prefilter and screen LinkedIn candidate profiles", long_about = None)]
struct Cli {
    /// Path to the JSON config file with API keys
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a raw enrichment export onto the screening columns
    Convert {
        /// Raw CSV or JSON export
        #[arg(long)]
        input: PathBuf,

        /// Output file (.csv or .json)
        #[arg(long)]
        output: PathBuf,
    },

    /// Remove candidates not worth screening
    Filter {
        /// Profiles (raw or already converted)
        #[arg(long)]
        input: PathBuf,

        /// Output file (.csv or .json)
        #[arg(long)]
        output: PathBuf,

        /// CSV with a Name column of people already in process
        #[arg(long)]
        past_candidates: Option<PathBuf>,

        /// CSV of companies to exclude (first column)
        #[arg(long)]
        blacklist: Option<PathBuf>,

        /// CSV of companies whose engineers are not relevant (first column)
        #[arg(long)]
        not_relevant: Option<PathBuf>,

        /// Only check not-relevant companies against the current role
        #[arg(long)]
        no_not_relevant_past: bool,

        /// Keep candidates with several short stints
        #[arg(long)]
        no_job_hoppers: bool,

        /// Keep candidates at consulting firms
        #[arg(long)]
        no_consulting: bool,

        /// Keep candidates with 8+ years in their current role
        #[arg(long)]
        no_long_tenure: bool,

        /// Keep candidates with management titles
        #[arg(long)]
        no_management: bool,

        /// Also write the per-stage stats as JSON
        #[arg(long)]
        stats: Option<PathBuf>,
    },

    /// Score candidates against a job description
    Screen {
        /// Profiles to screen, in order
        #[arg(long)]
        input: PathBuf,

        /// Text file with the job description
        #[arg(long)]
        job_description: PathBuf,

        /// Number of profiles to screen
        #[arg(long, default_value_t = DEFAULT_SCREEN_COUNT)]
        count: usize,

        /// Results file (.csv or .json)
        #[arg(long)]
        output: PathBuf,

        /// Only export these fit levels (e.g. "Strong Fit")
        #[arg(long, value_parser = parse_fit)]
        fit: Vec<FitLevel>,

        /// Also record verdicts in the profile store
        #[arg(long)]
        save: bool,
    },

    /// Fetch full profiles for a list of LinkedIn URLs
    Enrich {
        /// CSV or JSON file containing LinkedIn URLs
        #[arg(long)]
        urls: PathBuf,

        /// Maximum number of URLs to process
        #[arg(long)]
        max: Option<usize>,

        /// URLs per API request
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Output JSON file
        #[arg(long)]
        output: PathBuf,

        /// Skip profiles the store enriched recently
        #[arg(long)]
        skip_recent: bool,

        /// Also record enrichment results in the profile store
        #[arg(long)]
        save: bool,
    },

    /// Upsert profiles into the profile store
    Sync {
        /// Profiles to store
        #[arg(long)]
        input: PathBuf,

        /// Input is a JSON scraper export rather than a profile table
        #[arg(long)]
        scraped: bool,

        /// Record the scraper export as a named search
        #[arg(long, requires = "scraped")]
        search: Option<String>,

        /// Search URL the scraper ran against
        #[arg(long, requires = "search")]
        search_url: Option<String>,
    },

    /// Show the store funnel and how many profiles a new enrichment run
    /// would skip
    DedupStats,
}

fn parse_fit(value: &str) -> std::result::Result<FitLevel, String> {
    value.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Convert { input, output } => handle_convert(&input, &output)?,
        Commands::Filter {
            input,
            output,
            past_candidates,
            blacklist,
            not_relevant,
            no_not_relevant_past,
            no_job_hoppers,
            no_consulting,
            no_long_tenure,
            no_management,
            stats,
        } => {
            let filter_config = FilterConfig {
                past_candidates: match past_candidates {
                    Some(path) => load_name_list(&path)
                        .with_context(|| format!("Failed to load {}", path.display()))?,
                    None => None,
                },
                blacklist: load_optional_companies(blacklist.as_deref())?,
                not_relevant: load_optional_companies(not_relevant.as_deref())?,
                not_relevant_past: !no_not_relevant_past,
                filter_job_hoppers: !no_job_hoppers,
                filter_consulting: !no_consulting,
                filter_long_tenure: !no_long_tenure,
                filter_management: !no_management,
            };
            handle_filter(&input, &output, &filter_config, stats.as_deref())?
        }
        Commands::Screen {
            input,
            job_description,
            count,
            output,
            fit,
            save,
        } => handle_screen(&config, &input, &job_description, count, &output, &fit, save).await?,
        Commands::Enrich {
            urls,
            max,
            batch_size,
            output,
            skip_recent,
            save,
        } => handle_enrich(&config, &urls, max, batch_size, &output, skip_recent, save).await?,
        Commands::Sync {
            input,
            scraped,
            search,
            search_url,
        } => handle_sync(&config, &input, scraped, search.as_deref(), search_url.as_deref()).await?,
        Commands::DedupStats => handle_dedup_stats(&config).await?,
    }

    Ok(())
}

fn load_optional_companies(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => {
            load_company_list(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => Ok(Vec::new()),
    }
}

fn open_store(config: &AppConfig) -> Result<ProfileStore> {
    let (url, key) = config.require_supabase()?;
    Ok(ProfileStore::new(SupabaseClient::new(url, key)?))
}

/// Handle the 'convert' command
fn handle_convert(input: &Path, output: &Path) -> Result<()> {
    let start = Instant::now();
    let raw = read_table(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let projected = ColumnProjector::today().project(&raw);
    write_table(&projected, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Converted {} profiles to {} in {:?}",
        "✓".green(),
        projected.len(),
        output.display(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'filter' command
fn handle_filter(
    input: &Path,
    output: &Path,
    filter_config: &FilterConfig,
    stats_path: Option<&Path>,
) -> Result<()> {
    let raw = read_table(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let table = ColumnProjector::today().project(&raw);
    let (kept, stats) = pipeline::FilterPipeline::standard().apply(&table, filter_config)?;

    write_table(&kept, output).with_context(|| format!("Failed to write {}", output.display()))?;
    print_filter_stats(&stats);

    if let Some(path) = stats_path {
        let json = serde_json::to_string_pretty(&stats)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    println!("{} Wrote {} profiles to {}", "✓".green(), kept.len(), output.display());
    Ok(())
}

/// Handle the 'screen' command
async fn handle_screen(
    config: &AppConfig,
    input: &Path,
    job_description: &Path,
    count: usize,
    output: &Path,
    fits: &[FitLevel],
    save: bool,
) -> Result<()> {
    let job_description = std::fs::read_to_string(job_description)
        .with_context(|| format!("Failed to read {}", job_description.display()))?;
    let raw = read_table(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let scorer = OpenAiScorer::new(config.require_openai_api_key()?)?;
    let orchestrator = ScreeningOrchestrator::new(scorer);
    let table = orchestrator.prepare(&raw);

    let report = orchestrator.screen(&table, job_description.trim(), count).await;
    let shown = if fits.is_empty() {
        report.clone()
    } else {
        report.with_fits(fits)
    };

    shown.write(output).with_context(|| format!("Failed to write {}", output.display()))?;
    print_report(&shown, report.len());

    if save {
        let store = open_store(config)?;
        let stats = orchestrator.persist_screening(&report, &store).await;
        println!("{} Stored {} verdicts ({} failed)", "✓".green(), stats.stored, stats.failed);
    }
    Ok(())
}

fn response_url(record: &Value) -> Option<&str> {
    ["linkedin_profile_url", "linkedin_url"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .filter(|url| !url.is_empty())
}

/// Handle the 'enrich' command
async fn handle_enrich(
    config: &AppConfig,
    urls_path: &Path,
    max: Option<usize>,
    batch_size: usize,
    output: &Path,
    skip_recent: bool,
    save: bool,
) -> Result<()> {
    let client = CrustDataClient::new(config.require_crustdata_api_key()?)?;
    let mut urls =
        extract_urls(urls_path).with_context(|| format!("Failed to read {}", urls_path.display()))?;
    println!("Found {} LinkedIn URLs", urls.len().to_string().bold());

    let store = if skip_recent || save { Some(open_store(config)?) } else { None };

    if let (true, Some(store)) = (skip_recent, store.as_ref()) {
        let recent: HashSet<String> = store
            .recently_enriched_urls(ENRICHMENT_REFRESH_MONTHS)
            .await?
            .into_iter()
            .collect();
        let before = urls.len();
        urls.retain(|url| !recent.contains(&profile_store::normalize_linkedin_url(url)));
        println!("Skipping {} recently enriched profiles", before - urls.len());
    }
    if let Some(max) = max {
        urls.truncate(max);
    }

    let records = client.enrich_all(&urls, batch_size, BATCH_PAUSE).await;
    let failed = records.iter().filter(|r| r.get("error").is_some()).count();

    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &records)?;
    println!(
        "{} Enriched {} profiles ({} errors), saved to {}",
        "✓".green(),
        records.len() - failed,
        failed,
        output.display()
    );

    if let (true, Some(store)) = (save, store.as_ref()) {
        let mut stored = 0;
        for record in records.iter().filter(|r| r.get("error").is_none()) {
            let Some(url) = response_url(record) else { continue };
            match store.update_enrichment(url, record).await {
                Ok(_) => stored += 1,
                Err(e) => tracing::warn!("Could not store enrichment for {}: {}", url, e),
            }
        }
        println!("{} Stored {} enriched profiles", "✓".green(), stored);
    }
    Ok(())
}

/// Handle the 'sync' command
async fn handle_sync(
    config: &AppConfig,
    input: &Path,
    scraped: bool,
    search: Option<&str>,
    search_url: Option<&str>,
) -> Result<()> {
    let store = open_store(config)?;

    if scraped {
        let text = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let profiles: Vec<Value> = serde_json::from_str(&text)
            .with_context(|| format!("{} must be a JSON list of profiles", input.display()))?;
        let search_id = match search {
            Some(name) => {
                let row = store.create_search(name, None, search_url).await?;
                row.as_ref().and_then(|row| row.get("id")).map(|id| match id {
                    Value::String(id) => id.clone(),
                    other => other.to_string(),
                })
            }
            None => None,
        };
        let stats = store.upsert_scraped_profiles(&profiles, search_id.as_deref()).await;
        println!(
            "{} {} inserted, {} updated, {} skipped, {} errors",
            "✓".green(),
            stats.inserted,
            stats.updated,
            stats.skipped,
            stats.errors
        );
        return Ok(());
    }

    let raw = read_table(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let table = ColumnProjector::today().project(&raw);
    let stats = persist_profiles(&table, &store).await;
    println!("{} Stored {} profiles ({} failed)", "✓".green(), stats.stored, stats.failed);
    Ok(())
}

/// Handle the 'dedup-stats' command
async fn handle_dedup_stats(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    if !store.check_connection().await {
        anyhow::bail!("Cannot reach the profile store at {}", store.client().base_url());
    }
    let stats = store.dedup_stats().await?;

    println!("{}", "Profile store".bold().blue());
    println!("{}Total profiles: {}", "• ".cyan(), stats.total_profiles);
    println!(
        "{}Enriched in the last {} months: {}",
        "• ".cyan(),
        ENRICHMENT_REFRESH_MONTHS,
        stats.recently_enriched
    );
    println!("{}A new enrichment run would skip: {}", "• ".cyan(), stats.will_skip);

    let funnel = store.pipeline_stats().await;
    if !funnel.is_empty() {
        println!("{}", "Pipeline funnel".bold().blue());
        for (stage, count) in &funnel {
            println!("{}{}: {}", "• ".cyan(), stage, count);
        }
    }
    Ok(())
}

/// Helper function to print filter statistics
fn print_filter_stats(stats: &FilterStats) {
    println!("{}", "Filter results:".bold().blue());
    println!("{}Original: {}", "• ".cyan(), stats.original);
    println!("{}Removed: {}", "• ".cyan(), stats.total_removed);
    println!("{}Remaining: {}", "• ".cyan(), stats.final_count);
    println!("{}Keep rate: {}%", "• ".cyan(), stats.keep_rate_percent());
    for stage in &stats.stages {
        println!("  - {}: {}", stage.name, stage.removed);
    }
}

/// Helper function to format and print screening results
fn print_report(report: &ScreeningReport, screened: usize) {
    println!(
        "{}",
        format!("Showing {} of {} candidates", report.len(), screened).bold().blue()
    );
    for (rank, candidate) in report.candidates().iter().enumerate() {
        let score = candidate.result.score;
        let line = format!(
            "{}. {} - {}/10 ({})",
            rank + 1,
            candidate.name,
            score,
            candidate.result.fit
        );
        let line = if score >= 7 {
            line.green()
        } else if score >= 5 {
            line.yellow()
        } else {
            line.red()
        };
        println!("{line}");
        println!("   {}", candidate.result.summary);
        if !candidate.linkedin_url.is_empty() {
            println!("   {}", candidate.linkedin_url);
        }
    }
    println!("{}", report.summary_line());
}
