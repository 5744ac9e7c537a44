// src/cli.rs
//! The `careers` command line: renders collection views as tables, JSON or CSV.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::employer_api::PIPELINE_FETCH_LIMIT;
use crate::core::{CacheStore, ConfigManager, Database, EmployerApi, JobCache, JobSeekerApi, ServiceClient};
use crate::error::ApiError;
use crate::export;
use crate::pipeline::{FilterOptions, JobStats, Listable, SortKey, Stage, StatusFilter};
use crate::state::{AppState, FeedSource, UserRole};
use crate::types::{Applicant, Application, CreditsBalance, Job, JobDraft, JobListing, JobStatus};
use crate::utils::truncate;
use crate::view::{ApplicantBoard, CollectionView};

#[derive(Parser, Debug)]
#[command(name = "careers")]
#[command(about = "Browse applicants, job postings and applications on Passionfruit Careers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to careers.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:3000/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text search
    #[arg(long, short = 's', default_value = "")]
    pub search: String,

    /// Exact status to show, or "all"
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// recent, match_score or name
    #[arg(long, default_value = "recent")]
    pub sort: SortKey,
}

impl ListArgs {
    fn apply<T: Listable + Clone>(&self, view: CollectionView<T>) -> CollectionView<T> {
        view.with_options(
            FilterOptions::new(self.status.clone(), self.search.clone()),
            self.sort,
        )
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct JobFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub requirements: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// full-time, part-time, contract...
    #[arg(long)]
    pub job_type: Option<String>,
    #[arg(long)]
    pub salary_min: Option<f64>,
    #[arg(long)]
    pub salary_max: Option<f64>,
    #[arg(long)]
    pub salary_currency: Option<String>,
    #[arg(long)]
    pub experience_level: Option<String>,
    /// published, draft or closed
    #[arg(long)]
    pub status: Option<JobStatus>,
}

impl From<JobFields> for JobDraft {
    fn from(fields: JobFields) -> Self {
        JobDraft {
            title: fields.title,
            description: fields.description,
            requirements: fields.requirements,
            location: fields.location,
            job_type: fields.job_type,
            salary_min: fields.salary_min,
            salary_max: fields.salary_max,
            salary_currency: fields.salary_currency,
            experience_level: fields.experience_level,
            status: fields.status,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List recent applicants to your jobs
    Applicants {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, default_value_t = PIPELINE_FETCH_LIMIT)]
        limit: u32,
    },
    /// Show applicants grouped into pipeline stages
    Pipeline {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Move an applicant to a pipeline stage
    Move {
        application_id: i64,
        /// new, reviewing, interview, offer, hired or rejected
        stage: Stage,
    },
    /// Applicant totals per status and average match score
    Stats,
    /// Browse published jobs (no sign-in needed)
    Browse {
        #[command(flatten)]
        list: ListArgs,
        /// Show the cached feed without contacting the backend
        #[arg(long)]
        offline: bool,
        /// Only jobs you have saved (job seekers)
        #[arg(long)]
        saved: bool,
    },
    /// Save a job to come back to later (job seekers)
    Save { job_id: String },
    /// Remove a job from your saved jobs (job seekers)
    Unsave { job_id: String },
    /// List your job postings
    Jobs {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create, update or delete a job posting
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
    /// List your own applications (job seekers)
    Applications {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Apply to a job (job seekers)
    Apply {
        job_id: i64,
        #[arg(long)]
        cover_letter: Option<String>,
    },
    /// Withdraw one of your applications (job seekers)
    Withdraw { application_id: i64 },
    /// Credit balance, usage breakdown and recent transactions
    Credits {
        #[arg(long, default_value_t = 10)]
        transactions: u32,
    },
    /// Show the employer profile
    Profile,
    /// Write the filtered list as CSV
    Export {
        #[arg(value_enum)]
        target: ExportTarget,
        #[command(flatten)]
        list: ListArgs,
        /// Output file; stdout when omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobCommand {
    Create {
        #[command(flatten)]
        fields: JobFields,
    },
    Update {
        job_id: i64,
        #[command(flatten)]
        fields: JobFields,
    },
    Delete { job_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Applicants,
    /// Your own postings
    Jobs,
    /// The public job feed
    Feed,
}

// ===== Session =====

struct Session {
    config: ConfigManager,
    state: AppState,
    client: ServiceClient,
}

impl Session {
    fn open(config: ConfigManager) -> Result<Self> {
        info!(
            "Using backend {} ({})",
            config.service.api_base_url, config.environment_name
        );

        let state = AppState::from_config(&config.service);
        let client = ServiceClient::new(&config.service.api_base_url, config.service.timeout_seconds)?
            .with_token(state.token().map(str::to_string));

        Ok(Self {
            config,
            state,
            client,
        })
    }

    fn employer(&self) -> Result<EmployerApi> {
        self.state.require_role(UserRole::Employer)?;
        Ok(EmployerApi::new(self.client.clone()))
    }

    fn job_seeker(&self) -> Result<JobSeekerApi> {
        self.state.require_role(UserRole::JobSeeker)?;
        Ok(JobSeekerApi::new(self.client.clone()))
    }

    /// The job cache is optional; failing to open it only costs the warm start.
    async fn job_cache(&self) -> Option<JobCache> {
        match Database::new(&self.config.environment.cache_path).await {
            Ok(db) => Some(JobCache::new(CacheStore::new(db.pool().clone()))),
            Err(e) => {
                warn!("Job cache unavailable: {:#}", e);
                None
            }
        }
    }

    async fn load_applicants(&self, limit: u32) -> Result<CollectionView<Applicant>> {
        let api = self.employer()?;
        let mut view = CollectionView::new();
        let ticket = view.begin_fetch();
        let result = api.recent_applicants(limit).await;
        view.complete_fetch(ticket, result.map_err(|e| e.user_message()));
        fail_on_empty_error(&view, "applicants")?;
        Ok(view)
    }

    /// The public feed: painted from cache first, then replaced by a fresh fetch.
    async fn load_feed(&mut self, offline: bool) -> Result<FeedSource> {
        let cache = self.job_cache().await;
        let api = JobSeekerApi::new(self.client.clone());
        refresh_feed(&mut self.state, cache.as_ref(), offline, api.jobs()).await
    }

    async fn load_postings(&mut self) -> Result<()> {
        let jobs = self
            .employer()?
            .jobs()
            .await
            .context("Failed to fetch your jobs")?;
        self.state.set_postings(jobs);
        Ok(())
    }
}

/// Hydrate `state` from `cache`, then (unless `offline`) replace it with the
/// result of `fetch`. A failed fetch keeps the cached feed when there is one.
pub async fn refresh_feed<F>(
    state: &mut AppState,
    cache: Option<&JobCache>,
    offline: bool,
    fetch: F,
) -> Result<FeedSource>
where
    F: Future<Output = Result<Vec<JobListing>, ApiError>>,
{
    if let Some(cache) = cache {
        if let Some(entry) = cache.load().await {
            state.hydrate_feed_from_cache(entry.value, entry.updated_at);
        }
    }

    if offline {
        return state
            .feed_source()
            .context("No cached jobs; run `careers browse` while online first");
    }

    match fetch.await {
        Ok(jobs) => {
            if let Some(cache) = cache {
                cache.store(&jobs).await;
            }
            state.set_feed(jobs);
            Ok(FeedSource::Network)
        }
        Err(e) if state.feed_source() == Some(FeedSource::Cache) => {
            warn!("Showing cached jobs, refresh failed: {}", e);
            eprintln!("Showing cached jobs ({})", e.user_message());
            Ok(FeedSource::Cache)
        }
        Err(e) => Err(e).context("Failed to fetch jobs"),
    }
}

fn fail_on_empty_error<T: Listable + Clone>(view: &CollectionView<T>, noun: &str) -> Result<()> {
    match (view.error(), view.items().is_empty()) {
        (Some(error), true) => anyhow::bail!("Failed to load {}: {}", noun, error),
        _ => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}

fn print_empty<T: Listable + Clone>(view: &CollectionView<T>, noun: &str) -> bool {
    match view.empty_state() {
        Some(state) => {
            println!("{}", state.title(noun));
            if let Some(hint) = state.hint() {
                println!("{}", hint);
            }
            true
        }
        None => false,
    }
}

fn csv_unsupported(what: &str) -> anyhow::Error {
    anyhow::anyhow!("CSV output is not available for {}; use table or json", what)
}

// ===== Table rendering =====

fn score_cell(score: Option<f64>) -> String {
    match score {
        Some(score) if score.is_finite() => format!("{:.0}%", score),
        _ => "-".to_string(),
    }
}

fn date_cell(raw: &str) -> String {
    match crate::utils::parse_timestamp(raw) {
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

pub fn render_applicants_table(rows: &[Applicant]) -> String {
    let mut out = format!(
        "{:<6} {:<24} {:<28} {:<12} {:>6} {:<10}\n",
        "ID", "NAME", "JOB", "STATUS", "MATCH", "APPLIED"
    );
    for a in rows {
        out.push_str(&format!(
            "{:<6} {:<24} {:<28} {:<12} {:>6} {:<10}\n",
            a.id,
            truncate(&a.name, 24),
            truncate(&a.job_title, 28),
            truncate(&a.status, 12),
            score_cell(a.match_score),
            date_cell(&a.applied_at),
        ));
    }
    out
}

pub fn render_pipeline(columns: &BTreeMap<Stage, Vec<Applicant>>) -> String {
    let mut out = String::new();
    for (stage, applicants) in columns {
        out.push_str(&format!("== {} ({}) ==\n", stage.title(), applicants.len()));
        for a in applicants {
            out.push_str(&format!(
                "  #{:<6} {:<24} {:<12} {}\n",
                a.id,
                truncate(&a.name, 24),
                truncate(&a.status, 12),
                score_cell(a.match_score)
            ));
        }
    }
    out
}

pub fn render_jobs_table(rows: &[Job]) -> String {
    let mut out = format!(
        "{:<6} {:<30} {:<10} {:<18} {:>6} {:>6}\n",
        "ID", "TITLE", "STATUS", "LOCATION", "VIEWS", "APPS"
    );
    for j in rows {
        out.push_str(&format!(
            "{:<6} {:<30} {:<10} {:<18} {:>6} {:>6}\n",
            j.id,
            truncate(&j.title, 30),
            truncate(&j.status, 10),
            truncate(j.location.as_deref().unwrap_or("-"), 18),
            j.views_count,
            j.applications_count,
        ));
    }
    out
}

pub fn render_listings_table(rows: &[JobListing], state: &AppState) -> String {
    let mut out = format!(
        "{:<6} {:<28} {:<20} {:<16} {:<20} {}\n",
        "ID", "TITLE", "COMPANY", "LOCATION", "SALARY", "SAVED"
    );
    for j in rows {
        out.push_str(&format!(
            "{:<6} {:<28} {:<20} {:<16} {:<20} {}\n",
            truncate(&j.id, 6),
            truncate(&j.title, 28),
            truncate(&j.company, 20),
            truncate(j.location.as_deref().unwrap_or("-"), 16),
            truncate(&j.salary_range().unwrap_or_else(|| "-".to_string()), 20),
            if state.is_saved(&j.id) { "*" } else { "" },
        ));
    }
    out
}

pub fn render_applications_table(rows: &[Application]) -> String {
    let mut out = format!(
        "{:<6} {:<28} {:<20} {:<12} {:<10}\n",
        "ID", "JOB", "COMPANY", "STATUS", "APPLIED"
    );
    for a in rows {
        out.push_str(&format!(
            "{:<6} {:<28} {:<20} {:<12} {:<10}\n",
            a.id,
            truncate(&a.job_title, 28),
            truncate(&a.company, 20),
            truncate(&a.status, 12),
            date_cell(&a.applied_at),
        ));
    }
    out
}

pub fn render_credits(balance: &CreditsBalance) -> String {
    let mut out = format!(
        "Balance: {}\nUsed this month: {} of {} ({:.0}%)\n",
        balance.current_balance,
        balance.credits_used_this_month,
        balance.credits_limit,
        balance.percentage_used()
    );
    for slice in balance.usage_breakdown() {
        out.push_str(&format!("  {:<20} {}\n", slice.category.label(), slice.credits));
    }
    out
}

#[derive(Serialize)]
struct StatsReport<'a> {
    applicants: &'a crate::pipeline::CollectionStats,
    stages: BTreeMap<Stage, usize>,
}

// ===== Dispatch =====

/// Load configuration as selected by the global `--config` / `--api-url` flags.
pub fn load_config(cli: &Cli) -> Result<ConfigManager> {
    Ok(ConfigManager::load_from(cli.config.as_deref())?.with_api_url(cli.api_url.clone()))
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    let mut session = Session::open(config)?;
    let format = cli.format;

    match cli.command {
        Command::Applicants { list, limit } => {
            let view = list.apply(session.load_applicants(limit).await?);
            match format {
                OutputFormat::Json => print_json(view.visible())?,
                OutputFormat::Csv => print!("{}", export::applicants_csv(view.visible())?),
                OutputFormat::Table => {
                    if !print_empty(&view, "applicants") {
                        print!("{}", render_applicants_table(view.visible()));
                    }
                }
            }
        }

        Command::Pipeline { list } => {
            let view = list.apply(session.load_applicants(PIPELINE_FETCH_LIMIT).await?);
            let columns = view.pipeline();
            match format {
                OutputFormat::Json => print_json(&columns)?,
                OutputFormat::Csv => return Err(csv_unsupported("the pipeline")),
                OutputFormat::Table => print!("{}", render_pipeline(&columns)),
            }
        }

        Command::Move {
            application_id,
            stage,
        } => {
            let api = session.employer()?;
            let mut board = ApplicantBoard::new(session.load_applicants(PIPELINE_FETCH_LIMIT).await?);
            match board.move_to_stage(&api, application_id, stage).await {
                Ok(response) => match format {
                    OutputFormat::Json => print_json(&response)?,
                    _ => println!(
                        "Moved application {} to {} (status: {})",
                        application_id,
                        stage.title(),
                        response.status
                    ),
                },
                Err(e) => {
                    anyhow::bail!(
                        "Could not move application {} to {}: {}",
                        application_id,
                        stage.title(),
                        e.user_message()
                    );
                }
            }
        }

        Command::Stats => {
            let view = session.load_applicants(PIPELINE_FETCH_LIMIT).await?;
            let stats = view.stats();
            let stages = view
                .pipeline()
                .into_iter()
                .map(|(stage, items)| (stage, items.len()))
                .collect::<BTreeMap<_, _>>();
            match format {
                OutputFormat::Json => print_json(&StatsReport {
                    applicants: &stats,
                    stages,
                })?,
                OutputFormat::Csv => return Err(csv_unsupported("stats")),
                OutputFormat::Table => {
                    println!("Total applicants: {}", stats.total);
                    println!("Average match score: {}%", stats.avg_match_score);
                    for (status, count) in &stats.by_status {
                        println!("  {:<14} {}", status, count);
                    }
                    println!();
                    for (stage, count) in &stages {
                        println!("  {:<14} {}", stage.title(), count);
                    }
                }
            }
        }

        Command::Browse {
            list,
            offline,
            saved,
        } => {
            let source = session.load_feed(offline).await?;
            if saved {
                let ids = session
                    .job_seeker()?
                    .saved_job_ids()
                    .await
                    .context("Failed to fetch saved jobs")?;
                session.state.set_saved_ids(ids);
            }
            let rows = if saved {
                session.state.saved_jobs()
            } else {
                session.state.feed().to_vec()
            };
            let view = list.apply(CollectionView::with_items(rows));
            match format {
                OutputFormat::Json => print_json(view.visible())?,
                OutputFormat::Csv => print!("{}", export::listings_csv(view.visible())?),
                OutputFormat::Table => {
                    if let (FeedSource::Cache, Some(at)) = (source, session.state.feed_synced_at()) {
                        println!("(cached {})", at.format("%Y-%m-%d %H:%M UTC"));
                    }
                    if !print_empty(&view, "jobs") {
                        print!("{}", render_listings_table(view.visible(), &session.state));
                    }
                }
            }
        }

        Command::Save { job_id } => {
            let response = session.job_seeker()?.save_job(&job_id).await?;
            session.state.set_saved(&job_id, true);
            println!("{}", response.message);
        }

        Command::Unsave { job_id } => {
            let response = session.job_seeker()?.unsave_job(&job_id).await?;
            session.state.set_saved(&job_id, false);
            println!("{}", response.message);
        }

        Command::Jobs { list } => {
            session.load_postings().await?;
            let view = list.apply(CollectionView::with_items(session.state.postings().to_vec()));
            match format {
                OutputFormat::Json => print_json(view.visible())?,
                OutputFormat::Csv => print!("{}", export::jobs_csv(view.visible())?),
                OutputFormat::Table => {
                    if !print_empty(&view, "jobs") {
                        print!("{}", render_jobs_table(view.visible()));
                    }
                    let totals = JobStats::from_jobs(view.items());
                    println!(
                        "\n{} jobs: {} published, {} draft, {} views, {} applications",
                        totals.total,
                        totals.published,
                        totals.draft,
                        totals.total_views,
                        totals.total_applications
                    );
                }
            }
        }

        Command::Job { command } => {
            let api = session.employer()?;
            match command {
                JobCommand::Create { fields } => {
                    let response = api.create_job(&JobDraft::from(fields)).await?;
                    println!("{} (id {})", response.message, response.job.id);
                    session.state.upsert_posting(response.job);
                }
                JobCommand::Update { job_id, fields } => {
                    let response = api.update_job(job_id, &JobDraft::from(fields)).await?;
                    println!("{}", response.message);
                    session.state.upsert_posting(response.job);
                }
                JobCommand::Delete { job_id } => {
                    let response = api.delete_job(job_id).await?;
                    println!("{}", response.message);
                    if !session.state.remove_posting(job_id) {
                        info!("Job {} was not in the loaded postings", job_id);
                    }
                }
            }
        }

        Command::Applications { list } => {
            let api = session.job_seeker()?;
            let mut view = CollectionView::new();
            let ticket = view.begin_fetch();
            let result = api.applications().await;
            view.complete_fetch(ticket, result.map_err(|e| e.user_message()));
            fail_on_empty_error(&view, "applications")?;
            let view = list.apply(view);
            match format {
                OutputFormat::Json => print_json(view.visible())?,
                OutputFormat::Csv => return Err(csv_unsupported("applications")),
                OutputFormat::Table => {
                    if !print_empty(&view, "applications") {
                        print!("{}", render_applications_table(view.visible()));
                    }
                }
            }
        }

        Command::Apply {
            job_id,
            cover_letter,
        } => {
            let response = session
                .job_seeker()?
                .apply(job_id, cover_letter.as_deref())
                .await?;
            println!("{}", response.message);
        }

        Command::Withdraw { application_id } => {
            let response = session.job_seeker()?.withdraw(application_id).await?;
            println!("{} (application {})", response.message, response.application_id);
        }

        Command::Credits { transactions } => {
            let api = session.employer()?;
            let balance = api.credits_balance().await?;
            let history = api.credit_transactions(transactions).await?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "balance": balance,
                    "percentageUsed": balance.percentage_used(),
                    "usage": balance.usage_breakdown(),
                    "transactions": history,
                }))?,
                OutputFormat::Csv => return Err(csv_unsupported("credits")),
                OutputFormat::Table => {
                    print!("{}", render_credits(&balance));
                    for tx in &history {
                        println!(
                            "  {:<10} {:>6}  {}  {}",
                            tx.kind,
                            tx.amount,
                            tx.timestamp.as_deref().map(date_cell).unwrap_or_else(|| "-".to_string()),
                            tx.description.as_deref().unwrap_or("")
                        );
                    }
                }
            }
        }

        Command::Profile => {
            let profile = session.employer()?.profile().await?;
            session.state.set_profile(profile);
            if let Some(profile) = session.state.profile() {
                match format {
                    OutputFormat::Json => print_json(profile)?,
                    OutputFormat::Csv => return Err(csv_unsupported("the profile")),
                    OutputFormat::Table => {
                        println!("{}", profile.company_name);
                        for (label, value) in [
                            ("Industry", &profile.industry),
                            ("Size", &profile.company_size),
                            ("Website", &profile.website),
                            ("Email", &profile.email),
                            ("Phone", &profile.phone),
                            ("Address", &profile.address),
                        ] {
                            if !value.is_empty() {
                                println!("  {:<10} {}", label, value);
                            }
                        }
                    }
                }
            }
        }

        Command::Export {
            target,
            list,
            output,
        } => {
            let contents = match target {
                ExportTarget::Applicants => {
                    let view = list.apply(session.load_applicants(PIPELINE_FETCH_LIMIT).await?);
                    export::applicants_csv(view.visible())?
                }
                ExportTarget::Jobs => {
                    session.load_postings().await?;
                    let view = list.apply(CollectionView::with_items(session.state.postings().to_vec()));
                    export::jobs_csv(view.visible())?
                }
                ExportTarget::Feed => {
                    session.load_feed(false).await?;
                    let view = list.apply(CollectionView::with_items(session.state.feed().to_vec()));
                    export::listings_csv(view.visible())?
                }
            };
            match output {
                Some(path) => {
                    export::write_csv(&path, &contents).await?;
                    println!("Exported to {}", path.display());
                }
                None => print!("{}", contents),
            }
        }
    }

    Ok(())
}
