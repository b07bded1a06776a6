use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use holomap_client::{CatalogService, ClientConfig, PersonSummary, SwapiClient};
use holomap_core::report::{ReportFormat, generate_report, save_report};
use holomap_core::{CatalogBrowser, GraphBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

pub fn print_banner() {
    let banner = r#"
    ╔═══════════════════════════════════════════════╗
    ║  ██╗  ██╗ ██████╗ ██╗      ██████╗ ███╗   ███╗║
    ║  ██║  ██║██╔═══██╗██║     ██╔═══██╗████╗ ████║║
    ║  ███████║██║   ██║██║     ██║   ██║██╔████╔██║║
    ║  ██╔══██║██║   ██║██║     ██║   ██║██║╚██╔╝██║║
    ║  ██║  ██║╚██████╔╝███████╗╚██████╔╝██║ ╚═╝ ██║║
    ║  ╚═╝  ╚═╝ ╚═════╝ ╚══════╝ ╚═════╝ ╚═╝     ╚═╝║
    ╚═══════════════════════════════════════════════╝"#;
    println!("{}", banner.bright_yellow());
    println!(
        "    {} v{}\n",
        "people, films, starships, vehicles".bright_black(),
        env!("CARGO_PKG_VERSION")
    );
}

/// Install the stderr log subscriber for the one-shot commands.
/// `RUST_LOG` overrides the default `holomap=info`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "holomap=info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Client settings from the global `--api-url` / `--timeout` arguments
pub fn client_config(args: &ArgMatches, page_size: usize) -> ClientConfig {
    let defaults = ClientConfig::default();
    ClientConfig {
        base_url: args
            .get_one::<Url>("api-url")
            .map(|url| url.to_string())
            .unwrap_or(defaults.base_url),
        timeout_secs: args
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        page_size,
    }
}

/// Expand `~` in a user supplied output path
pub fn resolve_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn parse_format(value: &str) -> Result<ReportFormat> {
    ReportFormat::from_str(value).with_context(|| format!("Unknown report format '{}'", value))
}

/// Page through the catalog until it is exhausted or `max_pages` pages were fetched
pub async fn load_catalog<S: CatalogService>(
    service: &S,
    page_size: usize,
    max_pages: Option<u32>,
    progress: Option<&ProgressBar>,
) -> CatalogBrowser {
    let mut browser = CatalogBrowser::new(page_size);
    let mut pages = 0;

    while browser.state().has_more() && max_pages.is_none_or(|max| pages < max) {
        if let Some(pb) = progress {
            pb.set_message(format!(
                "Fetching page {} ({} people so far)",
                browser.state().cursor(),
                browser.state().entries().len()
            ));
        }
        browser.load_next_page(service).await;
        pages += 1;
    }

    browser
}

pub fn render_people_table(entries: &[PersonSummary]) -> String {
    let name_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut table = format!(
        "{:>4}  {:<name_width$}  {:<10}  {}\n",
        "ID", "Name", "Born", "Gender"
    );
    for entry in entries {
        table.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<10}  {}\n",
            entry.id,
            entry.name,
            entry.birth_year.as_deref().unwrap_or("-"),
            entry.gender.as_deref().unwrap_or("-"),
        ));
    }
    table
}

/// Build the graph of one person and render it
pub async fn build_report<S: CatalogService>(
    service: Arc<S>,
    id: u32,
    format: ReportFormat,
) -> Result<String> {
    let graph = GraphBuilder::new(service).build_graph(id).await?;
    info!(
        "Graph ready: {} nodes, {} edges",
        graph.nodes().len(),
        graph.edges().len()
    );
    Ok(generate_report(&graph, format)?)
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn handle_ui(sub_matches: &ArgMatches) -> Result<()> {
    let page_size = *sub_matches.get_one::<usize>("page-size").unwrap_or(&10);
    let config = client_config(sub_matches, page_size);
    let runtime = tokio::runtime::Handle::current();

    // The explorer blocks on terminal input, keep it off the async workers
    tokio::task::spawn_blocking(move || holomap_tui::run(&config, runtime)).await?
}

pub async fn handle_list(sub_matches: &ArgMatches) -> Result<()> {
    init_logging();

    let page_size = *sub_matches.get_one::<usize>("page-size").unwrap_or(&10);
    let max_pages = sub_matches.get_one::<u32>("pages").copied();
    let config = client_config(sub_matches, page_size);
    let client = SwapiClient::new(&config)?;

    let pb = spinner();
    let browser = load_catalog(&client, page_size, max_pages, Some(&pb)).await;
    pb.finish_and_clear();

    let state = browser.state();
    println!("{}", render_people_table(state.entries()));

    let status = if state.is_exhausted() {
        "end of catalog".green()
    } else {
        format!("more after page {}", state.cursor() - 1).yellow()
    };
    println!(
        "{} {} people ({})",
        "✓".green().bold(),
        state.entries().len(),
        status
    );
    Ok(())
}

pub async fn handle_graph(sub_matches: &ArgMatches) -> Result<()> {
    init_logging();

    let id = *sub_matches
        .get_one::<u32>("ID")
        .context("A person id is required")?;
    let format = parse_format(
        sub_matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    )?;
    let output = sub_matches
        .get_one::<String>("output")
        .map(|path| resolve_output_path(path));

    let config = client_config(sub_matches, 10);
    let client = Arc::new(SwapiClient::new(&config)?);

    let pb = spinner();
    pb.set_message(format!("Mapping person {}...", id));
    let report = build_report(client, id, format).await;
    pb.finish_and_clear();
    let report = report?;

    match output {
        Some(path) => {
            save_report(&report, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }
    Ok(())
}
