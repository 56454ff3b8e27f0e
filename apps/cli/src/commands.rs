//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use routemap_core::{GenerationResult, ProgressReporter, generate};
use routemap_shared::{GenerateConfig, RouteEntry, init_config, load_config};
use tracing::info;

/// Content routes listed per group in the run summary.
const PREVIEW_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// routemap: site map and robots.txt generator.
#[derive(Parser)]
#[command(
    name = "routemap",
    version,
    about = "Generate sitemap.xml and robots.txt from static routes, a content API and bundled fallback content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Write sitemap.xml (and robots.txt) into the output directory.
    Generate(GenerateArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags of `routemap generate`. Each one overrides the config file.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct GenerateArgs {
    /// Config file (defaults to ./routemap.toml, then ~/.routemap/routemap.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Named environment from `[environments.<name>]`.
    #[arg(short, long, env = "ROUTEMAP_ENV")]
    pub env: Option<String>,

    /// Public origin used in every <loc> and in robots.txt.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Content API origin.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Output directory.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Bundled fallback-content resource.
    #[arg(long)]
    pub embedded: Option<PathBuf>,

    /// Content API timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Skip robots.txt.
    #[arg(long)]
    pub no_robots: bool,

    /// Do not contact the content API.
    #[arg(long)]
    pub no_remote: bool,

    /// Do not read the bundled fallback resource.
    #[arg(long)]
    pub no_embedded: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default routemap.toml into the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show the loaded configuration.
    Show {
        /// Config file to show instead of the discovered one.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "routemap=info",
        1 => "routemap=debug",
        _ => "routemap=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => cmd_generate(args).await,
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(force),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

/// Load the config file and apply `generate` flags on top of it.
fn resolve_generate_config(args: &GenerateArgs) -> Result<GenerateConfig> {
    let app_config = load_config(args.config.as_deref())?;
    let mut config = GenerateConfig::resolve(&app_config, args.env.as_deref())?;

    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(api_base) = &args.api_base {
        config = config.with_api_base(api_base)?;
    }
    if let Some(out) = &args.out {
        config.output_dir = out.clone();
    }
    if let Some(embedded) = &args.embedded {
        config.embedded_path = embedded.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config.include_robots &= !args.no_robots;
    config.include_remote &= !args.no_remote;
    config.include_embedded &= !args.no_embedded;

    Ok(config)
}

async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let config = resolve_generate_config(&args)?;

    info!(
        env = args.env.as_deref().unwrap_or("default"),
        base_url = %config.base_url,
        "generating site map"
    );

    let reporter = CliProgress::new();
    let result = generate(&config, &reporter)
        .await
        .inspect_err(|_| reporter.spinner.finish_and_clear())?;

    print_summary(&config, &result);
    Ok(())
}

fn print_summary(config: &GenerateConfig, result: &GenerationResult) {
    let counts = &result.counts;

    println!();
    println!("  Site map generated successfully!");
    println!("  Run:    {}", result.run_id);
    println!(
        "  URLs:   {} ({} static, {} remote, {} embedded)",
        counts.total(),
        counts.static_routes,
        counts.remote,
        counts.embedded
    );
    println!("  Output: {}", result.output_dir.display());
    for artifact in &result.artifacts {
        println!("          {} ({} bytes)", artifact.filename, artifact.size_bytes);
    }
    println!("  Time:   {:.1}s", result.elapsed.as_secs_f64());

    let (static_routes, rest) = result
        .routes
        .split_at(counts.static_routes.min(result.routes.len()));
    let (remote_routes, embedded_routes) = rest.split_at(counts.remote.min(rest.len()));

    println!();
    println!("  Static routes:");
    print_lines(&preview_lines(static_routes, None));
    if !remote_routes.is_empty() {
        println!("  Remote content routes:");
        print_lines(&preview_lines(remote_routes, Some(PREVIEW_LIMIT)));
    }
    if !embedded_routes.is_empty() {
        println!("  Embedded content routes:");
        print_lines(&preview_lines(embedded_routes, Some(PREVIEW_LIMIT)));
    }

    println!();
    println!("  Sitemap: {}/sitemap.xml", config.base_url);
    if config.include_robots {
        println!("  Robots:  {}/robots.txt", config.base_url);
    }
    println!();
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("    {line}");
    }
}

/// One line per route, truncated to `limit` with an "... and N more" tail.
fn preview_lines(routes: &[RouteEntry], limit: Option<usize>) -> Vec<String> {
    let shown = limit.map_or(routes.len(), |limit| limit.min(routes.len()));

    let mut lines: Vec<String> = routes[..shown]
        .iter()
        .map(|r| format!("{} (priority {}, {})", r.path, r.priority, r.change_freq))
        .collect();

    if shown < routes.len() {
        lines.push(format!("... and {} more", routes.len() - shown));
    }
    lines
}

fn cmd_config_init(force: bool) -> Result<()> {
    let path = init_config(Path::new("routemap.toml"), force)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(explicit: Option<&Path>) -> Result<()> {
    let config = load_config(explicit)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_resolved(&self, source: &str, count: usize) {
        self.spinner
            .set_message(format!("Resolved {count} {source} identifiers"));
    }

    fn done(&self, _result: &GenerationResult) {
        self.spinner.finish_and_clear();
    }
}
