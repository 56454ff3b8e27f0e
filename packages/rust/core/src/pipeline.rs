//! End-to-end `generate` pipeline: sources → aggregate → render → write.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};
use tracing::{error, info, instrument, warn};

use routemap_artifacts::{ROBOTS_FILE_NAME, SITEMAP_FILE_NAME, render_robots, render_sitemap};
use routemap_shared::{ContentId, GenerateConfig, Result, RouteEntry, RunId, SourceCounts};
use routemap_sources::{RemoteOptions, fetch_content_ids, load_embedded_ids};

use crate::aggregator::{AggregatedRoutes, aggregate};
use crate::catalog::list_static_routes;
use crate::writer::{ArtifactMeta, write_artifacts};

/// Result of one `generate` run. Not persisted.
#[derive(Debug)]
pub struct GenerationResult {
    /// Identifier of this run (appears in logs).
    pub run_id: RunId,
    /// The manifest, in rendered order.
    pub routes: Vec<RouteEntry>,
    /// Routes contributed per source.
    pub counts: SourceCounts,
    /// Files written to the output directory.
    pub artifacts: Vec<ArtifactMeta>,
    /// Directory the artifacts were written to.
    pub output_dir: PathBuf,
    /// Date stamped into every `<lastmod>`.
    pub generated_on: NaiveDate,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once per content source with the number of identifiers it yielded.
    fn source_resolved(&self, source: &str, count: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerationResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_resolved(&self, _source: &str, _count: usize) {}
    fn done(&self, _result: &GenerationResult) {}
}

/// Run the pipeline, stamping routes with today's UTC date.
pub async fn generate(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerationResult> {
    generate_on(config, Utc::now().date_naive(), progress).await
}

/// Run the full `generate` pipeline for a given calendar date.
///
/// 1. Resolve remote and embedded identifiers concurrently (never fails)
/// 2. Aggregate with the static catalog
/// 3. Render `sitemap.xml` and, if enabled, `robots.txt`
/// 4. Write both into the output directory (fatal on error)
#[instrument(skip_all, fields(run_id = tracing::field::Empty, base_url = %config.base_url))]
pub async fn generate_on(
    config: &GenerateConfig,
    today: NaiveDate,
    progress: &dyn ProgressReporter,
) -> Result<GenerationResult> {
    let start = Instant::now();
    let run_id = RunId::new();
    tracing::Span::current().record("run_id", tracing::field::display(&run_id));

    info!(
        output_dir = %config.output_dir.display(),
        api_base = %config.api_base,
        %today,
        "starting generation"
    );

    if is_local_origin(&config.base_url) {
        warn!(
            base_url = %config.base_url,
            "base URL points at a local host; set a production origin before deploying"
        );
    }

    // --- Phase 1: Sources ---
    progress.phase("Resolving content sources");
    let (remote_ids, embedded_ids) =
        tokio::join!(resolve_remote(config), resolve_embedded(config));
    progress.source_resolved("remote", remote_ids.len());
    progress.source_resolved("embedded", embedded_ids.len());

    // --- Phase 2: Aggregate ---
    progress.phase("Aggregating routes");
    let static_routes = list_static_routes(&config.policy, today);
    let AggregatedRoutes { routes, counts } =
        aggregate(static_routes, &remote_ids, &embedded_ids, &config.policy, today);

    info!(
        total = counts.total(),
        static_routes = counts.static_routes,
        remote = counts.remote,
        embedded = counts.embedded,
        "routes aggregated"
    );

    // --- Phase 3: Render ---
    progress.phase("Rendering documents");
    let sitemap = render_sitemap(&routes, &config.base_url);
    let robots = config
        .include_robots
        .then(|| render_robots(&config.base_url));

    // --- Phase 4: Write ---
    progress.phase("Writing artifacts");
    let mut artifacts: Vec<(&str, &str)> = vec![(SITEMAP_FILE_NAME, sitemap.as_str())];
    if let Some(robots) = robots.as_deref() {
        artifacts.push((ROBOTS_FILE_NAME, robots));
    }

    let written = write_artifacts(&config.output_dir, &artifacts).inspect_err(|e| {
        error!(error = %e, output_dir = %config.output_dir.display(), "failed to write artifacts");
    })?;

    let result = GenerationResult {
        run_id,
        routes,
        counts,
        artifacts: written,
        output_dir: config.output_dir.clone(),
        generated_on: today,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        urls = result.routes.len(),
        files = result.artifacts.len(),
        elapsed_ms = result.elapsed.as_millis(),
        "generation complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

async fn resolve_remote(config: &GenerateConfig) -> Vec<ContentId> {
    if !config.include_remote {
        info!("remote content routes disabled in config");
        return Vec::new();
    }

    let opts = RemoteOptions {
        api_base: config.api_base.clone(),
        collection: config.collection.clone(),
        timeout_secs: config.timeout_secs,
    };
    fetch_content_ids(&opts).await
}

async fn resolve_embedded(config: &GenerateConfig) -> Vec<ContentId> {
    if !config.include_embedded {
        info!("embedded content routes disabled in config");
        return Vec::new();
    }

    load_embedded_ids(&config.embedded_path).await
}

fn is_local_origin(base_url: &str) -> bool {
    base_url.contains("localhost") || base_url.contains("127.0.0.1")
}
