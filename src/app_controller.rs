use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::{FsOutputWriter, OutputWriter};
use crate::translation::core::{DocumentTranslator, TranslationService};
use crate::translation::pipeline::{Pipeline, PreparedRun, RunStats};
use crate::vcs::{GitCli, VersionControl};

// @module: Application controller for documentation translation runs

/// Main application controller
pub struct Controller {
    // @field: Validated run configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Configuration of the run
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run against the working directory with git, the configured provider
    /// and the local filesystem
    pub async fn run(&self, inputs: &[PathBuf]) -> Result<RunStats> {
        let working_dir = std::env::current_dir().context("Failed to resolve the working directory")?;
        let vcs = GitCli::new(&working_dir);
        let translator = TranslationService::from_config(&self.config);

        Ok(self
            .run_with(&translator, &vcs, &FsOutputWriter, inputs, &working_dir)
            .await)
    }

    /// Run with explicit collaborators
    pub async fn run_with(
        &self,
        translator: &dyn DocumentTranslator,
        vcs: &dyn VersionControl,
        writer: &dyn OutputWriter,
        inputs: &[PathBuf],
        working_dir: &Path,
    ) -> RunStats {
        let start_time = Instant::now();

        let progress_bar = Self::progress_bar();
        let pb = progress_bar.clone();
        let pipeline = Pipeline::new(&self.config, translator, vcs, writer).with_progress(Box::new(
            move |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            },
        ));

        let prepared = pipeline.prepare(inputs, working_dir).await;
        self.log_summary(&prepared);

        let stats = if prepared.files.is_empty() {
            info!("No files to translate");
            RunStats::default()
        } else {
            pipeline.execute(&prepared).await
        };
        progress_bar.finish_and_clear();

        Self::log_stats(&stats, start_time.elapsed());
        stats
    }

    fn progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tasks ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    fn log_summary(&self, prepared: &PreparedRun) {
        let config = &self.config;
        let languages: Vec<String> = config.target_languages.iter().map(|lang| lang.to_string()).collect();

        info!("Translation configuration:");
        info!("  Files: {}", prepared.files.len());
        info!("  Model: {}", config.provider.model);
        info!("  API: {}", config.provider.endpoint);
        info!("  Source: {} ({})", config.source_language_name(), config.source_language);
        info!("  Targets: {}", languages.join(", "));
        info!(
            "  Retries: {} (delay {}s, backoff x{})",
            config.retry.max_retries, config.retry.retry_delay_secs, config.retry.retry_backoff
        );
        info!("  Workers: {}", config.max_workers);
        info!("  Incremental: {}", if config.incremental_translate { "enabled" } else { "disabled" });
        info!("  Force: {}", if config.force_translate { "enabled" } else { "disabled" });
        info!("  Manual translations: {}", prepared.manual_overrides.len());
    }

    fn log_stats(stats: &RunStats, duration: Duration) {
        info!("Translation finished in {}", Self::format_duration(duration));
        info!("  Total files: {}", stats.total);
        info!("  Translated: {}", stats.translated);
        info!("  Skipped: {}", stats.skipped);
        info!("  Failed: {}", stats.failed);
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
