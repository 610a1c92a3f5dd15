/*!
 * The documentation translation pipeline.
 *
 * A run has two phases:
 * - `prepare`: detect manual overrides and select the source documents
 * - `execute`: plan a decision for every (document, language) pair, then run
 *   the actionable ones through the batch scheduler and write the results
 *
 * Every per-document and per-task error is turned into statistics; nothing
 * below `execute` aborts the run.
 */

use log::{error, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::{FileManager, OutputWriter};
use crate::language_utils::TargetLanguage;
use crate::vcs::{ChangeDetector, VersionControl};

use super::batch::BatchScheduler;
use super::core::DocumentTranslator;
use super::decision::{decide, DecisionOptions, TaskDecision, TaskFacts};

/// Aggregate counters of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Source documents considered
    pub total: usize,
    /// Tasks translated and written
    pub translated: usize,
    /// Tasks skipped by decision
    pub skipped: usize,
    /// Tasks that failed
    pub failed: usize,
}

impl RunStats {
    /// Count one finished task
    pub fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Translated => self.translated += 1,
            TaskOutcome::Skipped => self.skipped += 1,
            TaskOutcome::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} translated, {} skipped, {} failed",
            self.total, self.translated, self.skipped, self.failed
        )
    }
}

/// Result of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Translated,
    Skipped,
    Failed,
}

/// A source-language document, read once per run
#[derive(Debug)]
pub struct SourceDocument {
    /// Absolute path under the source root
    pub path: PathBuf,
    /// Path relative to the source root, mirrored into target trees
    pub relative_path: PathBuf,
    /// Raw content
    pub content: Arc<str>,
}

/// One (document, language) pair and what to do with it
#[derive(Debug, Clone)]
pub struct TranslationTask {
    /// Document to translate
    pub document: Arc<SourceDocument>,
    /// Language to translate into
    pub language: TargetLanguage,
    /// Where the translation goes
    pub output_path: PathBuf,
    /// Inputs of the decision
    pub facts: TaskFacts,
    /// The decision
    pub decision: TaskDecision,
    /// Progress prefix of the document (`[3/10]`)
    pub prefix: String,
}

/// Every task of a run, before execution
#[derive(Debug, Default)]
pub struct TranslationPlan {
    /// All planned tasks in collector order, skipped ones included
    pub tasks: Vec<TranslationTask>,
    /// Tasks that could not be planned (unreadable or misplaced source)
    pub failed: usize,
    /// Documents considered
    pub documents: usize,
}

impl TranslationPlan {
    /// Tasks that need a translation call
    pub fn actionable(&self) -> impl Iterator<Item = &TranslationTask> {
        self.tasks.iter().filter(|task| task.decision.is_actionable())
    }

    /// Number of tasks resolved to a skip
    pub fn skipped(&self) -> usize {
        self.tasks.iter().filter(|task| !task.decision.is_actionable()).count()
    }
}

/// Documents and overrides of a run, ready for execution
#[derive(Debug, Default, Clone)]
pub struct PreparedRun {
    /// Source documents, in collector order
    pub files: Vec<PathBuf>,
    /// Output paths that must not be written
    pub manual_overrides: HashSet<PathBuf>,
}

/// Progress callback: tasks completed, tasks scheduled
pub type ProgressCallback<'a> = Box<dyn Fn(usize, usize) + Send + Sync + 'a>;

/// The translation pipeline for one run
pub struct Pipeline<'a> {
    config: &'a Config,
    translator: &'a dyn DocumentTranslator,
    vcs: &'a dyn VersionControl,
    writer: &'a dyn OutputWriter,
    progress: Option<ProgressCallback<'a>>,
}

impl<'a> Pipeline<'a> {
    /// Assemble a pipeline from its collaborators
    pub fn new(
        config: &'a Config,
        translator: &'a dyn DocumentTranslator,
        vcs: &'a dyn VersionControl,
        writer: &'a dyn OutputWriter,
    ) -> Self {
        Self {
            config,
            translator,
            vcs,
            writer,
            progress: None,
        }
    }

    /// Report progress after every chunk
    pub fn with_progress(mut self, progress: ProgressCallback<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn detector(&self) -> ChangeDetector<'_> {
        ChangeDetector::new(self.vcs, &self.config.vcs.diff_base, &self.config.vcs.diff_head)
    }

    fn decision_options(&self) -> DecisionOptions {
        DecisionOptions {
            force: self.config.force_translate,
            incremental: self.config.incremental_translate,
        }
    }

    /// Detect overrides and select the documents to translate
    ///
    /// With no `inputs` every document under the source root is selected;
    /// otherwise only the given paths, resolved against `working_dir`.
    pub async fn prepare(&self, inputs: &[PathBuf], working_dir: &Path) -> PreparedRun {
        let manual_overrides = self.detector().manual_overrides(&self.config.target_roots()).await;

        let files = if inputs.is_empty() {
            match FileManager::collect_markdown_files(self.config.source_root()) {
                Ok(files) => files,
                Err(e) => {
                    error!("Failed to list source documents: {:#}", e);
                    Vec::new()
                }
            }
        } else {
            self.select_inputs(inputs, working_dir)
        };

        PreparedRun { files, manual_overrides }
    }

    /// Filter explicitly requested files
    pub fn select_inputs(&self, inputs: &[PathBuf], working_dir: &Path) -> Vec<PathBuf> {
        let target_roots = self.config.target_roots();
        inputs
            .iter()
            .map(|input| FileManager::absolutize(input, working_dir))
            .filter(|path| {
                if target_roots.iter().any(|root| path.starts_with(root)) {
                    warn!("Skipping translated file: {}", path.display());
                    return false;
                }
                if !path.exists() {
                    warn!("File not found: {}", path.display());
                    return false;
                }
                if !FileManager::is_markdown_file(path) {
                    warn!("Not a markdown file: {}", path.display());
                    return false;
                }
                true
            })
            .collect()
    }

    /// Decide every task of the run
    pub async fn plan(&self, prepared: &PreparedRun) -> TranslationPlan {
        let mut plan = TranslationPlan {
            documents: prepared.files.len(),
            ..Default::default()
        };

        for (index, path) in prepared.files.iter().enumerate() {
            let prefix = format!("[{}/{}]", index + 1, prepared.files.len());
            match self.plan_document(path, &prefix, &prepared.manual_overrides).await {
                Some(tasks) => plan.tasks.extend(tasks),
                None => plan.failed += self.config.target_languages.len(),
            }
        }

        plan
    }

    async fn plan_document(
        &self,
        path: &Path,
        prefix: &str,
        manual_overrides: &HashSet<PathBuf>,
    ) -> Option<Vec<TranslationTask>> {
        info!("{} Processing: {}", prefix, path.display());

        let source_root = self.config.source_root();
        let Ok(relative_path) = path.strip_prefix(&source_root) else {
            error!("{} File is not in the {} directory", prefix, source_root.display());
            return None;
        };

        let content = match FileManager::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                error!("{} Failed to read file: {:#}", prefix, e);
                return None;
            }
        };

        let options = self.decision_options();
        let source_changed = if options.incremental && !options.force {
            self.detector().has_changes(path, &content).await
        } else {
            true
        };

        let document = Arc::new(SourceDocument {
            path: path.to_path_buf(),
            relative_path: relative_path.to_path_buf(),
            content: Arc::from(content),
        });

        let tasks: Vec<TranslationTask> = self
            .config
            .target_languages
            .iter()
            .map(|language| {
                let output_path = language.root(&self.config.content_root).join(relative_path);
                let facts = TaskFacts {
                    manual_override: manual_overrides.contains(&output_path),
                    target_exists: self.writer.exists(&output_path),
                    source_changed,
                };
                TranslationTask {
                    document: Arc::clone(&document),
                    language: language.clone(),
                    output_path,
                    facts,
                    decision: decide(facts, options),
                    prefix: prefix.to_string(),
                }
            })
            .collect();

        Self::log_plan(prefix, source_changed, &tasks);
        Some(tasks)
    }

    fn log_plan(prefix: &str, source_changed: bool, tasks: &[TranslationTask]) {
        if tasks.iter().all(|task| task.decision == TaskDecision::SkipUnchanged) {
            info!("{} No changes and all translations exist, skipping", prefix);
            return;
        }

        let missing: Vec<&str> = tasks
            .iter()
            .filter(|task| !task.facts.target_exists)
            .map(|task| task.language.native_name.as_str())
            .collect();
        if !source_changed && !missing.is_empty() {
            info!("{} Filling missing translations: {}", prefix, missing.join(", "));
        }

        for task in tasks.iter().filter(|task| !task.decision.is_actionable()) {
            info!("{} Skipping {} ({})", prefix, task.language.native_name, task.decision);
        }
    }

    /// Translate and write one task
    pub async fn execute_task(&self, task: &TranslationTask) -> TaskOutcome {
        let language = &task.language;
        info!("{} {} to {}...", task.prefix, capitalize(task.decision.describe()), language.native_name);

        let translated = match self.translator.translate(&task.document.content, language).await {
            Ok(text) => text,
            Err(e) => {
                error!("{} Failed to translate {}: {}", task.prefix, language.native_name, e);
                return TaskOutcome::Failed;
            }
        };

        if let Err(e) = self.writer.write(&task.output_path, &translated) {
            error!("{} Failed to save {} translation: {:#}", task.prefix, language.native_name, e);
            return TaskOutcome::Failed;
        }

        let status = match task.decision {
            TaskDecision::Translate => "Saved",
            _ => "Updated",
        };
        info!("{} {} {} translation", task.prefix, status, language.native_name);
        TaskOutcome::Translated
    }

    /// Plan and run every task, returning the run statistics
    pub async fn execute(&self, prepared: &PreparedRun) -> RunStats {
        let plan = self.plan(prepared).await;
        let mut stats = RunStats {
            total: plan.documents,
            skipped: plan.skipped(),
            failed: plan.failed,
            ..Default::default()
        };

        let tasks: Vec<&TranslationTask> = plan.actionable().collect();
        let scheduler = BatchScheduler::new(self.config.max_workers);
        if scheduler.is_sequential() {
            info!("Using sequential mode");
        } else {
            info!("Using concurrent mode ({} workers)", scheduler.max_workers());
        }

        scheduler
            .run(
                tasks,
                |task| self.execute_task(task),
                |outcomes, done, total| {
                    for outcome in outcomes {
                        stats.record(*outcome);
                    }
                    if let Some(progress) = &self.progress {
                        progress(done, total);
                    }
                },
            )
            .await;

        stats
    }

    /// Prepare and execute in one go
    pub async fn run(&self, inputs: &[PathBuf], working_dir: &Path) -> RunStats {
        let prepared = self.prepare(inputs, working_dir).await;
        if prepared.files.is_empty() {
            info!("No files to translate");
            return RunStats::default();
        }
        self.execute(&prepared).await
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
