//! Migrating many files at once.
//!
//! Files are independent: each one is read, migrated, and written on its own, and a
//! failure is recorded in that file's report without stopping the rest.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;
use serde::Serialize;

use crate::compat::{Registry, StepRecord};
use crate::foundation::core::{Category, TargetVersion, VersionId};
use crate::foundation::error::{MigrateError, MigrateResult};

/// Where migrated documents go.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Migrate and report, write nothing.
    #[default]
    DryRun,
    /// Overwrite each input, optionally copying the original to `<path><suffix>` first.
    InPlace { backup_suffix: Option<String> },
    /// Mirror input-relative paths under this directory.
    OutputDir(PathBuf),
}

#[derive(Clone, Debug, Default)]
pub struct BatchOpts {
    /// `None` infers the category per file from its extension, then from its content.
    pub category: Option<Category>,
    pub target: TargetVersion,
    pub write: WriteMode,
    pub parallel: bool,
    pub threads: Option<usize>,
}

/// One file to process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Input {
    pub path: PathBuf,
    /// Path below the directory it was found in (the file name for explicit files).
    pub relative: PathBuf,
}

#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Migrated {
        category: Category,
        from: VersionId,
        to: VersionId,
        steps: Vec<StepRecord>,
        written: Option<PathBuf>,
    },
    Unchanged {
        category: Category,
        version: VersionId,
        written: Option<PathBuf>,
    },
    Failed {
        error: String,
    },
}

impl FileReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed { .. })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        let steps: &[StepRecord] = match &self.outcome {
            FileOutcome::Migrated { steps, .. } => steps,
            _ => &[],
        };
        steps
            .iter()
            .flat_map(|s| s.warnings.iter().map(String::as_str))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub migrated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut out = Self::default();
        for r in reports {
            match r.outcome {
                FileOutcome::Migrated { .. } => out.migrated += 1,
                FileOutcome::Unchanged { .. } => out.unchanged += 1,
                FileOutcome::Failed { .. } => out.failed += 1,
            }
            out.warnings += r.warnings().count();
        }
        out
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Result of `detect` on one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectReport {
    pub path: PathBuf,
    pub category: Option<Category>,
    pub version: Option<VersionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Expand files and directories into a sorted, de-duplicated input list.
///
/// Directories are walked recursively and filtered by the extensions of `category`
/// (all known extensions when `None`). Explicitly named files are always taken.
pub fn collect_inputs(
    paths: &[PathBuf],
    category: Option<Category>,
    registry: &Registry,
) -> MigrateResult<Vec<Input>> {
    let extensions: Vec<&'static str> = match category {
        Some(c) => registry
            .manager(c)
            .map(|m| m.extensions())
            .unwrap_or_default(),
        None => registry
            .managers()
            .iter()
            .flat_map(|m| m.extensions())
            .collect(),
    };

    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, path, &extensions, &mut out)?;
        } else if path.is_file() {
            let relative = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.clone());
            out.push(Input {
                path: path.clone(),
                relative,
            });
        } else {
            return Err(MigrateError::validation(format!(
                "input '{}' does not exist",
                path.display()
            )));
        }
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out.dedup_by(|a, b| a.path == b.path);
    Ok(out)
}

fn walk_dir(
    dir: &Path,
    root: &Path,
    extensions: &[&str],
    out: &mut Vec<Input>,
) -> anyhow::Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("read directory '{}'", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("list directory '{}'", dir.display()))?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, root, extensions, out)?;
        } else if has_extension(&path, extensions) {
            let relative = path
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            out.push(Input { path, relative });
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default()
}

/// Category from the extension, falling back to content sniffing.
fn infer_category(registry: &Registry, data: &[u8], extension: &str) -> Option<Category> {
    Category::from_extension(extension)
        .or_else(|| registry.detect_any(data, extension).map(|(c, _)| c))
}

/// Migrate every input; reports come back in input order.
pub fn migrate_files(
    registry: &Registry,
    inputs: &[Input],
    opts: &BatchOpts,
) -> MigrateResult<Vec<FileReport>> {
    if matches!(opts.write, WriteMode::OutputDir(_)) {
        reject_output_collisions(inputs)?;
    }
    if !opts.parallel {
        return Ok(inputs
            .iter()
            .map(|input| migrate_file(registry, input, opts))
            .collect());
    }

    let pool = build_thread_pool(opts.threads)?;
    Ok(pool.install(|| {
        inputs
            .par_iter()
            .map(|input| migrate_file(registry, input, opts))
            .collect()
    }))
}

/// Two inputs mirrored onto the same output path would overwrite each other.
fn reject_output_collisions(inputs: &[Input]) -> MigrateResult<()> {
    let mut seen: HashMap<&Path, &Path> = HashMap::with_capacity(inputs.len());
    for input in inputs {
        if let Some(first) = seen.insert(&input.relative, &input.path) {
            return Err(MigrateError::validation(format!(
                "'{}' and '{}' both map to '{}' in the output directory",
                first.display(),
                input.path.display(),
                input.relative.display()
            )));
        }
    }
    Ok(())
}

#[tracing::instrument(level = "debug", skip(registry, input, opts), fields(path = %input.path.display()))]
pub fn migrate_file(registry: &Registry, input: &Input, opts: &BatchOpts) -> FileReport {
    let outcome = match try_migrate_file(registry, input, opts) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(path = %input.path.display(), error = %e, "migration failed");
            FileOutcome::Failed {
                error: e.to_string(),
            }
        }
    };
    FileReport {
        path: input.path.clone(),
        outcome,
    }
}

fn try_migrate_file(
    registry: &Registry,
    input: &Input,
    opts: &BatchOpts,
) -> MigrateResult<FileOutcome> {
    let data = fs::read(&input.path)
        .with_context(|| format!("read '{}'", input.path.display()))?;
    let extension = extension_of(&input.path);
    let origin = input.path.display().to_string();

    let category = opts
        .category
        .or_else(|| infer_category(registry, &data, extension))
        .ok_or_else(|| {
            MigrateError::validation(format!(
                "cannot infer the asset category of '{origin}', pass one explicitly"
            ))
        })?;

    let migrated = registry.migrate_named(category, &data, extension, &opts.target, Some(origin.as_str()))?;

    if migrated.is_unchanged() {
        let written = match &opts.write {
            WriteMode::OutputDir(_) => write_output(input, &migrated.data, &opts.write)?,
            _ => None,
        };
        return Ok(FileOutcome::Unchanged {
            category,
            version: migrated.detected,
            written,
        });
    }

    let written = write_output(input, &migrated.data, &opts.write)?;
    Ok(FileOutcome::Migrated {
        category,
        from: migrated.detected,
        to: migrated.target,
        steps: migrated.steps,
        written,
    })
}

fn write_output(input: &Input, data: &[u8], mode: &WriteMode) -> anyhow::Result<Option<PathBuf>> {
    match mode {
        WriteMode::DryRun => Ok(None),
        WriteMode::InPlace { backup_suffix } => {
            if let Some(suffix) = backup_suffix {
                let backup = with_suffix(&input.path, suffix);
                fs::copy(&input.path, &backup)
                    .with_context(|| format!("back up to '{}'", backup.display()))?;
            }
            fs::write(&input.path, data)
                .with_context(|| format!("write '{}'", input.path.display()))?;
            Ok(Some(input.path.clone()))
        }
        WriteMode::OutputDir(dir) => {
            let dest = dir.join(&input.relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create directory '{}'", parent.display()))?;
            }
            fs::write(&dest, data).with_context(|| format!("write '{}'", dest.display()))?;
            Ok(Some(dest))
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Report the category and version of each input without migrating.
pub fn detect_files(
    registry: &Registry,
    inputs: &[Input],
    category: Option<Category>,
) -> Vec<DetectReport> {
    inputs
        .iter()
        .map(|input| {
            let extension = extension_of(&input.path);
            match fs::read(&input.path) {
                Ok(data) => {
                    let hit = match category.or_else(|| Category::from_extension(extension)) {
                        Some(c) => registry
                            .manager(c)
                            .and_then(|m| m.detect(&data, extension))
                            .map(|v| (c, v)),
                        None => registry.detect_any(&data, extension),
                    };
                    DetectReport {
                        path: input.path.clone(),
                        category: hit.map(|(c, _)| c),
                        version: hit.map(|(_, v)| v),
                        error: None,
                    }
                }
                Err(e) => DetectReport {
                    path: input.path.clone(),
                    category: None,
                    version: None,
                    error: Some(format!("read '{}': {e}", input.path.display())),
                },
            }
        })
        .collect()
}

fn build_thread_pool(threads: Option<usize>) -> MigrateResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MigrateError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;
