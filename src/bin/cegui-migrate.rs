use std::path::PathBuf;

use anyhow::Context as _;
use cegui_migrate::batch::{self, BatchSummary, DetectReport, FileOutcome, FileReport};
use cegui_migrate::{BatchConfig, Category, Registry};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "cegui-migrate",
    version,
    about = "Detect and migrate CEGUI font, imageset, layout and scheme files between versions"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Migrate files to another format version.
    Migrate(MigrateArgs),
    /// Print the detected category and version of each file.
    Detect(DetectArgs),
    /// List the known versions of every category.
    Versions(VersionsArgs),
}

#[derive(Parser, Debug)]
struct MigrateArgs {
    /// Files or directories (searched recursively).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Asset category; inferred per file when omitted.
    #[arg(long, value_enum)]
    category: Option<CategoryChoice>,

    /// Target version identifier (see `versions`), or "latest".
    #[arg(long)]
    target: Option<String>,

    /// Write migrated files under this directory, mirroring input-relative paths.
    #[arg(long, conflicts_with = "in_place")]
    out_dir: Option<PathBuf>,

    /// Overwrite the input files.
    #[arg(long)]
    in_place: bool,

    /// With --in-place, copy each original to `<file><suffix>` first.
    #[arg(long)]
    backup_suffix: Option<String>,

    /// Migrate files in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (default: one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// JSON file with default settings; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print reports as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Files or directories (searched recursively).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Only consider this category.
    #[arg(long, value_enum)]
    category: Option<CategoryChoice>,

    /// Print reports as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct VersionsArgs {
    /// Print as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryChoice {
    Font,
    Imageset,
    Layout,
    Scheme,
}

impl From<CategoryChoice> for Category {
    fn from(c: CategoryChoice) -> Self {
        match c {
            CategoryChoice::Font => Category::Font,
            CategoryChoice::Imageset => Category::Imageset,
            CategoryChoice::Layout => Category::Layout,
            CategoryChoice::Scheme => Category::Scheme,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let registry = Registry::builtin();
    match cli.cmd {
        Command::Migrate(args) => cmd_migrate(&registry, args),
        Command::Detect(args) => cmd_detect(&registry, args),
        Command::Versions(args) => cmd_versions(&registry, args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &MigrateArgs) -> anyhow::Result<BatchConfig> {
    let mut cfg = match &args.config {
        Some(path) => BatchConfig::from_path(path)?,
        None => BatchConfig::default(),
    };

    if let Some(c) = args.category {
        cfg.category = Some(c.into());
    }
    if let Some(t) = &args.target {
        cfg.target = Some(t.clone());
    }
    if let Some(dir) = &args.out_dir {
        cfg.out_dir = Some(dir.clone());
        cfg.in_place = false;
    }
    if args.in_place {
        cfg.in_place = true;
        cfg.out_dir = None;
    }
    if let Some(suffix) = &args.backup_suffix {
        cfg.backup_suffix = Some(suffix.clone());
    }
    if args.parallel {
        cfg.parallel = true;
    }
    if let Some(n) = args.threads {
        cfg.threads = Some(n);
    }
    Ok(cfg)
}

fn cmd_migrate(registry: &Registry, args: MigrateArgs) -> anyhow::Result<()> {
    let opts = load_config(&args)?
        .into_opts()
        .context("invalid batch settings")?;
    let inputs = batch::collect_inputs(&args.inputs, opts.category, registry)?;
    if inputs.is_empty() {
        anyhow::bail!("no input files found");
    }

    let reports = batch::migrate_files(registry, &inputs, &opts)?;
    let summary = BatchSummary::from_reports(&reports);

    if args.json {
        let doc = serde_json::json!({ "files": reports, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for r in &reports {
            print_report(r);
        }
        eprintln!(
            "{} migrated, {} unchanged, {} failed, {} warning(s)",
            summary.migrated, summary.unchanged, summary.failed, summary.warnings
        );
    }

    if summary.has_failures() {
        anyhow::bail!("{} of {} file(s) failed", summary.failed, reports.len());
    }
    Ok(())
}

fn print_report(report: &FileReport) {
    let path = report.path.display();
    match &report.outcome {
        FileOutcome::Migrated {
            from,
            to,
            steps,
            written,
            ..
        } => {
            match written {
                Some(dest) => println!("migrated  {path} ({from} -> {to}) -> {}", dest.display()),
                None => println!("migrated  {path} ({from} -> {to})"),
            }
            for step in steps {
                for w in &step.warnings {
                    println!("    {} -> {}: {w}", step.source, step.target);
                }
            }
        }
        FileOutcome::Unchanged { version, .. } => println!("unchanged {path} ({version})"),
        FileOutcome::Failed { error } => println!("failed    {path}: {error}"),
    }
}

fn cmd_detect(registry: &Registry, args: DetectArgs) -> anyhow::Result<()> {
    let category = args.category.map(Category::from);
    let inputs = batch::collect_inputs(&args.inputs, category, registry)?;
    let reports = batch::detect_files(registry, &inputs, category);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for r in &reports {
            print_detection(r);
        }
    }

    let misses = reports.iter().filter(|r| r.version.is_none()).count();
    if misses > 0 {
        anyhow::bail!("{misses} of {} file(s) not recognized", reports.len());
    }
    Ok(())
}

fn print_detection(report: &DetectReport) {
    let path = report.path.display();
    match (&report.error, report.category, report.version) {
        (Some(error), _, _) => println!("{path}: {error}"),
        (None, Some(category), Some(version)) => println!("{path}: {category} '{version}'"),
        _ => println!("{path}: unrecognized"),
    }
}

fn cmd_versions(registry: &Registry, args: VersionsArgs) -> anyhow::Result<()> {
    if args.json {
        let doc: Vec<_> = registry
            .managers()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "category": m.category(),
                    "versions": m.versions(),
                    "latest": m.latest(),
                    "extensions": m.extensions(),
                    "steps": m
                        .layers()
                        .map(|l| serde_json::json!({ "from": l.source(), "to": l.target() }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&doc).context("serialize version table")?;
        println!("{text}");
        return Ok(());
    }

    for m in registry.managers() {
        println!("{}:", m.category());
        for v in m.versions() {
            let latest = if Some(*v) == m.latest() { " (latest)" } else { "" };
            println!("    {v}{latest}");
        }
        for l in m.layers() {
            println!("    step: {} -> {}", l.source(), l.target());
        }
    }
    Ok(())
}
