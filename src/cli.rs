use crate::{
    assemble::ReportAssembler,
    chart::ChartGeometryBuilder,
    config::Config,
    model::{load_assessment, load_catalog, load_narrative},
    narrative::RecommendationParser,
    render::{JsonRenderer, OutlineRenderer, Renderer},
    scoring::ScoreAggregator,
    util::{ensure_dir, now_rfc3339, sha256_hex},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "report-compiler")]
#[command(about = "Deterministic assessment report compiler (scores + chart + recommendations)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./report-compiler.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Json,
    Outline,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration.
    Config {},
    Scores {
        #[arg(long)]
        assessment: PathBuf,
        #[arg(long)]
        questions: PathBuf,
    },
    Chart {
        #[arg(long)]
        assessment: PathBuf,
        #[arg(long)]
        questions: PathBuf,
    },
    Parse {
        #[arg(long)]
        narrative: PathBuf,
    },
    Compile {
        #[arg(long)]
        assessment: PathBuf,
        #[arg(long)]
        questions: PathBuf,
        #[arg(long)]
        narrative: PathBuf,
        /// Output directory; defaults to `output.out_dir` from the config.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Print the rendered document instead of writing files.
        #[arg(long)]
        stdout: bool,
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg).as_deref())?;

    match &args.cmd {
        Command::Config {} => {
            println!("{}", toml::to_string(&cfg)?);
            Ok(())
        }
        Command::Scores {
            assessment,
            questions,
        } => scores(&cfg, assessment, questions),
        Command::Chart {
            assessment,
            questions,
        } => chart(&cfg, assessment, questions),
        Command::Parse { narrative } => parse(&cfg, narrative),
        Command::Compile {
            assessment,
            questions,
            narrative,
            out_dir,
            stdout,
            format,
        } => {
            let target = resolve_out_dir(&cfg, out_dir.as_deref(), *stdout);
            compile(&cfg, assessment, questions, narrative, target.as_deref(), *format)
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["report-compiler.toml", "report-compiler.example.toml"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Where `compile` writes its files; `None` means print to stdout.
pub fn resolve_out_dir(cfg: &Config, user: Option<&Path>, stdout: bool) -> Option<PathBuf> {
    if stdout {
        return None;
    }
    Some(user.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(&cfg.output.out_dir)))
}

fn init_logging(
    args: &Args,
    cfg: &Config,
    file_path: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output, so log lines go to stderr
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from(&cfg.output.out_dir).join("report-compiler.log"))
}

fn scores(cfg: &Config, assessment: &Path, questions: &Path) -> Result<()> {
    let assessment = load_assessment(cfg, assessment)?;
    let catalog = load_catalog(cfg, questions)?;
    let scores = ScoreAggregator::new(cfg).aggregate(&assessment, &catalog);
    println!("{}", serde_json::to_string_pretty(&scores)?);
    Ok(())
}

fn chart(cfg: &Config, assessment: &Path, questions: &Path) -> Result<()> {
    let assessment = load_assessment(cfg, assessment)?;
    let catalog = load_catalog(cfg, questions)?;
    let scores = ScoreAggregator::new(cfg).aggregate(&assessment, &catalog);
    let geometry = ChartGeometryBuilder::new(&cfg.chart)?.build(&scores)?;
    println!("{}", serde_json::to_string_pretty(&geometry)?);
    Ok(())
}

fn parse(cfg: &Config, narrative: &Path) -> Result<()> {
    let text = load_narrative(cfg, narrative)?.into_text();
    let sections = RecommendationParser::new(&cfg.narrative)?.parse(&text);
    println!("{}", serde_json::to_string_pretty(&sections)?);
    Ok(())
}

fn compile(
    cfg: &Config,
    assessment: &Path,
    questions: &Path,
    narrative: &Path,
    out_dir: Option<&Path>,
    format: Format,
) -> Result<()> {
    // Construction validates the config before any input is read.
    let assembler = ReportAssembler::new(cfg)?;

    let assessment = load_assessment(cfg, assessment)?;
    let catalog = load_catalog(cfg, questions)?;
    let narrative = load_narrative(cfg, narrative)?;

    let doc = assembler
        .compile(&assessment, narrative, &catalog)
        .with_context(|| format!("compiling report for assessment {}", assessment.id))?;

    let rendered = match format {
        Format::Json => JsonRenderer {
            pretty: cfg.output.pretty_json,
        }
        .render(&doc)?,
        Format::Outline => OutlineRenderer.render(&doc)?,
    };

    let Some(out_dir) = out_dir else {
        println!("{rendered}");
        return Ok(());
    };

    ensure_dir(out_dir)?;
    let doc_path = out_dir.join(&cfg.output.document_filename);
    std::fs::write(&doc_path, &rendered)
        .with_context(|| format!("writing {}", doc_path.display()))?;
    info!("wrote {}", doc_path.display());

    if cfg.output.write_index_json {
        let index = serde_json::json!({
            "assessment_id": assessment.id,
            "generated": now_rfc3339(),
            "total_pages": doc.total_pages,
            "document": cfg.output.document_filename,
            "document_fingerprint": doc.fingerprint()?,
            "config_hash": sha256_hex(cfg.normalized_for_hash().as_bytes()),
        });
        std::fs::write(out_dir.join("index.json"), serde_json::to_string_pretty(&index)?)?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "assessment_id": assessment.id,
            "out_dir": out_dir,
            "total_pages": doc.total_pages,
            "status": "ok"
        }))?
    );
    Ok(())
}
