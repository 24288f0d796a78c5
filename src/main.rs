use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gluegen::publish::http::DEFAULT_ENDPOINT;
use gluegen::{
    compile, CloudFormationTemplate, CompileContext, CompiledTemplate, DryRunPublisher,
    HttpArtifactPublisher, ServiceConfig,
};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the bearer token for script uploads
const UPLOAD_TOKEN_ENV: &str = "GLUEGEN_UPLOAD_TOKEN";

/// Compile Glue jobs, connections and triggers into CloudFormation
#[derive(Parser, Debug)]
#[command(name = "gluegen", version, about, long_about = None)]
struct Args {
    /// Service configuration file
    #[arg(short, long, default_value = "serverless.yml")]
    config: PathBuf,

    /// Existing CloudFormation template to merge into
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Write the template here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Service name (overrides `service` in the config file)
    #[arg(long)]
    service: Option<String>,

    /// Deployment stage (overrides `provider.stage`)
    #[arg(long)]
    stage: Option<String>,

    /// S3-compatible endpoint scripts are uploaded to
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Resolve script locations without uploading
    #[arg(long)]
    dry_run: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log to a file instead of stderr (default location when no path is given)
    #[arg(long, num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.as_str().to_lowercase()));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return Ok(None);
    };

    let path = path.as_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gluegen started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", path);

    Ok(Some(guard))
}

/// Log location when `--log-file` is given without a path
fn default_log_path() -> PathBuf {
    if let Some(cache_dir) = dirs::cache_dir() {
        return cache_dir.join("gluegen").join("gluegen.log");
    }
    PathBuf::from("gluegen.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(
        args.log_level,
        args.log_file
            .clone()
            .map(|path| path.unwrap_or_else(default_log_path)),
    )?;

    let config = ServiceConfig::load(&args.config)?;
    let glue = config.glue()?;

    let service = args
        .service
        .clone()
        .or_else(|| config.service.clone())
        .context("No service name configured. Set `service` in the config file or use --service")?;
    let stage = config.effective_stage(args.stage.as_deref());

    let ctx = CompileContext {
        service,
        stage,
        account_id: config.custom.account_id.clone(),
        script_root: args
            .config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let mut template = match &args.template {
        Some(path) => CloudFormationTemplate::load(path)?,
        None => CloudFormationTemplate::default(),
    };

    tracing::info!("Compiling Glue resources for {}-{}", ctx.service, ctx.stage);

    let compiled: CompiledTemplate = if args.dry_run {
        compile(glue, &ctx, &DryRunPublisher).await?
    } else {
        let token = std::env::var(UPLOAD_TOKEN_ENV).ok();
        let publisher = HttpArtifactPublisher::new(&args.endpoint, token)?;
        compile(glue, &ctx, &publisher).await?
    };

    compiled.write_to(&mut template);

    let json = template.to_pretty_json()?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write template {}", path.display()))?,
        None => println!("{}", json),
    }

    tracing::info!(
        "Wrote {} resources and {} outputs",
        compiled.resources.len(),
        compiled.outputs.len()
    );
    Ok(())
}
