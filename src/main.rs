use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use glint::api;
use glint::models::{AppConfig, IncomingFile, QuantizerOptions, Tint};
use glint::server;
use glint::services::{
    ExportService, ExternalQuantizer, PaletteQuantizer, PreviewSession, RenderEvent,
    SessionStatus,
};

#[derive(Parser)]
#[command(name = "glint")]
#[command(about = "Image preview with procedural glint effects")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render an image with the effect applied and write the composite PNG
    Render {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path (default: <stem>-glint.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Effect strength, 0..1
        #[arg(long)]
        intensity: Option<f32>,

        /// Grain amount, 0..1
        #[arg(long)]
        grain: Option<f32>,

        /// Gradient tint as hex color (e.g. "#ff4fd8")
        #[arg(long)]
        tint: Option<Tint>,

        /// Animation seed for the sparkle layer
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Run the external quantizer on an image
    Quantize {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (default: quantizer's file name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Quantizer executable (overrides the configured binary)
        #[arg(long)]
        binary: Option<PathBuf>,

        /// Extra quantizer options as comma-separated key=value pairs
        #[arg(long)]
        extra: Option<String>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Glint API",
        description = "Image preview with procedural glint effects",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_upload,
        api::handle_list,
        api::handle_remove_all,
        api::handle_select,
        api::handle_get_params,
        api::handle_update_params,
        api::handle_refresh,
        api::handle_preview,
        api::handle_status,
        api::handle_events,
        api::handle_export_composite,
        api::handle_export_original,
        api::handle_quantize,
        api::handle_quantize_batch,
    ),
    components(schemas(
        api::IngestResponse,
        api::ImageListResponse,
        api::RemoveAllResponse,
        api::SelectRequest,
        api::SelectResponse,
        api::ParamsPatch,
        api::ParamsResponse,
        api::RefreshResponse,
        glint::models::EffectParameters,
        glint::models::ImageSummary,
        QuantizerOptions,
        RenderEvent,
        SessionStatus,
    )),
    tags(
        (name = "Images", description = "Upload, listing and selection"),
        (name = "Effects", description = "Effect parameters and refresh"),
        (name = "Preview", description = "Preview surface and render events"),
        (name = "Export", description = "Composite and original downloads"),
        (name = "Quantize", description = "External palette quantization")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            intensity,
            grain,
            tint,
            seed,
        }) => run_render_command(&input, output, intensity, grain, tint, seed).await,
        Some(Commands::Quantize {
            input,
            output,
            binary,
            extra,
        }) => run_quantize_command(&input, output, binary, extra).await,
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glint=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn load_config() -> AppConfig {
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    AppConfig::load(config_file.as_deref())
}

fn read_input(input: &Path) -> anyhow::Result<IncomingFile> {
    let bytes = std::fs::read(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let mime_type = IncomingFile::guess_mime(&name);
    Ok(IncomingFile::new(name, mime_type, bytes))
}

/// Render an image directly to a PNG file (no server needed)
async fn run_render_command(
    input: &Path,
    output: Option<PathBuf>,
    intensity: Option<f32>,
    grain: Option<f32>,
    tint: Option<Tint>,
    seed: u64,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let mut config = load_config();
    if let Some(v) = intensity {
        config.effects.set_intensity(v);
    }
    if let Some(v) = grain {
        config.effects.set_grain(v);
    }
    if let Some(Tint(rgb)) = tint {
        config.effects.set_tint(rgb);
    }

    let session = PreviewSession::new(&config);
    let export = ExportService::new(&config.export);
    session.set_seed(seed).await;

    let (_, render) = session.ingest(vec![read_input(input)?]).await;
    let event = match render {
        Some(render) => render.wait().await,
        None => anyhow::bail!("No render was scheduled"),
    };
    match &event {
        RenderEvent::Committed { .. } => {}
        RenderEvent::DecodeFailed { error, .. } => {
            anyhow::bail!("Failed to decode {}: {error}", input.display())
        }
        other => anyhow::bail!("Render did not complete: {other:?}"),
    }

    let download = export
        .export_composite(&session)
        .await
        .ok_or_else(|| anyhow::anyhow!("Failed to encode composite"))?;
    let output = output.unwrap_or_else(|| input.with_file_name(&download.file_name));
    std::fs::write(&output, &download.bytes)?;

    let params = session.params().await;
    let info = session.surface_info().await;
    println!(
        "Rendered {} ({}x{}, intensity {:.2}, grain {:.2}, tint {}, seed {})",
        output.display(),
        info.width,
        info.height,
        params.intensity,
        params.grain,
        params.tint,
        seed
    );
    println!("  Size: {} bytes", download.bytes.len());

    session.shutdown().await;
    Ok(())
}

/// Run the external quantizer on one file
async fn run_quantize_command(
    input: &Path,
    output: Option<PathBuf>,
    binary: Option<PathBuf>,
    extra: Option<String>,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = load_config();
    let binary = binary
        .or(config.quantizer.binary.clone())
        .ok_or_else(|| anyhow::anyhow!("No quantizer binary configured (use --binary)"))?;

    let mut options = config.quantizer.options.clone();
    if let Some(extra) = extra {
        options.extra.extend(QuantizerOptions::parse_extra(&extra));
    }

    let file = read_input(input)?;
    let quantized = ExternalQuantizer::new(binary)
        .quantize(&file.bytes, &file.name, &options)
        .await?;

    let output = output.unwrap_or_else(|| PathBuf::from(&quantized.file_name));
    std::fs::write(&output, &quantized.bytes)?;

    println!("Quantized {} -> {}", input.display(), output.display());
    println!("  Format: {}", options.output);
    println!("  Size: {} bytes", quantized.bytes.len());

    Ok(())
}

/// Print configuration and usage
fn run_status_command() {
    let config_file = std::env::var("CONFIG_FILE").ok();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = AppConfig::load(config_file.as_deref().map(Path::new));

    println!("Glint - image preview with procedural glint effects");
    println!();
    println!("Configuration:");
    println!(
        "  CONFIG_FILE:    {}",
        config_file.as_deref().unwrap_or("(defaults)")
    );
    println!("  BIND_ADDR:      {bind_addr}");
    println!("  max width:      {}", config.preview.max_width);
    match config.registry.max_images {
        Some(max) => println!("  max images:     {max}"),
        None => println!("  max images:     unlimited"),
    }
    println!(
        "  effects:        intensity {:.2}, grain {:.2}, tint {}",
        config.effects.intensity, config.effects.grain, config.effects.tint
    );
    println!("  optimize PNGs:  {}", config.export.optimize);
    match &config.quantizer.binary {
        Some(binary) => println!("  quantizer:      {}", binary.display()),
        None => println!("  quantizer:      (not configured)"),
    }
    println!("  batch size:     {}", config.quantizer.max_batch);
    println!();
    println!("Commands:");
    println!("  glint serve                          Start the HTTP server");
    println!("  glint render -i <image> [-o <png>]   Render a composite to a file");
    println!("  glint quantize -i <image>            Run the external quantizer");
    println!();
    println!("Run 'glint --help' for all options.");
}

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glint=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = load_config();

    let state = server::create_app_state(config);
    let session = state.session.clone();

    // Build router: shared API routes plus the documentation UI
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Glint server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(%e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
