//! text2pdf – serve the PDF generation endpoint, or render a text file offline.
//!
//! Usage:
//!   text2pdf serve [--bind 0.0.0.0:8080] [--font path.ttf]
//!   text2pdf render <input.txt> [output.pdf] [--title "My Report"] [--font-size 12]
//!
//! If `output.pdf` is omitted the PDF is written next to the input file with
//! the same stem (e.g. `notes.txt` → `notes.pdf`).

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use text_to_pdf::config::{ServerConfig, DEFAULT_BIND, DEFAULT_MAX_BODY_BYTES};
use text_to_pdf::request::{DEFAULT_LINE_SPACING, DEFAULT_MARGIN_PT};
use text_to_pdf::{generate_pdf, server, Alignment, EmbeddedFont, GenerationRequest};

#[derive(Parser)]
#[command(name = "text2pdf", version, about = "Plain text to PDF generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (POST /generate).
    Serve(ServeArgs),
    /// Render a text file to PDF without starting a server.
    Render(RenderArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "TEXT2PDF_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// TTF/OTF font to embed instead of the bundled DejaVu Sans.
    #[arg(long, env = "TEXT2PDF_FONT")]
    font: Option<PathBuf>,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "TEXT2PDF_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,
}

#[derive(Args)]
struct RenderArgs {
    /// UTF-8 text file to convert.
    input: PathBuf,

    /// Output path (default: same stem as input with .pdf).
    output: Option<PathBuf>,

    /// Bold centred heading above the body.
    #[arg(long, short, default_value = "")]
    title: String,

    /// Body font size in points.
    #[arg(long, default_value_t = 12)]
    font_size: u32,

    #[arg(long, default_value_t = DEFAULT_MARGIN_PT)]
    margin_top: f32,

    #[arg(long, default_value_t = DEFAULT_MARGIN_PT)]
    margin_bottom: f32,

    #[arg(long, default_value_t = DEFAULT_MARGIN_PT)]
    margin_left: f32,

    #[arg(long, default_value_t = DEFAULT_MARGIN_PT)]
    margin_right: f32,

    /// Leading as a multiple of the font size.
    #[arg(long, default_value_t = DEFAULT_LINE_SPACING)]
    line_spacing: f32,

    /// LEFT, CENTER, RIGHT or JUSTIFIED (anything else means LEFT).
    #[arg(long, default_value = "LEFT")]
    alignment: String,

    /// TTF/OTF font to embed instead of the bundled DejaVu Sans.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also write the computed page layout as JSON.
    #[arg(long)]
    layout_json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Render(args) => run_render(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_font(path: Option<&Path>) -> text_to_pdf::Result<EmbeddedFont> {
    match path {
        Some(p) => EmbeddedFont::from_path(p),
        None => EmbeddedFont::bundled(),
    }
}

async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig {
        bind: args.bind,
        font_path: args.font,
        max_body_bytes: args.max_body_bytes,
    };
    // A broken font stops startup instead of failing every request.
    let font = load_font(config.font_path.as_deref())?;
    server::serve(config, font).await?;
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(&args.input)
        .map_err(|e| format!("reading '{}': {e}", args.input.display()))?;

    let request = GenerationRequest {
        title: args.title,
        content,
        font_size: args.font_size,
        margin_top: args.margin_top,
        margin_bottom: args.margin_bottom,
        margin_left: args.margin_left,
        margin_right: args.margin_right,
        line_spacing: args.line_spacing,
        alignment: Alignment::from_param(&args.alignment),
    };

    let font = load_font(args.font.as_deref())?;
    let (bytes, layout) = generate_pdf(&request, &font)?;

    // Default output: same directory + same stem as input, but with .pdf
    let output = args.output.unwrap_or_else(|| args.input.with_extension("pdf"));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&output, &bytes)
        .map_err(|e| format!("writing '{}': {e}", output.display()))?;

    if let Some(path) = &args.layout_json {
        fs::write(path, layout.to_json()?)
            .map_err(|e| format!("writing '{}': {e}", path.display()))?;
    }

    let pages = layout.page_count();
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        bytes.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
    Ok(())
}
