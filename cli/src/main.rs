//! pdf2blocks CLI - PDF to editor blocks

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2blocks::{
    sniff_pdf, BlockExtractor, BlockType, CommandLayoutEngine, ExtractOptions, JsonFormat,
    PageRasterizer, PopplerRasterizer, ProcessResult, StaticLayoutEngine,
};

#[derive(Parser)]
#[command(name = "pdf2blocks")]
#[command(author = "stacknote")]
#[command(version)]
#[command(about = "Turn PDFs into ordered editor blocks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract blocks from a PDF
    Process {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Layout analysis command; the PDF path is appended
        #[arg(long, env = "PDF2BLOCKS_LAYOUT_CMD", conflicts_with = "layout_json")]
        layout_cmd: Option<String>,

        /// Precomputed layout analysis JSON
        #[arg(long, value_name = "FILE")]
        layout_json: Option<PathBuf>,

        /// Directory receiving cropped images and tables
        #[arg(long, env = "PDF2BLOCKS_UPLOAD_DIR", default_value = "uploads")]
        upload_dir: PathBuf,

        /// Prefix of the image paths stored in blocks
        #[arg(long, default_value = "/uploads")]
        url_prefix: String,

        /// Crop resolution
        #[arg(long, default_value_t = 300.0)]
        dpi: f32,

        /// Only let successfully cropped regions suppress overlapping text
        #[arg(long)]
        cropped_only: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum OutputFormat {
    /// Block list as JSON
    Json,
    /// Markdown preview of the blocks
    #[value(alias = "md")]
    Markdown,
}

struct ProcessArgs {
    layout_cmd: Option<String>,
    layout_json: Option<PathBuf>,
    options: ExtractOptions,
    format: OutputFormat,
    compact: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            input,
            layout_cmd,
            layout_json,
            upload_dir,
            url_prefix,
            dpi,
            cropped_only,
            format,
            compact,
            output,
        } => {
            let mut options = ExtractOptions::new()
                .with_upload_dir(upload_dir)
                .with_url_prefix(url_prefix)
                .with_render_dpi(dpi);
            if cropped_only {
                options = options.cropped_regions_only();
            }
            let args = ProcessArgs {
                layout_cmd,
                layout_json,
                options,
                format,
                compact,
            };
            cmd_process(&input, args, output.as_deref())
        }
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_extractor(args: &ProcessArgs) -> Result<BlockExtractor, Box<dyn std::error::Error>> {
    let rasterizer = PopplerRasterizer::new();
    let options = args.options.clone();

    let extractor = match (&args.layout_json, &args.layout_cmd) {
        (Some(path), _) => {
            log::debug!("Using precomputed layout {}", path.display());
            BlockExtractor::new(StaticLayoutEngine::from_file(path)?, rasterizer)
        }
        (None, Some(command)) => {
            log::debug!("Using layout command `{}`", command);
            BlockExtractor::new(CommandLayoutEngine::from_command_line(command)?, rasterizer)
        }
        (None, None) => {
            return Err("no layout source: pass --layout-cmd or --layout-json".into());
        }
    };

    Ok(extractor.with_options(options))
}

fn render(
    result: &ProcessResult,
    format: OutputFormat,
    compact: bool,
) -> pdf2blocks::Result<String> {
    match format {
        OutputFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            pdf2blocks::to_json(result, json_format)
        }
        OutputFormat::Markdown => Ok(pdf2blocks::to_markdown(result)),
    }
}

fn cmd_process(
    input: &Path,
    args: ProcessArgs,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(&args)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Processing {}...", input.display()));

    let result = extractor.process(input);
    pb.finish_and_clear();
    let result = result?;

    log::info!(
        "{}: {} blocks from {} pages in {}",
        result.filename,
        result.blocks.len(),
        result.total_pages,
        result.processed_time
    );

    let rendered = render(&result, args.format, args.compact)?;

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!(
            "{} {} ({} blocks, {} images, {} tables in {})",
            "Saved to".green(),
            path.display(),
            result.blocks.len(),
            result.count(BlockType::Image),
            result.count(BlockType::Table),
            result.processed_time
        );
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let header = sniff_pdf(input)?;
    let document = PopplerRasterizer::new().open(input)?;

    let pages = (1..=document.page_count())
        .map(|page| document.page_dimensions(page))
        .collect::<pdf2blocks::Result<Vec<_>>>()?;

    if json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "version": header.version,
            "page_count": pages.len(),
            "pages": pages
                .iter()
                .map(|(w, h)| serde_json::json!({ "width": w, "height": h }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), header);
    println!("{}: {}", "Pages".bold(), pages.len());

    if let Some((width, height)) = pages.first() {
        println!("{}: {:.0} x {:.0} pt", "Page size".bold(), width, height);
    }
    let mixed = pages.windows(2).any(|w| w[0] != w[1]);
    if mixed {
        println!("{}: {}", "Mixed page sizes".bold(), "Yes".yellow());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2blocks".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to editor blocks");
    println!();
    println!("License: MIT");
}
