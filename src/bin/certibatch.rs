use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "certibatch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one certificate per row and write them to a ZIP archive.
    Generate(GenerateArgs),
    /// Render a single certificate with sample text to check placement.
    Preview(PreviewArgs),
    /// List the columns of a CSV file and mark the auto-selected name column.
    Columns(ColumnsArgs),
}

#[derive(Args, Debug, Default)]
struct PlacementArgs {
    /// Job file (JSON). Flags given on the command line override its values.
    #[arg(long)]
    job: Option<PathBuf>,

    /// Template image (PNG, JPEG, ...).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Font file (TTF/OTF) used to draw names.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Text center in preview pixels, as `X,Y`. Defaults to the preview center.
    #[arg(long, value_parser = parse_anchor)]
    anchor: Option<certibatch::AnchorPoint>,

    /// Width the preview was shown at; wider templates are scaled down to it.
    #[arg(long)]
    preview_width: Option<u32>,

    /// Font size in preview pixels.
    #[arg(long)]
    font_size: Option<f64>,

    /// Text color (`#RRGGBB`).
    #[arg(long)]
    color: Option<String>,

    /// Font family to draw with, looked up among installed fonts; falls back to the font file.
    #[arg(long)]
    family: Option<String>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    placement: PlacementArgs,

    /// Name table (CSV with a header row).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Column holding the names. Auto-selected when omitted.
    #[arg(long)]
    column: Option<String>,

    /// Directory the archive is written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    placement: PlacementArgs,

    /// Sample text to draw.
    #[arg(long, default_value = certibatch::PREVIEW_SAMPLE_TEXT)]
    text: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ColumnsArgs {
    /// Name table (CSV with a header row).
    #[arg(long)]
    data: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Columns(args) => cmd_columns(args),
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("certibatch=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_anchor(s: &str) -> Result<certibatch::AnchorPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y (got \"{s}\")"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("anchor x: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("anchor y: {e}"))?;
    Ok(certibatch::AnchorPoint::new(x, y))
}

/// Job file (if any) with command-line flags layered on top.
fn merged_job(placement: &PlacementArgs) -> anyhow::Result<certibatch::JobFile> {
    let mut job = match &placement.job {
        Some(path) => certibatch::JobFile::from_path(path)?,
        None => certibatch::JobFile::default(),
    };
    if let Some(p) = &placement.template {
        job.template = Some(p.clone());
    }
    if let Some(p) = &placement.font {
        job.font = Some(p.clone());
    }
    if let Some(a) = placement.anchor {
        job.anchor = Some(a);
    }
    if let Some(s) = placement.font_size {
        job.style.font_size = s;
    }
    if let Some(c) = &placement.color {
        job.style.color_hex = c.clone();
    }
    if let Some(f) = &placement.family {
        job.style.font_family = f.clone();
    }
    Ok(job)
}

fn apply_preview_width(
    inputs: &mut certibatch::RunInputs,
    preview_width: Option<u32>,
) -> anyhow::Result<()> {
    if let (Some(width), Some(template)) = (preview_width, &inputs.template) {
        inputs.preview = Some(certibatch::PreviewGeometry::fit(
            template.native_width(),
            template.native_height(),
            width,
        )?);
    }
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut job = merged_job(&args.placement)?;
    if let Some(p) = args.data {
        job.data = Some(p);
    }
    if let Some(c) = args.column {
        job.column = Some(c);
    }
    if let Some(d) = args.out_dir {
        job.out_dir = Some(d);
    }

    let mut inputs = job.load_inputs()?;
    apply_preview_width(&mut inputs, args.placement.preview_width)?;
    let config = certibatch::RunConfig::new(inputs)?;

    let out_dir = job.out_dir.unwrap_or_else(|| PathBuf::from("."));
    let mut reporter = BarReporter::new()?;
    let cancel = certibatch::CancelToken::new();
    let out = certibatch::generate_archive(&config, &out_dir, &mut reporter, &cancel)?;

    eprintln!(
        "rendered {} of {} rows ({} skipped, {} failed)",
        out.stats.rendered, out.stats.total_rows, out.stats.skipped, out.stats.failed
    );
    eprintln!("wrote {}", out.archive_path.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let job = merged_job(&args.placement)?;
    let mut inputs = job.load_inputs()?;
    apply_preview_width(&mut inputs, args.placement.preview_width)?;

    let template = inputs
        .template
        .context("no template image given (--template or job file)")?;
    let font = inputs
        .font
        .context("no font given (--font or job file)")?;
    let png = certibatch::render_preview(
        &template,
        &font,
        inputs.anchor,
        inputs.preview,
        &inputs.style,
        &args.text,
    )?;

    write_output(&args.out, &png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_columns(args: ColumnsArgs) -> anyhow::Result<()> {
    let table = certibatch::Table::from_path(&args.data)?;
    let selected = certibatch::select_name_column(table.columns());
    for col in table.columns() {
        let marker = if Some(col.as_str()) == selected { "*" } else { " " };
        println!("{marker} {col}");
    }
    eprintln!("{} rows", table.len());
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))
}

struct BarReporter {
    bar: indicatif::ProgressBar,
}

impl BarReporter {
    fn new() -> anyhow::Result<Self> {
        let bar = indicatif::ProgressBar::new(0);
        bar.set_style(
            indicatif::ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}",
            )
            .context("progress bar template")?
            .progress_chars("=> "),
        );
        Ok(Self { bar })
    }
}

impl certibatch::ProgressReporter for BarReporter {
    fn report(&mut self, progress: certibatch::Progress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.current as u64);
        match progress.phase {
            certibatch::Phase::Done => self.bar.finish_with_message("Done"),
            phase => self.bar.set_message(phase.as_str()),
        }
    }
}
