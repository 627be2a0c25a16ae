use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use indicatif::{ProgressBar, ProgressStyle};
use png2svg_core::{
    ConvertOptions, Document, InputImage, convert, convert_batch, convert_with_progress, svg,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "png2svg",
    about = "Convert PNG images into SVG documents made of solid rectangles",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(long, default_value_t = false, global = true, help_heading = "Logging/UX")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a PNG file, or every PNG below a directory
    Convert(ConvertArgs),
    /// Convert one image in greedy and single-pixel mode and print rect counts + timing
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct ConvertArgs {
    // Input/Output
    /// Input PNG file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file (single input) or directory (directory input)
    #[arg(short, long, help_heading = "Input/Output")]
    output: Option<PathBuf>,
    /// Output document: svg | json
    #[arg(long, value_parser = ["svg", "json"], default_value = "svg", help_heading = "Input/Output")]
    format: String,
    /// YAML config file path (overrides conversion flags)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob) for directory input
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob) for directory input
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Conversion
    /// Use only single pixel rectangles
    #[arg(short = 'p', long, default_value_t = false, conflicts_with = "pink", help_heading = "Conversion")]
    single_pixel: bool,
    /// Color expanded rectangles pink (debug)
    #[arg(short = 'c', long, default_value_t = false, help_heading = "Conversion")]
    pink: bool,
    /// Limit colors to a maximum of 4096 (#abcdef -> #ace)
    #[arg(short = 'l', long, default_value_t = false, help_heading = "Conversion")]
    limit: bool,
    /// Deprecated (same as -l)
    #[arg(short = 'q', long = "quantize", default_value_t = false, hide = true)]
    quantize: bool,
    /// Deprecated (same as -l)
    #[arg(short = 'z', long = "color-optimize", default_value_t = false, hide = true)]
    color_optimize: bool,

    // Export
    /// Export conversion stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged options (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: convert and report stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Input PNG file
    input: PathBuf,
    /// Limit colors to 4096 in both runs
    #[arg(short = 'l', long, default_value_t = false)]
    limit: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Convert(args) => run_convert(args, cli.progress && !cli.quiet),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_convert(cli: &ConvertArgs, show_progress: bool) -> anyhow::Result<()> {
    let flags = ConvertOptions::builder()
        .single_pixel_mode(cli.single_pixel)
        .pink_debug_color(cli.pink)
        .quantize_colors(cli.limit || cli.quantize || cli.color_optimize)
        .build();
    if cli.quantize || cli.color_optimize {
        warn!("-q and -z are deprecated, use -l");
    }

    // Config file keys override flags
    let opts = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_options(flags)
    } else {
        flags
    };
    opts.validate()?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&opts)?),
            _ => println!("{}", serde_json::to_string_pretty(&opts)?),
        }
        return Ok(());
    }

    let meta = fs::metadata(&cli.input)
        .with_context(|| format!("stat {}", cli.input.display()))?;
    if meta.is_dir() {
        run_convert_dir(cli, &opts, show_progress)
    } else {
        run_convert_file(cli, &opts, show_progress)
    }
}

fn run_convert_file(cli: &ConvertArgs, opts: &ConvertOptions, show_progress: bool) -> anyhow::Result<()> {
    let img = load_image(&cli.input).with_context(|| format!("load {}", cli.input.display()))?;

    let bar = if show_progress {
        let b = ProgressBar::new(img.height() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} placing rectangles {percent:>3}% [{elapsed_precise}]",
        )?);
        Some(b)
    } else {
        None
    };
    let start = Instant::now();
    let doc = convert_with_progress(&img, opts, |y, _| {
        if let Some(b) = &bar {
            b.set_position(y as u64);
        }
    })?;
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    let elapsed = start.elapsed();

    let out_path = single_output_path(&cli.input, cli.output.as_deref(), &cli.format);
    let stats = doc.stats();
    info!(
        rects = stats.num_rects,
        merged = stats.merged_rects,
        colors = stats.distinct_colors,
        time = fmt_dur(elapsed),
        "converted"
    );
    if !cli.dry_run {
        write_document(&doc, &out_path, &cli.format)?;
        info!(?out_path, "written");
    } else {
        println!("{}", stats.summary());
    }

    if let Some(stats_path) = &cli.export_stats {
        let value = png2svg_core::stats_json(&stats);
        write_stats(stats_path, &value, cli.dry_run)?;
    }
    Ok(())
}

/// Images decoded and held in memory at once during directory conversion.
#[cfg(feature = "parallel")]
const CONVERT_CHUNK: usize = 8;
#[cfg(not(feature = "parallel"))]
const CONVERT_CHUNK: usize = 1;

/// Converts every PNG below `cli.input`, `CONVERT_CHUNK` files at a time.
/// Each chunk is loaded, converted, written and dropped before the next one.
fn run_convert_dir(cli: &ConvertArgs, opts: &ConvertOptions, show_progress: bool) -> anyhow::Result<()> {
    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    info!(count = paths.len(), "found input images");

    let bar = if show_progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} converting {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };

    let out_dir = cli.output.clone().unwrap_or_else(|| cli.input.clone());
    let ext = extension_for(&cli.format);
    let mut failures = 0;
    let mut per_file = Vec::new();
    for chunk in paths.chunks(CONVERT_CHUNK) {
        let (inputs, load_failures) = load_images(&cli.input, chunk);
        failures += load_failures;
        if let Some(b) = &bar {
            b.set_message(inputs.first().map(|i| i.key.clone()).unwrap_or_default());
        }
        for item in convert_batch(inputs, opts) {
            let doc = match item.result {
                Ok(doc) => doc,
                Err(e) => {
                    error!(key = %item.key, error = %e, "conversion failed");
                    failures += 1;
                    continue;
                }
            };
            let out_path = out_dir.join(&item.key).with_extension(ext);
            let stats = doc.stats();
            info!(file = %item.key, rects = stats.num_rects, "converted");
            if !cli.dry_run {
                if let Err(e) = write_document(&doc, &out_path, &cli.format) {
                    error!(?out_path, error = %e, "write failed");
                    failures += 1;
                    continue;
                }
            }
            let mut value = png2svg_core::stats_json(&stats);
            value["file"] = serde_json::Value::String(item.key);
            per_file.push(value);
        }
        if let Some(b) = &bar {
            b.inc(chunk.len() as u64);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }

    if let Some(stats_path) = &cli.export_stats {
        let value = serde_json::json!({ "files": per_file, "failures": failures });
        write_stats(stats_path, &value, cli.dry_run)?;
    }
    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, paths.len());
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let img = load_image(&b.input).with_context(|| format!("load {}", b.input.display()))?;
    let greedy = ConvertOptions::builder().quantize_colors(b.limit).build();
    let single = ConvertOptions::builder()
        .single_pixel_mode(true)
        .quantize_colors(b.limit)
        .build();
    for (name, opts) in [("greedy", greedy), ("single", single)] {
        let start = Instant::now();
        let doc = convert(&img, &opts)?;
        let dur = start.elapsed();
        let svg_len = svg::to_svg_string(&doc).len();
        println!(
            "{} rects={} svg_bytes={} time={}",
            name,
            doc.rects.len(),
            svg_len,
            fmt_dur(dur)
        );
    }
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn extension_for(format: &str) -> &'static str {
    match format {
        "json" => "json",
        _ => "svg",
    }
}

/// Output path for a single input: `-o` as given, `-o <dir>/<stem>.<ext>` if it
/// names an existing directory, else the input path with the new extension.
fn single_output_path(input: &Path, output: Option<&Path>, format: &str) -> PathBuf {
    let ext = extension_for(format);
    match output {
        Some(o) if o.is_dir() => {
            let stem = input.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
            o.join(stem).with_extension(ext)
        }
        Some(o) => o.to_path_buf(),
        None => input.with_extension(ext),
    }
}

fn write_document(doc: &Document, path: &Path, format: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    match format {
        "json" => png2svg_core::write_json(doc, path)
            .with_context(|| format!("write {}", path.display()))?,
        _ => svg::write_svg(doc, path).with_context(|| format!("write {}", path.display()))?,
    }
    Ok(())
}

fn write_stats(path: &Path, value: &serde_json::Value, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    }
    fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("write {}", path.display()))?;
    info!(?path, "stats exported");
    Ok(())
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

fn gather_paths(path: &Path, include: &[String], exclude: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let p = entry.path();
        if p.is_file() && is_png(p) && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) {
            list.push(p.to_path_buf());
        }
    }
    Ok(list)
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_png(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Loads `paths`; keys are paths relative to `root` with `/` separators.
/// Unreadable files are logged and counted, not fatal.
fn load_images(root: &Path, paths: &[PathBuf]) -> (Vec<InputImage>, usize) {
    let mut list = Vec::with_capacity(paths.len());
    let mut failures = 0;
    for p in paths {
        match load_image(p) {
            Ok(img) => list.push(InputImage {
                key: relative_key(root, p),
                image: img,
            }),
            Err(e) => {
                error!(?p, error = %e, "skip image");
                failures += 1;
            }
        }
    }
    (list, failures)
}

fn relative_key(root: &Path, p: &Path) -> String {
    let rel = p.strip_prefix(root).unwrap_or(p);
    rel.to_string_lossy().replace('\\', "/")
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    single_pixel_mode: Option<bool>,
    quantize_colors: Option<bool>,
    /// Alias of `quantize_colors`, matching the `-l` flag.
    limit: Option<bool>,
    pink_debug_color: Option<bool>,
}

impl YamlConfig {
    fn into_options(self, mut opts: ConvertOptions) -> ConvertOptions {
        if let Some(v) = self.single_pixel_mode {
            opts.single_pixel_mode = v;
        }
        if let Some(v) = self.quantize_colors.or(self.limit) {
            opts.quantize_colors = v;
        }
        if let Some(v) = self.pink_debug_color {
            opts.pink_debug_color = v;
        }
        opts
    }
}
