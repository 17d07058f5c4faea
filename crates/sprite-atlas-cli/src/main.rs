use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use serde::Deserialize;
use sprite_atlas_core::{
    Heuristic, InputImage, PackingConfig, SpriteAtlas, pack_layout, to_json_hash,
};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-atlas",
    about = "Pack UI sprites into a texture atlas",
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
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images into an atlas (PNG + JSON)
    Pack(PackArgs),
    /// Compute placements only and print/export them as JSON
    Layout(PackArgs),
    /// Load a frame list packed by another tool into an atlas JSON
    Import(ImportArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name (files will be name.png/.json)
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (its fields override the packing options below)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Previous atlas JSON (registry format) whose borders and deletions carry forward
    #[arg(long, help_heading = "Input/Output")]
    existing: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Packing
    /// Pixels of gutter after each sprite
    #[arg(long, default_value_t = 2, help_heading = "Packing")]
    padding: u32,
    /// Maximum atlas size: 256|512|1024|2048|4096
    #[arg(long, default_value_t = 4096, help_heading = "Packing")]
    max_size: u32,
    /// Keep the atlas square
    #[arg(long, default_value_t = false, help_heading = "Packing")]
    force_square: bool,
    /// Heuristic: baf|bssf|blsf|bl|cp
    #[arg(long, default_value = "baf", help_heading = "Packing")]
    heuristic: String,
    /// Replicate sprite edges into the padding gutter
    #[arg(long, default_value_t = false, help_heading = "Packing")]
    extrude: bool,

    // Export
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct ImportArgs {
    /// JSON frame list exported by another packer
    input: PathBuf,
    /// Texture width, when the JSON has no meta.size
    #[arg(long)]
    width: Option<u32>,
    /// Texture height, when the JSON has no meta.size
    #[arg(long)]
    height: Option<u32>,
    /// Existing atlas JSON to merge into (borders are kept)
    #[arg(long)]
    existing: Option<PathBuf>,
    /// Output atlas JSON
    #[arg(short, long, default_value = "atlas.json")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Layout(args) => run_layout(args),
        Commands::Import(args) => run_import(args),
    }
}

fn build_config(cli: &PackArgs) -> anyhow::Result<PackingConfig> {
    let heuristic: Heuristic = cli.heuristic.parse()?;
    let mut cfg = PackingConfig {
        padding: cli.padding,
        max_atlas_size: cli.max_size,
        force_square: cli.force_square,
        heuristic,
        extrude_edges: cli.extrude,
        ..Default::default()
    };
    if let Some(path) = &cli.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_packing_config(cfg)?;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;
    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let mut atlas = match &cli.existing {
        Some(path) => {
            let json =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            SpriteAtlas::from_json(&json)?
        }
        None => SpriteAtlas::default(),
    };

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let inputs = load_images_with_progress(&cli.input, &paths, show_progress)?;
    info!(count = inputs.len(), "loaded input images");

    let (texture, stats) = atlas.rebuild(&inputs, &cfg)?;
    info!(
        width = atlas.width,
        height = atlas.height,
        sprites = atlas.len(),
        "atlas packed"
    );

    if !cli.dry_run {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
        let png_path = cli.out_dir.join(format!("{}.png", cli.name));
        if atlas.is_empty() {
            warn!(?png_path, "atlas is empty, texture not written");
        } else {
            texture
                .save(&png_path)
                .with_context(|| format!("write {}", png_path.display()))?;
        }
        let json_path = cli.out_dir.join(format!("{}.json", cli.name));
        fs::write(&json_path, serde_json::to_string_pretty(&atlas)?)
            .with_context(|| format!("write {}", json_path.display()))?;
        let hash_path = cli.out_dir.join(format!("{}.frames.json", cli.name));
        fs::write(&hash_path, serde_json::to_string_pretty(&to_json_hash(&atlas))?)
            .with_context(|| format!("write {}", hash_path.display()))?;
        info!(?png_path, ?json_path, ?hash_path, "atlas written");
    }

    if let Some(stats_path) = &cli.export_stats {
        if !cli.dry_run {
            let value = serde_json::json!({
                "width": atlas.width,
                "height": atlas.height,
                "stats": stats,
                "wasted_area": stats.wasted_area(),
            });
            fs::write(stats_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("size={}x{} {}", atlas.width, atlas.height, stats.summary());
        }
    }
    Ok(())
}

fn run_layout(cli: &PackArgs) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;
    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let mut sizes: Vec<(String, u32, u32)> = Vec::with_capacity(paths.len());
    for p in &paths {
        match image::image_dimensions(p) {
            Ok((w, h)) => sizes.push((sprite_key(&cli.input, p), w, h)),
            Err(e) => error!(?p, error = %e, "skip image"),
        }
    }
    let layout = pack_layout(sizes, &cfg)?;
    let placements: Vec<serde_json::Value> = layout
        .placements
        .iter()
        .map(|p| {
            serde_json::json!({
                "name": p.name,
                "frame": p.frame,
                "slot": p.slot,
                "uv": p.uv,
            })
        })
        .collect();
    let value = serde_json::json!({
        "width": layout.width,
        "height": layout.height,
        "padding": layout.padding,
        "placements": placements,
        "stats": layout.stats,
    });
    let text = serde_json::to_string_pretty(&value)?;
    if cli.dry_run {
        println!("{text}");
    } else {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
        let json_path = cli.out_dir.join(format!("{}.layout.json", cli.name));
        fs::write(&json_path, text).with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, sprites = layout.placements.len(), "layout written");
    }
    Ok(())
}

fn run_import(args: &ImportArgs) -> anyhow::Result<()> {
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let mut atlas = match &args.existing {
        Some(path) => {
            let prev =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            SpriteAtlas::from_json(&prev)?
        }
        None => SpriteAtlas::default(),
    };
    let size = match (args.width, args.height) {
        (Some(w), Some(h)) => Some((w, h)),
        (None, None) => None,
        _ => anyhow::bail!("--width and --height must be given together"),
    };
    let report = atlas.import_frames(&json, size)?;
    for (name, e) in &report.skipped {
        warn!(%name, error = %e, "skipped");
    }
    fs::write(&args.out, serde_json::to_string_pretty(&atlas)?)
        .with_context(|| format!("write {}", args.out.display()))?;
    info!(
        out = ?args.out,
        loaded = report.sprites.len(),
        skipped = report.skipped.len(),
        "import written"
    );
    if !report.skipped.is_empty() {
        println!("skipped: {}", report.skipped_names().join(", "));
    }
    Ok(())
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
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

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

/// Sprite name: path relative to the input root, `/`-separated, without extension.
fn sprite_key(root: &Path, p: &Path) -> String {
    let rel = if root.is_file() {
        p.file_name().map(Path::new).unwrap_or(p)
    } else {
        p.strip_prefix(root).unwrap_or(p)
    };
    sprite_atlas_core::sprite_name(&rel.to_string_lossy().replace('\\', "/"))
}

fn load_images_with_progress(
    root: &Path,
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<InputImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_image(p) {
            Ok(img) => {
                let source = p.to_string_lossy().replace('\\', "/");
                list.push(InputImage::new(sprite_key(root, p), img).with_source_ref(source));
            }
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
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
    padding: Option<u32>,
    max_atlas_size: Option<u32>,
    force_square: Option<bool>,
    heuristic: Option<String>,
    extrude_edges: Option<bool>,
    initial_width: Option<u32>,
    initial_height: Option<u32>,
}

impl YamlConfig {
    fn into_packing_config(self, mut cfg: PackingConfig) -> anyhow::Result<PackingConfig> {
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.max_atlas_size {
            cfg.max_atlas_size = v;
        }
        if let Some(v) = self.force_square {
            cfg.force_square = v;
        }
        if let Some(v) = self.heuristic {
            cfg.heuristic = v.parse()?;
        }
        if let Some(v) = self.extrude_edges {
            cfg.extrude_edges = v;
        }
        if let Some(v) = self.initial_width {
            cfg.initial_size.0 = v;
        }
        if let Some(v) = self.initial_height {
            cfg.initial_size.1 = v;
        }
        Ok(cfg)
    }
}
