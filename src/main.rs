//! tmxkit CLI - Command-line tool for inspecting Tiled TMX maps.
//!
//! This is the main entry point for the tmxkit command-line application.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use tmxkit::prelude::*;

/// tmxkit - Tiled TMX map inspection tool
#[derive(Parser)]
#[command(name = "tmxkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a map: attributes, tilesets and layers
    Info {
        /// Path to the TMX file
        #[arg(env = "TMXKIT_MAP")]
        map: PathBuf,
    },

    /// Print the GID grid of a tile layer
    Layer {
        /// Path to the TMX file
        map: PathBuf,

        /// Layer name (disambiguated names such as "Ground (1)" work too)
        name: String,
    },

    /// Parse every .tmx file under the given paths
    Check {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Number of worker threads (default: one per core)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { map } => cmd_info(&map)?,
        Commands::Layer { map, name } => cmd_layer(&map, &name)?,
        Commands::Check { paths, jobs } => cmd_check(&paths, jobs)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_map(path: &Path) -> Result<Map> {
    Map::open(path).with_context(|| format!("Failed to load map {}", path.display()))
}

fn cmd_info(path: &Path) -> Result<()> {
    let start = Instant::now();
    let map = open_map(path)?;
    debug!(elapsed = ?start.elapsed(), "map loaded");

    println!("Map: {}", path.display());
    match &map.tiled_version {
        Some(tiled) => println!("  Version:     {} (Tiled {})", map.version, tiled),
        None => println!("  Version:     {}", map.version),
    }
    println!("  Orientation: {}, render order {}", map.orientation, map.render_order);
    println!(
        "  Size:        {}x{} tiles of {}x{} px",
        map.width, map.height, map.tile_width, map.tile_height
    );
    if map.orientation.is_staggered() {
        println!(
            "  Stagger:     axis {:?}, index {:?}, hex side {:?}",
            map.stagger_axis, map.stagger_index, map.hex_side_length
        );
    }
    if let Some(color) = map.background_color {
        println!("  Background:  {}", color);
    }

    println!("\nTilesets ({}):", map.tilesets().len());
    for tileset in map.tilesets() {
        let last = last_gid(tileset.first_gid, tileset.len());
        let origin = match &tileset.source {
            Some(source) => format!(" <- {}", source.display()),
            None => String::new(),
        };
        println!(
            "  {:>6}..={:<6} {} ({}x{}){}",
            tileset.first_gid, last, tileset.name, tileset.tile_width, tileset.tile_height, origin
        );
    }

    println!("\nLayers ({}), bottom to top:", map.draw_order().len());
    for layer in map.draw_order() {
        let detail = match layer {
            LayerRef::Tile(tiles) => format!(
                "{}x{}, {}/{}, {} non-empty",
                tiles.width,
                tiles.height,
                tiles.encoding,
                tiles.compression,
                tiles.tiles.iter().filter(|t| !t.is_empty()).count()
            ),
            LayerRef::Objects(group) => format!("{} objects", group.objects.len()),
            LayerRef::Image(image) => match &image.image {
                Some(image) => image.source.clone(),
                None => "no image".to_string(),
            },
        };
        println!(
            "  {:>3} {:<8} {:<24} {}{}",
            layer.order_index(),
            kind_label(layer.kind()),
            layer.name(),
            detail,
            if layer.visible() { "" } else { " (hidden)" }
        );
    }

    if !map.properties().is_empty() {
        println!("\nProperties:");
        for (name, value) in map.properties() {
            println!("  {} = {}", name, property_label(value));
        }
    }

    Ok(())
}

fn cmd_layer(path: &Path, name: &str) -> Result<()> {
    let map = open_map(path)?;
    let layer = map.tile_layers().get(name).with_context(|| {
        let known: Vec<_> = map.tile_layers().keys().collect();
        format!("No tile layer {:?} (tile layers: {})", name, known.join(", "))
    })?;

    let cells: Vec<Vec<String>> = layer
        .rows()
        .map(|row| row.iter().map(|cell| cell_label(&cell.tile)).collect())
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(1);

    for row in &cells {
        let mut line = String::new();
        for cell in row {
            write!(line, "{:>width$} ", cell)?;
        }
        println!("{}", line.trim_end());
    }

    Ok(())
}

fn cmd_check(paths: &[PathBuf], jobs: Option<usize>) -> Result<()> {
    let files = collect_maps(paths)?;
    if files.is_empty() {
        anyhow::bail!("No .tmx files found");
    }

    println!("Checking {} maps...", files.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .context("Failed to start worker threads")?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let failures: Vec<(&PathBuf, anyhow::Error)> = pool.install(|| {
        files
            .par_iter()
            .filter_map(|file| {
                let result = Map::open(file);
                pb.inc(1);
                result.err().map(|e| (file, anyhow::Error::new(e)))
            })
            .collect()
    });
    pb.finish_and_clear();

    for (file, error) in &failures {
        eprintln!("FAIL {}: {:#}", file.display(), error);
    }
    println!(
        "Checked {} maps in {:?}: {} ok, {} failed",
        files.len(),
        start.elapsed(),
        files.len() - failures.len(),
        failures.len()
    );

    if !failures.is_empty() {
        anyhow::bail!("{} of {} maps failed to parse", failures.len(), files.len());
    }
    Ok(())
}

/// Expand directories into the `.tmx` files below them. Files given
/// explicitly are kept whatever their extension.
fn collect_maps(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            let is_tmx = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tmx"));
            if entry.file_type().is_file() && is_tmx {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

/// Last GID of a tileset's range, clamped at `u32::MAX`.
fn last_gid(first_gid: u32, tile_count: u32) -> u32 {
    first_gid.saturating_add(tile_count.saturating_sub(1))
}

fn kind_label(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Tile => "tiles",
        LayerKind::Objects => "objects",
        LayerKind::Image => "image",
    }
}

/// GID with `h`/`v`/`d` suffixes for flips, `.` for an empty cell.
fn cell_label(tile: &TileRef) -> String {
    if tile.is_empty() {
        return ".".to_string();
    }
    let mut label = tile.gid.to_string();
    if tile.flip_horizontal {
        label.push('h');
    }
    if tile.flip_vertical {
        label.push('v');
    }
    if tile.flip_diagonal {
        label.push('d');
    }
    label
}

fn property_label(value: &PropertyValue) -> String {
    match value {
        PropertyValue::String(s) => format!("{:?}", s),
        PropertyValue::Int(i) => i.to_string(),
        PropertyValue::Float(f) => f.to_string(),
        PropertyValue::Bool(b) => b.to_string(),
        PropertyValue::Color(c) => c.to_string(),
        PropertyValue::File(f) => format!("file {:?}", f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_label() {
        assert_eq!(cell_label(&TileRef::from_raw(0)), ".");
        assert_eq!(cell_label(&TileRef::from_raw(7)), "7");
        assert_eq!(cell_label(&TileRef::from_raw(0xA000_0005)), "5hd");
        assert_eq!(cell_label(&TileRef::from_raw(0x4000_0002)), "2v");
    }

    #[test]
    fn test_last_gid() {
        assert_eq!(last_gid(1, 8), 8);
        assert_eq!(last_gid(9, 0), 9);
        assert_eq!(last_gid(u32::MAX, 2), u32::MAX);
    }

    #[test]
    fn test_collect_maps_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.tmx"), "").unwrap();
        std::fs::write(dir.path().join("sub/b.TMX"), "").unwrap();
        std::fs::write(dir.path().join("tiles.tsx"), "").unwrap();

        let files = collect_maps(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.tmx", "b.TMX"]);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["tmxkit", "-vv", "layer", "level.tmx", "Ground (1)"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Layer { map, name } => {
                assert_eq!(map, PathBuf::from("level.tmx"));
                assert_eq!(name, "Ground (1)");
            }
            _ => panic!("expected the layer command"),
        }
        assert!(Cli::try_parse_from(["tmxkit", "check"]).is_err());
    }
}
