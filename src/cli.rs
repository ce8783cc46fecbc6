// ============================================================================
// Pixo CLI — headless batch export via command-line arguments
// ============================================================================
//
// Usage examples:
//   pixo --input sprite.pix --output sprite.png
//   pixo -i sprite.pix -o sheet.png --layers all
//   pixo -i "projects/*.pix" --output-dir out/
//   pixo -i atlas.pix --output-dir tiles/ --cell-width 16 --cell-height 16
//
// No dialogs are opened in CLI mode. Each project is loaded, composited and
// written synchronously on the current thread.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::io::{self, LayerFilter, SliceSettings};
use crate::log_err;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Pixo headless exporter.
///
/// Render .pix projects to PNG without opening the editor.
#[derive(Parser, Debug)]
#[command(
    name = "pixo",
    about = "Pixo headless project exporter",
    long_about = "Composite .pix pixel-art projects and write PNG files without\n\
                  opening the editor. Exports the whole canvas by default, or a\n\
                  grid of tiles when --cell-width/--cell-height are given.\n\n\
                  Example:\n  \
                  pixo --input sprite.pix --output sprite.png\n  \
                  pixo -i \"projects/*.pix\" --output-dir out/ --layers all"
)]
pub struct CliArgs {
    /// Input .pix file(s). Glob patterns accepted (e.g. "*.pix",
    /// "projects/*.pix").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output PNG path. Only valid for single-file, whole-canvas export.
    /// For batch or sliced export use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory. Files are written here with the project's stem and
    /// a .png extension (slices as stem_row_col.png).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Which layers to composite: selected, all, or visible.
    #[arg(long, default_value = "visible", value_name = "FILTER")]
    pub layers: LayerFilter,

    /// Slice cell width in pixels. Requires --cell-height.
    #[arg(long, value_name = "PX")]
    pub cell_width: Option<u32>,

    /// Slice cell height in pixels. Requires --cell-width.
    #[arg(long, value_name = "PX")]
    pub cell_height: Option<u32>,

    /// Horizontal origin of the slice grid.
    #[arg(long, default_value_t = 0, value_name = "PX")]
    pub offset_x: u32,

    /// Vertical origin of the slice grid.
    #[arg(long, default_value_t = 0, value_name = "PX")]
    pub offset_y: u32,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    fn slice_settings(&self) -> Option<SliceSettings> {
        match (self.cell_width, self.cell_height) {
            (Some(cell_width), Some(cell_height)) => Some(SliceSettings {
                cell_width,
                cell_height,
                offset_x: self.offset_x,
                offset_y: self.offset_y,
            }),
            _ => None,
        }
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    // Resolve glob patterns / literal paths → concrete PathBufs
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    if args.cell_width.is_some() != args.cell_height.is_some() {
        eprintln!("error: --cell-width and --cell-height must be given together.");
        return ExitCode::FAILURE;
    }

    // Sliced export emits many files; --output can only name one.
    let slicing = args.slice_settings();
    if slicing.is_some() && args.output.is_some() {
        eprintln!("error: sliced export writes multiple files; use --output-dir.");
        return ExitCode::FAILURE;
    }
    if inputs.len() > 1 && args.output.is_some() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch export.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    if let Some(dir) = &args.output_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("error: could not create output directory '{}': {}", dir.display(), e);
        return ExitCode::FAILURE;
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        match run_one(input_path, &args, slicing) {
            Ok(written) => {
                if args.verbose || multi {
                    println!(
                        "  → {} file(s) ({:.0}ms)",
                        written,
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                log_err!("export of {} failed: {}", input_path.display(), e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-file export pipeline
// ============================================================================

/// Export one project; returns the number of PNG files written.
fn run_one(
    input: &Path,
    args: &CliArgs,
    slicing: Option<SliceSettings>,
) -> Result<usize, String> {
    let (sprite, _palette) =
        io::load_project(input).map_err(|e| format!("load failed: {}", e))?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());

    match slicing {
        Some(settings) => {
            let dir = args
                .output_dir
                .clone()
                .or_else(|| input.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."));
            let written = io::export_slices(&sprite, args.layers, settings, &dir, &stem)
                .map_err(|e| format!("slice export failed: {}", e))?;
            Ok(written.len())
        }
        None => {
            let output = match (&args.output, &args.output_dir) {
                (Some(path), _) => path.clone(),
                (None, Some(dir)) => dir.join(format!("{}.png", stem)),
                (None, None) => input.with_extension("png"),
            };
            io::export_whole(&sprite, args.layers, &output)
                .map_err(|e| format!("export failed: {}", e))?;
            Ok(1)
        }
    }
}

// ============================================================================
// Input resolution
// ============================================================================

fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            // Literal path — use directly
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}
