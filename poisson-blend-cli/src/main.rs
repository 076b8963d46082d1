//! poisson-blend CLI - seamless masked image pasting.
//!
//! Pastes the masked region of a source image into a destination image by
//! solving the discrete Poisson equation, so the paste keeps the source's
//! gradients while its boundary matches the destination.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ColorChoice, Parser};
use colored::Colorize;
use poisson_blend::color::{decode_mask, decode_rgb, encode_rgb};
use poisson_blend::composite::{naive_gradient_paste, naive_paste};
use poisson_blend::{BlendError, BlendOperator, Img, ImgVec, LinearRgb, Plane, RGB8};
use serde::Serialize;

/// Poisson (gradient-domain) image blending
///
/// Inserts the masked region of SOURCE into DEST at (PASTE_X, PASTE_Y)
/// without visible seams. The mask is a single-channel image of the same
/// size as SOURCE; any nonzero pixel selects.
#[derive(Parser, Debug)]
#[command(name = "poisson-blend")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Blend a masked region into a photo:
        poisson-blend bird.png bird_mask.png sky.png 120 40 -o composite.png

    Also write the naive baselines for comparison:
        poisson-blend bird.png bird_mask.png sky.png 120 40 \\
            --naive naive.png --gradient gradient.png

    Machine-readable output:
        poisson-blend --json bird.png bird_mask.png sky.png 120 40

EXIT CODES:
    0 - Success
    1 - Missing or invalid arguments
    2 - Image load failure
    3 - Unparsable paste coordinates
    4 - Source/mask dimension mismatch
    5 - Blend failure (empty mask, singular system, region out of bounds)
    6 - Output write failure (remaining outputs are still attempted)")]
struct Cli {
    /// Source image (3-channel)
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Mask image (single-channel; nonzero selects)
    #[arg(value_name = "MASK")]
    mask: PathBuf,

    /// Destination image (3-channel)
    #[arg(value_name = "DEST")]
    dest: PathBuf,

    /// Horizontal paste offset in destination pixels
    #[arg(value_name = "PASTE_X", allow_hyphen_values = true)]
    paste_x: i64,

    /// Vertical paste offset in destination pixels
    #[arg(value_name = "PASTE_Y", allow_hyphen_values = true)]
    paste_y: i64,

    /// Output file for the blended image
    #[arg(short, long, value_name = "FILE", default_value = "out.png")]
    output: PathBuf,

    /// Also write a naive (unblended) paste for comparison
    #[arg(long, value_name = "FILE")]
    naive: Option<PathBuf>,

    /// Also write a row-wise gradient paste for comparison
    #[arg(long, value_name = "FILE")]
    gradient: Option<PathBuf>,

    /// Output a JSON summary instead of text
    #[arg(long)]
    json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Serialize)]
struct JsonOutput {
    output: String,
    interior_pixels: usize,
    border_pixels: usize,
    region_width: usize,
    region_height: usize,
    paste_x: i64,
    paste_y: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    naive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gradient: Option<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return handle_parse_error(&e),
    };

    setup_colors(&cli);
    run(&cli)
}

/// Maps clap failures onto the documented exit codes: missing arguments
/// exit 1, unparsable coordinates exit 3.
fn handle_parse_error(e: &clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{e}");
            ExitCode::SUCCESS
        }
        ErrorKind::ValueValidation | ErrorKind::InvalidValue => {
            // The only non-trivially-parsed positionals are PASTE_X/Y.
            eprint!("{e}");
            ExitCode::from(3)
        }
        _ => {
            eprint!("{e}");
            ExitCode::from(1)
        }
    }
}

fn setup_colors(cli: &Cli) {
    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            if !io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }
}

fn report_error(cli: &Cli, msg: &str) {
    if !cli.quiet {
        eprintln!("{}: {}", "error".red().bold(), msg);
    }
}

fn run(cli: &Cli) -> ExitCode {
    // Load and decode inputs.
    let (source, mask, dest) = match load_inputs(cli) {
        Ok(images) => images,
        Err(msg) => {
            report_error(cli, &msg);
            return ExitCode::from(2);
        }
    };

    if source.width() != mask.width() || source.height() != mask.height() {
        report_error(
            cli,
            &format!(
                "source/mask dimension mismatch: {}x{} vs {}x{}",
                source.width(),
                source.height(),
                mask.width(),
                mask.height()
            ),
        );
        return ExitCode::from(4);
    }

    let operator = match BlendOperator::from_plane(&mask) {
        Ok(op) => op,
        Err(e) => {
            report_error(cli, &e.to_string());
            return ExitCode::from(5);
        }
    };

    let mut blended = dest.clone();
    if let Err(e) = operator.blend_linear(&source, &mut blended, cli.paste_x, cli.paste_y) {
        debug_assert!(!matches!(e, BlendError::DimensionMismatch { .. }));
        report_error(cli, &e.to_string());
        return ExitCode::from(5);
    }

    // Write the blend and any requested baselines; keep going past
    // individual write failures, the in-memory results stay valid.
    let mut write_failed = false;
    if let Err(msg) = save_image(&blended, &cli.output) {
        report_error(cli, &msg);
        write_failed = true;
    }

    if let Some(path) = &cli.naive {
        let mut out = dest.clone();
        naive_paste(&source, &mask, &mut out, cli.paste_x, cli.paste_y);
        if let Err(msg) = save_image(&out, path) {
            report_error(cli, &msg);
            write_failed = true;
        }
    }

    if let Some(path) = &cli.gradient {
        let mut out = dest.clone();
        naive_gradient_paste(&source, &mask, &mut out, cli.paste_x, cli.paste_y);
        if let Err(msg) = save_image(&out, path) {
            report_error(cli, &msg);
            write_failed = true;
        }
    }

    if write_failed {
        return ExitCode::from(6);
    }

    print_summary(cli, &operator);
    ExitCode::SUCCESS
}

/// Loads source and destination as 3-channel RGB and the mask as
/// single-channel luma, all decoded to linear light.
fn load_inputs(cli: &Cli) -> Result<(LinearRgb, Plane, LinearRgb), String> {
    let source = load_rgb(&cli.source)?;
    let mask = load_mask(&cli.mask)?;
    let dest = load_rgb(&cli.dest)?;
    Ok((source, mask, dest))
}

fn load_rgb(path: &Path) -> Result<LinearRgb, String> {
    let img = image::open(path)
        .map_err(|e| format!("failed to load '{}': {}", path.display(), e))?
        .to_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels: Vec<RGB8> = img
        .as_raw()
        .chunks_exact(3)
        .map(|c| RGB8::new(c[0], c[1], c[2]))
        .collect();
    let img = Img::new(pixels, w, h);
    Ok(decode_rgb(img.as_ref()))
}

fn load_mask(path: &Path) -> Result<Plane, String> {
    let img = image::open(path)
        .map_err(|e| format!("failed to load '{}': {}", path.display(), e))?
        .to_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let img = Img::new(img.into_raw(), w, h);
    Ok(decode_mask(img.as_ref()))
}

fn save_image(img: &LinearRgb, path: &Path) -> Result<(), String> {
    let encoded: ImgVec<RGB8> = encode_rgb(img);
    let (w, h) = (encoded.width(), encoded.height());
    let mut bytes = Vec::with_capacity(w * h * 3);
    for px in encoded.buf() {
        bytes.extend_from_slice(&[px.r, px.g, px.b]);
    }
    image::save_buffer(path, &bytes, w as u32, h as u32, image::ExtendedColorType::Rgb8)
        .map_err(|e| format!("failed to write '{}': {}", path.display(), e))
}

fn print_summary(cli: &Cli, operator: &BlendOperator) {
    if cli.json {
        let bounds = operator.bounds();
        let output = JsonOutput {
            output: cli.output.display().to_string(),
            interior_pixels: operator.interior(),
            border_pixels: operator.border(),
            region_width: bounds.width,
            region_height: bounds.height,
            paste_x: cli.paste_x,
            paste_y: cli.paste_y,
            naive: cli.naive.as_ref().map(|p| p.display().to_string()),
            gradient: cli.gradient.as_ref().map(|p| p.display().to_string()),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => report_error(cli, &format!("failed to serialize JSON: {e}")),
        }
    } else if !cli.quiet {
        let bounds = operator.bounds();
        println!(
            "Blended {} region ({} solved, {} boundary) into {}",
            format!("{}x{}", bounds.width, bounds.height).bold(),
            operator.interior(),
            operator.border(),
            cli.output.display()
        );
    }
}
