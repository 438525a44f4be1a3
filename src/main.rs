// ============================================================================
// canvas-fx: headless render of one image through the filter pipeline
// ============================================================================
//
// Usage examples:
//   canvas-fx -i photo.png -o out.png --filter vintage
//   canvas-fx -i photo.jpg -o out.png --filter neon --intensity 60 --contrast 20
//   canvas-fx -i photo.png -o before_after.png --filter sketch --compare
//   canvas-fx -i photo.png -o out.png --brightness -15 --blur 2 --config engine.json

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use image::{DynamicImage, ImageFormat, RgbaImage};

use canvas_fx::{AdjustmentField, EngineConfig, FilterEngine, FilterError, FilterKind, PixelBuffer};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Apply a stylistic effect and tonal adjustments to an image.
#[derive(Parser, Debug)]
#[command(name = "canvas-fx", version, allow_negative_numbers = true)]
pub struct CliArgs {
    /// Input image (PNG or JPEG).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output image; format inferred from the extension. JPEG output drops alpha.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Effect: none, vintage, oil, watercolor, sketch, neon, dramatic, dreamy.
    #[arg(short, long, default_value = "none")]
    pub filter: String,

    /// Effect strength, 0-100.
    #[arg(long, default_value_t = 100)]
    pub intensity: i32,

    /// -100 to 100.
    #[arg(long, default_value_t = 0)]
    pub contrast: i32,

    /// -100 to 100.
    #[arg(long, default_value_t = 0)]
    pub brightness: i32,

    /// -100 to 100.
    #[arg(long, default_value_t = 0)]
    pub saturation: i32,

    /// Box blur radius in pixels.
    #[arg(long, default_value_t = 0)]
    pub blur: i32,

    /// Write original and result side by side instead of the result alone.
    #[arg(long)]
    pub compare: bool,

    /// Engine settings as JSON (quiescenceMs, maxBlurRadius, strictParams).
    #[arg(long, value_name = "FILE.json")]
    pub config: Option<PathBuf>,

    /// Debug logging and timing output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read config '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("could not write '{path}': {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{0}")]
    Pipeline(#[from] FilterError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let kind: FilterKind = args.filter.parse()?;

    let started = Instant::now();
    let source = load_source(&args.input)?;
    log::info!("{}: {}x{}", args.input.display(), source.width(), source.height());

    let mut engine = FilterEngine::new(config);
    engine.set_source(source);
    engine.select_filter(kind);
    for (field, value) in [
        (AdjustmentField::Intensity, args.intensity),
        (AdjustmentField::Contrast, args.contrast),
        (AdjustmentField::Brightness, args.brightness),
        (AdjustmentField::Saturation, args.saturation),
        (AdjustmentField::Blur, args.blur),
    ] {
        let stored = engine.set_adjustment(field, value)?;
        if stored != value {
            log::warn!("{} clamped to {}", field, stored);
        }
    }

    let result = engine.recompute()?;
    let output = if args.compare {
        engine.compare()?.side_by_side()?
    } else {
        (*result.buffer).clone()
    };

    save_output(&args.output, output)?;
    log::debug!(
        "wrote {} ({:.0}ms)",
        args.output.display(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<EngineConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_source(path: &Path) -> Result<PixelBuffer, CliError> {
    let decoded = image::open(path)
        .map_err(|source| CliError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(PixelBuffer::from_raw(width, height, decoded.into_raw())?)
}

fn save_output(path: &Path, buffer: PixelBuffer) -> Result<(), CliError> {
    let (width, height) = (buffer.width(), buffer.height());
    let rgba = RgbaImage::from_raw(width, height, buffer.into_raw()).ok_or_else(|| {
        FilterError::InvalidSource(format!("{}x{} result has the wrong length", width, height))
    })?;

    // JPEG has no alpha channel.
    let image = match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    };
    image.save(path).map_err(|source| CliError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
