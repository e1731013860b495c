use clap::{Parser, Subcommand};
use image_focus::focus::{Fit, FocusDescriptor, FocusPoint};
use image_focus::geometry::{Point, Rect, Size, compute_shift, pointer_to_focus};
use image_focus::placeholder::{
    BlurhashBackend, PlaceholderBackend, PlaceholderParams, TRANSPARENT_PIXEL,
};
use image_focus::style::{ImageStyle, ObjectPosition};
use image_focus::{codec, config, output, stamp};
use std::path::PathBuf;

/// Focal point and fit shared by commands that build descriptors.
#[derive(clap::Args, Clone)]
struct PointArgs {
    /// Horizontal focus, -1 (left edge) to 1 (right edge)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    x: f64,
    /// Vertical focus, -1 (bottom edge) to 1 (top edge)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    y: f64,
    /// How the image fills its container: cover or contain
    #[arg(long, default_value = "cover")]
    fit: Fit,
}

impl PointArgs {
    fn point(&self) -> FocusPoint {
        FocusPoint::new(self.x, self.y)
    }
}

#[derive(Parser)]
#[command(name = "image-focus")]
#[command(about = "Focal-point cropping and progressive placeholders for images")]
#[command(long_about = "\
Focal-point cropping and progressive placeholders for images

A focus string packs a focal point, the image's intrinsic size, its fit mode
and an optional blurhash into one short attribute-safe value:

  [1, x*100, y*100, width, height, fit, blurhash]  → JSON → base64

x and y run from -1 to 1 with 0,0 at the image center. Positive y is ABOVE
center.

Typical flow:

  image-focus stamp photos/ --x 0.3 --y 0.2   # measure files, print focus strings
  image-focus shift <FOCUS> --container 320x180
  image-focus placeholder <FOCUS>             # data URI for the loading background

Run 'image-focus gen-config' to generate a documented focus.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing focus.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a focus string from its parts
    Encode {
        #[command(flatten)]
        point: PointArgs,
        /// Intrinsic image width in pixels
        #[arg(long, default_value_t = 0)]
        width: u32,
        /// Intrinsic image height in pixels
        #[arg(long, default_value_t = 0)]
        height: u32,
        /// Placeholder hash
        #[arg(long)]
        blurhash: Option<String>,
    },
    /// Decode a focus string
    Decode {
        encoded: String,
        /// Print a human-readable summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Compute the crop position for a container size
    Shift {
        encoded: String,
        /// Container size, e.g. 320x180
        #[arg(long, value_parser = parse_size)]
        container: Size,
    },
    /// Pick a new focal point from a pointer position over the whole image
    Pick {
        encoded: String,
        /// Rendered picker box, e.g. 600x400
        #[arg(long = "box", value_parser = parse_size)]
        bbox: Size,
        /// Pointer offset inside the box, e.g. 150,90
        #[arg(long, value_parser = parse_point)]
        pointer: Point,
    },
    /// Render the loading placeholder as a data URI
    Placeholder { encoded: String },
    /// Measure image files and print focus strings for them
    Stamp {
        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[command(flatten)]
        point: PointArgs,
    },
    /// Print a stock focus.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode {
            point,
            width,
            height,
            blurhash,
        } => {
            let mut focus = FocusDescriptor::new(point.point())
                .with_size(width, height)
                .with_fit(point.fit);
            if let Some(hash) = blurhash {
                focus = focus.with_blurhash(hash);
            }
            println!("{}", codec::encode(&focus));
        }
        Command::Decode { encoded, summary } => {
            let focus = codec::decode(&encoded)?;
            if summary {
                output::print_descriptor(&focus);
            } else {
                println!("{}", serde_json::to_string_pretty(&focus)?);
            }
        }
        Command::Shift { encoded, container } => {
            let focus = codec::decode(&encoded)?;
            let shift = compute_shift(&focus, container)
                .ok_or("image and container sizes must both be known")?;
            let style = ImageStyle {
                object_fit: focus.fit,
                object_position: ObjectPosition::At(shift),
                background_position: shift,
                ..ImageStyle::default()
            };
            output::print_declarations(&style.declarations()[..2]);
        }
        Command::Pick {
            encoded,
            bbox,
            pointer,
        } => {
            let mut focus = codec::decode(&encoded)?;
            let intrinsic = Size::from((focus.width, focus.height));
            let bbox = Rect::new(0.0, 0.0, bbox.width, bbox.height);
            focus.point = pointer_to_focus(pointer, bbox, intrinsic)
                .ok_or("image and box sizes must both be known")?;
            println!("{}", codec::encode(&focus));
        }
        Command::Placeholder { encoded } => {
            let focus = codec::decode(&encoded)?;
            match &focus.blurhash {
                Some(hash) => {
                    let cfg = config::load_config(&cli.config)?;
                    let mut backend =
                        BlurhashBackend::new(PlaceholderParams::from_config(&cfg.placeholder));
                    println!("{}", backend.render(hash, focus.width, focus.height)?);
                }
                None => println!("{TRANSPARENT_PIXEL}"),
            }
        }
        Command::Stamp { paths, point } => {
            let cfg = config::load_config(&cli.config)?;
            init_thread_pool(&cfg.processing);
            let results = stamp::stamp_all(&paths, point.point(), point.fit, &cfg.stamp)?;
            output::print_stamp_output(&results);
            if results.iter().any(|s| s.result.is_err()) {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid dimension '{v}': {e}"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

/// Parse `X,Y`.
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}
