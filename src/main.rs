//! # qrcompose CLI
//!
//! Command-line and line-prompt front ends for the QR code composer.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use owo_colors::OwoColorize;
use tracing::debug;

use qrcompose::{compose, encode, helper, logging, prompt, ComposeOptions};

const GLOBAL_HELP: &str = "\
Colors:
  CSS names (navy, tomato, ...), #rgb, #rrggbb or rgb(r, g, b)

Examples:
  qrcompose https://example.com
  qrcompose https://example.com -o site.jpg --format jpeg
  qrcompose https://example.com --ecc H --logo logo.png --frame-text \"Scan me\"
  qrcompose                      Answer each option at a prompt";

#[derive(Parser)]
#[command(name = "qrcompose")]
#[command(version)]
#[command(about = "Generate a QR code image for a URL, with optional logo and caption frame")]
#[command(
    long_about = "Generate a QR code image for a URL, with optional logo and caption frame.\n\n\
The symbol starts at the requested version and grows automatically when the text needs \
more room. Without a URL argument (or with --interactive) every option is asked for at a \
prompt; empty answers take the value of the matching flag, then the default."
)]
#[command(after_help = GLOBAL_HELP)]
struct Cli {
    /// Text or URL to encode
    #[arg(conflicts_with = "interactive")]
    url: Option<String>,

    /// Where to save the image
    #[arg(short, long, value_name = "PATH", help = "Where to save the image [default: qr_code.png]")]
    output: Option<PathBuf>,

    /// Pixels per module
    #[arg(long, value_name = "PIXELS", help = "Pixels per module [default: 10]")]
    module_size: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long, value_name = "MODULES", help = "Quiet zone width in modules [default: 4]")]
    border: Option<u32>,

    /// Color of dark modules and caption text
    #[arg(long, value_name = "COLOR", help = "Color of dark modules and caption [default: black]")]
    fill: Option<String>,

    /// Color of light modules and the frame
    #[arg(long, value_name = "COLOR", help = "Color of light modules and frame [default: white]")]
    background: Option<String>,

    /// Starting symbol version
    #[arg(long, value_name = "1-40", help = "Starting symbol version [default: 1]")]
    qr_version: Option<u32>,

    /// Error correction level
    #[arg(long, value_name = "L|M|Q|H", help = "Error correction level; unknown values mean L [default: L]")]
    ecc: Option<String>,

    /// Logo pasted over the center
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Output image format
    #[arg(long, value_name = "FORMAT", help = "Output image format: png, jpeg, bmp, ... [default: PNG]")]
    format: Option<String>,

    /// Caption shown on a frame below the symbol
    #[arg(long, value_name = "TEXT")]
    frame_text: Option<String>,

    /// Also print the symbol to the terminal
    #[arg(long)]
    preview: bool,

    /// Ask for every option at a prompt
    #[arg(short, long)]
    interactive: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_options(self) -> ComposeOptions {
        ComposeOptions {
            text: self.url.unwrap_or_default(),
            destination: self.output,
            module_size: self.module_size,
            border: self.border,
            fill_color: self.fill,
            back_color: self.background,
            version: self.qr_version,
            error_correction: self.ecc,
            logo: self.logo,
            format: self.format,
            frame_text: self.frame_text,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    let preview = cli.preview;
    let interactive = cli.interactive || cli.url.is_none();
    let flags = cli.into_options();

    let options = if interactive {
        debug!("collecting options interactively");
        prompt::collect_options(io::stdin().lock(), io::stdout())
            .context("failed to read answers")?
            .or(flags)
    } else {
        flags
    };

    let request = options.resolve()?;
    compose(&request)?;

    if preview {
        let qr = encode(request.text(), request.ecc(), request.version())?;
        print!("{}", helper::to_terminal_string(&qr, 4));
    }
    println!(
        "QR code saved as '{}' for URL: {}",
        request.destination().display(),
        request.text()
    );
    Ok(())
}
