use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs;

use blinkt::{Blinkt, Config, Port, RecordingPort};

#[derive(Parser)]
#[command(name = "blinkt")]
#[command(about = "Blinkt! LED strip driver\n\nSets the 8 pixels and sends one update over the clock/data GPIO lines.", long_about = None)]
struct Cli {
    /// Path to configuration file (JSON)
    #[arg(long)]
    config: Option<String>,

    /// GPIO number of the clock line (overrides config)
    #[arg(long)]
    clock_pin: Option<u32>,

    /// GPIO number of the data line (overrides config)
    #[arg(long)]
    data_pin: Option<u32>,

    /// sysfs GPIO directory (overrides config)
    #[arg(long)]
    sysfs_root: Option<String>,

    /// Print the frame bytes instead of driving GPIO
    #[arg(long)]
    dry_run: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Enable detailed debug (hex dump of the frame)
    #[arg(long)]
    ddebug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send the default state: all white, full brightness
    Show,
    /// Set one pixel
    Pixel {
        /// Pixel index, 0 to 7
        index: usize,
        #[arg(allow_negative_numbers = true)]
        r: f64,
        #[arg(allow_negative_numbers = true)]
        g: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
        /// Brightness fraction, 0.0 to 1.0
        #[arg(long, allow_negative_numbers = true)]
        brightness: Option<f64>,
    },
    /// Set every pixel
    All {
        #[arg(allow_negative_numbers = true)]
        r: f64,
        #[arg(allow_negative_numbers = true)]
        g: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
        /// Brightness fraction, 0.0 to 1.0
        #[arg(long, allow_negative_numbers = true)]
        brightness: Option<f64>,
    },
    /// Set the brightness of one pixel
    Brightness {
        /// Pixel index, 0 to 7
        index: usize,
        /// Brightness fraction, 0.0 to 1.0
        #[arg(allow_negative_numbers = true)]
        fraction: f64,
    },
    /// Set every pixel to white, keeping brightness
    Clear,
}

/// Writes log records to stderr, like the rest of the debug output.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ddebug implies debug
    let level = if cli.ddebug {
        LevelFilter::Trace
    } else if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    log::set_logger(&LOGGER).context("Failed to install logger")?;
    log::set_max_level(level);

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => {
            let config_data = fs::read_to_string(path)
                .context(format!("Failed to read config file {}", path))?;
            serde_json::from_str::<Config>(&config_data)
                .context(format!("Failed to parse config file {}", path))?
        }
        None => Config::default(),
    };
    if let Some(pin) = cli.clock_pin {
        config.gpio.clock_pin = pin;
    }
    if let Some(pin) = cli.data_pin {
        config.gpio.data_pin = pin;
    }
    if let Some(root) = &cli.sysfs_root {
        config.gpio.sysfs_root = root.clone();
    }

    if cli.dry_run {
        let mut blinkt = Blinkt::new(RecordingPort::new());
        apply(&mut blinkt, &cli.command)?;
        let hex: String = blinkt
            .port()
            .decoded_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", hex);
    } else {
        let mut blinkt = Blinkt::open(&config.gpio).context(format!(
            "Failed to open GPIO {} (clock) / {} (data)",
            config.gpio.clock_pin, config.gpio.data_pin
        ))?;
        apply(&mut blinkt, &cli.command)?;
    }

    Ok(())
}

/// Apply one command to a freshly initialized strip and send the update.
fn apply<P: Port>(blinkt: &mut Blinkt<P>, command: &Command) -> Result<()> {
    match *command {
        Command::Show => {}
        Command::Pixel {
            index,
            r,
            g,
            b,
            brightness,
        } => blinkt.set_pixel(index, r, g, b, brightness)?,
        Command::All { r, g, b, brightness } => blinkt.set_all_pixels(r, g, b, brightness),
        Command::Brightness { index, fraction } => blinkt.set_brightness(index, fraction)?,
        Command::Clear => blinkt.clear_all(),
    }

    blinkt.show().context("Failed to send update")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_run(args: &[&str]) -> Vec<u8> {
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.dry_run);
        let mut blinkt = Blinkt::new(RecordingPort::new());
        apply(&mut blinkt, &cli.command).unwrap();
        blinkt.into_port().decoded_bytes()
    }

    #[test]
    fn test_dry_run_show() {
        let bytes = dry_run(&["blinkt", "--dry-run", "show"]);
        assert_eq!(bytes.len(), 37);
        assert_eq!(&bytes[4..8], &[0xFF, 255, 255, 255]);
        assert_eq!(bytes[36], 0xFF);
    }

    #[test]
    fn test_dry_run_pixel() {
        let bytes = dry_run(&[
            "blinkt", "--dry-run", "pixel", "3", "10", "20", "30", "--brightness", "0.5",
        ]);
        assert_eq!(&bytes[16..20], &[0xEF, 30, 20, 10]);
    }

    #[test]
    fn test_dry_run_fractional_and_negative_colors() {
        let bytes = dry_run(&["blinkt", "--dry-run", "pixel", "0", "10.7", "-1", "255.9"]);
        assert_eq!(&bytes[4..8], &[0xFF, 255, 255, 10]);
    }

    #[test]
    fn test_dry_run_all_brightness_and_clear() {
        let bytes = dry_run(&["blinkt", "--dry-run", "all", "1", "2", "3", "--brightness", "0.5"]);
        assert_eq!(&bytes[32..36], &[0xEF, 3, 2, 1]);

        let bytes = dry_run(&["blinkt", "--dry-run", "brightness", "7", "0"]);
        assert_eq!(&bytes[32..36], &[0xE0, 255, 255, 255]);

        let bytes = dry_run(&["blinkt", "--dry-run", "clear"]);
        assert_eq!(&bytes[32..36], &[0xFF, 255, 255, 255]);
    }

    #[test]
    fn test_bad_index_fails() {
        let cli = Cli::try_parse_from(["blinkt", "pixel", "8", "0", "0", "0"]).unwrap();
        let mut blinkt = Blinkt::new(RecordingPort::new());
        assert!(apply(&mut blinkt, &cli.command).is_err());
        assert!(blinkt.port().events().is_empty());
    }
}
