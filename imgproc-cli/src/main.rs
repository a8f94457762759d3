use clap::Parser;
use imgproc::io::{load_image, save_image};
use imgproc::{
    detect_object_with, edge_detect, gaussian_low_pass_with, DetectConfig, SpectralConfig,
};
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Edge detection, object detection and Gaussian low-pass filtering",
    allow_negative_numbers = true
)]
struct Cli {
    /// Program mode: 1 = edge detection, 2 = object detection, 3 = Gauss filter.
    mode: Option<String>,
    /// `<image>` for modes 1 and 3; `<image> <template> <precision 0..10>` for mode 2.
    args: Vec<String>,
    /// Optional JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
struct Config {
    edge_output: String,
    correlation_output: String,
    gauss_output: String,
    thickness: usize,
    max_spectral_pixels: usize,
    parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        let detect = DetectConfig::default();
        let spectral = SpectralConfig::default();
        Self {
            edge_output: "edge_detection.jpg".to_string(),
            correlation_output: "Im_correlation.jpg".to_string(),
            gauss_output: "Gauss_filter.jpg".to_string(),
            thickness: detect.thickness,
            max_spectral_pixels: spectral.max_pixels,
            parallel: false,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Mode {
    Edge {
        image: String,
    },
    Object {
        image: String,
        template: String,
        precision: i32,
    },
    Gauss {
        image: String,
    },
}

fn parse_mode(mode: &str, args: &[String]) -> Result<Mode, String> {
    match mode {
        "1" | "3" => {
            let [image] = args else {
                return Err("There must be 2 arguments: program mode, image".to_string());
            };
            let image = image.clone();
            Ok(if mode == "1" {
                Mode::Edge { image }
            } else {
                Mode::Gauss { image }
            })
        }
        "2" => {
            let [image, template, precision] = args else {
                return Err(
                    "There must be 4 arguments: program mode, image1, image2, precision"
                        .to_string(),
                );
            };
            let precision = precision
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|p| (0..=10).contains(p))
                .ok_or_else(|| "Precision must be in range [0 ..10]".to_string())?;
            Ok(Mode::Object {
                image: image.clone(),
                template: template.clone(),
                precision,
            })
        }
        _ => Err("The first argument(program mode) must be in range [1 ..3]".to_string()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("imgproc=info".parse()?)
                    .add_directive("imgproc_cli=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    let mode = cli
        .mode
        .as_deref()
        .ok_or("The first argument(program mode) must be in range [1 ..3]")?;
    let mode = parse_mode(mode, &cli.args)?;
    tracing::info!(?mode, "running");

    match mode {
        Mode::Edge { image } => {
            let source = load_image(&image)?;
            let edges = edge_detect(&source)?;
            save_image(&edges, &config.edge_output)?;
        }
        Mode::Object {
            image,
            template,
            precision,
        } => {
            let source = load_image(&image)?;
            let template = load_image(&template)?;
            let marked = detect_object_with(
                &source,
                &template,
                &DetectConfig {
                    precision,
                    thickness: config.thickness,
                    parallel: config.parallel,
                },
            )?;
            save_image(&marked, &config.correlation_output)?;
        }
        Mode::Gauss { image } => {
            let source = load_image(&image)?;
            let filtered = gaussian_low_pass_with(
                &source,
                &SpectralConfig {
                    max_pixels: config.max_spectral_pixels,
                    parallel: config.parallel,
                },
            )?;
            save_image(&filtered, &config.gauss_output)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_mode, Config, Mode, EXAMPLE_JSON};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_each_mode() {
        assert_eq!(
            parse_mode("1", &args(&["a.png"])).unwrap(),
            Mode::Edge {
                image: "a.png".to_string()
            }
        );
        assert_eq!(
            parse_mode("2", &args(&["a.png", "b.png", "7"])).unwrap(),
            Mode::Object {
                image: "a.png".to_string(),
                template: "b.png".to_string(),
                precision: 7,
            }
        );
        assert_eq!(
            parse_mode("3", &args(&["c.jpg"])).unwrap(),
            Mode::Gauss {
                image: "c.jpg".to_string()
            }
        );
    }

    #[test]
    fn rejects_wrong_argument_counts() {
        assert!(parse_mode("1", &args(&[])).is_err());
        assert!(parse_mode("3", &args(&["a", "b"])).is_err());
        assert!(parse_mode("2", &args(&["a", "b"])).is_err());
    }

    #[test]
    fn rejects_bad_precision_and_mode() {
        for bad in ["-1", "11", "x"] {
            let err = parse_mode("2", &args(&["a", "b", bad])).unwrap_err();
            assert_eq!(err, "Precision must be in range [0 ..10]");
        }
        assert!(parse_mode("4", &args(&["a"])).is_err());
        assert!(parse_mode("0", &args(&["a"])).is_err());
    }

    #[test]
    fn example_config_matches_defaults() {
        let parsed: Config = serde_json::from_str(EXAMPLE_JSON).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
