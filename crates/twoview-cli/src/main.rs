use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use twoview::pipeline::{run_two_view, TwoViewConfig, TwoViewInput, TwoViewReport};

/// Two-view epipolar geometry from pixel correspondences.
#[derive(Debug, Parser)]
#[command(author, version, about = "Fundamental, essential and relative pose from two views")]
struct Args {
    /// Path to JSON file containing TwoViewInput.
    #[arg(long)]
    input: String,

    /// Optional path to JSON TwoViewConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

fn write_report_json(report: &TwoViewReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn run_two_view_from_files(input_path: &str, config_path: Option<&str>) -> Result<String> {
    let input: TwoViewInput = load_json_file(Path::new(input_path))?;

    let config = if let Some(cfg_path) = config_path {
        load_json_file::<TwoViewConfig>(Path::new(cfg_path))?
    } else {
        TwoViewConfig::default()
    };

    info!(
        "running two-view estimation on {} correspondences",
        input.points_a.len()
    );
    let report = run_two_view(&input, &config)?;
    info!(
        "cheirality {:?}, sampson rms {:.4} px",
        report.geometry.cheirality.status, report.sampson.rms
    );
    write_report_json(&report)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let json = run_two_view_from_files(&args.input, args.config.as_deref())?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};
    use tempfile::NamedTempFile;
    use twoview::core::synthetic::noise::PixelJitter;
    use twoview::core::synthetic::two_view::TwoViewScene;
    use twoview::pipeline::{ReferenceFrame, SelectionStatus};

    fn write_json<T: serde::Serialize>(value: &T, path: &Path) {
        serde_json::to_writer_pretty(fs::File::create(path).unwrap(), value).unwrap();
    }

    fn synthetic_input() -> (TwoViewInput, TwoViewConfig) {
        let scene = TwoViewScene::standard(50, 12).unwrap();
        let noisy = scene.noisy_correspondences(&PixelJitter {
            seed: 3,
            amplitude_px: 0.3,
        });
        let input = TwoViewInput::from_parts(&noisy, &scene.k_a, &scene.k_b);
        let config = TwoViewConfig {
            reference_frame: ReferenceFrame::SecondCamera,
            ..TwoViewConfig::default()
        };
        (input, config)
    }

    #[test]
    fn helper_smoke_test() {
        let (input, config) = synthetic_input();
        let input_file = NamedTempFile::new().unwrap();
        let config_file = NamedTempFile::new().unwrap();

        write_json(&input, input_file.path());
        write_json(&config, config_file.path());

        let json = run_two_view_from_files(
            input_file.path().to_str().unwrap(),
            Some(config_file.path().to_str().unwrap()),
        )
        .expect("cli helper should succeed");

        let report: TwoViewReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.geometry.reference_frame, ReferenceFrame::SecondCamera);
        assert_eq!(report.geometry.cheirality.status, SelectionStatus::Resolved);
        assert!(report.sampson.rms < 1.0, "sampson rms too high: {}", report.sampson.rms);
    }

    #[test]
    fn missing_input_file_is_reported() {
        let err = run_two_view_from_files("/nonexistent/twoview-input.json", None).unwrap_err();
        assert!(format!("{err:#}").contains("reading"));
    }

    #[test]
    fn too_few_points_fail() {
        let (mut input, _) = synthetic_input();
        input.points_a.truncate(5);
        input.points_b.truncate(5);
        let input_file = NamedTempFile::new().unwrap();
        write_json(&input, input_file.path());

        let err = run_two_view_from_files(input_file.path().to_str().unwrap(), None).unwrap_err();
        assert!(err.to_string().contains("at least 8"), "{err}");
    }
}
