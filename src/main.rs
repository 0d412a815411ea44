use clap::Parser;
use console::style;
use ginkgo_measurements::{run, Outcome, Settings};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ginkgo-measurements", version)]
#[command(about = "Flatten a Ginkgo benchmark report into measurements.json")]
struct Cli {
    /// Ginkgo results directory containing report.json
    directory: Option<PathBuf>,
}

// ── Progress ────────────────────────────────────────────────────────────────

fn spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {prefix:<12} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn finish_pass(pb: &ProgressBar, documents: usize, measurements: usize) {
    pb.finish_with_message(format!(
        "{}  {} documents, {} measurements",
        style("pass").green().bold(),
        documents,
        measurements
    ));
}

fn finish_fail(pb: &ProgressBar, msg: &str) {
    pb.finish_with_message(format!("{}  {}", style("fail").red().bold(), msg));
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let Some(dir) = cli.directory else {
        println!("error: no ginkgo results directory given");
        std::process::exit(-1);
    };

    let settings = Settings::default();
    let pb = spinner("measurements");
    pb.set_message(dir.display().to_string());

    match run(&dir, &settings) {
        Ok(Outcome::NoReport { report }) => {
            pb.finish_and_clear();
            log::debug!("{} does not exist", report.display());
            println!("no report file found.");
        }
        Ok(Outcome::Written {
            output,
            documents,
            measurements,
        }) => {
            finish_pass(&pb, documents, measurements);
            eprintln!("  {} {}", style("->").green().bold(), output.display());
        }
        Err(e) => {
            finish_fail(&pb, &dir.display().to_string());
            eprintln!("{} {}", style("error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}
