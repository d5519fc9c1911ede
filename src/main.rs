use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pension_report::{ReportConfig, Response, handle_request};

/// Render a pension scenario study request (JSON) as a PDF report.
#[derive(Parser, Debug)]
#[command(name = "pension-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Request JSON file, or `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output PDF file or directory (defaults to the report's own filename)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file overriding rendering parameters
    #[arg(long)]
    config: Option<PathBuf>,
}

fn read_input(path: &Path) -> std::io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}

fn output_path(output: Option<PathBuf>, filename: &str) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => dir.join(filename),
        Some(path) => path,
        None => PathBuf::from(filename),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ReportConfig::from_path(path),
        None => Ok(ReportConfig::from_env()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pension-report: {e}");
            return ExitCode::FAILURE;
        }
    };

    let body = match read_input(&args.input) {
        Ok(body) => body,
        Err(e) => {
            eprintln!("pension-report: {}: {e}", args.input.display());
            return ExitCode::FAILURE;
        }
    };

    match handle_request(&body, &config) {
        Response::Document {
            filename, bytes, ..
        } => {
            let target = output_path(args.output, &filename);
            if let Err(e) = std::fs::write(&target, &bytes) {
                eprintln!("pension-report: {}: {e}", target.display());
                return ExitCode::FAILURE;
            }
            println!("{}", target.display());
            ExitCode::SUCCESS
        }
        Response::Failure { payload, .. } => {
            match serde_json::to_string(&payload) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}", payload.error),
            }
            ExitCode::FAILURE
        }
    }
}
