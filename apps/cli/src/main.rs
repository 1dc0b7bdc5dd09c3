use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use vidlens_core::{
    AnalysisRequester, DEFAULT_CHUNK_SIZE, HttpTransport, ServerConfig, UploadSession, is_video,
    save_analysis, spawn_preview, upload_video,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

#[derive(Debug, Parser)]
#[command(name = "vidlens")]
#[command(about = "Upload a video in chunks and fetch its AI-generated analysis")]
struct Cli {
    /// Path to the video file
    file: PathBuf,

    /// Analysis server base URL (overrides the VIDLENS_SERVER environment variable)
    #[arg(short, long)]
    server: Option<String>,

    /// Directory to save analysis.txt into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Play a muted local preview while the upload runs
    #[arg(long)]
    preview: bool,

    /// Chunk size in bytes (must be positive)
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = clap::value_parser!(u64).range(1..))]
    chunk_size: u64,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve the server address early
    let config = match cli.server {
        Some(url) => ServerConfig::new(url),
        None => match ServerConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{} {}", style("Error:").red().bold(), e);
                std::process::exit(1);
            }
        },
    };

    if !is_video(&cli.file) {
        eprintln!(
            "{} not a video file: {}",
            style("Error:").red().bold(),
            cli.file.display()
        );
        std::process::exit(1);
    }

    println!(
        "\n{}  {}\n",
        style("vidlens").cyan().bold(),
        style("Video Analyzer").dim()
    );

    // The handle keeps the player alive until the run ends.
    let _preview = if cli.preview {
        match spawn_preview(&cli.file) {
            Ok(handle) => {
                println!("{} Preview playing (muted)", style("✓").green().bold());
                Some(handle)
            }
            Err(e) => {
                eprintln!("{} {}", style("Error:").red().bold(), e);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    println!("{}", style("─".repeat(60)).dim());

    let total_start = Instant::now();
    let cancel = CancellationToken::new();

    // Step 1: chunked upload
    let step_start = Instant::now();
    let file_size = tokio::fs::metadata(&cli.file).await?.len();
    let session = UploadSession::with_chunk_size(file_size, cli.chunk_size);
    let transport = HttpTransport::new(config.clone());

    let spinner = create_spinner(&format!(
        "Uploading {} chunk(s) to {}...",
        session.total_chunks,
        config.base_url()
    ));
    upload_video(&transport, &session, &cli.file, &cancel).await?;
    spinner.finish_with_message(format!(
        "{} Uploaded: {} chunk(s) {}",
        style("✓").green().bold(),
        session.total_chunks,
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    // Step 2: analysis
    let step_start = Instant::now();
    let spinner = create_spinner("Requesting analysis...");
    let analysis = transport.request_analysis(&session.upload_id).await?;
    spinner.finish_with_message(format!(
        "{} Analysis received {}",
        style("✓").green().bold(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    println!("{}", style("─".repeat(60)).dim());
    println!("{}", analysis.text);
    println!("{}", style("─".repeat(60)).dim());

    if let Some(dir) = cli.output {
        let path = save_analysis(&analysis.text, &dir).await?;
        println!(
            "{} Saved analysis to {}",
            style("✓").green().bold(),
            style(path.display()).dim()
        );
    }

    println!(
        "\n{} Done in {}\n",
        style("✓").green().bold(),
        style(format_duration(total_start.elapsed())).bold()
    );

    Ok(())
}
