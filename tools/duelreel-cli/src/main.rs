//! Duelreel CLI - Render duel videos from seed strings
//!
//! # Usage
//!
//! ```bash
//! # One job: frames + audio under ./out
//! duelreel "ember fox" "river eel" --out out
//!
//! # Reproducible job
//! duelreel "ember fox" "river eel" --out out --entropy 42
//!
//! # Keep rendering a fresh duel every 10 minutes
//! duelreel "ember fox" "river eel" --out out --every 600
//!
//! # Hand the finished job to the upload stage (needs DUELREEL_UPLOAD_TOKEN)
//! duelreel "ember fox" "river eel" --out out --upload
//! ```

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use duelreel_core::assets::upload::{
    resolve_credential, CredentialStore, UploadBackend, UploadMetadata,
};
use duelreel_core::{
    run_job, JobError, JobOutput, JobSpec, NullTextPainter, PipelineConfig, PlaceholderBackend,
};

/// Render a duel between two seeded combatants
#[derive(Parser)]
#[command(name = "duelreel")]
#[command(about = "Render a duel between two seeded combatants")]
#[command(version)]
struct Cli {
    /// Seed string for combatant A (enters from the left, faces right)
    seed_a: String,

    /// Seed string for combatant B (enters from the right, faces left)
    seed_b: String,

    /// Output directory; each job gets a numbered subdirectory in loop mode
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Fixed entropy word for a reproducible job (default: fresh random)
    #[arg(long)]
    entropy: Option<u64>,

    /// Re-render a fresh duel every N seconds until interrupted
    #[arg(long, value_name = "SECONDS")]
    every: Option<u64>,

    /// Hand finished jobs to the upload stage
    #[arg(long)]
    upload: bool,
}

/// No secondary credential source is wired into the CLI; the environment
/// variable is the only place uploads can be configured from.
struct NoStore;

impl CredentialStore for NoStore {
    fn fetch(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Stand-in upload backend: logs what a real publisher would send and
/// reports the local path as the remote id.
struct DryRunUploader;

impl UploadBackend for DryRunUploader {
    fn upload(&self, file: &Path, meta: &UploadMetadata) -> duelreel_core::JobResult<String> {
        info!(
            file = %file.display(),
            title = %meta.title,
            tags = ?meta.tags,
            privacy = %meta.privacy,
            "dry-run upload"
        );
        Ok(file.display().to_string())
    }
}

fn upload_metadata(cli: &Cli, output: &JobOutput) -> UploadMetadata {
    UploadMetadata {
        title: format!("{} takes the duel!", output.winner_name),
        description: format!(
            "Seeded duel: \"{}\" vs \"{}\". Winner: {}.",
            cli.seed_a, cli.seed_b, output.winner_name
        ),
        tags: vec!["duel".into(), cli.seed_a.clone(), cli.seed_b.clone()],
        category: "entertainment".into(),
        privacy: "public".into(),
    }
}

fn run_once(cli: &Cli, out_dir: PathBuf, uploader: Option<&dyn UploadBackend>) -> Result<()> {
    let spec = JobSpec {
        seed_a: cli.seed_a.clone(),
        seed_b: cli.seed_b.clone(),
        entropy: cli.entropy.unwrap_or_else(rand::random),
        out_dir,
    };
    let cfg = PipelineConfig::default();
    let output = run_job(&cfg, &PlaceholderBackend, &NullTextPainter, &spec)?;
    info!(
        frames = output.frame_count,
        winner = %output.winner_name,
        dir = %output.frames_dir.display(),
        "job complete"
    );

    if let Some(uploader) = uploader {
        let id = uploader.upload(&output.audio_path, &upload_metadata(cli, &output))?;
        info!(%id, "upload complete");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // A missing credential disables uploads; it never fails the run.
    let uploader: Option<DryRunUploader> = if cli.upload {
        match resolve_credential("DUELREEL_UPLOAD_TOKEN", &NoStore, "upload-token") {
            Ok(_) => Some(DryRunUploader),
            Err(JobError::Configuration(msg)) => {
                warn!(%msg, "uploads disabled");
                None
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        None
    };
    let uploader = uploader.as_ref().map(|u| u as &dyn UploadBackend);

    match cli.every {
        None => run_once(&cli, cli.out.clone(), uploader),
        Some(secs) => {
            // Scheduler loop: a failed job is logged and skipped, the next
            // tick still fires.
            let mut iteration = 0u64;
            loop {
                let out_dir = cli.out.join(format!("job_{iteration:04}"));
                if let Err(e) = run_once(&cli, out_dir, uploader) {
                    error!(error = %e, iteration, "job failed");
                }
                iteration += 1;
                thread::sleep(Duration::from_secs(secs));
            }
        }
    }
}
