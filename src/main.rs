use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use lectern::config::Config;
use lectern::pipeline::{build_pipeline, Collaborators, DocumentPair};

/// Lectern: evaluate a generated README against a reference README.
///
/// Scores lexical and semantic similarity, topic overlap, readability and
/// named entities, and asks an LLM judge for a rubric.
#[derive(Parser)]
#[command(name = "lectern", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a generated README against a reference README
    Compare {
        /// Path to the generated README
        generated: PathBuf,

        /// Path to the reference (user-written) README
        reference: PathBuf,

        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8000)
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Generate a README for a GitHub repository
    Generate {
        /// Repository as owner/repo
        repo: String,

        /// Branch to read the file tree from (default: main)
        #[arg(long, default_value = "main")]
        branch: String,

        /// Write the README here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Download the ONNX embedding and NER models (~200 MB)
    DownloadModels,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lectern=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            generated,
            reference,
            json,
        } => {
            let config = Config::load()?;
            if let Err(e) = config.require_models() {
                eprintln!("{}", e.to_string().yellow());
            }

            let (generated_text, reference_text) = futures::future::try_join(
                read_document(&generated),
                read_document(&reference),
            )
            .await?;

            let pipeline = build_pipeline(Collaborators::load(&config));
            let report = pipeline
                .evaluate(DocumentPair::new(generated_text, reference_text))
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                lectern::output::terminal::display_report(&report);
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let pipeline = build_pipeline(Collaborators::load(&config));
            lectern::web::run_server(pipeline, port, &bind).await?;
        }

        Commands::Generate {
            repo,
            branch,
            output,
        } => {
            let config = Config::load()?;
            config.require_judge()?;

            let repo = lectern::generate::github::RepoRef::parse(&repo)?;
            let github = lectern::generate::github::GitHubClient::new(
                &config.github_api_url,
                config.github_token.clone(),
            )?;
            let model = lectern::judge::gemini::GeminiClient::new(config.gemini_options())?;
            let generator = lectern::generate::ReadmeGenerator::new(github, Arc::new(model));

            let readme = generator.generate(&repo, &branch).await?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &readme)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "README written");
                    println!("README for {repo} written to {}", path.display());
                    println!(
                        "{}",
                        format!(
                            "Compare it with: lectern compare {} <your README>",
                            path.display()
                        )
                        .dimmed()
                    );
                }
                None => println!("{readme}"),
            }
        }

        Commands::DownloadModels => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX models...");
            println!("  Destination: {}", model_dir.display());

            lectern::models::download::download_models(model_dir).await?;

            println!("\n{}", "Models downloaded successfully.".bold());
            println!("You can now run `lectern compare` or `lectern serve`.");
        }
    }

    Ok(())
}

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}
