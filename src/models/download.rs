// Model download helper for the local ONNX models.
//
// Two models are fetched from HuggingFace:
// 1. all-MiniLM-L6-v2: sentence embeddings for semantic similarity (~90MB)
// 2. bert-base-NER (quantized): named entity tagging (~110MB)
//
// Each model gets its own subdirectory under a platform-appropriate data
// directory (~/.local/share/lectern/models/ on Linux).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// One file to fetch: path within the HuggingFace repo, and local name.
struct ModelFile {
    remote: &'static str,
    local: &'static str,
    large: bool,
}

/// A HuggingFace model and the files this crate needs from it.
struct ModelSource {
    label: &'static str,
    subdir: &'static str,
    base_url: &'static str,
    files: &'static [ModelFile],
}

const EMBEDDING_MODEL: ModelSource = ModelSource {
    label: "Sentence embedding model (all-MiniLM-L6-v2)",
    subdir: "all-MiniLM-L6-v2",
    base_url: "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main",
    files: &[
        ModelFile {
            remote: "tokenizer.json",
            local: "tokenizer.json",
            large: false,
        },
        ModelFile {
            remote: "onnx/model.onnx",
            local: "model.onnx",
            large: true,
        },
    ],
};

const NER_MODEL: ModelSource = ModelSource {
    label: "Named entity model (bert-base-NER)",
    subdir: "bert-base-NER",
    base_url: "https://huggingface.co/Xenova/bert-base-NER/resolve/main",
    files: &[
        ModelFile {
            remote: "tokenizer.json",
            local: "tokenizer.json",
            large: false,
        },
        ModelFile {
            remote: "onnx/model_quantized.onnx",
            local: "model_quantized.onnx",
            large: true,
        },
    ],
};

/// Returns the default directory for storing model files.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lectern")
        .join("models")
}

pub fn embedding_model_dir(base: &Path) -> PathBuf {
    base.join(EMBEDDING_MODEL.subdir)
}

pub fn ner_model_dir(base: &Path) -> PathBuf {
    base.join(NER_MODEL.subdir)
}

fn files_present(source: &ModelSource, base: &Path) -> bool {
    let dir = base.join(source.subdir);
    source.files.iter().all(|f| dir.join(f.local).exists())
}

/// Check whether the embedding model and its tokenizer exist.
pub fn embedding_files_present(base: &Path) -> bool {
    files_present(&EMBEDDING_MODEL, base)
}

/// Check whether the NER model and its tokenizer exist.
pub fn ner_files_present(base: &Path) -> bool {
    files_present(&NER_MODEL, base)
}

/// Download both ONNX models.
///
/// Skips files that already exist. Creates directories as needed.
pub async fn download_models(base: &Path) -> Result<()> {
    let client = reqwest::Client::new();
    for source in [&EMBEDDING_MODEL, &NER_MODEL] {
        download_model(&client, source, base).await?;
    }
    Ok(())
}

async fn download_model(client: &reqwest::Client, source: &ModelSource, base: &Path) -> Result<()> {
    println!("\n{}:", source.label);

    let dir = base.join(source.subdir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    for file in source.files {
        let dest = dir.join(file.local);
        if dest.exists() {
            info!(file = file.local, model = source.subdir, "Model file already exists, skipping");
            println!("  {} (already exists)", file.local);
            continue;
        }

        println!("  Downloading {}...", file.local);
        let url = format!("{}/{}", source.base_url, file.remote);
        download_file(client, &url, &dest, file.large).await?;
    }

    Ok(())
}

/// Stream one file to disk, optionally with a progress bar.
///
/// Writes to a `.part` file first so an interrupted download is not mistaken
/// for a complete one on the next run.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    show_progress: bool,
) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = show_progress.then(|| progress_bar(response.content_length()));

    let partial = dest.with_extension("part");
    let mut out = tokio::fs::File::create(&partial)
        .await
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        out.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }
    out.flush().await?;
    drop(out);

    tokio::fs::rename(&partial, dest)
        .await
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!(url, dest = %dest.display(), "Downloaded model file");
    Ok(())
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        }
    }
}
