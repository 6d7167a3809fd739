// README generator: draft a README for a GitHub repository.
//
// Lists the repository tree, renders it into a generation prompt and sends
// that through the same LanguageModel the judge uses. The result can be fed
// straight back into `compare` against the repository's real README.

pub mod github;
pub mod prompt;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::judge::traits::LanguageModel;

use self::github::{GitHubClient, RepoFile, RepoRef};
use self::prompt::render_generation_prompt;

/// Returned in place of a README when the model replies with nothing.
pub const EMPTY_REPLY: &str = "Error generating README.";

pub struct ReadmeGenerator {
    github: GitHubClient,
    model: Arc<dyn LanguageModel>,
}

impl ReadmeGenerator {
    pub fn new(github: GitHubClient, model: Arc<dyn LanguageModel>) -> Self {
        Self { github, model }
    }

    /// Generate a README for `repo` at `branch`.
    pub async fn generate(&self, repo: &RepoRef, branch: &str) -> Result<String> {
        let files = self.github.fetch_tree(repo, branch).await?;
        info!(repo = %repo, branch, files = files.len(), "Generating README");
        generate_from_files(self.model.as_ref(), &files).await
    }
}

/// Generate a README from an already-fetched file listing.
pub async fn generate_from_files(model: &dyn LanguageModel, files: &[RepoFile]) -> Result<String> {
    let prompt = render_generation_prompt(files);
    let reply = model.generate(&prompt).await?;

    if reply.trim().is_empty() {
        warn!("Model returned an empty README");
        return Ok(EMPTY_REPLY.to_string());
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl LanguageModel for Echo {
        async fn generate(&self, prompt: &str) -> Result<String> {
            assert!(prompt.contains("Cargo.toml"));
            Ok(self.0.to_string())
        }
    }

    fn listing() -> Vec<RepoFile> {
        vec![RepoFile {
            path: "Cargo.toml".to_string(),
            kind: "blob".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_returns_model_reply() {
        let readme = generate_from_files(&Echo("# demo\n"), &listing()).await.unwrap();
        assert_eq!(readme, "# demo\n");
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_message() {
        let readme = generate_from_files(&Echo("  \n"), &listing()).await.unwrap();
        assert_eq!(readme, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let err = generate_from_files(&crate::judge::traits::UnconfiguredModel, &listing())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
