// GitHub git-trees client for the README generator.
//
// One call: `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`, which
// lists every path in the repository at that branch. Unauthenticated requests
// work for public repositories; a token raises the rate limit.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// A repository named as `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse `owner/repo`. A leading `https://github.com/` and a trailing
    /// `.git` or slash are tolerated.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let path = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .or_else(|| trimmed.strip_prefix("github.com/"))
            .unwrap_or(trimmed)
            .trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);

        match path.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => anyhow::bail!("Expected a repository as owner/repo, got {input:?}"),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One entry of a repository tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepoFile {
    pub path: String,
    /// `blob` for files, `tree` for directories
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<RepoFile>,
    #[serde(default)]
    truncated: bool,
}

/// Client for the GitHub REST API.
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// List every path in the repository at `branch`.
    pub async fn fetch_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<RepoFile>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}",
            self.base_url, repo.owner, repo.name, branch
        );

        let mut request = self
            .client
            .get(&url)
            .query(&[("recursive", "1")])
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.context("Failed to load repo")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to load repo {repo}@{branch}: GitHub returned {status}: {body}");
        }

        let parsed: TreeResponse = response
            .json()
            .await
            .context("Failed to parse GitHub tree response")?;

        if parsed.truncated {
            warn!(repo = %repo, "GitHub truncated the repository tree");
        }
        debug!(repo = %repo, branch, entries = parsed.tree.len(), "Fetched repository tree");

        Ok(parsed.tree)
    }
}
