//! GitHub REST client for publishing glossary entries as pull requests.
//!
//! One high-level flow: create (or reuse) a branch, put the rendered `.mdx`
//! file on it, and open a pull request against the default branch. Each REST
//! call is a thin method so the flow reads like the sequence it is.

mod error;

pub use error::GithubError;

use base64::Engine as _;
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://api.github.com";
const BASE_BRANCH: &str = "main";

/// A pull request as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

#[derive(Deserialize)]
struct RefObject {
    object: RefTarget,
}

#[derive(Deserialize)]
struct RefTarget {
    sha: String,
}

#[derive(Deserialize)]
struct ContentsReply {
    sha: String,
}

/// Client for the GitHub REST API, scoped to one repository.
pub struct GithubClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    owner: String,
    repo: String,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("token", &"***")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Creates a client for `owner/repo` using a personal access token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: String, owner: String, repo: String) -> Result<Self, GithubError> {
        Self::with_base_url(token, owner, repo, DEFAULT_API_URL.to_owned())
    }

    /// Same as [`GithubClient::new`] with an overridable API base URL
    /// (tests point this at a mock server).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(
        token: String,
        owner: String,
        repo: String,
        base_url: String,
    ) -> Result<Self, GithubError> {
        let client = reqwest::Client::builder()
            .user_agent("termforge")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GithubError::ClientInit(e.to_string()))?;
        Ok(Self { client, token, base_url: base_url.trim_end_matches('/').to_owned(), owner, repo })
    }

    /// Publishes glossary content for a slug: branch, file, pull request.
    ///
    /// Reuses an open PR for the branch when one exists; tolerates the
    /// branch already existing (HTTP 422); updates the file in place when it
    /// is already on the branch.
    ///
    /// # Errors
    /// Returns the first REST failure outside the tolerated cases.
    pub async fn open_glossary_pr(
        &self,
        term: &str,
        slug: &str,
        mdx_content: &str,
    ) -> Result<PullRequest, GithubError> {
        let branch = format!("glossary/add-{slug}");
        let path = format!("content/glossary/{slug}.mdx");

        let existing_pr = self.open_pull_for_branch(&branch).await?;
        if let Some(ref pr) = existing_pr {
            tracing::info!(url = %pr.html_url, "reusing open pull request");
        } else {
            let main_sha = self.ref_sha(&format!("heads/{BASE_BRANCH}")).await?;
            self.create_branch(&branch, &main_sha).await?;
        }

        let file_sha = self.file_sha(&path, &branch).await?;
        let action = if file_sha.is_some() { "Update" } else { "Add" };
        self.put_file(
            &path,
            &branch,
            &format!("feat(glossary): {action} {slug}.mdx"),
            mdx_content,
            file_sha.as_deref(),
        )
        .await?;

        match existing_pr {
            Some(pr) => Ok(pr),
            None => {
                let pr = self
                    .create_pull(
                        &format!("Add {term} to the glossary"),
                        &branch,
                        &format!("This PR adds the generated `{slug}.mdx` glossary entry."),
                    )
                    .await?;
                tracing::info!(url = %pr.html_url, "opened pull request");
                Ok(pr)
            },
        }
    }

    async fn open_pull_for_branch(&self, branch: &str) -> Result<Option<PullRequest>, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/pulls?head={}:{branch}&state=open",
            self.base_url, self.owner, self.repo, self.owner
        );
        let pulls: Vec<PullRequest> = self.get_json(&url).await?;
        Ok(pulls.into_iter().next())
    }

    async fn ref_sha(&self, git_ref: &str) -> Result<String, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/git/ref/{git_ref}",
            self.base_url, self.owner, self.repo
        );
        let reply: RefObject = self.get_json(&url).await?;
        Ok(reply.object.sha)
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<(), GithubError> {
        let url = format!("{}/repos/{}/{}/git/refs", self.base_url, self.owner, self.repo);
        let response = self
            .request(self.client.post(&url))
            .json(&serde_json::json!({ "ref": format!("refs/heads/{branch}"), "sha": sha }))
            .send()
            .await?;

        // 422 means the branch already exists; keep using it.
        if response.status().as_u16() == 422 {
            tracing::info!(branch, "branch already exists, using it");
            return Ok(());
        }
        Self::check_status(response).await.map(|_| ())
    }

    /// Sha of the file on the branch, or `None` when it does not exist yet.
    async fn file_sha(&self, path: &str, branch: &str) -> Result<Option<String>, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{path}?ref={branch}",
            self.base_url, self.owner, self.repo
        );
        let response = self.request(self.client.get(&url)).send().await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let body = Self::check_status(response).await?;
        let reply: ContentsReply = serde_json::from_str(&body)
            .map_err(|source| GithubError::Decode { context: "contents".to_owned(), source })?;
        Ok(Some(reply.sha))
    }

    async fn put_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<(), GithubError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{path}",
            self.base_url, self.owner, self.repo
        );
        let mut body = serde_json::json!({
            "message": message,
            "content": base64::engine::general_purpose::STANDARD.encode(content),
            "branch": branch,
        });
        if let Some(sha) = sha {
            body["sha"] = serde_json::Value::String(sha.to_owned());
        }
        let response = self.request(self.client.put(&url)).json(&body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn create_pull(
        &self,
        title: &str,
        head: &str,
        body: &str,
    ) -> Result<PullRequest, GithubError> {
        let url = format!("{}/repos/{}/{}/pulls", self.base_url, self.owner, self.repo);
        let response = self
            .request(self.client.post(&url))
            .json(&serde_json::json!({
                "title": title, "head": head, "base": BASE_BRANCH, "body": body
            }))
            .send()
            .await?;
        let body = Self::check_status(response).await?;
        serde_json::from_str(&body)
            .map_err(|source| GithubError::Decode { context: "create pull".to_owned(), source })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        let response = self.request(self.client.get(url)).send().await?;
        let body = Self::check_status(response).await?;
        serde_json::from_str(&body)
            .map_err(|source| GithubError::Decode { context: url.to_owned(), source })
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
    }

    async fn check_status(response: reqwest::Response) -> Result<String, GithubError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(GithubError::HttpStatus { code: status.as_u16(), body })
        }
    }
}
