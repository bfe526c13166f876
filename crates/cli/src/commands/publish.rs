//! `termforge publish <term>` — open the glossary pull request.

use std::sync::Arc;

use termforge_core::CacheStrategy;
use termforge_github::GithubClient;
use termforge_service::PublishService;

use crate::{connect_storage, require_env};

pub(crate) async fn run(
    term: &str,
    owner: String,
    repo: String,
    refresh: bool,
) -> anyhow::Result<()> {
    let storage = connect_storage().await?;
    let github = GithubClient::new(require_env("GITHUB_TOKEN")?, owner, repo)?;

    let service = PublishService::new(storage, Arc::new(github));
    let strategy = if refresh { CacheStrategy::Revalidate } else { CacheStrategy::Stale };
    let outcome = service.run(term, strategy).await?;

    if outcome.reused {
        println!("already published: {}", outcome.pr_url);
    } else {
        println!("opened pull request: {}", outcome.pr_url);
    }
    Ok(())
}
