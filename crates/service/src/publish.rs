//! Publishing a researched entry as a glossary pull request.

use std::sync::Arc;

use termforge_core::{normalize_term, term_slug, CacheStrategy, Entry};
use termforge_github::GithubClient;
use termforge_storage::MarketingStore;

use crate::error::ServiceError;
use crate::retry::retry_step;

/// Result of a publish run.
#[derive(Debug)]
pub struct PublishOutcome {
    pub entry: Entry,
    pub pr_url: String,
    /// True when an already-recorded PR URL was returned without touching
    /// GitHub.
    pub reused: bool,
}

/// Turns a stored entry with content into an open pull request.
pub struct PublishService {
    store: Arc<dyn MarketingStore>,
    github: Arc<GithubClient>,
}

impl PublishService {
    #[must_use]
    pub fn new(store: Arc<dyn MarketingStore>, github: Arc<GithubClient>) -> Self {
        Self { store, github }
    }

    /// Publishes the entry for a term.
    ///
    /// # Errors
    /// Fatal when no entry exists for the term or the entry has no content;
    /// otherwise whatever the store or GitHub steps report.
    pub async fn run(
        &self,
        term: &str,
        strategy: CacheStrategy,
    ) -> Result<PublishOutcome, ServiceError> {
        let term = normalize_term(term);
        let entry = self
            .store
            .entry_for_term(&term)
            .await?
            .ok_or_else(|| ServiceError::Fatal(format!("no entry found for term '{term}'")))?;

        if strategy.reuse_existing() {
            if let Some(url) = entry.github_pr_url.clone() {
                tracing::info!(term, url, "entry already published");
                return Ok(PublishOutcome { entry, pr_url: url, reused: true });
            }
        }

        // Content comes from an upstream authoring step; publishing a stub
        // file would open a PR nobody can merge.
        let content = entry.content.clone().ok_or_else(|| {
            ServiceError::Fatal(format!("entry for '{term}' has no content to publish"))
        })?;

        let slug = term_slug(&term);
        let mdx = render_mdx(&entry, &term, &slug, &content);

        let pr = retry_step("open pull request", || async {
            Ok(self.github.open_glossary_pr(&term, &slug, &mdx).await?)
        })
        .await?;

        self.store.set_github_pr_url(entry.id, &pr.html_url).await?;
        tracing::info!(term, url = pr.html_url, number = pr.number, "opened pull request");

        let mut entry = entry;
        entry.github_pr_url = Some(pr.html_url.clone());
        Ok(PublishOutcome { entry, pr_url: pr.html_url, reused: false })
    }
}

/// Renders the `.mdx` file: YAML frontmatter followed by the content body.
fn render_mdx(entry: &Entry, term: &str, slug: &str, content: &str) -> String {
    let title = entry.meta_title.as_deref().unwrap_or(term);
    let description = entry.meta_description.as_deref().unwrap_or_default();
    format!(
        "---\n\
         title: \"{title}\"\n\
         description: \"{description}\"\n\
         term: \"{term}\"\n\
         slug: \"{slug}\"\n\
         ---\n\n\
         {content}\n"
    )
}
