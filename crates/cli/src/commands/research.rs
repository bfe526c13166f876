//! `termforge research <term>` — run the enrichment pipeline.

use std::sync::Arc;

use termforge_core::CacheStrategy;
use termforge_llm::LlmClient;
use termforge_scrape::ScrapeClient;
use termforge_serp::SerpClient;
use termforge_service::ResearchPipeline;

use crate::{connect_storage, env_or, require_env};

const SERPER_DEFAULT_URL: &str = "https://google.serper.dev";
const FIRECRAWL_DEFAULT_URL: &str = "https://api.firecrawl.dev";
const LLM_DEFAULT_URL: &str = "https://api.openai.com";

pub(crate) async fn run(term: &str, refresh: bool) -> anyhow::Result<()> {
    let storage = connect_storage().await?;
    let serp = SerpClient::new(
        require_env("SERPER_API_KEY")?,
        env_or("SERPER_API_URL", SERPER_DEFAULT_URL),
    )?;
    let scrape = ScrapeClient::new(
        require_env("FIRECRAWL_API_KEY")?,
        env_or("FIRECRAWL_API_URL", FIRECRAWL_DEFAULT_URL),
    )?;
    let llm = LlmClient::new(
        require_env("TERMFORGE_LLM_API_KEY")?,
        env_or("TERMFORGE_LLM_API_URL", LLM_DEFAULT_URL),
    )?;

    let pipeline =
        ResearchPipeline::new(storage, Arc::new(serp), Arc::new(scrape), Arc::new(llm));
    let strategy = if refresh { CacheStrategy::Revalidate } else { CacheStrategy::Stale };
    let outcome = pipeline.run(term, strategy).await?;

    println!("{} ({})", outcome.message, outcome.entry.input_term);
    let mut by_source = std::collections::BTreeMap::<&str, Vec<&str>>::new();
    for keyword in &outcome.keywords {
        by_source.entry(keyword.source.as_str()).or_default().push(&keyword.keyword);
    }
    for (source, keywords) in by_source {
        println!("  {source}: {}", keywords.join(", "));
    }
    println!("{} keywords total", outcome.keywords.len());
    Ok(())
}
