//! The research pipeline: get-or-create enrichment for one glossary term.
//!
//! Every step persists its output before the next step runs, so a rerun
//! after any failure resumes from the last completed step instead of
//! repeating paid provider calls. The [`CacheStrategy`] decides whether
//! persisted rows count as done (`Stale`) or get recomputed (`Revalidate`).

use std::sync::Arc;

use futures_util::future::try_join_all;
use termforge_core::{
    markdown_headers, normalize_term, sha256_hex, top_results, BiasAction, CacheStrategy, Entry,
    Keyword, KeywordInput, KeywordSource, ScrapeInput, ScrapeRecord, SearchQuery, SearchRecord,
    EVAL_TYPE_BRAND_BIAS, TOP_RESULT_COUNT,
};
use termforge_llm::LlmClient;
use termforge_scrape::{ScrapeClient, ScrapeError};
use termforge_serp::{neutral_query, SerpClient};
use termforge_storage::MarketingStore;

use crate::error::ServiceError;
use crate::retry::retry_step;

/// Everything the research run produced or reused.
#[derive(Debug)]
pub struct ResearchOutcome {
    pub entry: Entry,
    pub keywords: Vec<Keyword>,
    pub message: String,
}

/// Orchestrates search, bias evaluation, scraping, and keyword extraction
/// for one term against a shared store.
pub struct ResearchPipeline {
    store: Arc<dyn MarketingStore>,
    serp: Arc<SerpClient>,
    scrape: Arc<ScrapeClient>,
    llm: Arc<LlmClient>,
}

impl ResearchPipeline {
    #[must_use]
    pub fn new(
        store: Arc<dyn MarketingStore>,
        serp: Arc<SerpClient>,
        scrape: Arc<ScrapeClient>,
        llm: Arc<LlmClient>,
    ) -> Self {
        Self { store, serp, scrape, llm }
    }

    /// Runs the full pipeline for a term.
    ///
    /// # Errors
    /// Returns the first step error that is permanent or still failing
    /// after the per-step retry budget.
    pub async fn run(
        &self,
        term: &str,
        strategy: CacheStrategy,
    ) -> Result<ResearchOutcome, ServiceError> {
        let term = normalize_term(term);
        let entry = self.store.ensure_entry(&term).await?;

        if strategy.reuse_existing() {
            let existing = self.store.keywords_for_term(&term).await?;
            if !existing.is_empty() {
                tracing::info!(term, count = existing.len(), "keywords already researched");
                return Ok(ResearchOutcome {
                    entry,
                    keywords: existing,
                    message: "reused existing keywords".to_owned(),
                });
            }
        }

        tracing::info!(term, "1/6 resolving search query");
        let query =
            retry_step("search query", || self.ensure_search_query(&term, strategy)).await?;

        tracing::info!(term, "2/6 fetching search results");
        let record =
            retry_step("search results", || self.ensure_search_record(&term, &query, strategy))
                .await?;

        tracing::info!(term, "3/6 evaluating result bias");
        let action =
            retry_step("bias evaluation", || self.ensure_bias_eval(&entry, &record, strategy))
                .await?;

        let organic = match action {
            BiasAction::UseCurrent => record.organic_results,
            BiasAction::FetchNeutral => {
                tracing::info!(term, "3/6 results biased, re-searching neutral domains");
                let neutral = neutral_query(&query);
                let neutral_record = retry_step("neutral search", || {
                    self.ensure_search_record(&term, &neutral, strategy)
                })
                .await?;
                neutral_record.organic_results
            },
        };

        let top = top_results(&organic, TOP_RESULT_COUNT);
        tracing::info!(term, count = top.len(), "4/6 scraping top results");
        let scrapes = try_join_all(top.iter().map(|result| {
            let term = term.as_str();
            retry_step("scrape", move || self.ensure_scrape(&result.link, term, strategy))
        }))
        .await?;

        tracing::info!(term, "5/6 extracting keywords from titles and headers");
        let titles = scrapes.iter().filter_map(|s| s.title.clone()).collect::<Vec<_>>();
        let from_titles = retry_step("title keywords", || {
            self.ensure_llm_keywords(&term, KeywordSource::Titles, &titles, strategy)
        })
        .await?;

        let headers = scrapes
            .iter()
            .filter_map(|s| s.markdown.as_deref())
            .flat_map(markdown_headers)
            .collect::<Vec<_>>();
        let from_headers = retry_step("header keywords", || {
            self.ensure_llm_keywords(&term, KeywordSource::Headers, &headers, strategy)
        })
        .await?;

        tracing::info!(term, "6/6 storing related searches as keywords");
        let related =
            record.related_searches.iter().map(|r| r.query.clone()).collect::<Vec<_>>();
        let from_related = retry_step("related-search keywords", || {
            self.ensure_related_keywords(&term, &related, strategy)
        })
        .await?;

        let mut keywords = from_titles;
        keywords.extend(from_headers);
        keywords.extend(from_related);
        tracing::info!(term, count = keywords.len(), "research complete");

        Ok(ResearchOutcome { entry, keywords, message: "researched keywords".to_owned() })
    }

    /// Step 1: the canonical query for a term, generated once and reused.
    async fn ensure_search_query(
        &self,
        term: &str,
        strategy: CacheStrategy,
    ) -> Result<String, ServiceError> {
        if strategy.reuse_existing() {
            if let Some(existing) = self.store.search_query_for_term(term).await? {
                tracing::debug!(term, "reusing stored search query");
                return Ok(existing.query);
            }
        }
        let query = self.llm.generate_search_query(term).await?;
        if query.is_empty() {
            return Err(ServiceError::Fatal(format!("generated query for '{term}' is empty")));
        }
        let saved = self.store.upsert_search_query(&SearchQuery::new(term, query)).await?;
        Ok(saved.query)
    }

    /// Steps 2 and the neutral re-search: responses cache per
    /// (term, query) pair, so the neutral query gets its own row.
    async fn ensure_search_record(
        &self,
        term: &str,
        query: &str,
        strategy: CacheStrategy,
    ) -> Result<SearchRecord, ServiceError> {
        let term_hash = sha256_hex(term);
        let query_hash = sha256_hex(query);
        if strategy.reuse_existing() {
            if let Some(existing) = self.store.search_record(&term_hash, &query_hash).await? {
                tracing::debug!(term, "reusing stored search response");
                return Ok(existing);
            }
        }
        let data = self.serp.search(query).await?;
        Ok(self.store.save_search_record(term, query, &data).await?)
    }

    /// Step 3: rate the result set, then turn the ratings into an action.
    async fn ensure_bias_eval(
        &self,
        entry: &Entry,
        record: &SearchRecord,
        strategy: CacheStrategy,
    ) -> Result<BiasAction, ServiceError> {
        if strategy.reuse_existing() {
            if let Some(existing) =
                self.store.eval_for_entry(entry.id, EVAL_TYPE_BRAND_BIAS).await?
            {
                tracing::debug!(entry_id = entry.id, "reusing stored bias evaluation");
                return Ok(existing.bias_recommendation()?.recommendation);
            }
        }
        let ratings = self.llm.rate_bias(&record.organic_results).await?;
        let recommendation =
            self.llm.recommend_bias_action(&ratings, &record.organic_results).await?;
        self.store
            .insert_eval(
                entry.id,
                EVAL_TYPE_BRAND_BIAS,
                &serde_json::to_value(ratings)?,
                &serde_json::to_value(&recommendation)?,
            )
            .await?;
        Ok(recommendation.recommendation)
    }

    /// Step 4: one scrape per top URL, cached by URL across terms.
    ///
    /// Only successful cached rows count as hits; a failed row is retried
    /// on the next run. A fresh provider-side failure is persisted for
    /// visibility and then fails the invocation (the fan-out awaits
    /// jointly, with no partial results).
    async fn ensure_scrape(
        &self,
        url: &str,
        term: &str,
        strategy: CacheStrategy,
    ) -> Result<ScrapeRecord, ServiceError> {
        if strategy.reuse_existing() {
            if let Some(existing) = self.store.scrape_for_url(&sha256_hex(url)).await? {
                if existing.success {
                    tracing::debug!(url, "reusing stored scrape");
                    return Ok(existing);
                }
            }
        }
        match self.scrape.scrape(url, term).await {
            Ok(input) => Ok(self.store.upsert_scrape(&input).await?),
            Err(ScrapeError::Provider { url, reason }) => {
                tracing::warn!(url, reason, "scrape failed, persisting failure");
                self.store.upsert_scrape(&ScrapeInput::failure(&url, reason.clone())).await?;
                Err(ScrapeError::Provider { url, reason }.into())
            },
            Err(other) => Err(other.into()),
        }
    }

    /// Steps 5a/5b: LLM keyword extraction from scraped fragments.
    async fn ensure_llm_keywords(
        &self,
        term: &str,
        source: KeywordSource,
        fragments: &[String],
        strategy: CacheStrategy,
    ) -> Result<Vec<Keyword>, ServiceError> {
        if strategy.reuse_existing() {
            let existing = self.existing_by_source(term, source).await?;
            if !existing.is_empty() {
                tracing::debug!(term, source = source.as_str(), "reusing stored keywords");
                return Ok(existing);
            }
        }
        let raw = match source {
            KeywordSource::Titles => self.llm.keywords_from_titles(term, fragments).await?,
            KeywordSource::Headers => self.llm.keywords_from_headers(term, fragments).await?,
            KeywordSource::RelatedSearches => fragments.to_vec(),
        };
        self.persist_keywords(term, source, &raw).await
    }

    /// Step 6: related searches become keywords directly, no LLM pass.
    async fn ensure_related_keywords(
        &self,
        term: &str,
        related: &[String],
        strategy: CacheStrategy,
    ) -> Result<Vec<Keyword>, ServiceError> {
        self.ensure_llm_keywords(term, KeywordSource::RelatedSearches, related, strategy).await
    }

    async fn existing_by_source(
        &self,
        term: &str,
        source: KeywordSource,
    ) -> Result<Vec<Keyword>, ServiceError> {
        let all = self.store.keywords_for_term(term).await?;
        Ok(all.into_iter().filter(|k| k.source == source).collect())
    }

    /// Bulk upsert then re-read: MySQL multi-row upserts return no ids, so
    /// the authoritative rows come from the follow-up select.
    async fn persist_keywords(
        &self,
        term: &str,
        source: KeywordSource,
        raw: &[String],
    ) -> Result<Vec<Keyword>, ServiceError> {
        let inputs =
            raw.iter().map(|k| KeywordInput::new(term, k, source, None)).collect::<Vec<_>>();
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        self.store.upsert_keywords(&inputs).await?;
        let hashes = inputs.iter().map(|i| i.keyword_hash.clone()).collect::<Vec<_>>();
        Ok(self.store.keywords_by_source(term, source, &hashes).await?)
    }
}
