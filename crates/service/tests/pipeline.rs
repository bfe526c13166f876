//! End-to-end pipeline tests against an in-memory store and mock providers.
//!
//! The store traits get a `Mutex`-backed implementation here; the HTTP
//! clients talk to wiremock servers. `.expect(1)` mounts prove that a rerun
//! with warm caches issues no further provider calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use termforge_core::{
    normalize_term, sha256_hex, CacheStrategy, Entry, EvalRecord, Keyword, KeywordInput,
    KeywordSource, ScrapeInput, ScrapeRecord, SearchData, SearchQuery, SearchRecord,
};
use termforge_github::GithubClient;
use termforge_llm::LlmClient;
use termforge_scrape::ScrapeClient;
use termforge_serp::SerpClient;
use termforge_service::{PublishService, ResearchPipeline, ServiceError};
use termforge_storage::{
    EntryStore, EvalStore, KeywordStore, ScrapeStore, SearchQueryStore, SearchResponseStore,
    StorageError,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct MemoryStore {
    entries: Mutex<Vec<Entry>>,
    queries: Mutex<HashMap<String, SearchQuery>>,
    responses: Mutex<HashMap<(String, String), SearchRecord>>,
    scrapes: Mutex<HashMap<String, ScrapeRecord>>,
    keywords: Mutex<Vec<Keyword>>,
    evals: Mutex<Vec<EvalRecord>>,
    next_id: Mutex<i64>,
}

impl MemoryStore {
    fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }

    /// Test seeding: an entry with authored content, as the research and
    /// authoring steps would have left it.
    fn seed_entry(&self, term: &str, content: Option<&str>, pr_url: Option<&str>) -> Entry {
        let term = normalize_term(term);
        let now = Utc::now();
        let entry = Entry {
            id: self.next_id(),
            input_term_hash: sha256_hex(&term),
            input_term: term,
            meta_title: Some("Seeded title".to_owned()),
            meta_description: Some("Seeded description".to_owned()),
            content: content.map(str::to_owned),
            github_pr_url: pr_url.map(str::to_owned),
            created_at: now,
            updated_at: now,
        };
        self.entries.lock().unwrap().push(entry.clone());
        entry
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn ensure_entry(&self, term: &str) -> Result<Entry, StorageError> {
        let term = normalize_term(term);
        let hash = sha256_hex(&term);
        if let Some(existing) =
            self.entries.lock().unwrap().iter().find(|e| e.input_term_hash == hash)
        {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let entry = Entry {
            id: self.next_id(),
            input_term: term,
            input_term_hash: hash,
            meta_title: None,
            meta_description: None,
            content: None,
            github_pr_url: None,
            created_at: now,
            updated_at: now,
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn entry_for_term(&self, term: &str) -> Result<Option<Entry>, StorageError> {
        let hash = sha256_hex(&normalize_term(term));
        Ok(self.entries.lock().unwrap().iter().find(|e| e.input_term_hash == hash).cloned())
    }

    async fn set_github_pr_url(&self, entry_id: i64, url: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or(StorageError::NotFound { entity: "entry", key: entry_id.to_string() })?;
        entry.github_pr_url = Some(url.to_owned());
        Ok(())
    }
}

#[async_trait]
impl SearchQueryStore for MemoryStore {
    async fn search_query_for_term(
        &self,
        term: &str,
    ) -> Result<Option<SearchQuery>, StorageError> {
        let hash = sha256_hex(&normalize_term(term));
        Ok(self.queries.lock().unwrap().get(&hash).cloned())
    }

    async fn upsert_search_query(&self, query: &SearchQuery) -> Result<SearchQuery, StorageError> {
        self.queries.lock().unwrap().insert(query.input_term_hash.clone(), query.clone());
        Ok(query.clone())
    }
}

#[async_trait]
impl SearchResponseStore for MemoryStore {
    async fn search_record(
        &self,
        input_term_hash: &str,
        query_hash: &str,
    ) -> Result<Option<SearchRecord>, StorageError> {
        let key = (input_term_hash.to_owned(), query_hash.to_owned());
        Ok(self.responses.lock().unwrap().get(&key).cloned())
    }

    async fn save_search_record(
        &self,
        term: &str,
        query: &str,
        data: &SearchData,
    ) -> Result<SearchRecord, StorageError> {
        let term = normalize_term(term);
        let now = Utc::now();
        let record = SearchRecord {
            id: self.next_id(),
            input_term_hash: sha256_hex(&term),
            input_term: term,
            query: query.to_owned(),
            query_hash: sha256_hex(query),
            organic_results: data.organic_results.clone(),
            related_searches: data.related_searches.clone(),
            people_also_ask: data.people_also_ask.clone(),
            top_stories: data.top_stories.clone(),
            created_at: now,
            updated_at: now,
        };
        let key = (record.input_term_hash.clone(), record.query_hash.clone());
        self.responses.lock().unwrap().insert(key, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ScrapeStore for MemoryStore {
    async fn scrape_for_url(&self, url_hash: &str) -> Result<Option<ScrapeRecord>, StorageError> {
        Ok(self.scrapes.lock().unwrap().get(url_hash).cloned())
    }

    async fn upsert_scrape(&self, input: &ScrapeInput) -> Result<ScrapeRecord, StorageError> {
        let now = Utc::now();
        let record = ScrapeRecord {
            id: self.next_id(),
            source_url: input.source_url.clone(),
            source_url_hash: input.source_url_hash.clone(),
            success: input.success,
            markdown: input.markdown.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            language: input.language.clone(),
            status_code: input.status_code,
            error: input.error.clone(),
            input_term: input.input_term.clone(),
            input_term_hash: input.input_term_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        self.scrapes.lock().unwrap().insert(record.source_url_hash.clone(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl KeywordStore for MemoryStore {
    async fn keywords_for_term(&self, term: &str) -> Result<Vec<Keyword>, StorageError> {
        let hash = sha256_hex(&normalize_term(term));
        Ok(self
            .keywords
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.input_term_hash == hash)
            .cloned()
            .collect())
    }

    async fn upsert_keywords(&self, inputs: &[KeywordInput]) -> Result<(), StorageError> {
        let mut keywords = self.keywords.lock().unwrap();
        for input in inputs {
            let existing = keywords.iter_mut().find(|k| {
                k.input_term_hash == input.input_term_hash && k.keyword_hash == input.keyword_hash
            });
            if let Some(existing) = existing {
                existing.updated_at = Utc::now();
                continue;
            }
            let now = Utc::now();
            keywords.push(Keyword {
                id: {
                    let mut id = self.next_id.lock().unwrap();
                    *id += 1;
                    *id
                },
                input_term: input.input_term.clone(),
                input_term_hash: input.input_term_hash.clone(),
                keyword: input.keyword.clone(),
                keyword_hash: input.keyword_hash.clone(),
                source: input.source,
                source_url: input.source_url.clone(),
                created_at: now,
                updated_at: now,
            });
        }
        Ok(())
    }

    async fn keywords_by_source(
        &self,
        term: &str,
        source: KeywordSource,
        keyword_hashes: &[String],
    ) -> Result<Vec<Keyword>, StorageError> {
        let hash = sha256_hex(&normalize_term(term));
        Ok(self
            .keywords
            .lock()
            .unwrap()
            .iter()
            .filter(|k| {
                k.input_term_hash == hash
                    && k.source == source
                    && keyword_hashes.contains(&k.keyword_hash)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EvalStore for MemoryStore {
    async fn eval_for_entry(
        &self,
        entry_id: i64,
        eval_type: &str,
    ) -> Result<Option<EvalRecord>, StorageError> {
        Ok(self
            .evals
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|e| e.entry_id == entry_id && e.eval_type == eval_type)
            .cloned())
    }

    async fn insert_eval(
        &self,
        entry_id: i64,
        eval_type: &str,
        ratings: &serde_json::Value,
        recommendation: &serde_json::Value,
    ) -> Result<EvalRecord, StorageError> {
        let record = EvalRecord {
            id: self.next_id(),
            entry_id,
            eval_type: eval_type.to_owned(),
            ratings: ratings.clone(),
            recommendation: recommendation.clone(),
            created_at: Utc::now(),
        };
        self.evals.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

fn llm_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

fn serp_body(link: &str, related: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "organic": [{
            "title": "API keys explained",
            "link": link,
            "snippet": "What API keys are and how to use them.",
            "position": 1
        }],
        "relatedSearches": related.iter().map(|q| serde_json::json!({ "query": q })).collect::<Vec<_>>()
    })
}

fn scrape_body(markdown: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "markdown": markdown,
            "metadata": {
                "title": "API keys explained",
                "description": "A guide",
                "language": "en",
                "statusCode": 200
            }
        }
    })
}

/// Mounts the LLM mocks for one full neutral-free run, each expected once.
async fn mount_happy_llm(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("best web search query"))
        .respond_with(llm_reply("{\"query\": \"what is an api key\"}"))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("detecting commercial bias"))
        .respond_with(llm_reply(
            "{\"commercialBias\": 2, \"neutralityScore\": 8, \"educationalValue\": 9}",
        ))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Based on the bias analysis"))
        .respond_with(llm_reply(
            "{\"recommendation\": \"use_current\", \"reasoning\": \"mostly educational\"}",
        ))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("page titles"))
        .respond_with(llm_reply("{\"keywords\": [\"api key rotation\"]}"))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("page headers"))
        .respond_with(llm_reply("{\"keywords\": [\"api key scopes\"]}"))
        .expect(1)
        .mount(server)
        .await;
}

struct Harness {
    store: Arc<MemoryStore>,
    pipeline: ResearchPipeline,
    _serp: MockServer,
    _scrape: MockServer,
    _llm: MockServer,
}

async fn harness(serp: MockServer, scrape: MockServer, llm: MockServer) -> Harness {
    let store = Arc::new(MemoryStore::default());
    let pipeline = ResearchPipeline::new(
        store.clone(),
        Arc::new(SerpClient::new("k".to_owned(), serp.uri()).unwrap()),
        Arc::new(ScrapeClient::new("k".to_owned(), scrape.uri()).unwrap()),
        Arc::new(LlmClient::new("k".to_owned(), llm.uri()).unwrap()),
    );
    Harness { store, pipeline, _serp: serp, _scrape: scrape, _llm: llm }
}

#[tokio::test]
async fn research_produces_keywords_from_all_three_sources() {
    let serp = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body(
            "https://example.com/api-keys",
            &["API key best practices"],
        )))
        .expect(1)
        .mount(&serp)
        .await;

    let scrape = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(scrape_body("# API Key\n\n## Usage")),
        )
        .expect(1)
        .mount(&scrape)
        .await;

    let llm = MockServer::start().await;
    mount_happy_llm(&llm).await;

    let h = harness(serp, scrape, llm).await;
    let outcome = h.pipeline.run("API Key", CacheStrategy::Stale).await.unwrap();

    let mut found = outcome
        .keywords
        .iter()
        .map(|k| (k.source.as_str(), k.keyword.as_str()))
        .collect::<Vec<_>>();
    found.sort_unstable();
    assert_eq!(
        found,
        vec![
            ("headers", "api key scopes"),
            ("related_searches", "api key best practices"),
            ("titles", "api key rotation"),
        ]
    );
    assert_eq!(outcome.entry.input_term, "api key");
}

#[tokio::test]
async fn second_run_reuses_all_persisted_work() {
    // Every provider mock allows exactly one call; a second hit from the
    // rerun would fail wiremock's verification on drop.
    let serp = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body(
            "https://example.com/api-keys",
            &["API key best practices"],
        )))
        .expect(1)
        .mount(&serp)
        .await;

    let scrape = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(scrape_body("# API Key\n\n## Usage")),
        )
        .expect(1)
        .mount(&scrape)
        .await;

    let llm = MockServer::start().await;
    mount_happy_llm(&llm).await;

    let h = harness(serp, scrape, llm).await;
    let first = h.pipeline.run("api key", CacheStrategy::Stale).await.unwrap();
    let second = h.pipeline.run("api key", CacheStrategy::Stale).await.unwrap();

    assert_eq!(second.message, "reused existing keywords");
    assert_eq!(second.keywords.len(), first.keywords.len());
    assert_eq!(second.entry.id, first.entry.id);
}

#[tokio::test]
async fn biased_results_trigger_a_neutral_research() {
    let serp = MockServer::start().await;
    // Neutral query mounted first so it wins for site-restricted bodies.
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("site:wikipedia.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body(
            "https://en.wikipedia.org/wiki/Application_programming_interface_key",
            &[],
        )))
        .expect(1)
        .mount(&serp)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body(
            "https://vendor.example.com/buy-api-keys",
            &["API key pricing"],
        )))
        .expect(1)
        .mount(&serp)
        .await;

    let scrape = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scrape_body("# API key")))
        .expect(1)
        .mount(&scrape)
        .await;

    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("best web search query"))
        .respond_with(llm_reply("{\"query\": \"what is an api key\"}"))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("detecting commercial bias"))
        .respond_with(llm_reply(
            "{\"commercialBias\": 9, \"neutralityScore\": 2, \"educationalValue\": 2}",
        ))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Based on the bias analysis"))
        .respond_with(llm_reply(
            "{\"recommendation\": \"fetch_neutral\", \"reasoning\": \"vendor dominated\"}",
        ))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("page titles"))
        .respond_with(llm_reply("{\"keywords\": [\"api key\"]}"))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("page headers"))
        .respond_with(llm_reply("{\"keywords\": []}"))
        .mount(&llm)
        .await;

    let h = harness(serp, scrape, llm).await;
    h.pipeline.run("api key", CacheStrategy::Stale).await.unwrap();

    // The scraped page is the neutral result, not the vendor one.
    let neutral_hash =
        sha256_hex("https://en.wikipedia.org/wiki/Application_programming_interface_key");
    assert!(h.store.scrape_for_url(&neutral_hash).await.unwrap().is_some());
    let vendor_hash = sha256_hex("https://vendor.example.com/buy-api-keys");
    assert!(h.store.scrape_for_url(&vendor_hash).await.unwrap().is_none());
}

#[tokio::test]
async fn an_unusable_generated_query_fails_without_retry() {
    let serp = MockServer::start().await;
    let scrape = MockServer::start().await;
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(llm_reply("{\"query\": \"   \"}"))
        .expect(1)
        .mount(&llm)
        .await;

    let h = harness(serp, scrape, llm).await;
    let error = h.pipeline.run("api key", CacheStrategy::Stale).await.unwrap_err();
    assert!(matches!(error, ServiceError::Fatal(_)), "got {error}");
}

#[tokio::test]
async fn a_transient_search_failure_is_retried() {
    let serp = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&serp)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body(
            "https://example.com/api-keys",
            &["API key best practices"],
        )))
        .expect(1)
        .mount(&serp)
        .await;

    let scrape = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scrape_body("# API Key")))
        .mount(&scrape)
        .await;

    let llm = MockServer::start().await;
    mount_happy_llm(&llm).await;

    let h = harness(serp, scrape, llm).await;
    let outcome = h.pipeline.run("api key", CacheStrategy::Stale).await.unwrap();
    assert!(!outcome.keywords.is_empty());
}

#[tokio::test]
async fn a_provider_scrape_failure_is_persisted_and_fails_the_run() {
    let serp = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body(
            "https://example.com/blocked",
            &["API key best practices"],
        )))
        .mount(&serp)
        .await;

    let scrape = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "page requires javascript"
        })))
        .mount(&scrape)
        .await;

    // No titles/headers mocks: the run never reaches keyword extraction.
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("best web search query"))
        .respond_with(llm_reply("{\"query\": \"what is an api key\"}"))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("detecting commercial bias"))
        .respond_with(llm_reply(
            "{\"commercialBias\": 2, \"neutralityScore\": 8, \"educationalValue\": 9}",
        ))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Based on the bias analysis"))
        .respond_with(llm_reply(
            "{\"recommendation\": \"use_current\", \"reasoning\": \"fine\"}",
        ))
        .mount(&llm)
        .await;

    let h = harness(serp, scrape, llm).await;
    let error = h.pipeline.run("api key", CacheStrategy::Stale).await.unwrap_err();
    assert!(matches!(error, ServiceError::Scrape(_)), "got {error}");

    // The failure is on record for the operator even though the run failed.
    let failed = h
        .store
        .scrape_for_url(&sha256_hex("https://example.com/blocked"))
        .await
        .unwrap()
        .unwrap();
    assert!(!failed.success);
    assert_eq!(failed.error.as_deref(), Some("page requires javascript"));
}

#[tokio::test]
async fn publish_opens_a_pull_request_and_records_the_url() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/pulls"))
        .and(query_param("state", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&github)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/git/ref/heads/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": { "sha": "abc123" }
        })))
        .mount(&github)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/site/git/refs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .mount(&github)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/content/glossary/api-key.mdx"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&github)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/content/glossary/api-key.mdx"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&github)
        .await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/site/pulls"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "number": 42,
            "html_url": "https://github.com/acme/site/pull/42"
        })))
        .expect(1)
        .mount(&github)
        .await;

    let store = Arc::new(MemoryStore::default());
    store.seed_entry("api key", Some("# API Key\n\nBody."), None);
    let client = GithubClient::with_base_url(
        "t".to_owned(),
        "acme".to_owned(),
        "site".to_owned(),
        github.uri(),
    )
    .unwrap();
    let service = PublishService::new(store.clone(), Arc::new(client));

    let outcome = service.run("api key", CacheStrategy::Stale).await.unwrap();
    assert!(!outcome.reused);
    assert_eq!(outcome.pr_url, "https://github.com/acme/site/pull/42");
    let stored = store.entry_for_term("api key").await.unwrap().unwrap();
    assert_eq!(stored.github_pr_url.as_deref(), Some("https://github.com/acme/site/pull/42"));
}

#[tokio::test]
async fn publish_reuses_a_recorded_pr_url_without_touching_github() {
    // No mocks mounted: any request to the server would 404 and fail.
    let github = MockServer::start().await;
    let store = Arc::new(MemoryStore::default());
    store.seed_entry("api key", Some("body"), Some("https://github.com/acme/site/pull/7"));
    let client = GithubClient::with_base_url(
        "t".to_owned(),
        "acme".to_owned(),
        "site".to_owned(),
        github.uri(),
    )
    .unwrap();
    let service = PublishService::new(store, Arc::new(client));

    let outcome = service.run("api key", CacheStrategy::Stale).await.unwrap();
    assert!(outcome.reused);
    assert_eq!(outcome.pr_url, "https://github.com/acme/site/pull/7");
}

#[tokio::test]
async fn publish_without_content_is_fatal() {
    let github = MockServer::start().await;
    let store = Arc::new(MemoryStore::default());
    store.seed_entry("api key", None, None);
    let client = GithubClient::with_base_url(
        "t".to_owned(),
        "acme".to_owned(),
        "site".to_owned(),
        github.uri(),
    )
    .unwrap();
    let service = PublishService::new(store, Arc::new(client));

    let error = service.run("api key", CacheStrategy::Stale).await.unwrap_err();
    assert!(matches!(error, ServiceError::Fatal(_)), "got {error}");
}

#[tokio::test]
async fn publish_for_an_unknown_term_is_fatal() {
    let github = MockServer::start().await;
    let store = Arc::new(MemoryStore::default());
    let client = GithubClient::with_base_url(
        "t".to_owned(),
        "acme".to_owned(),
        "site".to_owned(),
        github.uri(),
    )
    .unwrap();
    let service = PublishService::new(store, Arc::new(client));

    let error = service.run("never researched", CacheStrategy::Stale).await.unwrap_err();
    assert!(matches!(error, ServiceError::Fatal(_)), "got {error}");
}
