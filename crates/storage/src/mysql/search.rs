//! SearchQueryStore and SearchResponseStore implementations for MySqlStorage.

use async_trait::async_trait;
use sqlx::Row;
use termforge_core::{
    sha256_hex, OrganicResult, Question, RelatedSearch, SearchData, SearchQuery, SearchRecord,
    Sitelink, TopStory,
};

use super::{term_key, MySqlStorage};
use crate::error::StorageError;
use crate::traits::{SearchQueryStore, SearchResponseStore};

#[async_trait]
impl SearchQueryStore for MySqlStorage {
    async fn search_query_for_term(
        &self,
        term: &str,
    ) -> Result<Option<SearchQuery>, StorageError> {
        let (_, input_term_hash) = term_key(term);
        let row = sqlx::query(
            "SELECT input_term, input_term_hash, query, created_at, updated_at
             FROM search_queries
             WHERE input_term_hash = ?",
        )
        .bind(&input_term_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(SearchQuery {
                input_term: r.try_get("input_term")?,
                input_term_hash: r.try_get("input_term_hash")?,
                query: r.try_get("query")?,
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            })
        })
        .transpose()
    }

    async fn upsert_search_query(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchQuery, StorageError> {
        sqlx::query(
            "INSERT INTO search_queries (input_term, input_term_hash, query)
             VALUES (?, ?, ?)
             ON DUPLICATE KEY UPDATE query = VALUES(query),
                                     updated_at = CURRENT_TIMESTAMP(6)",
        )
        .bind(&query.input_term)
        .bind(&query.input_term_hash)
        .bind(&query.query)
        .execute(&self.pool)
        .await?;

        self.search_query_for_term(&query.input_term).await?.ok_or(StorageError::NotFound {
            entity: "search_query",
            key: query.input_term_hash.clone(),
        })
    }
}

#[async_trait]
impl SearchResponseStore for MySqlStorage {
    async fn search_record(
        &self,
        input_term_hash: &str,
        query_hash: &str,
    ) -> Result<Option<SearchRecord>, StorageError> {
        let Some(head) = sqlx::query(
            "SELECT id, input_term, input_term_hash, query, query_hash, created_at, updated_at
             FROM search_responses
             WHERE input_term_hash = ? AND query_hash = ?",
        )
        .bind(input_term_hash)
        .bind(query_hash)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let response_id: i64 = head.try_get("id")?;
        let organic_results = self.load_organic_results(response_id).await?;

        let related_searches = sqlx::query(
            "SELECT query FROM search_related_searches
             WHERE search_response_id = ? ORDER BY id",
        )
        .bind(response_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|r| Ok(RelatedSearch { query: r.try_get("query")? }))
        .collect::<Result<Vec<_>, StorageError>>()?;

        let people_also_ask = sqlx::query(
            "SELECT question, snippet, link FROM search_people_also_ask
             WHERE search_response_id = ? ORDER BY id",
        )
        .bind(response_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|r| {
            Ok(Question {
                question: r.try_get("question")?,
                snippet: r.try_get("snippet")?,
                link: r.try_get("link")?,
            })
        })
        .collect::<Result<Vec<_>, StorageError>>()?;

        let top_stories = sqlx::query(
            "SELECT title, link, source, date FROM search_top_stories
             WHERE search_response_id = ? ORDER BY id",
        )
        .bind(response_id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|r| {
            Ok(TopStory {
                title: r.try_get("title")?,
                link: r.try_get("link")?,
                source: r.try_get("source")?,
                date: r.try_get("date")?,
            })
        })
        .collect::<Result<Vec<_>, StorageError>>()?;

        Ok(Some(SearchRecord {
            id: response_id,
            input_term: head.try_get("input_term")?,
            input_term_hash: head.try_get("input_term_hash")?,
            query: head.try_get("query")?,
            query_hash: head.try_get("query_hash")?,
            organic_results,
            related_searches,
            people_also_ask,
            top_stories,
            created_at: head.try_get("created_at")?,
            updated_at: head.try_get("updated_at")?,
        }))
    }

    async fn save_search_record(
        &self,
        term: &str,
        query: &str,
        data: &SearchData,
    ) -> Result<SearchRecord, StorageError> {
        let (input_term, input_term_hash) = term_key(term);
        let query_hash = sha256_hex(query);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO search_responses (input_term, input_term_hash, query, query_hash)
             VALUES (?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE updated_at = CURRENT_TIMESTAMP(6)",
        )
        .bind(&input_term)
        .bind(&input_term_hash)
        .bind(query)
        .bind(&query_hash)
        .execute(&mut *tx)
        .await?;

        let response_id: i64 = sqlx::query(
            "SELECT id FROM search_responses WHERE input_term_hash = ? AND query_hash = ?",
        )
        .bind(&input_term_hash)
        .bind(&query_hash)
        .fetch_one(&mut *tx)
        .await?
        .try_get("id")?;

        // Saving replaces the child rows wholesale; a re-search is a new
        // snapshot, not a merge.
        sqlx::query(
            "DELETE FROM search_sitelinks WHERE organic_result_id IN
             (SELECT id FROM search_organic_results WHERE search_response_id = ?)",
        )
        .bind(response_id)
        .execute(&mut *tx)
        .await?;
        for table in [
            "search_organic_results",
            "search_related_searches",
            "search_people_also_ask",
            "search_top_stories",
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE search_response_id = ?"))
                .bind(response_id)
                .execute(&mut *tx)
                .await?;
        }

        for result in &data.organic_results {
            let inserted = sqlx::query(
                "INSERT INTO search_organic_results
                     (search_response_id, title, link, link_hash, snippet, position)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(response_id)
            .bind(&result.title)
            .bind(&result.link)
            .bind(&result.link_hash)
            .bind(&result.snippet)
            .bind(result.position)
            .execute(&mut *tx)
            .await?;

            let organic_id = inserted.last_insert_id();
            for sitelink in &result.sitelinks {
                sqlx::query(
                    "INSERT INTO search_sitelinks (organic_result_id, title, link)
                     VALUES (?, ?, ?)",
                )
                .bind(organic_id)
                .bind(&sitelink.title)
                .bind(&sitelink.link)
                .execute(&mut *tx)
                .await?;
            }
        }

        for related in &data.related_searches {
            sqlx::query(
                "INSERT INTO search_related_searches (search_response_id, query) VALUES (?, ?)",
            )
            .bind(response_id)
            .bind(&related.query)
            .execute(&mut *tx)
            .await?;
        }

        for question in &data.people_also_ask {
            sqlx::query(
                "INSERT INTO search_people_also_ask (search_response_id, question, snippet, link)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(response_id)
            .bind(&question.question)
            .bind(&question.snippet)
            .bind(&question.link)
            .execute(&mut *tx)
            .await?;
        }

        for story in &data.top_stories {
            sqlx::query(
                "INSERT INTO search_top_stories (search_response_id, title, link, source, date)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(response_id)
            .bind(&story.title)
            .bind(&story.link)
            .bind(&story.source)
            .bind(&story.date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.search_record(&input_term_hash, &query_hash).await?.ok_or(StorageError::NotFound {
            entity: "search_response",
            key: format!("{input_term_hash}/{query_hash}"),
        })
    }
}

impl MySqlStorage {
    async fn load_organic_results(
        &self,
        response_id: i64,
    ) -> Result<Vec<OrganicResult>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, title, link, link_hash, snippet, position
             FROM search_organic_results
             WHERE search_response_id = ?
             ORDER BY position",
        )
        .bind(response_id)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in &rows {
            let organic_id: i64 = row.try_get("id")?;
            let sitelinks = sqlx::query(
                "SELECT title, link FROM search_sitelinks
                 WHERE organic_result_id = ? ORDER BY id",
            )
            .bind(organic_id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|s| Ok(Sitelink { title: s.try_get("title")?, link: s.try_get("link")? }))
            .collect::<Result<Vec<_>, StorageError>>()?;

            results.push(OrganicResult {
                title: row.try_get("title")?,
                link: row.try_get("link")?,
                link_hash: row.try_get("link_hash")?,
                snippet: row.try_get("snippet")?,
                position: row.try_get("position")?,
                sitelinks,
            });
        }
        Ok(results)
    }
}
