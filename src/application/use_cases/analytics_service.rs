// ============================================================
// ANALYTICS SERVICE
// ============================================================
// Snapshot building, single-flight refresh and query entry points

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::application::use_cases::csv_ingestor::{CsvIngestor, LoadedCsv};
use crate::application::use_cases::filter_engine::{
    filter_questions, paginate, sort_questions, QuestionPage, RowQuery,
};
use crate::application::use_cases::question_aggregator::aggregate_questions;
use crate::application::use_cases::rollup_calculator::{
    analytics_stats, company_rollups, range_stats,
};
use crate::application::use_cases::row_normalizer::normalize_lines;
use crate::domain::analytics::{AnalyticsSnapshot, CommitInfo, RangeStats, SnapshotMetadata};
use crate::domain::csv::DataOrigin;
use crate::domain::error::{AppError, Result};
use crate::domain::filter::{FilterState, SortState};
use crate::domain::question::Question;
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::github::CommitInfoProvider;

const LOG_SOURCE: &str = "Analytics";

/// Filter, sort and page request over the current snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionQuery {
    pub filters: FilterState,
    pub sort: SortState,
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// Parse, normalize, aggregate and summarize one CSV document.
pub fn build_snapshot(
    text: &str,
    origin: DataOrigin,
    commit: CommitInfo,
    log: &ActivityLog,
) -> Result<AnalyticsSnapshot> {
    let parsed = CsvParser::new().parse_content(text)?;
    let batch = normalize_lines(&parsed.header, &parsed.lines);

    if batch.skipped() > 0 {
        log.warn(
            LOG_SOURCE,
            &format!("Skipped {} invalid CSV rows", batch.skipped()),
        );
    }
    if batch.rows.is_empty() {
        return Err(AppError::DataProcessingError(
            "No valid rows found in CSV data".to_string(),
        ));
    }

    let questions = aggregate_questions(&batch.rows);
    let companies = company_rollups(&questions);
    let stats = analytics_stats(&questions);
    let ranges = range_stats(&questions);

    log.info(
        LOG_SOURCE,
        &format!(
            "Processed {} rows into {} questions across {} companies",
            batch.rows.len(),
            questions.len(),
            companies.len()
        ),
    );

    let metadata = SnapshotMetadata {
        snapshot_id: uuid::Uuid::new_v4().to_string(),
        processed_at: Utc::now(),
        last_updated: commit.date,
        last_commit_hash: commit.sha,
        commit_url: commit.url,
        commit_author: commit.author,
        commit_message: commit.message,
        source: origin,
        source_sha256: hex::encode(Sha256::digest(text.as_bytes())),
        row_count: batch.rows.len(),
        skipped_rows: batch.skipped(),
    };

    Ok(AnalyticsSnapshot {
        questions,
        companies,
        stats,
        ranges,
        metadata,
    })
}

/// Owns the current snapshot and serializes every reload.
pub struct AnalyticsService {
    ingestor: CsvIngestor,
    commits: Arc<dyn CommitInfoProvider>,
    log: ActivityLog,
    current: RwLock<Option<Arc<AnalyticsSnapshot>>>,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
}

impl AnalyticsService {
    pub fn new(ingestor: CsvIngestor, commits: Arc<dyn CommitInfoProvider>, log: ActivityLog) -> Self {
        Self {
            ingestor,
            commits,
            log,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn current(&self) -> Option<Arc<AnalyticsSnapshot>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn install(&self, snapshot: Arc<AnalyticsSnapshot>) {
        match self.current.write() {
            Ok(mut guard) => *guard = Some(snapshot),
            Err(poisoned) => *poisoned.into_inner() = Some(snapshot),
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Load from the primary source (falling back to the local copy) and
    /// replace the current snapshot.
    ///
    /// Concurrent calls run one at a time; a caller that waited while
    /// another reload finished gets that snapshot without fetching again.
    pub async fn refresh(&self) -> Result<Arc<AnalyticsSnapshot>> {
        let seen = self.generation.load(Ordering::SeqCst);
        let _guard = self.refresh_lock.lock().await;

        if self.generation.load(Ordering::SeqCst) != seen {
            if let Some(snapshot) = self.current() {
                tracing::debug!("Reusing snapshot from concurrent refresh");
                return Ok(snapshot);
            }
        }

        self.log.info(LOG_SOURCE, "Refreshing data");
        let (csv, commit) = tokio::join!(self.ingestor.load(), self.commits.last_commit());
        self.rebuild(csv?, commit)
    }

    /// Reload from the local copy only.
    pub async fn reload_local(&self) -> Result<Arc<AnalyticsSnapshot>> {
        let _guard = self.refresh_lock.lock().await;
        let (csv, commit) = tokio::join!(self.ingestor.load_fallback(), self.commits.last_commit());
        self.rebuild(csv?, commit)
    }

    /// Validate and process uploaded text; the result becomes current.
    pub async fn install_upload(&self, text: String) -> Result<Arc<AnalyticsSnapshot>> {
        let loaded = self.ingestor.accept_upload(text)?;
        let _guard = self.refresh_lock.lock().await;
        let commit = self.commits.last_commit().await;
        self.rebuild(loaded, commit)
    }

    fn rebuild(&self, loaded: LoadedCsv, commit: CommitInfo) -> Result<Arc<AnalyticsSnapshot>> {
        let snapshot = match build_snapshot(&loaded.text, loaded.origin, commit, &self.log) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(err) => {
                self.log.error(LOG_SOURCE, &format!("Processing failed: {}", err));
                return Err(err);
            }
        };
        self.install(snapshot.clone());
        Ok(snapshot)
    }

    /// Current snapshot, loading it on first use.
    pub async fn current_or_load(&self) -> Result<Arc<AnalyticsSnapshot>> {
        match self.current() {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh().await,
        }
    }

    pub async fn ranges(&self) -> Result<RangeStats> {
        Ok(self.current_or_load().await?.ranges)
    }

    pub async fn metadata(&self) -> Result<SnapshotMetadata> {
        Ok(self.current_or_load().await?.metadata.clone())
    }

    pub async fn query(&self, query: &QuestionQuery) -> Result<QueryResult> {
        let snapshot = self.current_or_load().await?;
        Ok(run_query(&snapshot, query))
    }

    pub async fn query_rows(
        &self,
        query: &RowQuery,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<QuestionPage> {
        let snapshot = self.current_or_load().await?;
        Ok(query.run(&snapshot.questions, offset, limit))
    }
}

pub fn run_query(snapshot: &AnalyticsSnapshot, query: &QuestionQuery) -> QueryResult {
    let mut matched = filter_questions(&snapshot.questions, &query.filters, &snapshot.ranges);
    sort_questions(&mut matched, query.sort);
    QueryResult {
        total_questions: matched.len(),
        questions: paginate(&matched, query.offset, query.limit),
        offset: query.offset,
        limit: query.limit,
    }
}
