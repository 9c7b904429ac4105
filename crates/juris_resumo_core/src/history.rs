//! crates/juris_resumo_core/src/history.rs
//!
//! Append-only history of summary entries and the last-generation cache.
//!
//! The whole history is one JSON list under the `history` key; every read
//! deserializes all of it. Filtering and sorting happen in memory on read.

use crate::domain::{Summaries, SummaryEntry};
use crate::ports::PortResult;
use crate::store::{JsonStore, HISTORY_KEY, LAST_RAW_TEXT_KEY, LAST_SUMMARIES_KEY};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::OnceLock;

/// Stored in place of a case number the technical summary did not contain.
pub const CASE_NUMBER_NOT_FOUND: &str = "Não encontrado";

fn case_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\*\*Número do Processo:\*\*\s*(.*)").expect("static regex")
    })
}

/// Pulls the docket number out of the `**Número do Processo:**` line.
pub fn extract_case_number(technical_summary: &str) -> String {
    case_number_pattern()
        .captures(technical_summary)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| CASE_NUMBER_NOT_FOUND.to_string())
}

/// Builds the record for one successful generation. Missing halves are stored
/// as empty strings.
pub fn new_entry(
    summaries: &Summaries,
    raw_text: &str,
    original_file_name: Option<String>,
    now: DateTime<Utc>,
) -> SummaryEntry {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let technical = summaries.technical.clone().unwrap_or_default();
    SummaryEntry {
        id: stamp.clone(),
        date: stamp,
        process_number: extract_case_number(&technical),
        summary_technical: technical,
        summary_simplified: summaries.simplified.clone().unwrap_or_default(),
        original_file_name,
        raw_text: raw_text.to_string(),
    }
}

/// Entries matching `term` on case number (case-insensitive) or date, newest first.
pub fn search(entries: Vec<SummaryEntry>, term: &str) -> Vec<SummaryEntry> {
    let needle = term.trim().to_lowercase();
    let mut matched: Vec<SummaryEntry> = entries
        .into_iter()
        .filter(|entry| {
            if needle.is_empty() {
                return true;
            }
            if entry.process_number.to_lowercase().contains(&needle) {
                return true;
            }
            let local_date = entry
                .parsed_date()
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default();
            local_date.contains(&needle) || entry.date.to_lowercase().contains(&needle)
        })
        .collect();
    matched.sort_by_key(|entry| Reverse(entry.parsed_date()));
    matched
}

pub struct HistoryStore {
    store: JsonStore,
}

impl HistoryStore {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// All entries in insertion order. Missing or corrupt data reads as empty.
    pub async fn get_history(&self) -> Vec<SummaryEntry> {
        self.store.load(HISTORY_KEY).await.unwrap_or_default()
    }

    /// Appends `entry`. If the current history cannot be read nothing is written.
    pub async fn save_summary(&self, entry: SummaryEntry) -> PortResult<()> {
        let mut history: Vec<SummaryEntry> =
            self.store.try_load(HISTORY_KEY).await?.unwrap_or_default();
        history.push(entry);
        self.store.save(HISTORY_KEY, &history).await
    }

    pub async fn clear_history(&self) -> PortResult<()> {
        self.store.remove(HISTORY_KEY).await
    }

    pub async fn find(&self, id: &str) -> Option<SummaryEntry> {
        self.get_history().await.into_iter().find(|entry| entry.id == id)
    }
}

/// The most recent generation, kept so a client can restore it after a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastGeneration {
    pub summaries: CachedSummaries,
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedSummaries {
    pub technical: String,
    pub simplified: String,
}

pub struct LastGenerationCache {
    store: JsonStore,
}

impl LastGenerationCache {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub async fn save(&self, summaries: &Summaries, raw_text: &str) -> PortResult<()> {
        let cached = CachedSummaries {
            technical: summaries.technical.clone().unwrap_or_default(),
            simplified: summaries.simplified.clone().unwrap_or_default(),
        };
        self.store.save(LAST_SUMMARIES_KEY, &cached).await?;
        self.store.save_raw(LAST_RAW_TEXT_KEY, raw_text).await
    }

    /// Present only when both halves of the cache are.
    pub async fn load(&self) -> Option<LastGeneration> {
        let summaries: CachedSummaries = self.store.load(LAST_SUMMARIES_KEY).await?;
        let raw_text = self.store.load_raw(LAST_RAW_TEXT_KEY).await?;
        Some(LastGeneration { summaries, raw_text })
    }
}
