//! crates/juris_resumo_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! Stored records serialize with the camelCase field names of the persisted layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// A user as seen by the rest of the application. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub is_approved: bool,
    pub is_admin: bool,
}

// Only used inside the auth service and the `users` record - contains sensitive data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub is_approved: bool,
    pub is_admin: bool,
}

impl UserCredentials {
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            is_approved: self.is_approved,
            is_admin: self.is_admin,
        }
    }
}

/// A bearer-token login session. `user` is the snapshot taken at login time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// What a caller may reach, derived from the user record of its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessLevel {
    Anonymous,
    Pending,
    Approved,
    Admin,
}

impl AccessLevel {
    pub fn of(user: Option<&User>) -> Self {
        match user {
            None => AccessLevel::Anonymous,
            Some(u) if u.is_admin => AccessLevel::Admin,
            Some(u) if u.is_approved => AccessLevel::Approved,
            Some(_) => AccessLevel::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Anonymous => "anonymous",
            AccessLevel::Pending => "pending",
            AccessLevel::Approved => "approved",
            AccessLevel::Admin => "admin",
        }
    }
}

//=========================================================================================
// Summaries
//=========================================================================================

/// Requested length of the technical summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySize {
    Short,
    #[default]
    Medium,
    Long,
}

impl FromStr for SummarySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(SummarySize::Short),
            "medium" => Ok(SummarySize::Medium),
            "long" => Ok(SummarySize::Long),
            other => Err(format!("unknown summary size '{other}'")),
        }
    }
}

/// The two prompt templates a summary can be generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    #[default]
    Technical,
    Simplified,
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryKind::Technical => f.write_str("technical"),
            SummaryKind::Simplified => f.write_str("simplified"),
        }
    }
}

impl FromStr for SummaryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "technical" => Ok(SummaryKind::Technical),
            "simplified" => Ok(SummaryKind::Simplified),
            other => Err(format!("unknown summary kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    pub generate_technical: bool,
    pub generate_simplified: bool,
    pub size: SummarySize,
}

impl GenerationOptions {
    pub fn is_empty(&self) -> bool {
        !self.generate_technical && !self.generate_simplified
    }
}

/// Result of one generation round. A `None` half was not requested (or was dropped
/// by a best-effort fan-out).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summaries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified: Option<String>,
}

impl Summaries {
    pub fn has_content(&self) -> bool {
        [&self.technical, &self.simplified]
            .iter()
            .any(|s| s.as_deref().is_some_and(|t| !t.trim().is_empty()))
    }

    pub fn get(&self, kind: SummaryKind) -> Option<&str> {
        match kind {
            SummaryKind::Technical => self.technical.as_deref(),
            SummaryKind::Simplified => self.simplified.as_deref(),
        }
    }
}

/// A persisted summarization result. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub id: String,
    pub date: String,
    pub process_number: String,
    pub summary_technical: String,
    pub summary_simplified: String,
    pub original_file_name: Option<String>,
    pub raw_text: String,
}

impl SummaryEntry {
    pub fn summary(&self, kind: SummaryKind) -> &str {
        match kind {
            SummaryKind::Technical => &self.summary_technical,
            SummaryKind::Simplified => &self.summary_simplified,
        }
    }

    /// The stored date parsed back; `None` for hand-edited or foreign records.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_approved: bool, is_admin: bool) -> User {
        User {
            id: "user-1".to_string(),
            email: "a@b.com".to_string(),
            is_approved,
            is_admin,
        }
    }

    #[test]
    fn access_level_follows_user_flags() {
        assert_eq!(AccessLevel::of(None), AccessLevel::Anonymous);
        assert_eq!(AccessLevel::of(Some(&user(false, false))), AccessLevel::Pending);
        assert_eq!(AccessLevel::of(Some(&user(true, false))), AccessLevel::Approved);
        // admins skip the pending gate even if the flag was cleared
        assert_eq!(AccessLevel::of(Some(&user(false, true))), AccessLevel::Admin);
        assert!(AccessLevel::Admin > AccessLevel::Approved);
    }

    #[test]
    fn summary_entry_uses_stored_field_names() {
        let entry = SummaryEntry {
            id: "2024-05-01T10:00:00.000Z".to_string(),
            date: "2024-05-01T10:00:00.000Z".to_string(),
            process_number: "Não encontrado".to_string(),
            summary_technical: "t".to_string(),
            summary_simplified: "s".to_string(),
            original_file_name: None,
            raw_text: "raw".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["processNumber"], "Não encontrado");
        assert_eq!(json["summaryTechnical"], "t");
        assert!(json["originalFileName"].is_null());
        assert!(entry.parsed_date().is_some());
    }

    #[test]
    fn summaries_without_text_have_no_content() {
        let empty = Summaries {
            technical: Some("   ".to_string()),
            simplified: None,
        };
        assert!(!empty.has_content());
        let some = Summaries {
            technical: None,
            simplified: Some("ok".to_string()),
        };
        assert!(some.has_content());
    }
}
