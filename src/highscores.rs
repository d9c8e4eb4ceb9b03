//! High score and session history records
//!
//! Two flat tables: a single best-score row and an append-only log of
//! finished sessions. Storage backends live in `persistence`.

use serde::{Deserialize, Serialize};

/// One finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Auto-assigned, starting at 1
    pub session_id: u32,
    /// Final score
    pub score: u32,
    /// Unix timestamp (ms) when the session ended
    pub date: i64,
}

/// High score row plus session log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    /// Best score ever recorded, absent until the first update
    pub high_score: Option<u32>,
    /// Sessions in insertion order
    pub sessions: Vec<SessionRecord>,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a session and return its ID
    pub fn record_session(&mut self, score: u32, timestamp_millis: i64) -> u32 {
        let session_id = self
            .sessions
            .iter()
            .map(|s| s.session_id)
            .max()
            .unwrap_or(0)
            + 1;
        self.sessions.push(SessionRecord {
            session_id,
            score,
            date: timestamp_millis,
        });
        session_id
    }

    /// Replace the high score iff `score` is strictly greater.
    /// Returns true when the row changed.
    pub fn update_high_score_if_greater(&mut self, score: u32) -> bool {
        match self.high_score {
            Some(best) if score <= best => false,
            _ => {
                self.high_score = Some(score);
                true
            }
        }
    }

    /// Sessions ordered by date, newest first
    pub fn sessions_newest_first(&self) -> Vec<SessionRecord> {
        let mut sessions = self.sessions.clone();
        sessions.sort_by(|a, b| b.date.cmp(&a.date).then(b.session_id.cmp(&a.session_id)));
        sessions
    }
}

/// Format a timestamp relative to `now` for the history list
pub fn format_age(now_millis: i64, timestamp_millis: i64) -> String {
    let diff_mins = (now_millis - timestamp_millis).max(0) / 60_000;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    if diff_days >= 1 {
        if diff_days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", diff_days)
        }
    } else if diff_hours >= 1 {
        if diff_hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", diff_hours)
        }
    } else if diff_mins >= 1 {
        if diff_mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", diff_mins)
        }
    } else {
        "Just now".to_string()
    }
}
