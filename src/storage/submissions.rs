use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Upper bound on stored submissions, also the default capacity.
pub const MAX_CAPACITY: usize = 100;
pub const DEFAULT_CAPACITY: usize = MAX_CAPACITY;

/// One rating/review event and its generated text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub rating: u8,
    pub review: String,
    pub user_response: String,
    pub summary: String,
    pub recommended_actions: String,
    pub timestamp: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        rating: u8,
        review: String,
        user_response: String,
        summary: String,
        recommended_actions: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rating,
            review,
            user_response,
            summary,
            recommended_actions,
            timestamp: Utc::now(),
        }
    }
}

/// Aggregate view over the stored submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub total: usize,
    pub by_rating: BTreeMap<u8, usize>,
    pub average_rating: AverageRating,
}

/// Mean rating. Serialized as a two-decimal string, or the number `0`
/// when there is nothing to average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AverageRating {
    Empty,
    Mean(f64),
}

impl Serialize for AverageRating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AverageRating::Empty => serializer.serialize_u8(0),
            AverageRating::Mean(mean) => serializer.serialize_str(&format_two_decimals(*mean)),
        }
    }
}

/// Half-up rounding to two places. `{:.2}` alone rounds ties to even
/// (4.125 -> "4.12").
fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

impl SubmissionStats {
    pub fn from_submissions<'a, I>(submissions: I) -> Self
    where
        I: IntoIterator<Item = &'a Submission>,
    {
        let mut by_rating: BTreeMap<u8, usize> = (1..=5).map(|r| (r, 0)).collect();
        let mut total = 0usize;
        let mut sum = 0u64;

        for submission in submissions {
            if let Some(count) = by_rating.get_mut(&submission.rating) {
                *count += 1;
            }
            total += 1;
            sum += u64::from(submission.rating);
        }

        let average_rating = if total == 0 {
            AverageRating::Empty
        } else {
            AverageRating::Mean(sum as f64 / total as f64)
        };

        Self {
            total,
            by_rating,
            average_rating,
        }
    }
}

/// Bounded, newest-first in-memory log of submissions.
pub struct SubmissionLog {
    capacity: usize,
    entries: RwLock<VecDeque<Submission>>,
}

impl SubmissionLog {
    /// `capacity` is clamped to `1..=MAX_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepend `submission`, evicting the oldest entries past capacity.
    /// Returns the number of evicted records.
    pub async fn insert(&self, submission: Submission) -> usize {
        let mut entries = self.entries.write().await;
        entries.push_front(submission);
        let evicted = entries.len().saturating_sub(self.capacity);
        entries.truncate(self.capacity);
        evicted
    }

    /// Newest-first copy of the current log.
    pub async fn snapshot(&self) -> Vec<Submission> {
        self.entries.read().await.iter().cloned().collect()
    }

    /// Snapshot and statistics taken under the same read lock.
    pub async fn snapshot_with_stats(&self) -> (Vec<Submission>, SubmissionStats) {
        let entries = self.entries.read().await;
        let stats = SubmissionStats::from_submissions(entries.iter());
        (entries.iter().cloned().collect(), stats)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for SubmissionLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
