//! Completed-exercise records and the store they are written to.

use async_trait::async_trait;
use medifit_core::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::TrainerResult;

/// One exercise with a non-zero count at the end of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub user_id: UserId,
    pub timestamp: Timestamp,
    pub exercise_type: String,
    pub reps: u32,
    pub accuracy: u8,
    pub feedback: String,
}

/// Persistence boundary for exercise records
#[async_trait]
pub trait ExerciseRecordStore: Send + Sync {
    async fn append_exercise_record(&self, user_id: &UserId, record: ExerciseRecord) -> TrainerResult<()>;

    /// Newest first, at most `limit` records
    async fn exercise_history(&self, user_id: &UserId, limit: usize) -> TrainerResult<Vec<ExerciseRecord>>;
}

/// Process-local record store
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<UserId, Vec<ExerciseRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records across all users
    pub async fn len(&self) -> usize {
        let records = self.records.read().await;
        records.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ExerciseRecordStore for InMemoryRecordStore {
    async fn append_exercise_record(&self, user_id: &UserId, record: ExerciseRecord) -> TrainerResult<()> {
        let mut records = self.records.write().await;
        records.entry(user_id.clone()).or_default().push(record);
        Ok(())
    }

    async fn exercise_history(&self, user_id: &UserId, limit: usize) -> TrainerResult<Vec<ExerciseRecord>> {
        let records = self.records.read().await;
        let mut history = records.get(user_id).cloned().unwrap_or_default();

        // Equal timestamps: most recently appended first
        history.sort_by_key(|r| r.timestamp);
        history.reverse();
        history.truncate(limit);

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &UserId, nanos: i64, exercise: &str) -> ExerciseRecord {
        ExerciseRecord {
            user_id: user.clone(),
            timestamp: Timestamp::from_nanos(nanos),
            exercise_type: exercise.to_string(),
            reps: 3,
            accuracy: 95,
            feedback: "Session completed successfully".to_string(),
        }
    }

    #[tokio::test]
    async fn test_history_newest_first_with_limit() {
        let store = InMemoryRecordStore::new();
        let user = UserId::new("alex");

        store.append_exercise_record(&user, record(&user, 20, "Curl")).await.unwrap();
        store.append_exercise_record(&user, record(&user, 10, "Squat")).await.unwrap();
        store.append_exercise_record(&user, record(&user, 30, "Lunge")).await.unwrap();

        let history = store.exercise_history(&user, 100).await.unwrap();
        let types: Vec<_> = history.iter().map(|r| r.exercise_type.as_str()).collect();
        assert_eq!(types, vec!["Lunge", "Curl", "Squat"]);

        let limited = store.exercise_history(&user, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].exercise_type, "Curl");
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = InMemoryRecordStore::new();
        let a = UserId::new("a");
        let b = UserId::new("b");

        store.append_exercise_record(&a, record(&a, 1, "Pushup")).await.unwrap();

        assert!(store.exercise_history(&b, 100).await.unwrap().is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_record_json_shape() {
        let user = UserId::new("alex");
        let json = serde_json::to_value(record(&user, 5, "Sit-up")).unwrap();
        assert_eq!(json["user_id"], "alex");
        assert_eq!(json["exercise_type"], "Sit-up");
        assert_eq!(json["accuracy"], 95);
    }
}
