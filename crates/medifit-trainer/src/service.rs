//! Per-user session registry.

use chrono::{DateTime, Utc};
use medifit_core::{LandmarkFrame, SessionId, Timestamp, UserId};
use medifit_reps::{list_exercises, ExerciseInfo, ExerciseKind, FrameReport, SessionTracker, Summary};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

use crate::config::TrainerConfig;
use crate::detector::PoseDetector;
use crate::error::{TrainerError, TrainerResult};
use crate::records::{ExerciseRecord, ExerciseRecordStore};

/// Exercise selected when a client does not choose one
pub const DEFAULT_EXERCISE_CHOICE: u8 = 1;

/// Acknowledgement of a started session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAck {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub exercise: ExerciseKind,
    pub started_at: Timestamp,
}

/// A user's stored exercise records, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseHistory {
    pub user_id: UserId,
    pub history: Vec<ExerciseRecord>,
}

/// Live session of one user
#[derive(Debug)]
struct ActiveSession {
    tracker: SessionTracker,
    /// Session start or last processed frame
    last_activity: Timestamp,
    /// Exercises already written by an end attempt that failed later on
    persisted: BTreeSet<ExerciseKind>,
}

impl ActiveSession {
    fn new(tracker: SessionTracker) -> Self {
        Self {
            last_activity: tracker.started_at(),
            tracker,
            persisted: BTreeSet::new(),
        }
    }

    fn is_idle(&self, now: DateTime<Utc>, timeout_secs: i64) -> bool {
        (now - self.last_activity.to_datetime()).num_seconds() >= timeout_secs
    }
}

type SessionMap = HashMap<UserId, ActiveSession>;

/// Gym trainer service: one session per user, frames decoded by `D`,
/// finished sessions persisted through `S`.
pub struct TrainerService<D, S> {
    detector: D,
    store: S,
    config: TrainerConfig,
    sessions: RwLock<SessionMap>,
}

impl<D: PoseDetector, S: ExerciseRecordStore> TrainerService<D, S> {
    pub fn new(detector: D, store: S, config: TrainerConfig) -> Self {
        Self {
            detector,
            store,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a fresh session, replacing any previous one for this user
    pub async fn start_session(&self, user_id: &UserId, exercise_choice: u8) -> TrainerResult<SessionAck> {
        let tracker = SessionTracker::new(exercise_choice)?;

        let mut sessions = self.sessions.write().await;
        let limit = self.config.sessions.max_active_sessions;
        if !sessions.contains_key(user_id) && sessions.len() >= limit {
            self.evict_idle(&mut sessions);
        }
        if !sessions.contains_key(user_id) && sessions.len() >= limit {
            tracing::warn!("Rejecting session for {}: {} sessions active", user_id, sessions.len());
            return Err(TrainerError::SessionLimit { limit });
        }

        let ack = SessionAck {
            session_id: tracker.session_id(),
            user_id: user_id.clone(),
            exercise: tracker.exercise(),
            started_at: tracker.started_at(),
        };

        if let Some(previous) = sessions.insert(user_id.clone(), ActiveSession::new(tracker)) {
            tracing::debug!("Discarding session {} of {}", previous.tracker.session_id(), user_id);
        }

        tracing::info!("Started {} session {} for {}", ack.exercise, ack.session_id, user_id);
        Ok(ack)
    }

    /// Detect a pose in `image` and feed it to the user's session.
    ///
    /// Detection misses are not errors; detector failures are.
    pub async fn process_frame(
        &self,
        user_id: &UserId,
        image: &[u8],
        exercise_choice: u8,
    ) -> TrainerResult<FrameReport> {
        if image.is_empty() {
            return Err(TrainerError::InvalidArgument("empty image".to_string()));
        }
        ExerciseKind::try_from(exercise_choice)?;

        if !self.sessions.read().await.contains_key(user_id) {
            return Err(TrainerError::NoActiveSession(user_id.clone()));
        }

        // Detection may be slow; no lock held
        let detected = self
            .detector
            .detect(image, &self.config.pose)
            .await
            .map_err(|e| {
                tracing::warn!("Pose detector {} failed: {}", self.detector.name(), e);
                e
            })?;

        let min_confidence = self.config.pose.min_detection_confidence;
        let frame = detected
            .filter(|frame| frame.detected && frame.confidence >= min_confidence)
            .unwrap_or_else(LandmarkFrame::undetected);

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(user_id)
            .ok_or_else(|| TrainerError::NoActiveSession(user_id.clone()))?;

        let report = session.tracker.process_frame(&frame, exercise_choice)?;
        session.last_activity = Timestamp::now();
        Ok(report)
    }

    /// Summarize the user's session, persist one record per exercise
    /// performed, then discard the session.
    ///
    /// The session leaves the registry before anything is written, so frames
    /// arriving meanwhile fail with `NoActiveSession` instead of being lost.
    /// If persisting fails the session is put back and a retry only writes
    /// the exercises that are still missing.
    pub async fn end_session(&self, user_id: &UserId, include_angle_data: bool) -> TrainerResult<Summary> {
        let mut session = self
            .sessions
            .write()
            .await
            .remove(user_id)
            .ok_or_else(|| TrainerError::NoActiveSession(user_id.clone()))?;

        let summary = session.tracker.summary(include_angle_data);

        if let Err(e) = self.persist_records(user_id, &mut session).await {
            tracing::warn!("Failed to persist records of session {}: {}", summary.session_id, e);
            let mut sessions = self.sessions.write().await;
            // A session started while this one was ending wins
            sessions.entry(user_id.clone()).or_insert(session);
            return Err(e);
        }

        tracing::info!(
            "Ended session {} for {}: {} reps",
            summary.session_id,
            user_id,
            summary.total_reps
        );
        Ok(summary)
    }

    async fn persist_records(&self, user_id: &UserId, session: &mut ActiveSession) -> TrainerResult<()> {
        let records = &self.config.records;
        let counters = *session.tracker.counters();

        for (kind, reps) in counters.iter().filter(|&(_, reps)| reps > 0) {
            if session.persisted.contains(&kind) {
                continue;
            }

            let record = ExerciseRecord {
                user_id: user_id.clone(),
                timestamp: Timestamp::now(),
                exercise_type: kind.frame_label().to_string(),
                reps,
                accuracy: records.default_accuracy,
                feedback: records.completion_feedback.clone(),
            };
            self.store.append_exercise_record(user_id, record).await?;
            session.persisted.insert(kind);
        }

        tracing::info!("Persisted {} exercise records for {}", session.persisted.len(), user_id);
        Ok(())
    }

    /// Drop sessions idle for longer than `sessions.idle_timeout_secs`
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions)
    }

    fn evict_idle(&self, sessions: &mut SessionMap) -> usize {
        let timeout = i64::try_from(self.config.sessions.idle_timeout_secs).unwrap_or(i64::MAX);
        let now = Utc::now();
        let before = sessions.len();

        sessions.retain(|user_id, session| {
            let idle = session.is_idle(now, timeout);
            if idle {
                tracing::info!("Evicting idle session {} of {}", session.tracker.session_id(), user_id);
            }
            !idle
        });

        before - sessions.len()
    }

    /// Summary of a live session without ending it
    pub async fn session_summary(&self, user_id: &UserId, include_angle_data: bool) -> TrainerResult<Summary> {
        let sessions = self.sessions.read().await;
        sessions
            .get(user_id)
            .map(|s| s.tracker.summary(include_angle_data))
            .ok_or_else(|| TrainerError::NoActiveSession(user_id.clone()))
    }

    pub async fn exercise_history(&self, user_id: &UserId) -> TrainerResult<ExerciseHistory> {
        let history = self
            .store
            .exercise_history(user_id, self.config.records.history_limit)
            .await?;

        Ok(ExerciseHistory {
            user_id: user_id.clone(),
            history,
        })
    }

    pub fn list_exercises(&self) -> Vec<ExerciseInfo> {
        list_exercises()
    }

    pub async fn has_session(&self, user_id: &UserId) -> bool {
        self.sessions.read().await.contains_key(user_id)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
