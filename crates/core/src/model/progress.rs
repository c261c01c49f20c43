use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{ProgressId, SessionId};
use crate::model::kind::Subject;

/// Hours after the last activity at which a session is considered expired.
///
/// Advisory only; nothing evicts expired sessions.
pub const PROGRESS_TTL_HOURS: i64 = 24;

/// Per-session score and streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    id: ProgressId,
    session_id: SessionId,
    math_score: u32,
    english_score: u32,
    math_streak: u32,
    english_streak: u32,
    problems_solved: u32,
    last_activity: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionProgress {
    /// Zeroed progress for a session first seen at `now`.
    #[must_use]
    pub fn new(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id: ProgressId::generate(),
            session_id,
            math_score: 0,
            english_score: 0,
            math_streak: 0,
            english_streak: 0,
            problems_solved: 0,
            last_activity: now,
            expires_at: now + Duration::hours(PROGRESS_TTL_HOURS),
        }
    }

    /// Rehydrate progress from persisted storage.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_persisted(
        id: ProgressId,
        session_id: SessionId,
        math_score: u32,
        english_score: u32,
        math_streak: u32,
        english_streak: u32,
        problems_solved: u32,
        last_activity: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_id,
            math_score,
            english_score,
            math_streak,
            english_streak,
            problems_solved,
            last_activity,
            expires_at,
        }
    }

    /// Apply one graded answer.
    ///
    /// A correct answer bumps the subject's score and streak; a wrong one resets
    /// only that subject's streak. `problems_solved` always increments.
    pub fn record(&mut self, subject: Subject, correct: bool, now: DateTime<Utc>) {
        let (score, streak) = match subject {
            Subject::Math => (&mut self.math_score, &mut self.math_streak),
            Subject::English => (&mut self.english_score, &mut self.english_streak),
        };

        if correct {
            *score = score.saturating_add(1);
            *streak = streak.saturating_add(1);
        } else {
            *streak = 0;
        }

        self.problems_solved = self.problems_solved.saturating_add(1);
        self.last_activity = now;
        self.expires_at = now + Duration::hours(PROGRESS_TTL_HOURS);
    }

    #[must_use]
    pub fn id(&self) -> ProgressId {
        self.id
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn math_score(&self) -> u32 {
        self.math_score
    }

    #[must_use]
    pub fn english_score(&self) -> u32 {
        self.english_score
    }

    #[must_use]
    pub fn math_streak(&self) -> u32 {
        self.math_streak
    }

    #[must_use]
    pub fn english_streak(&self) -> u32 {
        self.english_streak
    }

    #[must_use]
    pub fn problems_solved(&self) -> u32 {
        self.problems_solved
    }

    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
