mod english;
mod ids;
mod kind;
mod math;
mod progress;

pub use english::{EnglishExercise, EnglishFilter};
pub use ids::{ExerciseId, ParseIdError, ProblemId, ProgressId, SessionId};
pub use kind::{Difficulty, EnglishKind, MathKind, ParseKindError, Subject};
pub use math::{MathFilter, MathProblem};
pub use progress::{PROGRESS_TTL_HOURS, SessionProgress};
