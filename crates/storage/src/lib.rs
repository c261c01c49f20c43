#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    EnglishExerciseRepository, InMemoryRepository, MathProblemRepository, ProgressRepository,
    Storage, StorageError,
};
