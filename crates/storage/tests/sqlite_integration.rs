use chrono::Duration;
use quiz_core::generator;
use quiz_core::model::{
    Difficulty, EnglishFilter, EnglishKind, MathFilter, MathKind, ProblemId, SessionId,
    SessionProgress, Subject,
};
use quiz_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::{
    EnglishExerciseRepository, MathProblemRepository, ProgressRepository, StorageError,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_roundtrips_math_problems_and_filters_samples() {
    let repo = connect("memdb_math").await;
    let problems = generator::math_problems(&mut StdRng::seed_from_u64(1), fixed_now());
    repo.insert_problems(&problems).await.unwrap();
    assert_eq!(repo.count_problems().await.unwrap(), 64);

    let fetched = repo.get_problem(problems[0].id).await.unwrap().unwrap();
    assert_eq!(fetched, problems[0]);
    assert!(repo.get_problem(ProblemId::generate()).await.unwrap().is_none());

    let filter = MathFilter::new(Some(MathKind::Division), Some(Difficulty::Easy));
    for _ in 0..20 {
        let p = repo.sample_problem(filter).await.unwrap().unwrap();
        assert_eq!(p.kind, MathKind::Division);
        assert_eq!(p.difficulty, Difficulty::Easy);
    }

    // every fixed division pair has a quotient of at most 10
    let medium = MathFilter::new(Some(MathKind::Division), Some(Difficulty::Medium));
    assert!(repo.sample_problem(medium).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_rejects_duplicate_ids() {
    let repo = connect("memdb_dupes").await;
    let problems = generator::math_problems(&mut StdRng::seed_from_u64(2), fixed_now());
    repo.insert_problems(&problems[..3]).await.unwrap();

    let err = repo.insert_problems(&problems[2..4]).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
    assert_eq!(repo.count_problems().await.unwrap(), 3);
}

#[tokio::test]
async fn sqlite_roundtrips_english_exercises() {
    let repo = connect("memdb_english").await;
    let exercises = generator::english_exercises(fixed_now());
    repo.insert_exercises(&exercises).await.unwrap();
    assert_eq!(repo.count_exercises().await.unwrap(), 36);

    for original in &exercises {
        let fetched = repo.get_exercise(original.id).await.unwrap().unwrap();
        assert_eq!(&fetched, original);
    }

    let filter = EnglishFilter::new(Some(EnglishKind::Spelling), Some(Difficulty::Medium));
    let sampled = repo.sample_exercise(filter).await.unwrap().unwrap();
    assert_eq!(sampled.kind, EnglishKind::Spelling);
    assert_eq!(sampled.difficulty, Difficulty::Medium);

    let none = EnglishFilter::new(Some(EnglishKind::Grammar), Some(Difficulty::Medium));
    assert!(repo.sample_exercise(none).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_upserts_progress_by_session() {
    let repo = connect("memdb_progress").await;
    let session = SessionId::new("learner-1");
    let mut progress = SessionProgress::new(session.clone(), fixed_now());
    repo.upsert_progress(&progress).await.unwrap();

    let later = fixed_now() + Duration::minutes(5);
    progress.record(Subject::Math, true, later);
    progress.record(Subject::English, false, later);
    repo.upsert_progress(&progress).await.unwrap();

    let stored = repo.get_progress(&session).await.unwrap().unwrap();
    assert_eq!(stored, progress);
    assert_eq!(stored.problems_solved(), 2);
    assert_eq!(stored.expires_at(), later + Duration::hours(24));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM session_progress")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}
