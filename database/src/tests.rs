use crate::{Database, SolvedNotification};
use codefeed_core::{BackendError, CoreError, Difficulty, ProblemSolved, SessionContext};
use std::env;

async fn setup_test_db() -> Database {
    let db_path = env::temp_dir().join(format!("test_codefeed_{}.db", uuid::Uuid::new_v4()));
    let db_url = format!("sqlite://{}", db_path.display());

    let mut db = Database::new(db_url);
    db.connect()
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");

    db
}

fn solved(user_id: &str, post_id: &str, difficulty: Difficulty) -> ProblemSolved {
    ProblemSolved {
        user_id: user_id.to_string(),
        post_id: post_id.to_string(),
        difficulty,
    }
}

#[tokio::test]
async fn test_unconnected_database_reports_connection_failure() {
    let db = Database::new("sqlite://unused.db".to_string());
    let result = db.points_total("nobody").await;
    assert!(matches!(
        result,
        Err(CoreError::Backend(BackendError::ConnectionFailed { .. }))
    ));
}

#[tokio::test]
async fn test_profile_upsert_and_lookup() {
    let db = setup_test_db().await;
    db.upsert_profile(&SessionContext::new("u1", "Ada"))
        .await
        .unwrap();
    db.upsert_profile(&SessionContext::new("u1", "Ada L."))
        .await
        .unwrap();

    let profile = db.get_profile("u1").await.unwrap();
    assert_eq!(profile.display_name, "Ada L.");

    let missing = db.get_profile("u2").await;
    assert!(matches!(
        missing,
        Err(CoreError::Backend(BackendError::ProfileNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_points_accumulate_once_per_problem() {
    let db = setup_test_db().await;
    db.upsert_profile(&SessionContext::new("u1", "Ada"))
        .await
        .unwrap();

    let total = db
        .record_solved(&solved("u1", "p1", Difficulty::Easy))
        .await
        .unwrap();
    assert_eq!(total, 10);

    let total = db
        .record_solved(&solved("u1", "p2", Difficulty::Hard))
        .await
        .unwrap();
    assert_eq!(total, 40);

    // A second accepted solution for p2 does not count again
    let total = db
        .record_solved(&solved("u1", "p2", Difficulty::Hard))
        .await
        .unwrap();
    assert_eq!(total, 40);
    assert_eq!(db.points_total("u1").await.unwrap(), 40);
}

#[tokio::test]
async fn test_record_solved_requires_profile() {
    let db = setup_test_db().await;
    let result = db
        .record_solved(&solved("ghost", "p1", Difficulty::Medium))
        .await;
    assert!(matches!(
        result,
        Err(CoreError::Backend(BackendError::ProfileNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_solved_inserts_are_broadcast() {
    let db = setup_test_db().await;
    db.upsert_profile(&SessionContext::new("u1", "Ada"))
        .await
        .unwrap();
    let mut rx = db.subscribe_solved();

    db.record_solved(&solved("u1", "p1", Difficulty::Medium))
        .await
        .unwrap();
    db.record_solved(&solved("u1", "p1", Difficulty::Medium))
        .await
        .unwrap();

    let notification = rx.recv().await.unwrap();
    assert_eq!(
        notification,
        SolvedNotification {
            user_id: "u1".to_string(),
            post_id: "p1".to_string(),
            difficulty: Difficulty::Medium,
            points: 20,
        }
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_leaderboard_ordering() {
    let db = setup_test_db().await;
    for (id, name) in [("u1", "Ada"), ("u2", "Brian"), ("u3", "Cleo")] {
        db.upsert_profile(&SessionContext::new(id, name))
            .await
            .unwrap();
    }
    db.record_solved(&solved("u2", "p1", Difficulty::Hard))
        .await
        .unwrap();
    db.record_solved(&solved("u1", "p1", Difficulty::Easy))
        .await
        .unwrap();
    db.record_solved(&solved("u1", "p2", Difficulty::Easy))
        .await
        .unwrap();

    let board = db.leaderboard(10).await.unwrap();
    let names: Vec<_> = board.iter().map(|e| e.display_name.as_str()).collect();
    assert_eq!(names, vec!["Brian", "Ada", "Cleo"]);
    assert_eq!(board[0].points, 30);
    assert_eq!(board[1].solved, 2);
    assert_eq!(board[2].points, 0);

    assert_eq!(db.leaderboard(1).await.unwrap().len(), 1);
}
