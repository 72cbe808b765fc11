//! Integration tests for the goal repository and the goal↔task association.
//!
//! All tests require a live Postgres and are `#[ignore]`d by default; run
//! with `--ignored --test-threads=1`.

use stride_db::test_fixtures::TestDatabase;
use stride_db::{Error, GoalRepository, NewGoal, NewTask, TaskRepository};

fn habit() -> NewGoal {
    NewGoal {
        title: "Build a habit of going outside daily".to_string(),
    }
}

async fn insert_task(test_db: &TestDatabase, title: &str) -> i64 {
    test_db
        .db
        .tasks
        .insert(NewTask {
            title: title.to_string(),
            description: "d".to_string(),
        })
        .await
        .expect("insert task")
        .id
}

#[tokio::test]
#[ignore]
async fn test_goal_crud() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;
    let goals = &test_db.db.goals;

    let goal = goals.insert(habit()).await.expect("insert");
    assert_eq!(goal.title, "Build a habit of going outside daily");

    let fetched = goals.get(goal.id).await.expect("get").expect("exists");
    assert_eq!(fetched, goal);

    let updated = goals.update(goal.id, "Touch grass").await.expect("update");
    assert_eq!(updated.title, "Touch grass");

    let all = goals.list().await.expect("list");
    assert_eq!(all.len(), 1);

    goals.delete(goal.id).await.expect("delete");
    assert!(goals.get(goal.id).await.expect("get").is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_add_tasks_links_and_lists() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let goal = test_db.db.goals.insert(habit()).await.expect("insert goal");
    let walk = insert_task(&test_db, "Walk").await;
    let read = insert_task(&test_db, "Read").await;

    test_db
        .db
        .goals
        .add_tasks(goal.id, &[walk, read])
        .await
        .expect("add tasks");

    let linked = test_db.db.goals.tasks_of(goal.id).await.expect("tasks_of");
    let ids: Vec<_> = linked.iter().map(|t| t.id).collect();
    assert_eq!(ids, [walk, read]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_add_tasks_is_all_or_nothing() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let goal = test_db.db.goals.insert(habit()).await.expect("insert goal");
    let walk = insert_task(&test_db, "Walk").await;

    // Valid id first, then an unknown one: the whole batch must roll back.
    let err = test_db
        .db
        .goals
        .add_tasks(goal.id, &[walk, 999_999])
        .await
        .expect_err("unknown task id");
    assert!(matches!(err, Error::TaskNotFound(ref id) if id == "999999"));

    let linked = test_db.db.goals.tasks_of(goal.id).await.expect("tasks_of");
    assert!(linked.is_empty(), "no partial association may survive");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_readding_linked_task_is_idempotent() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let goal = test_db.db.goals.insert(habit()).await.expect("insert goal");
    let walk = insert_task(&test_db, "Walk").await;

    test_db
        .db
        .goals
        .add_tasks(goal.id, &[walk])
        .await
        .expect("first add");
    test_db
        .db
        .goals
        .add_tasks(goal.id, &[walk])
        .await
        .expect("second add");

    let linked = test_db.db.goals.tasks_of(goal.id).await.expect("tasks_of");
    assert_eq!(linked.len(), 1, "re-association must not duplicate");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_task_removes_join_rows() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let goal = test_db.db.goals.insert(habit()).await.expect("insert goal");
    let walk = insert_task(&test_db, "Walk").await;

    test_db
        .db
        .goals
        .add_tasks(goal.id, &[walk])
        .await
        .expect("add");
    test_db.db.tasks.delete(walk).await.expect("delete task");

    let linked = test_db.db.goals.tasks_of(goal.id).await.expect("tasks_of");
    assert!(linked.is_empty(), "cascade must clean up join rows");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_goal_keeps_tasks() {
    let test_db = TestDatabase::new().await;
    test_db.cleanup().await;

    let goal = test_db.db.goals.insert(habit()).await.expect("insert goal");
    let walk = insert_task(&test_db, "Walk").await;

    test_db
        .db
        .goals
        .add_tasks(goal.id, &[walk])
        .await
        .expect("add");
    test_db.db.goals.delete(goal.id).await.expect("delete goal");

    let task = test_db.db.tasks.get(walk).await.expect("get");
    assert!(task.is_some(), "tasks survive goal deletion");

    test_db.cleanup().await;
}
