use std::sync::Arc;
use tessera::{OrphanPolicy, Value};
use tests::{
    assert_ok,
    models::{Address, Group, Status, Task, User},
    models, Setup,
};

async fn setup(policy: OrphanPolicy) -> (Setup, i64) {
    let mut builder = models!(User, Status, Task, Group);
    builder.orphans(policy);
    let s = Setup::new(&mut builder);

    let mut user = User::new("Ana", 31, Address::default());
    user.tasks.set(vec![
        Arc::new(Task::new("keep")),
        Arc::new(Task::new("drop")),
    ]);
    assert_ok!(s.db.repository::<User>().save(&mut user).await);

    let id = user.id.unwrap();
    (s, id)
}

/// Reloads the user and saves it with only the task titled "keep".
async fn drop_second_task(s: &Setup, id: i64) {
    let users = s.db.repository::<User>();
    let mut user = Arc::unwrap_or_clone(assert_ok!(users.find(id).await));

    let kept: Vec<_> = assert_ok!(user.tasks.get().await)
        .iter()
        .filter(|task| task.title == "keep")
        .cloned()
        .collect();
    user.tasks.set(kept);

    assert_ok!(users.save(&mut user).await);
}

fn owner_of(s: &Setup, title: &str) -> Option<Value> {
    s.memory
        .rows("Task")
        .into_iter()
        .find(|row| row.get_or_null("title") == &Value::from(title))
        .map(|row| row.get_or_null("user_id").clone())
}

#[tokio::test]
async fn retain_leaves_removed_children_untouched() {
    let (s, id) = setup(OrphanPolicy::Retain).await;
    drop_second_task(&s, id).await;

    assert_eq!(owner_of(&s, "drop"), Some(Value::from(id)));
    assert_eq!(owner_of(&s, "keep"), Some(Value::from(id)));
}

#[tokio::test]
async fn detach_nulls_the_inverse_column() {
    let (s, id) = setup(OrphanPolicy::Detach).await;
    drop_second_task(&s, id).await;

    assert_eq!(owner_of(&s, "drop"), Some(Value::Null));
    assert_eq!(owner_of(&s, "keep"), Some(Value::from(id)));
}

#[tokio::test]
async fn delete_removes_orphaned_rows() {
    let (s, id) = setup(OrphanPolicy::Delete).await;
    drop_second_task(&s, id).await;

    assert_eq!(owner_of(&s, "drop"), None);
    assert_eq!(owner_of(&s, "keep"), Some(Value::from(id)));
}

#[tokio::test]
async fn delete_of_owner_does_not_cascade_to_children() {
    let (s, id) = setup(OrphanPolicy::Delete).await;
    let users = s.db.repository::<User>();

    let user = assert_ok!(users.find(id).await);
    assert_ok!(users.delete(&user).await);

    assert_eq!(s.memory.rows("Task").len(), 2);
}
