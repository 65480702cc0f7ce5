use std::sync::Arc;
use tests::{
    assert_empty, assert_ok, assert_same,
    models::{Address, Group, Status, Task, User},
    models, Setup,
};

fn setup() -> Setup {
    Setup::new(&mut models!(User, Status, Task, Group))
}

async fn user_with_tasks(s: &Setup, titles: &[&str]) -> i64 {
    let mut user = User::new("Ana", 31, Address::default());
    user.tasks
        .set(titles.iter().map(|title| Arc::new(Task::new(title))).collect());

    assert_ok!(s.db.repository::<User>().save(&mut user).await);
    user.id.unwrap()
}

#[tokio::test]
async fn associations_are_not_loaded_eagerly() {
    let s = setup();
    let id = user_with_tasks(&s, &["a", "b"]).await;
    s.log.clear();

    let user = assert_ok!(s.db.repository::<User>().find(id).await);

    assert!(!user.tasks.is_loaded());
    assert!(!user.status.is_loaded());
    assert!(!user.groups.is_loaded());
    assert_eq!(s.log.tables(), ["User"]);
}

#[tokio::test]
async fn has_many_resolves_once() {
    let s = setup();
    let id = user_with_tasks(&s, &["write", "review"]).await;
    s.log.clear();

    let user = assert_ok!(s.db.repository::<User>().find(id).await);

    let first = assert_ok!(user.tasks.get().await);
    let second = assert_ok!(user.tasks.get().await);

    assert!(std::ptr::eq(first, second), "same cached sequence");
    assert_eq!(s.log.count_queries("Task"), 1);

    let titles: Vec<_> = first.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, ["write", "review"]);
}

#[tokio::test]
async fn children_point_back_at_owner() {
    let s = setup();
    let id = user_with_tasks(&s, &["write"]).await;

    let user = assert_ok!(s.db.repository::<User>().find(id).await);
    let tasks = assert_ok!(user.tasks.get().await);
    let owner = assert_ok!(tasks[0].user.get().await).unwrap();

    assert_same!(owner, user);
}

#[tokio::test]
async fn empty_has_many_is_an_empty_sequence() {
    let s = setup();
    let id = user_with_tasks(&s, &[]).await;

    let user = assert_ok!(s.db.repository::<User>().find(id).await);
    assert_empty!(assert_ok!(user.tasks.get().await));
}

#[tokio::test]
async fn unset_many_to_one_resolves_to_none() {
    let s = setup();
    let id = user_with_tasks(&s, &[]).await;
    s.log.clear();

    let user = assert_ok!(s.db.repository::<User>().find(id).await);
    assert!(assert_ok!(user.status.get().await).is_none());
    assert_eq!(s.log.count_queries("Status"), 0);
}

/// A saved user whose status refers back to it.
async fn user_with_mutual_status(s: &Setup) -> Option<i64> {
    let users = s.db.repository::<User>();
    let statuses = s.db.repository::<Status>();

    let mut user = User::new("Ana", 31, Address::default());
    user.status.set(Arc::new(Status::new("active")));
    assert_ok!(users.save(&mut user).await);

    // Close the cycle: Status.user -> User
    let status_id = user.status.get().await.unwrap().unwrap().id;
    let mut status = Arc::unwrap_or_clone(assert_ok!(statuses.find(status_id).await));
    status.user.set(Arc::new(user.clone()));
    assert_ok!(statuses.save(&mut status).await);

    user.id
}

#[tokio::test]
async fn mutual_references_share_one_instance() {
    let s = setup();
    let id = user_with_mutual_status(&s).await;

    let loaded = assert_ok!(s.db.repository::<User>().find(id).await);
    let status = assert_ok!(loaded.status.get().await).unwrap();
    let back = assert_ok!(status.user.get().await).unwrap();

    assert_same!(back, loaded);
    assert_eq!(back.name, "Ana");
}

#[tokio::test]
async fn resolved_cycle_is_freed_with_its_last_holder() {
    let s = setup();
    let id = user_with_mutual_status(&s).await;

    let loaded = assert_ok!(s.db.repository::<User>().find(id).await);
    let status = assert_ok!(loaded.status.get().await).unwrap();
    let back = assert_ok!(status.user.get().await).unwrap();

    let user_ref = Arc::downgrade(&loaded);
    let status_ref = Arc::downgrade(&status);
    drop((loaded, status, back));

    assert!(user_ref.upgrade().is_none(), "user outlived its holders");
    assert!(status_ref.upgrade().is_none(), "status outlived its holders");
}

#[tokio::test]
async fn released_target_is_loaded_again() {
    let s = setup();
    let id = user_with_mutual_status(&s).await;
    s.log.clear();

    let loaded = assert_ok!(s.db.repository::<User>().find(id).await);

    let first = assert_ok!(loaded.status.get().await).unwrap();
    let again = assert_ok!(loaded.status.get().await).unwrap();
    assert_same!(first, again);
    assert_eq!(s.log.count_queries("Status"), 1);

    drop((first, again));
    assert!(!loaded.status.is_loaded());

    let reloaded = assert_ok!(loaded.status.get().await).unwrap();
    assert_eq!(reloaded.label, "active");
    assert_eq!(s.log.count_queries("Status"), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_share_one_resolution() {
    let s = setup();
    let id = user_with_tasks(&s, &["a", "b", "c"]).await;
    s.log.clear();

    let user = assert_ok!(s.db.repository::<User>().find(id).await);

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let user = user.clone();
            tokio::spawn(async move {
                let tasks = user.tasks.get().await?;
                Ok::<_, tessera::Error>(tasks.as_ptr() as usize)
            })
        })
        .collect();

    let mut seen = vec![];
    for reader in readers {
        seen.push(assert_ok!(reader.await.unwrap()));
    }

    seen.dedup();
    assert_eq!(seen.len(), 1, "every reader observed the same sequence");
    assert_eq!(s.log.count_queries("Task"), 1);
}

#[tokio::test]
async fn push_loads_collection_before_appending() {
    let s = setup();
    let users = s.db.repository::<User>();
    let id = user_with_tasks(&s, &["a"]).await;

    let mut user = Arc::unwrap_or_clone(assert_ok!(users.find(id).await));
    assert_ok!(user.tasks.push(Task::new("b")).await);
    assert_ok!(users.save(&mut user).await);

    let reloaded = assert_ok!(users.find(id).await);
    let titles: Vec<_> = assert_ok!(reloaded.tasks.get().await)
        .iter()
        .map(|task| task.title.clone())
        .collect();
    assert_eq!(titles, ["a", "b"]);
}
