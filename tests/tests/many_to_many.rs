use pretty_assertions::assert_eq;
use std::sync::Arc;
use tessera::Value;
use tests::{
    assert_ok, assert_unique,
    models::{Address, Group, Status, Task, User},
    models, Setup,
};

fn setup() -> Setup {
    Setup::new(&mut models!(User, Status, Task, Group))
}

fn names(groups: &[Arc<Group>]) -> Vec<String> {
    let mut names: Vec<_> = groups.iter().map(|group| group.name.clone()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn join_table_uses_default_names() {
    let s = setup();
    let descriptor = s.db.repository::<User>().descriptor().unwrap();

    let groups = &descriptor.many_to_many[0];
    assert_eq!(groups.join_table, "User_Group");
    assert_eq!(groups.origin_column, "User_id");
    assert_eq!(groups.target_column, "Group_id");
}

#[tokio::test]
async fn save_and_reload_two_groups() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    user.groups.set(vec![
        Arc::new(Group::new("admins")),
        Arc::new(Group::new("editors")),
    ]);
    assert_ok!(users.save(&mut user).await);

    let join_rows = s.memory.rows("User_Group");
    assert_eq!(join_rows.len(), 2);
    for row in &join_rows {
        assert_eq!(row.get_or_null("User_id"), &Value::from(user.id));
    }

    let loaded = assert_ok!(users.find(user.id).await);
    let groups = assert_ok!(loaded.groups.get().await);

    assert_eq!(names(groups), ["admins", "editors"]);
    assert_unique!(groups.iter().map(|group| group.id).collect::<Vec<_>>());
}

#[tokio::test]
async fn save_replaces_prior_join_rows() {
    let s = setup();
    let users = s.db.repository::<User>();
    let groups = s.db.repository::<Group>();

    let mut admins = Group::new("admins");
    let mut editors = Group::new("editors");
    assert_ok!(groups.save(&mut admins).await);
    assert_ok!(groups.save(&mut editors).await);

    let mut user = User::new("Ana", 31, Address::default());
    user.groups.set(vec![Arc::new(admins), Arc::new(editors.clone())]);
    assert_ok!(users.save(&mut user).await);

    user.groups.set(vec![Arc::new(editors)]);
    assert_ok!(users.save(&mut user).await);

    let loaded = assert_ok!(users.find(user.id).await);
    assert_eq!(names(assert_ok!(loaded.groups.get().await)), ["editors"]);
    assert_eq!(s.memory.rows("User_Group").len(), 1);

    // Targets themselves are untouched
    assert_eq!(s.memory.rows("Group").len(), 2);
}

#[tokio::test]
async fn targets_already_in_unit_of_work_are_not_queried_again() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    user.groups.set(vec![Arc::new(Group::new("admins"))]);
    assert_ok!(users.save(&mut user).await);

    let mut other = User::new("Bia", 22, Address::default());
    other.groups.set(vec![Arc::new(Group::new("editors"))]);
    assert_ok!(users.save(&mut other).await);
    s.log.clear();

    let all = assert_ok!(users.query().order_by("name", tessera::Direction::Asc).all().await);
    assert_eq!(all.len(), 2);

    for user in &all {
        assert_eq!(assert_ok!(user.groups.get().await).len(), 1);
    }

    // One join-table query and one target query per owner
    assert_eq!(s.log.count_queries("User_Group"), 2);
    assert_eq!(s.log.count_queries("Group"), 2);
}

#[tokio::test]
async fn unloaded_collection_is_left_alone_on_save() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    user.groups.set(vec![Arc::new(Group::new("admins"))]);
    assert_ok!(users.save(&mut user).await);
    s.log.clear();

    let mut loaded = Arc::unwrap_or_clone(assert_ok!(users.find(user.id).await));
    loaded.name = "Ana Maria".to_string();
    assert_ok!(users.save(&mut loaded).await);

    assert_eq!(s.log.count_deletes("User_Group"), 0);
    assert_eq!(s.log.count_inserts("User_Group"), 0);
    assert_eq!(s.memory.rows("User_Group").len(), 1);
}

#[tokio::test]
async fn delete_removes_join_rows_first() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    user.groups.set(vec![Arc::new(Group::new("admins"))]);
    assert_ok!(users.save(&mut user).await);
    s.log.clear();

    assert_ok!(users.delete(&user).await);

    assert_eq!(s.log.tables(), ["User_Group", "User"]);
    assert!(s.memory.rows("User_Group").is_empty());
    assert_eq!(s.memory.rows("Group").len(), 1);
}
