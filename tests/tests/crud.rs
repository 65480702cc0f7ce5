use std::sync::Arc;
use tessera::{Op, Value};
use tests::{
    assert_err, assert_none, assert_ok,
    models::{Address, Group, Status, Task, User},
    models, Setup,
};

fn setup() -> Setup {
    Setup::new(&mut models!(User, Status, Task, Group))
}

#[tokio::test]
async fn save_then_find_round_trips_attributes() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::new("Rua A", "Rio"));
    assert_ok!(users.save(&mut user).await);

    let id = user.id.expect("save assigns a key");
    let found = assert_ok!(users.find(id).await);

    assert_eq!(found.id, Some(id));
    assert_eq!(found.name, "Ana");
    assert_eq!(found.age, Some(31));
    assert_eq!(found.address, Address::new("Rua A", "Rio"));
}

#[tokio::test]
async fn component_is_flattened_into_owner_row() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::new("Rua A", "Rio"));
    assert_ok!(users.save(&mut user).await);

    let rows = s.memory.rows("User");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_or_null("address_city"), &Value::from("Rio"));
    assert_eq!(rows[0].get_or_null("address_street"), &Value::from("Rua A"));
    assert!(rows[0].get_or_null("status_id").is_null());
}

#[tokio::test]
async fn save_with_key_updates() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    assert_ok!(users.save(&mut user).await);
    let id = user.id;

    user.age = Some(32);
    assert_ok!(users.save(&mut user).await);

    assert_eq!(user.id, id);
    assert_eq!(s.memory.rows("User").len(), 1);
    assert_eq!(s.log.count_inserts("User"), 1);
    assert_eq!(s.log.count_updates("User"), 1);

    let found = assert_ok!(users.find(id).await);
    assert_eq!(found.age, Some(32));
}

#[tokio::test]
async fn loaded_object_can_be_saved_back() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    assert_ok!(users.save(&mut user).await);

    let mut loaded = Arc::unwrap_or_clone(assert_ok!(users.find(user.id).await));
    loaded.name = "Ana Maria".to_string();
    assert_ok!(users.save(&mut loaded).await);

    let found = assert_ok!(users.find(user.id).await);
    assert_eq!(found.name, "Ana Maria");
}

#[tokio::test]
async fn find_missing_key_is_not_found() {
    let s = setup();
    let users = s.db.repository::<User>();

    let err = assert_err!(users.find(404).await);
    assert!(err.is_not_found(), "{err}");
    assert!(!err.is_storage_unavailable());

    assert_none!(assert_ok!(users.get(404).await));
}

#[tokio::test]
async fn delete_removes_row() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    assert_ok!(users.save(&mut user).await);
    assert_ok!(users.delete(&user).await);

    assert!(s.memory.rows("User").is_empty());
    assert!(assert_err!(users.find(user.id).await).is_not_found());

    // Already gone
    let err = assert_err!(users.delete(&user).await);
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn delete_of_unsaved_object_is_rejected() {
    let s = setup();
    let users = s.db.repository::<User>();

    let user = User::new("Ana", 31, Address::default());
    let err = assert_err!(users.delete(&user).await);
    assert!(err.is_invalid_entity_state(), "{err}");
    assert!(s.log.is_empty());
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    user.id = Some(99);

    let err = assert_err!(users.save(&mut user).await);
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn new_many_to_one_target_is_saved_first() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    user.status.set(Arc::new(Status::new("active")));
    assert_ok!(users.save(&mut user).await);

    let status = user.status.get().await.unwrap().expect("status is assigned");
    assert!(status.id.is_some(), "the new status received its key");

    // Referenced row first, so the owner's foreign key can point at it
    assert_eq!(s.log.tables(), ["Status", "User"]);
    assert_eq!(
        s.memory.rows("User")[0].get_or_null("status_id"),
        &Value::from(status.id)
    );
}

#[tokio::test]
async fn each_call_is_its_own_unit_of_work() {
    let s = setup();
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    assert_ok!(users.save(&mut user).await);

    let first = assert_ok!(users.find(user.id).await);
    let second = assert_ok!(users.find(user.id).await);
    assert!(!Arc::ptr_eq(&first, &second));

    let matching = assert_ok!(users.filter("age", Op::Ge, 30).all().await);
    assert_eq!(matching.len(), 1);
}
