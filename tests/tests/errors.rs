use tessera::{schema::MappingSpec, Mapping, Type};
use tessera_core::driver::Operation;
use tests::{
    assert_err, assert_ok,
    models::{Address, Group, Status, Task, User},
    models, Failure, Setup,
};

#[tokio::test]
async fn storage_failures_propagate_without_retry() {
    let s = Setup::new(&mut models!(User, Status, Task, Group));
    let users = s.db.repository::<User>();
    s.faults.fail_on(Failure::Timeout, Operation::is_query);

    let err = assert_err!(users.find(1).await);
    assert!(err.is_storage_unavailable(), "{err}");
    assert!(!err.is_not_found());
    assert_eq!(s.log.len(), 1, "one attempt only");

    s.faults.fail_on(Failure::Cancelled, Operation::is_query);
    let err = assert_err!(users.query().all().await);
    assert!(err.is_operation_cancelled(), "{err}");
}

#[tokio::test]
async fn lazy_resolution_failure_is_reported_and_retried_on_next_read() {
    let s = Setup::new(&mut models!(User, Status, Task, Group));
    let users = s.db.repository::<User>();

    let mut user = User::new("Ana", 31, Address::default());
    assert_ok!(users.save(&mut user).await);
    let loaded = assert_ok!(users.find(user.id).await);

    s.faults.fail_on(Failure::Timeout, Operation::is_query);
    let err = assert_err!(loaded.tasks.get().await);
    assert!(err.is_storage_unavailable(), "{err}");
    assert!(!loaded.tasks.is_loaded());

    s.faults.heal();
    assert!(assert_ok!(loaded.tasks.get().await).is_empty());
}

#[test]
fn missing_target_class_fails_registration() {
    let mut builder = models!(User, Task, Group);
    let err = assert_err!(builder.build(tessera_driver_memory::Memory::new()));

    assert!(err.is_unknown_target_class(), "{err}");
    assert!(err.is_mapping_error());
}

#[test]
fn untyped_field_fails_registration() {
    let mut builder = tessera::Db::builder();
    builder.register_mapping(Mapping::spec(
        "Tag",
        MappingSpec::new().field("label"),
    ));

    let err = assert_err!(builder.build(tessera_driver_memory::Memory::new()));
    assert!(err.is_missing_type_information(), "{err}");
}

#[test]
fn declared_types_fill_gaps_in_explicit_mapping() {
    let mut builder = tessera::Db::builder();
    builder
        .declare("Tag", [tessera::schema::DeclaredAttribute::scalar("label", Type::String)])
        .register_mapping(Mapping::spec("Tag", MappingSpec::new().field("label")));

    let db = assert_ok!(builder.build(tessera_driver_memory::Memory::new()));
    let tag = assert_ok!(db.registry().resolve("Tag"));
    assert_eq!(tag.fields[0].ty, Type::String);
}

#[test]
fn type_source_types_convention_mapping() {
    let mut types = tessera::schema::DeclaredTypes::default();
    types.insert(
        "Tag",
        [
            tessera::schema::DeclaredAttribute::scalar("id", Type::Integer),
            tessera::schema::DeclaredAttribute::scalar("label", Type::String),
        ],
    );

    let mut builder = tessera::Db::builder();
    builder
        .type_source(types)
        .register_mapping(Mapping::convention("Tag"));

    let db = assert_ok!(builder.build(tessera_driver_memory::Memory::new()));
    let tag = assert_ok!(db.registry().resolve("Tag"));
    assert_eq!(tag.table_name, "Tag");
    assert_eq!(tag.fields[0].column, "label");
    assert_eq!(tag.fields[0].ty, Type::String);
}

#[tokio::test]
async fn unmapped_class() {
    let s = Setup::new(&mut models!(Group));
    let err = assert_err!(s.db.repository::<User>().find(1).await);
    assert!(err.is_unmapped_class(), "{err}");
    assert!(s.log.is_empty());
}
