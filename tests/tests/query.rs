use pretty_assertions::assert_eq;
use std::sync::Arc;
use tessera::{stmt::Selection, Direction, Op, Record, Value};
use tests::{
    assert_err, assert_none, assert_ok,
    models::{Address, Group, Status, Task, User},
    models, Setup,
};

async fn setup() -> Setup {
    let s = Setup::new(&mut models!(User, Status, Task, Group));
    let users = s.db.repository::<User>();

    for (name, age, city) in [("Ana", 31, "Rio"), ("Bia", 22, "Lima"), ("Caio", 45, "Rio")] {
        let mut user = User::new(name, age, Address::new("Main St", city));
        users.save(&mut user).await.unwrap();
    }

    s.log.clear();
    s
}

fn names(users: &[Arc<User>]) -> Vec<&str> {
    users.iter().map(|user| user.name.as_str()).collect()
}

#[tokio::test]
async fn component_path_resolves_to_flattened_column() {
    let s = setup().await;
    let query = s.db.repository::<User>().filter_by("address.city", "Rio");

    let plan = assert_ok!(query.plan());
    assert_eq!(plan.filter[0].column, "address_city");

    let users = assert_ok!(query.order_by("name", Direction::Asc).all().await);
    assert_eq!(names(&users), ["Ana", "Caio"]);
}

#[tokio::test]
async fn association_traversal_fails_fast() {
    let s = setup().await;

    let err = assert_err!(
        s.db.repository::<User>()
            .filter_by("tasks.name", "write")
            .all()
            .await
    );
    assert!(err.is_unsupported_path_traversal(), "{err}");

    let err = assert_err!(s.db.repository::<User>().filter_by("status.label", "x").plan());
    assert!(err.is_unsupported_path_traversal(), "{err}");

    assert!(s.log.is_empty(), "no storage I/O for an invalid query");
}

#[tokio::test]
async fn unknown_attribute() {
    let s = setup().await;

    let err = assert_err!(s.db.repository::<User>().filter_by("nickname", "x").plan());
    assert!(err.is_unknown_attribute(), "{err}");

    let err = assert_err!(s.db.repository::<User>().filter_by("address.zip", "x").plan());
    assert!(err.is_unknown_attribute(), "{err}");
}

#[tokio::test]
async fn comparison_operators() {
    let s = setup().await;
    let users = s.db.repository::<User>();

    let older = assert_ok!(
        users
            .filter("age", Op::Gt, 30)
            .order_by("age", Direction::Desc)
            .all()
            .await
    );
    assert_eq!(names(&older), ["Caio", "Ana"]);

    let not_ana = assert_ok!(users.filter("name", Op::Ne, "Ana").count().await);
    assert_eq!(not_ana, 2);

    let listed = assert_ok!(
        users
            .filter("name", Op::In, vec![Value::from("Bia"), Value::from("Caio")])
            .order_by("name", Direction::Asc)
            .all()
            .await
    );
    assert_eq!(names(&listed), ["Bia", "Caio"]);
}

#[tokio::test]
async fn clauses_are_conjunctive() {
    let s = setup().await;

    let users = assert_ok!(
        s.db.repository::<User>()
            .filter_by("address.city", "Rio")
            .filter("age", Op::Lt, 40)
            .all()
            .await
    );
    assert_eq!(names(&users), ["Ana"]);
}

#[tokio::test]
async fn is_null_matches_unset_foreign_key() {
    let s = setup().await;
    let users = s.db.repository::<User>();

    let mut user = User::new("Duda", 19, Address::default());
    user.status.set(Arc::new(Status::new("active")));
    users.save(&mut user).await.unwrap();

    assert_eq!(assert_ok!(users.query().is_null("status").count().await), 3);

    let status_id = user.status.get().await.unwrap().unwrap().id;
    let with_status = assert_ok!(users.filter_by("status", status_id).all().await);
    assert_eq!(names(&with_status), ["Duda"]);
}

#[tokio::test]
async fn first_and_limit() {
    let s = setup().await;
    let users = s.db.repository::<User>();

    let youngest = assert_ok!(users.query().order_by("age", Direction::Asc).first().await);
    assert_eq!(youngest.unwrap().name, "Bia");

    let nobody = assert_ok!(users.filter_by("name", "Zé").first().await);
    assert_none!(nobody);

    let two = assert_ok!(users.query().order_by("name", Direction::Desc).limit(2).all().await);
    assert_eq!(names(&two), ["Caio", "Bia"]);
}

#[tokio::test]
async fn mistyped_value_is_rejected_before_io() {
    let s = setup().await;

    let err = assert_err!(s.db.repository::<User>().filter_by("age", "old").all().await);
    assert!(err.is_type_conversion(), "{err}");

    let err = assert_err!(
        s.db.repository::<User>()
            .filter("name", Op::In, "Ana")
            .plan()
    );
    assert!(!err.is_type_conversion(), "{err}");

    assert!(s.log.is_empty());
}

#[tokio::test]
async fn integer_literal_filters_float_column() {
    let s = setup().await;
    let tasks = s.db.repository::<Task>();

    for (title, estimate) in [("small", 1.5), ("large", 12.0)] {
        let mut task = Task::new(title);
        task.estimate = estimate;
        assert_ok!(tasks.save(&mut task).await);
    }

    let query = tasks.filter("estimate", Op::Gt, 10);
    let plan = assert_ok!(query.plan());
    assert_eq!(plan.filter[0].value, Value::F64(10.0));

    let found = assert_ok!(query.all().await);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "large");

    let plan = assert_ok!(tasks.filter("estimate", Op::In, vec![Value::from(1), Value::from(2.5)]).plan());
    assert_eq!(plan.filter[0].value, Value::List(vec![Value::F64(1.0), Value::F64(2.5)]));
}

#[tokio::test]
async fn projection_reads_records() {
    let s = setup().await;
    let query = s
        .db
        .repository::<User>()
        .query()
        .select(["name", "address.city"])
        .order_by("name", Direction::Asc);

    let plan = assert_ok!(query.plan());
    assert_eq!(
        plan.projection.unwrap(),
        [
            Selection {
                path: "name".to_string(),
                column: "name".to_string(),
            },
            Selection {
                path: "address.city".to_string(),
                column: "address_city".to_string(),
            },
        ]
    );

    let records = assert_ok!(query.records().await);
    assert_eq!(
        records[0],
        Record::new().with("name", "Ana").with("address.city", "Rio")
    );
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn projected_query_cannot_materialize_objects() {
    let s = setup().await;

    let err = assert_err!(s.db.repository::<User>().query().select(["name"]).all().await);
    assert!(err.to_string().contains("records()"), "{err}");
    assert!(s.log.is_empty());
}

#[tokio::test]
async fn records_without_projection_are_keyed_by_attribute() {
    let s = setup().await;

    let records = assert_ok!(
        s.db.repository::<User>()
            .filter_by("name", "Bia")
            .records()
            .await
    );

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.get_or_null("name"), &Value::from("Bia"));
    assert_eq!(record.get_or_null("age"), &Value::from(22));
    assert_eq!(record.get_or_null("address.city"), &Value::from("Lima"));
    assert!(record.get_or_null("status").is_null());
    assert!(record.contains("id"));
}

#[tokio::test]
async fn count_honours_filters() {
    let s = setup().await;
    let users = s.db.repository::<User>();

    assert_eq!(assert_ok!(users.query().count().await), 3);
    assert_eq!(assert_ok!(users.filter_by("address.city", "Lima").count().await), 1);
}
