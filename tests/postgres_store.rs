//! PostgreSQL backend round-trip. Needs a reachable server:
//! `DATABASE_URL=postgres://... cargo test --test postgres_store -- --ignored`

use campus_api::{
    Collection, Course, Discipline, DocumentStore, Filter, PgDocumentStore, RecordId, RepoError,
    Repository, StoreError,
};
use serde_json::json;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;

async fn store() -> PgDocumentStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let schema = format!("t_{}", uuid::Uuid::new_v4().simple());
    let options = PgConnectOptions::from_str(&url).unwrap();
    PgDocumentStore::connect(options, 2, &schema).await.unwrap()
}

#[tokio::test]
#[ignore]
async fn crud_round_trip() {
    let store = store().await;
    let courses: Repository<Course> = Repository::open(&store, "cursos").await.unwrap();

    let ids = courses
        .insert_many(vec![
            Course { id: None, name: "Física".into() },
            Course { id: None, name: "Química".into() },
        ])
        .await
        .unwrap();
    let listed = courses.list(&Filter::all()).await.unwrap();
    assert_eq!(listed.iter().map(|c| c.id.unwrap()).collect::<Vec<_>>(), ids);

    let q = vec![("nome".to_string(), "Química".to_string())];
    let found = courses.list_by_query(&q).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(ids[1]));

    let id = ids[0].to_string();
    let patch = json!({"nome": "Física Aplicada", "_id": RecordId::generate().to_string()});
    let updated = courses.update(&id, patch.as_object().unwrap()).await.unwrap();
    assert_eq!(updated.name, "Física Aplicada");
    assert_eq!(updated.id, Some(ids[0]));

    assert_eq!(courses.delete(&id).await.unwrap(), 1);
    assert_eq!(courses.delete(&id).await.unwrap(), 0);
    assert!(matches!(courses.get_by_id(&id).await, Err(RepoError::NotFound { .. })));
    store.close().await;
}

#[tokio::test]
#[ignore]
async fn integer_filters_and_duplicate_ids() {
    let store = store().await;
    let disciplines: Repository<Discipline> = Repository::open(&store, "disciplinas").await.unwrap();
    disciplines
        .insert_many(vec![
            Discipline { id: None, name: "Cálculo".into(), workload_hours: 60 },
            Discipline { id: None, name: "Álgebra".into(), workload_hours: 90 },
        ])
        .await
        .unwrap();
    let q = vec![("cargaHoraria".to_string(), "90".to_string())];
    let found = disciplines.list_by_query(&q).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Álgebra");

    let raw = store.collection("disciplinas").await.unwrap();
    let id = RecordId::generate();
    raw.insert_one(id, serde_json::Map::new()).await.unwrap();
    let err = raw.insert_one(id, serde_json::Map::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(d) if d == id));
    store.close().await;
}
