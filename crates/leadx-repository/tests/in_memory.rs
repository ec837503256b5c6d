use std::sync::Arc;

use leadx_repository::{
    InMemoryRepository, InsertPosition, Predicate, Record, Repository, RepositoryError,
};

#[derive(Debug, Clone, PartialEq)]
struct Switch {
    id: String,
    label: String,
    on: bool,
}

impl Record for Switch {
    const KIND: &'static str = "switch";

    fn id(&self) -> &str {
        &self.id
    }
}

fn switch(id: &str, on: bool) -> Switch {
    Switch {
        id: id.to_string(),
        label: format!("switch {id}"),
        on,
    }
}

fn seeded() -> InMemoryRepository<Switch> {
    InMemoryRepository::with_records(vec![switch("1", true), switch("2", false), switch("3", true)])
}

#[tokio::test]
async fn get_returns_record_or_not_found() {
    let repo = seeded();

    assert_eq!(repo.get("2").await.unwrap(), switch("2", false));
    assert_eq!(
        repo.get("9").await.unwrap_err(),
        RepositoryError::NotFound {
            kind: "switch",
            id: "9".to_string()
        }
    );
}

#[tokio::test]
async fn list_keeps_store_order() {
    let repo = seeded();

    let on = repo.list(&|s: &Switch| s.on).await.unwrap();
    let ids: Vec<&str> = on.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(repo.all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn list_accepts_borrowing_predicate_through_trait_object() {
    let repo: Arc<dyn Repository<Switch>> = Arc::new(seeded());
    let wanted = String::from("switch 3");
    let predicate: &Predicate<Switch> = &|s: &Switch| s.label == wanted || s.id.as_str() == "1";

    let matched = repo.list(predicate).await.unwrap();
    let labels: Vec<&str> = matched.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["switch 1", "switch 3"]);
}

#[tokio::test]
async fn update_replaces_with_patched_copy() {
    let repo = seeded();
    let before = repo.get("2").await.unwrap();

    let after = repo
        .update(
            "2",
            Box::new(|s: &Switch| Switch {
                on: !s.on,
                ..s.clone()
            }),
        )
        .await
        .unwrap();

    assert!(after.on);
    assert!(!before.on);
    assert_eq!(repo.get("2").await.unwrap(), after);
}

#[tokio::test]
async fn update_rejects_missing_id_and_id_changes() {
    let repo = seeded();

    let missing = repo
        .update("42", Box::new(|s: &Switch| s.clone()))
        .await
        .unwrap_err();
    assert!(matches!(missing, RepositoryError::NotFound { .. }));

    let renamed = repo
        .update(
            "1",
            Box::new(|s: &Switch| Switch {
                id: "100".to_string(),
                ..s.clone()
            }),
        )
        .await
        .unwrap_err();
    assert!(matches!(renamed, RepositoryError::IdChanged { .. }));
    assert_eq!(repo.get("1").await.unwrap(), switch("1", true));
}

#[tokio::test]
async fn insert_respects_position_and_uniqueness() {
    let repo = seeded();

    repo.insert(switch("0", false), InsertPosition::Front)
        .await
        .unwrap();
    repo.insert(switch("4", false), InsertPosition::Back)
        .await
        .unwrap();

    let ids: Vec<String> = repo.all().await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);

    let dup = repo
        .insert(switch("3", false), InsertPosition::Back)
        .await
        .unwrap_err();
    assert_eq!(dup.to_string(), "switch '3' already exists");
}

#[tokio::test]
async fn seeding_drops_duplicate_ids() {
    let repo = InMemoryRepository::with_records(vec![switch("1", true), switch("1", false)]);

    assert_eq!(repo.len().await, 1);
    assert!(repo.get("1").await.unwrap().on);
}

#[tokio::test]
async fn concurrent_toggles_are_all_applied() {
    let repo: Arc<dyn Repository<Switch>> = Arc::new(seeded());

    let mut handles = Vec::new();
    for _ in 0..4 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.update(
                "1",
                Box::new(|s: &Switch| Switch {
                    on: !s.on,
                    ..s.clone()
                }),
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert!(repo.get("1").await.unwrap().on);
    assert_eq!(repo.get("1").await.unwrap().label, "switch 1");
}
