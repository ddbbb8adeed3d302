//! Integration tests: repositories over each document store backend

use std::sync::Arc;

use portfolio_store::{
    DocumentStore, Experience, InMemoryDocumentStore, OwnerId, PersonalInfo, Project, Repository,
    Skill, StoreError, UpsertOutcome,
};
use serde_json::json;

async fn alice_scenario(store: Arc<dyn DocumentStore>) {
    let projects = Repository::<Project>::new(store);
    let alice = OwnerId::generate();

    let created = projects
        .create(&alice, json!({ "title": "P1", "description": "D1" }))
        .await
        .unwrap();
    assert_eq!(created.owner, alice);
    assert!(created.tech_stack.is_empty());

    let listed = projects.list(&alice).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    projects.delete(&alice, &created.id).await.unwrap();
    assert!(projects.list(&alice).await.unwrap().is_empty());

    let again = projects.delete(&alice, &created.id).await;
    assert!(matches!(again, Err(StoreError::NotFound(_))));
}

async fn owners_are_isolated(store: Arc<dyn DocumentStore>) {
    let skills = Repository::<Skill>::new(Arc::clone(&store));
    let experience = Repository::<Experience>::new(store);
    let alice = OwnerId::generate();
    let bob = OwnerId::generate();

    let skill = skills
        .create(&alice, json!({ "name": "Rust", "category": "backend", "proficiency": 9 }))
        .await
        .unwrap();
    let job = experience
        .create(
            &alice,
            json!({
                "title": "Engineer",
                "company": "Acme",
                "period": "2021 - Present",
                "description": "Built things",
                "current": true
            }),
        )
        .await
        .unwrap();

    // Bob sees nothing and can change nothing
    assert!(skills.list(&bob).await.unwrap().is_empty());
    assert!(matches!(
        skills.update(&bob, &skill.id, json!({ "name": "Hacked" })).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        experience.delete(&bob, &job.id).await,
        Err(StoreError::NotFound(_))
    ));

    // Alice's rows are untouched
    assert_eq!(skills.list(&alice).await.unwrap()[0].name, "Rust");
    assert_eq!(experience.list(&alice).await.unwrap().len(), 1);
}

async fn projects_newest_first(store: Arc<dyn DocumentStore>) {
    let projects = Repository::<Project>::new(store);
    let owner = OwnerId::generate();

    for title in ["first", "second", "third"] {
        projects
            .create(&owner, json!({ "title": title, "description": "d" }))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let titles: Vec<String> = projects
        .list(&owner)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

async fn personal_info_upsert(store: Arc<dyn DocumentStore>) {
    let info = Repository::<PersonalInfo>::new(store);
    let owner = OwnerId::generate();

    let (created, outcome) = info
        .upsert(
            &owner,
            json!({
                "name": "alice",
                "title": "Software Developer",
                "bio": "Welcome to my portfolio!",
                "email": "a@x.com"
            }),
        )
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);

    let (replaced, outcome) = info
        .upsert(&owner, json!({ "bio": "Rustacean", "github": "https://github.com/alice" }))
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Replaced);
    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.name, "alice");
    assert_eq!(replaced.bio, "Rustacean");
    assert_eq!(replaced.github.as_deref(), Some("https://github.com/alice"));
    assert!(replaced.updated_at >= created.updated_at);

    let found = info.find_one(&owner).await.unwrap().unwrap();
    assert_eq!(found, replaced);
}

async fn concurrent_upserts_keep_one_record(store: Arc<dyn DocumentStore>) {
    let info = Repository::<PersonalInfo>::new(Arc::clone(&store));
    let owners: Vec<OwnerId> = (0..200).map(|_| OwnerId::generate()).collect();

    let mut tasks = Vec::new();
    for owner in &owners {
        for n in 0..4 {
            let info = info.clone();
            let owner = owner.clone();
            tasks.push(tokio::spawn(async move {
                info.upsert(
                    &owner,
                    json!({
                        "name": format!("writer {n}"),
                        "title": "Software Developer",
                        "bio": "Welcome to my portfolio!",
                        "email": "a@x.com"
                    }),
                )
                .await
                .unwrap()
                .1
            }));
        }
    }

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap() == UpsertOutcome::Created {
            created += 1;
        }
    }
    assert_eq!(created, owners.len());

    for owner in &owners {
        let rows = store.find_by_owner("personal_info", owner).await.unwrap();
        assert_eq!(rows.len(), 1, "owner {owner} has {} rows", rows.len());
    }
}

#[tokio::test]
async fn test_memory_alice_scenario() {
    alice_scenario(Arc::new(InMemoryDocumentStore::new())).await;
}

#[tokio::test]
async fn test_memory_owners_are_isolated() {
    owners_are_isolated(Arc::new(InMemoryDocumentStore::new())).await;
}

#[tokio::test]
async fn test_memory_projects_newest_first() {
    projects_newest_first(Arc::new(InMemoryDocumentStore::new())).await;
}

#[tokio::test]
async fn test_memory_personal_info_upsert() {
    personal_info_upsert(Arc::new(InMemoryDocumentStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_concurrent_upserts() {
    concurrent_upserts_keep_one_record(Arc::new(InMemoryDocumentStore::new())).await;
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use portfolio_store::SqliteDocumentStore;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(SqliteDocumentStore::in_memory().unwrap())
    }

    #[tokio::test]
    async fn test_sqlite_alice_scenario() {
        alice_scenario(store()).await;
    }

    #[tokio::test]
    async fn test_sqlite_owners_are_isolated() {
        owners_are_isolated(store()).await;
    }

    #[tokio::test]
    async fn test_sqlite_projects_newest_first() {
        projects_newest_first(store()).await;
    }

    #[tokio::test]
    async fn test_sqlite_personal_info_upsert() {
        personal_info_upsert(store()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sqlite_concurrent_upserts() {
        concurrent_upserts_keep_one_record(store()).await;
    }

    #[tokio::test]
    async fn test_sqlite_file_persistence() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("portfolio.db");
        let path = path.to_str().unwrap();
        let owner = OwnerId::generate();

        {
            let projects =
                Repository::<Project>::new(Arc::new(SqliteDocumentStore::open(path).unwrap()));
            projects
                .create(&owner, json!({ "title": "Kept", "description": "d" }))
                .await
                .unwrap();
        }

        let projects =
            Repository::<Project>::new(Arc::new(SqliteDocumentStore::open(path).unwrap()));
        let listed = projects.list(&owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Kept");
    }
}
