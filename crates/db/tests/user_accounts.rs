mod common;

use assert_matches::assert_matches;
use dochive_db::models::NewUser;
use dochive_db::StoreError;

use common::{seed_user, storage};

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let storage = storage();
    seed_user(&storage, "ada@example.com").await;

    let duplicate = storage
        .users
        .create(NewUser {
            email: "ada@example.com".to_string(),
            password_hash: "another-hash".to_string(),
            display_name: "Second Ada".to_string(),
            role: "user".to_string(),
        })
        .await;

    assert_matches!(duplicate, Err(StoreError::Conflict(_)));
    assert_eq!(storage.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn lookup_by_email_and_id_agree() {
    let storage = storage();
    let created = seed_user(&storage, "ada@example.com").await;

    let by_email = storage
        .users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(by_email.id, created.id);

    let by_id = storage
        .users
        .find_by_id(created.id)
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(by_id.email, "ada@example.com");

    assert!(storage
        .users
        .find_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn display_name_can_be_changed() {
    let storage = storage();
    let user = seed_user(&storage, "ada@example.com").await;

    let renamed = storage
        .users
        .update_display_name(user.id, "Ada L.")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(renamed.display_name, "Ada L.");

    assert!(storage
        .users
        .update_display_name(9999, "Nobody")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn password_update_reports_whether_user_exists() {
    let storage = storage();
    let user = seed_user(&storage, "ada@example.com").await;

    assert!(storage
        .users
        .update_password(user.id, "new-hash")
        .await
        .unwrap());
    let reloaded = storage
        .users
        .find_by_id(user.id)
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(reloaded.password_hash, "new-hash");

    assert!(!storage.users.update_password(9999, "hash").await.unwrap());
}
