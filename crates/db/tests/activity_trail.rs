mod common;

use dochive_db::models::DocumentPatch;

use common::{new_document, seed_user, storage};

#[tokio::test]
async fn mutations_leave_an_audit_trail_newest_first() {
    let storage = storage();
    let author = seed_user(&storage, "ada@example.com").await;

    let document = storage
        .documents
        .create(new_document("Onboarding", "Welcome", author.id))
        .await
        .unwrap();
    storage
        .documents
        .update(
            document.id,
            DocumentPatch {
                title: Some("Onboarding Guide".to_string()),
                ..Default::default()
            },
            author.id,
        )
        .await
        .unwrap();

    let feed = storage.activities.recent(10).await.unwrap();
    assert_eq!(feed.len(), 2);

    assert_eq!(feed[0].activity.activity_type, "updated");
    assert_eq!(
        feed[0].activity.description,
        "Updated document \"Onboarding Guide\""
    );
    assert_eq!(feed[0].activity.document_id, Some(document.id));
    assert_eq!(
        feed[0].document.as_ref().map(|d| d.id),
        Some(document.id)
    );

    assert_eq!(feed[1].activity.activity_type, "created");
    assert_eq!(
        feed[1].activity.description,
        "Created document \"Onboarding\""
    );
    assert_eq!(feed[1].user.id, author.id);
}

#[tokio::test]
async fn deletion_leaves_one_record_with_no_document_reference() {
    let storage = storage();
    let author = seed_user(&storage, "ada@example.com").await;
    let document = storage
        .documents
        .create(new_document("Old Notes", "Obsolete", author.id))
        .await
        .unwrap();

    storage
        .documents
        .delete(document.id, author.id)
        .await
        .unwrap();

    let feed = storage.activities.recent(10).await.unwrap();

    // The "created" activity died with the document; only the deletion
    // record remains, and it points at nothing.
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].activity.activity_type, "deleted");
    assert_eq!(feed[0].activity.document_id, None);
    assert!(feed[0].document.is_none());
    assert_eq!(
        feed[0].activity.description,
        "Deleted document \"Old Notes\""
    );
    assert!(feed
        .iter()
        .all(|entry| entry.activity.document_id != Some(document.id)));
}

#[tokio::test]
async fn recent_truncates_to_the_newest_entries() {
    let storage = storage();
    let author = seed_user(&storage, "ada@example.com").await;

    for title in ["First", "Second", "Third"] {
        storage
            .documents
            .create(new_document(title, "content", author.id))
            .await
            .unwrap();
    }

    let feed = storage.activities.recent(2).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].activity.description, "Created document \"Third\"");
    assert_eq!(feed[1].activity.description, "Created document \"Second\"");
}

#[tokio::test]
async fn activities_with_unresolvable_users_are_dropped() {
    let storage = storage();
    let author = seed_user(&storage, "ada@example.com").await;

    storage
        .documents
        .create(new_document("Attributed", "fine", author.id))
        .await
        .unwrap();
    // An author id that was never registered: the activity is recorded
    // but cannot be joined, so the feed silently drops it.
    storage
        .documents
        .create(new_document("Unattributed", "dangling actor", 9999))
        .await
        .unwrap();

    let feed = storage.activities.recent(10).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(
        feed[0].activity.description,
        "Created document \"Attributed\""
    );
    assert_eq!(feed[0].user.id, author.id);
}
