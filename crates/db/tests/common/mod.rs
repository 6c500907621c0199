use dochive_core::types::DbId;
use dochive_db::models::{NewDocument, NewUser, User};
use dochive_db::Storage;

pub fn storage() -> Storage {
    Storage::memory()
}

pub async fn seed_user(storage: &Storage, email: &str) -> User {
    storage
        .users
        .create(NewUser {
            email: email.to_string(),
            password_hash: "argon2-hash-placeholder".to_string(),
            display_name: "Test User".to_string(),
            role: "user".to_string(),
        })
        .await
        .expect("user should be created")
}

pub fn new_document(title: &str, content: &str, author_id: DbId) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        content: content.to_string(),
        summary: None,
        tags: Vec::new(),
        author_id,
    }
}
