pub mod activity;
pub mod document;
pub mod user;
pub mod version;

pub use activity::{Activity, ActivityWithContext};
pub use document::{
    Document, DocumentPatch, DocumentWithAuthor, DocumentWithDetails, NewDocument,
};
pub use user::{NewUser, User, UserResponse};
pub use version::DocumentVersion;
