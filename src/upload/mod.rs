//! Upload staging
//!
//! Uploaded files land in a temp area first and are moved into the posts
//! area once a post references them.

mod stager;

pub use stager::{FileStager, ObjectStoreStager};
