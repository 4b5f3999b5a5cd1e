//! Database integration tests with DuckDB
//!
//! Runs the posts service against a DuckDB file in a temp directory.

use postboard::config::Settings;
use postboard::database::DatabaseStore;
use postboard::posts::{CreatePost, PostsService, UpdatePost};
use postboard::upload::ObjectStoreStager;
use postboard::Error;
use std::sync::Arc;

fn service(store: DatabaseStore) -> PostsService {
    PostsService::new(
        Arc::new(store),
        Arc::new(Settings::default()),
        Arc::new(ObjectStoreStager::in_memory()),
    )
}

#[tokio::test]
async fn test_cursor_traversal_over_duckdb() {
    let dir = tempfile::tempdir().unwrap();
    let posts = service(DatabaseStore::open(dir.path().join("posts.duckdb")).unwrap());
    posts.generate_posts(1, 7).await.unwrap();

    let mut query = vec![("take".to_string(), "3".to_string())];
    let mut seen = Vec::new();
    loop {
        let page = posts.paginate_posts(query.clone()).await.unwrap();
        seen.extend(page.data().iter().map(|p| p.id));
        let Some(next) = page.next_url() else { break };
        query = url::Url::parse(next)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
    }

    assert_eq!(seen, (1..=7).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_page_mode_over_duckdb() {
    let posts = service(DatabaseStore::open_in_memory().unwrap());
    posts.generate_posts(1, 5).await.unwrap();

    let page = posts
        .paginate_posts([("page", "2"), ("take", "2"), ("order__createdAt", "DESC")])
        .await
        .unwrap();
    let numbered = page.as_numbered().unwrap();

    assert_eq!(numbered.total, 5);
    assert_eq!(
        numbered.data.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![3, 2]
    );
}

#[tokio::test]
async fn test_writes_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posts.duckdb");

    let id = {
        let posts = service(DatabaseStore::open(&path).unwrap());
        let post = posts
            .create_post(
                9,
                CreatePost {
                    title: "durable".to_string(),
                    content: "body".to_string(),
                    image: None,
                },
            )
            .await
            .unwrap();
        posts
            .update_post(
                post.id,
                UpdatePost {
                    title: None,
                    content: Some("edited".to_string()),
                },
            )
            .await
            .unwrap();
        post.id
    };

    let posts = service(DatabaseStore::open(&path).unwrap());
    let post = posts.get_post(id).await.unwrap();
    assert_eq!(post.author_id, 9);
    assert_eq!(post.content, "edited");

    posts.delete_post(id).await.unwrap();
    assert!(matches!(posts.get_post(id).await, Err(Error::NotFound { .. })));
}
