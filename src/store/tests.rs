//! Tests for the record store module

use super::*;
use crate::pagination::SortDirection;
use crate::posts::Post;
use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn post_at(minute: i64) -> Post {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Post::new_at(1, format!("post {minute}"), "body", base + Duration::minutes(minute))
}

async fn seeded(count: i64) -> MemoryStore<Post> {
    let store = MemoryStore::new();
    for minute in 0..count {
        store.save(post_at(minute)).await.unwrap();
    }
    store
}

fn ids(posts: &[Post]) -> Vec<i64> {
    posts.iter().map(|p| p.id).collect()
}

// ============================================================================
// IdFilter Tests
// ============================================================================

#[test_case(IdFilter::Any, 5, true ; "any")]
#[test_case(IdFilter::LessThan(5), 4, true ; "less than below")]
#[test_case(IdFilter::LessThan(5), 5, false ; "less than equal is exclusive")]
#[test_case(IdFilter::MoreThan(5), 6, true ; "more than above")]
#[test_case(IdFilter::MoreThan(5), 5, false ; "more than equal is exclusive")]
fn test_id_filter_matches(filter: IdFilter, id: i64, expected: bool) {
    assert_eq!(filter.matches(id), expected);
}

#[test]
fn test_find_options_builder() {
    let options = FindOptions::new()
        .with_filter(IdFilter::MoreThan(3))
        .ordered(SortDirection::Desc)
        .skip(10)
        .take(5);
    assert_eq!(options.filter, IdFilter::MoreThan(3));
    assert_eq!(options.order, SortDirection::Desc);
    assert_eq!(options.skip, 10);
    assert_eq!(options.take, Some(5));
}

// ============================================================================
// MemoryStore Tests
// ============================================================================

#[tokio::test]
async fn test_save_assigns_ascending_ids() {
    let store = seeded(3).await;
    assert_eq!(store.len().await, 3);

    let all = store.find(&FindOptions::new()).await.unwrap();
    assert_eq!(ids(&all), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_save_existing_replaces() {
    let store = seeded(2).await;
    let mut post = store.find_one(2).await.unwrap().unwrap();
    post.title = "edited".to_string();
    store.save(post).await.unwrap();

    assert_eq!(store.len().await, 2);
    assert_eq!(store.find_one(2).await.unwrap().unwrap().title, "edited");

    // Explicit ids move the id counter forward
    let mut explicit = post_at(10);
    explicit.id = 40;
    store.save(explicit).await.unwrap();
    let next = store.save(post_at(11)).await.unwrap();
    assert_eq!(next.id, 41);
}

#[tokio::test]
async fn test_find_orders_by_created_at() {
    let store = MemoryStore::new();
    // Inserted newest first, so id order and time order disagree
    for minute in [30, 20, 10] {
        store.save(post_at(minute)).await.unwrap();
    }

    let asc = store.find(&FindOptions::new()).await.unwrap();
    assert_eq!(ids(&asc), vec![3, 2, 1]);

    let desc = store
        .find(&FindOptions::new().ordered(SortDirection::Desc))
        .await
        .unwrap();
    assert_eq!(ids(&desc), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_find_breaks_timestamp_ties_by_id() {
    let store = MemoryStore::new();
    for _ in 0..4 {
        store.save(post_at(0)).await.unwrap();
    }

    let asc = store.find(&FindOptions::new()).await.unwrap();
    assert_eq!(ids(&asc), vec![1, 2, 3, 4]);

    let desc = store
        .find(&FindOptions::new().ordered(SortDirection::Desc))
        .await
        .unwrap();
    assert_eq!(ids(&desc), vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn test_find_with_filter_and_limit() {
    let store = seeded(10).await;

    let page = store
        .find(&FindOptions::new().with_filter(IdFilter::MoreThan(7)).take(5))
        .await
        .unwrap();
    assert_eq!(ids(&page), vec![8, 9, 10]);

    let page = store
        .find(
            &FindOptions::new()
                .with_filter(IdFilter::LessThan(5))
                .ordered(SortDirection::Desc)
                .take(2),
        )
        .await
        .unwrap();
    assert_eq!(ids(&page), vec![4, 3]);
}

#[tokio::test]
async fn test_find_and_count_ignores_window() {
    let store = seeded(10).await;

    let (page, total) = store
        .find_and_count(&FindOptions::new().skip(6).take(3))
        .await
        .unwrap();
    assert_eq!(ids(&page), vec![7, 8, 9]);
    assert_eq!(total, 10);

    let (page, total) = store
        .find_and_count(&FindOptions::new().skip(30).take(3))
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(total, 10);
}

#[tokio::test]
async fn test_delete() {
    let store = seeded(2).await;
    assert!(store.delete(1).await.unwrap());
    assert!(!store.delete(1).await.unwrap());
    assert!(store.find_one(1).await.unwrap().is_none());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = MemoryStore::new();
    let other = store.clone();
    store.save(post_at(0)).await.unwrap();
    assert!(!other.is_empty().await);
}
