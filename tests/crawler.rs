//! Crawler Integration Tests
//!
//! Tests for paginated listing, recursive crawling with cycles, and URL
//! resolution against an in-memory wiki.

mod common;

use std::sync::atomic::Ordering;

use common::FakeWiki;
use wiki_cursors::core::crawler::{
    build_image_requests, fetch_members, filter_image_files, CategoryCrawler,
    SUPPORTED_EXTENSIONS,
};
use wiki_cursors::core::image_info::resolve_image_urls;
use wiki_cursors::domain::{ImageRequest, MemberType};

#[tokio::test]
async fn test_pagination_follows_continue_token() {
    let files = ["File:1.png", "File:2.png", "File:3.png", "File:4.png", "File:5.png"];
    let wiki = FakeWiki::new().category("Category:Coins", &files, &[]);

    let items = fetch_members(&wiki, "Category:Coins", 2, MemberType::File).await;

    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, files);
    assert_eq!(wiki.listing_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failed_first_page_returns_empty() {
    let wiki = FakeWiki::new().failing("Category:Broken");
    let items = fetch_members(&wiki, "Category:Broken", 200, MemberType::File).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_failed_later_page_keeps_earlier_pages() {
    let files = ["File:1.png", "File:2.png", "File:3.png", "File:4.png", "File:5.png"];
    let wiki = FakeWiki::new()
        .category("Category:Coins", &files, &[])
        .failing_from_page("Category:Coins", 2);

    let items = fetch_members(&wiki, "Category:Coins", 2, MemberType::File).await;

    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, &files[..4]);
    assert_eq!(wiki.listing_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_cycle_terminates_with_union() {
    let wiki = FakeWiki::new()
        .category(
            "Category:A",
            &["File:a1.png", "File:shared.png"],
            &["Category:B"],
        )
        .category(
            "Category:B",
            &["File:b1.svg", "File:shared.png"],
            &["Category:A"],
        );

    let mut crawler = CategoryCrawler::new(&wiki, 200);
    let files = crawler.fetch_all_recursively("Category:A").await;

    let titles: Vec<_> = files.keys().map(String::as_str).collect();
    assert_eq!(titles, vec!["File:a1.png", "File:b1.svg", "File:shared.png"]);
    assert_eq!(crawler.visited().len(), 2);
}

#[tokio::test]
async fn test_diamond_visits_each_category_once() {
    let wiki = FakeWiki::new()
        .category("Category:Root", &[], &["Category:Left", "Category:Right"])
        .category("Category:Left", &["File:l.png"], &["Category:Bottom"])
        .category("Category:Right", &["File:r.png"], &["Category:Bottom"])
        .category("Category:Bottom", &["File:b.png"], &[]);

    let mut crawler = CategoryCrawler::new(&wiki, 200);
    let files = crawler.fetch_all_recursively("Category:Root").await;

    assert_eq!(files.len(), 3);
    assert_eq!(crawler.visited().len(), 4);
    // Two listings (files + subcategories) per visited category
    assert_eq!(wiki.listing_calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_failing_branch_does_not_abort_crawl() {
    let wiki = FakeWiki::new()
        .category("Category:Root", &["File:root.png"], &["Category:Bad", "Category:Good"])
        .category("Category:Good", &["File:good.png"], &[])
        .failing("Category:Bad");

    let mut crawler = CategoryCrawler::new(&wiki, 200);
    let files = crawler.fetch_all_recursively("Category:Root").await;

    let titles: Vec<_> = files.keys().map(String::as_str).collect();
    assert_eq!(titles, vec!["File:good.png", "File:root.png"]);
}

#[tokio::test]
async fn test_filter_then_build_requests() {
    let wiki = FakeWiki::new().category(
        "Category:Icons",
        &["File:Attack icon.png", "File:Prayer.svg", "File:Clip.ogg"],
        &[],
    );

    let mut crawler = CategoryCrawler::new(&wiki, 200);
    let files = filter_image_files(crawler.fetch_all_recursively("Category:Icons").await);
    let requests = build_image_requests(files.values(), SUPPORTED_EXTENSIONS);

    let keys: Vec<_> = requests.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["Attack icon", "Prayer"]);
}

#[tokio::test]
async fn test_resolve_urls_in_chunks() {
    let mut wiki = FakeWiki::new();
    let mut requests = Vec::new();
    for n in 0..120 {
        let title = format!("File:Icon {}.png", n);
        wiki = wiki.image(&title, &format!("https://wiki/images/{}.png", n), Vec::new());
        requests.push(ImageRequest {
            file_title: title,
            key: format!("Icon {}", n),
        });
    }

    let urls = resolve_image_urls(&wiki, &requests, 2).await;

    assert_eq!(urls.len(), 120);
    assert_eq!(urls["Icon 7"], "https://wiki/images/7.png");

    let mut chunks = wiki.info_chunks.lock().unwrap().clone();
    chunks.sort();
    assert_eq!(chunks, vec![20, 50, 50]);
}

#[tokio::test]
async fn test_shared_title_and_unresolved_titles() {
    let wiki = FakeWiki::new().image("File:Coins.png", "https://wiki/images/Coins.png", Vec::new());

    let requests = vec![
        ImageRequest {
            file_title: "File:Coins.png".to_string(),
            key: "Coins".to_string(),
        },
        ImageRequest {
            file_title: "File:Coins.png".to_string(),
            key: "Coins alias".to_string(),
        },
        ImageRequest {
            file_title: "File:Missing.png".to_string(),
            key: "Missing".to_string(),
        },
    ];

    let urls = resolve_image_urls(&wiki, &requests, 2).await;

    assert_eq!(urls.len(), 2);
    assert_eq!(urls["Coins"], urls["Coins alias"]);
    assert!(!urls.contains_key("Missing"));
    // Distinct titles only
    assert_eq!(*wiki.info_chunks.lock().unwrap(), vec![2]);
}
