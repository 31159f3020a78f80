//! Integration tests for the Reloader
//!
//! These tests edit files on disk and wait for the watcher to pick them up.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use temple::{Reloader, ReloaderConfig, Temple};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(10);

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Overwrite a file with a single write and no truncation
fn overwrite_in_place(path: &Path, content: &str) {
    let mut file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

/// Poll until `name` renders `expected`, or give up after `WAIT`
async fn wait_for_render(temple: &Temple, name: &str, expected: &str) -> bool {
    let deadline = tokio::time::Instant::now() + WAIT;
    while tokio::time::Instant::now() < deadline {
        let rendered = temple.get(name).and_then(|tpl| tpl.render(&json!({})).ok());
        if rendered.as_deref() == Some(expected) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_write_triggers_reload() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "page/base.temple", "before");

    let temple = Arc::new(Temple::new(temp.path()).unwrap());
    let reloader = Reloader::spawn(Arc::clone(&temple), &ReloaderConfig::default()).unwrap();

    write(temp.path(), "page/base.temple", "after");
    assert!(
        wait_for_render(&temple, "page", "after").await,
        "Reloader should pick up the edit"
    );

    reloader.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_reload_keeps_serving_previous_templates() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "page/base.temple", "good");

    let temple = Arc::new(Temple::new(temp.path()).unwrap());
    let reloader = Reloader::spawn(Arc::clone(&temple), &ReloaderConfig::default()).unwrap();

    // Longer than the old content, so nothing of it survives
    overwrite_in_place(&temp.path().join("page/base.temple"), "{{#if broken}}");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(temple.get("page").unwrap().render(&json!({})).unwrap(), "good");

    // A later good edit recovers
    write(temp.path(), "page/base.temple", "fixed");
    assert!(wait_for_render(&temple, "page", "fixed").await);

    reloader.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_new_files_need_resync() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "page/base.temple", "page");

    let temple = Arc::new(Temple::new(temp.path()).unwrap());
    let mut reloader = Reloader::spawn(Arc::clone(&temple), &ReloaderConfig::default()).unwrap();
    assert_eq!(reloader.watched(), vec![temp.path().join("page/base.temple")]);

    write(temp.path(), "blog/base.temple", "blog v1");
    temple.reload().unwrap();

    // Not watched until resynced
    assert_eq!(reloader.watched().len(), 1);

    let report = reloader.resync().unwrap();
    assert_eq!(report.added, vec![temp.path().join("blog/base.temple")]);
    assert!(report.removed.is_empty());
    assert_eq!(reloader.watched().len(), 2);

    write(temp.path(), "blog/base.temple", "blog v2");
    assert!(wait_for_render(&temple, "blog", "blog v2").await);

    reloader.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resync_drops_removed_files() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "page/base.temple", "page");
    write(temp.path(), "old/base.temple", "old");

    let temple = Arc::new(Temple::new(temp.path()).unwrap());
    let mut reloader = Reloader::spawn(Arc::clone(&temple), &ReloaderConfig::default()).unwrap();

    fs::remove_dir_all(temp.path().join("old")).unwrap();
    temple.reload().unwrap();

    let report = reloader.resync().unwrap();
    assert_eq!(report.removed, vec![temp.path().join("old/base.temple")]);
    assert_eq!(reloader.watched(), vec![temp.path().join("page/base.temple")]);

    reloader.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_close_stops_reloading() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "page/base.temple", "before");

    let temple = Arc::new(Temple::new(temp.path()).unwrap());
    let reloader = Reloader::spawn(Arc::clone(&temple), &ReloaderConfig::default()).unwrap();
    reloader.close().await;

    write(temp.path(), "page/base.temple", "after");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(temple.get("page").unwrap().render(&json!({})).unwrap(), "before");
}
