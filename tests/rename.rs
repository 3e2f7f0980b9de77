//! RNFR/RNTO sequencing and renames across directories.

mod common;

use common::TestClient;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn rename_a_file() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("hello.txt"), b"Hello, FTP!\n").unwrap();
    common::spawn_server(2160, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2160).await;
    client.login().await;

    assert!(client.cmd("RNFR hello.txt").await.starts_with("350 "));
    assert_eq!(client.cmd("RNTO hi.txt").await, "250 Rename successful");

    assert!(!root.path().join("hello.txt").exists());
    assert_eq!(std::fs::read(root.path().join("hi.txt")).unwrap(), b"Hello, FTP!\n");
}

#[tokio::test]
async fn rename_a_directory_into_another() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("src_dir")).unwrap();
    std::fs::create_dir(root.path().join("dst_dir")).unwrap();
    std::fs::write(root.path().join("src_dir/inner.txt"), b"x").unwrap();
    common::spawn_server(2161, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2161).await;
    client.login().await;

    assert!(client.cmd("RNFR src_dir").await.starts_with("350 "));
    assert!(client.cmd("RNTO dst_dir/moved").await.starts_with("250 "));
    assert!(root.path().join("dst_dir/moved/inner.txt").exists());
}

#[tokio::test]
async fn rnto_requires_rnfr_first() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("hello.txt"), b"x").unwrap();
    common::spawn_server(2162, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2162).await;
    client.login().await;

    assert!(client.cmd("RNTO other.txt").await.starts_with("503 "));

    // A completed rename clears the pending source.
    assert!(client.cmd("RNFR hello.txt").await.starts_with("350 "));
    assert!(client.cmd("RNTO hi.txt").await.starts_with("250 "));
    assert!(client.cmd("RNTO again.txt").await.starts_with("503 "));
}

#[tokio::test]
async fn rnfr_missing_source_fails_and_clears_state() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2163, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2163).await;
    client.login().await;

    assert!(client.cmd("RNFR missing.txt").await.starts_with("550 "));
    assert!(client.cmd("RNTO other.txt").await.starts_with("503 "));
}

#[tokio::test]
async fn rnto_outside_sandbox_is_refused() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("hello.txt"), b"x").unwrap();
    common::spawn_server(2164, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2164).await;
    client.login().await;

    assert!(client.cmd("RNFR hello.txt").await.starts_with("350 "));
    assert!(client.cmd("RNTO ../stolen.txt").await.starts_with("550 "));
    assert!(root.path().join("hello.txt").exists());
    assert!(!root.path().parent().unwrap().join("stolen.txt").exists());
}
