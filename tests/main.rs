//! Drives a live server over the control channel: authentication, session
//! state, navigation and the single-reply file commands.

mod common;

use common::TestClient;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn banner_login_pwd_quit() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2121, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2121).await;
    assert!(client.cmd("USER test").await.starts_with("331 "));
    assert!(client.cmd("PASS test").await.starts_with("230 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory");
    assert_eq!(client.cmd("QUIT").await, "221 Goodbye");
}

#[tokio::test]
async fn commands_require_login() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2122, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2122).await;
    for cmd in ["PWD", "CWD dir1", "SYST", "TYPE I", "PASV", "LIST", "SIZE x", "MKD d", "FEAT"] {
        assert_eq!(client.cmd(cmd).await, "530 Not logged in", "command: {}", cmd);
    }
    // NOOP and QUIT stay available before authentication.
    assert!(client.cmd("NOOP").await.starts_with("200 "));
    assert!(client.cmd("QUIT").await.starts_with("221 "));
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2123, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2123).await;
    assert!(client.cmd("USER test").await.starts_with("331 "));
    assert!(client.cmd("PASS wrong").await.starts_with("530 "));
    // The failed attempt clears the username, so PASS alone is out of sequence.
    assert!(client.cmd("PASS test").await.starts_with("503 "));
    client.login().await;
}

#[tokio::test]
async fn pass_without_user_is_out_of_sequence() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2124, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2124).await;
    assert!(client.cmd("PASS test").await.starts_with("503 "));
}

#[tokio::test]
async fn unknown_verb_gets_502_with_name() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2125, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2125).await;
    client.login().await;
    assert_eq!(client.cmd("EPSV").await, "502 Command not implemented: EPSV");
}

#[tokio::test]
async fn syst_type_and_feat() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2126, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2126).await;
    client.login().await;

    assert_eq!(client.cmd("SYST").await, "215 UNIX Type: L8");

    // TYPE matching is case insensitive; anything but A and I is refused.
    assert!(client.cmd("TYPE I").await.starts_with("200 "));
    assert!(client.cmd("TYPE i").await.starts_with("200 "));
    assert!(client.cmd("TYPE a").await.starts_with("200 "));
    assert!(client.cmd("TYPE E").await.starts_with("504 "));

    // FEAT is the one multiline reply we emit.
    client.send("FEAT").await;
    let first = client.recv().await;
    assert!(first.starts_with("211-"), "unexpected FEAT opening: {}", first);
    let mut features = vec![];
    loop {
        let line = client.recv().await;
        if line.starts_with("211 ") {
            break;
        }
        features.push(line);
    }
    assert!(features.iter().any(|l| l.trim() == "SIZE"));
    assert!(features.iter().any(|l| l.trim() == "MDTM"));
    assert!(features.iter().any(|l| l.trim() == "REST STREAM"));
}

#[tokio::test]
async fn cwd_pwd_roundtrip_and_normalization() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("dir1/sub")).unwrap();
    common::spawn_server(2127, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2127).await;
    client.login().await;

    assert!(client.cmd("CWD dir1").await.starts_with("250 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/dir1\" is current directory");

    assert!(client.cmd("CWD sub").await.starts_with("250 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/dir1/sub\" is current directory");

    assert!(client.cmd("CDUP").await.starts_with("250 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/dir1\" is current directory");

    // An argument with dot segments that stays inside the sandbox is stored
    // in normalized form.
    assert!(client.cmd("CWD ./sub/../sub").await.starts_with("250 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/dir1/sub\" is current directory");

    // CDUP at the root stays at the root.
    assert!(client.cmd("CWD /").await.starts_with("250 "));
    assert!(client.cmd("CDUP").await.starts_with("250 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory");
}

#[tokio::test]
async fn cwd_refuses_to_leave_the_sandbox() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2128, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2128).await;
    client.login().await;

    assert!(client.cmd("CWD ../../etc").await.starts_with("550 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory");
}

#[tokio::test]
async fn cwd_to_missing_or_file_target_fails() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("plain.txt"), b"x").unwrap();
    common::spawn_server(2129, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2129).await;
    client.login().await;

    assert!(client.cmd("CWD nope").await.starts_with("550 "));
    assert!(client.cmd("CWD plain.txt").await.starts_with("550 "));
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory");
}

#[tokio::test]
async fn size_reports_file_length() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("hello.txt"), b"Hello, FTP!\n").unwrap();
    std::fs::create_dir(root.path().join("dir1")).unwrap();
    common::spawn_server(2130, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2130).await;
    client.login().await;

    assert_eq!(client.cmd("SIZE hello.txt").await, "213 12");
    assert!(client.cmd("SIZE dir1").await.starts_with("550 "));
    assert!(client.cmd("SIZE missing.txt").await.starts_with("550 "));
}

#[tokio::test]
async fn mdtm_reports_utc_timestamp() {
    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("hello.txt");
    std::fs::write(&file, b"Hello, FTP!\n").unwrap();
    common::spawn_server(2131, root.path().to_path_buf()).await;

    let mtime = std::fs::metadata(&file).unwrap().modified().unwrap();
    let expected = chrono::DateTime::<chrono::Utc>::from(mtime).format("%Y%m%d%H%M%S").to_string();

    let mut client = TestClient::connect(2131).await;
    client.login().await;

    assert_eq!(client.cmd("MDTM hello.txt").await, format!("213 {}", expected));
    assert!(client.cmd("MDTM missing.txt").await.starts_with("550 "));
}

#[tokio::test]
async fn mkd_dele_and_rmd() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2132, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2132).await;
    client.login().await;

    assert_eq!(client.cmd("MKD fresh").await, "257 \"/fresh\" directory created");
    assert!(root.path().join("fresh").is_dir());

    // Creating it again is a conflict.
    assert!(client.cmd("MKD fresh").await.starts_with("550 "));

    // RMD removes recursively.
    std::fs::write(root.path().join("fresh/inner.txt"), b"x").unwrap();
    assert!(client.cmd("RMD fresh").await.starts_with("250 "));
    assert!(!root.path().join("fresh").exists());

    std::fs::write(root.path().join("bye.txt"), b"x").unwrap();
    assert!(client.cmd("DELE bye.txt").await.starts_with("250 "));
    assert!(!root.path().join("bye.txt").exists());
    assert!(client.cmd("DELE bye.txt").await.starts_with("550 "));
}

#[tokio::test]
async fn mkd_outside_sandbox_is_refused() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2133, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2133).await;
    client.login().await;

    assert!(client.cmd("MKD /../escape").await.starts_with("550 "));
    assert!(!root.path().parent().unwrap().join("escape").exists());
}

#[tokio::test]
async fn stru_and_mode_accept_only_defaults() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2134, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2134).await;
    client.login().await;

    assert!(client.cmd("STRU F").await.starts_with("200 "));
    assert!(client.cmd("STRU R").await.starts_with("504 "));
    assert!(client.cmd("MODE S").await.starts_with("200 "));
    assert!(client.cmd("MODE B").await.starts_with("504 "));
    assert!(client.cmd("ALLO").await.starts_with("202 "));
    assert!(client.cmd("HELP").await.starts_with("214 "));
}

#[tokio::test]
async fn malformed_arguments_get_501() {
    let root = tempfile::tempdir().unwrap();
    common::spawn_server(2135, root.path().to_path_buf()).await;

    let mut client = TestClient::connect(2135).await;
    client.login().await;

    assert!(client.cmd("REST notanumber").await.starts_with("501 "));
    assert!(client.cmd("PORT 427,0,0,1,4,1").await.starts_with("501 "));
    assert!(client.cmd("PORT nonsense").await.starts_with("501 "));
    assert!(client.cmd("NOOP withargs").await.starts_with("501 "));
    // The session survives all of it.
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory");
}
