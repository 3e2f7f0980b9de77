#![allow(dead_code)]

use sandftp::auth::InMemoryAuthenticator;
use sandftp::Server;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

pub const TEST_USER: &str = "test";
pub const TEST_PASSWORD: &str = "test";

/// Starts a server for the given root on the given port and waits until it
/// accepts connections. Each test uses its own port so they can run in
/// parallel within one process.
pub async fn spawn_server(port: u16, root: PathBuf) {
    let users = InMemoryAuthenticator::new();
    users.add_user(TEST_USER, TEST_PASSWORD);
    let server = Server::with_root(root)
        .greeting("Welcome test")
        .authenticator(Arc::new(users))
        .passive_ports(50000..=59999);
    tokio::spawn(server.listen(format!("127.0.0.1:{}", port)));

    // Poll until the control port answers.
    for _ in 0..50 {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server did not start listening on port {}", port);
}

pub fn addr(port: u16) -> String {
    format!("127.0.0.1:{}", port)
}

/// A line-oriented FTP control connection for driving the server directly.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connects and consumes the `220` banner.
    pub async fn connect(port: u16) -> TestClient {
        let stream = TcpStream::connect(addr(port)).await.expect("control connect");
        let (read_half, write_half) = stream.into_split();
        let mut client = TestClient {
            reader: BufReader::new(read_half),
            writer: write_half,
        };
        let banner = client.recv().await;
        assert!(banner.starts_with("220 "), "unexpected banner: {}", banner);
        client
    }

    pub async fn send(&mut self, line: &str) {
        self.writer.write_all(format!("{}\r\n", line).as_bytes()).await.expect("write command");
    }

    /// Reads one reply line, without the CRLF.
    pub async fn recv(&mut self) -> String {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await.expect("read reply");
        assert!(n > 0, "server closed the control connection");
        assert!(line.ends_with("\r\n"), "reply not CRLF terminated: {:?}", line);
        line.trim_end().to_string()
    }

    pub async fn cmd(&mut self, line: &str) -> String {
        self.send(line).await;
        self.recv().await
    }

    pub async fn login(&mut self) {
        let reply = self.cmd(&format!("USER {}", TEST_USER)).await;
        assert!(reply.starts_with("331 "), "unexpected USER reply: {}", reply);
        let reply = self.cmd(&format!("PASS {}", TEST_PASSWORD)).await;
        assert!(reply.starts_with("230 "), "unexpected PASS reply: {}", reply);
    }

    /// Reads until the server closes the connection, returning the number of
    /// bytes that were still in flight.
    pub async fn read_to_end(&mut self, buf: &mut Vec<u8>) -> usize {
        use tokio::io::AsyncReadExt;
        self.reader.read_to_end(buf).await.unwrap_or(0)
    }

    /// Issues PASV and connects to the advertised endpoint.
    pub async fn pasv(&mut self) -> TcpStream {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227 "), "unexpected PASV reply: {}", reply);
        TcpStream::connect(parse_pasv_addr(&reply)).await.expect("data connect")
    }
}

/// Extracts `h1,h2,h3,h4,p1,p2` from a 227 reply into `ip:port` form.
pub fn parse_pasv_addr(reply: &str) -> String {
    let open = reply.find('(').expect("no ( in PASV reply");
    let close = reply.rfind(')').expect("no ) in PASV reply");
    let parts: Vec<u32> = reply[open + 1..close]
        .split(',')
        .map(|p| p.trim().parse().expect("non-numeric PASV octet"))
        .collect();
    assert_eq!(parts.len(), 6, "unexpected PASV format: {}", reply);
    format!("{}.{}.{}.{}:{}", parts[0], parts[1], parts[2], parts[3], parts[4] * 256 + parts[5])
}
