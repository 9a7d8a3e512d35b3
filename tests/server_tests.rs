//! End-to-end server tests
//!
//! These tests run a real server on an ephemeral port and speak the wire
//! protocol over TCP.

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use lexikv::network::Server;
use lexikv::protocol::{read_response, write_command, Command, Response, Status};
use lexikv::{Config, Dictionary};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    _temp: TempDir,
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start() -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config::builder()
            .store_path(temp.path().join("dictionary.txt"))
            .listen_addr("127.0.0.1:0")
            .read_timeout_ms(2000)
            .write_timeout_ms(2000)
            .build();

        let dict = Arc::new(Dictionary::open(config.clone()).unwrap());
        let mut server = Server::new(config, dict).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();

        let handle = thread::spawn(move || {
            server.run().unwrap();
        });

        Self {
            _temp: temp,
            addr,
            shutdown,
            handle: Some(handle),
        }
    }

    fn connect(&self) -> Client {
        let stream = TcpStream::connect(self.addr).unwrap();
        Client {
            reader: BufReader::new(stream.try_clone().unwrap()),
            writer: BufWriter::new(stream),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    fn request(&mut self, command: Command) -> Response {
        write_command(&mut self.writer, &command).unwrap();
        read_response(&mut self.reader).unwrap()
    }
}

fn add(word: &str, definition: &str) -> Command {
    Command::Add {
        word: word.to_string(),
        definition: definition.to_string(),
    }
}

fn get(word: &str) -> Command {
    Command::Get {
        word: word.to_string(),
    }
}

fn remove(word: &str) -> Command {
    Command::Remove {
        word: word.to_string(),
    }
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_server_add_get_remove_lifecycle() {
    let server = TestServer::start();
    let mut client = server.connect();

    let response = client.request(add("cat", "a feline"));
    assert_eq!(response.status, Status::Ok);

    let response = client.request(get("cat"));
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload, Some(b"a feline".to_vec()));

    let response = client.request(add("cat", "small mammal"));
    assert_eq!(response.status, Status::Ok);

    let response = client.request(get("cat"));
    assert_eq!(response.payload, Some(b"small mammal".to_vec()));

    let response = client.request(remove("cat"));
    assert_eq!(response.status, Status::Ok);

    let response = client.request(get("cat"));
    assert_eq!(response.status, Status::NotFound);
}

#[test]
fn test_server_list_returns_json_document() {
    let server = TestServer::start();
    let mut client = server.connect();

    client.request(add("dog", "a canine"));
    client.request(add("cat", "a feline"));

    let response = client.request(Command::List);
    assert_eq!(response.status, Status::Ok);

    let listing: BTreeMap<String, String> =
        serde_json::from_slice(&response.payload.unwrap()).unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing["cat"], "a feline");
    assert_eq!(listing["dog"], "a canine");
}

#[test]
fn test_server_ping() {
    let server = TestServer::start();
    let mut client = server.connect();

    let response = client.request(Command::Ping);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload, Some(b"PONG".to_vec()));
}

#[test]
fn test_server_rejects_empty_word_as_bad_request() {
    let server = TestServer::start();
    let mut client = server.connect();

    let response = client.request(add("", "a feline"));
    assert_eq!(response.status, Status::BadRequest);

    let message = String::from_utf8(response.payload.unwrap()).unwrap();
    assert!(message.contains("word"));
}

#[test]
fn test_server_get_before_first_mutation_is_error() {
    let server = TestServer::start();
    let mut client = server.connect();

    // No mutation yet, so the store file does not exist.
    let response = client.request(get("cat"));
    assert_eq!(response.status, Status::Error);
}

#[test]
fn test_server_concurrent_clients() {
    let server = TestServer::start();

    let mut handles = vec![];
    for t in 0..4 {
        let mut client = server.connect();
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                let word = format!("thread{}_word{}", t, i);
                let definition = format!("thread{}_definition{}", t, i);
                let response = client.request(add(&word, &definition));
                assert_eq!(response.status, Status::Ok);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let mut client = server.connect();
    let response = client.request(Command::List);
    let listing: BTreeMap<String, String> =
        serde_json::from_slice(&response.payload.unwrap()).unwrap();

    assert_eq!(listing.len(), 40);
    for t in 0..4 {
        for i in 0..10 {
            let word = format!("thread{}_word{}", t, i);
            let expected = format!("thread{}_definition{}", t, i);
            assert_eq!(listing[&word], expected);
        }
    }
}
