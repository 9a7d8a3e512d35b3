//! Tests for the Dictionary service
//!
//! These tests verify:
//! - Basic add/get/remove/list operations
//! - Input validation
//! - Command execution
//! - Concurrent access patterns
//! - Service lifecycle (open/close)

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use std::thread;

use lexikv::error::LexiError;
use lexikv::protocol::Command;
use lexikv::{Config, Dictionary};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dict() -> (TempDir, Dictionary) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .store_path(temp_dir.path().join("dictionary.txt"))
        .build();
    let dict = Dictionary::open(config).unwrap();
    (temp_dir, dict)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_add_then_get() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("cat", "a feline").unwrap();

    assert_eq!(dict.get("cat").unwrap(), Some("a feline".to_string()));
}

#[test]
fn test_add_overwrites_previous_definition() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("cat", "a feline").unwrap();
    dict.add("cat", "small mammal").unwrap();

    assert_eq!(dict.get("cat").unwrap(), Some("small mammal".to_string()));

    // Exactly one line for the word after the upsert.
    let content = fs::read_to_string(dict.store_path()).unwrap();
    assert_eq!(content.lines().filter(|l| l.starts_with("cat:")).count(), 1);
}

#[test]
fn test_get_missing_word() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("cat", "a feline").unwrap();

    assert_eq!(dict.get("dog").unwrap(), None);
}

#[test]
fn test_remove_then_get() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("cat", "a feline").unwrap();
    dict.remove("cat").unwrap();

    assert_eq!(dict.get("cat").unwrap(), None);
}

#[test]
fn test_remove_nonexistent_word_is_ok() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("cat", "a feline").unwrap();
    dict.remove("dog").unwrap();

    assert_eq!(dict.get("cat").unwrap(), Some("a feline".to_string()));
}

#[test]
fn test_list_contains_all_entries() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("dog", "a canine").unwrap();
    dict.add("cat", "a feline").unwrap();

    let listing = dict.list().unwrap();

    let mut expected = BTreeMap::new();
    expected.insert("cat".to_string(), "a feline".to_string());
    expected.insert("dog".to_string(), "a canine".to_string());
    assert_eq!(listing, expected);
}

// =============================================================================
// Missing Store Tests
// =============================================================================

#[test]
fn test_get_before_first_mutation_is_unavailable() {
    let (_temp, dict) = setup_temp_dict();

    match dict.get("cat") {
        Err(LexiError::StoreUnavailable(_)) => {}
        other => panic!("Expected StoreUnavailable, got {:?}", other),
    }
}

#[test]
fn test_list_before_first_mutation_is_unavailable() {
    let (_temp, dict) = setup_temp_dict();

    match dict.list() {
        Err(LexiError::StoreUnavailable(_)) => {}
        other => panic!("Expected StoreUnavailable, got {:?}", other),
    }
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_add_empty_word_is_rejected() {
    let (_temp, dict) = setup_temp_dict();

    match dict.add("", "a feline") {
        Err(LexiError::MissingField("word")) => {}
        other => panic!("Expected MissingField(word), got {:?}", other),
    }
}

#[test]
fn test_add_empty_definition_is_rejected() {
    let (_temp, dict) = setup_temp_dict();

    match dict.add("cat", "") {
        Err(LexiError::MissingField("definition")) => {}
        other => panic!("Expected MissingField(definition), got {:?}", other),
    }
}

#[test]
fn test_remove_empty_word_is_rejected() {
    let (_temp, dict) = setup_temp_dict();

    match dict.remove("") {
        Err(LexiError::MissingField("word")) => {}
        other => panic!("Expected MissingField(word), got {:?}", other),
    }
}

#[test]
fn test_get_empty_word_is_rejected() {
    let (_temp, dict) = setup_temp_dict();

    match dict.get("") {
        Err(LexiError::MissingField("word")) => {}
        other => panic!("Expected MissingField(word), got {:?}", other),
    }
}

// =============================================================================
// Duplicate Key Semantics Tests
// =============================================================================

#[test]
fn test_lookup_first_match_listing_last_match() {
    let (_temp, dict) = setup_temp_dict();

    // Hand-edited store with a duplicated key.
    fs::write(dict.store_path(), "cat:one\ndog:a canine\ncat:two\n").unwrap();

    // Point lookup scans top-down, first occurrence wins.
    assert_eq!(dict.get("cat").unwrap(), Some("one".to_string()));

    // Listing folds top-down into a map, last occurrence wins.
    let listing = dict.list().unwrap();
    assert_eq!(listing.get("cat"), Some(&"two".to_string()));
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_get_found() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("cat", "a feline").unwrap();

    let result = dict
        .execute(Command::Get {
            word: "cat".to_string(),
        })
        .unwrap();

    assert_eq!(result, Some(b"a feline".to_vec()));
}

#[test]
fn test_execute_get_missing_is_not_found() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("cat", "a feline").unwrap();

    let result = dict.execute(Command::Get {
        word: "dog".to_string(),
    });

    match result {
        Err(LexiError::WordNotFound) => {}
        other => panic!("Expected WordNotFound, got {:?}", other),
    }
}

#[test]
fn test_execute_add_and_remove_have_no_payload() {
    let (_temp, dict) = setup_temp_dict();

    let result = dict
        .execute(Command::Add {
            word: "cat".to_string(),
            definition: "a feline".to_string(),
        })
        .unwrap();
    assert_eq!(result, None);

    let result = dict
        .execute(Command::Remove {
            word: "cat".to_string(),
        })
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_execute_list_returns_sorted_json() {
    let (_temp, dict) = setup_temp_dict();

    dict.add("dog", "a canine").unwrap();
    dict.add("cat", "a feline").unwrap();

    let payload = dict.execute(Command::List).unwrap().unwrap();
    let listing: BTreeMap<String, String> = serde_json::from_slice(&payload).unwrap();

    assert_eq!(listing.len(), 2);
    assert_eq!(listing["cat"], "a feline");
    assert_eq!(listing["dog"], "a canine");

    // BTreeMap serializes key-sorted.
    let text = String::from_utf8(payload).unwrap();
    assert!(text.find("cat").unwrap() < text.find("dog").unwrap());
}

#[test]
fn test_execute_ping() {
    let (_temp, dict) = setup_temp_dict();

    let result = dict.execute(Command::Ping).unwrap();

    assert_eq!(result, Some(b"PONG".to_vec()));
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_concurrent_adds() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .store_path(temp_dir.path().join("dictionary.txt"))
        .build();
    let dict = Arc::new(Dictionary::open(config).unwrap());

    let mut handles = vec![];
    for t in 0..4 {
        let dict_clone = Arc::clone(&dict);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                let word = format!("thread{}_word{}", t, i);
                let definition = format!("thread{}_definition{}", t, i);
                dict_clone.add(&word, &definition).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Verify all adds succeeded
    for t in 0..4 {
        for i in 0..25 {
            let word = format!("thread{}_word{}", t, i);
            let expected = format!("thread{}_definition{}", t, i);
            assert_eq!(dict.get(&word).unwrap(), Some(expected));
        }
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_open_creates_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("nested").join("dictionary.txt");

    let config = Config::builder().store_path(&store_path).build();
    let dict = Dictionary::open(config).unwrap();

    dict.add("cat", "a feline").unwrap();
    assert!(store_path.exists());
}

#[test]
fn test_open_path_convenience() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("dictionary.txt");

    let dict = Dictionary::open_path(&store_path).unwrap();

    dict.add("cat", "a feline").unwrap();
    assert_eq!(dict.get("cat").unwrap(), Some("a feline".to_string()));
}

#[test]
fn test_close_then_reopen_keeps_data() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("dictionary.txt");

    {
        let dict = Dictionary::open_path(&store_path).unwrap();
        dict.add("cat", "a feline").unwrap();
        dict.close().unwrap();
    }

    let dict = Dictionary::open_path(&store_path).unwrap();
    assert_eq!(dict.get("cat").unwrap(), Some("a feline".to_string()));
}

#[test]
fn test_accessors() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("dictionary.txt");

    let config = Config::builder()
        .store_path(&store_path)
        .max_connections(7)
        .build();
    let dict = Dictionary::open(config).unwrap();

    assert_eq!(dict.store_path(), store_path);
    assert_eq!(dict.config().max_connections, 7);
}
