//! Tests for MemTable
//!
//! These tests verify:
//! - Basic set/get/delete
//! - Overwrites and ordering of keys
//! - Concurrent readers alongside a writer

use std::sync::Arc;
use std::thread;

use walkv::memtable::MemTable;
use walkv::{Key, Value};

fn key(s: &str) -> Key {
    Key::new(s).unwrap()
}

fn value(s: &str) -> Value {
    Value::new(s).unwrap()
}

#[test]
fn test_set_get_delete() {
    let table = MemTable::new();
    assert!(table.is_empty());

    assert_eq!(table.set(key("a"), value("1")), None);
    assert_eq!(table.get(&key("a")), Some(value("1")));

    assert_eq!(table.delete(&key("a")), Some(value("1")));
    assert_eq!(table.get(&key("a")), None);
    assert_eq!(table.delete(&key("a")), None);
}

#[test]
fn test_overwrite_returns_previous() {
    let table = MemTable::new();

    table.set(key("a"), value("1"));
    assert_eq!(table.set(key("a"), value("2")), Some(value("1")));
    assert_eq!(table.get(&key("a")), Some(value("2")));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_keys_sorted_and_clear() {
    let table = MemTable::new();
    for k in ["c", "a", "b"] {
        table.set(key(k), value("x"));
    }

    assert_eq!(table.keys(), vec![key("a"), key("b"), key("c")]);
    table.clear();
    assert!(table.is_empty());
}

#[test]
fn test_concurrent_readers() {
    let table = Arc::new(MemTable::new());
    table.set(key("shared"), value("v"));

    let writer = {
        let table = Arc::clone(&table);
        thread::spawn(move || {
            for i in 0..100 {
                table.set(key(&format!("k{}", i)), value("v"));
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(table.get(&key("shared")), Some(value("v")));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(table.len(), 101);
}
