use std::sync::Arc;
use std::thread;

use walkv::protocol::Response;

use super::*;

#[test]
fn test_engine_set_get() {
    let (_temp, engine) = setup_temp_engine();

    engine.set(key("hello"), value("world")).unwrap();

    assert_eq!(engine.get(&key("hello")).unwrap(), value("world"));
    assert_eq!(engine.len(), 1);
    assert!(engine.is_durable());
}

#[test]
fn test_engine_get_nonexistent_key() {
    let (_temp, engine) = setup_temp_engine();

    assert!(matches!(engine.get(&key("missing")), Err(KvError::KeyNotFound)));
}

#[test]
fn test_engine_delete() {
    let (_temp, engine) = setup_temp_engine();

    engine.set(key("foo"), value("bar")).unwrap();
    engine.delete(&key("foo")).unwrap();
    // Deleting again is fine
    engine.delete(&key("foo")).unwrap();

    assert!(engine.is_empty());
}

#[test]
fn test_execute_line() {
    let (_temp, engine) = setup_temp_engine();

    assert_eq!(engine.execute_line("SET foo bar"), Response::Ok);
    assert_eq!(
        engine.execute_line("GET foo"),
        Response::Value("bar".to_string())
    );
    assert_eq!(engine.execute_line("DEL foo"), Response::Ok);
    assert_eq!(engine.execute_line("GET foo"), Response::NotFound);
    assert_eq!(
        engine.execute_line("SET foo"),
        Response::Error("invalid command".to_string())
    );
    assert_eq!(
        engine.execute_line("SET foo b@r"),
        Response::Error("value is not valid".to_string())
    );
}

#[test]
fn test_concurrent_sets() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..25 {
                    engine
                        .set(key(&format!("t{}_{}", t, i)), value(&format!("{}", i)))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.len(), 100);
}

#[test]
fn test_same_key_writers_agree_with_replay() {
    for round in 0..20 {
        let temp = TempDir::new().unwrap();
        let config = Config::builder()
            .wal_dir(temp.path())
            .batch_size(8)
            .flush_interval(std::time::Duration::from_millis(2))
            .build();
        let engine = Arc::new(Engine::open(config.clone()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    engine.set(key("k"), value(&format!("v{}", t))).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let live = engine.get(&key("k")).unwrap();
        engine.close();
        drop(engine);

        let reopened = Engine::open(config).unwrap();
        assert_eq!(reopened.get(&key("k")).unwrap(), live, "round {}", round);
        assert_eq!(reopened.recovery_report().commands_replayed, 8);
    }
}

#[test]
fn test_wal_failure_leaves_state_untouched() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("wal");
    let config = Config::builder()
        .wal_dir(&dir)
        .batch_size(1)
        .max_segment_size(10)
        .build();
    let engine = Engine::open(config).unwrap();

    engine.set(key("a"), value("1")).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    let err = engine.set(key("b"), value("2")).unwrap_err();
    assert!(matches!(err, KvError::Wal(_)), "unexpected error: {err}");
    assert!(matches!(engine.get(&key("b")), Err(KvError::KeyNotFound)));
    assert_eq!(engine.get(&key("a")).unwrap(), value("1"));
}

#[test]
fn test_in_memory_engine() {
    let engine = Engine::in_memory().unwrap();

    engine.set(key("foo"), value("bar")).unwrap();
    assert_eq!(engine.get(&key("foo")).unwrap(), value("bar"));
    assert!(!engine.is_durable());
    assert_eq!(engine.wal_stats().entries_written, 0);
    engine.close();
}

#[test]
fn test_writes_after_close_fail() {
    let (_temp, engine) = setup_temp_engine();

    engine.set(key("a"), value("1")).unwrap();
    engine.close();

    assert!(engine.set(key("b"), value("2")).is_err());
    assert_eq!(engine.get(&key("a")).unwrap(), value("1"));
}
