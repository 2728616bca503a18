use std::sync::Arc;

use super::*;

#[test]
fn test_size_then_timer_flush() {
    let temp = TempDir::new().unwrap();
    let wal = Wal::open(&wal_config(temp.path(), 2, 20)).unwrap();

    let waiters = vec![
        wal.submit(&set("a", "1")),
        wal.submit(&set("b", "2")),
        wal.submit(&set("c", "3")),
    ];
    wait_all(&waiters);

    assert_eq!(persisted(temp.path()), vec!["SET a 1", "SET b 2", "SET c 3"]);
    let stats = wait_for_stats(&wal, |s| s.entries_written == 3);
    assert_eq!(stats.entries_written, 3);
    assert_eq!(stats.failed_batches, 0);
}

#[test]
fn test_two_writes_fill_a_batch() {
    let temp = TempDir::new().unwrap();
    let wal = Wal::open(&wal_config(temp.path(), 2, 20)).unwrap();

    let first = wal.submit(&set("foo", "bar"));
    let second = wal.submit(&set("key", "val"));

    assert!(first.wait().is_ok());
    assert!(second.wait().is_ok());
    assert_eq!(persisted(temp.path()), vec!["SET foo bar", "SET key val"]);
}

#[test]
fn test_single_delete_flushed_by_timer() {
    let temp = TempDir::new().unwrap();
    let wal = Wal::open(&wal_config(temp.path(), 10, 20)).unwrap();

    wal.write_del(&Key::new("somekey").unwrap()).unwrap();

    assert_eq!(persisted(temp.path()), vec!["DEL somekey"]);
    let stats = wait_for_stats(&wal, |s| s.timer_triggered == 1);
    assert_eq!(stats.timer_triggered, 1);
    assert_eq!(stats.size_triggered, 0);
}

#[test]
fn test_full_batches_do_not_wait_for_timer() {
    let temp = TempDir::new().unwrap();
    // Long interval: only size can flush within the test's first phase
    let wal = Wal::open(&wal_config(temp.path(), 4, 2000)).unwrap();

    let waiters: Vec<_> = (0..9)
        .map(|i| wal.submit(&set(&format!("k{}", i), &format!("v{}", i))))
        .collect();

    // floor(9 / 4) = 2 full batches persist without the timer
    wait_all(&waiters[..8]);
    assert!(waiters[8].try_get().is_none());
    assert_eq!(persisted(temp.path()).len(), 8);

    // The remainder goes out on the timer
    waiters[8].wait().unwrap();
    let stats = wait_for_stats(&wal, |s| s.timer_triggered == 1);
    assert_eq!(stats.size_triggered, 2);
    assert_eq!(stats.timer_triggered, 1);
    assert_eq!(stats.entries_written, 9);

    let expected: Vec<String> = (0..9).map(|i| format!("SET k{} v{}", i, i)).collect();
    assert_eq!(persisted(temp.path()), expected);
}

#[test]
fn test_blocking_writes_are_durable_on_return() {
    let temp = TempDir::new().unwrap();
    let wal = Wal::open(&wal_config(temp.path(), 10, 5)).unwrap();

    wal.write_set(&Key::new("foo").unwrap(), &Value::new("bar").unwrap())
        .unwrap();
    assert_eq!(persisted(temp.path()), vec!["SET foo bar"]);

    wal.write_del(&Key::new("foo").unwrap()).unwrap();
    assert_eq!(persisted(temp.path()), vec!["SET foo bar", "DEL foo"]);
}

#[test]
fn test_concurrent_writers_keep_per_thread_order() {
    let temp = TempDir::new().unwrap();
    let wal = Arc::new(Wal::open(&wal_config(temp.path(), 10, 5)).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let wal = Arc::clone(&wal);
            thread::spawn(move || {
                for i in 0..50 {
                    let key = Key::new(&format!("t{}k{}", t, i)).unwrap();
                    let value = Value::new(&format!("v{}", i)).unwrap();
                    wal.write_set(&key, &value).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = persisted(temp.path());
    assert_eq!(lines.len(), 400);

    for t in 0..8 {
        let prefix = format!("SET t{}k", t);
        let seen: Vec<usize> = lines
            .iter()
            .filter_map(|l| l.strip_prefix(&prefix))
            .map(|rest| rest.split(' ').next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }
}
