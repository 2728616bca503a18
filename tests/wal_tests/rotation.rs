use std::fs;

use walkv::error::WalError;
use walkv::KvError;

use super::*;

#[test]
fn test_rotation_preserves_history() {
    let temp = TempDir::new().unwrap();
    let config = WalConfig {
        max_segment_size: 20,
        ..wal_config(temp.path(), 1, 5)
    };
    let wal = Wal::open(&config).unwrap();

    let mut expected = Vec::new();
    for i in 0..10 {
        let op = set(&format!("k{}", i), &format!("v{}", i));
        expected.push(op.encode());
        wal.submit(&op).wait().unwrap();
    }

    assert!(segment_count(temp.path()) >= 2);
    assert_eq!(persisted(temp.path()), expected);

    // No segment holds more than one batch past the bound
    for path in list_segments(temp.path()).unwrap() {
        let size = fs::metadata(&path).unwrap().len();
        assert!(size <= 20, "{} is {} bytes", path.display(), size);
    }
}

#[test]
fn test_oversized_batch_lands_in_one_segment() {
    let temp = TempDir::new().unwrap();
    let config = WalConfig {
        max_segment_size: 8,
        ..wal_config(temp.path(), 3, 2000)
    };
    let wal = Wal::open(&config).unwrap();

    let waiters = vec![
        wal.submit(&set("alpha", "one")),
        wal.submit(&set("beta", "two")),
        wal.submit(&set("gamma", "three")),
    ];
    wait_all(&waiters);

    // Fresh segment was empty, so the batch went in without rotating
    assert_eq!(segment_count(temp.path()), 1);
    assert_eq!(persisted(temp.path()).len(), 3);
}

#[test]
fn test_rotation_failure_fails_whole_batch() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("wal");
    let config = WalConfig {
        max_segment_size: 10,
        ..wal_config(&dir, 2, 2000)
    };
    let wal = Wal::open(&config).unwrap();

    wait_all(&[wal.submit(&set("a", "1")), wal.submit(&set("b", "2"))]);

    // The next batch must rotate, and the directory is gone
    fs::remove_dir_all(&dir).unwrap();
    let first = wal.submit(&set("c", "3"));
    let second = wal.submit(&set("d", "4"));

    for waiter in [first, second] {
        match waiter.wait() {
            Err(WalError::RotationFailed(_)) => {}
            other => panic!("expected rotation failure, got {:?}", other),
        }
    }

    let stats = wait_for_stats(&wal, |s| s.failed_batches == 1);
    assert_eq!(stats.failed_batches, 1);

    // The blocking API surfaces the same failure
    let err = wal
        .write_set(&Key::new("e").unwrap(), &Value::new("5").unwrap())
        .unwrap_err();
    assert!(
        matches!(err, KvError::Wal(WalError::RotationFailed(_))),
        "unexpected error: {err}"
    );
}
