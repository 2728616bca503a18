use std::fs;

use super::*;

#[test]
fn test_state_survives_reopen() {
    let temp = TempDir::new().unwrap();

    {
        let engine = Engine::open(config_for(temp.path())).unwrap();
        engine.set(key("foo"), value("bar")).unwrap();
        engine.set(key("gone"), value("soon")).unwrap();
        engine.delete(&key("gone")).unwrap();
        engine.close();
    }

    let engine = Engine::open(config_for(temp.path())).unwrap();
    assert_eq!(engine.get(&key("foo")).unwrap(), value("bar"));
    assert!(matches!(engine.get(&key("gone")), Err(KvError::KeyNotFound)));
    assert_eq!(engine.recovery_report().commands_replayed, 3);
}

#[test]
fn test_replay_applies_in_log_order() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("20240101T000000.wal"),
        "SET foo bar\nSET foo baz\nSET x 1\nDEL x\n",
    )
    .unwrap();
    fs::write(temp.path().join("20240101T000005.wal"), "SET x 2\n").unwrap();

    let engine = Engine::open(config_for(temp.path())).unwrap();

    assert_eq!(engine.get(&key("foo")).unwrap(), value("baz"));
    assert_eq!(engine.get(&key("x")).unwrap(), value("2"));
    let report = engine.recovery_report();
    assert_eq!(report.segments_read, 2);
    assert_eq!(report.commands_replayed, 5);
}

#[test]
fn test_replay_does_not_relog() {
    let temp = TempDir::new().unwrap();
    let segment = temp.path().join("20240101T000000.wal");
    fs::write(&segment, "SET a 1\nSET b 2\n").unwrap();

    let engine = Engine::open(config_for(temp.path())).unwrap();
    engine.close();

    assert_eq!(fs::read_to_string(&segment).unwrap(), "SET a 1\nSET b 2\n");
}

#[test]
fn test_open_fails_on_bad_line() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("20240101T000000.wal"),
        "SET a 1\nSET bad-key 2\nSET c 3\n",
    )
    .unwrap();

    match Engine::open(config_for(temp.path())) {
        Err(KvError::RecoveryReplayFailed { line_no, line, source }) => {
            assert_eq!(line_no, 2);
            assert_eq!(line, "SET bad-key 2");
            assert!(matches!(*source, KvError::InvalidKey));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("engine opened on a corrupt log"),
    }
}

#[test]
fn test_torn_tail_is_not_replayed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("20240101T000000.wal"), "SET a 1\nSET b").unwrap();

    let engine = Engine::open(config_for(temp.path())).unwrap();

    assert_eq!(engine.get(&key("a")).unwrap(), value("1"));
    assert!(matches!(engine.get(&key("b")), Err(KvError::KeyNotFound)));

    // The partial record is cut off before the segment is appended to
    engine.set(key("c"), value("3")).unwrap();
    engine.close();
    let engine = Engine::open(config_for(temp.path())).unwrap();
    assert_eq!(engine.get(&key("c")).unwrap(), value("3"));
    assert_eq!(engine.recovery_report().commands_replayed, 2);
}

#[test]
fn test_open_path_round_trip() {
    let temp = TempDir::new().unwrap();

    {
        let engine = Engine::open_path(temp.path()).unwrap();
        engine.set(key("foo"), value("bar")).unwrap();
        engine.close();
    }

    let engine = Engine::open_path(temp.path()).unwrap();
    assert_eq!(engine.get(&key("foo")).unwrap(), value("bar"));
    assert_eq!(engine.config().wal.dir, temp.path());
}
