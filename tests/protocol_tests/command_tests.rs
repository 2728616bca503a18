use walkv::protocol::{Command, CommandType, Response};
use walkv::{Key, KvError, Value};

fn key(s: &str) -> Key {
    Key::new(s).unwrap()
}

#[test]
fn test_parse_valid_commands() {
    let cases = [
        ("GET foo", Command::Get { key: key("foo") }),
        ("get foo", Command::Get { key: key("foo") }),
        ("DEL a/b_c", Command::Del { key: key("a/b_c") }),
        (
            "SeT k*1 v_2",
            Command::Set {
                key: key("k*1"),
                value: Value::new("v_2").unwrap(),
            },
        ),
        ("  GET   spaced  ", Command::Get { key: key("spaced") }),
    ];

    for (line, expected) in cases {
        assert_eq!(Command::parse(line).unwrap(), expected, "line {:?}", line);
    }
}

#[test]
fn test_parse_rejects_bad_arity_and_verbs() {
    for line in ["", "GET", "GET a b", "SET a", "SET a b c", "DEL a b", "PUT a b"] {
        assert!(
            matches!(Command::parse(line), Err(KvError::InvalidCommand)),
            "line {:?}",
            line
        );
    }
}

#[test]
fn test_parse_validates_tokens() {
    assert!(matches!(Command::parse("GET bad-key"), Err(KvError::InvalidKey)));
    assert!(matches!(Command::parse("SET k bad.value"), Err(KvError::InvalidValue)));
    // Key is checked before the verb
    assert!(matches!(Command::parse("FOO b@d"), Err(KvError::InvalidKey)));
}

#[test]
fn test_command_line_and_type() {
    let command: Command = "set Foo Bar".parse().unwrap();

    assert_eq!(command.command_type(), CommandType::Set);
    assert_eq!(command.key().as_str(), "Foo");
    assert_eq!(command.to_line(), "SET Foo Bar");
    assert_eq!(CommandType::Del.as_str(), "DEL");
}

#[test]
fn test_response_lines() {
    assert_eq!(Response::Ok.to_line(), "OK");
    assert_eq!(Response::Value("bar".into()).to_line(), "bar");
    assert_eq!(Response::NotFound.to_line(), "ERR key not found");
    assert_eq!(
        Response::from_error(&KvError::InvalidCommand).to_line(),
        "ERR invalid command"
    );

    assert_eq!(Response::parse_line("OK\r\n"), Response::Ok);
    assert_eq!(Response::parse_line("ERR key not found"), Response::NotFound);
    assert_eq!(
        Response::parse_line("ERR key is not valid"),
        Response::Error("key is not valid".into())
    );
    assert_eq!(Response::parse_line("value1"), Response::Value("value1".into()));
    assert!(Response::NotFound.is_error());
    assert!(!Response::Ok.is_error());
}
