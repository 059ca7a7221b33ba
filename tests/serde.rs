#![cfg(feature = "serde")]

use dsv::{ArgumentError, Dialect, Parser, Table, Terminator};

fn dialect(json: &str) -> Dialect {
    serde_json::from_str(json).unwrap()
}

#[test]
fn dialect_from_config() {
    let d = dialect(
        r#"{"separators":[";"],"encloser":null,"terminator":"CRLF"}"#,
    );
    assert_eq!(d.get_separators(), &[';']);
    assert_eq!(d.get_encloser(), None);
    assert_eq!(d.get_terminator(), Terminator::CRLF);

    let table = Parser::new(&d)
        .unwrap()
        .parse("\"a\";b\r\n".chars().peekable())
        .unwrap();
    assert_eq!(table, Table::from(vec![vec!["\"a\"", "b"]]));
}

#[test]
fn dialect_missing_keys_use_defaults() {
    assert_eq!(dialect("{}"), Dialect::default());

    let d = dialect(r#"{"terminator":{"Any":"\r"}}"#);
    assert_eq!(d.get_separators(), &[',']);
    assert_eq!(d.get_encloser(), Some('"'));
    assert_eq!(d.get_terminator(), Terminator::Any('\r'));
}

#[test]
fn dialect_from_config_is_validated() {
    let d = dialect(r#"{"separators":[]}"#);
    assert_eq!(
        ArgumentError::NoSeparators,
        Parser::new(&d).unwrap_err()
    );

    let d = dialect(r#"{"separators":[",","\n"]}"#);
    assert_eq!(
        ArgumentError::NewlineSeparator('\n'),
        Parser::new(&d).unwrap_err()
    );
}

#[test]
fn dialect_serializes() {
    let json = serde_json::to_string(&Dialect::default()).unwrap();
    assert_eq!(
        r#"{"separators":[","],"encloser":"\"","terminator":{"Any":"\n"}}"#,
        json
    );
    assert_eq!(dialect(&json), Dialect::default());
}

#[test]
fn table_is_nested_arrays() {
    let table = Table::from(vec![vec!["a", "b"]]);
    assert_eq!(r#"[["a","b"]]"#, serde_json::to_string(&table).unwrap());

    let back: Table = serde_json::from_str(r#"[["a","b"],[""]]"#).unwrap();
    assert_eq!(back, Table::from(vec![vec!["a", "b"], vec![""]]));
}
