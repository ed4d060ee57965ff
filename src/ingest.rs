//! Turning raw uploads or pasted text into one message per log entry.
//!
//! Plain lines are kept as-is (trimmed). JSON-object lines contribute their
//! `message`, `msg` or `log` field, whichever is first non-empty. Anything
//! that does not parse as a JSON object falls through as raw text, so a
//! malformed line never drops an entry.

use serde_json::Value;

/// Fields probed, in order, for the message text of a structured line.
const MESSAGE_FIELDS: [&str; 3] = ["message", "msg", "log"];

/// Split `raw` into messages, one per non-blank line.
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(message_of)
        .collect()
}

fn message_of(line: &str) -> String {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(line) else {
        return line.to_string();
    };

    MESSAGE_FIELDS
        .iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| is_truthy(v))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| line.to_string())
}

/// Empty, zero, false and null values do not count as a message.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Decode uploaded bytes: UTF-8 when valid, Latin-1 otherwise.
pub fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_trimmed_and_blanks_dropped() {
        let raw = "  first line \n\n\t\nsecond\r\n   \nthird";
        assert_eq!(parse_lines(raw), vec!["first line", "second", "third"]);
    }

    #[test]
    fn json_message_fields_in_priority_order() {
        let raw = r#"{"level":"ERROR","message":"DB pool exhausted","service":"api"}
{"msg":"from msg","log":"from log"}
{"log":"only log"}
{"message":"","msg":"empty message skipped"}"#;
        assert_eq!(
            parse_lines(raw),
            vec![
                "DB pool exhausted",
                "from msg",
                "only log",
                "empty message skipped"
            ]
        );
    }

    #[test]
    fn json_without_message_keeps_raw_line() {
        let raw = r#"{"level":"INFO","status":200}"#;
        assert_eq!(parse_lines(raw), vec![raw]);

        let raw = r#"{"message":null,"msg":0}"#;
        assert_eq!(parse_lines(raw), vec![raw]);
    }

    #[test]
    fn non_string_message_is_rendered_as_json() {
        let raw = r#"{"message":{"code":42}}"#;
        assert_eq!(parse_lines(raw), vec![r#"{"code":42}"#]);

        let raw = r#"{"msg":17}"#;
        assert_eq!(parse_lines(raw), vec!["17"]);
    }

    #[test]
    fn malformed_and_non_object_json_pass_through() {
        let raw = "{\"message\": \"unterminated\n[1,2,3]\n\"just a string\"\n42";
        assert_eq!(
            parse_lines(raw),
            vec!["{\"message\": \"unterminated", "[1,2,3]", "\"just a string\"", "42"]
        );
    }

    #[test]
    fn empty_input_gives_no_messages() {
        assert!(parse_lines("").is_empty());
        assert!(parse_lines("\n  \n").is_empty());
    }

    #[test]
    fn decode_utf8_and_latin1() {
        assert_eq!(decode_bytes("héllo".as_bytes()), "héllo");
        assert_eq!(decode_bytes(&[0x68, 0xE9, 0x6C]), "hél");
    }
}
