//! JSONP response helpers
//!
//! Both portal families wrap their responses in a JSONP callback. The
//! bodies are never executed; the fields of interest are pulled out by
//! locating their textual markers.

/// Extract the value of a `"field":"value"` pair from a JSONP body.
///
/// Returns the raw text between the quotes, stopping at the first
/// unescaped-looking quote exactly like the portal's own web client does.
pub fn extract_field<'a>(body: &'a str, field: &str) -> Option<&'a str> {
    let marker = format!("\"{}\":\"", field);
    let start = body.find(&marker)? + marker.len();
    let rest = &body[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_field() {
        let body = r#"jQuery123({"challenge":"abc123","client_ip":"10.1.2.3"})"#;
        assert_eq!(extract_field(body, "challenge"), Some("abc123"));
        assert_eq!(extract_field(body, "client_ip"), Some("10.1.2.3"));
    }

    #[test]
    fn test_extract_missing_field() {
        let body = r#"jQuery123({"error":"ok"})"#;
        assert_eq!(extract_field(body, "challenge"), None);
    }

    #[test]
    fn test_extract_empty_value() {
        let body = r#"cb({"msg":""})"#;
        assert_eq!(extract_field(body, "msg"), Some(""));
    }

    #[test]
    fn test_extract_non_ascii_value() {
        let body = r#"dr1003({"result":0,"msg":"账号或密码错误"})"#;
        assert_eq!(extract_field(body, "msg"), Some("账号或密码错误"));
    }
}
