use bytes::BytesMut;
use std::fmt::Write;

pub(crate) trait BufferWriter {
    fn write_to_buffer(&self, buffer: &mut BytesMut, nonce: &str);
}

/// Makes serialized JSON safe to place inside an inline `<script>` element.
/// `<`, `>` and `&` are emitted as unicode escapes so the payload can never
/// close the element or open a comment, and the line separators that JSON
/// allows but JavaScript string literals historically did not are escaped too.
pub fn escape_json_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' | '>' | '&' | '\u{2028}' | '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_json_cannot_close_element() {
        let escaped = escape_json_for_script(r#"{"a":"</script><!--"}"#);
        assert!(!escaped.contains("</script>"));
        assert!(!escaped.contains("<!--"));
        let back: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back["a"], "</script><!--");
    }
}
