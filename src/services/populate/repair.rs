//! JSON cleanup for model output.
//!
//! Chat models wrap arrays in prose, markdown fences, curly quotes, and the
//! occasional invalid escape. These helpers cut out the array and fix the
//! common damage before handing the text to serde.

use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Substring between the first `[` and the last `]`, inclusive.
pub fn extract_json_array(raw: &str) -> AppResult<&str> {
    let start = raw.find('[').ok_or_else(|| {
        AppError::ExternalService("Model response contains no JSON array".to_string())
    })?;
    let end = raw.rfind(']').filter(|e| *e > start).ok_or_else(|| {
        AppError::ExternalService("Model response contains an unterminated JSON array".to_string())
    })?;
    Ok(&raw[start..=end])
}

/// Fix typographic quotes, irregular whitespace, invalid escapes, and
/// trailing commas.
pub fn repair_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{201c}' | '\u{201d}' => out.push('"'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{a0}' | '\u{2028}' | '\u{2029}' => out.push(' '),
            '\\' => match chars.peek() {
                // Valid JSON escapes pass through untouched.
                Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') => {
                    out.push('\\');
                }
                // A stray escape like \' or \_ drops the backslash.
                Some(_) => {}
                None => {}
            },
            ',' => {
                // Drop a comma directly followed by a closing bracket.
                let mut lookahead = chars.clone();
                let next_meaningful = lookahead.find(|c| !c.is_whitespace());
                if matches!(next_meaningful, Some(']' | '}')) {
                    continue;
                }
                out.push(',');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Extract, repair, and deserialize a JSON array of items.
pub fn parse_items<T: DeserializeOwned>(raw: &str) -> AppResult<Vec<T>> {
    let array = extract_json_array(raw)?;
    let repaired = repair_json(array);
    serde_json::from_str(&repaired).map_err(|e| {
        AppError::ExternalService(format!("Model response is not valid JSON: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        nome: String,
    }

    #[test]
    fn extracts_array_from_prose() {
        let raw = "Claro! Aqui estão as categorias:\n```json\n[{\"nome\": \"Cordas\"}]\n```\nEspero que ajude.";
        assert_eq!(extract_json_array(raw).unwrap(), "[{\"nome\": \"Cordas\"}]");
    }

    #[test]
    fn missing_array_is_an_error() {
        assert!(extract_json_array("não consegui gerar").is_err());
    }

    #[test]
    fn repairs_curly_quotes() {
        let raw = "[{\u{201c}nome\u{201d}: \u{201c}Sopro\u{201d}}]";
        let items: Vec<Item> = parse_items(raw).unwrap();
        assert_eq!(items[0].nome, "Sopro");
    }

    #[test]
    fn repairs_stray_escapes_and_trailing_commas() {
        let raw = r#"[{"nome": "D\'Addario"},]"#;
        let items: Vec<Item> = parse_items(raw).unwrap();
        assert_eq!(items[0].nome, "D'Addario");
    }

    #[test]
    fn valid_escapes_survive() {
        let raw = r#"[{"nome": "linha um\nlinha dois"}]"#;
        let items: Vec<Item> = parse_items(raw).unwrap();
        assert_eq!(items[0].nome, "linha um\nlinha dois");
    }
}
