///! Recursive-descent parser for Doxygen's `var NAME = <literal>;` files

use super::value::{JsScript, JsValue, JsVar};
use thiserror::Error;

/// Parse failure with the position it happened at (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {col}: {message}")]
pub struct JsParseError {
    pub message: String,
    pub line: u32,
    pub col: u32,
}

/// Parse a whole index file into its variable declarations.
///
/// Accepts `//` and `/* */` comments between tokens. Anything after the
/// final declaration other than whitespace and comments is an error.
pub fn parse_script(src: &str) -> Result<JsScript, JsParseError> {
    let mut cur = Cursor::new(src);
    let mut vars = Vec::new();

    cur.skip_trivia();
    while !cur.at_end() {
        vars.push(cur.parse_var()?);
        cur.skip_trivia();
    }

    if vars.is_empty() {
        return Err(cur.error("file contains no declarations"));
    }

    Ok(JsScript { vars })
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
}

impl Cursor {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> JsParseError {
        JsParseError {
            message: message.into(),
            line: self.line,
            col: self.col,
        }
    }

    /// Skip whitespace and both comment forms.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => break,
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), JsParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of file", expected))),
        }
    }

    fn parse_var(&mut self) -> Result<JsVar, JsParseError> {
        let keyword = self.parse_ident()?;
        if keyword != "var" {
            return Err(self.error(format!("expected 'var', found '{}'", keyword)));
        }
        self.skip_trivia();

        let name = self.parse_ident()?;
        self.skip_trivia();
        self.expect('=')?;
        self.skip_trivia();

        let value = self.parse_value()?;
        self.skip_trivia();
        self.expect(';')?;

        Ok(JsVar { name, value })
    }

    fn parse_ident(&mut self) -> Result<String, JsParseError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
            Some(c) => return Err(self.error(format!("expected identifier, found '{}'", c))),
            None => return Err(self.error("expected identifier, found end of file")),
        }

        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(ident)
    }

    fn parse_value(&mut self) -> Result<JsValue, JsParseError> {
        match self.peek() {
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some('\'') | Some('"') => Ok(JsValue::Str(self.parse_string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_int(),
            Some('n') => {
                let word = self.parse_ident()?;
                if word == "null" {
                    Ok(JsValue::Null)
                } else {
                    Err(self.error(format!("unexpected identifier '{}'", word)))
                }
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of file")),
        }
    }

    fn parse_array(&mut self) -> Result<JsValue, JsParseError> {
        self.expect('[')?;
        let mut items = Vec::new();

        self.skip_trivia();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(JsValue::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_trivia();
                }
                Some(']') => {
                    self.bump();
                    return Ok(JsValue::Array(items));
                }
                Some(c) => return Err(self.error(format!("expected ',' or ']', found '{}'", c))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn parse_object(&mut self) -> Result<JsValue, JsParseError> {
        self.expect('{')?;
        let mut entries = Vec::new();

        self.skip_trivia();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(JsValue::Object(entries));
        }

        loop {
            let key = self.parse_object_key()?;
            self.skip_trivia();
            self.expect(':')?;
            self.skip_trivia();
            let value = self.parse_value()?;
            entries.push((key, value));

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_trivia();
                }
                Some('}') => {
                    self.bump();
                    return Ok(JsValue::Object(entries));
                }
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{}'", c))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    /// Object keys come quoted (nav-index shards) or as bare integers
    /// (`searchdata.js` sections) or bare identifiers.
    fn parse_object_key(&mut self) -> Result<String, JsParseError> {
        match self.peek() {
            Some('\'') | Some('"') => self.parse_string(),
            Some(c) if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        digits.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                Ok(digits)
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => self.parse_ident(),
            Some(c) => Err(self.error(format!("expected object key, found '{}'", c))),
            None => Err(self.error("expected object key, found end of file")),
        }
    }

    fn parse_int(&mut self) -> Result<JsValue, JsParseError> {
        let mut digits = String::new();
        if self.peek() == Some('-') {
            digits.push('-');
            self.bump();
        }

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }

        digits
            .parse::<i64>()
            .map(JsValue::Int)
            .map_err(|_| self.error(format!("invalid integer '{}'", digits)))
    }

    fn parse_string(&mut self) -> Result<String, JsParseError> {
        let start_line = self.line;
        let quote = self.bump().unwrap_or('\'');
        let mut out = String::new();

        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('/') => out.push('/'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(c) => {
                        return Err(self.error(format!("unknown escape sequence '\\{}'", c)));
                    }
                    None => return Err(self.error("unterminated escape sequence")),
                },
                Some('\n') | None => {
                    return Err(JsParseError {
                        message: "unterminated string".to_string(),
                        line: start_line,
                        col: self.col,
                    });
                }
                Some(c) => out.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navtree_shape() {
        let src = r#"var NAVTREE =
[
  [ "VieSched++", "index.html", [
    [ "Namespaces", null, [
      [ "Namespace List", "namespaces.html", "namespaces" ]
    ] ]
  ] ]
];"#;
        let script = parse_script(src).unwrap();
        assert_eq!(script.vars.len(), 1);
        assert_eq!(script.vars[0].name, "NAVTREE");

        let root = script.vars[0].value.as_array().unwrap();
        let project = root[0].as_array().unwrap();
        assert_eq!(project[0].as_str(), Some("VieSched++"));
        assert_eq!(project[1].as_str(), Some("index.html"));
        assert!(project[2].as_array().is_some());
    }

    #[test]
    fn test_parse_multiple_vars() {
        let src = "var A = [ \"x\" ];\nvar B = 'y';\nvar C = null;";
        let script = parse_script(src).unwrap();
        assert_eq!(script.vars.len(), 3);
        assert_eq!(script.get("B").unwrap().as_str(), Some("y"));
        assert!(script.get("C").unwrap().is_null());
        assert!(script.single().is_none());
    }

    #[test]
    fn test_parse_search_tuple() {
        let src = r#"var searchData=
[
  ['eci',['Eci',['../class_eci.html#a489e',1,'Eci::Eci(const DateTime &amp;dt)']]]
];"#;
        let script = parse_script(src).unwrap();
        let rows = script.get("searchData").unwrap().as_array().unwrap();
        let row = rows[0].as_array().unwrap();
        assert_eq!(row[0].as_str(), Some("eci"));

        let body = row[1].as_array().unwrap();
        let target = body[1].as_array().unwrap();
        assert_eq!(target[1].as_int(), Some(1));
        // Entities stay raw at this layer
        assert_eq!(target[2].as_str(), Some("Eci::Eci(const DateTime &amp;dt)"));
    }

    #[test]
    fn test_parse_object_with_numeric_keys() {
        let src = "var indexSectionNames =\n{\n  0: \"all\",\n  1: \"classes\"\n};";
        let script = parse_script(src).unwrap();
        let obj = script.get("indexSectionNames").unwrap().as_object().unwrap();
        assert_eq!(obj[0], ("0".to_string(), JsValue::Str("all".to_string())));
        assert_eq!(obj[1].0, "1");
    }

    #[test]
    fn test_parse_navtreeindex_object() {
        let src = "var NAVTREEINDEX0 =\n{\n\"index.html\":[0,0,0],\n\"page.html#frag\":[0,1]\n};";
        let script = parse_script(src).unwrap();
        let obj = script.get("NAVTREEINDEX0").unwrap().as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj[1].0, "page.html#frag");
        assert_eq!(obj[1].1.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let src = r"var S = 'it\'s';";
        let script = parse_script(src).unwrap();
        assert_eq!(script.get("S").unwrap().as_str(), Some("it's"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let src = "/* generated */\nvar A = [];\n// done\n";
        let script = parse_script(src).unwrap();
        assert_eq!(script.vars.len(), 1);
    }

    #[test]
    fn test_error_position() {
        let src = "var A =\n[\n  [ \"x\", ]\n];";
        let err = parse_script(src).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("unexpected character"));
    }

    #[test]
    fn test_unterminated_string_reports_start_line() {
        let err = parse_script("var A = 'abc").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let err = parse_script("var A = null; total nonsense").unwrap_err();
        assert!(err.message.contains("expected 'var'"));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(parse_script("  \n").is_err());
    }
}
