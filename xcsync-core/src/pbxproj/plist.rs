//! Old-style (OpenStep) property list values and parser
//!
//! `project.pbxproj` files use the ASCII property-list dialect:
//! dictionaries `{ key = value; }`, arrays `( a, b, )`, quoted or bare
//! strings, `<hex>` data and C-style comments.

use std::collections::BTreeMap;

use super::PbxprojError;

/// Dictionary with keys kept in sorted order (the order Xcode writes them in)
pub type Dictionary = BTreeMap<String, Value>;

/// A property-list value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Array(Vec<Value>),
    Dictionary(Dictionary),
    Data(Vec<u8>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn into_dictionary(self) -> Option<Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Parse a complete property list document
pub fn parse(input: &str) -> Result<Value, PbxprojError> {
    let mut parser = Parser::new(input);
    parser.skip_trivia()?;
    let value = parser.parse_value()?;
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected content after root value"));
    }
    Ok(value)
}

/// Characters allowed in an unquoted string
pub(crate) fn is_bare_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'/' | b':' | b'.' | b'-' | b'+')
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let src = input.as_bytes();
        // Tolerate a UTF-8 byte order mark
        let pos = if src.starts_with(&[0xEF, 0xBB, 0xBF]) { 3 } else { 0 };
        Self { src, pos, line: 1 }
    }

    fn error(&self, message: impl Into<String>) -> PbxprojError {
        PbxprojError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn expect(&mut self, expected: u8) -> Result<(), PbxprojError> {
        self.skip_trivia()?;
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!(
                "expected '{}', found '{}'",
                expected as char, c as char
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", expected as char))),
        }
    }

    /// Skip whitespace, `/* */` and `//` comments
    fn skip_trivia(&mut self) -> Result<(), PbxprojError> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some(b'*') if self.peek() == Some(b'/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(self.error("unterminated comment")),
                        }
                    }
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(c) = self.bump() {
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, PbxprojError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'{') => self.parse_dictionary(),
            Some(b'(') => self.parse_array(),
            Some(b'<') => self.parse_data(),
            Some(b'"') | Some(b'\'') => self.parse_quoted().map(Value::String),
            Some(c) if is_bare_char(c) => Ok(Value::String(self.parse_bare())),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dictionary(&mut self) -> Result<Value, PbxprojError> {
        self.expect(b'{')?;
        let mut dict = Dictionary::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b'}') => {
                    self.bump();
                    return Ok(Value::Dictionary(dict));
                }
                None => return Err(self.error("unterminated dictionary")),
                _ => {}
            }
            let key = self.parse_key()?;
            self.expect(b'=')?;
            let value = self.parse_value()?;
            self.expect(b';')?;
            dict.insert(key, value);
        }
    }

    fn parse_key(&mut self) -> Result<String, PbxprojError> {
        match self.peek() {
            Some(b'"') | Some(b'\'') => self.parse_quoted(),
            Some(c) if is_bare_char(c) => Ok(self.parse_bare()),
            _ => Err(self.error("expected dictionary key")),
        }
    }

    fn parse_array(&mut self) -> Result<Value, PbxprojError> {
        self.expect(b'(')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b')') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                None => return Err(self.error("unterminated array")),
                _ => {}
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => {
                    self.bump();
                }
                Some(b')') => {}
                _ => return Err(self.error("expected ',' or ')' in array")),
            }
        }
    }

    fn parse_data(&mut self) -> Result<Value, PbxprojError> {
        self.expect(b'<')?;
        let mut digits = Vec::new();
        loop {
            match self.bump() {
                Some(b'>') => break,
                Some(c) if c.is_ascii_whitespace() => {}
                Some(c) if c.is_ascii_hexdigit() => digits.push(c),
                Some(c) => return Err(self.error(format!("invalid data character '{}'", c as char))),
                None => return Err(self.error("unterminated data")),
            }
        }
        if digits.len() % 2 != 0 {
            return Err(self.error("odd number of hex digits in data"));
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect();
        Ok(Value::Data(bytes))
    }

    fn parse_bare(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_bare_char(c)) {
            self.bump();
        }
        // Bare characters are all ASCII
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    fn parse_quoted(&mut self) -> Result<String, PbxprojError> {
        let quote = self.bump().ok_or_else(|| self.error("expected quote"))?;
        let mut bytes = Vec::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => bytes.push(b'\n'),
                    Some(b't') => bytes.push(b'\t'),
                    Some(b'r') => bytes.push(b'\r'),
                    Some(b'U') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            match self.bump() {
                                Some(c) if c.is_ascii_hexdigit() => {
                                    code = (code << 4) | hex_value(c) as u32;
                                }
                                _ => return Err(self.error("invalid \\U escape")),
                            }
                        }
                        let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                        let mut buf = [0u8; 4];
                        bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                    Some(c) => bytes.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => bytes.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
        String::from_utf8(bytes).map_err(|_| self.error("string is not valid UTF-8"))
    }
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}
