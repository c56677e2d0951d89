//! Parser for the structured literals embedded in the gnomAD metadata.
//!
//! Hail writes struct-valued columns as JSON, but the same columns are often round-tripped through
//! Python and end up with single quotes, `True`/`None`, or tuples. This module accepts both spellings
//! and nothing else: no identifiers, no expressions. The result is a [serde_json::Value] which the
//! caller validates against a typed schema with `serde_json::from_value`.
use serde_json::{Map, Number, Value};

/// Maximum depth of nested objects, lists, and tuples.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    /// Byte offset into the input.
    pub pos: usize,
    pub reason: String,
}

impl LiteralError {
    fn new(pos: usize, reason: &str) -> Self {
        Self {
            pos,
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} at byte {}", self.reason, self.pos)
    }
}

impl std::error::Error for LiteralError {}

impl From<LiteralError> for std::io::Error {
    fn from(e: LiteralError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}

/// Parse a single literal. Surrounding whitespace is allowed, anything else after the value is not.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(input);
    let value = parser.value()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some(_) => Err(parser.error("trailing characters")),
    }
}

/// Parse a literal and deserialize it into `T`.
pub fn parse_as<T: serde::de::DeserializeOwned>(input: &str) -> std::io::Result<T> {
    let value = parse_literal(input)?;
    let value = serde_json::from_value(value)?;
    Ok(value)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }
    fn error(&self, reason: &str) -> LiteralError {
        LiteralError::new(self.pos, reason)
    }
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }
    fn expect(&mut self, c: char) -> Result<(), LiteralError> {
        match self.bump() {
            Some(d) if c == d => Ok(()),
            _ => Err(self.error(&format!("expected '{c}'"))),
        }
    }
    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.nested(|p| p.object()),
            Some('[') => self.nested(|p| p.sequence('[', ']').map(Value::Array)),
            Some('(') => self.nested(|p| p.sequence('(', ')').map(Value::Array)),
            Some(q @ '"') | Some(q @ '\'') => self.string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }
    fn nested<F>(&mut self, parse: F) -> Result<Value, LiteralError>
    where
        F: FnOnce(&mut Self) -> Result<Value, LiteralError>,
    {
        if MAX_DEPTH <= self.depth {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }
    fn object(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                Some(q @ '"') | Some(q @ '\'') => self.string(q)?,
                _ => return Err(self.error("expected a string key")),
            };
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }
    fn sequence(&mut self, open: char, close: char) -> Result<Vec<Value>, LiteralError> {
        self.expect(open)?;
        let mut values = vec![];
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(values);
            }
            values.push(self.value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => {}
                Some(c) if c == close => return Ok(values),
                _ => return Err(self.error(&format!("expected ',' or '{close}'"))),
            }
        }
    }
    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.expect(quote)?;
        let mut buffer = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(buffer),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('u') => self.unicode_escape()?,
                        Some(c @ ('\\' | '\'' | '"' | '/')) => c,
                        _ => return Err(self.error("invalid escape")),
                    };
                    buffer.push(escaped);
                }
                Some(c) => buffer.push(c),
            }
        }
    }
    fn hex4(&mut self) -> Result<u32, LiteralError> {
        let digits = self.rest().get(..4).ok_or_else(|| self.error("short \\u escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid \\u escape"));
        }
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid \\u escape"))?;
        self.pos += 4;
        Ok(code)
    }
    fn unicode_escape(&mut self) -> Result<char, LiteralError> {
        let code = self.hex4()?;
        let code = if (0xD800..0xDC00).contains(&code) && self.rest().starts_with("\\u") {
            // Surrogate pair.
            self.pos += 2;
            let low = self.hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("invalid surrogate pair"));
            }
            0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
        } else {
            code
        };
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }
    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            // -inf, +inf, -Infinity.
            return match self.keyword()? {
                Value::Null => Ok(Value::Null),
                _ => Err(LiteralError::new(start, "invalid number")),
            };
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-') | Some('+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let token: String = self.input[start..self.pos]
            .chars()
            .filter(|&c| c != '_' && c != '+')
            .collect();
        let number = if is_float {
            token.parse::<f64>().ok().and_then(Number::from_f64)
        } else if let Ok(int) = token.parse::<i64>() {
            Some(Number::from(int))
        } else if let Ok(uint) = token.parse::<u64>() {
            Some(Number::from(uint))
        } else {
            token.parse::<f64>().ok().and_then(Number::from_f64)
        };
        number
            .map(Value::Number)
            .ok_or_else(|| LiteralError::new(start, "invalid number"))
    }
    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.input[start..self.pos] {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            "null" | "None" => Ok(Value::Null),
            "nan" | "NaN" | "inf" | "Infinity" => Ok(Value::Null),
            _ => Err(LiteralError::new(start, "unknown identifier")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    #[test]
    fn json_object() {
        let value = parse_literal(r#"{"related_samples":[{"s":"HG00096","kin":0.25}],"related":true}"#);
        assert_eq!(
            value.unwrap(),
            json!({"related_samples":[{"s":"HG00096","kin":0.25}],"related":true})
        );
    }
    #[test]
    fn python_spelling() {
        let value = parse_literal("{'project': 'HGDP', 'subpop': None, 'flags': (True, False,), 'n': -3,}");
        assert_eq!(
            value.unwrap(),
            json!({"project":"HGDP","subpop":null,"flags":[true,false],"n":-3})
        );
    }
    #[test]
    fn tuples() {
        assert_eq!(parse_literal("()").unwrap(), json!([]));
        assert_eq!(parse_literal("(1,)").unwrap(), json!([1]));
        assert_eq!(parse_literal(" ( 1 , [2] ) ").unwrap(), json!([1, [2]]));
    }
    #[test]
    fn numbers() {
        assert_eq!(parse_literal("1e3").unwrap(), json!(1000.0));
        assert_eq!(parse_literal("-0.5").unwrap(), json!(-0.5));
        assert_eq!(parse_literal("+7").unwrap(), json!(7));
        assert_eq!(parse_literal("1_000").unwrap(), json!(1000));
        assert_eq!(parse_literal("18446744073709551615").unwrap(), json!(u64::MAX));
        assert_eq!(parse_literal("nan").unwrap(), Value::Null);
        assert_eq!(parse_literal("-inf").unwrap(), Value::Null);
        assert!(parse_literal("1.2.3").is_err());
        assert!(parse_literal("-").is_err());
    }
    #[test]
    fn escapes() {
        let value = parse_literal(r#"'it\'s "quoted"\té😀'"#).unwrap();
        assert_eq!(value, json!("it's \"quoted\"\t\u{e9}\u{1f600}"));
        let value = parse_literal(r#""café""#).unwrap();
        assert_eq!(value, json!("caf\u{e9}"));
        assert!(parse_literal(r#"'\x41'"#).is_err());
    }
    #[test]
    fn unicode_escapes() {
        assert_eq!(parse_literal(r#""\u0041\u00e9""#).unwrap(), json!("A\u{e9}"));
        assert_eq!(parse_literal(r#""\ud83d\ude00""#).unwrap(), json!("\u{1f600}"));
        assert!(parse_literal(r#""\u+041""#).is_err());
        assert!(parse_literal(r#""\u-041""#).is_err());
        assert!(parse_literal(r#""\u00""#).is_err());
    }
    #[test]
    fn nesting_limit() {
        let deep = "[".repeat(200_000);
        let err = parse_literal(&deep).unwrap_err();
        assert_eq!(err.reason, "nesting too deep");
        assert_eq!(err.pos, MAX_DEPTH);
        let err = parse_literal(&"{'a': ".repeat(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(err.reason, "nesting too deep");
        let io_err: std::io::Error = err.into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::InvalidData);
        let ok = format!("{}{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse_literal(&ok).is_ok());
        let too_deep = format!("{}{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(parse_literal(&too_deep).is_err());
    }
    #[test]
    fn rejects_code() {
        assert!(parse_literal("__import__('os').system('ls')").is_err());
        assert!(parse_literal("{'a': foo}").is_err());
        assert!(parse_literal("{'a': 1} + {'b': 2}").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("{1: 2}").is_err());
        assert!(parse_literal("").is_err());
    }
    #[test]
    fn error_position() {
        let err = parse_literal("[1, ?]").unwrap_err();
        assert_eq!(err.pos, 4);
        assert_eq!(format!("{err}"), "unexpected character at byte 4");
    }
    #[test]
    fn typed() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Meta {
            project: String,
        }
        let meta: Meta = parse_as("{'project': '1000 Genomes', 'other': [1, 2]}").unwrap();
        assert_eq!(meta.project, "1000 Genomes");
        let err = parse_as::<Meta>("{'region': 'EUR'}").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
