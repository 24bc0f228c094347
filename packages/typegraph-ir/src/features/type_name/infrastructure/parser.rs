//! TypeName parser
//!
//! Inheritance clauses reach the registry as plain strings
//! (`Base<Int>`, `Codable`), and fragment producers often hand over
//! member types as written. This parser turns that text back into a
//! structured `TypeName`.
//!
//! Grammar (whitespace-insensitive):
//! ```text
//! type     := primary ('?' | '!')*
//! primary  := paren | bracket | nominal
//! paren    := '(' [elem (',' elem)*] ')' ['async'] ['throws'] ['->' type]
//! elem     := [ident ':'] type
//! bracket  := '[' type [':' type] ']'
//! nominal  := ident ('.' ident)* ['<' type (',' type)* '>']
//! ```
//! Malformed input never fails: parsing stops at the first unexpected
//! character and returns what was read so far.

use crate::features::type_name::domain::{TupleElement, TypeName};

impl TypeName {
    /// Parse a type reference from its source text
    pub fn parse(source: &str) -> TypeName {
        parse_type_name(source)
    }
}

pub fn parse_type_name(source: &str) -> TypeName {
    let mut parser = Parser::new(source);
    let parsed = parser.parse_type();
    if parsed.name.is_empty() && parsed.lookup_name().is_none() && !parsed.is_tuple() {
        return TypeName::new(source.trim());
    }
    parsed
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        if rest.starts_with(keyword) {
            let after = rest[keyword.len()..].chars().next();
            if !matches!(after, Some(c) if is_ident_char(c)) {
                self.pos += keyword.len();
                return true;
            }
        }
        false
    }

    fn parse_type(&mut self) -> TypeName {
        self.skip_ws();
        let mut ty = match self.peek() {
            Some('(') => self.parse_paren(),
            Some('[') => self.parse_bracket(),
            _ => self.parse_nominal(),
        };

        loop {
            self.skip_ws();
            match self.peek() {
                Some('?') => {
                    self.bump();
                    ty = ty.optional();
                }
                Some('!') => {
                    self.bump();
                    ty = ty.implicitly_unwrapped();
                }
                _ => break,
            }
        }
        ty
    }

    fn parse_paren(&mut self) -> TypeName {
        self.bump(); // '('
        let mut elements: Vec<TupleElement> = Vec::new();

        loop {
            self.skip_ws();
            if self.peek() == Some(')') || self.peek().is_none() {
                self.bump();
                break;
            }

            let start = self.pos;
            let label = self.try_label();
            let type_name = self.parse_type();
            elements.push(TupleElement::new(label.as_deref(), type_name));

            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                break;
            }
            if self.pos == start {
                break;
            }
        }

        let is_async = self.eat_keyword("async");
        let throws = self.eat_keyword("throws") || self.eat_keyword("rethrows");

        self.skip_ws();
        if self.rest().starts_with("->") {
            self.pos += 2;
            let return_type = self.parse_type();
            let parameters = elements.into_iter().map(|e| e.type_name).collect();
            let mut closure = TypeName::closure(parameters, return_type, throws);
            if is_async {
                if let Some(ref mut signature) = closure.closure {
                    signature.is_async = true;
                }
                closure.name = closure.unwrapped_type_name();
            }
            return closure;
        }

        if elements.len() == 1 && elements[0].name.is_none() {
            return elements.remove(0).type_name;
        }
        if elements.is_empty() {
            return TypeName::void();
        }
        TypeName::tuple(elements)
    }

    /// `label:` inside a tuple; restores the position when absent
    fn try_label(&mut self) -> Option<String> {
        let start = self.pos;
        let ident = self.read_ident();
        if ident.is_empty() {
            self.pos = start;
            return None;
        }
        self.skip_ws();
        if self.peek() == Some(':') {
            self.bump();
            return Some(ident);
        }
        self.pos = start;
        None
    }

    fn parse_bracket(&mut self) -> TypeName {
        self.bump(); // '['
        let key = self.parse_type();
        if self.eat(':') {
            let value = self.parse_type();
            self.eat(']');
            return TypeName::dictionary(key, value);
        }
        self.eat(']');
        TypeName::array(key)
    }

    fn parse_nominal(&mut self) -> TypeName {
        self.skip_ws();
        let mut name = self.read_ident();
        while self.peek() == Some('.') {
            self.bump();
            let segment = self.read_ident();
            if segment.is_empty() {
                break;
            }
            name.push('.');
            name.push_str(&segment);
        }

        if !self.eat('<') {
            return TypeName::new(name);
        }

        let mut arguments = Vec::new();
        loop {
            let start = self.pos;
            arguments.push(self.parse_type());
            if self.eat(',') {
                continue;
            }
            if self.eat('>') || self.pos == start || self.peek().is_none() {
                break;
            }
        }
        TypeName::generic(name, arguments)
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '`'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nominal_and_dotted() {
        assert_eq!(parse_type_name("Foo").lookup_name(), Some("Foo"));
        assert_eq!(
            parse_type_name("Outer.Inner").lookup_name(),
            Some("Outer.Inner")
        );
    }

    #[test]
    fn test_parse_generic_inheritance_clause() {
        let parsed = parse_type_name("Base<Int, [String: User]>");
        assert_eq!(parsed.lookup_name(), Some("Base"));
        assert_eq!(parsed.as_source(), "Base<Int, [String: User]>");
    }

    #[test]
    fn test_parse_optional_closure() {
        let parsed = parse_type_name("((Int, String) throws -> Void)?");
        assert!(parsed.is_closure());
        assert!(parsed.is_optional);
        assert_eq!(parsed.as_source(), "((Int, String) throws -> Void)?");
    }

    #[test]
    fn test_parse_labeled_tuple() {
        let parsed = parse_type_name("(x: Int, y: Int)");
        assert!(parsed.is_tuple());
        assert_eq!(parsed.as_source(), "(x: Int, y: Int)");
    }

    #[test]
    fn test_parse_round_trips_printable_form() {
        for source in [
            "User?",
            "[User]!",
            "Result<[User], Error>",
            "(Int) async throws -> Data",
            "[String: (Int) -> Void]",
        ] {
            assert_eq!(parse_type_name(source).as_source(), source);
        }
    }

    #[test]
    fn test_parse_malformed_does_not_panic() {
        let parsed = parse_type_name("Foo<Bar");
        assert_eq!(parsed.lookup_name(), Some("Foo"));
        let _ = parse_type_name("(((");
        let _ = parse_type_name("");
    }
}
