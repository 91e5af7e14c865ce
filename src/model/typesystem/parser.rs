//! Parser for the canonical textual form of type descriptors.
//!
//! The grammar is intentionally small:
//!
//! ```text
//! type      := name [ '<' type { ',' type } '>' ]
//! name      := identifier { '.' identifier }
//! ```
//!
//! Whitespace between tokens is ignored. Anything else (empty argument lists, trailing
//! input, unbalanced brackets) is rejected with [`Error::InvalidTypeName`].

use crate::{model::typesystem::TypeDescriptor, Error, Result};

/// Maximum nesting depth of type arguments accepted by the parser
const MAX_NESTING_DEPTH: usize = 64;

struct TypeNameParser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> TypeNameParser<'a> {
    fn new(input: &'a str) -> Self {
        TypeNameParser { input, position: 0 }
    }

    fn error(&self, message: &str) -> Error {
        Error::InvalidTypeName(format!(
            "'{}' at offset {}: {}",
            self.input, self.position, message
        ))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.position += c.len_utf8();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.position += c.len_utf8();
                Ok(())
            }
            _ => Err(self.error(&format!("expected '{expected}'"))),
        }
    }

    fn parse_name(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.position;
        let mut expect_identifier = true;

        while let Some(c) = self.peek() {
            if c == '.' {
                if expect_identifier {
                    return Err(self.error("empty name segment"));
                }
                expect_identifier = true;
            } else if c.is_alphanumeric() || c == '_' || c == '$' {
                if expect_identifier && c.is_ascii_digit() {
                    return Err(self.error("name segment starts with a digit"));
                }
                expect_identifier = false;
            } else {
                break;
            }
            self.position += c.len_utf8();
        }

        if start == self.position {
            return Err(self.error("expected a type name"));
        }
        if expect_identifier {
            return Err(self.error("name ends with '.'"));
        }

        Ok(&self.input[start..self.position])
    }

    fn parse_type(&mut self, depth: usize) -> Result<TypeDescriptor> {
        if depth > MAX_NESTING_DEPTH {
            return Err(self.error("type arguments nested too deeply"));
        }

        let name = self.parse_name()?;

        self.skip_whitespace();
        if self.peek() != Some('<') {
            return Ok(TypeDescriptor::named(name));
        }
        self.expect('<')?;

        let mut arguments = Vec::new();
        loop {
            arguments.push(self.parse_type(depth + 1)?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.expect(',')?,
                Some('>') => {
                    self.expect('>')?;
                    break;
                }
                _ => return Err(self.error("expected ',' or '>'")),
            }
        }

        Ok(TypeDescriptor::generic(name, arguments))
    }

    fn parse(mut self) -> Result<TypeDescriptor> {
        let descriptor = self.parse_type(0)?;
        self.skip_whitespace();
        if self.position != self.input.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(descriptor)
    }
}

impl TypeDescriptor {
    /// Parse a descriptor from its canonical textual form, e.g. `List<String>`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTypeName`] if `input` is not a well-formed type name.
    pub fn parse(input: &str) -> Result<TypeDescriptor> {
        TypeNameParser::new(input).parse()
    }
}

impl std::str::FromStr for TypeDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TypeDescriptor::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let parsed = TypeDescriptor::parse("org.example.Person").unwrap();
        assert_eq!(parsed, TypeDescriptor::named("org.example.Person"));
        assert!(!parsed.is_generic());
    }

    #[test]
    fn test_parse_nested_generics() {
        let parsed = TypeDescriptor::parse(" Map < String , List<long> > ").unwrap();
        assert_eq!(parsed.name(), "Map");
        assert_eq!(parsed.arguments().len(), 2);
        assert_eq!(parsed.to_string(), "Map<String, List<long>>");
    }

    #[test]
    fn test_parse_display_is_stable() {
        let input = "Map<String, List<Set<int>>>";
        let parsed = TypeDescriptor::parse(input).unwrap();
        assert_eq!(parsed.to_string(), input);
        assert_eq!(TypeDescriptor::parse(&parsed.to_string()).unwrap(), parsed);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "   ",
            "List<>",
            "List<String",
            "List<String>>",
            "List<String,>",
            "a..b",
            "a.",
            ".a",
            "1abc",
            "Foo Bar",
        ] {
            assert!(
                matches!(TypeDescriptor::parse(input), Err(Error::InvalidTypeName(_))),
                "'{input}' should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_depth_limit() {
        let mut input = String::new();
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            input.push_str("List<");
        }
        input.push_str("int");
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            input.push('>');
        }
        assert!(TypeDescriptor::parse(&input).is_err());
    }
}
