//! Escaping of wildcard characters for pattern-style (LIKE) filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const TO_REPLACE: [char; 2] = ['_', '%'];

/// The character used to escape `_` and `%` in pattern filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EscapeCharacter(char);

impl EscapeCharacter {
    pub const DEFAULT: EscapeCharacter = EscapeCharacter('\\');

    pub fn of(escape_character: char) -> Self {
        Self(escape_character)
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    /// Escapes the escape character itself, then every `_` and `%`
    pub fn escape(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if c == self.0 || TO_REPLACE.contains(&c) {
                escaped.push(self.0);
            }
            escaped.push(c);
        }
        escaped
    }
}

impl Default for EscapeCharacter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for EscapeCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EscapeCharacter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self(c)),
            _ => Err(DomainError::parse(format!(
                "Escape character must be exactly one character, got '{}'",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_wildcards_and_itself() {
        let escape = EscapeCharacter::DEFAULT;
        assert_eq!(escape.escape("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape.escape("plain"), "plain");
    }

    #[test]
    fn custom_escape_character() {
        assert_eq!(EscapeCharacter::of('!').escape("a_b!"), "a!_b!!");
    }

    #[test]
    fn parses_single_characters_only() {
        assert_eq!("#".parse::<EscapeCharacter>().unwrap(), EscapeCharacter::of('#'));
        assert!("".parse::<EscapeCharacter>().is_err());
        assert!("ab".parse::<EscapeCharacter>().is_err());
    }
}
