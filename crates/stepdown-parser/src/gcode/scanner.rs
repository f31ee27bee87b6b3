//! Character scanner and line tokenizer

use stepdown_core::GcodeError;
use tracing::trace;

use super::token::{Token, TokenKind};

/// Characters that may make up a numeric argument
const VALUE_CHARS: &str = "+-0123456789.";

/// Cursor over the characters of one line
#[derive(Debug, Clone)]
pub struct RuneScanner {
    runes: Vec<char>,
    index: usize,
}

impl RuneScanner {
    /// Create a scanner positioned at the first character
    pub fn new(text: &str) -> Self {
        Self {
            runes: text.chars().collect(),
            index: 0,
        }
    }

    /// Check if characters remain
    pub fn scan(&self) -> bool {
        self.index < self.runes.len()
    }

    /// Index of the next character to be read
    pub fn index(&self) -> usize {
        self.index
    }

    /// Read the next character
    pub fn next_rune(&mut self) -> Option<char> {
        let r = self.runes.get(self.index).copied()?;
        self.index += 1;
        Some(r)
    }

    /// Read the run of sign, digit and point characters at the cursor
    pub fn value_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(&r) = self.runes.get(self.index) {
            if !VALUE_CHARS.contains(r) {
                break;
            }
            text.push(r);
            self.index += 1;
        }
        text
    }

    /// Parse an integer argument for `command`
    pub fn int_value(&mut self, command: char) -> Result<i32, GcodeError> {
        let text = self.value_text();
        text.parse::<i32>()
            .map_err(|_| GcodeError::InvalidValue { command, text })
    }

    /// Parse a coordinate argument for `command`
    pub fn float_value(&mut self, command: char) -> Result<f64, GcodeError> {
        let text = self.value_text();
        text.parse::<f64>()
            .map_err(|_| GcodeError::InvalidValue { command, text })
    }

    /// Read everything up to `end` or end of line
    ///
    /// With `stop_at_end` false the whole remainder is returned. The `end`
    /// character itself is consumed but not returned.
    pub fn until(&mut self, stop_at_end: bool, end: char) -> String {
        let mut text = String::new();
        while let Some(r) = self.next_rune() {
            if stop_at_end && r == end {
                break;
            }
            text.push(r);
        }
        text
    }
}

/// Split one trimmed line into tokens
///
/// Whitespace only separates tokens. Command letters are case insensitive.
/// An unmatched `(` runs to the end of the line and is closed on output.
pub fn tokenize_line(line: &str) -> Result<Vec<Token>, GcodeError> {
    let mut rs = RuneScanner::new(line);
    let mut tokens = Vec::new();

    while let Some(raw) = rs.next_rune() {
        let r = raw.to_ascii_uppercase();
        let token = match r {
            ' ' | '\t' => continue,
            '%' => Token::ProgramDelimiter,
            'G' | 'M' => Token::address(r, rs.int_value(r)?),
            'F' | 'S' => Token::integer(r, rs.int_value(r)?),
            'X' | 'Y' | 'Z' => Token::float(r, rs.float_value(r)?),
            '/' => {
                if rs.index() != 1 {
                    return Err(GcodeError::InvalidSlashPosition);
                }
                Token::comment(format!("/{}", rs.until(false, ' ')))
            }
            ';' => Token::comment(format!(";{}", rs.until(false, ' '))),
            '(' => Token::comment(format!("({})", rs.until(true, ')'))),
            other => return Err(GcodeError::UnexpectedCharacter { ch: other }),
        };

        if !token.is_supported() {
            return Err(GcodeError::UnsupportedCommand {
                command: token.render(true),
            });
        }
        if token.kind() != TokenKind::Comment {
            trace!("token {}", token.render(true));
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let rs = RuneScanner::new("");
        assert!(!rs.scan());
    }

    #[test]
    fn test_next_rune_and_eol() {
        let mut rs = RuneScanner::new("%");
        assert!(rs.scan());
        assert_eq!(rs.next_rune(), Some('%'));
        assert!(!rs.scan());
        assert_eq!(rs.next_rune(), None);
    }

    #[test]
    fn test_values() {
        assert_eq!(RuneScanner::new("1.1").float_value('X').unwrap(), 1.1);
        assert_eq!(RuneScanner::new("-1.1").float_value('X').unwrap(), -1.1);
        assert_eq!(RuneScanner::new("1").int_value('G').unwrap(), 1);
        assert_eq!(RuneScanner::new("-1").int_value('G').unwrap(), -1);
    }

    #[test]
    fn test_malformed_values() {
        let err = RuneScanner::new("+-1").int_value('F').unwrap_err();
        assert_eq!(
            err,
            GcodeError::InvalidValue {
                command: 'F',
                text: "+-1".to_string()
            }
        );
        assert!(RuneScanner::new("1.1.").float_value('X').is_err());
        assert!(RuneScanner::new("").float_value('X').is_err());
        assert!(RuneScanner::new("2.5").int_value('S').is_err());
    }

    #[test]
    fn test_multi_command() {
        let mut rs = RuneScanner::new("X1.1M3");
        rs.next_rune();
        let v1 = rs.float_value('X').unwrap();
        rs.next_rune();
        let v2 = rs.int_value('M').unwrap();
        assert_eq!(v1, 1.1);
        assert_eq!(v2, 3);
    }

    #[test]
    fn test_until() {
        let mut rs = RuneScanner::new("(abcdef)");
        rs.next_rune();
        assert_eq!(rs.until(false, ' '), "abcdef)");

        let mut rs = RuneScanner::new("(abcdef)X1");
        rs.next_rune();
        assert_eq!(rs.until(true, ')'), "abcdef");
        assert_eq!(rs.next_rune(), Some('X'));
    }

    #[test]
    fn test_tokenize_single_words() {
        let cases = [
            ("%", Token::ProgramDelimiter),
            ("F250", Token::integer('F', 250)),
            ("G1", Token::address('G', 1)),
            ("G01", Token::address('G', 1)),
            ("S1000", Token::integer('S', 1000)),
            ("M3", Token::address('M', 3)),
            ("X-1.1", Token::float('X', -1.1)),
            ("Y-1.1", Token::float('Y', -1.1)),
            ("Z1.1", Token::float('Z', 1.1)),
            ("z1.1", Token::float('Z', 1.1)),
            ("/bla", Token::comment("/bla")),
        ];
        for (line, expected) in cases {
            let tokens = tokenize_line(line).unwrap();
            assert_eq!(tokens, vec![expected], "line {}", line);
        }
    }

    #[test]
    fn test_tokenize_comments() {
        let tokens = tokenize_line("G0(embeded)X1.1;trailing").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::address('G', 0),
                Token::comment("(embeded)"),
                Token::float('X', 1.1),
                Token::comment(";trailing"),
            ]
        );
    }

    #[test]
    fn test_unmatched_paren_runs_to_end_of_line() {
        let tokens = tokenize_line("G0 (open X1").unwrap();
        assert_eq!(
            tokens,
            vec![Token::address('G', 0), Token::comment("(open X1)")]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(
            tokenize_line("G91").unwrap_err(),
            GcodeError::UnsupportedCommand {
                command: "G91".to_string()
            }
        );
        assert_eq!(
            tokenize_line("G0 Q1").unwrap_err(),
            GcodeError::UnexpectedCharacter { ch: 'Q' }
        );
        assert_eq!(
            tokenize_line("G0 /x").unwrap_err(),
            GcodeError::InvalidSlashPosition
        );
        assert!(matches!(
            tokenize_line("G1 XA").unwrap_err(),
            GcodeError::InvalidValue { command: 'X', .. }
        ));
    }
}
