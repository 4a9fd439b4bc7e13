/*
 * tokenizer.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Byte-offset tokenizer for stylesheet text.
 */

//! Stylesheet tokenizer.
//!
//! Produces a flat stream of tokens that cover the input exactly: joining
//! the text of every token yields the input back. Offsets are byte offsets;
//! `end` is the offset of the token's last byte.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Space,
    Word,
    String,
    AtWord,
    /// A simple parenthesized group such as `(min-width: 10px)` or an
    /// unquoted `url(...)`.
    Brackets,
    Comment,
    OpenParen,
    CloseParen,
    OpenSquare,
    CloseSquare,
    OpenCurly,
    CloseCurly,
    Semicolon,
    Colon,
}

impl TokenKind {
    fn control(byte: u8) -> Option<TokenKind> {
        match byte {
            b'[' => Some(TokenKind::OpenSquare),
            b']' => Some(TokenKind::CloseSquare),
            b'{' => Some(TokenKind::OpenCurly),
            b'}' => Some(TokenKind::CloseCurly),
            b':' => Some(TokenKind::Colon),
            b';' => Some(TokenKind::Semicolon),
            b')' => Some(TokenKind::CloseParen),
            _ => None,
        }
    }

    /// Whitespace or comment.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Comment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// A lexical error: an unterminated string, comment or bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub reason: String,
    pub offset: usize,
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n' | b'\t' | b'\r' | b'\x0c')
}

fn ends_at_word(byte: u8) -> bool {
    matches!(
        byte,
        b'\t' | b'\n'
            | b'\x0c'
            | b'\r'
            | b' '
            | b'"'
            | b'#'
            | b'\''
            | b'('
            | b')'
            | b'/'
            | b';'
            | b'['
            | b'\\'
            | b']'
            | b'{'
            | b'}'
    )
}

fn ends_word(byte: u8) -> bool {
    matches!(
        byte,
        b'\t' | b'\n'
            | b'\x0c'
            | b'\r'
            | b' '
            | b'!'
            | b'"'
            | b'#'
            | b'\''
            | b'('
            | b')'
            | b':'
            | b';'
            | b'@'
            | b'['
            | b'\\'
            | b']'
            | b'{'
            | b'}'
    )
}

pub struct Tokenizer<'a> {
    css: &'a str,
    bytes: &'a [u8],
    pos: usize,
    returned: Vec<Token<'a>>,
    words: Vec<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(css: &'a str) -> Self {
        Tokenizer {
            css,
            bytes: css.as_bytes(),
            pos: 0,
            returned: Vec::new(),
            words: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn end_of_file(&self) -> bool {
        self.returned.is_empty() && self.pos >= self.bytes.len()
    }

    /// Push a token back; it is returned by the next call to `next_token`.
    pub fn back(&mut self, token: Token<'a>) {
        self.returned.push(token);
    }

    fn byte(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.css[start..=end],
            start,
            end,
        }
    }

    fn unclosed(&self, what: &str) -> TokenizeError {
        TokenizeError {
            reason: format!("Unclosed {what}"),
            offset: self.pos,
        }
    }

    /// Offset of the next unescaped `needle` after `from`.
    fn find_unescaped(&self, needle: &str, from: usize) -> Option<usize> {
        let mut next = from;
        loop {
            next = next + 1 + self.css.get(next + 1..)?.find(needle)?;
            let mut escaped = false;
            let mut escape_pos = next;
            while escape_pos > 0 && self.bytes[escape_pos - 1] == b'\\' {
                escape_pos -= 1;
                escaped = !escaped;
            }
            if !escaped {
                return Some(next);
            }
        }
    }

    /// Offset of the first byte after `from` matching `stop`, minus one.
    fn scan_until(&self, from: usize, stop: impl Fn(usize) -> bool) -> usize {
        (from + 1..self.bytes.len())
            .find(|&i| stop(i))
            .map_or(self.bytes.len() - 1, |i| i - 1)
    }

    /// Offset of the last byte of the character starting at `at`.
    fn char_end(&self, at: usize) -> usize {
        self.css[at..]
            .chars()
            .next()
            .map_or(at, |c| at + c.len_utf8() - 1)
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, TokenizeError> {
        if let Some(token) = self.returned.pop() {
            return Ok(Some(token));
        }
        let Some(code) = self.byte(self.pos) else {
            return Ok(None);
        };

        let token = if is_space(code) {
            let mut next = self.pos;
            while self.byte(next + 1).is_some_and(is_space) {
                next += 1;
            }
            self.token(TokenKind::Space, self.pos, next)
        } else if let Some(kind) = TokenKind::control(code) {
            self.token(kind, self.pos, self.pos)
        } else {
            match code {
                b'(' => self.paren()?,
                b'\'' | b'"' => {
                    let quote = if code == b'\'' { "'" } else { "\"" };
                    let next = self
                        .find_unescaped(quote, self.pos)
                        .ok_or_else(|| self.unclosed("string"))?;
                    self.token(TokenKind::String, self.pos, next)
                }
                b'@' => {
                    let next = self.scan_until(self.pos, |i| ends_at_word(self.bytes[i]));
                    self.token(TokenKind::AtWord, self.pos, next)
                }
                b'\\' => self.escape(),
                b'/' if self.byte(self.pos + 1) == Some(b'*') => {
                    let close = self
                        .css
                        .get(self.pos + 2..)
                        .and_then(|rest| rest.find("*/"))
                        .ok_or_else(|| self.unclosed("comment"))?;
                    self.token(TokenKind::Comment, self.pos, self.pos + 2 + close + 1)
                }
                _ => {
                    let next = self.scan_until(self.pos, |i| {
                        ends_word(self.bytes[i])
                            || (self.bytes[i] == b'/' && self.byte(i + 1) == Some(b'*'))
                    });
                    let token = self.token(TokenKind::Word, self.pos, next);
                    self.words.push(token);
                    token
                }
            }
        };

        self.pos = token.end + 1;
        Ok(Some(token))
    }

    fn paren(&mut self) -> Result<Token<'a>, TokenizeError> {
        let prev = self.words.pop().map(|t| t.text).unwrap_or_default();
        let n = self.byte(self.pos + 1);
        let quoted_or_spaced = n.is_none_or(|b| b == b'\'' || b == b'"' || is_space(b));

        if prev == "url" && !quoted_or_spaced {
            let next = self
                .find_unescaped(")", self.pos)
                .ok_or_else(|| self.unclosed("bracket"))?;
            return Ok(self.token(TokenKind::Brackets, self.pos, next));
        }

        let close = self
            .css
            .get(self.pos + 1..)
            .and_then(|rest| rest.find(')'))
            .map(|i| self.pos + 1 + i);
        match close {
            Some(next)
                if !self.bytes[self.pos + 1..=next]
                    .iter()
                    .any(|b| matches!(b, b'\r' | b'\n' | b'"' | b'\'' | b'(' | b'/' | b'\\')) =>
            {
                Ok(self.token(TokenKind::Brackets, self.pos, next))
            }
            _ => Ok(self.token(TokenKind::OpenParen, self.pos, self.pos)),
        }
    }

    fn escape(&self) -> Token<'a> {
        let mut next = self.pos;
        let mut escape = true;
        while self.byte(next + 1) == Some(b'\\') {
            next += 1;
            escape = !escape;
        }
        let code = self.byte(next + 1);
        if escape && code.is_some_and(|b| b != b'/' && !is_space(b)) {
            next += 1;
            if self.bytes[next].is_ascii_hexdigit() {
                while self.byte(next + 1).is_some_and(|b| b.is_ascii_hexdigit()) {
                    next += 1;
                }
                if self.byte(next + 1) == Some(b' ') {
                    next += 1;
                }
            } else {
                next = self.char_end(next);
            }
        }
        self.token(TokenKind::Word, self.pos, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(css: &str) -> Vec<(TokenKind, &str)> {
        let mut tokenizer = Tokenizer::new(css);
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token().unwrap() {
            out.push((token.kind, token.text));
        }
        out
    }

    #[test]
    fn test_simple_rule() {
        use TokenKind::*;
        assert_eq!(
            tokenize(".foo { color: red; }"),
            vec![
                (Word, ".foo"),
                (Space, " "),
                (OpenCurly, "{"),
                (Space, " "),
                (Word, "color"),
                (Colon, ":"),
                (Space, " "),
                (Word, "red"),
                (Semicolon, ";"),
                (Space, " "),
                (CloseCurly, "}"),
            ]
        );
    }

    #[test]
    fn test_tokens_cover_input() {
        let css = "@media (min-width: 10px) {\n  a::after { content: 'x\\'y'; background: url(a.png) }\n}\n/* note */ b{c:d!important}";
        let joined: String = tokenize(css).into_iter().map(|(_, t)| t).collect();
        assert_eq!(joined, css);
    }

    #[test]
    fn test_comment_and_at_word() {
        use TokenKind::*;
        assert_eq!(
            tokenize("/* a */@import"),
            vec![(Comment, "/* a */"), (AtWord, "@import")]
        );
    }

    #[test]
    fn test_word_stops_before_comment() {
        use TokenKind::*;
        assert_eq!(
            tokenize("a/* b */"),
            vec![(Word, "a"), (Comment, "/* b */")]
        );
    }

    #[test]
    fn test_brackets() {
        use TokenKind::*;
        assert_eq!(tokenize("(a b)"), vec![(Brackets, "(a b)")]);
        assert_eq!(
            tokenize("('a')"),
            vec![(OpenParen, "("), (String, "'a'"), (CloseParen, ")")]
        );
        assert_eq!(
            tokenize("url(a/b.png)"),
            vec![(Word, "url"), (Brackets, "(a/b.png)")]
        );
    }

    #[test]
    fn test_escapes() {
        use TokenKind::*;
        assert_eq!(tokenize("\\31 a"), vec![(Word, "\\31 "), (Word, "a")]);
        assert_eq!(tokenize("\\é"), vec![(Word, "\\é")]);
    }

    #[test]
    fn test_positions() {
        let mut tokenizer = Tokenizer::new("ab  cd");
        let first = tokenizer.next_token().unwrap().unwrap();
        assert_eq!((first.start, first.end), (0, 1));
        let space = tokenizer.next_token().unwrap().unwrap();
        assert_eq!((space.start, space.end), (2, 3));
        tokenizer.back(space);
        assert!(!tokenizer.end_of_file());
        assert_eq!(tokenizer.next_token().unwrap(), Some(space));
    }

    #[test]
    fn test_unclosed() {
        let mut tokenizer = Tokenizer::new("a '");
        tokenizer.next_token().unwrap();
        tokenizer.next_token().unwrap();
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.reason, "Unclosed string");
        assert_eq!(err.offset, 2);

        let mut tokenizer = Tokenizer::new("/* a");
        assert_eq!(
            tokenizer.next_token().unwrap_err().reason,
            "Unclosed comment"
        );
    }
}
