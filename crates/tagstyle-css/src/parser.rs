/*
 * parser.rs
 *
 * Copyright (c) 2025 Posit, PBC
 *
 * Stylesheet parser built on the tokenizer.
 */

//! Stylesheet parser.
//!
//! Builds a [`Root`] from the token stream, attaching every piece of
//! whitespace and punctuation to some node's [`Raws`] so the tree can be
//! printed back unchanged.

use std::collections::VecDeque;
use std::mem;

use tagstyle_source_map::{LineIndex, Position};

use crate::error::{CssSyntaxError, StyleParseError};
use crate::node::{
    AtRule, Comment, Declaration, Node, NodeSource, RawValue, Raws, Root, Rule,
};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Options passed along with the text to a [`StyleParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name of the file the text came from, used in error messages.
    pub from: Option<String>,
}

/// A parser that turns stylesheet text into a [`Root`].
pub trait StyleParser {
    fn parse(&self, css: &str, options: &ParseOptions) -> Result<Root, StyleParseError>;
}

/// The built-in parser for standard CSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssParser;

impl StyleParser for CssParser {
    fn parse(&self, css: &str, options: &ParseOptions) -> Result<Root, StyleParseError> {
        parse(css, options).map_err(|err| {
            tracing::trace!(%err, "stylesheet syntax error");
            StyleParseError::from(err)
        })
    }
}

/// Parse `css` into a [`Root`].
///
/// Every node gets a start position; every node but the root also gets an
/// end position pointing at its last byte.
pub fn parse(css: &str, options: &ParseOptions) -> Result<Root, CssSyntaxError> {
    Parser::new(css, options).parse()
}

type ParseResult<T> = std::result::Result<T, CssSyntaxError>;

/// A block that has been opened but not yet closed.
enum Open {
    Rule(Rule),
    AtRule(AtRule),
}

impl Open {
    fn nodes_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Open::Rule(rule) => &mut rule.nodes,
            Open::AtRule(at_rule) => at_rule.nodes.get_or_insert_with(Vec::new),
        }
    }

    fn raws_mut(&mut self) -> &mut Raws {
        match self {
            Open::Rule(rule) => &mut rule.raws,
            Open::AtRule(at_rule) => &mut at_rule.raws,
        }
    }

    fn source(&self) -> &NodeSource {
        match self {
            Open::Rule(rule) => &rule.source,
            Open::AtRule(at_rule) => &at_rule.source,
        }
    }

    fn source_mut(&mut self) -> &mut NodeSource {
        match self {
            Open::Rule(rule) => &mut rule.source,
            Open::AtRule(at_rule) => &mut at_rule.source,
        }
    }

    fn into_node(self) -> Node {
        match self {
            Open::Rule(rule) => Node::Rule(rule),
            Open::AtRule(at_rule) => Node::AtRule(at_rule),
        }
    }
}

struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    index: LineIndex,
    file: Option<String>,
    root: Root,
    open: Vec<Open>,
    spaces: String,
    semicolon: bool,
}

fn closing(kind: TokenKind) -> TokenKind {
    if kind == TokenKind::OpenParen {
        TokenKind::CloseParen
    } else {
        TokenKind::CloseSquare
    }
}

fn concat(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect()
}

fn spaces_and_comments_from_end(tokens: &mut Vec<Token<'_>>) -> String {
    let mut spaces = String::new();
    while let Some(last) = tokens.last() {
        if !last.kind.is_trivia() {
            break;
        }
        spaces.insert_str(0, last.text);
        tokens.pop();
    }
    spaces
}

fn spaces_and_comments_from_start(tokens: &mut Vec<Token<'_>>) -> String {
    let count = tokens.iter().take_while(|t| t.kind.is_trivia()).count();
    concat(&tokens.drain(..count).collect::<Vec<_>>())
}

fn spaces_from_end(tokens: &mut VecDeque<Token<'_>>) -> String {
    let mut spaces = String::new();
    while let Some(last) = tokens.back() {
        if last.kind != TokenKind::Space {
            break;
        }
        spaces.insert_str(0, last.text);
        tokens.pop_back();
    }
    spaces
}

/// Join tokens into a value, dropping comments that touch other words and
/// trailing whitespace. When anything was dropped the original text is
/// kept alongside as a [`RawValue`].
fn raw_value(tokens: &[Token<'_>], custom_property: bool) -> (String, Option<RawValue>) {
    let mut value = String::new();
    let mut clean = true;
    let len = tokens.len();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Space if i == len - 1 && !custom_property => clean = false,
            TokenKind::Comment => {
                let prev_safe = i == 0 || tokens[i - 1].kind == TokenKind::Space;
                let next_safe = i + 1 == len || tokens[i + 1].kind == TokenKind::Space;
                if !prev_safe && !next_safe {
                    if value.ends_with(',') {
                        clean = false;
                    } else {
                        value.push_str(token.text);
                    }
                } else {
                    clean = false;
                }
            }
            _ => value.push_str(token.text),
        }
    }

    if clean {
        (value, None)
    } else {
        let raw = RawValue {
            value: value.clone(),
            raw: concat(tokens),
        };
        (value, Some(raw))
    }
}

fn split_comment(inner: &str) -> (String, String, String) {
    if inner.trim().is_empty() {
        return (String::new(), inner.to_string(), String::new());
    }
    let text = inner.trim();
    let left_len = inner.len() - inner.trim_start().len();
    let right_start = inner.trim_end().len();
    (
        text.to_string(),
        inner[..left_len].to_string(),
        inner[right_start..].to_string(),
    )
}

impl<'a> Parser<'a> {
    fn new(css: &'a str, options: &ParseOptions) -> Self {
        let root = Root {
            source: NodeSource::starting_at(Position::start()),
            ..Default::default()
        };
        Parser {
            tokenizer: Tokenizer::new(css),
            index: LineIndex::new(css),
            file: options.from.clone(),
            root,
            open: Vec::new(),
            spaces: String::new(),
            semicolon: false,
        }
    }

    fn position(&self, offset: usize) -> Position {
        self.index
            .position(offset)
            .unwrap_or_else(|| Position::new(self.index.line_count(), 1, offset))
    }

    fn error(&self, reason: &str, offset: usize) -> CssSyntaxError {
        let pos = self.position(offset);
        CssSyntaxError {
            reason: reason.to_string(),
            line: pos.line,
            column: pos.column,
            offset,
            file: self.file.clone(),
        }
    }

    fn next(&mut self) -> ParseResult<Option<Token<'a>>> {
        self.tokenizer
            .next_token()
            .map_err(|err| self.error(&err.reason, err.offset))
    }

    fn current_nodes(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(open) => open.nodes_mut(),
            None => &mut self.root.nodes,
        }
    }

    /// Start a node at `offset`, handing it the pending whitespace.
    fn init(&mut self, offset: usize, comment: bool) -> (NodeSource, Raws) {
        let source = NodeSource::starting_at(self.position(offset));
        let mut raws = Raws::default();
        raws.before = Some(mem::take(&mut self.spaces));
        if !comment {
            self.semicolon = false;
        }
        (source, raws)
    }

    fn parse(mut self) -> ParseResult<Root> {
        while !self.tokenizer.end_of_file() {
            let Some(token) = self.next()? else {
                break;
            };
            match token.kind {
                TokenKind::Space => self.spaces.push_str(token.text),
                TokenKind::Semicolon => self.free_semicolon(token),
                TokenKind::CloseCurly => self.end(token)?,
                TokenKind::Comment => self.comment(token),
                TokenKind::AtWord => self.at_rule(token)?,
                TokenKind::OpenCurly => self.empty_rule(token),
                _ => self.other(token)?,
            }
        }
        self.end_file()
    }

    fn comment(&mut self, token: Token<'a>) {
        let (mut source, mut raws) = self.init(token.start, true);
        source.end = Some(self.position(token.end));

        let inner = &token.text[2..token.text.len() - 2];
        let (text, left, right) = split_comment(inner);
        raws.left = Some(left);
        raws.right = Some(right);

        self.current_nodes()
            .push(Node::Comment(Comment { text, raws, source }));
    }

    fn empty_rule(&mut self, token: Token<'a>) {
        let (source, mut raws) = self.init(token.start, false);
        raws.between = Some(String::new());
        self.open.push(Open::Rule(Rule {
            selector: String::new(),
            nodes: Vec::new(),
            raws,
            source,
        }));
    }

    fn other(&mut self, start: Token<'a>) -> ParseResult<()> {
        let mut end = false;
        let mut colon = false;
        let mut bracket: Option<Token<'a>> = None;
        let mut brackets: Vec<TokenKind> = Vec::new();
        let custom_property = start.text.starts_with("--");

        let mut tokens = Vec::new();
        let mut current = Some(start);
        while let Some(token) = current {
            let kind = token.kind;
            tokens.push(token);

            if kind == TokenKind::OpenParen || kind == TokenKind::OpenSquare {
                bracket.get_or_insert(token);
                brackets.push(closing(kind));
            } else if custom_property && colon && kind == TokenKind::OpenCurly {
                bracket.get_or_insert(token);
                brackets.push(TokenKind::CloseCurly);
            } else if brackets.is_empty() {
                match kind {
                    TokenKind::Semicolon if colon => return self.decl(tokens, custom_property),
                    TokenKind::Semicolon => break,
                    TokenKind::OpenCurly => return self.rule(tokens),
                    TokenKind::CloseCurly => {
                        if let Some(token) = tokens.pop() {
                            self.tokenizer.back(token);
                        }
                        end = true;
                        break;
                    }
                    TokenKind::Colon => colon = true,
                    _ => {}
                }
            } else if brackets.last() == Some(&kind) {
                brackets.pop();
                if brackets.is_empty() {
                    bracket = None;
                }
            }

            current = self.next()?;
        }

        if self.tokenizer.end_of_file() {
            end = true;
        }
        if let Some(bracket) = bracket.filter(|_| !brackets.is_empty()) {
            return Err(self.error("Unclosed bracket", bracket.start));
        }

        if end && colon {
            if !custom_property {
                while let Some(last) = tokens.last().copied() {
                    if !last.kind.is_trivia() {
                        break;
                    }
                    tokens.pop();
                    self.tokenizer.back(last);
                }
            }
            self.decl(tokens, custom_property)
        } else {
            Err(self.unknown_word(&tokens))
        }
    }

    fn unknown_word(&self, tokens: &[Token<'a>]) -> CssSyntaxError {
        let offset = tokens
            .first()
            .map_or_else(|| self.tokenizer.position(), |t| t.start);
        self.error("Unknown word", offset)
    }

    fn rule(&mut self, mut tokens: Vec<Token<'a>>) -> ParseResult<()> {
        tokens.pop();
        let start = tokens
            .first()
            .map_or_else(|| self.tokenizer.position(), |t| t.start);
        let (source, mut raws) = self.init(start, false);
        raws.between = Some(spaces_and_comments_from_end(&mut tokens));
        let (selector, raw) = raw_value(&tokens, false);
        raws.selector = raw;

        self.open.push(Open::Rule(Rule {
            selector,
            nodes: Vec::new(),
            raws,
            source,
        }));
        Ok(())
    }

    fn decl(&mut self, tokens: Vec<Token<'a>>, custom_property: bool) -> ParseResult<()> {
        let mut tokens: VecDeque<Token<'a>> = tokens.into();
        let Some(first) = tokens.front().copied() else {
            return Ok(());
        };
        let (mut source, mut raws) = self.init(first.start, false);

        if let Some(last) = tokens.back().copied() {
            if last.kind == TokenKind::Semicolon {
                self.semicolon = true;
                tokens.pop_back();
            }
            let end = if last.kind == TokenKind::Space {
                tokens
                    .iter()
                    .rev()
                    .find(|t| t.kind != TokenKind::Space)
                    .map_or(last.end, |t| t.end)
            } else {
                last.end
            };
            source.end = Some(self.position(end));
        }

        let mut before = raws.before.take().unwrap_or_default();
        while let Some(front) = tokens.front().copied() {
            if front.kind == TokenKind::Word {
                break;
            }
            if tokens.len() == 1 {
                return Err(self.unknown_word(&[front]));
            }
            before.push_str(front.text);
            tokens.pop_front();
        }
        if let Some(front) = tokens.front() {
            source.start = Some(self.position(front.start));
        }

        let mut prop = String::new();
        while let Some(front) = tokens.front().copied() {
            if matches!(
                front.kind,
                TokenKind::Colon | TokenKind::Space | TokenKind::Comment
            ) {
                break;
            }
            prop.push_str(front.text);
            tokens.pop_front();
        }

        let mut between = String::new();
        while let Some(token) = tokens.pop_front() {
            if token.kind == TokenKind::Colon {
                between.push_str(token.text);
                break;
            }
            if token.kind == TokenKind::Word
                && token.text.bytes().any(|b| b.is_ascii_alphanumeric() || b == b'_')
            {
                return Err(self.unknown_word(&[token]));
            }
            between.push_str(token.text);
        }

        if prop.starts_with('_') || prop.starts_with('*') {
            before.push_str(&prop[..1]);
            prop.remove(0);
        }

        let mut first_spaces = Vec::new();
        while let Some(front) = tokens.front().copied() {
            if !front.kind.is_trivia() {
                break;
            }
            first_spaces.push(front);
            tokens.pop_front();
        }

        let mut important = false;
        let mut i = tokens.len();
        while i > 0 {
            i -= 1;
            let token = tokens[i];
            if token.text.eq_ignore_ascii_case("!important") {
                important = true;
                let tail: String = tokens.drain(i..).map(|t| t.text).collect();
                let string = spaces_from_end(&mut tokens) + &tail;
                if string != " !important" {
                    raws.important = Some(string);
                }
                break;
            } else if token.text.eq_ignore_ascii_case("important") {
                let mut cache = tokens.clone();
                let mut string = String::new();
                let mut j = i;
                while j > 0 {
                    let kind = cache.get(j).map(|t| t.kind);
                    if string.trim().starts_with('!') && kind != Some(TokenKind::Space) {
                        break;
                    }
                    if let Some(popped) = cache.pop_back() {
                        string.insert_str(0, popped.text);
                    }
                    j -= 1;
                }
                if string.trim().starts_with('!') {
                    important = true;
                    raws.important = Some(string);
                    tokens = cache;
                }
            }
            if !token.kind.is_trivia() {
                break;
            }
        }

        let tokens: Vec<Token<'a>> = tokens.into();
        if tokens.iter().any(|t| !t.kind.is_trivia()) {
            between.push_str(&concat(&first_spaces));
            first_spaces.clear();
        }
        first_spaces.extend(tokens.iter().copied());
        let (value, raw) = raw_value(&first_spaces, custom_property);

        raws.before = Some(before);
        raws.between = Some(between);
        raws.value = raw;

        if value.contains(':') && !custom_property {
            self.check_missed_semicolon(&tokens)?;
        }

        self.current_nodes().push(Node::Decl(Declaration {
            prop,
            value,
            important,
            raws,
            source,
        }));
        Ok(())
    }

    fn check_missed_semicolon(&self, tokens: &[Token<'a>]) -> ParseResult<()> {
        let Some(colon) = self.colon(tokens)? else {
            return Ok(());
        };

        let mut founded = 0;
        let mut found = None;
        for token in tokens[..colon].iter().rev() {
            found = Some(*token);
            if token.kind != TokenKind::Space {
                founded += 1;
                if founded == 2 {
                    break;
                }
            }
        }
        let offset = match found {
            Some(token) if token.kind == TokenKind::Word => token.end + 1,
            Some(token) => token.start,
            None => tokens[colon].start,
        };
        Err(self.error("Missed semicolon", offset))
    }

    /// Index of the first top-level colon in a value.
    fn colon(&self, tokens: &[Token<'a>]) -> ParseResult<Option<usize>> {
        let mut brackets = 0i32;
        let mut prev: Option<Token<'a>> = None;
        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::OpenParen => brackets += 1,
                TokenKind::CloseParen => brackets -= 1,
                _ => {}
            }
            if brackets == 0 && token.kind == TokenKind::Colon {
                match prev {
                    None => return Err(self.error("Double colon", token.start)),
                    Some(p) if p.kind == TokenKind::Word && p.text == "progid" => continue,
                    Some(_) => return Ok(Some(i)),
                }
            }
            prev = Some(*token);
        }
        Ok(None)
    }

    fn at_rule(&mut self, token: Token<'a>) -> ParseResult<()> {
        let name = token.text[1..].to_string();
        if name.is_empty() {
            return Err(self.error("At-rule without name", token.start));
        }
        let (mut source, mut raws) = self.init(token.start, false);

        let mut last = false;
        let mut open = false;
        let mut close = None;
        let mut params: Vec<Token<'a>> = Vec::new();
        let mut brackets: Vec<TokenKind> = Vec::new();

        while !self.tokenizer.end_of_file() {
            let Some(token) = self.next()? else {
                break;
            };
            let kind = token.kind;
            if kind == TokenKind::OpenParen || kind == TokenKind::OpenSquare {
                brackets.push(closing(kind));
            } else if kind == TokenKind::OpenCurly && !brackets.is_empty() {
                brackets.push(TokenKind::CloseCurly);
            } else if brackets.last() == Some(&kind) {
                brackets.pop();
            }

            if brackets.is_empty() {
                match kind {
                    TokenKind::Semicolon => {
                        source.end = Some(self.position(token.start));
                        self.semicolon = true;
                        break;
                    }
                    TokenKind::OpenCurly => {
                        open = true;
                        break;
                    }
                    TokenKind::CloseCurly => {
                        if let Some(prev) = params.iter().rev().find(|t| t.kind != TokenKind::Space)
                        {
                            source.end = Some(self.position(prev.end));
                        }
                        close = Some(token);
                        break;
                    }
                    _ => params.push(token),
                }
            } else {
                params.push(token);
            }

            if self.tokenizer.end_of_file() {
                last = true;
                break;
            }
        }

        let mut between = spaces_and_comments_from_end(&mut params);
        let mut value = String::new();
        if params.is_empty() {
            raws.after_name = Some(String::new());
        } else {
            raws.after_name = Some(spaces_and_comments_from_start(&mut params));
            let (params_value, raw) = raw_value(&params, false);
            value = params_value;
            raws.params = raw;
            if last {
                if let Some(token) = params.last() {
                    source.end = Some(self.position(token.end));
                }
                self.spaces = mem::take(&mut between);
            }
        }
        raws.between = Some(between);

        let node = AtRule {
            name,
            params: value,
            nodes: open.then(Vec::new),
            raws,
            source,
        };
        if open {
            self.open.push(Open::AtRule(node));
        } else {
            self.current_nodes().push(Node::AtRule(node));
        }

        match close {
            Some(token) => self.end(token),
            None => Ok(()),
        }
    }

    fn free_semicolon(&mut self, token: Token<'a>) {
        self.spaces.push_str(token.text);
        let spaces = &mut self.spaces;
        let nodes = match self.open.last_mut() {
            Some(open) => open.nodes_mut(),
            None => &mut self.root.nodes,
        };
        if let Some(Node::Rule(prev)) = nodes.last_mut() {
            if prev.raws.own_semicolon.is_none() {
                prev.raws.own_semicolon = Some(mem::take(spaces));
            }
        }
    }

    fn end(&mut self, token: Token<'a>) -> ParseResult<()> {
        let Some(mut open) = self.open.pop() else {
            return Err(self.error("Unexpected }", token.start));
        };

        let semicolon = mem::take(&mut self.semicolon);
        let has_nodes = !open.nodes_mut().is_empty();
        let raws = open.raws_mut();
        if has_nodes {
            raws.semicolon = Some(semicolon);
        }
        let mut after = raws.after.take().unwrap_or_default();
        after.push_str(&mem::take(&mut self.spaces));
        raws.after = Some(after);

        open.source_mut().end = Some(self.position(token.start));
        let node = open.into_node();
        self.current_nodes().push(node);
        Ok(())
    }

    fn end_file(mut self) -> ParseResult<Root> {
        if let Some(open) = self.open.last() {
            let offset = open.source().start.map_or(0, |p| p.offset);
            return Err(self.error("Unclosed block", offset));
        }

        let semicolon = self.semicolon;
        let has_nodes = !self.root.nodes.is_empty();
        let spaces = mem::take(&mut self.spaces);
        let raws = &mut self.root.raws;
        if has_nodes {
            raws.semicolon = Some(semicolon);
        }
        let mut after = raws.after.take().unwrap_or_default();
        after.push_str(&spaces);
        raws.after = Some(after);

        Ok(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_ok(css: &str) -> Root {
        parse(css, &ParseOptions::default()).unwrap()
    }

    fn parse_err(css: &str) -> CssSyntaxError {
        parse(css, &ParseOptions::default()).unwrap_err()
    }

    #[test]
    fn test_rule_with_declarations() {
        let root = parse_ok(".foo {\n  color: red;\n  margin: 0\n}\n");
        let [Node::Rule(rule)] = root.nodes.as_slice() else {
            panic!("expected a single rule");
        };
        assert_eq!(rule.selector, ".foo");
        assert_eq!(rule.raws.between.as_deref(), Some(" "));
        assert_eq!(rule.raws.semicolon, Some(false));
        assert_eq!(rule.raws.after.as_deref(), Some("\n"));
        assert_eq!(root.raws.after.as_deref(), Some("\n"));

        let Node::Decl(decl) = &rule.nodes[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(decl.prop, "color");
        assert_eq!(decl.value, "red");
        assert_eq!(decl.raws.before.as_deref(), Some("\n  "));
        assert_eq!(decl.raws.between.as_deref(), Some(": "));
    }

    #[test]
    fn test_positions_are_inclusive() {
        let root = parse_ok(".foo {\n  color: red;\n}");
        assert_eq!(root.source.start, Some(Position::new(1, 1, 0)));
        assert_eq!(root.source.end, None);

        let rule = &root.nodes[0];
        assert_eq!(rule.source().start, Some(Position::new(1, 1, 0)));
        assert_eq!(rule.source().end, Some(Position::new(3, 1, 21)));

        let decl = &rule.children().unwrap()[0];
        assert_eq!(decl.source().start, Some(Position::new(2, 3, 9)));
        assert_eq!(decl.source().end, Some(Position::new(2, 13, 19)));
    }

    #[test]
    fn test_at_rules() {
        let root = parse_ok("@import 'a.css';\n@media (min-width: 10px) {\n  a { b: c }\n}");
        let Node::AtRule(import) = &root.nodes[0] else {
            panic!("expected at-rule");
        };
        assert_eq!(import.name, "import");
        assert_eq!(import.params, "'a.css'");
        assert_eq!(import.raws.after_name.as_deref(), Some(" "));
        assert!(import.nodes.is_none());

        let Node::AtRule(media) = &root.nodes[1] else {
            panic!("expected at-rule");
        };
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "(min-width: 10px)");
        assert_eq!(media.nodes.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_comments() {
        let root = parse_ok("/*  hello  */\n/**/");
        let Node::Comment(comment) = &root.nodes[0] else {
            panic!("expected comment");
        };
        assert_eq!(comment.text, "hello");
        assert_eq!(comment.raws.left.as_deref(), Some("  "));
        assert_eq!(comment.raws.right.as_deref(), Some("  "));

        let Node::Comment(empty) = &root.nodes[1] else {
            panic!("expected comment");
        };
        assert_eq!(empty.text, "");
    }

    #[test]
    fn test_important_and_raw_values() {
        let root = parse_ok("a { color: red !IMPORTANT; margin: 1px/**/2px ; }");
        let nodes = root.nodes[0].children().unwrap();
        let Node::Decl(color) = &nodes[0] else {
            panic!("expected decl");
        };
        assert!(color.important);
        assert_eq!(color.value, "red");
        assert_eq!(color.raws.important.as_deref(), Some(" !IMPORTANT"));

        let Node::Decl(margin) = &nodes[1] else {
            panic!("expected decl");
        };
        assert_eq!(margin.value, "1px/**/2px");
        assert_eq!(
            margin.raws.value,
            Some(RawValue {
                value: "1px/**/2px".to_string(),
                raw: "1px/**/2px ".to_string(),
            })
        );
    }

    #[test]
    fn test_custom_property_keeps_braces() {
        let root = parse_ok(":root { --x: { a: b }; }");
        let Node::Decl(decl) = &root.nodes[0].children().unwrap()[0] else {
            panic!("expected decl");
        };
        assert_eq!(decl.prop, "--x");
        assert_eq!(decl.value, "{ a: b }");
    }

    #[test]
    fn test_own_semicolon() {
        let root = parse_ok("a {};");
        let Node::Rule(rule) = &root.nodes[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.raws.own_semicolon.as_deref(), Some(";"));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse_err("a {").reason, "Unclosed block");
        assert_eq!(parse_err("}").reason, "Unexpected }");
        assert_eq!(parse_err("a { b }").reason, "Unknown word");
        assert_eq!(parse_err("a { b: (c }").reason, "Unclosed bracket");
        assert_eq!(parse_err("a { b: c\n d: e }").reason, "Missed semicolon");

        let err = parse_err("a {\n  foo bar;\n}");
        assert_eq!((err.line, err.column, err.offset), (2, 3, 6));
    }

    #[test]
    fn test_error_carries_file_name() {
        let options = ParseOptions {
            from: Some("styles.ts".to_string()),
        };
        let err = parse("a {", &options).unwrap_err();
        assert_eq!(err.file.as_deref(), Some("styles.ts"));
    }

    #[test]
    fn test_css_parser_through_trait() {
        let parser: &dyn StyleParser = &CssParser;
        let root = parser.parse("  a {}", &ParseOptions::default()).unwrap();
        assert_eq!(root.nodes[0].raws().before.as_deref(), Some("  "));

        let err = parser.parse("a {", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, StyleParseError::Syntax(e) if e.reason == "Unclosed block"));
    }
}
