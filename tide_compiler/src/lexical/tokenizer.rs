//! Single-pass, indentation-sensitive scanner
//!
//! The cursor walks the source bytes once. Newlines are emitted as tokens and
//! the leading spaces of each following code line drive the [`IndentStack`],
//! which synthesizes Indent and Dedent tokens. Blank and comment-only lines
//! never change the indentation level.

use crate::config::compile_time::lexical::*;
use crate::lexical::analyzer::LexicalMetrics;
use crate::lexical::error::LexerError;
use crate::lexical::indent::{IndentChange, IndentStack};
use crate::lexical::trie::KeywordTrie;
use crate::tokens::{Token, TokenKind};

/// Two-character operators, tried before any single-character form
const TWO_CHAR_OPERATORS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::RelOp),
    ("!=", TokenKind::RelOp),
    ("<=", TokenKind::RelOp),
    (">=", TokenKind::RelOp),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("+=", TokenKind::Operator),
    ("-=", TokenKind::Operator),
    ("*=", TokenKind::Operator),
    ("/=", TokenKind::Operator),
    ("%=", TokenKind::Operator),
    ("++", TokenKind::Operator),
    ("--", TokenKind::Operator),
];

const SINGLE_CHAR_OPERATORS: &[u8] = b"+-*/%=!,;:.&|^~";

pub struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    keywords: &'a KeywordTrie,
    pos: usize,
    line: u32,
    line_start: usize,
    indents: IndentStack,
    /// Leading width of a line that opened with a comment; applied once code follows it
    pending_width: Option<usize>,
    tokens: Vec<Token>,
    keep_comments: bool,
    metrics: LexicalMetrics,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str, keywords: &'a KeywordTrie) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            keywords,
            pos: 0,
            line: 1,
            line_start: 0,
            indents: IndentStack::new(),
            pending_width: None,
            tokens: Vec::new(),
            keep_comments: false,
            metrics: LexicalMetrics::default(),
        }
    }

    /// Emit Comment tokens rather than skipping comments
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Scan the whole source. The result always ends with exactly one
    /// EndOfCode token, preceded by a Dedent for every block still open.
    pub fn tokenize(self) -> Result<Vec<Token>, LexerError> {
        self.tokenize_with_metrics().map(|(tokens, _)| tokens)
    }

    pub fn tokenize_with_metrics(mut self) -> Result<(Vec<Token>, LexicalMetrics), LexerError> {
        loop {
            self.skip_trivia()?;
            if self.pos >= self.bytes.len() {
                break;
            }
            self.next_token()?;
        }

        for _ in 0..self.indents.close_all() {
            self.push_marker(TokenKind::Dedent)?;
        }
        self.push_marker(TokenKind::EndOfCode)?;

        Ok((self.tokens, self.metrics))
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) -> Result<(), LexerError> {
        self.push_at_line(kind, start, end, self.line)
    }

    fn push_at_line(
        &mut self,
        kind: TokenKind,
        start: usize,
        end: usize,
        line: u32,
    ) -> Result<(), LexerError> {
        if self.tokens.len() >= MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: self.tokens.len(),
                line,
            });
        }
        let token = Token::new(kind, &self.source[start..end], start, end, line);
        self.metrics.record_token(&token);
        self.tokens.push(token);
        Ok(())
    }

    /// Zero-width token at the cursor
    fn push_marker(&mut self, kind: TokenKind) -> Result<(), LexerError> {
        self.push(kind, self.pos, self.pos)
    }

    fn skip_trivia(&mut self) -> Result<(), LexerError> {
        while let Some(byte) = self.peek_byte(0) {
            match byte {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.push(TokenKind::Newline, self.pos, self.pos + 1)?;
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                    self.handle_line_start()?;
                }
                b'/' if self.peek_byte(1) == Some(b'/') => self.skip_line_comment()?,
                b'/' if self.peek_byte(1) == Some(b'*') => self.skip_block_comment()?,
                _ => break,
            }
        }

        if self.pos < self.bytes.len() {
            if let Some(width) = self.pending_width.take() {
                self.handle_indentation(width)?;
            }
        }
        Ok(())
    }

    /// Measure the leading spaces of the line just entered and apply them,
    /// unless the line carries no code. A line opening with a comment keeps
    /// its width pending until code shows up after the comment.
    fn handle_line_start(&mut self) -> Result<(), LexerError> {
        self.pending_width = None;
        let mut end = self.pos;
        while self.bytes.get(end) == Some(&b' ') {
            end += 1;
        }
        let width = end - self.pos;

        match self.bytes.get(end) {
            None | Some(b'\n') | Some(b'\r') => return Ok(()),
            Some(b'/') if matches!(self.bytes.get(end + 1), Some(b'/') | Some(b'*')) => {
                self.pending_width = Some(width);
                self.pos = end;
                return Ok(());
            }
            Some(b'\t') => {
                if self.rest_of_line_is_blank(end) {
                    return Ok(());
                }
                return Err(LexerError::TabIndentation { line: self.line });
            }
            _ => {}
        }

        self.pos = end;
        self.handle_indentation(width)
    }

    fn rest_of_line_is_blank(&self, from: usize) -> bool {
        self.bytes[from..]
            .iter()
            .take_while(|&&b| b != b'\n')
            .all(|b| b.is_ascii_whitespace())
    }

    fn handle_indentation(&mut self, width: usize) -> Result<(), LexerError> {
        match self.indents.change_to(width) {
            Ok(IndentChange::Same) => Ok(()),
            Ok(IndentChange::Indent) => {
                let depth = self.indents.depth();
                if depth > MAX_INDENT_DEPTH {
                    return Err(LexerError::IndentTooDeep {
                        line: self.line,
                        depth,
                    });
                }
                self.metrics.record_indent_depth(depth);
                self.push_marker(TokenKind::Indent)
            }
            Ok(IndentChange::Dedent(levels)) => {
                for _ in 0..levels {
                    self.push_marker(TokenKind::Dedent)?;
                }
                Ok(())
            }
            Err(mismatch) => Err(LexerError::InconsistentIndentation {
                line: self.line,
                width,
                expected: mismatch.expected,
            }),
        }
    }

    fn skip_line_comment(&mut self) -> Result<(), LexerError> {
        let start = self.pos;
        while let Some(byte) = self.peek_byte(0) {
            if byte == b'\n' {
                break;
            }
            self.pos += 1;
        }
        self.finish_comment(start, self.line)
    }

    fn skip_block_comment(&mut self) -> Result<(), LexerError> {
        let start = self.pos;
        let start_line = self.line;
        self.pos += 2;

        loop {
            match self.peek_byte(0) {
                None => return Err(LexerError::UnterminatedComment { line: start_line }),
                Some(b'*') if self.peek_byte(1) == Some(b'/') => {
                    self.pos += 2;
                    break;
                }
                Some(b'\n') => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }

        self.finish_comment(start, start_line)
    }

    fn finish_comment(&mut self, start: usize, line: u32) -> Result<(), LexerError> {
        let length = self.pos - start;
        if length > MAX_COMMENT_LENGTH {
            return Err(LexerError::CommentTooLong { length, line });
        }
        self.metrics.record_comment_length(length);
        if self.keep_comments {
            self.push_at_line(TokenKind::Comment, start, self.pos, line)?;
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<(), LexerError> {
        let byte = match self.peek_byte(0) {
            Some(byte) => byte,
            None => return Ok(()),
        };

        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_word(),
            b'0'..=b'9' => self.scan_number(),
            b'"' => self.scan_string(),
            b'(' | b')' | b'{' | b'}' | b'[' | b']' => {
                let start = self.pos;
                self.pos += 1;
                self.push(TokenKind::Bracket, start, self.pos)
            }
            _ => self.scan_operator(),
        }
    }

    fn scan_word(&mut self) -> Result<(), LexerError> {
        let start = self.pos;
        while matches!(self.peek_byte(0), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.pos += 1;
        }

        let length = self.pos - start;
        if length > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length,
                line: self.line,
            });
        }

        let kind = if self.keywords.is_keyword(&self.source[start..self.pos]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(kind, start, self.pos)
    }

    fn scan_digits(&mut self) {
        while matches!(self.peek_byte(0), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn scan_number(&mut self) -> Result<(), LexerError> {
        let start = self.pos;
        self.scan_digits();

        if self.peek_byte(0) == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek_byte(0), Some(b) if b.is_ascii_digit()) {
                return Err(self.invalid_number(start));
            }
            self.scan_digits();
            if self.peek_byte(0) == Some(b'.') {
                self.pos += 1;
                return Err(self.invalid_number(start));
            }
        }

        self.push(TokenKind::Number, start, self.pos)
    }

    fn invalid_number(&self, start: usize) -> LexerError {
        LexerError::InvalidNumber {
            text: self.source[start..self.pos].to_string(),
            line: self.line,
        }
    }

    /// Strings keep their quotes in the token text. `\"` does not close the
    /// literal; a newline or end of input before the closing quote does.
    fn scan_string(&mut self) -> Result<(), LexerError> {
        let start = self.pos;
        self.pos += 1;

        loop {
            match self.peek_byte(0) {
                None | Some(b'\n') => {
                    return Err(LexerError::UnterminatedString { line: self.line })
                }
                Some(b'\\') => match self.peek_byte(1) {
                    None | Some(b'\n') => {
                        return Err(LexerError::UnterminatedString { line: self.line })
                    }
                    Some(_) => self.pos += 2,
                },
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }

        let size = self.pos - start - 2;
        if size > MAX_STRING_SIZE {
            return Err(LexerError::StringTooLarge {
                size,
                line: self.line,
            });
        }
        self.metrics.record_string_length(size);
        self.push(TokenKind::String, start, self.pos)
    }

    fn scan_operator(&mut self) -> Result<(), LexerError> {
        let start = self.pos;
        let bytes = self.bytes;
        let rest = &bytes[start..];

        if let Some((symbol, kind)) = TWO_CHAR_OPERATORS
            .iter()
            .find(|(symbol, _)| rest.starts_with(symbol.as_bytes()))
        {
            self.pos += symbol.len();
            return self.push(*kind, start, self.pos);
        }

        let byte = rest[0];
        let kind = match byte {
            b'<' | b'>' => TokenKind::RelOp,
            b if SINGLE_CHAR_OPERATORS.contains(&b) => TokenKind::Operator,
            _ => {
                let character = self.source[start..].chars().next().unwrap_or('\u{FFFD}');
                return Err(LexerError::InvalidCharacter {
                    character,
                    line: self.line,
                    column: start - self.line_start + 1,
                });
            }
        };
        self.pos += 1;
        self.push(kind, start, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn lex(source: &str) -> Result<Vec<Token>, LexerError> {
        let keywords = KeywordTrie::with_default_keywords();
        Tokenizer::new(source, &keywords).tokenize()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn count(tokens: &[Token], kind: TokenKind) -> usize {
        tokens.iter().filter(|t| t.kind == kind).count()
    }

    #[test]
    fn test_simple_statement() {
        let tokens = lex("int x = 1;").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::EndOfCode,
            ]
        );
        assert_eq!(tokens[1].text, "x");
        assert_eq!((tokens[1].start, tokens[1].end), (4, 5));
        assert_eq!(tokens[5].text, "");
    }

    #[test]
    fn test_keyword_vs_identifier() {
        let tokens = lex("while whilex _if if9").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_while_loop_indentation() {
        let source = "int x = 1;\nwhile (x < 3):\n    print(x);\n    x = x + 1;\n";
        let tokens = lex(source).unwrap();

        assert_eq!(count(&tokens, TokenKind::Indent), 1);
        assert_eq!(count(&tokens, TokenKind::Dedent), 1);
        assert_eq!(count(&tokens, TokenKind::EndOfCode), 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfCode));

        let indent = tokens.iter().position(|t| t.kind == TokenKind::Indent).unwrap();
        assert_eq!(tokens[indent - 1].kind, TokenKind::Newline);
        assert_eq!(tokens[indent + 1].text, "print");
        assert_eq!(tokens[indent + 1].line, 3);

        let dedent = tokens.iter().position(|t| t.kind == TokenKind::Dedent).unwrap();
        assert_eq!(dedent, tokens.len() - 2);
    }

    #[test]
    fn test_nested_blocks_balance() {
        let source = "if a:\n  if b:\n    c = 1\n  d = 2\ne = 3\nwhile f:\n    g = 4";
        let tokens = lex(source).unwrap();

        assert_eq!(count(&tokens, TokenKind::Indent), 3);
        assert_eq!(count(&tokens, TokenKind::Dedent), 3);
    }

    #[test]
    fn test_multi_level_dedent() {
        let tokens = lex("a:\n  b:\n    c\nd\n").unwrap();
        let before_d: Vec<TokenKind> = tokens
            .iter()
            .take_while(|t| t.text != "d")
            .map(|t| t.kind)
            .collect();
        assert!(before_d.ends_with(&[TokenKind::Newline, TokenKind::Dedent, TokenKind::Dedent]));
    }

    #[test]
    fn test_inconsistent_dedent() {
        let result = lex("if a:\n    b = 1\n  c = 2\n");
        assert_matches!(
            result,
            Err(LexerError::InconsistentIndentation {
                line: 3,
                width: 2,
                expected: 0
            })
        );
    }

    #[test]
    fn test_blank_and_comment_lines_keep_indentation() {
        let source = "if a:\n    b = 1\n\n// note\n    c = 2\n";
        let tokens = lex(source).unwrap();

        assert_eq!(count(&tokens, TokenKind::Indent), 1);
        assert_eq!(count(&tokens, TokenKind::Dedent), 1);
        assert_eq!(count(&tokens, TokenKind::Comment), 0);
    }

    #[test]
    fn test_block_comment_before_code_dedents() {
        let tokens = lex("if a:\n    b = 1\n/* c */ d = 2\n").unwrap();
        let dedent = tokens.iter().position(|t| t.kind == TokenKind::Dedent).unwrap();
        let d = tokens.iter().position(|t| t.text == "d").unwrap();

        assert!(dedent < d);
        assert_eq!(count(&tokens, TokenKind::Dedent), 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfCode));
    }

    #[test]
    fn test_block_comment_before_code_indents() {
        let tokens = lex("while a:\n    /* c */ b = 1\n").unwrap();
        let indent = tokens.iter().position(|t| t.kind == TokenKind::Indent).unwrap();
        let b = tokens.iter().position(|t| t.text == "b").unwrap();

        assert!(indent < b);
        assert_eq!(count(&tokens, TokenKind::Indent), 1);
        assert_eq!(count(&tokens, TokenKind::Dedent), 1);
    }

    #[test]
    fn test_width_counts_spaces_before_the_comment() {
        // Spaces after the comment are not indentation
        let tokens = lex("while a:\n/* c */    b = 1\n").unwrap();
        assert_eq!(count(&tokens, TokenKind::Indent), 0);

        assert_matches!(
            lex("if a:\n    b = 1\n  /* c */ d = 2\n"),
            Err(LexerError::InconsistentIndentation { line: 3, width: 2, expected: 0 })
        );
    }

    #[test]
    fn test_tab_indentation_rejected() {
        assert_matches!(
            lex("if a:\n\tb = 1\n"),
            Err(LexerError::TabIndentation { line: 2 })
        );
        // Tabs are fine mid-line and on blank lines
        assert!(lex("a =\t1\n\t\nb = 2").is_ok());
    }

    #[test]
    fn test_line_numbers_increment_on_newline() {
        let tokens = lex("a\nb\n\nc").unwrap();
        let lines: Vec<(String, u32)> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| (t.text.clone(), t.line))
            .collect();
        assert_eq!(
            lines,
            vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 4)]
        );
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[1].line, 1);
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("3 3.14 10").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["3", "3.14", "10", ""]);

        assert_matches!(lex("1.2.3"), Err(LexerError::InvalidNumber { text, line: 1 }) if text == "1.2.");
        assert_matches!(lex("x = 7."), Err(LexerError::InvalidNumber { .. }));
    }

    #[test]
    fn test_strings() {
        let tokens = lex(r#"print("a \"b\" c")"#).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].text, r#""a \"b\" c""#);

        assert_matches!(
            lex("s = \"open\nx = 1"),
            Err(LexerError::UnterminatedString { line: 1 })
        );
        assert_matches!(lex("s = \"open"), Err(LexerError::UnterminatedString { .. }));
    }

    #[test]
    fn test_operators_prefer_two_characters() {
        let tokens = lex("a <= b == c != d >= e < f > g += 1 ++ && ||").unwrap();
        let ops: Vec<(TokenKind, &str)> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::RelOp | TokenKind::Operator))
            .map(|t| (t.kind, t.text.as_str()))
            .collect();

        assert_eq!(
            ops,
            vec![
                (TokenKind::RelOp, "<="),
                (TokenKind::RelOp, "=="),
                (TokenKind::RelOp, "!="),
                (TokenKind::RelOp, ">="),
                (TokenKind::RelOp, "<"),
                (TokenKind::RelOp, ">"),
                (TokenKind::Operator, "+="),
                (TokenKind::Operator, "++"),
                (TokenKind::Operator, "&&"),
                (TokenKind::Operator, "||"),
            ]
        );
    }

    #[test]
    fn test_brackets() {
        let tokens = lex("f([x]{y})").unwrap();
        assert_eq!(count(&tokens, TokenKind::Bracket), 6);
    }

    #[test]
    fn test_invalid_character() {
        assert_matches!(
            lex("x = 1\ny = $"),
            Err(LexerError::InvalidCharacter {
                character: '$',
                line: 2,
                column: 5
            })
        );
        assert_matches!(lex("é"), Err(LexerError::InvalidCharacter { character: 'é', .. }));
    }

    #[test]
    fn test_comments() {
        let tokens = lex("a = 1 // trailing\n/* block\nspans */ b = 2").unwrap();
        let names: Vec<(&str, u32)> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| (t.text.as_str(), t.line))
            .collect();
        assert_eq!(names, vec![("a", 1), ("b", 3)]);

        assert_matches!(
            lex("a = 1\n/* never closed"),
            Err(LexerError::UnterminatedComment { line: 2 })
        );
    }

    #[test]
    fn test_keep_comments() {
        let keywords = KeywordTrie::with_default_keywords();
        let tokens = Tokenizer::new("a // note\n", &keywords)
            .keep_comments(true)
            .tokenize()
            .unwrap();

        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text, "// note");
    }

    #[test]
    fn test_custom_keyword_set() {
        let keywords = KeywordTrie::from_words(["loop"]);
        let tokens = Tokenizer::new("loop while", &keywords).tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_empty_source() {
        let tokens = lex("").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::EndOfCode]);
    }

    #[test]
    fn test_metrics() {
        let keywords = KeywordTrie::with_default_keywords();
        let (_, metrics) = Tokenizer::new("if a:\n    b = \"xy\"\n", &keywords)
            .tokenize_with_metrics()
            .unwrap();

        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.indent_tokens, 1);
        assert_eq!(metrics.dedent_tokens, 1);
        assert_eq!(metrics.max_indent_depth, 1);
        assert_eq!(metrics.max_string_length, 2);
    }
}
