//! Accept/reject pass over the token sequence
//!
//! Two walks: bracket balance over the whole sequence, then statement
//! structure (block headers, indentation placement, if-chains). Tokens are
//! only read, never rewritten.

use crate::config::compile_time::syntax::MAX_BRACKET_DEPTH;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind};

/// A read-only pass that accepts or rejects a token sequence
pub trait TokenValidator {
    fn name(&self) -> &'static str;
    fn validate(&self, tokens: &[Token]) -> SyntaxResult<()>;
}

const TYPE_NAMES: &[&str] = &["int", "float", "string", "bool"];

#[derive(Debug, Default, Clone, Copy)]
pub struct GrammarValidator;

impl TokenValidator for GrammarValidator {
    fn name(&self) -> &'static str {
        "grammar"
    }

    fn validate(&self, tokens: &[Token]) -> SyntaxResult<()> {
        let significant: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();

        check_brackets(&significant)?;
        StructureWalk::new(&significant).run()
    }
}

fn closing_for(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

fn check_brackets(tokens: &[&Token]) -> SyntaxResult<()> {
    let mut open: Vec<&Token> = Vec::new();

    for token in tokens.iter().copied().filter(|t| t.kind == TokenKind::Bracket) {
        match token.text.as_str() {
            "(" | "[" | "{" => {
                if open.len() >= MAX_BRACKET_DEPTH {
                    return Err(SyntaxError::BracketDepthExceeded { line: token.line });
                }
                open.push(token);
            }
            close => match open.pop() {
                Some(opener) if closing_for(&opener.text) == close => {}
                Some(opener) => {
                    return Err(SyntaxError::MismatchedBracket {
                        open: opener.text.clone(),
                        close: close.to_string(),
                        line: token.line,
                    })
                }
                None => {
                    return Err(SyntaxError::UnbalancedBracket {
                        bracket: close.to_string(),
                        line: token.line,
                    })
                }
            },
        }
    }

    match open.pop() {
        Some(opener) => Err(SyntaxError::UnbalancedBracket {
            bracket: opener.text.clone(),
            line: opener.line,
        }),
        None => Ok(()),
    }
}

struct StructureWalk<'t> {
    tokens: &'t [&'t Token],
    /// Per indentation level: the last statement there was an if/elif block
    chain: Vec<bool>,
    /// Header whose block has not started yet
    pending_block: Option<&'t Token>,
    at_statement_start: bool,
}

impl<'t> StructureWalk<'t> {
    fn new(tokens: &'t [&'t Token]) -> Self {
        Self {
            tokens,
            chain: vec![false],
            pending_block: None,
            at_statement_start: true,
        }
    }

    fn token(&self, index: usize) -> Option<&'t Token> {
        self.tokens.get(index).copied()
    }

    fn describe(&self, index: usize) -> String {
        self.token(index)
            .map(Token::describe)
            .unwrap_or_else(|| "end of input".to_string())
    }

    fn line_of(&self, index: usize, fallback: &Token) -> u32 {
        self.token(index).map_or(fallback.line, |t| t.line)
    }

    fn set_chain(&mut self, value: bool) {
        if let Some(top) = self.chain.last_mut() {
            *top = value;
        }
    }

    fn chain_open(&self) -> bool {
        self.chain.last().copied().unwrap_or(false)
    }

    fn run(mut self) -> SyntaxResult<()> {
        let mut index = 0;

        while let Some(token) = self.token(index) {
            match token.kind {
                TokenKind::Newline => {
                    self.at_statement_start = true;
                    index += 1;
                    continue;
                }
                TokenKind::Indent => {
                    if self.pending_block.take().is_none() {
                        return Err(SyntaxError::UnexpectedIndent { line: token.line });
                    }
                    self.chain.push(false);
                    self.at_statement_start = true;
                    index += 1;
                    continue;
                }
                TokenKind::Dedent => {
                    if self.chain.len() > 1 {
                        self.chain.pop();
                    }
                    self.at_statement_start = true;
                    index += 1;
                    continue;
                }
                TokenKind::EndOfCode | TokenKind::EndOfStream => break,
                _ => {}
            }

            if let Some(header) = self.pending_block {
                return Err(SyntaxError::ExpectedBlock {
                    keyword: header.text.clone(),
                    line: token.line,
                });
            }

            if !self.at_statement_start {
                if token.is_operator(";") {
                    self.at_statement_start = true;
                }
                index += 1;
                continue;
            }
            self.at_statement_start = false;

            index = self.statement(index, token)?;
        }

        match self.pending_block {
            Some(header) => Err(SyntaxError::ExpectedBlock {
                keyword: header.text.clone(),
                line: header.line,
            }),
            None => Ok(()),
        }
    }

    /// Check the statement starting at `index`; returns where to resume
    fn statement(&mut self, index: usize, token: &'t Token) -> SyntaxResult<usize> {
        if token.kind != TokenKind::Keyword {
            self.set_chain(false);
            return Ok(index + 1);
        }

        match token.text.as_str() {
            "if" => {
                let end = self.header(index, token)?;
                self.set_chain(true);
                Ok(end)
            }
            "elif" | "else" => {
                if !self.chain_open() {
                    return Err(SyntaxError::DanglingElse {
                        keyword: token.text.clone(),
                        line: token.line,
                    });
                }
                let colon_follows = self.token(index + 1).is_some_and(|t| t.is_operator(":"));
                if token.text == "else" && !colon_follows {
                    return Err(SyntaxError::MissingColon {
                        keyword: token.text.clone(),
                        line: token.line,
                    });
                }
                let end = self.header(index, token)?;
                self.set_chain(token.text == "elif");
                Ok(end)
            }
            "while" => {
                self.set_chain(false);
                self.header(index, token)
            }
            "for" => {
                self.set_chain(false);
                self.check_for_shape(index, token)?;
                self.header(index, token)
            }
            "def" => {
                self.set_chain(false);
                self.check_def_shape(index, token)?;
                self.header(index, token)
            }
            _ => {
                self.set_chain(false);
                Ok(index + 1)
            }
        }
    }

    /// A header runs to the end of its line and must end with its first `:`.
    /// Returns the index of the line break.
    fn header(&mut self, index: usize, keyword: &'t Token) -> SyntaxResult<usize> {
        let mut end = index + 1;
        while let Some(token) = self.token(end) {
            if matches!(
                token.kind,
                TokenKind::Newline
                    | TokenKind::Indent
                    | TokenKind::Dedent
                    | TokenKind::EndOfCode
                    | TokenKind::EndOfStream
            ) {
                break;
            }
            end += 1;
        }

        let colon = (index + 1..end).find(|&at| self.token(at).is_some_and(|t| t.is_operator(":")));
        match colon {
            None => {
                return Err(SyntaxError::MissingColon {
                    keyword: keyword.text.clone(),
                    line: keyword.line,
                })
            }
            // Code after the colon on the header line
            Some(at) if at + 1 != end => {
                return Err(SyntaxError::ExpectedBlock {
                    keyword: keyword.text.clone(),
                    line: keyword.line,
                })
            }
            Some(_) => {}
        }
        if !self.token(end).is_some_and(|t| t.kind == TokenKind::Newline) {
            return Err(SyntaxError::ExpectedBlock {
                keyword: keyword.text.clone(),
                line: self.line_of(end, keyword),
            });
        }

        self.pending_block = Some(keyword);
        Ok(end)
    }

    /// `def name ( [type] param {, [type] param} ) :`
    fn check_def_shape(&self, index: usize, keyword: &Token) -> SyntaxResult<()> {
        let malformed = |at: usize| SyntaxError::MalformedFunctionHeader {
            found: self.describe(at),
            line: self.line_of(at, keyword),
        };

        let mut at = index + 1;
        if !self.token(at).is_some_and(|t| t.kind == TokenKind::Identifier) {
            return Err(malformed(at));
        }
        at += 1;
        if !self.token(at).is_some_and(|t| t.is_bracket("(")) {
            return Err(malformed(at));
        }
        at += 1;

        if self.token(at).is_some_and(|t| t.is_bracket(")")) {
            return Ok(());
        }
        loop {
            if self
                .token(at)
                .is_some_and(|t| t.kind == TokenKind::Keyword && TYPE_NAMES.contains(&t.text.as_str()))
            {
                at += 1;
            }
            if !self.token(at).is_some_and(|t| t.kind == TokenKind::Identifier) {
                return Err(malformed(at));
            }
            at += 1;
            match self.token(at) {
                Some(t) if t.is_operator(",") => at += 1,
                Some(t) if t.is_bracket(")") => return Ok(()),
                _ => return Err(malformed(at)),
            }
        }
    }

    /// `for name in range (`
    fn check_for_shape(&self, index: usize, keyword: &Token) -> SyntaxResult<()> {
        let shape: [fn(&Token) -> bool; 4] = [
            |t: &Token| t.kind == TokenKind::Identifier,
            |t: &Token| t.is_keyword("in"),
            |t: &Token| t.is_keyword("range"),
            |t: &Token| t.is_bracket("("),
        ];

        for (offset, accepts) in shape.iter().enumerate() {
            let at = index + 1 + offset;
            if !self.token(at).is_some_and(|t| accepts(t)) {
                return Err(SyntaxError::MalformedForHeader {
                    found: self.describe(at),
                    line: self.line_of(at, keyword),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::{tokenize, KeywordTrie};
    use assert_matches::assert_matches;

    fn validate(source: &str) -> SyntaxResult<()> {
        let tokens = tokenize(source, &KeywordTrie::with_default_keywords()).unwrap();
        GrammarValidator.validate(&tokens)
    }

    #[test]
    fn test_valid_program() {
        let source = "\
int x = 1;
def inc(int a):
    return a + 1

while (x < 3):
    if x == 1:
        print(x)
    elif x == 2:
        pass
    else:
        x = inc(x)
    x = x + 1
for i in range(0, 3):
    print(i)
";
        assert_eq!(validate(source), Ok(()));
    }

    #[test]
    fn test_brackets() {
        assert_matches!(
            validate("print((x)\n"),
            Err(SyntaxError::UnbalancedBracket { bracket, line: 1 }) if bracket == "("
        );
        assert_matches!(
            validate("x = (a]\n"),
            Err(SyntaxError::MismatchedBracket { .. })
        );
        assert_matches!(
            validate("x = a)\n"),
            Err(SyntaxError::UnbalancedBracket { bracket, .. }) if bracket == ")"
        );
    }

    #[test]
    fn test_missing_colon() {
        assert_matches!(
            validate("while x\n    pass\n"),
            Err(SyntaxError::MissingColon { keyword, line: 1 }) if keyword == "while"
        );
        assert_matches!(
            validate("if x:\n    pass\nelse\n    pass\n"),
            Err(SyntaxError::MissingColon { .. })
        );
    }

    #[test]
    fn test_block_placement() {
        assert_matches!(
            validate("while x:\npass\n"),
            Err(SyntaxError::ExpectedBlock { keyword, line: 2 }) if keyword == "while"
        );
        assert_matches!(
            validate("while x: pass\n"),
            Err(SyntaxError::ExpectedBlock { .. })
        );
        assert_matches!(
            validate("x = 1\n    y = 2\n"),
            Err(SyntaxError::UnexpectedIndent { line: 2 })
        );
        assert_matches!(validate("if x:\n"), Err(SyntaxError::ExpectedBlock { .. }));
    }

    #[test]
    fn test_headers() {
        assert_matches!(
            validate("def (a):\n    pass\n"),
            Err(SyntaxError::MalformedFunctionHeader { .. })
        );
        assert_matches!(
            validate("def f(a b):\n    pass\n"),
            Err(SyntaxError::MalformedFunctionHeader { found, .. }) if found == "'b'"
        );
        assert_matches!(
            validate("for i in x:\n    pass\n"),
            Err(SyntaxError::MalformedForHeader { .. })
        );
    }

    #[test]
    fn test_dangling_else() {
        assert_matches!(
            validate("x = 1\nelse:\n    pass\n"),
            Err(SyntaxError::DanglingElse { keyword, line: 2 }) if keyword == "else"
        );
        assert_matches!(
            validate("if a:\n    pass\nx = 1\nelif b:\n    pass\n"),
            Err(SyntaxError::DanglingElse { .. })
        );
        assert_matches!(
            validate("if a:\n    pass\nelse:\n    pass\nelse:\n    pass\n"),
            Err(SyntaxError::DanglingElse { .. })
        );
    }

    #[test]
    fn test_comments_are_ignored() {
        let keywords = KeywordTrie::with_default_keywords();
        let tokens = crate::lexical::Tokenizer::new("if a: // why\n    pass\n", &keywords)
            .keep_comments(true)
            .tokenize()
            .unwrap();
        assert_eq!(GrammarValidator.validate(&tokens), Ok(()));
    }
}
