//! Scope and literal-type checks over the token sequence
//!
//! Keeps its own scope stack: Indent opens a scope, Dedent closes it.
//! Parameters and loop variables are declared into the scope their block
//! opens. Function names are collected up front so calls may precede
//! definitions here; the IR builder decides whether that is lowerable.

use crate::config::compile_time::semantic::MAX_SCOPE_DEPTH;
use crate::semantic::error::{SemanticError, SemanticResult};
use crate::semantic::scope::{DeclareError, ScopeStack, Symbol, SymbolKind};
use crate::tokens::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const TYPE_NAMES: &[&str] = &["int", "float", "string", "bool"];

/// A read-only pass producing a summary or the first semantic error
pub trait TokenChecker {
    fn name(&self) -> &'static str;
    fn check(&self, tokens: &[Token]) -> SemanticResult<CheckSummary>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub functions: Vec<String>,
    pub symbols_declared: usize,
    pub max_scope_depth: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ScopeChecker {
    check_literal_types: bool,
}

impl Default for ScopeChecker {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ScopeChecker {
    pub fn new(check_literal_types: bool) -> Self {
        Self {
            check_literal_types,
        }
    }
}

impl TokenChecker for ScopeChecker {
    fn name(&self) -> &'static str {
        "scope"
    }

    fn check(&self, tokens: &[Token]) -> SemanticResult<CheckSummary> {
        let significant: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        ScopeWalk::new(&significant, self.check_literal_types).run()
    }
}

fn is_assignment(token: &Token) -> bool {
    token.kind == TokenKind::Operator
        && matches!(
            token.text.as_str(),
            "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "++" | "--"
        )
}

fn is_statement_end(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Newline
            | TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::EndOfCode
            | TokenKind::EndOfStream
    ) || token.is_operator(";")
}

/// Literal category of a single-token initializer
fn literal_type(token: &Token) -> Option<&'static str> {
    match token.kind {
        TokenKind::Number => Some("number"),
        TokenKind::String => Some("string"),
        TokenKind::Keyword if token.text == "true" || token.text == "false" => Some("bool"),
        _ => None,
    }
}

fn literal_fits(declared: &str, literal: &str) -> bool {
    match declared {
        "int" | "float" => literal == "number",
        "string" => literal == "string",
        "bool" => literal == "bool",
        _ => true,
    }
}

struct ScopeWalk<'t> {
    tokens: &'t [&'t Token],
    functions: BTreeSet<String>,
    scopes: ScopeStack,
    /// Declared into the next scope opened
    pending: Vec<Symbol>,
    /// Declared at the end of the current statement, after its right-hand side
    deferred: Option<Symbol>,
    check_literal_types: bool,
    max_depth: usize,
}

impl<'t> ScopeWalk<'t> {
    fn new(tokens: &'t [&'t Token], check_literal_types: bool) -> Self {
        Self {
            tokens,
            functions: BTreeSet::new(),
            scopes: ScopeStack::new(),
            pending: Vec::new(),
            deferred: None,
            check_literal_types,
            max_depth: 0,
        }
    }

    fn token(&self, index: usize) -> Option<&'t Token> {
        self.tokens.get(index).copied()
    }

    fn collect_functions(&mut self) {
        for pair in self.tokens.windows(2) {
            if pair[0].is_keyword("def") && pair[1].kind == TokenKind::Identifier {
                self.functions.insert(pair[1].text.clone());
            }
        }
    }

    fn run(mut self) -> SemanticResult<CheckSummary> {
        self.collect_functions();

        let mut index = 0;
        let mut at_statement_start = true;

        while let Some(token) = self.token(index) {
            if is_statement_end(token) {
                self.flush_deferred()?;
            }

            match token.kind {
                TokenKind::Newline => at_statement_start = true,
                TokenKind::Indent => {
                    self.open_scope(token)?;
                    at_statement_start = true;
                }
                TokenKind::Dedent => {
                    self.scopes.pop();
                    at_statement_start = true;
                }
                TokenKind::EndOfCode | TokenKind::EndOfStream => break,
                _ if token.is_operator(";") => at_statement_start = true,
                _ if at_statement_start => {
                    at_statement_start = false;
                    index = self.statement(index, token)?;
                    continue;
                }
                TokenKind::Identifier => self.use_name(token)?,
                _ => {}
            }
            index += 1;
        }

        self.flush_deferred()?;

        Ok(CheckSummary {
            functions: self.functions.into_iter().collect(),
            symbols_declared: self.scopes.declared_total(),
            max_scope_depth: self.max_depth,
        })
    }

    fn open_scope(&mut self, at: &Token) -> SemanticResult<()> {
        self.scopes.push();
        let depth = self.scopes.depth();
        if depth > MAX_SCOPE_DEPTH {
            return Err(SemanticError::ScopeTooDeep {
                depth,
                line: at.line,
            });
        }
        self.max_depth = self.max_depth.max(depth);

        for symbol in std::mem::take(&mut self.pending) {
            self.declare(symbol)?;
        }
        Ok(())
    }

    fn declare(&mut self, symbol: Symbol) -> SemanticResult<()> {
        let (name, line) = (symbol.name.clone(), symbol.line);
        match self.scopes.declare(symbol) {
            Ok(()) => Ok(()),
            Err(DeclareError::AlreadyDeclared) => Err(SemanticError::Redeclaration { name, line }),
            Err(DeclareError::ScopeFull) => Err(SemanticError::TooManySymbols { line }),
        }
    }

    fn flush_deferred(&mut self) -> SemanticResult<()> {
        match self.deferred.take() {
            Some(symbol) => self.declare(symbol),
            None => Ok(()),
        }
    }

    fn use_name(&self, token: &Token) -> SemanticResult<()> {
        if self.scopes.lookup(&token.text).is_some() || self.functions.contains(&token.text) {
            return Ok(());
        }
        Err(SemanticError::UndeclaredVariable {
            name: token.text.clone(),
            line: token.line,
        })
    }

    /// A name position that must not hold a keyword
    fn name_at(&self, index: usize) -> SemanticResult<Option<&'t Token>> {
        match self.token(index) {
            Some(t) if t.kind == TokenKind::Identifier => Ok(Some(t)),
            Some(t) if t.kind == TokenKind::Keyword && !TYPE_NAMES.contains(&t.text.as_str()) => {
                Err(SemanticError::KeywordAsName {
                    keyword: t.text.clone(),
                    line: t.line,
                })
            }
            _ => Ok(None),
        }
    }

    /// Handle the statement starting at `index`; returns where the main
    /// walk resumes. Tokens after that point are checked as plain uses.
    fn statement(&mut self, index: usize, token: &'t Token) -> SemanticResult<usize> {
        match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "def" => self.function_header(index),
                "for" => {
                    if let Some(variable) = self.name_at(index + 1)? {
                        self.pending.push(Symbol {
                            name: variable.text.clone(),
                            kind: SymbolKind::LoopVariable,
                            line: variable.line,
                        });
                        return Ok(index + 2);
                    }
                    Ok(index + 1)
                }
                word if TYPE_NAMES.contains(&word) => self.declaration(index, token),
                _ => {
                    if self.token(index + 1).is_some_and(is_assignment) {
                        return Err(SemanticError::KeywordAsName {
                            keyword: token.text.clone(),
                            line: token.line,
                        });
                    }
                    Ok(index + 1)
                }
            },
            TokenKind::Identifier => match self.token(index + 1) {
                Some(operator) if is_assignment(operator) => {
                    self.assignment(token, operator)?;
                    Ok(index + 2)
                }
                _ => Ok(index),
            },
            _ => Ok(index),
        }
    }

    /// `def name(params)`: the name goes in the current scope, the
    /// parameters in the body's scope.
    fn function_header(&mut self, index: usize) -> SemanticResult<usize> {
        let Some(name) = self.name_at(index + 1)? else {
            return Ok(index + 1);
        };
        self.declare(Symbol {
            name: name.text.clone(),
            kind: SymbolKind::Function,
            line: name.line,
        })?;

        let mut at = index + 2;
        if !self.token(at).is_some_and(|t| t.is_bracket("(")) {
            return Ok(at);
        }
        at += 1;

        let mut parameters: Vec<Symbol> = Vec::new();
        while let Some(token) = self.token(at) {
            if token.is_bracket(")") || is_statement_end(token) {
                break;
            }
            if let Some(parameter) = self.name_at(at)? {
                if parameters.iter().any(|p| p.name == parameter.text) {
                    return Err(SemanticError::Redeclaration {
                        name: parameter.text.clone(),
                        line: parameter.line,
                    });
                }
                parameters.push(Symbol {
                    name: parameter.text.clone(),
                    kind: SymbolKind::Parameter,
                    line: parameter.line,
                });
            }
            at += 1;
        }

        self.pending.extend(parameters);
        Ok(at)
    }

    /// `type name [= init]`; the name is declared after the initializer
    fn declaration(&mut self, index: usize, type_token: &Token) -> SemanticResult<usize> {
        let Some(name) = self.name_at(index + 1)? else {
            return Ok(index + 1);
        };
        if self.scopes.declared_here(&name.text) {
            return Err(SemanticError::Redeclaration {
                name: name.text.clone(),
                line: name.line,
            });
        }

        let initializer = index + 3;
        let has_initializer = self.token(index + 2).is_some_and(|t| t.is_operator("="));
        if has_initializer && self.check_literal_types {
            let single = self.token(initializer + 1).map_or(true, is_statement_end);
            if let (Some(value), true) = (self.token(initializer), single) {
                if let Some(found) = literal_type(value) {
                    if !literal_fits(&type_token.text, found) {
                        return Err(SemanticError::TypeMismatch {
                            name: name.text.clone(),
                            declared: type_token.text.clone(),
                            found,
                            line: value.line,
                        });
                    }
                }
            }
        }

        self.deferred = Some(Symbol {
            name: name.text.clone(),
            kind: SymbolKind::Typed(type_token.text.clone()),
            line: name.line,
        });
        Ok(if has_initializer { initializer } else { index + 2 })
    }

    fn assignment(&mut self, target: &Token, operator: &Token) -> SemanticResult<()> {
        if self.functions.contains(&target.text)
            && self
                .scopes
                .lookup(&target.text)
                .map_or(true, |s| s.kind == SymbolKind::Function)
        {
            return Err(SemanticError::AssignmentToFunction {
                name: target.text.clone(),
                line: target.line,
            });
        }

        if operator.text == "=" {
            if self.scopes.lookup(&target.text).is_none() {
                self.deferred = Some(Symbol {
                    name: target.text.clone(),
                    kind: SymbolKind::Variable,
                    line: target.line,
                });
            }
            Ok(())
        } else {
            self.use_name(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::{tokenize, KeywordTrie};
    use assert_matches::assert_matches;

    fn check(source: &str) -> SemanticResult<CheckSummary> {
        let tokens = tokenize(source, &KeywordTrie::with_default_keywords()).unwrap();
        ScopeChecker::default().check(&tokens)
    }

    #[test]
    fn test_valid_program() {
        let source = "\
int x = 1;
def inc(int a):
    int b = a + 1
    return b
while (x < 3):
    print(x);
    x = inc(x)
for i in range(0, x):
    total = i
";
        let summary = check(source).unwrap();
        assert_eq!(summary.functions, vec!["inc"]);
        assert_eq!(summary.max_scope_depth, 1);
    }

    #[test]
    fn test_undeclared_variable() {
        assert_matches!(
            check("x = y + 1\n"),
            Err(SemanticError::UndeclaredVariable { name, line: 1 }) if name == "y"
        );
        assert_matches!(
            check("x = x + 1\n"),
            Err(SemanticError::UndeclaredVariable { name, .. }) if name == "x"
        );
        assert_matches!(
            check("count += 1\n"),
            Err(SemanticError::UndeclaredVariable { .. })
        );
    }

    #[test]
    fn test_scopes_close_on_dedent() {
        assert_matches!(
            check("if true:\n    int t = 1\nprint(t)\n"),
            Err(SemanticError::UndeclaredVariable { name, line: 3 }) if name == "t"
        );
        assert_matches!(
            check("def f(p):\n    pass\nprint(p)\n"),
            Err(SemanticError::UndeclaredVariable { name, .. }) if name == "p"
        );
    }

    #[test]
    fn test_redeclaration() {
        assert_matches!(
            check("int x = 1\nint x = 2\n"),
            Err(SemanticError::Redeclaration { name, line: 2 }) if name == "x"
        );
        assert_matches!(
            check("def f(a, a):\n    pass\n"),
            Err(SemanticError::Redeclaration { .. })
        );
        // Shadowing in an inner scope is allowed
        assert!(check("int x = 1\nif x:\n    int x = 2\n").is_ok());
    }

    #[test]
    fn test_keyword_as_name() {
        assert_matches!(
            check("int while = 1\n"),
            Err(SemanticError::KeywordAsName { keyword, .. }) if keyword == "while"
        );
        assert_matches!(
            check("print = 3\n"),
            Err(SemanticError::KeywordAsName { keyword, .. }) if keyword == "print"
        );
    }

    #[test]
    fn test_assignment_to_function() {
        assert_matches!(
            check("def f():\n    pass\nf = 1\n"),
            Err(SemanticError::AssignmentToFunction { name, line: 3 }) if name == "f"
        );
    }

    #[test]
    fn test_forward_call_passes_checker() {
        assert!(check("g()\ndef g():\n    pass\n").is_ok());
    }

    #[test]
    fn test_literal_type_mismatch() {
        assert_matches!(
            check("int n = \"five\"\n"),
            Err(SemanticError::TypeMismatch { declared, found: "string", .. }) if declared == "int"
        );
        assert_matches!(
            check("string s = 5\n"),
            Err(SemanticError::TypeMismatch { found: "number", .. })
        );
        assert_matches!(
            check("bool b = 1\n"),
            Err(SemanticError::TypeMismatch { .. })
        );
        assert!(check("float f = 2.5\nbool b = true\nstring s = \"x\"\n").is_ok());

        let tokens = tokenize("int n = \"five\"\n", &KeywordTrie::with_default_keywords()).unwrap();
        assert!(ScopeChecker::new(false).check(&tokens).is_ok());
    }
}
