//! Shunting-yard compilation of infix token runs into postfix text
//!
//! Operands are written as `[text]`, operators as their own text, so
//! `(a+b)*c` becomes `[a][b]+[c]*`. Calls inside an expression are written
//! after their arguments as `name(argc)`.

use crate::config::compile_time::ir::MAX_EXPRESSION_TOKENS;
use crate::ir::error::IrError;
use crate::ir::labels::LabelTable;
use crate::tokens::{Token, TokenKind, TokenStream};

/// Where an expression stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionMode {
    /// Newline, `;`, `:` or a layout token
    Statement,
    /// Additionally a top-level `,` or `)`
    Argument,
}

const UNARY_PRECEDENCE: u8 = 3;

/// Binary operator precedence; anything not listed binds loosest
pub fn precedence(operator: &str) -> u8 {
    match operator {
        "*" | "/" => 2,
        "+" | "-" => 1,
        _ => 0,
    }
}

/// Operators that only make sense at statement level
fn is_assignment_operator(text: &str) -> bool {
    matches!(
        text,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "++" | "--" | "," | "." | ";" | ":"
    )
}

#[derive(Debug)]
enum StackEntry {
    Paren,
    Operator { text: String, precedence: u8 },
}

pub struct ExpressionCompiler<'l> {
    labels: &'l LabelTable,
}

impl<'l> ExpressionCompiler<'l> {
    /// `labels` decides which calls inside expressions are resolvable
    pub fn new(labels: &'l LabelTable) -> Self {
        Self { labels }
    }

    /// Compile from the current token up to, not including, the terminator
    pub fn compile(
        &self,
        stream: &mut TokenStream<'_>,
        mode: ExpressionMode,
    ) -> Result<String, IrError> {
        let line = stream.line();
        let mut output = String::new();
        let mut stack: Vec<StackEntry> = Vec::new();
        let mut expect_operand = true;
        let mut open_parens = 0usize;
        let mut consumed = 0usize;

        while let Some(token) = stream.current() {
            if token.is_expression_terminator() {
                break;
            }
            if mode == ExpressionMode::Argument
                && open_parens == 0
                && (token.is_operator(",") || token.is_bracket(")"))
            {
                break;
            }

            consumed += 1;
            if consumed > MAX_EXPRESSION_TOKENS {
                return Err(IrError::ExpressionTooLong { line });
            }

            match token.kind {
                TokenKind::Identifier | TokenKind::Number | TokenKind::String => {
                    if !expect_operand {
                        return Err(malformed(token));
                    }
                    stream.advance();
                    if token.kind == TokenKind::Identifier
                        && stream.current().is_some_and(|t| t.is_bracket("("))
                    {
                        self.compile_call_operand(token, stream, &mut output)?;
                    } else {
                        push_operand(&mut output, &token.text);
                    }
                    expect_operand = false;
                }
                TokenKind::Keyword => match token.text.as_str() {
                    "true" | "false" => {
                        if !expect_operand {
                            return Err(malformed(token));
                        }
                        stream.advance();
                        push_operand(&mut output, &token.text);
                        expect_operand = false;
                    }
                    "not" if expect_operand => {
                        stream.advance();
                        push_unary(&mut stack, "not");
                    }
                    "and" | "or" if !expect_operand => {
                        stream.advance();
                        push_binary(&mut stack, &mut output, &token.text);
                        expect_operand = true;
                    }
                    "and" | "or" | "not" => return Err(malformed(token)),
                    _ => {
                        return Err(IrError::UnexpectedKeyword {
                            keyword: token.text.clone(),
                            line: token.line,
                        })
                    }
                },
                TokenKind::Bracket => match token.text.as_str() {
                    "(" => {
                        if !expect_operand {
                            return Err(malformed(token));
                        }
                        stream.advance();
                        stack.push(StackEntry::Paren);
                        open_parens += 1;
                    }
                    ")" => {
                        if expect_operand {
                            return Err(malformed(token));
                        }
                        stream.advance();
                        if pop_to_paren(&mut stack, &mut output) {
                            open_parens -= 1;
                        }
                    }
                    _ => return Err(malformed(token)),
                },
                TokenKind::Operator | TokenKind::RelOp => {
                    let text = token.text.as_str();
                    if is_assignment_operator(text) {
                        return Err(malformed(token));
                    }
                    stream.advance();
                    if expect_operand {
                        match text {
                            "-" => push_unary(&mut stack, "neg"),
                            "+" => {}
                            "!" | "~" => push_unary(&mut stack, text),
                            _ => return Err(malformed(token)),
                        }
                    } else {
                        push_binary(&mut stack, &mut output, text);
                        expect_operand = true;
                    }
                }
                _ => return Err(malformed(token)),
            }
        }

        if consumed == 0 {
            return Err(IrError::EmptyExpression { line });
        }
        if expect_operand {
            let found = stream
                .current()
                .map(Token::describe)
                .unwrap_or_else(|| "end of input".to_string());
            return Err(IrError::MalformedExpression { text: found, line });
        }

        while let Some(entry) = stack.pop() {
            if let StackEntry::Operator { text, .. } = entry {
                output.push_str(&text);
            }
        }

        Ok(output)
    }

    /// Parenthesized, comma-separated argument list starting at `(`.
    /// Each argument is compiled separately.
    pub fn compile_arguments(&self, stream: &mut TokenStream<'_>) -> Result<Vec<String>, IrError> {
        let line = stream.line();
        if stream.advance_if(|t| t.is_bracket("(")).is_none() {
            return Err(IrError::MalformedExpression {
                text: describe_current(stream),
                line,
            });
        }

        let mut arguments = Vec::new();
        if stream.advance_if(|t| t.is_bracket(")")).is_some() {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.compile(stream, ExpressionMode::Argument)?);

            match stream.current() {
                Some(t) if t.is_operator(",") => {
                    stream.advance();
                }
                Some(t) if t.is_bracket(")") => {
                    stream.advance();
                    return Ok(arguments);
                }
                _ => {
                    return Err(IrError::MalformedExpression {
                        text: describe_current(stream),
                        line: stream.line(),
                    })
                }
            }
        }
    }

    fn compile_call_operand(
        &self,
        name: &Token,
        stream: &mut TokenStream<'_>,
        output: &mut String,
    ) -> Result<(), IrError> {
        if !self.labels.contains(&name.text) {
            return Err(IrError::UnresolvedCall {
                name: name.text.clone(),
                line: name.line,
            });
        }

        let arguments = self.compile_arguments(stream)?;
        for argument in &arguments {
            output.push_str(argument);
        }
        output.push_str(&format!("{}({})", name.text, arguments.len()));
        Ok(())
    }
}

fn push_operand(output: &mut String, text: &str) {
    output.push('[');
    output.push_str(text);
    output.push(']');
}

fn push_unary(stack: &mut Vec<StackEntry>, text: &str) {
    stack.push(StackEntry::Operator {
        text: text.to_string(),
        precedence: UNARY_PRECEDENCE,
    });
}

fn push_binary(stack: &mut Vec<StackEntry>, output: &mut String, text: &str) {
    let incoming = precedence(text);
    while let Some(StackEntry::Operator { precedence, .. }) = stack.last() {
        if *precedence < incoming {
            break;
        }
        if let Some(StackEntry::Operator { text, .. }) = stack.pop() {
            output.push_str(&text);
        }
    }
    stack.push(StackEntry::Operator {
        text: text.to_string(),
        precedence: incoming,
    });
}

/// Pop operators to the nearest `(`. A `)` without one is dropped and
/// `false` is returned.
fn pop_to_paren(stack: &mut Vec<StackEntry>, output: &mut String) -> bool {
    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Paren => return true,
            StackEntry::Operator { text, .. } => output.push_str(&text),
        }
    }
    false
}

fn malformed(token: &Token) -> IrError {
    IrError::MalformedExpression {
        text: token.text.clone(),
        line: token.line,
    }
}

fn describe_current(stream: &TokenStream<'_>) -> String {
    stream
        .current()
        .map(Token::describe)
        .unwrap_or_else(|| "end of input".to_string())
}
