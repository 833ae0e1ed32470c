//! Single forward pass from tokens to a flat, label-based instruction list
//!
//! Every construct binds its labels at the point their target becomes
//! known, so the label table never needs backpatching. Block extent comes
//! from Indent/Dedent balance alone.

use crate::config::compile_time::ir::*;
use crate::ir::error::IrError;
use crate::ir::expression::{ExpressionCompiler, ExpressionMode};
use crate::ir::instruction::Instruction;
use crate::ir::labels::{LabelGenerator, LabelTable};
use crate::ir::{Declaration, IrProgram};
use crate::tokens::{Token, TokenKind, TokenStream};

/// Type names accepted in declarations and parameter lists
pub const TYPE_KEYWORDS: &[&str] = &["int", "float", "string", "bool"];

/// Statement dispatch tag, decided from the first token (and the one after
/// it for identifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    If,
    While,
    For,
    FunctionDef,
    Return,
    Print,
    Pass,
    Declaration,
    Assignment,
    Call,
    Expression,
}

pub struct IrBuilder<'a> {
    stream: TokenStream<'a>,
    instructions: Vec<Instruction>,
    labels: LabelTable,
    declarations: Vec<Declaration>,
    label_ids: LabelGenerator,
    /// End label of the innermost function being lowered
    function_end: Option<String>,
    block_depth: usize,
}

impl<'a> IrBuilder<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            instructions: Vec::new(),
            labels: LabelTable::new(),
            declarations: Vec::new(),
            label_ids: LabelGenerator::new(),
            function_end: None,
            block_depth: 0,
        }
    }

    pub fn build(mut self) -> Result<IrProgram, IrError> {
        loop {
            self.stream.skip_separators();
            if self.stream.is_at_end() {
                break;
            }
            let kind = self.classify()?;
            self.compile_statement(kind)?;
        }

        Ok(IrProgram {
            instructions: self.instructions,
            labels: self.labels,
            declarations: self.declarations,
        })
    }

    fn current(&self) -> Result<&'a Token, IrError> {
        self.stream.current().ok_or_else(|| IrError::UnexpectedToken {
            found: "end of input".to_string(),
            line: self.stream.line(),
        })
    }

    fn current_is_keyword(&self, word: &str) -> bool {
        self.stream.current().is_some_and(|t| t.is_keyword(word))
    }

    pub fn classify(&self) -> Result<StatementKind, IrError> {
        let token = self.current()?;
        match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "if" => Ok(StatementKind::If),
                "while" => Ok(StatementKind::While),
                "for" => Ok(StatementKind::For),
                "def" => Ok(StatementKind::FunctionDef),
                "return" => Ok(StatementKind::Return),
                "print" => Ok(StatementKind::Print),
                "pass" => Ok(StatementKind::Pass),
                "true" | "false" | "not" => Ok(StatementKind::Expression),
                word if TYPE_KEYWORDS.contains(&word) => Ok(StatementKind::Declaration),
                word => Err(IrError::UnexpectedKeyword {
                    keyword: word.to_string(),
                    line: token.line,
                }),
            },
            TokenKind::Identifier => match self.stream.peek() {
                Some(next) if next.is_bracket("(") && self.call_ends_statement() => {
                    Ok(StatementKind::Call)
                }
                Some(next) if next.kind == TokenKind::Operator && is_assignment(&next.text) => {
                    Ok(StatementKind::Assignment)
                }
                _ => Ok(StatementKind::Expression),
            },
            TokenKind::Number | TokenKind::String | TokenKind::Operator => {
                Ok(StatementKind::Expression)
            }
            TokenKind::Bracket if token.text == "(" => Ok(StatementKind::Expression),
            _ => Err(IrError::UnexpectedToken {
                found: token.describe(),
                line: token.line,
            }),
        }
    }

    /// Whether the `name(...)` at the cursor is the whole statement.
    /// An unclosed call counts, so `compile_call` reports it.
    fn call_ends_statement(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 1;
        while let Some(token) = self.stream.peek_ahead(offset) {
            if token.is_bracket("(") {
                depth += 1;
            } else if token.is_bracket(")") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return self
                        .stream
                        .peek_ahead(offset + 1)
                        .map_or(true, Token::is_expression_terminator);
                }
            } else if token.is_expression_terminator() {
                return true;
            }
            offset += 1;
        }
        true
    }

    pub fn compile_statement(&mut self, kind: StatementKind) -> Result<(), IrError> {
        match kind {
            StatementKind::If => self.compile_if(),
            StatementKind::While => self.compile_while(),
            StatementKind::For => self.compile_for(),
            StatementKind::FunctionDef => self.compile_function(),
            StatementKind::Return => self.compile_return(),
            StatementKind::Print => self.compile_print(),
            StatementKind::Pass => {
                self.stream.advance();
                self.end_statement()
            }
            StatementKind::Declaration => self.compile_declaration(),
            StatementKind::Assignment => self.compile_assignment(),
            StatementKind::Call => self.compile_call(),
            StatementKind::Expression => {
                let postfix = self.expression(ExpressionMode::Statement)?;
                self.emit(Instruction::expression(postfix))?;
                self.end_statement()
            }
        }
    }

    // ------------------------------------------------------------------
    // emission
    // ------------------------------------------------------------------

    fn emit(&mut self, instruction: Instruction) -> Result<usize, IrError> {
        if self.instructions.len() >= MAX_INSTRUCTIONS {
            return Err(IrError::InstructionLimit {
                line: self.stream.line(),
            });
        }
        self.instructions.push(instruction);
        Ok(self.instructions.len() - 1)
    }

    /// Emit a Label cell and bind its name to the cell's index
    fn bind_label(&mut self, name: &str) -> Result<(), IrError> {
        let index = self.emit(Instruction::label(name))?;
        self.labels.insert(name, index);
        Ok(())
    }

    fn expression(&mut self, mode: ExpressionMode) -> Result<String, IrError> {
        ExpressionCompiler::new(&self.labels).compile(&mut self.stream, mode)
    }

    fn arguments(&mut self) -> Result<Vec<String>, IrError> {
        ExpressionCompiler::new(&self.labels).compile_arguments(&mut self.stream)
    }

    // ------------------------------------------------------------------
    // token expectations
    // ------------------------------------------------------------------

    fn malformed_header(&self, construct: &'static str, expected: &'static str) -> IrError {
        IrError::MalformedHeader {
            construct,
            expected,
            found: self
                .stream
                .current()
                .map(Token::describe)
                .unwrap_or_else(|| "end of input".to_string()),
            line: self.stream.line(),
        }
    }

    fn expect_identifier(
        &mut self,
        construct: &'static str,
        expected: &'static str,
    ) -> Result<&'a Token, IrError> {
        self.stream
            .advance_if(|t| t.kind == TokenKind::Identifier)
            .ok_or_else(|| self.malformed_header(construct, expected))
    }

    fn expect(
        &mut self,
        pred: impl Fn(&Token) -> bool,
        construct: &'static str,
        expected: &'static str,
    ) -> Result<(), IrError> {
        match self.stream.advance_if(pred) {
            Some(_) => Ok(()),
            None => Err(self.malformed_header(construct, expected)),
        }
    }

    /// Optional `;`, then a line break or the end of the enclosing block
    fn end_statement(&mut self) -> Result<(), IrError> {
        let had_semicolon = self.stream.advance_if(|t| t.is_operator(";")).is_some();
        match self.stream.current_kind() {
            TokenKind::Newline => {
                self.stream.advance();
                Ok(())
            }
            TokenKind::Dedent | TokenKind::EndOfCode | TokenKind::EndOfStream => Ok(()),
            _ if had_semicolon => Ok(()),
            _ => {
                let token = self.current()?;
                Err(IrError::UnexpectedToken {
                    found: token.describe(),
                    line: token.line,
                })
            }
        }
    }

    /// `:` Newline Indent, statements, Dedent
    fn compile_block(&mut self, construct: &'static str) -> Result<(), IrError> {
        self.expect(|t| t.is_operator(":"), construct, "':'")?;
        self.expect(|t| t.kind == TokenKind::Newline, construct, "a line break after ':'")?;
        self.stream.skip_separators();
        self.expect(|t| t.kind == TokenKind::Indent, construct, "an indented block")?;

        self.block_depth += 1;
        if self.block_depth > MAX_BLOCK_DEPTH {
            return Err(IrError::BlockTooDeep {
                depth: self.block_depth,
                line: self.stream.line(),
            });
        }

        loop {
            self.stream.skip_separators();
            match self.stream.current_kind() {
                TokenKind::Dedent => {
                    self.stream.advance();
                    break;
                }
                TokenKind::EndOfCode | TokenKind::EndOfStream => break,
                _ => {
                    let kind = self.classify()?;
                    self.compile_statement(kind)?;
                }
            }
        }

        self.block_depth -= 1;
        Ok(())
    }

    // ------------------------------------------------------------------
    // control flow
    // ------------------------------------------------------------------

    /// Expression, ConditionalJump(if_false), body, GoTo(if_end),
    /// Label(if_false), repeated per `elif`; then the `else` body and
    /// Label(if_end).
    fn compile_if(&mut self) -> Result<(), IrError> {
        let if_end = LabelGenerator::name("if_end", self.label_ids.next_id());
        self.stream.advance();

        loop {
            let condition = self.expression(ExpressionMode::Statement)?;
            self.emit(Instruction::expression(condition))?;

            let if_false = LabelGenerator::name("if_false", self.label_ids.next_id());
            self.emit(Instruction::conditional_jump(&if_false))?;
            self.compile_block("if")?;
            self.emit(Instruction::goto(&if_end))?;
            self.bind_label(&if_false)?;

            if self.current_is_keyword("elif") {
                self.stream.advance();
                continue;
            }
            if self.current_is_keyword("else") {
                self.stream.advance();
                self.compile_block("else")?;
            }
            break;
        }

        self.bind_label(&if_end)
    }

    fn compile_while(&mut self) -> Result<(), IrError> {
        let id = self.label_ids.next_id();
        let start = LabelGenerator::name("while_start", id);
        let exit = LabelGenerator::name("while_false", id);
        self.stream.advance();

        self.bind_label(&start)?;
        let condition = self.expression(ExpressionMode::Statement)?;
        self.emit(Instruction::expression(condition))?;
        self.emit(Instruction::conditional_jump(&exit))?;
        self.compile_block("while")?;
        self.emit(Instruction::goto(&start))?;
        self.bind_label(&exit)
    }

    /// `for v in range(hi)`, `range(lo, hi)` or `range(lo, hi, step)`
    fn compile_for(&mut self) -> Result<(), IrError> {
        let id = self.label_ids.next_id();
        let start = LabelGenerator::name("start_for", id);
        let exit = LabelGenerator::name("end_for", id);
        self.stream.advance();

        let variable = self.expect_identifier("for", "a loop variable")?;
        self.expect(|t| t.is_keyword("in"), "for", "'in'")?;
        self.expect(|t| t.is_keyword("range"), "for", "'range'")?;
        if !self.stream.current().is_some_and(|t| t.is_bracket("(")) {
            return Err(self.malformed_header("for", "'(' after range"));
        }
        let bounds = self.arguments()?;
        let (low, high, step) = match bounds.as_slice() {
            [high] => ("[0]".to_string(), high.clone(), "[1]".to_string()),
            [low, high] => (low.clone(), high.clone(), "[1]".to_string()),
            [low, high, step] => (low.clone(), high.clone(), step.clone()),
            _ => {
                return Err(IrError::MalformedHeader {
                    construct: "for",
                    expected: "one to three range arguments",
                    found: format!("{} arguments", bounds.len()),
                    line: variable.line,
                })
            }
        };
        let name = variable.text.as_str();

        self.emit(Instruction::variable_ref(name))?;
        self.emit(Instruction::expression(low))?;
        self.emit(Instruction::expression("="))?;

        self.bind_label(&start)?;
        self.emit(Instruction::expression(format!("[{name}]{high}<")))?;
        self.emit(Instruction::conditional_jump(&exit))?;
        self.compile_block("for")?;

        self.emit(Instruction::variable_ref(name))?;
        self.emit(Instruction::expression(format!("[{name}]{step}+")))?;
        self.emit(Instruction::expression("="))?;
        self.emit(Instruction::goto(&start))?;
        self.bind_label(&exit)
    }

    /// The function name is bound to its FunctionEntry index before the
    /// body is lowered, which makes recursion resolvable.
    fn compile_function(&mut self) -> Result<(), IrError> {
        let end = LabelGenerator::name("end_func", self.label_ids.next_id());
        self.stream.advance();

        let name = self.expect_identifier("def", "a function name")?;
        if self.labels.contains(&name.text) {
            return Err(IrError::DuplicateFunction {
                name: name.text.clone(),
                line: name.line,
            });
        }
        let entry = self.emit(Instruction::function_entry(&name.text))?;
        self.labels.insert(&name.text, entry);

        self.expect(|t| t.is_bracket("("), "def", "'(' after the function name")?;
        let mut parameters: Vec<&'a Token> = Vec::new();
        if self.stream.advance_if(|t| t.is_bracket(")")).is_none() {
            loop {
                // Optional type annotation
                self.stream.advance_if(|t| {
                    t.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(&t.text.as_str())
                });
                parameters.push(self.expect_identifier("def", "a parameter name")?);
                if self.stream.advance_if(|t| t.is_operator(",")).is_some() {
                    continue;
                }
                self.expect(|t| t.is_bracket(")"), "def", "',' or ')'")?;
                break;
            }
        }
        for parameter in parameters {
            self.emit(Instruction::variable_ref(&parameter.text))?;
        }

        let enclosing = self.function_end.replace(end.clone());
        let body = self.compile_block("def");
        self.function_end = enclosing;
        body?;

        self.bind_label(&end)
    }

    fn compile_return(&mut self) -> Result<(), IrError> {
        let line = self.stream.line();
        let end = self
            .function_end
            .clone()
            .ok_or(IrError::ReturnOutsideFunction { line })?;
        self.stream.advance();

        let bare = self
            .stream
            .current()
            .map_or(true, Token::is_expression_terminator);
        if !bare {
            let value = self.expression(ExpressionMode::Statement)?;
            self.emit(Instruction::expression(value))?;
        }
        self.emit(Instruction::ret())?;
        self.emit(Instruction::goto(end))?;
        self.end_statement()
    }

    /// Arguments, CallSite, then a GoTo to the callee's entry. Only
    /// functions defined earlier in the source resolve.
    fn compile_call(&mut self) -> Result<(), IrError> {
        let name = self.current()?;
        self.stream.advance();
        if !self.labels.contains(&name.text) {
            return Err(IrError::UnresolvedCall {
                name: name.text.clone(),
                line: name.line,
            });
        }

        for argument in self.arguments()? {
            self.emit(Instruction::expression(argument))?;
        }
        self.emit(Instruction::call_site(&name.text))?;
        self.emit(Instruction::goto(&name.text))?;
        self.end_statement()
    }

    // ------------------------------------------------------------------
    // simple statements
    // ------------------------------------------------------------------

    fn compile_print(&mut self) -> Result<(), IrError> {
        self.stream.advance();
        if !self.stream.current().is_some_and(|t| t.is_bracket("(")) {
            return Err(self.malformed_header("print", "'('"));
        }
        for argument in self.arguments()? {
            self.emit(Instruction::expression(argument))?;
        }
        self.emit(Instruction::expression("print"))?;
        self.end_statement()
    }

    /// Recorded on the program rather than emitted
    fn compile_declaration(&mut self) -> Result<(), IrError> {
        let type_token = self.current()?;
        self.stream.advance();
        let name = self.expect_identifier("declaration", "a variable name")?;

        let initializer = if self.stream.advance_if(|t| t.is_operator("=")).is_some() {
            Some(self.expression(ExpressionMode::Statement)?)
        } else {
            None
        };

        self.declarations.push(Declaration {
            name: name.text.clone(),
            type_name: type_token.text.clone(),
            initializer,
            line: name.line,
        });
        self.end_statement()
    }

    /// `x = e`, `x op= e`, `x++`, `x--`
    fn compile_assignment(&mut self) -> Result<(), IrError> {
        let target = self.current()?;
        self.stream.advance();
        let operator = self.current()?;
        self.stream.advance();

        self.emit(Instruction::variable_ref(&target.text))?;
        if operator.text != "++" && operator.text != "--" {
            let value = self.expression(ExpressionMode::Statement)?;
            self.emit(Instruction::expression(value))?;
        }
        self.emit(Instruction::expression(&operator.text))?;
        self.end_statement()
    }
}

fn is_assignment(text: &str) -> bool {
    matches!(
        text,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "++" | "--"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::InstructionKind;
    use crate::lexical::{tokenize, KeywordTrie};
    use assert_matches::assert_matches;

    fn build(source: &str) -> Result<IrProgram, IrError> {
        let tokens = tokenize(source, &KeywordTrie::with_default_keywords()).unwrap();
        IrBuilder::new(&tokens).build()
    }

    fn listing(program: &IrProgram) -> Vec<String> {
        program.instructions.iter().map(|i| i.to_string()).collect()
    }

    fn index_of(program: &IrProgram, kind: InstructionKind, payload: &str) -> usize {
        program
            .instructions
            .iter()
            .position(|i| i.is(kind, payload))
            .unwrap_or_else(|| panic!("no {kind} {payload}"))
    }

    #[test]
    fn test_if_else_order() {
        let program = build("if (c):\n    a = 1\nelse:\n    b = 2\n").unwrap();

        assert_eq!(
            listing(&program),
            vec![
                "Math [c]",
                "ConditionalJump if_false#1",
                "Var a",
                "Math [1]",
                "Math =",
                "GoTo if_end#0",
                "Label if_false#1",
                "Var b",
                "Math [2]",
                "Math =",
                "Label if_end#0",
            ]
        );

        let jump = index_of(&program, InstructionKind::ConditionalJump, "if_false#1");
        let target = program.labels.get("if_false#1").unwrap();
        assert_eq!(target, index_of(&program, InstructionKind::Label, "if_false#1"));
        assert!(target > jump);
        assert_eq!(program.labels.get("if_end#0"), Some(10));
    }

    #[test]
    fn test_elif_chain_shares_end_label() {
        let program =
            build("if a:\n    x = 1\nelif b:\n    x = 2\nelif c:\n    x = 3\nelse:\n    x = 4\n")
                .unwrap();

        let ends = program
            .instructions
            .iter()
            .filter(|i| i.is(InstructionKind::GoTo, "if_end#0"))
            .count();
        assert_eq!(ends, 3);

        let false_labels: Vec<&str> = program
            .instructions
            .iter()
            .filter(|i| i.kind == InstructionKind::Label && i.payload.starts_with("if_false"))
            .map(|i| i.payload.as_str())
            .collect();
        assert_eq!(false_labels, vec!["if_false#1", "if_false#2", "if_false#3"]);
        assert!(program.unresolved_labels().is_empty());
    }

    #[test]
    fn test_while_label_order() {
        let program = build("while (x < 3):\n    x = x + 1\n").unwrap();

        let start = index_of(&program, InstructionKind::Label, "while_start#0");
        let back = index_of(&program, InstructionKind::GoTo, "while_start#0");
        let exit = index_of(&program, InstructionKind::Label, "while_false#0");
        let jump = index_of(&program, InstructionKind::ConditionalJump, "while_false#0");
        let body = index_of(&program, InstructionKind::VariableRef, "x");

        assert!(start < back);
        assert!(start < exit);
        assert!(jump < body);
        assert_eq!(program.instructions[start + 1].payload, "[x][3]<");
    }

    #[test]
    fn test_end_to_end_while_program() {
        let source = "int x = 1;\nwhile (x < 3):\n    print(x);\n    x = x + 1;\n";
        let program = build(source).unwrap();

        let count = |kind: InstructionKind, payload: &str| {
            program
                .instructions
                .iter()
                .filter(|i| i.is(kind, payload))
                .count()
        };
        assert_eq!(count(InstructionKind::Label, "while_start#0"), 1);
        assert_eq!(count(InstructionKind::Label, "while_false#0"), 1);
        assert_eq!(count(InstructionKind::ConditionalJump, "while_false#0"), 1);
        assert_eq!(count(InstructionKind::GoTo, "while_start#0"), 1);
        assert_eq!(program.labels.get("while_start#0"), Some(0));

        assert_eq!(program.declarations.len(), 1);
        assert_eq!(program.declarations[0].name, "x");
        assert_eq!(program.declarations[0].type_name, "int");
        assert_eq!(program.declarations[0].initializer.as_deref(), Some("[1]"));
    }

    #[test]
    fn test_nested_loops_get_distinct_labels() {
        let program =
            build("while a:\n    while b:\n        pass\nwhile c:\n    pass\n").unwrap();

        for id in 0..3 {
            assert!(program.labels.contains(&format!("while_start#{id}")));
            assert!(program.labels.contains(&format!("while_false#{id}")));
        }
        assert_eq!(program.labels.len(), 6);
        assert!(program.unresolved_labels().is_empty());
    }

    #[test]
    fn test_for_range() {
        let program = build("for i in range(1, n):\n    print(i)\n").unwrap();

        assert_eq!(
            listing(&program),
            vec![
                "Var i",
                "Math [1]",
                "Math =",
                "Label start_for#0",
                "Math [i][n]<",
                "ConditionalJump end_for#0",
                "Math [i]",
                "Math print",
                "Var i",
                "Math [i][1]+",
                "Math =",
                "GoTo start_for#0",
                "Label end_for#0",
            ]
        );
    }

    #[test]
    fn test_for_single_bound_starts_at_zero() {
        let program = build("for i in range(10):\n    pass\n").unwrap();
        assert_eq!(program.instructions[1].payload, "[0]");
        assert_eq!(program.instructions[4].payload, "[i][10]<");
    }

    #[test]
    fn test_malformed_for_header() {
        assert_matches!(
            build("for i range(3):\n    pass\n"),
            Err(IrError::MalformedHeader { construct: "for", .. })
        );
        assert_matches!(
            build("for i in range():\n    pass\n"),
            Err(IrError::MalformedHeader { construct: "for", .. })
        );
    }

    #[test]
    fn test_function_definition_call_and_return() {
        let source = "def add(a, b):\n    return a + b\nadd(1, 2)\n";
        let program = build(source).unwrap();

        assert_eq!(
            listing(&program),
            vec![
                "Function add",
                "Var a",
                "Var b",
                "Math [a][b]+",
                "Return",
                "GoTo end_func#0",
                "Label end_func#0",
                "Math [1]",
                "Math [2]",
                "Call add",
                "GoTo add",
            ]
        );
        assert_eq!(program.labels.get("add"), Some(0));
        let call_jump = program.instructions.last().unwrap();
        assert_eq!(program.labels.resolve(call_jump), Some(0));
    }

    #[test]
    fn test_recursive_call_resolves() {
        let source = "def fib(int n):\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\n";
        let program = build(source).unwrap();
        assert!(program
            .instructions
            .iter()
            .any(|i| i.payload == "[n][1]-fib(1)[n][2]-fib(1)+"));
    }

    #[test]
    fn test_bare_return() {
        let program = build("def f():\n    return\n").unwrap();
        assert_eq!(
            listing(&program),
            vec!["Function f", "Return", "GoTo end_func#0", "Label end_func#0"]
        );
    }

    #[test]
    fn test_forward_call_is_unresolved() {
        assert_matches!(
            build("g()\ndef g():\n    pass\n"),
            Err(IrError::UnresolvedCall { name, line: 1 }) if name == "g"
        );
    }

    #[test]
    fn test_duplicate_function() {
        assert_matches!(
            build("def f():\n    pass\ndef f():\n    pass\n"),
            Err(IrError::DuplicateFunction { name, line: 3 }) if name == "f"
        );
    }

    #[test]
    fn test_return_outside_function() {
        assert_matches!(
            build("return 1\n"),
            Err(IrError::ReturnOutsideFunction { line: 1 })
        );
    }

    #[test]
    fn test_empty_condition() {
        assert_matches!(
            build("if :\n    pass\n"),
            Err(IrError::EmptyExpression { line: 1 })
        );
        assert_matches!(build("x = ;\n"), Err(IrError::EmptyExpression { .. }));
    }

    #[test]
    fn test_unexpected_keyword() {
        assert_matches!(
            build("else:\n    pass\n"),
            Err(IrError::UnexpectedKeyword { keyword, .. }) if keyword == "else"
        );
    }

    #[test]
    fn test_missing_block() {
        assert_matches!(
            build("while x:\ny = 1\n"),
            Err(IrError::MalformedHeader { construct: "while", .. })
        );
        assert_matches!(
            build("while x\n    y = 1\n"),
            Err(IrError::MalformedHeader { construct: "while", expected: "':'", .. })
        );
    }

    #[test]
    fn test_assignment_forms() {
        let program = build("x += 2\ny++\nz = -x * 3\n").unwrap();
        assert_eq!(
            listing(&program),
            vec![
                "Var x",
                "Math [2]",
                "Math +=",
                "Var y",
                "Math ++",
                "Var z",
                "Math [x]neg[3]*",
                "Math =",
            ]
        );
    }

    #[test]
    fn test_several_statements_per_line() {
        let program = build("a = 1; b = 2\n").unwrap();
        assert_eq!(program.instructions.len(), 6);
        assert_matches!(build("a = 1 b = 2\n"), Err(IrError::MalformedExpression { .. }));
    }

    #[test]
    fn test_classify() {
        let tokens = tokenize("f(1)", &KeywordTrie::with_default_keywords()).unwrap();
        assert_eq!(IrBuilder::new(&tokens).classify().unwrap(), StatementKind::Call);

        let tokens = tokenize("x = 1", &KeywordTrie::with_default_keywords()).unwrap();
        assert_eq!(
            IrBuilder::new(&tokens).classify().unwrap(),
            StatementKind::Assignment
        );

        let tokens = tokenize("f(g(1)) + 2", &KeywordTrie::with_default_keywords()).unwrap();
        assert_eq!(
            IrBuilder::new(&tokens).classify().unwrap(),
            StatementKind::Expression
        );
    }

    #[test]
    fn test_call_inside_expression_statement() {
        let program = build("def f(a):\n    return a\nf(1) + 2\n").unwrap();
        let last = program.instructions.last().unwrap();
        assert!(last.is(InstructionKind::Expression, "[1]f(1)[2]+"));
    }

    #[test]
    fn test_block_comment_line_leaves_block() {
        let program = build("if a:\n    b = 1\n/* c */ d = 2\n").unwrap();
        let end = index_of(&program, InstructionKind::Label, "if_end#0");
        let b = index_of(&program, InstructionKind::VariableRef, "b");
        let d = index_of(&program, InstructionKind::VariableRef, "d");

        assert!(b < end);
        assert!(d > end);
    }
}
