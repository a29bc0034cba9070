//! vesper_printer: indented text rendering of syntax and bound trees.
//!
//! Debug aids for the CLI's `#showTree`/`#showProgram` toggles and for
//! tests. Every node kind is matched explicitly; adding a node kind breaks
//! the build here, which is the point.

use std::fmt::{self, Write};

use vesper_core::intern::StringInterner;
use vesper_ir::node::{BoundExpression, BoundStatement};
use vesper_syntax::node as syntax;
use vesper_syntax::token::{Token, TokenValue};
use vesper_syntax::SyntaxTree;

const INDENT: &str = "    ";

/// Render a parsed submission as an indented tree.
pub fn write_syntax_tree<W: Write>(
    out: &mut W,
    tree: &SyntaxTree<'_>,
    interner: &StringInterner,
) -> fmt::Result {
    let mut printer = SyntaxPrinter {
        out,
        interner,
        depth: 0,
    };
    for member in tree.root().members {
        printer.member(*member)?;
    }
    Ok(())
}

struct SyntaxPrinter<'p, W> {
    out: &'p mut W,
    interner: &'p StringInterner,
    depth: usize,
}

impl<W: Write> SyntaxPrinter<'_, W> {
    fn line(&mut self, text: &str) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        self.out.write_str(text)?;
        self.out.write_char('\n')
    }

    fn nested<F>(&mut self, header: &str, f: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.line(header)?;
        self.depth += 1;
        f(self)?;
        self.depth -= 1;
        Ok(())
    }

    fn token_text(&self, token: Token) -> String {
        match token.value {
            TokenValue::Int(v) => v.to_string(),
            TokenValue::String(s) => format!("{:?}", self.interner.resolve(s)),
            TokenValue::None => self.interner.resolve(token.text).to_string(),
        }
    }

    fn member(&mut self, member: syntax::Member<'_>) -> fmt::Result {
        match member {
            syntax::Member::Function(declaration) => {
                let mut header = format!(
                    "function {}(",
                    self.interner.resolve(declaration.identifier.text)
                );
                for (i, parameter) in declaration.parameters.iter().enumerate() {
                    if i > 0 {
                        header.push_str(", ");
                    }
                    header.push_str(self.interner.resolve(parameter.identifier.text));
                    header.push_str(": ");
                    header.push_str(self.interner.resolve(parameter.type_clause.identifier.text));
                }
                header.push(')');
                if let Some(clause) = &declaration.type_clause {
                    header.push_str(": ");
                    header.push_str(self.interner.resolve(clause.identifier.text));
                }
                self.nested(&header, |p| {
                    for statement in declaration.body.statements {
                        p.statement(*statement)?;
                    }
                    Ok(())
                })
            }
            syntax::Member::GlobalStatement(global) => self.statement(global.statement),
        }
    }

    fn statement(&mut self, statement: syntax::Statement<'_>) -> fmt::Result {
        match statement {
            syntax::Statement::Block(node) => self.nested("Block", |p| {
                for statement in node.statements {
                    p.statement(*statement)?;
                }
                Ok(())
            }),
            syntax::Statement::Variable(node) => {
                let header = format!(
                    "{} {}",
                    self.interner.resolve(node.keyword.text),
                    self.interner.resolve(node.identifier.text)
                );
                self.nested(&header, |p| p.expression(node.initializer))
            }
            syntax::Statement::If(node) => self.nested("If", |p| {
                p.expression(node.condition)?;
                p.statement(node.then_statement)?;
                if let Some(clause) = &node.else_clause {
                    p.nested("Else", |p| p.statement(clause.else_statement))?;
                }
                Ok(())
            }),
            syntax::Statement::While(node) => self.nested("While", |p| {
                p.expression(node.condition)?;
                p.statement(node.body)
            }),
            syntax::Statement::DoWhile(node) => self.nested("DoWhile", |p| {
                p.statement(node.body)?;
                p.expression(node.condition)
            }),
            syntax::Statement::For(node) => {
                let header = format!("For {}", self.interner.resolve(node.identifier.text));
                self.nested(&header, |p| {
                    p.expression(node.lower_bound)?;
                    p.expression(node.upper_bound)?;
                    p.statement(node.body)
                })
            }
            syntax::Statement::Break(_) => self.line("Break"),
            syntax::Statement::Continue(_) => self.line("Continue"),
            syntax::Statement::Return(node) => self.nested("Return", |p| {
                if let Some(expression) = node.expression {
                    p.expression(expression)?;
                }
                Ok(())
            }),
            syntax::Statement::Expression(node) => self.expression(node.expression),
        }
    }

    fn expression(&mut self, expression: syntax::Expression<'_>) -> fmt::Result {
        match expression {
            syntax::Expression::Literal(node) => {
                let text = self.token_text(node.literal_token);
                self.line(&text)
            }
            syntax::Expression::Name(node) => {
                let text = self.interner.resolve(node.identifier.text).to_string();
                self.line(&text)
            }
            syntax::Expression::Unary(node) => {
                let header =
                    format!("Unary {}", self.interner.resolve(node.operator_token.text));
                self.nested(&header, |p| p.expression(node.operand))
            }
            syntax::Expression::Binary(node) => {
                let header =
                    format!("Binary {}", self.interner.resolve(node.operator_token.text));
                self.nested(&header, |p| {
                    p.expression(node.left)?;
                    p.expression(node.right)
                })
            }
            syntax::Expression::Parenthesized(node) => self.expression(node.expression),
            syntax::Expression::Assignment(node) => {
                let header =
                    format!("Assign {}", self.interner.resolve(node.identifier.text));
                self.nested(&header, |p| p.expression(node.expression))
            }
            syntax::Expression::Call(node) => {
                let header = format!("Call {}", self.interner.resolve(node.identifier.text));
                self.nested(&header, |p| {
                    for argument in node.arguments {
                        p.expression(*argument)?;
                    }
                    Ok(())
                })
            }
        }
    }
}

/// Render a bound statement (structured or lowered) as indented text.
pub fn write_bound_statement<W: Write>(
    out: &mut W,
    statement: BoundStatement<'_>,
    interner: &StringInterner,
) -> fmt::Result {
    let mut printer = BoundPrinter {
        out,
        interner,
        depth: 0,
    };
    printer.statement(statement)
}

struct BoundPrinter<'p, W> {
    out: &'p mut W,
    interner: &'p StringInterner,
    depth: usize,
}

impl<W: Write> BoundPrinter<'_, W> {
    fn line(&mut self, text: &str) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        self.out.write_str(text)?;
        self.out.write_char('\n')
    }

    fn nested<F>(&mut self, header: &str, f: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.line(header)?;
        self.depth += 1;
        f(self)?;
        self.depth -= 1;
        Ok(())
    }

    fn statement(&mut self, statement: BoundStatement<'_>) -> fmt::Result {
        match statement {
            BoundStatement::Block(node) => self.nested("{", |p| {
                for statement in node.statements {
                    p.statement(*statement)?;
                }
                Ok(())
            }),
            BoundStatement::VariableDeclaration(node) => {
                let keyword = if node.variable.read_only { "let" } else { "var" };
                let header = format!(
                    "{} {}: {} =",
                    keyword,
                    self.interner.resolve(node.variable.name),
                    node.variable.ty
                );
                self.nested(&header, |p| p.expression(node.initializer))
            }
            BoundStatement::Expression(node) => self.expression(node.expression),
            BoundStatement::If(node) => self.nested("if", |p| {
                p.expression(node.condition)?;
                p.statement(node.then_statement)?;
                if let Some(else_statement) = node.else_statement {
                    p.nested("else", |p| p.statement(else_statement))?;
                }
                Ok(())
            }),
            BoundStatement::While(node) => self.nested("while", |p| {
                p.expression(node.condition)?;
                p.statement(node.body)
            }),
            BoundStatement::DoWhile(node) => self.nested("do while", |p| {
                p.statement(node.body)?;
                p.expression(node.condition)
            }),
            BoundStatement::For(node) => {
                let header = format!("for {}", self.interner.resolve(node.variable.name));
                self.nested(&header, |p| {
                    p.expression(node.lower_bound)?;
                    p.expression(node.upper_bound)?;
                    p.statement(node.body)
                })
            }
            BoundStatement::Label(node) => self.line(&format!("{}:", node.label)),
            BoundStatement::Goto(node) => self.line(&format!("goto {}", node.label)),
            BoundStatement::ConditionalGoto(node) => {
                let header = format!(
                    "goto {} {}",
                    node.label,
                    if node.jump_if_true { "if" } else { "unless" }
                );
                self.nested(&header, |p| p.expression(node.condition))
            }
            BoundStatement::Return(node) => self.nested("return", |p| {
                if let Some(expression) = node.expression {
                    p.expression(expression)?;
                }
                Ok(())
            }),
            BoundStatement::Nop(_) => self.line("nop"),
        }
    }

    fn expression(&mut self, expression: BoundExpression<'_>) -> fmt::Result {
        match expression {
            BoundExpression::Literal(node) => {
                let text = match node.value {
                    vesper_ir::BoundConstant::Int(v) => v.to_string(),
                    vesper_ir::BoundConstant::Bool(v) => v.to_string(),
                    vesper_ir::BoundConstant::String(s) => {
                        format!("{:?}", self.interner.resolve(s))
                    }
                };
                self.line(&text)
            }
            BoundExpression::Variable(node) => {
                let text = format!(
                    "{}: {}",
                    self.interner.resolve(node.variable.name),
                    node.variable.ty
                );
                self.line(&text)
            }
            BoundExpression::Assignment(node) => {
                let header = format!("{} =", self.interner.resolve(node.variable.name));
                self.nested(&header, |p| p.expression(node.expression))
            }
            BoundExpression::Unary(node) => {
                let header = format!("unary {:?}", node.op.kind);
                self.nested(&header, |p| p.expression(node.operand))
            }
            BoundExpression::Binary(node) => {
                let header = format!("binary {:?}", node.op.kind);
                self.nested(&header, |p| {
                    p.expression(node.left)?;
                    p.expression(node.right)
                })
            }
            BoundExpression::Call(node) => {
                let header = format!("call {}", self.interner.resolve(node.function.name));
                self.nested(&header, |p| {
                    for argument in node.arguments {
                        p.expression(*argument)?;
                    }
                    Ok(())
                })
            }
            BoundExpression::Conversion(node) => {
                let header = format!("convert to {}", node.ty);
                self.nested(&header, |p| p.expression(node.expression))
            }
            BoundExpression::Error(_) => self.line("<error>"),
        }
    }
}
