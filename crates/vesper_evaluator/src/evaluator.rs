//! The evaluator: an instruction-pointer walk over lowered bodies.
//!
//! Bodies arrive fully lowered, so the only control flow is labels, gotos,
//! conditional gotos, and returns. Each body gets a label→index jump table;
//! a goto sets the instruction pointer to the entry after the target label.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use vesper_binder::builtins::{INPUT_ID, PRINT_ID, RND_ID};
use vesper_binder::program::BoundProgram;
use vesper_core::intern::StringInterner;
use vesper_ir::node::*;
use vesper_ir::op::{BoundBinaryOperatorKind, BoundUnaryOperatorKind};
use vesper_ir::{BoundLabel, SymbolId, TypeSymbol, VariableSymbol};

use crate::builtins;
use crate::value::Value;

/// A fault that stops evaluation. Unlike diagnostics these surface at run
/// time, after a clean bind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Cannot convert '{value}' to type '{to}'.")]
    InvalidCast { value: String, to: &'static str },
    /// A read of a variable whose initialization never ran. Reachable when
    /// dead-code removal drops a declaration the flat global scope still
    /// resolves, as in `if false { var z = 1 } z`.
    #[error("Variable '{name}' is not initialized.")]
    UninitializedVariable { name: String },
}

/// Run a program's script function against a persistent global store.
pub fn evaluate(
    program: &BoundProgram<'_>,
    interner: &StringInterner,
    globals: &mut FxHashMap<SymbolId, Value>,
) -> Result<Value, RuntimeError> {
    let mut evaluator = Evaluator {
        program,
        interner: interner.clone(),
        globals,
        rng: None,
        last_value: Value::Unit,
    };
    let body = program
        .functions
        .get(&program.script_function.id)
        .expect("program contains its script function")
        .body;
    let mut frame = FxHashMap::default();
    evaluator.evaluate_body(body, &mut frame)
}

struct Evaluator<'e, 'a> {
    program: &'e BoundProgram<'a>,
    interner: StringInterner,
    globals: &'e mut FxHashMap<SymbolId, Value>,
    /// Created on the first `rnd` call, then shared for the whole run.
    rng: Option<builtins::Rng>,
    last_value: Value,
}

impl<'e, 'a> Evaluator<'e, 'a> {
    fn evaluate_body(
        &mut self,
        body: &'a BoundBlockStatement<'a>,
        locals: &mut FxHashMap<SymbolId, Value>,
    ) -> Result<Value, RuntimeError> {
        let mut jump_table: FxHashMap<BoundLabel, usize> = FxHashMap::default();
        for (index, statement) in body.statements.iter().enumerate() {
            if let BoundStatement::Label(label) = statement {
                jump_table.insert(label.label, index + 1);
            }
        }

        let mut ip = 0;
        while ip < body.statements.len() {
            match body.statements[ip] {
                BoundStatement::VariableDeclaration(node) => {
                    let value = self.evaluate_expression(node.initializer, locals)?;
                    self.last_value = value.clone();
                    self.assign(node.variable, value, locals);
                    ip += 1;
                }
                BoundStatement::Expression(node) => {
                    self.last_value = self.evaluate_expression(node.expression, locals)?;
                    ip += 1;
                }
                BoundStatement::Goto(node) => {
                    ip = jump_table[&node.label];
                }
                BoundStatement::ConditionalGoto(node) => {
                    let condition = self
                        .evaluate_expression(node.condition, locals)?
                        .as_bool();
                    if condition == node.jump_if_true {
                        ip = jump_table[&node.label];
                    } else {
                        ip += 1;
                    }
                }
                BoundStatement::Return(node) => {
                    if let Some(expression) = node.expression {
                        self.last_value = self.evaluate_expression(expression, locals)?;
                    }
                    return Ok(self.last_value.clone());
                }
                BoundStatement::Label(_) | BoundStatement::Nop(_) => {
                    ip += 1;
                }
                BoundStatement::Block(_)
                | BoundStatement::If(_)
                | BoundStatement::While(_)
                | BoundStatement::DoWhile(_)
                | BoundStatement::For(_) => {
                    unreachable!("structured statement survived lowering")
                }
            }
        }
        Ok(self.last_value.clone())
    }

    fn assign(
        &mut self,
        variable: VariableSymbol,
        value: Value,
        locals: &mut FxHashMap<SymbolId, Value>,
    ) {
        if variable.is_global() {
            self.globals.insert(variable.id, value);
        } else {
            locals.insert(variable.id, value);
        }
    }

    fn read(
        &self,
        variable: VariableSymbol,
        locals: &FxHashMap<SymbolId, Value>,
    ) -> Result<Value, RuntimeError> {
        let store = if variable.is_global() {
            &*self.globals
        } else {
            locals
        };
        store
            .get(&variable.id)
            .cloned()
            .ok_or_else(|| RuntimeError::UninitializedVariable {
                name: self.interner.resolve(variable.name).to_string(),
            })
    }

    fn evaluate_expression(
        &mut self,
        expression: BoundExpression<'a>,
        locals: &mut FxHashMap<SymbolId, Value>,
    ) -> Result<Value, RuntimeError> {
        match expression {
            BoundExpression::Literal(node) => {
                Ok(Value::from_constant(node.value, &self.interner))
            }
            BoundExpression::Variable(node) => self.read(node.variable, locals),
            BoundExpression::Assignment(node) => {
                let value = self.evaluate_expression(node.expression, locals)?;
                self.assign(node.variable, value.clone(), locals);
                Ok(value)
            }
            BoundExpression::Unary(node) => self.evaluate_unary(node, locals),
            BoundExpression::Binary(node) => self.evaluate_binary(node, locals),
            BoundExpression::Call(node) => self.evaluate_call(node, locals),
            BoundExpression::Conversion(node) => {
                let value = self.evaluate_expression(node.expression, locals)?;
                convert(value, node.ty)
            }
            BoundExpression::Error(_) => {
                unreachable!("error expression evaluated; diagnostics were ignored")
            }
        }
    }

    fn evaluate_unary(
        &mut self,
        node: &'a BoundUnaryExpression<'a>,
        locals: &mut FxHashMap<SymbolId, Value>,
    ) -> Result<Value, RuntimeError> {
        let operand = self.evaluate_expression(node.operand, locals)?;
        let value = match node.op.kind {
            BoundUnaryOperatorKind::Identity => operand,
            BoundUnaryOperatorKind::Negation => Value::Int(operand.as_int().wrapping_neg()),
            BoundUnaryOperatorKind::OnesComplement => Value::Int(!operand.as_int()),
            BoundUnaryOperatorKind::LogicalNegation => Value::Bool(!operand.as_bool()),
        };
        Ok(value)
    }

    fn evaluate_binary(
        &mut self,
        node: &'a BoundBinaryExpression<'a>,
        locals: &mut FxHashMap<SymbolId, Value>,
    ) -> Result<Value, RuntimeError> {
        use BoundBinaryOperatorKind::*;

        // Both sides always evaluate; `&&` and `||` do not short-circuit.
        let left = self.evaluate_expression(node.left, locals)?;
        let right = self.evaluate_expression(node.right, locals)?;

        let value = match node.op.kind {
            Addition => {
                if node.op.left_type == TypeSymbol::String {
                    let joined = format!("{}{}", left, right);
                    Value::String(Rc::from(joined.as_str()))
                } else {
                    Value::Int(left.as_int().wrapping_add(right.as_int()))
                }
            }
            Subtraction => Value::Int(left.as_int().wrapping_sub(right.as_int())),
            Multiplication => Value::Int(left.as_int().wrapping_mul(right.as_int())),
            Division => {
                let divisor = right.as_int();
                if divisor == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Value::Int(left.as_int().wrapping_div(divisor))
            }
            BitwiseAnd => match (left, right) {
                (Value::Bool(l), Value::Bool(r)) => Value::Bool(l & r),
                (l, r) => Value::Int(l.as_int() & r.as_int()),
            },
            BitwiseOr => match (left, right) {
                (Value::Bool(l), Value::Bool(r)) => Value::Bool(l | r),
                (l, r) => Value::Int(l.as_int() | r.as_int()),
            },
            BitwiseXor => match (left, right) {
                (Value::Bool(l), Value::Bool(r)) => Value::Bool(l ^ r),
                (l, r) => Value::Int(l.as_int() ^ r.as_int()),
            },
            LogicalAnd => Value::Bool(left.as_bool() & right.as_bool()),
            LogicalOr => Value::Bool(left.as_bool() | right.as_bool()),
            Equals => Value::Bool(left == right),
            NotEquals => Value::Bool(left != right),
            Less => Value::Bool(left.as_int() < right.as_int()),
            LessOrEquals => Value::Bool(left.as_int() <= right.as_int()),
            Greater => Value::Bool(left.as_int() > right.as_int()),
            GreaterOrEquals => Value::Bool(left.as_int() >= right.as_int()),
        };
        Ok(value)
    }

    fn evaluate_call(
        &mut self,
        node: &'a BoundCallExpression<'a>,
        locals: &mut FxHashMap<SymbolId, Value>,
    ) -> Result<Value, RuntimeError> {
        match node.function.id {
            PRINT_ID => {
                let value = self.evaluate_expression(node.arguments[0], locals)?;
                builtins::print(&value);
                Ok(Value::Unit)
            }
            INPUT_ID => Ok(builtins::input()),
            RND_ID => {
                let min = self.evaluate_expression(node.arguments[0], locals)?.as_int();
                let max = self.evaluate_expression(node.arguments[1], locals)?.as_int();
                let rng = self.rng.get_or_insert_with(builtins::Rng::from_clock);
                Ok(Value::Int(rng.next_in_range(min, max)))
            }
            _ => {
                let mut frame = FxHashMap::default();
                for (parameter, argument) in
                    node.function.parameters.iter().zip(node.arguments)
                {
                    let value = self.evaluate_expression(*argument, locals)?;
                    frame.insert(parameter.id, value);
                }
                let body = self
                    .program
                    .functions
                    .get(&node.function.id)
                    .unwrap_or_else(|| {
                        panic!("no body for function {}", node.function.id)
                    })
                    .body;
                self.evaluate_body(body, &mut frame)
            }
        }
    }
}

/// Apply a bound conversion to a run-time value. Conversions to `Any` keep
/// the value; the rest follow the Bool/Int↔String rules.
fn convert(value: Value, to: TypeSymbol) -> Result<Value, RuntimeError> {
    let invalid = |value: &Value, to: TypeSymbol| RuntimeError::InvalidCast {
        value: value.to_string(),
        to: to.name(),
    };
    match to {
        TypeSymbol::Any => Ok(value),
        TypeSymbol::Int => match &value {
            Value::Int(_) => Ok(value),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| invalid(&value, to)),
            _ => Err(invalid(&value, to)),
        },
        TypeSymbol::Bool => match &value {
            Value::Bool(_) => Ok(value),
            Value::String(s) => match s.as_ref() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid(&value, to)),
            },
            _ => Err(invalid(&value, to)),
        },
        TypeSymbol::String => match &value {
            Value::Int(_) | Value::Bool(_) => {
                Ok(Value::String(Rc::from(value.to_string().as_str())))
            }
            Value::String(_) => Ok(value),
            _ => Err(invalid(&value, to)),
        },
        TypeSymbol::Void | TypeSymbol::Error => {
            unreachable!("conversion to {} bound", to)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_to_int_cast() {
        assert_eq!(
            convert(Value::String(Rc::from("42")), TypeSymbol::Int),
            Ok(Value::Int(42))
        );
        assert!(convert(Value::String(Rc::from("forty")), TypeSymbol::Int).is_err());
    }

    #[test]
    fn anything_converts_to_any() {
        assert_eq!(
            convert(Value::Bool(true), TypeSymbol::Any),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn int_and_bool_to_string() {
        assert_eq!(
            convert(Value::Int(-7), TypeSymbol::String),
            Ok(Value::String(Rc::from("-7")))
        );
        assert_eq!(
            convert(Value::Bool(false), TypeSymbol::String),
            Ok(Value::String(Rc::from("false")))
        );
    }
}
