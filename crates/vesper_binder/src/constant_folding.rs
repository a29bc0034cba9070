//! Constant folding for unary and binary expressions.
//!
//! Folding happens at node construction time and only when every operand
//! carries a constant. `&&`/`||` are deliberately not folded on one constant
//! operand: both operands are evaluated at run time, so erasing one would
//! drop its side effects.

use vesper_core::intern::StringInterner;
use vesper_ir::op::{BoundBinaryOperator, BoundBinaryOperatorKind, BoundUnaryOperator, BoundUnaryOperatorKind};
use vesper_ir::BoundConstant;

pub fn fold_unary(op: &BoundUnaryOperator, operand: Option<BoundConstant>) -> Option<BoundConstant> {
    let operand = operand?;
    let folded = match (op.kind, operand) {
        (BoundUnaryOperatorKind::Identity, BoundConstant::Int(v)) => BoundConstant::Int(v),
        (BoundUnaryOperatorKind::Negation, BoundConstant::Int(v)) => {
            BoundConstant::Int(v.wrapping_neg())
        }
        (BoundUnaryOperatorKind::OnesComplement, BoundConstant::Int(v)) => BoundConstant::Int(!v),
        (BoundUnaryOperatorKind::LogicalNegation, BoundConstant::Bool(v)) => {
            BoundConstant::Bool(!v)
        }
        _ => return None,
    };
    Some(folded)
}

pub fn fold_binary(
    op: &BoundBinaryOperator,
    left: Option<BoundConstant>,
    right: Option<BoundConstant>,
    interner: &StringInterner,
) -> Option<BoundConstant> {
    use BoundBinaryOperatorKind::*;
    use BoundConstant::*;

    let left = left?;
    let right = right?;

    let folded = match (op.kind, left, right) {
        (Addition, Int(l), Int(r)) => Int(l.wrapping_add(r)),
        (Addition, String(l), String(r)) => {
            let joined = format!("{}{}", interner.resolve(l), interner.resolve(r));
            String(interner.intern(&joined))
        }
        (Subtraction, Int(l), Int(r)) => Int(l.wrapping_sub(r)),
        (Multiplication, Int(l), Int(r)) => Int(l.wrapping_mul(r)),
        // Division by a constant zero stays a runtime fault.
        (Division, Int(_), Int(0)) => return None,
        (Division, Int(l), Int(r)) => Int(l.wrapping_div(r)),
        (BitwiseAnd, Int(l), Int(r)) => Int(l & r),
        (BitwiseOr, Int(l), Int(r)) => Int(l | r),
        (BitwiseXor, Int(l), Int(r)) => Int(l ^ r),
        (BitwiseAnd | LogicalAnd, Bool(l), Bool(r)) => Bool(l & r),
        (BitwiseOr | LogicalOr, Bool(l), Bool(r)) => Bool(l | r),
        (BitwiseXor, Bool(l), Bool(r)) => Bool(l ^ r),
        (Equals, l, r) => Bool(l == r),
        (NotEquals, l, r) => Bool(l != r),
        (Less, Int(l), Int(r)) => Bool(l < r),
        (LessOrEquals, Int(l), Int(r)) => Bool(l <= r),
        (Greater, Int(l), Int(r)) => Bool(l > r),
        (GreaterOrEquals, Int(l), Int(r)) => Bool(l >= r),
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_ir::TypeSymbol;
    use vesper_syntax::syntax_kind::SyntaxKind;

    #[test]
    fn folds_arithmetic() {
        let interner = StringInterner::new();
        let op = BoundBinaryOperator::bind(SyntaxKind::StarToken, TypeSymbol::Int, TypeSymbol::Int)
            .unwrap();
        let folded = fold_binary(
            op,
            Some(BoundConstant::Int(6)),
            Some(BoundConstant::Int(7)),
            &interner,
        );
        assert_eq!(folded, Some(BoundConstant::Int(42)));
    }

    #[test]
    fn folds_string_concatenation() {
        let interner = StringInterner::new();
        let op = BoundBinaryOperator::bind(
            SyntaxKind::PlusToken,
            TypeSymbol::String,
            TypeSymbol::String,
        )
        .unwrap();
        let folded = fold_binary(
            op,
            Some(BoundConstant::String(interner.intern("ab"))),
            Some(BoundConstant::String(interner.intern("cd"))),
            &interner,
        )
        .unwrap();
        assert_eq!(folded, BoundConstant::String(interner.intern("abcd")));
    }

    #[test]
    fn does_not_fold_division_by_zero() {
        let interner = StringInterner::new();
        let op = BoundBinaryOperator::bind(SyntaxKind::SlashToken, TypeSymbol::Int, TypeSymbol::Int)
            .unwrap();
        let folded = fold_binary(
            op,
            Some(BoundConstant::Int(1)),
            Some(BoundConstant::Int(0)),
            &interner,
        );
        assert_eq!(folded, None);
    }

    #[test]
    fn does_not_fold_half_constant_logic() {
        let interner = StringInterner::new();
        let op = BoundBinaryOperator::bind(
            SyntaxKind::AmpersandAmpersandToken,
            TypeSymbol::Bool,
            TypeSymbol::Bool,
        )
        .unwrap();
        assert_eq!(
            fold_binary(op, Some(BoundConstant::Bool(false)), None, &interner),
            None
        );
    }

    #[test]
    fn folds_negation() {
        let op = BoundUnaryOperator::bind(SyntaxKind::MinusToken, TypeSymbol::Int).unwrap();
        assert_eq!(
            fold_unary(op, Some(BoundConstant::Int(3))),
            Some(BoundConstant::Int(-3))
        );
    }
}
