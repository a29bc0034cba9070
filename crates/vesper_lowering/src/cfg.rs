//! Control-flow graph over a flattened statement body.
//!
//! Built from the label/goto form the [`Lowerer`](crate::Lowerer) produces.
//! Used for dead-code removal and for the all-paths-return check.

use bumpalo::Bump;
use rustc_hash::FxHashMap;
use vesper_ir::constant::BoundConstant;
use vesper_ir::label::BoundLabel;
use vesper_ir::node::{
    BoundBlockStatement, BoundExpression, BoundLiteralExpression, BoundStatement,
    BoundUnaryExpression,
};
use vesper_ir::op::BoundUnaryOperator;
use vesper_ir::TypeSymbol;
use vesper_syntax::syntax_kind::SyntaxKind;

/// Index of a basic block within the graph. Block 0 is the synthetic start
/// block and the last block is the synthetic end block.
pub type BlockId = usize;

#[derive(Debug)]
pub struct BasicBlock<'a> {
    pub statements: Vec<BoundStatement<'a>>,
    pub is_start: bool,
    pub is_end: bool,
    pub incoming: Vec<BranchId>,
    pub outgoing: Vec<BranchId>,
}

impl<'a> BasicBlock<'a> {
    fn new() -> Self {
        BasicBlock {
            statements: Vec::new(),
            is_start: false,
            is_end: false,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    fn sentinel(is_start: bool) -> Self {
        BasicBlock {
            statements: Vec::new(),
            is_start,
            is_end: !is_start,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

pub type BranchId = usize;

/// Edge between two basic blocks. `condition` is the guarding expression for
/// conditional branches, `None` for fall-through and unconditional jumps.
#[derive(Debug)]
pub struct BasicBlockBranch<'a> {
    pub from: BlockId,
    pub to: BlockId,
    pub condition: Option<BoundExpression<'a>>,
}

#[derive(Debug)]
pub struct ControlFlowGraph<'a> {
    pub blocks: Vec<BasicBlock<'a>>,
    pub branches: Vec<BasicBlockBranch<'a>>,
    removed: Vec<bool>,
}

impl<'a> ControlFlowGraph<'a> {
    pub fn create(arena: &'a Bump, body: &'a BoundBlockStatement<'a>) -> ControlFlowGraph<'a> {
        let blocks = partition_blocks(body.statements);
        connect_blocks(arena, blocks)
    }

    pub fn start(&self) -> BlockId {
        0
    }

    pub fn end(&self) -> BlockId {
        self.blocks.len() - 1
    }

    fn live_incoming(&self, block: BlockId) -> usize {
        self.blocks[block].incoming.len()
    }

    /// True if every path from the start block reaches the end block through
    /// a `return` statement.
    pub fn all_paths_return(&self) -> bool {
        let end = self.end();
        for &branch in &self.blocks[end].incoming {
            let from = self.branches[branch].from;
            match self.blocks[from].statements.last() {
                Some(BoundStatement::Return(_)) => {}
                _ => return false,
            }
        }
        true
    }

    /// Statements of the blocks still in the graph, in original block order.
    pub fn reachable_statements(&self) -> Vec<BoundStatement<'a>> {
        let mut statements = Vec::new();
        for (id, block) in self.blocks.iter().enumerate() {
            if self.removed[id] || block.is_start || block.is_end {
                continue;
            }
            statements.extend_from_slice(&block.statements);
        }
        statements
    }
}

fn partition_blocks<'a>(statements: &'a [BoundStatement<'a>]) -> Vec<Vec<BoundStatement<'a>>> {
    let mut blocks = Vec::new();
    let mut current: Vec<BoundStatement<'a>> = Vec::new();
    for &statement in statements {
        match statement {
            BoundStatement::Label(_) => {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                current.push(statement);
            }
            BoundStatement::Goto(_)
            | BoundStatement::ConditionalGoto(_)
            | BoundStatement::Return(_) => {
                current.push(statement);
                blocks.push(std::mem::take(&mut current));
            }
            BoundStatement::VariableDeclaration(_)
            | BoundStatement::Expression(_)
            | BoundStatement::Nop(_) => current.push(statement),
            BoundStatement::Block(_)
            | BoundStatement::If(_)
            | BoundStatement::While(_)
            | BoundStatement::DoWhile(_)
            | BoundStatement::For(_) => {
                unreachable!("structured statement in flattened body")
            }
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn connect_blocks<'a>(
    arena: &'a Bump,
    block_statements: Vec<Vec<BoundStatement<'a>>>,
) -> ControlFlowGraph<'a> {
    let mut blocks: Vec<BasicBlock<'a>> = Vec::with_capacity(block_statements.len() + 2);
    blocks.push(BasicBlock::sentinel(true));
    for statements in block_statements {
        let mut block = BasicBlock::new();
        block.statements = statements;
        blocks.push(block);
    }
    blocks.push(BasicBlock::sentinel(false));
    let end = blocks.len() - 1;

    let mut label_targets: FxHashMap<BoundLabel, BlockId> = FxHashMap::default();
    for (id, block) in blocks.iter().enumerate() {
        if let Some(BoundStatement::Label(label)) = block.statements.first() {
            label_targets.insert(label.label, id);
        }
    }

    let mut graph = ControlFlowGraph {
        removed: vec![false; blocks.len()],
        blocks,
        branches: Vec::new(),
    };

    for id in 0..end {
        if graph.blocks[id].is_end {
            continue;
        }
        let next = if id + 1 > end { end } else { id + 1 };
        let last = graph.blocks[id].statements.last().copied();
        match last {
            Some(BoundStatement::Goto(goto)) => {
                let to = label_targets[&goto.label];
                connect(&mut graph, id, to, None);
            }
            Some(BoundStatement::ConditionalGoto(goto)) => {
                let then = label_targets[&goto.label];
                match goto.condition.constant() {
                    Some(BoundConstant::Bool(value)) => {
                        // A compile-time condition leaves only one real edge,
                        // and a provably-true guard degrades to unconditional.
                        if value == goto.jump_if_true {
                            connect(&mut graph, id, then, None);
                        } else {
                            connect(&mut graph, id, next, None);
                        }
                    }
                    _ => {
                        let negated = negate(arena, goto.condition);
                        let (taken, fallen) = if goto.jump_if_true {
                            (goto.condition, negated)
                        } else {
                            (negated, goto.condition)
                        };
                        connect(&mut graph, id, then, Some(taken));
                        connect(&mut graph, id, next, Some(fallen));
                    }
                }
            }
            Some(BoundStatement::Return(_)) => {
                connect(&mut graph, id, end, None);
            }
            _ => {
                connect(&mut graph, id, next, None);
            }
        }
    }

    remove_unreachable(&mut graph);
    graph
}

/// Logical complement of a branch guard: literals fold, everything else is
/// wrapped in a logical-not.
fn negate<'a>(arena: &'a Bump, condition: BoundExpression<'a>) -> BoundExpression<'a> {
    if let Some(BoundConstant::Bool(value)) = condition.constant() {
        return BoundExpression::Literal(arena.alloc(BoundLiteralExpression {
            value: BoundConstant::Bool(!value),
        }));
    }
    let op = BoundUnaryOperator::bind(SyntaxKind::BangToken, TypeSymbol::Bool)
        .expect("operator table covers logical not on Bool");
    BoundExpression::Unary(arena.alloc(BoundUnaryExpression {
        op,
        operand: condition,
        constant: None,
    }))
}

fn connect<'a>(
    graph: &mut ControlFlowGraph<'a>,
    from: BlockId,
    to: BlockId,
    condition: Option<BoundExpression<'a>>,
) {
    let branch = graph.branches.len();
    graph.branches.push(BasicBlockBranch {
        from,
        to,
        condition,
    });
    graph.blocks[from].outgoing.push(branch);
    graph.blocks[to].incoming.push(branch);
}

/// Iterates to a fixed point removing blocks with no incoming branches.
fn remove_unreachable(graph: &mut ControlFlowGraph<'_>) {
    loop {
        let mut dead = None;
        for id in 0..graph.blocks.len() {
            if graph.removed[id] || graph.blocks[id].is_start || graph.blocks[id].is_end {
                continue;
            }
            if graph.live_incoming(id) == 0 {
                dead = Some(id);
                break;
            }
        }
        let Some(id) = dead else { break };
        graph.removed[id] = true;
        let outgoing = std::mem::take(&mut graph.blocks[id].outgoing);
        for branch in outgoing {
            let to = graph.branches[branch].to;
            graph.blocks[to].incoming.retain(|&b| b != branch);
        }
        let incoming = std::mem::take(&mut graph.blocks[id].incoming);
        for branch in incoming {
            let from = graph.branches[branch].from;
            graph.blocks[from].outgoing.retain(|&b| b != branch);
        }
    }
}
