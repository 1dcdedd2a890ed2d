//! Syntax tree definitions
//!
//! [`Syntax`] is a closed sum type over every statement and expression form.
//! Each node carries a fixed precedence number (0 binds tightest, 200 is a
//! statement) that drives both the parser's climbing and the printer's
//! parenthesization. Evaluation lives in [`crate::interpreter`].

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

pub const PREC_ATOM: u8 = 0;
pub const PREC_ACCESS: u8 = 10;
pub const PREC_CALL: u8 = 20;
pub const PREC_UPDATE: u8 = 30;
pub const PREC_UNARY: u8 = 40;
pub const PREC_CONDITIONAL: u8 = 150;
pub const PREC_ASSIGN: u8 = 170;
pub const PREC_COMMA: u8 = 180;
pub const PREC_VAR: u8 = 190;
pub const PREC_STATEMENT: u8 = 200;

/// Binary operators, including the assignment family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    // Shift
    Shl,
    Shr,
    UShr,
    // Relational
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Instanceof,
    // Equality
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    // Bitwise
    BitAnd,
    BitXor,
    BitOr,
    // Logical
    And,
    Or,
    Elvis,           // a ?: b
    NullishCoalesce, // a ?? b
    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    BitAndAssign,
    BitXorAssign,
    BitOrAssign,
    Lambda, // a => b
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 38] = [
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::UShr,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Gt,
        BinaryOp::Ge,
        BinaryOp::In,
        BinaryOp::Instanceof,
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::StrictEq,
        BinaryOp::StrictNe,
        BinaryOp::BitAnd,
        BinaryOp::BitXor,
        BinaryOp::BitOr,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Elvis,
        BinaryOp::NullishCoalesce,
        BinaryOp::Assign,
        BinaryOp::AddAssign,
        BinaryOp::SubAssign,
        BinaryOp::MulAssign,
        BinaryOp::DivAssign,
        BinaryOp::ModAssign,
        BinaryOp::ShlAssign,
        BinaryOp::ShrAssign,
        BinaryOp::UShrAssign,
        BinaryOp::BitAndAssign,
        BinaryOp::BitXorAssign,
        BinaryOp::BitOrAssign,
        BinaryOp::Lambda,
    ];

    pub fn from_symbol(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.symbol() == text)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::Instanceof => "instanceof",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Elvis => "?:",
            BinaryOp::NullishCoalesce => "??",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::ModAssign => "%=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::UShrAssign => ">>>=",
            BinaryOp::BitAndAssign => "&=",
            BinaryOp::BitXorAssign => "^=",
            BinaryOp::BitOrAssign => "|=",
            BinaryOp::Lambda => "=>",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 50,
            BinaryOp::Add | BinaryOp::Sub => 60,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 70,
            BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::In
            | BinaryOp::Instanceof => 80,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::StrictEq | BinaryOp::StrictNe => 90,
            BinaryOp::BitAnd => 100,
            BinaryOp::BitXor => 110,
            BinaryOp::BitOr => 120,
            BinaryOp::And => 130,
            BinaryOp::Or => 140,
            BinaryOp::Elvis | BinaryOp::NullishCoalesce => PREC_CONDITIONAL,
            _ => PREC_ASSIGN,
        }
    }

    /// Assignment and elvis operators group to the right.
    pub fn is_right_assoc(self) -> bool {
        matches!(
            self,
            BinaryOp::Elvis | BinaryOp::NullishCoalesce | BinaryOp::Lambda
        ) || self.is_assignment()
    }

    pub fn is_assignment(self) -> bool {
        self.precedence() == PREC_ASSIGN && self != BinaryOp::Lambda
    }

    /// The operator a compound assignment applies (`+=` → `+`).
    pub fn compound_base(self) -> Option<BinaryOp> {
        let base = match self {
            BinaryOp::AddAssign => BinaryOp::Add,
            BinaryOp::SubAssign => BinaryOp::Sub,
            BinaryOp::MulAssign => BinaryOp::Mul,
            BinaryOp::DivAssign => BinaryOp::Div,
            BinaryOp::ModAssign => BinaryOp::Mod,
            BinaryOp::ShlAssign => BinaryOp::Shl,
            BinaryOp::ShrAssign => BinaryOp::Shr,
            BinaryOp::UShrAssign => BinaryOp::UShr,
            BinaryOp::BitAndAssign => BinaryOp::BitAnd,
            BinaryOp::BitXorAssign => BinaryOp::BitXor,
            BinaryOp::BitOrAssign => BinaryOp::BitOr,
            _ => return None,
        };
        Some(base)
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    PreInc, // ++x
    PreDec, // --x
    Plus,
    Minus,
    Not,
    BitNot,
    New,
    Typeof,
    Void,
    Delete,
}

impl PrefixOp {
    pub const ALL: [PrefixOp; 10] = [
        PrefixOp::PreInc,
        PrefixOp::PreDec,
        PrefixOp::Plus,
        PrefixOp::Minus,
        PrefixOp::Not,
        PrefixOp::BitNot,
        PrefixOp::New,
        PrefixOp::Typeof,
        PrefixOp::Void,
        PrefixOp::Delete,
    ];

    pub fn from_symbol(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.symbol() == text)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOp::PreInc => "++",
            PrefixOp::PreDec => "--",
            PrefixOp::Plus => "+",
            PrefixOp::Minus => "-",
            PrefixOp::Not => "!",
            PrefixOp::BitNot => "~",
            PrefixOp::New => "new",
            PrefixOp::Typeof => "typeof",
            PrefixOp::Void => "void",
            PrefixOp::Delete => "delete",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            PrefixOp::New => PREC_ACCESS,
            PrefixOp::PreInc | PrefixOp::PreDec => PREC_UPDATE,
            _ => PREC_UNARY,
        }
    }

    /// Loosest operand that prints without parentheses.
    fn operand_limit(self) -> u8 {
        match self {
            PrefixOp::New => PREC_ACCESS,
            PrefixOp::PreInc | PrefixOp::PreDec => PREC_CALL,
            _ => PREC_UNARY,
        }
    }
}

/// Postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    PostInc,
    PostDec,
}

impl PostfixOp {
    pub fn from_symbol(text: &str) -> Option<Self> {
        match text {
            "++" => Some(PostfixOp::PostInc),
            "--" => Some(PostfixOp::PostDec),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOp::PostInc => "++",
            PostfixOp::PostDec => "--",
        }
    }
}

/// Member access forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessOp {
    Dot,       // a.b
    WeakDot,   // a?.b
    Index,     // a[b]
    ThinArrow, // a->b
}

impl AccessOp {
    pub fn from_symbol(text: &str) -> Option<Self> {
        match text {
            "." => Some(AccessOp::Dot),
            "?." => Some(AccessOp::WeakDot),
            "[" => Some(AccessOp::Index),
            "->" => Some(AccessOp::ThinArrow),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AccessOp::Dot => ".",
            AccessOp::WeakDot => "?.",
            AccessOp::Index => "[",
            AccessOp::ThinArrow => "->",
        }
    }
}

/// Keyword that introduces one arm of an `if` chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKeyword {
    If,
    ElseIf,      // elseif
    Elsif,       // elsif
    ElseSpaceIf, // else if
    Else,
}

impl BranchKeyword {
    pub fn text(self) -> &'static str {
        match self {
            BranchKeyword::If => "if",
            BranchKeyword::ElseIf => "elseif",
            BranchKeyword::Elsif => "elsif",
            BranchKeyword::ElseSpaceIf => "else if",
            BranchKeyword::Else => "else",
        }
    }
}

/// One arm of an `if` chain; `condition` is `None` only for `else`
#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub keyword: BranchKeyword,
    pub condition: Option<Syntax>,
    pub body: Syntax,
}

/// `name [= init]` inside a `var` statement
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    pub init: Option<Syntax>,
    pub location: SourceLocation,
}

/// Statement and expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Syntax {
    // Statements
    Empty {
        location: SourceLocation,
    },
    Block {
        statements: Vec<Syntax>,
        location: SourceLocation,
    },
    ExpressionStatement {
        expr: Box<Syntax>,
        location: SourceLocation,
    },
    Var {
        declarations: Vec<VarDeclarator>,
        location: SourceLocation,
    },
    If {
        branches: Vec<IfBranch>,
        location: SourceLocation,
    },

    // Expressions
    Comma {
        exprs: Vec<Syntax>,
        location: SourceLocation,
    },
    Paren {
        expr: Box<Syntax>,
        location: SourceLocation,
    },
    Prefix {
        op: PrefixOp,
        operand: Box<Syntax>,
        location: SourceLocation,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Syntax>,
        location: SourceLocation,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Syntax>,
        rhs: Box<Syntax>,
        location: SourceLocation,
    },
    Ternary {
        condition: Box<Syntax>,
        then_branch: Box<Syntax>,
        else_branch: Box<Syntax>,
        location: SourceLocation,
    },
    Call {
        callee: Box<Syntax>,
        args: Vec<Syntax>,
        location: SourceLocation,
    },
    Access {
        op: AccessOp,
        object: Box<Syntax>,
        property: Box<Syntax>,
        location: SourceLocation,
    },

    // Leaves
    Number {
        value: f64,
        text: String,
        location: SourceLocation,
    },
    Str {
        value: String,
        text: String,
        location: SourceLocation,
    },
    Symbol {
        name: String,
        location: SourceLocation,
    },
}

impl Syntax {
    pub fn symbol(name: impl Into<String>, location: SourceLocation) -> Self {
        Syntax::Symbol {
            name: name.into(),
            location,
        }
    }

    pub fn binary(op: BinaryOp, lhs: Syntax, rhs: Syntax) -> Self {
        let location = lhs.location();
        Syntax::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            location,
        }
    }

    pub fn prefix(op: PrefixOp, operand: Syntax, location: SourceLocation) -> Self {
        Syntax::Prefix {
            op,
            operand: Box::new(operand),
            location,
        }
    }

    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Syntax::Empty { location }
            | Syntax::Block { location, .. }
            | Syntax::ExpressionStatement { location, .. }
            | Syntax::Var { location, .. }
            | Syntax::If { location, .. }
            | Syntax::Comma { location, .. }
            | Syntax::Paren { location, .. }
            | Syntax::Prefix { location, .. }
            | Syntax::Postfix { location, .. }
            | Syntax::Binary { location, .. }
            | Syntax::Ternary { location, .. }
            | Syntax::Call { location, .. }
            | Syntax::Access { location, .. }
            | Syntax::Number { location, .. }
            | Syntax::Str { location, .. }
            | Syntax::Symbol { location, .. } => *location,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Syntax::Empty { .. }
            | Syntax::Block { .. }
            | Syntax::ExpressionStatement { .. }
            | Syntax::If { .. } => PREC_STATEMENT,
            Syntax::Var { .. } => PREC_VAR,
            Syntax::Comma { .. } => PREC_COMMA,
            Syntax::Ternary { .. } => PREC_CONDITIONAL,
            Syntax::Binary { op, .. } => op.precedence(),
            Syntax::Prefix { op, .. } => op.precedence(),
            Syntax::Postfix { .. } => PREC_UPDATE,
            Syntax::Call { .. } => PREC_CALL,
            Syntax::Access { .. } => PREC_ACCESS,
            Syntax::Paren { .. }
            | Syntax::Number { .. }
            | Syntax::Str { .. }
            | Syntax::Symbol { .. } => PREC_ATOM,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Syntax>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::default();
        printer.node(self);
        f.write_str(&printer.out)
    }
}

/// Source renderer. Every piece goes through [`Printer::push`], which keeps
/// adjacent operator characters apart so the output re-lexes the same way.
#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn push(&mut self, piece: &str) {
        let touching = match (self.out.chars().last(), piece.chars().next()) {
            (Some(prev), Some(next)) => {
                super::lexer::is_operator_char(prev) && super::lexer::is_operator_char(next)
            }
            _ => false,
        };
        if touching {
            self.out.push(' ');
        }
        self.out.push_str(piece);
    }

    fn child(&mut self, node: &Syntax, parens: bool) {
        if parens {
            self.push("(");
            self.node(node);
            self.push(")");
        } else {
            self.node(node);
        }
    }

    fn operator(&mut self, symbol: &str) {
        if symbol.starts_with(|c: char| c.is_ascii_alphabetic()) {
            self.push(" ");
            self.push(symbol);
            self.push(" ");
        } else {
            self.push(symbol);
        }
    }

    fn node(&mut self, node: &Syntax) {
        match node {
            Syntax::Empty { .. } => self.push(";"),
            Syntax::Block { statements, .. } => {
                self.push("{");
                for statement in statements {
                    self.node(statement);
                    self.push(" ");
                }
                self.push("}");
            }
            Syntax::ExpressionStatement { expr, .. } => {
                self.node(expr);
                self.push(";");
            }
            Syntax::Var { declarations, .. } => {
                self.push("var ");
                for (i, decl) in declarations.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push(&decl.name);
                    if let Some(init) = &decl.init {
                        self.push(" = ");
                        self.child(init, init.precedence() >= PREC_COMMA);
                    }
                }
                self.push(";");
            }
            Syntax::If { branches, .. } => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        self.push(" ");
                    }
                    self.push(branch.keyword.text());
                    if let Some(condition) = &branch.condition {
                        self.push(" (");
                        self.node(condition);
                        self.push(")");
                    }
                    self.push(" ");
                    self.node(&branch.body);
                }
            }
            Syntax::Comma { exprs, .. } => {
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.push(",");
                    }
                    self.child(expr, expr.precedence() >= PREC_COMMA);
                }
            }
            Syntax::Paren { expr, .. } => self.child(expr, true),
            Syntax::Prefix { op, operand, .. } => {
                self.push(op.symbol());
                if op.symbol().starts_with(|c: char| c.is_ascii_alphabetic()) {
                    self.push(" ");
                }
                self.child(operand, operand.precedence() > op.operand_limit());
            }
            Syntax::Postfix { op, operand, .. } => {
                self.child(operand, operand.precedence() > PREC_CALL);
                self.push(op.symbol());
            }
            Syntax::Binary { op, lhs, rhs, .. } => {
                let prec = op.precedence();
                let right_assoc = op.is_right_assoc();
                let (l, r) = (lhs.precedence(), rhs.precedence());
                self.child(lhs, l > prec || (l == prec && right_assoc));
                self.operator(op.symbol());
                self.child(rhs, r > prec || (r == prec && !right_assoc));
            }
            Syntax::Ternary {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.child(condition, condition.precedence() >= PREC_CONDITIONAL);
                self.push("?");
                self.child(then_branch, then_branch.precedence() > PREC_CONDITIONAL);
                self.push(":");
                self.child(else_branch, else_branch.precedence() > PREC_CONDITIONAL);
            }
            Syntax::Call { callee, args, .. } => {
                self.child(callee, callee.precedence() > PREC_CALL);
                self.push("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.child(arg, arg.precedence() >= PREC_COMMA);
                }
                self.push(")");
            }
            Syntax::Access {
                op,
                object,
                property,
                ..
            } => {
                let is_new = matches!(
                    **object,
                    Syntax::Prefix {
                        op: PrefixOp::New,
                        ..
                    }
                );
                self.child(object, is_new || object.precedence() > PREC_CALL);
                self.push(op.symbol());
                self.node(property);
                if *op == AccessOp::Index {
                    self.push("]");
                }
            }
            Syntax::Number { text, .. } | Syntax::Str { text, .. } => self.push(text),
            Syntax::Symbol { name, .. } => self.push(name),
        }
    }
}
