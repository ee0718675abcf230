use super::tokenizer::TokenType as TT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub(super) fn from_token(typ: TT) -> Option<Self> {
        match typ {
            TT::PLUS => Some(Self::Add),
            TT::MINUS => Some(Self::Subtract),
            TT::STAR => Some(Self::Multiply),
            TT::SLASH => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expression tree. Every child is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    NumberLiteral(i64),
    VariableReference(String),
    Assignment(String, Box<Expression>),
    BinaryOp(Operator, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub(super) fn assignment(name: String, value: Expression) -> Self {
        Self::Assignment(name, Box::new(value))
    }

    pub(super) fn binary(op: Operator, left: Expression, right: Expression) -> Self {
        Self::BinaryOp(op, Box::new(left), Box::new(right))
    }

    /// Short label of the node itself, without its children.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NumberLiteral(_) => "number",
            Self::VariableReference(_) => "variable",
            Self::Assignment(..) => "assignment",
            Self::BinaryOp(op, ..) => op.symbol(),
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NumberLiteral(value) => write!(f, "{value}"),
            Self::VariableReference(name) => write!(f, "{name}"),
            Self::Assignment(name, value) => write!(f, "Assignment({name}, {value})"),
            Self::BinaryOp(op, left, right) => write!(f, "BinaryOp({op}, {left}, {right})"),
        }
    }
}
