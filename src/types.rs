use crate::environment::Environment;
use crate::list::List;
use crate::source::Span;
use std::fmt; // For custom display formatting
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Expr, // The actual expression
    pub span: Span, // The source span it covers
}

impl Node {
    pub fn new(kind: Expr, span: Span) -> Self {
        Node { kind, span }
    }

    /// Replaces the span, for builders that know where a node came from.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl From<Expr> for Node {
    fn from(kind: Expr) -> Self {
        Node::new(kind, Span::default())
    }
}

/// Binary operators producing a number.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
        }
    }
}

/// Binary operators comparing two numbers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Eq,
    Ne,
    Le,
    Lt,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Le => "<=",
            CompareOp::Lt => "<",
        }
    }
}

/// The program representation. Nodes never change once built; the
/// environment is passed alongside them during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i64),
    Bool(bool),
    If(Box<Node>, Box<Node>, Box<Node>),
    Arith(ArithOp, Box<Node>, Box<Node>),
    Compare(CompareOp, Box<Node>, Box<Node>),
    Var(String),
    Lambda {
        param: String,
        body: Rc<Node>,
    },
    Apply(Box<Node>, Box<Node>),
    /// Binds `name` in `scope`, and also inside `body` when `recursive`.
    FunctionDef {
        name: String,
        param: String,
        body: Rc<Node>,
        scope: Box<Node>,
        recursive: bool,
    },
    Nil,
    Cons(Box<Node>, Box<Node>),
    Head(Box<Node>),
    Tail(Box<Node>),
    IsEmpty(Box<Node>),
    /// `[a, b, c]`, elements evaluated left to right.
    ListLiteral(Vec<Node>),
    Try(Box<Node>, Box<Node>),
    Raise,
}

// --- Tree construction ---
// Every constructor produces a node with the default span.

impl Node {
    pub fn new_number(n: i64) -> Node {
        Expr::Number(n).into()
    }

    pub fn new_bool(b: bool) -> Node {
        Expr::Bool(b).into()
    }

    pub fn new_if(cond: Node, then: Node, otherwise: Node) -> Node {
        Expr::If(Box::new(cond), Box::new(then), Box::new(otherwise)).into()
    }

    pub fn new_arith(op: ArithOp, left: Node, right: Node) -> Node {
        Expr::Arith(op, Box::new(left), Box::new(right)).into()
    }

    pub fn new_add(left: Node, right: Node) -> Node {
        Node::new_arith(ArithOp::Add, left, right)
    }

    pub fn new_sub(left: Node, right: Node) -> Node {
        Node::new_arith(ArithOp::Sub, left, right)
    }

    pub fn new_mul(left: Node, right: Node) -> Node {
        Node::new_arith(ArithOp::Mul, left, right)
    }

    pub fn new_compare(op: CompareOp, left: Node, right: Node) -> Node {
        Expr::Compare(op, Box::new(left), Box::new(right)).into()
    }

    pub fn new_eq(left: Node, right: Node) -> Node {
        Node::new_compare(CompareOp::Eq, left, right)
    }

    pub fn new_lt(left: Node, right: Node) -> Node {
        Node::new_compare(CompareOp::Lt, left, right)
    }

    pub fn new_var(name: impl Into<String>) -> Node {
        Expr::Var(name.into()).into()
    }

    pub fn new_lambda(param: impl Into<String>, body: Node) -> Node {
        Expr::Lambda {
            param: param.into(),
            body: Rc::new(body),
        }
        .into()
    }

    pub fn new_apply(callee: Node, arg: Node) -> Node {
        Expr::Apply(Box::new(callee), Box::new(arg)).into()
    }

    pub fn new_function_def(
        name: impl Into<String>,
        param: impl Into<String>,
        body: Node,
        scope: Node,
        recursive: bool,
    ) -> Node {
        Expr::FunctionDef {
            name: name.into(),
            param: param.into(),
            body: Rc::new(body),
            scope: Box::new(scope),
            recursive,
        }
        .into()
    }

    pub fn new_nil() -> Node {
        Expr::Nil.into()
    }

    pub fn new_cons(head: Node, tail: Node) -> Node {
        Expr::Cons(Box::new(head), Box::new(tail)).into()
    }

    pub fn new_head(list: Node) -> Node {
        Expr::Head(Box::new(list)).into()
    }

    pub fn new_tail(list: Node) -> Node {
        Expr::Tail(Box::new(list)).into()
    }

    pub fn new_is_empty(list: Node) -> Node {
        Expr::IsEmpty(Box::new(list)).into()
    }

    pub fn new_list(elements: Vec<Node>) -> Node {
        Expr::ListLiteral(elements).into()
    }

    pub fn new_try(body: Node, handler: Node) -> Node {
        Expr::Try(Box::new(body), Box::new(handler)).into()
    }

    pub fn new_raise() -> Node {
        Expr::Raise.into()
    }
}

/// A function value: parameter and body paired with the environment that
/// was in effect where the function was defined.
#[derive(Clone)]
pub struct Closure {
    pub param: String,
    pub body: Rc<Node>,
    pub env: Environment,
    /// Set for recursive definitions: the name the function sees itself under.
    pub self_name: Option<String>,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("param", &self.param)
            .field("self_name", &self.self_name)
            .finish_non_exhaustive()
    }
}

/// The result of evaluating a node.
#[derive(Debug, Clone)]
pub enum Value {
    Number(i64),
    Bool(bool),
    List(List),
    Closure(Rc<Closure>),
    /// A pending `raise`, travelling outward until a `try` catches it.
    Raise,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::List(_) => "list",
            Value::Closure(_) => "function",
            Value::Raise => "raise",
        }
    }

    pub fn is_raise(&self) -> bool {
        matches!(self, Value::Raise)
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

// Closures are never equal, not even to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Raise, Value::Raise) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(list) => write!(f, "{}", list),
            Value::Closure(closure) => write!(f, "<fn {}>", closure.param),
            Value::Raise => write!(f, "raise"),
        }
    }
}
