use crate::environment::Environment;
use crate::primitives::{
    prim_arith, prim_compare, prim_cons, prim_head, prim_is_empty, prim_list, prim_tail,
};
use crate::source::Span;
use crate::types::{Closure, Expr, Node, Value};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, trace};

/// Which operand of an operator a fault refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Position {
    Left,
    Right,
    Operand,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Left => write!(f, "left operand"),
            Position::Right => write!(f, "right operand"),
            Position::Operand => write!(f, "operand"),
        }
    }
}

// --- Evaluation Error ---
/// A fatal fault: the program is ill-typed and evaluation stops.
/// `try` never intercepts these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Type fault at {span}: '{operator}' expects a {expected} as its {position}, got a {found}")]
    TypeMismatch {
        operator: &'static str,
        position: Position,
        expected: &'static str,
        found: &'static str,
        span: Span,
    },
    #[error("Type fault at {span}: 'if' condition must be a boolean, got a {found}")]
    NonBooleanCondition { found: &'static str, span: Span },
    #[error("Type fault at {span}: expected a function to apply, got a {found}")]
    NotAFunction { found: &'static str, span: Span },
    #[error("Evaluation aborted at {span}: call depth exceeded the limit of {limit}")]
    DepthLimitExceeded { limit: usize, span: Span },
}

// Result type alias for convenience
pub type EvalResult<T = Value> = Result<T, EvalError>;

// Returns early with `raise` when a required sub-expression raised
macro_rules! propagate {
    ($value:expr) => {
        match $value {
            Value::Raise => return Ok(Value::Raise),
            other => other,
        }
    };
}

/// Limits applied to a single evaluation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct EvalOptions {
    /// Maximum nesting of function applications. `None` leaves the host
    /// stack as the only bound.
    pub max_depth: Option<usize>,
}

/// Evaluates trees. Holds the options and the current call depth; the
/// bindings themselves travel as an explicit [`Environment`] argument.
#[derive(Debug, Default)]
pub struct Evaluator {
    options: EvalOptions,
    depth: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Evaluator { options, depth: 0 }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Evaluator::with_options(EvalOptions {
            max_depth: Some(max_depth),
        })
    }

    pub fn options(&self) -> EvalOptions {
        self.options
    }

    /// Evaluates a whole program in the empty environment.
    pub fn evaluate(&mut self, program: &Node) -> EvalResult {
        self.depth = 0;
        let result = self.eval(program, &Environment::new());
        match &result {
            Ok(Value::Raise) => debug!("program finished with an uncaught raise"),
            Err(err) => debug!(%err, "evaluation aborted"),
            Ok(_) => {}
        }
        result
    }

    /// Evaluates a given node within the specified environment.
    pub fn eval(&mut self, node: &Node, env: &Environment) -> EvalResult {
        match &node.kind {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),

            Expr::Var(name) => match env.lookup(name) {
                Ok(value) => Ok(value),
                Err(err) => {
                    trace!(%err, "lookup failed, raising");
                    Ok(Value::Raise)
                }
            },

            Expr::If(cond, then, otherwise) => {
                match propagate!(self.eval(cond, env)?) {
                    Value::Bool(true) => self.eval(then, env),
                    Value::Bool(false) => self.eval(otherwise, env),
                    other => Err(EvalError::NonBooleanCondition {
                        found: other.type_name(),
                        span: node.span,
                    }),
                }
            }

            // Both operands are evaluated before either is inspected
            Expr::Arith(op, left, right) => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                prim_arith(*op, left, right, node.span)
            }
            Expr::Compare(op, left, right) => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                prim_compare(*op, left, right, node.span)
            }

            Expr::Lambda { param, body } => Ok(Value::Closure(Rc::new(Closure {
                param: param.clone(),
                body: Rc::clone(body),
                env: env.clone(),
                self_name: None,
            }))),

            Expr::Apply(callee, arg) => self.evaluate_apply(callee, arg, env, node.span),

            Expr::FunctionDef {
                name,
                param,
                body,
                scope,
                recursive,
            } => {
                let function = Value::Closure(Rc::new(Closure {
                    param: param.clone(),
                    body: Rc::clone(body),
                    env: env.clone(),
                    self_name: recursive.then(|| name.clone()),
                }));
                self.eval(scope, &env.extend(name.clone(), function))
            }

            Expr::Nil => Ok(Value::List(Default::default())),
            Expr::Cons(head, tail) => {
                let head = self.eval(head, env)?;
                let tail = self.eval(tail, env)?;
                prim_cons(head, tail, node.span)
            }
            Expr::Head(list) => {
                let list = self.eval(list, env)?;
                prim_head(list, node.span)
            }
            Expr::Tail(list) => {
                let list = self.eval(list, env)?;
                prim_tail(list, node.span)
            }
            Expr::IsEmpty(list) => {
                let list = self.eval(list, env)?;
                prim_is_empty(list, node.span)
            }
            Expr::ListLiteral(elements) => {
                let values = elements
                    .iter()
                    .map(|element| self.eval(element, env))
                    .collect::<EvalResult<Vec<_>>>()?;
                prim_list(values)
            }

            Expr::Try(body, handler) => match self.eval(body, env)? {
                Value::Raise => {
                    debug!(span = %node.span, "try caught a raise");
                    self.eval(handler, env)
                }
                value => Ok(value),
            },
            Expr::Raise => Ok(Value::Raise),
        }
    }

    fn evaluate_apply(
        &mut self,
        callee: &Node,
        arg: &Node,
        env: &Environment,
        span: Span,
    ) -> EvalResult {
        let closure = match propagate!(self.eval(callee, env)?) {
            Value::Closure(closure) => closure,
            other => {
                return Err(EvalError::NotAFunction {
                    found: other.type_name(),
                    span,
                });
            }
        };

        // The argument is evaluated in the caller's environment
        let arg = propagate!(self.eval(arg, env)?);

        if let Some(limit) = self.options.max_depth
            && self.depth >= limit
        {
            return Err(EvalError::DepthLimitExceeded { limit, span });
        }

        self.depth += 1;
        let result = self.call(&closure, arg);
        self.depth -= 1;
        result
    }

    #[tracing::instrument(level = "trace", skip_all, fields(param = %closure.param, depth = self.depth))]
    fn call(&mut self, closure: &Rc<Closure>, arg: Value) -> EvalResult {
        let mut call_env = closure.env.clone();
        if let Some(name) = &closure.self_name {
            // A recursive function finds itself under its own name
            call_env = call_env.extend(name.clone(), Value::Closure(Rc::clone(closure)));
        }
        let call_env = call_env.extend(closure.param.clone(), arg);
        self.eval(&closure.body, &call_env)
    }
}

/// Evaluates `node` in `env` with default options.
pub fn eval(node: &Node, env: &Environment) -> EvalResult {
    Evaluator::new().eval(node, env)
}

/// Evaluates a whole program in the empty environment with default options.
pub fn evaluate(program: &Node) -> EvalResult {
    Evaluator::new().evaluate(program)
}
