//! A tree-walking evaluator for a small expression language: integers and
//! booleans, conditionals, persistent lists, first-class (optionally
//! self-recursive) functions, and `raise`/`try`.
//!
//! Programs are built directly as trees and handed to [`evaluate`]:
//!
//! ```
//! use tryeval::{Node, Value, evaluate};
//!
//! // hd(tl(0 :: 1 :: nil))
//! let program = Node::new_head(Node::new_tail(Node::new_cons(
//!     Node::new_number(0),
//!     Node::new_cons(Node::new_number(1), Node::new_nil()),
//! )));
//! assert_eq!(evaluate(&program), Ok(Value::Number(1)));
//! ```
//!
//! A `raise` is an ordinary [`Value::Raise`] result that a `try` can catch.
//! An ill-typed program instead aborts with an [`EvalError`].

// Declare modules publicly so they are part of the library interface
pub mod environment;
pub mod evaluator;
pub mod list;
pub mod primitives;
pub mod source;
pub mod types;

pub use environment::{EnvError, Environment};
pub use evaluator::{EvalError, EvalOptions, EvalResult, Evaluator, Position, eval, evaluate};
pub use list::List;
pub use source::Span;
pub use types::{ArithOp, Closure, CompareOp, Expr, Node, Value};
