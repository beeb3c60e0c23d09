use crate::types::Value;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

// --- Environment Error ---
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("Unbound variable: '{0}'")]
    UnboundVariable(String),
}

// --- Environment Definition ---

/// A persistent chain of single-binding frames.
///
/// `extend` never touches the receiver: it returns a new environment whose
/// first frame points at the old one. Closures can therefore hold on to the
/// environment they were created in without ever seeing later bindings.
#[derive(Clone, Default)]
pub struct Environment {
    frame: Option<Rc<Frame>>,
}

struct Frame {
    name: String,
    value: Value,
    outer: Environment,
}

impl Environment {
    /// Creates a new, empty top-level environment.
    pub fn new() -> Self {
        Environment { frame: None }
    }

    /// Returns an environment with `name` bound to `value`, shadowing any
    /// outer binding of the same name.
    pub fn extend(&self, name: impl Into<String>, value: Value) -> Environment {
        Environment {
            frame: Some(Rc::new(Frame {
                name: name.into(),
                value,
                outer: self.clone(),
            })),
        }
    }

    /// Looks up a variable's value, innermost frame first.
    pub fn lookup(&self, name: &str) -> Result<Value, EnvError> {
        let mut current = self.frame.as_deref();
        while let Some(frame) = current {
            if frame.name == name {
                return Ok(frame.value.clone());
            }
            current = frame.outer.frame.as_deref();
        }
        Err(EnvError::UnboundVariable(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none()
    }

    /// Number of frames in the chain, shadowed ones included.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.frame.as_deref();
        while let Some(frame) = current {
            depth += 1;
            current = frame.outer.frame.as_deref();
        }
        depth
    }

    /// Gets the set of all names visible from this environment.
    pub fn identifiers(&self) -> HashSet<String> {
        let mut identifiers = HashSet::new();
        let mut current = self.frame.as_deref();
        while let Some(frame) = current {
            identifiers.insert(frame.name.clone());
            current = frame.outer.frame.as_deref();
        }
        identifiers
    }
}

impl fmt::Debug for Environment {
    // Values are left out: a closure's captured environment may be large.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        let mut current = self.frame.as_deref();
        while let Some(frame) = current {
            names.push(frame.name.as_str());
            current = frame.outer.frame.as_deref();
        }
        f.debug_struct("Environment").field("frames", &names).finish()
    }
}
