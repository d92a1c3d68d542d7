//! Lazily-evaluated node parameters.

use std::fmt;

/// A parameter that is either fixed at construction or re-read every time
/// the node asks for it.
pub enum Val<T> {
    Const(T),
    Dynamic(Box<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Val<T> {
    pub fn dynamic(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Val::Dynamic(Box::new(f))
    }

    /// Current value.
    pub fn get(&self) -> T {
        match self {
            Val::Const(value) => value.clone(),
            Val::Dynamic(f) => f(),
        }
    }
}

impl<T> From<T> for Val<T> {
    fn from(value: T) -> Self {
        Val::Const(value)
    }
}

impl From<&str> for Val<String> {
    fn from(value: &str) -> Self {
        Val::Const(value.to_owned())
    }
}

impl<T: fmt::Debug> fmt::Debug for Val<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Const(value) => f.debug_tuple("Const").field(value).finish(),
            Val::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
