use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, WallError};
use crate::line::{is_identifier, is_reserved};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Typed variable store for one run. A re-assignment may change the type.
#[derive(Debug, Default, Clone)]
pub struct Variables {
    values: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_name(name: &str) -> bool {
        is_identifier(name) && !is_reserved(name)
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        if !Self::is_valid_name(name) {
            return Err(WallError::InvalidIdentifier(name.to_string()));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| WallError::UndefinedVariable(name.to_string()))
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            Value::Int(n) => Ok(n),
            Value::Bool(_) => Err(WallError::TypeMismatch {
                name: name.to_string(),
                expected: "an integer",
            }),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            Value::Bool(b) => Ok(b),
            Value::Int(_) => Err(WallError::TypeMismatch {
                name: name.to_string(),
                expected: "a boolean",
            }),
        }
    }

    /// False for empty or malformed names; never errors.
    pub fn exists(&self, name: &str) -> bool {
        !name.is_empty() && self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reassignment_may_change_type() {
        let mut vars = Variables::new();
        vars.assign("n", Value::Int(3)).unwrap();
        assert_eq!(vars.get_int("n").unwrap(), 3);
        vars.assign("n", Value::Bool(true)).unwrap();
        assert!(vars.get_bool("n").unwrap());
        assert!(matches!(vars.get_int("n"), Err(WallError::TypeMismatch { .. })));
    }

    #[test]
    fn rejects_bad_and_reserved_names() {
        let mut vars = Variables::new();
        assert_eq!(
            vars.assign("2x", Value::Int(1)),
            Err(WallError::InvalidIdentifier("2x".into()))
        );
        assert!(vars.assign("Fill", Value::Int(1)).is_err());
        assert!(vars.assign("true", Value::Int(1)).is_err());
        assert!(vars.assign("step-size", Value::Int(1)).is_ok());
    }

    #[test]
    fn missing_names() {
        let vars = Variables::new();
        assert_eq!(vars.get("x"), Err(WallError::UndefinedVariable("x".into())));
        assert!(!vars.exists(""));
        assert!(!vars.exists("x"));
    }

    #[test]
    fn iterates_in_name_order() {
        let mut vars = Variables::new();
        vars.assign("zeta", Value::Int(1)).unwrap();
        vars.assign("alpha", Value::Bool(false)).unwrap();
        let entries: Vec<_> = vars.iter().collect();
        assert_eq!(entries, vec![("alpha", Value::Bool(false)), ("zeta", Value::Int(1))]);
    }
}
