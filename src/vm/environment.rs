use crate::vm::Value;

use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    map: HashMap<String, Value>,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self
            .map
            .iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(key, value)| format!("{} -> {}", key, value))
            .join(", ");

        write!(f, "{{ {} }}", map)
    }
}

impl Environment {
    pub fn empty() -> Environment {
        Environment {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn set<S: Into<String>>(&mut self, name: S, value: Value) {
        self.map.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str).sorted()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut env = Environment::empty();
        env.set("x", Value::Scalar(1.0));
        env.set("x", Value::Boolean(true));

        assert_eq!(env.len(), 1);
        assert_eq!(env.get("x"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn display_is_sorted() {
        let mut env = Environment::empty();
        env.set("b", Value::Scalar(0.5));
        env.set("a", Value::Boolean(false));

        assert_eq!(env.to_string(), "{ a -> false, b -> 0.5 }");
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
