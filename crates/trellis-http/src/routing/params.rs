//! Path parameter bag bound onto each request before its handler runs

use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while reading path parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Missing parameter: {0}")]
    Missing(String),
    #[error("Invalid parameter format: {0}")]
    InvalidFormat(String),
}

/// Ordered collection of path parameters
///
/// Names keep the order in which the matching pattern declared them.
/// Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: Vec<(String, String)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Insert or replace a parameter
    pub fn insert<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    /// Get parameter value as string
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get parameter value as typed value
    pub fn get_typed<T>(&self, name: &str) -> Result<T, ParamError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self
            .get(name)
            .ok_or_else(|| ParamError::Missing(name.to_string()))?;
        value.parse::<T>().map_err(|e| {
            ParamError::InvalidFormat(format!(
                "Cannot convert parameter '{}' value '{}': {}",
                name, value, e
            ))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = PathParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_declaration_order() {
        let mut params = PathParams::new();
        params.insert("user", "7");
        params.insert("post", "hello");
        assert_eq!(params.names(), vec!["user", "post"]);
    }

    #[test]
    fn test_insert_replaces_existing_value() {
        let mut params = PathParams::new();
        params.insert("id", "1");
        params.insert("id", "2");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("2"));
    }

    #[test]
    fn test_typed_access() {
        let params: PathParams = vec![("id", "42"), ("slug", "abc")].into_iter().collect();
        assert_eq!(params.get_typed::<u32>("id").unwrap(), 42);
        assert!(matches!(
            params.get_typed::<u32>("slug"),
            Err(ParamError::InvalidFormat(_))
        ));
        assert_eq!(
            params.get_typed::<u32>("missing"),
            Err(ParamError::Missing("missing".to_string()))
        );
    }
}
