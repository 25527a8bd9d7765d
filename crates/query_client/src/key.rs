use std::fmt;

/// Ordered list of string segments identifying a cached query.
///
/// Keys compare segment-wise; invalidation and removal match by prefix, so `["todos"]` covers
/// `["todos", "42"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Builds a key from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns the key segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` when `prefix` is a leading slice of this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns a new key with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl From<&str> for QueryKey {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching_is_segment_wise() {
        let todos = QueryKey::from("todos");
        let one = todos.child("42");

        assert!(one.starts_with(&todos));
        assert!(todos.starts_with(&todos));
        assert!(!todos.starts_with(&one));
        assert!(!QueryKey::from("todosx").starts_with(&todos));
        assert!(one.starts_with(&QueryKey::default()));
    }

    #[test]
    fn display_lists_segments() {
        assert_eq!(QueryKey::new(["todos", "42"]).to_string(), "[todos, 42]");
    }
}
