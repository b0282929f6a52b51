//! Placeholder names for classes declared without `= name`.

use crate::ast::Span;

/// Supplies a fresh, unique name for each unnamed class declaration.
pub trait NameSource {
    /// `at` is the span of the directive that opened the declaration.
    fn next_name(&mut self, at: Span) -> String;
}

/// Deterministic counter: `__class_0`, `__class_1`, ...
#[derive(Debug, Clone)]
pub struct SequentialNames {
    prefix: String,
    next: u64,
}

impl SequentialNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialNames {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialNames {
    fn default() -> Self {
        SequentialNames::new("__class_")
    }
}

impl NameSource for SequentialNames {
    fn next_name(&mut self, _at: Span) -> String {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_names_are_unique_and_reproducible() {
        let mut a = SequentialNames::default();
        let mut b = SequentialNames::default();
        let first = a.next_name(Span::new(0, 1));
        let second = a.next_name(Span::new(0, 1));
        assert_ne!(first, second);
        assert_eq!(b.next_name(Span::new(9, 10)), first);
    }
}
