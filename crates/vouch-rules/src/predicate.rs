//! The interface between rules and leaf string checks.

/// A yes/no question about the text form of a value.
///
/// Any `Fn(&str) -> bool` is a `StringPredicate`, so external validator
/// libraries plug in through [`RuleCreator::text`](crate::RuleCreator::text)
/// without adapters.
pub trait StringPredicate: Send + Sync {
    fn test(&self, text: &str) -> bool;
}

impl<F> StringPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn test(&self, text: &str) -> bool {
        self(text)
    }
}
