//! Sequences and the catalog they are selected from

use crate::domain::test_case::TestCase;
use crate::domain::DomainError;

/// An ordered list of case instances for one run.
///
/// Consumed by the sequencer, so an instance never runs twice.
pub struct Sequence {
    name: String,
    cases: Vec<Box<dyn TestCase>>,
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("name", &self.name)
            .field("cases", &self.cases.len())
            .finish()
    }
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    pub fn from_cases(name: impl Into<String>, cases: Vec<Box<dyn TestCase>>) -> Self {
        Self {
            name: name.into(),
            cases,
        }
    }

    pub fn with_case(mut self, case: impl TestCase + 'static) -> Self {
        self.cases.push(Box::new(case));
        self
    }

    pub fn push(&mut self, case: Box<dyn TestCase>) {
        self.cases.push(case);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Box<dyn TestCase>>) {
        (self.name, self.cases)
    }
}

/// Builds fresh case instances for a named sequence
pub type SequenceBuilder = Box<dyn Fn() -> Vec<Box<dyn TestCase>> + Send + Sync>;

/// Named sequences keyed by purpose ("passes", "fails", ...), in
/// registration order
#[derive(Default)]
pub struct SequenceCatalog {
    entries: Vec<(String, SequenceBuilder)>,
    default_name: Option<String>,
}

impl std::fmt::Debug for SequenceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceCatalog")
            .field("names", &self.names())
            .field("default_name", &self.default_name)
            .finish()
    }
}

impl SequenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sequence; re-registering a name replaces it
    pub fn register<F>(mut self, name: impl Into<String>, builder: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn TestCase>> + Send + Sync + 'static,
    {
        let name = name.into();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, Box::new(builder)));
        self
    }

    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default_name
            .as_deref()
            .or_else(|| self.entries.first().map(|(name, _)| name.as_str()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Build a fresh sequence; `None` selects the default
    pub fn build(&self, name: Option<&str>) -> Result<Sequence, DomainError> {
        let name = name
            .or(self.default_name())
            .ok_or_else(|| DomainError::not_found("Sequence catalog is empty"))?;

        let (name, builder) = self
            .entries
            .iter()
            .find(|(existing, _)| existing == name)
            .ok_or_else(|| DomainError::not_found(format!("Sequence '{}' not found", name)))?;

        Ok(Sequence::from_cases(name.clone(), builder()))
    }
}
