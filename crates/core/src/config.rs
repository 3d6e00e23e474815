use std::collections::BTreeMap;

/// Settings for an [`Evaluator`](crate::Evaluator) and the cursors it hands out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryConfig {
    /// Emits a `log::trace!` record for every cursor movement, under the
    /// `astpath::cursor` target.
    ///
    /// Defaults to `false`.
    pub trace: bool,
    /// Appends a `src` attribute holding the node's source text after the scalar
    /// fields, as in `//*[@src='print']`.
    ///
    /// Defaults to `false`.
    pub source_attribute: bool,
    /// String values bound to `$name` references in expressions.
    ///
    /// Defaults to no bindings.
    pub variables: BTreeMap<String, String>,
}

impl QueryConfig {
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_source_attribute(mut self, enabled: bool) -> Self {
        self.source_attribute = enabled;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}
