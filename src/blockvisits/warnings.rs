//! Explicit warning collection for the resolution pipeline.
//!
//! Warnings are operator-facing notes about data the pipeline handled but
//! distrusts. They are carried in the result instead of process-wide state,
//! so parallel per-night runs cannot interleave their messages.

/// Collects non-fatal warnings raised while resolving one night.
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<String>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning. Does not alter control flow.
    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut collector = WarningCollector::new();
        assert!(collector.is_empty());
        collector.record_warning("first");
        collector.record_warning(String::from("second"));
        assert_eq!(collector.warnings(), ["first", "second"]);
        assert_eq!(collector.into_warnings(), vec!["first", "second"]);
    }
}
