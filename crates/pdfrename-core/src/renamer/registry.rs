//! Extractor registry and dispatch.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn, Span};

use super::{Extractor, ExtractorResult, FnExtractor, LegacyExtractor, Outcome};
use crate::error::DispatchError;
use crate::models::NameComponents;
use crate::pdf::{Document, TextBoxes};

/// A successful extractor evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Name of the extractor that matched.
    pub extractor: String,
    pub components: NameComponents,
}

/// Ordered collection of extractors.
///
/// Built once before processing; registration order is evaluation order.
#[derive(Default)]
pub struct Registry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, extractor: impl Extractor + 'static) -> &mut Self {
        debug!("registering extractor {}", extractor.name());
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Register a function over the whole document.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&Document) -> ExtractorResult + Send + Sync + 'static,
    {
        self.register(FnExtractor::new(name, func))
    }

    /// Register a function over the first page's text boxes.
    pub fn register_legacy<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&TextBoxes, &Span) -> ExtractorResult + Send + Sync + 'static,
    {
        self.register(LegacyExtractor::new(name, func))
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Extractor names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.extractors.iter().map(|e| e.name())
    }

    /// Evaluate every extractor against `document`, in order.
    ///
    /// An extractor that reports a malformed document or panics is logged
    /// and skipped; it never stops the others from running.
    pub fn try_all(&self, document: &Document) -> Vec<Match> {
        let mut matches = Vec::new();

        for extractor in &self.extractors {
            let name = extractor.name();
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| extractor.evaluate(document)));

            match outcome {
                Ok(Outcome::Matched(components)) => {
                    debug!("{}: matched by {}: {:?}", document.origin(), name, components);
                    matches.push(Match {
                        extractor: name.to_string(),
                        components,
                    });
                }
                Ok(Outcome::NotApplicable) => {}
                Ok(Outcome::Malformed(reason)) => {
                    warn!("{}: extractor {} failed: {}", document.origin(), name, reason);
                }
                Err(payload) => {
                    let reason = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    warn!("{}: extractor {} panicked: {}", document.origin(), name, reason);
                }
            }
        }

        matches
    }

    /// Name `document`, requiring that at most one extractor matches.
    pub fn dispatch(&self, document: &Document) -> Result<Option<NameComponents>, DispatchError> {
        let mut matches = self.try_all(document);

        if matches.len() > 1 {
            let extractors: Vec<String> = matches.into_iter().map(|m| m.extractor).collect();
            warn!(
                "{}: multiple extractors matched: {}",
                document.origin(),
                extractors.join(", ")
            );
            return Err(DispatchError::Ambiguous {
                origin: document.origin().to_string(),
                extractors,
            });
        }

        Ok(matches.pop().map(|m| m.components))
    }
}
