//! Built-in extractors for specific issuers.
//!
//! Each module exposes plain functions; [`register_all`] is the single place
//! that decides which of them a registry runs.

pub mod aaisp;
pub mod hetzner;
pub mod hl;
pub mod scaleway;
pub mod soenergy;

use crate::renamer::Registry;

/// Register every built-in extractor, in a stable order.
pub fn register_all(registry: &mut Registry) -> &mut Registry {
    registry
        .register_fn("aaisp.invoice", aaisp::invoice)
        .register_fn("hetzner.invoice", hetzner::invoice)
        .register_fn("hl.tax_certificate", hl::tax_certificate)
        .register_fn("scaleway.invoice", scaleway::invoice)
        .register_legacy("soenergy.statement", soenergy::statement)
}

/// A registry holding all built-in extractors.
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    register_all(&mut registry);
    registry
}
