//! Engine-level error types

use std::collections::TryReserveError;
use thiserror::Error;

/// Fatal startup errors
///
/// Every variant is unrecoverable: the system cannot run without a resolved
/// entity template or without its pre-sized query and result buffers, so
/// callers are expected to report the diagnostic and abort.
#[derive(Error, Debug)]
pub enum InitError {
    /// The entity template could not be resolved by the template source
    #[error("entity template is not registered with the template source")]
    TemplateUnresolved,

    /// A startup buffer could not be allocated
    #[error("failed to allocate the {what} ({capacity} slots)")]
    BufferAllocation {
        /// Which buffer failed to allocate
        what: &'static str,
        /// Requested slot count
        capacity: usize,
        /// Underlying allocator error
        #[source]
        source: TryReserveError,
    },
}
