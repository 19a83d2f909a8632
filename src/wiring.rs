//! Shared Instance Registration
//!
//! Publishes the shared [`DelayHelper`] into a [`ComponentRegistry`] under its
//! well-known name. Applications call [`register_delay_helper`] once during
//! startup; everything resolving `"delayHelper"` afterwards observes the same
//! instance the accessor returns.

use std::sync::Arc;

use crate::helper::{DelayError, DelayHelper};
use crate::registry::ComponentRegistry;

/// Name the shared delay helper is registered under
pub const DELAY_HELPER: &str = "delayHelper";

/// Register the shared [`DelayHelper`] under [`DELAY_HELPER`]
///
/// Returns the shared handle so the caller can keep using it directly.
/// Calling this more than once re-registers the identical instance.
///
/// # Errors
///
/// [`DelayError::SingletonUnavailable`] if the shared instance has not been
/// constructed yet and this call was made outside a tokio runtime.
pub fn register_delay_helper(registry: &ComponentRegistry) -> Result<Arc<DelayHelper>, DelayError> {
    let helper = DelayHelper::shared()?;
    registry.register(DELAY_HELPER, Arc::clone(&helper));
    Ok(helper)
}
