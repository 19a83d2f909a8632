//! Accessor behavior outside a tokio runtime
//!
//! Kept in its own test binary: the shared instance is process-wide, so these
//! assertions only hold while no sibling test has constructed it first.

use delay_helper::{register_delay_helper, ComponentRegistry, DelayError, DelayHelper};

#[test]
fn test_shared_unavailable_without_runtime() {
    assert_eq!(
        DelayHelper::shared().err(),
        Some(DelayError::SingletonUnavailable)
    );

    // The failure leaves the slot empty, so the same error repeats instead of
    // a half-built instance surfacing.
    assert_eq!(
        DelayHelper::shared().err(),
        Some(DelayError::SingletonUnavailable)
    );

    // Registration propagates the failure and registers nothing.
    let registry = ComponentRegistry::new();
    assert_eq!(
        register_delay_helper(&registry).err(),
        Some(DelayError::SingletonUnavailable)
    );
    assert!(registry.is_empty());
}
