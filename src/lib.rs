//! Delay Helper - Shared Delay Scheduling for Bot Components
//!
//! This crate provides a process-wide delay scheduler and a set of
//! delayed-messaging wrappers built on top of it. A bot application uses it to
//! fire work after a delay (reminders, timed replies, scheduled moderation
//! actions) without holding up the caller.
//!
//! # Architecture
//!
//! ```text
//!                    ComponentRegistry
//!                   ┌─────────────────────────────────────┐
//!                   │ "delayHelper" ──► Arc<DelayHelper>  │
//!                   └───────────────┬─────────────────────┘
//!                                   │ resolve
//!            ┌──────────────────────┼──────────────────────┐
//!            │                      │                      │
//!     ┌──────▼──────┐       ┌───────▼──────┐       ┌───────▼──────┐
//!     │ DelaySender │       │ DelaySetter  │       │ direct users │
//!     │ (messages)  │       │ (moderation) │       │ delay_task() │
//!     └──────┬──────┘       └───────┬──────┘       └───────┬──────┘
//!            │                      │                      │
//!            └──────────────────────┴──────────────────────┘
//!                                   │
//!                         DelayHelper::launch
//!                     sleep(delay) then run the task
//! ```
//!
//! # Key Types
//!
//! - [`DelayHelper`]: the scheduler; one shared instance per process
//! - [`ComponentRegistry`]: named registry the shared instance is published to
//! - [`DelaySender`] / [`DelaySetter`]: wrappers that delay every messaging
//!   operation and acknowledge immediately
//! - [`TimeUnit`]: millis/seconds/minutes/hours conversions
//!
//! # Quick Start
//!
//! ```ignore
//! use delay_helper::{register_delay_helper, ComponentRegistry, DelayHelper, DELAY_HELPER};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = ComponentRegistry::new();
//!
//!     // Publish the shared instance under its well-known name.
//!     let helper = register_delay_helper(&registry).unwrap();
//!
//!     // Anything holding the registry can resolve the same instance.
//!     let resolved = registry.resolve::<DelayHelper>(DELAY_HELPER).unwrap();
//!     assert!(std::sync::Arc::ptr_eq(&helper, &resolved));
//!
//!     // Fire a task in five seconds.
//!     helper.delay_task(|| println!("hello, later"), 5, delay_helper::TimeUnit::Seconds);
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`helper`]: the [`DelayHelper`] scheduler and the shared instance
//! - [`registry`]: named component registry with typed resolution
//! - [`wiring`]: registration of the shared instance under `"delayHelper"`
//! - [`messaging`]: the sender/setter traits the wrappers decorate
//! - [`delayed`]: [`DelaySender`] and [`DelaySetter`] wrappers
//! - [`config`]: environment and TOML configuration
//!
//! # No UI, No Transport
//!
//! This crate is pure scheduling logic. It has no opinion about how messages
//! reach a chat platform; it only decorates whatever sender the application
//! already has.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod delayed;
pub mod helper;
pub mod messaging;
pub mod registry;
pub mod wiring;

// Re-exports for convenience
pub use config::{default_config_path, load_config, load_config_from_path, ConfigError, DelayConfig};
pub use delayed::{AdjustableDelay, DelaySender, DelaySetter};
pub use helper::{DelayError, DelayHelper, TimeUnit};
pub use messaging::{ActionSetter, GroupAddRequestType, MessageSender};
pub use registry::{ComponentRegistry, RegistryError};
pub use wiring::{register_delay_helper, DELAY_HELPER};
