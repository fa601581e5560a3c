//! Protocol dispatch: factories, registry, builder
//!
//! Protocol plugin crates implement [`SessionFactory`] and install it into a
//! [`SessionRegistry`] at process start. Callers then resolve destination
//! URIs through the registry:
//!
//! ```text
//!   registry.make("srt://host:9000")        scheme is the dispatch key
//!       -> SessionBuilder                   accumulate mode/config
//!       -> build()                          first matching factory wins
//!       -> Session                          connect/retry/state machine
//! ```
//!
//! A URI whose scheme no installed factory claims is a configuration error
//! surfaced synchronously at `build()`, never a retryable condition.

pub mod builder;
pub mod factory;
pub mod store;

pub use builder::SessionBuilder;
pub use factory::SessionFactory;
pub use store::SessionRegistry;
