//! A keyed registry that deduplicates shared immutable state
//!
//! This crate provides [`FlyweightCache`], a map from intrinsic-state keys to
//! shared instances. Requesting the same key twice returns the *same* owned
//! instance both times; the construction closure runs at most once per
//! distinct key for the lifetime of the cache.
//!
//! Values must hold intrinsic state only, attributes shared identically
//! across every logical use. Per-use (extrinsic) state stays with the caller
//! and is passed into operations at the point of use, never cached.
//!
//! # Example
//!
//! ```
//! use weft_flyweight::FlyweightCache;
//!
//! struct TreeKind {
//!     name: &'static str,
//!     color: &'static str,
//! }
//!
//! let cache = FlyweightCache::new();
//!
//! let oak = cache.get_or_create("Oak_green".to_string(), || TreeKind { name: "Oak", color: "green" });
//! let same_oak = cache.get_or_create("Oak_green".to_string(), || unreachable!("already cached"));
//!
//! assert!(std::sync::Arc::ptr_eq(&oak, &same_oak));
//! assert_eq!(cache.size(), 1);
//! assert_eq!(same_oak.name, "Oak");
//! assert_eq!(same_oak.color, "green");
//! ```

mod cache;

pub use cache::FlyweightCache;
