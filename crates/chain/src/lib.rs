//! Ordered, invertible transform stages composed around a base component
//!
//! This crate composes independent payload concerns (compression,
//! obfuscation, anything expressible as a forward transform with an inverse)
//! around a single storage component, without modifying the component or the
//! other stages.
//!
//! A [`Chain`] is assembled once, innermost first: the [`BaseComponent`]
//! holds the payload at rest, and each [`Stage`] wraps exactly one inner
//! component. Writing flows outermost-in, each stage applying its forward
//! transform before handing the payload inward; reading flows innermost-out,
//! each stage undoing its own transform on the way back. For every stage
//! ordering, `read` after `write` returns the original payload.
//!
//! Each payload travels in an [`Envelope`] that records which stage tags have
//! been applied, in order. A stage only inverts when the outermost recorded
//! tag is its own; otherwise it passes the envelope through untouched and
//! reports the mismatch through an optional diagnostic hook. Misassembled
//! chains therefore degrade instead of corrupting data.
//!
//! # Example
//!
//! ```
//! use weft_chain::transform::{Compression, XorCipher};
//! use weft_chain::{BaseComponent, Chain};
//!
//! let chain = Chain::builder()
//!     .base(BaseComponent::new())
//!     .stage(Compression::gzip())
//!     .stage(XorCipher::new(*b"orchid"))
//!     .build()
//!     .expect("chain has a base");
//!
//! chain.write("attack at dawn");
//!
//! assert_eq!(chain.read(), "attack at dawn");
//! assert_ne!(chain.stored().payload().as_ref(), b"attack at dawn");
//! ```

mod builder;
mod component;
mod envelope;
mod error;
mod stage;

pub mod transform;

pub use builder::{Chain, ChainBuilder};
pub use component::{BaseComponent, Component};
pub use envelope::Envelope;
pub use error::{ChainError, StageError};
pub use stage::{Mismatch, MismatchHook, Stage};
