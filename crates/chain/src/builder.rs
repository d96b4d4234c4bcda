use crate::component::{BaseComponent, Component};
use crate::envelope::Envelope;
use crate::error::ChainError;
use crate::stage::{Mismatch, MismatchHook, Stage};
use crate::transform::Transform;
use arc_swap::ArcSwap;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// The outermost handle over an assembled chain.
///
/// Built once, topology immutable thereafter. `write` pushes a payload
/// through every stage's forward transform down to the base; `read` pulls
/// the stored value back out through every inverse. For any stage ordering,
/// `read` after `write` returns the original payload.
pub struct Chain {
    outer: Box<dyn Component>,
    storage: Arc<ArcSwap<Envelope>>,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    pub fn write(&self, payload: impl Into<Bytes>) {
        self.outer.write(Envelope::new(payload));
    }

    pub fn read(&self) -> Bytes {
        self.outer.read().into_payload()
    }

    /// The at-rest representation held by the base, transforms included.
    pub fn stored(&self) -> Envelope {
        self.storage.load().as_ref().clone()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("stored", self.storage.load().as_ref()).finish_non_exhaustive()
    }
}

/// Assembles a [`Chain`] from a base and an ordered list of transforms.
///
/// List order is wrapping order: the first `stage` call wraps closest to the
/// base, the last one becomes the outermost layer. The last listed transform
/// is therefore the first applied on `write` and the last undone on `read`.
pub struct ChainBuilder {
    base: Option<BaseComponent>,
    stages: Vec<Box<dyn Transform>>,
    hook: Option<MismatchHook>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self { base: None, stages: Vec::new(), hook: None }
    }

    pub fn base(mut self, base: BaseComponent) -> Self {
        self.base = Some(base);
        self
    }

    pub fn stage<T>(mut self, transform: T) -> Self
    where
        T: Transform + 'static,
    {
        self.stages.push(Box::new(transform));
        self
    }

    /// Installs a diagnostic callback invoked whenever any stage degrades
    /// instead of transforming.
    pub fn on_mismatch<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Mismatch) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<Chain, ChainError> {
        let Self { base, stages, hook } = self;
        let base = base.ok_or(ChainError::MissingBase)?;
        let storage = base.storage();

        let mut outer: Box<dyn Component> = Box::new(base);
        for transform in stages {
            outer = Box::new(Stage::boxed(transform, outer, hook.clone()));
        }

        Ok(Chain { outer, storage })
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("has_base", &self.base.is_some())
            .field("stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Compression, IdentityTransform, XorCipher};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn compress_then_encrypt() -> Chain {
        Chain::builder()
            .base(BaseComponent::new())
            .stage(Compression::gzip())
            .stage(XorCipher::new(*b"orchid"))
            .build()
            .expect("base supplied")
    }

    #[test]
    fn write_then_read_round_trips() {
        let chain = compress_then_encrypt();

        chain.write("Ok");

        assert_eq!(chain.read(), "Ok");
    }

    #[test]
    fn stored_value_differs_from_the_original() {
        let chain = compress_then_encrypt();

        chain.write("Ok");

        let stored = chain.stored();
        assert_ne!(stored.payload().as_ref(), b"Ok");
        // outermost stage applies first on write, so its tag sits at the bottom
        assert_eq!(stored.applied(), ["xor", "gzip"]);
    }

    #[test]
    fn both_orderings_round_trip_but_store_differently() {
        let compress_first = compress_then_encrypt();
        let encrypt_first = Chain::builder()
            .base(BaseComponent::new())
            .stage(XorCipher::new(*b"orchid"))
            .stage(Compression::gzip())
            .build()
            .expect("base supplied");

        compress_first.write("Ok");
        encrypt_first.write("Ok");

        assert_eq!(compress_first.read(), "Ok");
        assert_eq!(encrypt_first.read(), "Ok");
        assert_ne!(compress_first.stored().payload(), encrypt_first.stored().payload());
    }

    #[test]
    fn read_is_idempotent() {
        let chain = compress_then_encrypt();

        chain.write("stable");

        assert_eq!(chain.read(), chain.read());
        assert_eq!(chain.read(), "stable");
    }

    #[test]
    fn later_write_replaces_earlier_payload() {
        let chain = compress_then_encrypt();

        chain.write("first");
        chain.write("second");

        assert_eq!(chain.read(), "second");
    }

    #[test]
    fn chain_without_stages_is_just_the_base() {
        let chain = Chain::builder().base(BaseComponent::new()).build().expect("base supplied");

        chain.write("raw");

        assert_eq!(chain.read(), "raw");
        assert_eq!(chain.stored().payload().as_ref(), b"raw");
    }

    #[test]
    fn missing_base_is_rejected_at_build_time() {
        let result = Chain::builder().stage(IdentityTransform).build();

        assert!(matches!(result, Err(ChainError::MissingBase)));
    }

    #[test]
    fn misassembled_reader_degrades_and_reports() {
        let base = BaseComponent::new();
        let shared = base.clone();

        let writer = Chain::builder().base(base).stage(Compression::gzip()).build().expect("base supplied");

        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&mismatches);
        let reader = Chain::builder()
            .base(shared)
            .stage(XorCipher::new(*b"orchid"))
            .on_mismatch(move |mismatch| sink.lock().expect("sink lock poisoned").push(mismatch.clone()))
            .build()
            .expect("base supplied");

        writer.write("payload");

        // the xor stage finds a gzip marker on top and must not touch the data
        assert_eq!(reader.read(), writer.stored().payload());
        let seen = mismatches.lock().expect("sink lock poisoned");
        assert_eq!(*seen, [Mismatch::Marker { stage: "xor", found: Some("gzip") }]);
    }

    #[test]
    fn hook_stays_quiet_on_a_well_formed_chain() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let chain = Chain::builder()
            .base(BaseComponent::new())
            .stage(Compression::deflate())
            .stage(XorCipher::new(*b"k"))
            .on_mismatch(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .expect("base supplied");

        chain.write("quiet");
        assert_eq!(chain.read(), "quiet");
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn four_layer_chain_round_trips() {
        let chain = Chain::builder()
            .base(BaseComponent::new())
            .stage(Compression::zstd())
            .stage(XorCipher::new(*b"inner"))
            .stage(Compression::br())
            .stage(XorCipher::new(*b"outer"))
            .build()
            .expect("base supplied");

        chain.write("layer upon layer upon layer");

        assert_eq!(chain.read(), "layer upon layer upon layer");
        assert_eq!(chain.stored().applied(), ["xor", "br", "xor", "zstd"]);
    }
}
