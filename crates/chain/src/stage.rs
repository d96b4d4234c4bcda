use crate::component::Component;
use crate::envelope::Envelope;
use crate::transform::Transform;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// One wrapping layer: a transform applied around exactly one inner component.
///
/// On `write` the stage applies its forward transform and records its tag
/// before handing the envelope inward; on `read` it asks the inner component
/// first and undoes its own transform on the way out, but only when the
/// outermost recorded tag is its own. A stage whose transform fails, or whose
/// tag is not on top of the record, leaves the envelope untouched; the rest
/// of the chain still round-trips, since an unapplied transform is never
/// inverted.
pub struct Stage<C> {
    transform: Box<dyn Transform>,
    inner: C,
    hook: Option<MismatchHook>,
}

/// Callback invoked whenever a stage degrades instead of transforming.
pub type MismatchHook = Arc<dyn Fn(&Mismatch) + Send + Sync>;

/// Why a stage passed an envelope through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The outermost recorded tag was not this stage's own.
    Marker { stage: &'static str, found: Option<&'static str> },

    /// The forward transform rejected the payload.
    Forward { stage: &'static str, reason: String },

    /// The inverse transform rejected the payload.
    Inverse { stage: &'static str, reason: String },
}

impl Mismatch {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Marker { stage, .. } | Self::Forward { stage, .. } | Self::Inverse { stage, .. } => *stage,
        }
    }
}

impl<C: Component> Stage<C> {
    pub fn new<T>(transform: T, inner: C) -> Self
    where
        T: Transform + 'static,
    {
        Self::boxed(Box::new(transform), inner, None)
    }

    pub(crate) fn boxed(transform: Box<dyn Transform>, inner: C, hook: Option<MismatchHook>) -> Self {
        Self { transform, inner, hook }
    }

    fn report(&self, mismatch: &Mismatch) {
        match mismatch {
            Mismatch::Marker { stage, found } => warn!(stage, ?found, "marker mismatch, inverse skipped"),
            Mismatch::Forward { stage, reason } => warn!(stage, reason = %reason, "forward transform failed, payload unchanged"),
            Mismatch::Inverse { stage, reason } => warn!(stage, reason = %reason, "inverse transform failed, payload unchanged"),
        }
        if let Some(hook) = &self.hook {
            hook(mismatch);
        }
    }
}

impl<C: Component> Component for Stage<C> {
    fn write(&self, mut envelope: Envelope) {
        let tag = self.transform.tag();
        match self.transform.apply(envelope.payload().clone()) {
            Ok(transformed) => {
                trace!(stage = tag, "forward transform applied");
                envelope.record(transformed, tag);
            }
            Err(err) => self.report(&Mismatch::Forward { stage: tag, reason: err.to_string() }),
        }
        self.inner.write(envelope);
    }

    fn read(&self) -> Envelope {
        let mut envelope = self.inner.read();
        let tag = self.transform.tag();
        match envelope.outermost() {
            Some(outermost) if outermost == tag => match self.transform.invert(envelope.payload().clone()) {
                Ok(restored) => {
                    trace!(stage = tag, "inverse transform applied");
                    envelope.unrecord(restored);
                }
                Err(err) => self.report(&Mismatch::Inverse { stage: tag, reason: err.to_string() }),
            },
            found => self.report(&Mismatch::Marker { stage: tag, found }),
        }
        envelope
    }
}

impl<C> fmt::Debug for Stage<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage").field("transform", &self.transform.tag()).finish_non_exhaustive()
    }
}
