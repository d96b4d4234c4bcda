use crate::envelope::Envelope;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// The subject contract every link of a chain satisfies.
///
/// Topology is immutable after assembly, so both operations take `&self`;
/// the only mutable state lives behind the base component's storage.
pub trait Component: Send + Sync {
    fn write(&self, envelope: Envelope);

    fn read(&self) -> Envelope;
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn write(&self, envelope: Envelope) {
        (**self).write(envelope);
    }

    fn read(&self) -> Envelope {
        (**self).read()
    }
}

/// The innermost component: holds the payload at rest.
///
/// Storage is a whole-envelope atomic snapshot, so a `write` can never be
/// observed half-applied and `read` never blocks writers. Cloning a
/// `BaseComponent` yields another handle onto the *same* storage.
#[derive(Clone)]
pub struct BaseComponent {
    stored: Arc<ArcSwap<Envelope>>,
}

impl BaseComponent {
    pub fn new() -> Self {
        Self { stored: Arc::new(ArcSwap::from_pointee(Envelope::default())) }
    }

    pub(crate) fn storage(&self) -> Arc<ArcSwap<Envelope>> {
        Arc::clone(&self.stored)
    }
}

impl Default for BaseComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for BaseComponent {
    fn write(&self, envelope: Envelope) {
        self.stored.store(Arc::new(envelope));
    }

    fn read(&self) -> Envelope {
        self.stored.load().as_ref().clone()
    }
}

impl fmt::Debug for BaseComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseComponent").field("stored", self.stored.load().as_ref()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn stores_and_returns_the_whole_envelope() {
        let base = BaseComponent::new();

        base.write(Envelope::new("payload"));

        let envelope = base.read();
        assert_eq!(envelope.payload(), &Bytes::from_static(b"payload"));
        assert!(envelope.applied().is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let base = BaseComponent::new();
        let handle = base.clone();

        base.write(Envelope::new("seen by both"));

        assert_eq!(handle.read(), base.read());
    }

    #[test]
    fn later_write_replaces_earlier() {
        let base = BaseComponent::new();

        base.write(Envelope::new("first"));
        base.write(Envelope::new("second"));

        assert_eq!(base.read().into_payload(), Bytes::from_static(b"second"));
    }
}
