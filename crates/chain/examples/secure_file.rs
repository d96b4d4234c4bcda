use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use weft_chain::transform::{Compression, XorCipher};
use weft_chain::{BaseComponent, Chain};

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let chain = Chain::builder()
        .base(BaseComponent::new())
        .stage(Compression::gzip())
        .stage(XorCipher::new(*b"orchid"))
        .on_mismatch(|mismatch| info!(stage = mismatch.stage(), "stage degraded"))
        .build()
        .expect("chain has a base");

    let content = "quarterly numbers: up and to the right";
    chain.write(content);

    let stored = chain.stored();
    info!(at_rest = stored.payload().len(), layers = ?stored.applied(), "content written");

    let restored = chain.read();
    let round_trip = restored == content;
    info!(round_trip, "content read back");
}
