use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use weft_flyweight::FlyweightCache;

struct TreeKind {
    name: &'static str,
    color: &'static str,
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cache = FlyweightCache::new();

    let positions = [("Oak", "green", 1, 2), ("Oak", "green", 5, 5), ("Oak", "blue", 9, 0), ("Pine", "dark", 3, 7)];

    for (name, color, x, y) in positions {
        let kind = cache.get_or_create(format!("{name}_{color}"), || TreeKind { name, color });
        info!(x, y, name = kind.name, color = kind.color, shared = Arc::strong_count(&kind) > 1, "planted");
    }

    info!(distinct_kinds = cache.size(), "forest complete");
}
