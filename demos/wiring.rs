//! Wires a small application through the shared registry.
//!
//! Run with
//! `cargo run --example wiring`

use sky_resolver::{shared, Registry, ResolveError};
use std::sync::Arc;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

struct AuditLog {
    clock: Arc<dyn Clock>,
}

impl AuditLog {
    fn record(&self, message: &str) {
        println!("[{}] {}", self.clock.now(), message);
    }
}

struct Egg;
struct Chicken;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Shared instance for application wiring
    shared()
        .register(|| Arc::new(FixedClock(1_700_000_000)) as Arc<dyn Clock>)
        .unwrap();
    shared()
        .register(|| AuditLog { clock: shared().resolve_required() })
        .unwrap();

    let audit = shared().resolve::<AuditLog>().unwrap();
    audit.record("application wired");

    if let Err(err) = shared().register(|| Arc::new(FixedClock(0)) as Arc<dyn Clock>) {
        println!("{} ({})", err, err.recovery_suggestion());
    }

    // Independent registry with logging, showing cycle detection
    let registry = Arc::new(Registry::builder().logging().build());

    let r = registry.clone();
    registry
        .register(move || {
            let _ = r.resolve::<Chicken>();
            Egg
        })
        .unwrap();

    let r = registry.clone();
    registry
        .register(move || {
            if let Err(err @ ResolveError::CircularDependency(_)) = r.resolve::<Egg>() {
                println!("{}: {}", err, err.failure_reason());
            }
            Chicken
        })
        .unwrap();

    registry.resolve::<Egg>().unwrap();
}
