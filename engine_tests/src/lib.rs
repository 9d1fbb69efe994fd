//! Shared helpers for the integration tests: log capture and seeded
//! samplers for math properties.

use std::sync::{Arc, Mutex};

use engine_core::math::{Mat4, Quat, Vec3, PI};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Installs a test-writer fmt subscriber once per process. Safe to call
/// from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Per-level event counts and messages seen by a [`CaptureLayer`].
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CapturedLogs {
    pub fn count(&self, level: Level) -> usize {
        self.events
            .lock()
            .map(|e| e.iter().filter(|(l, _)| *l == level).count())
            .unwrap_or(0)
    }

    /// Events at `level` whose message contains `needle`.
    pub fn matching(&self, level: Level, needle: &str) -> usize {
        self.events
            .lock()
            .map(|e| {
                e.iter()
                    .filter(|(l, m)| *l == level && m.contains(needle))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Whether any event at `level` has a message containing `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.events
            .lock()
            .map(|e| e.iter().any(|(l, m)| *l == level && m.contains(needle)))
            .unwrap_or(false)
    }
}

struct CaptureLayer {
    logs: CapturedLogs,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if let Ok(mut events) = self.logs.events.lock() {
            events.push((*event.metadata().level(), visitor.0));
        }
    }
}

/// Runs `f` with a capturing subscriber as the thread default and returns
/// its result with everything it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer { logs: logs.clone() });
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs)
}

/// Deterministic samplers for property checks.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn scalar(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    pub fn vec3(&mut self, extent: f32) -> Vec3 {
        Vec3::new(
            self.scalar(-extent, extent),
            self.scalar(-extent, extent),
            self.scalar(-extent, extent),
        )
    }

    /// Unit vector, rejecting near-zero samples.
    pub fn direction(&mut self) -> Vec3 {
        loop {
            let v = self.vec3(1.0);
            if v.length() > 0.1 {
                return v.normalized();
            }
        }
    }

    pub fn rotation(&mut self) -> Quat {
        let axis = self.direction();
        let angle = self.scalar(-PI, PI);
        Quat::from_axis_angle(axis, angle)
    }

    /// Positive scale per axis, away from zero.
    pub fn scale(&mut self) -> Vec3 {
        Vec3::new(
            self.scalar(0.25, 3.0),
            self.scalar(0.25, 3.0),
            self.scalar(0.25, 3.0),
        )
    }

    /// A translate-rotate-scale matrix; always invertible.
    pub fn affine(&mut self) -> Mat4 {
        let t = self.vec3(10.0);
        let r = self.rotation();
        let s = self.scale();
        Mat4::from_trs(t, r, s)
    }
}
