//! Ball Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, den Debouncer, den Prioritäts-Arbiter,
//! die Licht-Effekte und den kooperativen Scheduler.

#![no_std]

pub mod arbiter;
pub mod config;
pub mod debounce;
pub mod effect;
pub mod logic;
pub mod scheduler;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use arbiter::{ArbiterOutcome, EdgeMemory, ModeArbiter, Notifications};
pub use config::{CHANNEL_COUNT, ConfigError, PanelConfig, Palette};
pub use debounce::{Channel, InputDebouncer, StableTransition};
pub use effect::{EffectMode, EffectRenderer, PixelFrame, RampDirection, RenderState};
pub use logic::{brightness_ceiling, count_pressed, scale_color};
pub use scheduler::{ControllerState, Scheduler, TickReport};
pub use traits::{
    LedError, NotificationSink, RawInputSource, SinkError, SmartLedWriter, StateObserver,
};
pub use types::{ActiveCondition, EffectKind, StateSnapshot, Topic};
