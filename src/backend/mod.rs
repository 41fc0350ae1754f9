//! Backend variants
//!
//! A compositor runs either as the display server, driving the outputs and
//! reading input devices itself, or nested inside another windowing system.
//! Both variants implement the [`Backend`] trait; which one is used is decided
//! once at startup from a [`BackendConfig`]:
//!
//! - [`native::NativeBackend`] installs the pointer constraint engine on every
//!   motion sample and keeps the pointer reachable across monitor
//!   configuration changes.
//! - [`nested::NestedBackend`] leaves confinement to the host window system.
//!
//! The configuration can be read from the environment:
//!
//! | variable                  | values             | default  |
//! |---------------------------|--------------------|----------|
//! | `BARRICADE_BACKEND`       | `native`, `nested` | `native` |
//! | `BARRICADE_PRECONDITIONS` | `abort`, `report`  | see below |
//!
//! Precondition violations abort by default when the `fatal_preconditions`
//! feature is enabled, and are reported as errors otherwise.

use std::{fmt, str::FromStr};

use tracing::info;

use crate::{
    input::{barrier::BarrierManager, DeviceId, PointerDevice},
    monitor::MonitorLayout,
    utils::{Logical, Point},
};

pub mod native;
pub mod nested;
pub mod renderer;

/// Environment variable selecting the backend kind
pub const BACKEND_ENV: &str = "BARRICADE_BACKEND";
/// Environment variable selecting the precondition policy
pub const PRECONDITIONS_ENV: &str = "BARRICADE_PRECONDITIONS";

/// The kind of backend the compositor runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// Running as the display server
    #[default]
    Native,
    /// Running as a client of another windowing system
    Nested,
}

impl BackendKind {
    /// Whether this backend owns the presented framebuffers
    pub fn is_display_server(&self) -> bool {
        matches!(self, BackendKind::Native)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Native => f.write_str("native"),
            BackendKind::Nested => f.write_str("nested"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(BackendKind::Native),
            "nested" => Ok(BackendKind::Nested),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// What to do when a caller violates a precondition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreconditionPolicy {
    /// Panic, continuing could corrupt the framebuffer
    Abort,
    /// Log the violation and return an error
    Report,
}

impl Default for PreconditionPolicy {
    fn default() -> Self {
        if cfg!(feature = "fatal_preconditions") {
            PreconditionPolicy::Abort
        } else {
            PreconditionPolicy::Report
        }
    }
}

impl FromStr for PreconditionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(PreconditionPolicy::Abort),
            "report" => Ok(PreconditionPolicy::Report),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Errors reading a [`BackendConfig`]
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The backend name is not known
    #[error("Unknown backend `{0}`, expected `native` or `nested`")]
    UnknownBackend(String),
    /// The precondition policy is not known
    #[error("Unknown precondition policy `{0}`, expected `abort` or `report`")]
    UnknownPolicy(String),
}

/// Startup configuration of the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendConfig {
    /// Which backend to run
    pub kind: BackendKind,
    /// How precondition violations are handled
    pub preconditions: PreconditionPolicy,
}

impl BackendConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<BackendConfig, ConfigError> {
        BackendConfig::from_vars(|name| std::env::var(name).ok())
    }

    /// Read the configuration from a variable lookup function
    ///
    /// Unset variables keep their default.
    pub fn from_vars<F>(lookup: F) -> Result<BackendConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BackendConfig::default();
        if let Some(kind) = lookup(BACKEND_ENV) {
            config.kind = kind.parse()?;
        }
        if let Some(policy) = lookup(PRECONDITIONS_ENV) {
            config.preconditions = policy.parse()?;
        }
        Ok(config)
    }
}

/// Common interface of the backend variants
///
/// The host compositor forwards pointer motion samples and monitor
/// configuration changes to the backend it was started with.
pub trait Backend {
    /// Which variant this is
    fn kind(&self) -> BackendKind;

    /// Whether the backend runs as the display server
    fn is_display_server(&self) -> bool {
        self.kind().is_display_server()
    }

    /// Finish initialization once the first monitor layout is known
    fn post_init(&mut self, layout: MonitorLayout);

    /// Position a motion sample of `device` is allowed to move the pointer to
    fn constrain_motion(
        &mut self,
        device: DeviceId,
        time: u32,
        proposed: Point<f64, Logical>,
    ) -> Point<f64, Logical>;

    /// The monitor configuration changed
    fn monitors_changed(&mut self, layout: MonitorLayout);

    /// The monitor layout currently in use
    fn monitor_layout(&self) -> &MonitorLayout;

    /// Move the pointer to an absolute position
    fn warp_pointer(&mut self, location: Point<i32, Logical>);

    /// The pointer barriers, if the backend supports them
    fn barrier_manager(&mut self) -> Option<&mut BarrierManager>;
}

/// Create the backend selected by the configuration
pub fn init_backend<P>(config: &BackendConfig, pointer: P) -> Box<dyn Backend>
where
    P: PointerDevice + 'static,
{
    info!(kind = %config.kind, "Initializing backend");
    match config.kind {
        BackendKind::Native => Box::new(native::NativeBackend::new(pointer)),
        BackendKind::Nested => Box::new(nested::NestedBackend::new(pointer)),
    }
}
