#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! # Barricade: pointer confinement and cursor overlays for compositors
//!
//! This crate contains two small pieces a compositor needs when it runs as the
//! display server on a multi-monitor setup with gaps in its layout:
//!
//! - a pointer constraint engine, deciding where every pointer motion sample
//!   is allowed to go, and
//! - a cursor overlay compositor, painting a software cursor on top of the
//!   stage and tracking the screen damage it causes.
//!
//! ## Structure of the crate
//!
//! - [`input`] contains the constraint engine: dynamic pointer barriers and
//!   the monitor escape clamp.
//! - [`monitor`] describes the monitor layout the engine works on.
//! - [`stage`] contains the stage and its cursor overlay.
//! - [`backend`] contains the native and nested backend variants, the
//!   rendering traits the stage draws through and the backend configuration.
//! - [`utils`] contains the geometry types shared by all of the above.
//!
//! ## General principles
//!
//! Everything in this crate is driven by the host compositor's event loop and
//! is single-threaded. Monitor layouts and barrier sets are plain values owned
//! by the backend, the host replaces them between frames.
//!
//! ### Logging
//!
//! Barricade makes use of [`tracing`] for its internal logging. Per-motion
//! decisions are logged at `trace` level, so for release builds it is
//! recommended to limit the log level during compile time:
//!
//! ```toml
//! [dependencies]
//! tracing = { version = "0.1", features = ["max_level_trace", "release_max_level_debug"] }
//! ```

pub mod backend;
pub mod input;
pub mod monitor;
pub mod stage;
pub mod utils;
