//! # Howl
//!
//! Concrete pulse activities and the host that runs them.
//!
//! [`ActivityHost`] keeps one [`Activity`](howl_core::Activity) at a time, converts absolute
//! playback times into simulation steps, and occasionally switches to another activity at
//! random. The activities themselves live in [`activities`]; the signal building blocks they
//! use come from [`howl_core`].

pub mod activities;
pub mod constants;
pub mod host;

pub use host::{available_activities, find_activity, ActivityHost, ActivityInfo, HostConfig};
pub use howl_core::{Activity, Pulse};
