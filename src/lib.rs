//! Drive selection for an image flasher.
//!
//! The selector keeps an ordered, de-duplicated [`selection::Selection`] of
//! drives, gates every toggle through a [`gate::CompatibilityGate`] and
//! keeps its list of available drives fresh with a [`poller::DrivePoller`].
//! Drive enumeration and compatibility rules are injected through the
//! [`enumerator::DeviceEnumerator`] and [`constraints::CompatibilityEvaluator`]
//! traits.

pub mod cli;
pub mod config;
pub mod constraints;
pub mod drive;
pub mod enumerator;
pub mod error;
pub mod flow;
pub mod gate;
pub mod logging;
pub mod poller;
pub mod selection;
pub mod tui;
pub mod utils;
pub mod workflow;
