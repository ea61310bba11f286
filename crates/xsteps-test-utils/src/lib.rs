//! Shared test utilities for the xsteps workspace.
//!
//! This crate provides fixtures shared by the crate test suites. It is a
//! dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace), a temporary xsteps workspace
//! - [`fakes`]: recording stand-ins for the package manager and process runner

pub mod fakes;
pub mod workspace;

pub use fakes::{FakePackageManager, RecordingRunner};
pub use workspace::TestWorkspace;
