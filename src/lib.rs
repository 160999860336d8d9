//! dexec: execute a source file in any language inside a throwaway container.
//!
//! The interesting logic is pure: [`args`] turns the command line into typed
//! options, and [`image`] decides which container image runs them. Everything
//! that touches a container runtime sits behind [`container::ContainerDriver`]
//! and is sequenced by [`runner::Runner`].

pub mod args;
pub mod config;
pub mod container;
pub mod help;
pub mod image;
pub mod input;
pub mod logging;
pub mod runner;
