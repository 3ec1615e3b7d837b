//! SkyLaunch Cloud Abstraction
//!
//! This crate provides the compute provider abstraction the acquisition loop
//! talks to. Providers report failures as structured [`CloudError`] values so
//! callers can classify them once, at the boundary.
//!
//! # Supported Providers
//!
//! - **Oracle Cloud Infrastructure**: instances, availability domains, shapes,
//!   images (via the `oci` CLI, see `skylaunch-cloud-oci`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  SkyLaunch CLI                   │
//! │             (skylaunch launch/init)              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 skylaunch-core                   │
//! │   quota guard · zone rotation · backoff loop     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                skylaunch-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Provider Abstraction             │   │
//! │  │  trait ComputeProvider { ... }            │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │  oci provider │
//!           └───────────────┘
//! ```

pub mod error;
pub mod model;
pub mod provider;

// Re-exports
pub use error::{CloudError, Result, ServiceError};
pub use model::{
    ImageInfo, InstanceInfo, LaunchSpec, LaunchedInstance, LifecycleState, ShapeInfo,
};
pub use provider::{AuthStatus, ComputeProvider};
