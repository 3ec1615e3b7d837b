//! Oracle Cloud Infrastructure provider for SkyLaunch
//!
//! This crate implements the ComputeProvider trait for OCI by driving the
//! `oci` command line tool and decoding its JSON output.
//!
//! # Features
//!
//! - Instance listing and launch
//! - Availability domain discovery
//! - Shape and image lookup for interactive setup
//!
//! # Requirements
//!
//! - `oci` CLI must be installed and configured (`oci setup config`)
//! - Authentication is managed through the CLI config file and profile
//!
//! # Example
//!
//! ```ignore
//! use skylaunch_cloud::ComputeProvider;
//! use skylaunch_cloud_oci::{OciCli, OciProvider};
//!
//! let provider = OciProvider::new(OciCli::new().with_profile("DEFAULT"));
//!
//! let auth = provider.check_auth().await?;
//! if !auth.authenticated {
//!     panic!("Not authenticated: {:?}", auth.error);
//! }
//!
//! let domains = provider.list_availability_domains(&compartment_id).await?;
//! ```

pub mod cli;
pub mod error;
pub mod provider;

pub use cli::{OciCli, parse_service_error};
pub use error::{OciError, Result};
pub use provider::OciProvider;
