//! SkyLaunch Core
//!
//! Capacity-constrained acquisition of a single compute instance.
//!
//! ```text
//! ProvisioningLoop
//!   ├─ QuotaGuard          pre-flight, once
//!   ├─ ZoneRotator         A → B → C → A → ...
//!   ├─ attempt()           one launch call, classified
//!   ├─ BackoffController   wait between rounds
//!   └─ StatusReporter      append-only progress log
//! ```
//!
//! The loop never talks to a cloud directly; it is generic over
//! [`skylaunch_cloud::ComputeProvider`] and over a [`Sleeper`] for its
//! suspension points.

pub mod attempt;
pub mod backoff;
pub mod error;
pub mod pacing;
pub mod provisioner;
pub mod quota;
pub mod request;
pub mod status;
pub mod zone;

pub use attempt::{AttemptOutcome, attempt};
pub use backoff::{BackoffConfig, BackoffController, BackoffPhase, BackoffState};
pub use error::{CoreError, Result};
pub use pacing::{Pause, Sleeper, TokioSleeper};
pub use provisioner::{LoopPhase, LoopSettings, Outcome, ProvisioningLoop};
pub use quota::{QuotaGuard, QuotaLimits, QuotaSnapshot, QuotaVerdict, ShapeClass};
pub use request::ProvisioningRequest;
pub use status::{NullSink, Severity, StatusEntry, StatusReporter, StatusSink};
pub use zone::{ZoneCycle, ZoneRotator, ZoneVisit};
