//! Pre-flight quota guard
//!
//! Free-tier accounts cap two shape families differently: the micro shape by
//! instance count, the flexible Ampere shape by summed OCPUs and memory. The
//! guard runs once, before the first launch attempt, against a snapshot
//! built from a single instance listing.

use crate::request::ProvisioningRequest;
use skylaunch_cloud::InstanceInfo;

/// Account limits per shape class
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaLimits {
    /// Shape limited by instance count
    pub fixed_count_shape: String,
    pub fixed_count_limit: u32,

    /// Shape limited by combined OCPUs and memory
    pub flexible_shape: String,
    pub flexible_ocpu_limit: f32,
    pub flexible_memory_limit: f32,
}

impl Default for QuotaLimits {
    /// Oracle Cloud "Always Free" allowances
    fn default() -> Self {
        Self {
            fixed_count_shape: "VM.Standard.E2.1.Micro".to_string(),
            fixed_count_limit: 2,
            flexible_shape: "VM.Standard.A1.Flex".to_string(),
            flexible_ocpu_limit: 4.0,
            flexible_memory_limit: 24.0,
        }
    }
}

/// Which quota rule a shape falls under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    FixedCount,
    Flexible,
    Unconstrained,
}

impl QuotaLimits {
    pub fn classify(&self, shape: &str) -> ShapeClass {
        if shape == self.fixed_count_shape {
            ShapeClass::FixedCount
        } else if shape == self.flexible_shape {
            ShapeClass::Flexible
        } else {
            ShapeClass::Unconstrained
        }
    }
}

/// Live usage per shape class at the time of the listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotaSnapshot {
    pub fixed_count: u32,
    pub flexible_ocpus: f32,
    pub flexible_memory: f32,

    /// Every instance seen, live or not
    pub instances_seen: usize,
}

impl QuotaSnapshot {
    /// Tally live instances; terminating and terminated ones are free
    pub fn from_instances(instances: &[InstanceInfo], limits: &QuotaLimits) -> Self {
        let mut snapshot = Self {
            instances_seen: instances.len(),
            ..Self::default()
        };

        for instance in instances.iter().filter(|i| i.is_live()) {
            match limits.classify(&instance.shape) {
                ShapeClass::FixedCount => snapshot.fixed_count += 1,
                ShapeClass::Flexible => {
                    snapshot.flexible_ocpus += instance.ocpus;
                    snapshot.flexible_memory += instance.memory_in_gbs;
                }
                ShapeClass::Unconstrained => {}
            }
        }

        snapshot
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuotaVerdict {
    Ok,
    Violation { reason: String },
}

impl QuotaVerdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, QuotaVerdict::Ok)
    }
}

/// Stateless evaluator of [`QuotaLimits`]
#[derive(Debug, Clone, Default)]
pub struct QuotaGuard {
    limits: QuotaLimits,
}

impl QuotaGuard {
    pub fn new(limits: QuotaLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    /// Decide whether the request fits next to the live usage
    ///
    /// The count rule rejects on reaching the limit; the flexible rule only
    /// rejects when the request would go past it.
    pub fn evaluate(
        &self,
        request: &ProvisioningRequest,
        snapshot: &QuotaSnapshot,
    ) -> QuotaVerdict {
        let limits = &self.limits;
        match limits.classify(&request.shape) {
            ShapeClass::FixedCount => {
                if snapshot.fixed_count >= limits.fixed_count_limit {
                    return QuotaVerdict::Violation {
                        reason: format!(
                            "{} instance limit reached ({} of {} in use)",
                            limits.fixed_count_shape,
                            snapshot.fixed_count,
                            limits.fixed_count_limit
                        ),
                    };
                }
            }
            ShapeClass::Flexible => {
                let ocpus = snapshot.flexible_ocpus + request.ocpus as f32;
                let memory = snapshot.flexible_memory + request.memory_in_gbs as f32;
                if ocpus > limits.flexible_ocpu_limit || memory > limits.flexible_memory_limit {
                    return QuotaVerdict::Violation {
                        reason: format!(
                            "{} total would be {} OCPUs / {} GB, over the {} OCPUs / {} GB limit",
                            limits.flexible_shape,
                            ocpus,
                            memory,
                            limits.flexible_ocpu_limit,
                            limits.flexible_memory_limit
                        ),
                    };
                }
            }
            ShapeClass::Unconstrained => {}
        }
        QuotaVerdict::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylaunch_cloud::LifecycleState;

    fn instance(shape: &str, ocpus: f32, memory: f32, state: LifecycleState) -> InstanceInfo {
        InstanceInfo {
            id: format!("ocid1.instance.oc1..{}", shape.len()),
            display_name: "existing".to_string(),
            shape: shape.to_string(),
            ocpus,
            memory_in_gbs: memory,
            lifecycle_state: state,
        }
    }

    fn flex_request(ocpus: u32, memory: u32) -> ProvisioningRequest {
        ProvisioningRequest::new("c", "s", "i", "VM.Standard.A1.Flex").with_sizing(ocpus, memory)
    }

    fn micro_request() -> ProvisioningRequest {
        ProvisioningRequest::new("c", "s", "i", "VM.Standard.E2.1.Micro")
    }

    #[test]
    fn test_snapshot_skips_terminated() {
        let limits = QuotaLimits::default();
        let instances = vec![
            instance("VM.Standard.E2.1.Micro", 1.0, 1.0, LifecycleState::Running),
            instance("VM.Standard.E2.1.Micro", 1.0, 1.0, LifecycleState::Terminated),
            instance("VM.Standard.A1.Flex", 2.0, 12.0, LifecycleState::Stopped),
            instance("VM.Standard.A1.Flex", 2.0, 12.0, LifecycleState::Terminating),
            instance("VM.Standard.E4.Flex", 8.0, 64.0, LifecycleState::Running),
        ];

        let snapshot = QuotaSnapshot::from_instances(&instances, &limits);
        assert_eq!(snapshot.fixed_count, 1);
        assert_eq!(snapshot.flexible_ocpus, 2.0);
        assert_eq!(snapshot.flexible_memory, 12.0);
        assert_eq!(snapshot.instances_seen, 5);
    }

    #[test]
    fn test_fixed_count_rejects_at_limit() {
        let guard = QuotaGuard::default();
        let snapshot = QuotaSnapshot {
            fixed_count: 2,
            ..QuotaSnapshot::default()
        };
        let verdict = guard.evaluate(&micro_request(), &snapshot);
        assert!(
            matches!(verdict, QuotaVerdict::Violation { ref reason } if reason.contains("2 of 2"))
        );

        let snapshot = QuotaSnapshot {
            fixed_count: 1,
            ..QuotaSnapshot::default()
        };
        assert!(guard.evaluate(&micro_request(), &snapshot).is_ok());
    }

    #[test]
    fn test_flexible_limit_is_inclusive() {
        let guard = QuotaGuard::default();
        let snapshot = QuotaSnapshot {
            flexible_ocpus: 2.0,
            flexible_memory: 12.0,
            ..QuotaSnapshot::default()
        };

        // Reaching exactly 4 OCPUs / 24 GB is allowed
        assert_eq!(guard.evaluate(&flex_request(2, 12), &snapshot), QuotaVerdict::Ok);

        assert!(!guard.evaluate(&flex_request(3, 12), &snapshot).is_ok());
        assert!(!guard.evaluate(&flex_request(2, 13), &snapshot).is_ok());
    }

    #[test]
    fn test_unconstrained_shape_always_ok() {
        let guard = QuotaGuard::default();
        let snapshot = QuotaSnapshot {
            fixed_count: 50,
            flexible_ocpus: 400.0,
            flexible_memory: 4000.0,
            instances_seen: 60,
        };
        let request =
            ProvisioningRequest::new("c", "s", "i", "VM.Standard.E4.Flex").with_sizing(64, 1024);
        assert!(guard.evaluate(&request, &snapshot).is_ok());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let guard = QuotaGuard::default();
        let snapshot = QuotaSnapshot {
            flexible_ocpus: 3.0,
            flexible_memory: 18.0,
            ..QuotaSnapshot::default()
        };
        let request = flex_request(2, 6);
        let first = guard.evaluate(&request, &snapshot);
        let second = guard.evaluate(&request, &snapshot);
        assert_eq!(first, second);
        assert!(!first.is_ok());
    }

    #[test]
    fn test_custom_limits() {
        let guard = QuotaGuard::new(QuotaLimits {
            fixed_count_limit: 5,
            ..QuotaLimits::default()
        });
        let snapshot = QuotaSnapshot {
            fixed_count: 4,
            ..QuotaSnapshot::default()
        };
        assert!(guard.evaluate(&micro_request(), &snapshot).is_ok());
        assert_eq!(guard.limits().fixed_count_limit, 5);
    }
}
