//! One launch call against one zone, classified

use crate::request::ProvisioningRequest;
use crate::status::StatusReporter;
use skylaunch_cloud::{CloudError, ComputeProvider, LaunchedInstance, ServiceError};
use std::time::Duration;

/// HTTP status the provider returns when throttling
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// HTTP status OCI returns for "Out of host capacity"
pub const STATUS_OUT_OF_CAPACITY: u16 = 500;

/// Classified result of a single launch attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success {
        resource_id: String,
        zone: String,
    },
    RateLimited {
        zone: String,
        retry_after: Option<Duration>,
    },
    CapacityExhausted {
        zone: String,
    },
    ServiceFault {
        zone: String,
        status: u16,
        code: String,
        message: String,
        request_id: String,
    },
    TransientFault {
        zone: String,
        description: String,
    },
}

impl AttemptOutcome {
    pub fn service_fault(zone: impl Into<String>, error: ServiceError) -> Self {
        AttemptOutcome::ServiceFault {
            zone: zone.into(),
            status: error.status,
            code: error.code,
            message: error.message,
            request_id: error.request_id,
        }
    }

    /// Sort a launch result into the retry taxonomy
    ///
    /// Only the structured status decides; message text is never inspected.
    pub fn classify(result: Result<LaunchedInstance, CloudError>, zone: &str) -> Self {
        let zone = zone.to_string();
        match result {
            Ok(instance) => AttemptOutcome::Success {
                resource_id: instance.id,
                zone,
            },
            Err(CloudError::Service(error)) => match error.status {
                STATUS_TOO_MANY_REQUESTS => AttemptOutcome::RateLimited {
                    zone,
                    retry_after: error.retry_after,
                },
                STATUS_OUT_OF_CAPACITY => AttemptOutcome::CapacityExhausted { zone },
                _ => AttemptOutcome::service_fault(zone, error),
            },
            Err(other) => AttemptOutcome::TransientFault {
                zone,
                description: other.to_string(),
            },
        }
    }

    pub fn zone(&self) -> &str {
        match self {
            AttemptOutcome::Success { zone, .. }
            | AttemptOutcome::RateLimited { zone, .. }
            | AttemptOutcome::CapacityExhausted { zone }
            | AttemptOutcome::ServiceFault { zone, .. }
            | AttemptOutcome::TransientFault { zone, .. } => zone,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }
}

/// Perform exactly one launch call against `zone`
///
/// Fault details go to the reporter for the operator; they never influence
/// control flow beyond the returned classification.
pub async fn attempt<P>(
    provider: &P,
    request: &ProvisioningRequest,
    zone: &str,
    reporter: &mut StatusReporter,
) -> AttemptOutcome
where
    P: ComputeProvider + ?Sized,
{
    let spec = request.launch_spec(zone);
    let result = provider.launch_instance(&spec).await;

    if let Err(ref err) = result {
        report_error(reporter, err);
    }

    let outcome = AttemptOutcome::classify(result, zone);
    match &outcome {
        AttemptOutcome::Success { resource_id, zone } => {
            tracing::info!(%zone, %resource_id, "Instance created");
        }
        AttemptOutcome::RateLimited { zone, retry_after } => {
            let hint = retry_after
                .map(|d| format!(" (server asked for {}s)", d.as_secs()))
                .unwrap_or_default();
            reporter.normal(format!(
                "Rate limit reached in {}{}, backing off after this round.",
                zone, hint
            ));
        }
        AttemptOutcome::CapacityExhausted { zone } => {
            reporter.warning(format!(
                "Out of host capacity in {}, moving to next availability domain.",
                zone
            ));
        }
        AttemptOutcome::ServiceFault { zone, code, .. } => {
            reporter.normal(format!("{} rejected the launch ({}), will retry.", zone, code));
        }
        AttemptOutcome::TransientFault { zone, .. } => {
            reporter.normal(format!("Unexpected error in {}. Retrying...", zone));
        }
    }

    outcome
}

fn report_error(reporter: &mut StatusReporter, err: &CloudError) {
    match err.service() {
        Some(service) => reporter.normal(format!(
            "Service error occurred: status {}, code {}, message: {}, opc-request-id: {}",
            service.status, service.code, service.message, service.request_id
        )),
        None => reporter.normal(format!("Unexpected error occurred: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Severity;
    use async_trait::async_trait;
    use skylaunch_cloud::{
        AuthStatus, ImageInfo, InstanceInfo, LaunchSpec, LifecycleState, ShapeInfo,
    };
    use std::sync::Mutex;

    fn launched(id: &str, zone: &str) -> LaunchedInstance {
        LaunchedInstance {
            id: id.to_string(),
            display_name: "test".to_string(),
            availability_domain: zone.to_string(),
            lifecycle_state: LifecycleState::Provisioning,
        }
    }

    fn service(status: u16, code: &str) -> CloudError {
        ServiceError::new(status, code, "message", "req-42").into()
    }

    #[test]
    fn test_classify_success() {
        let outcome = AttemptOutcome::classify(Ok(launched("ocid1.instance..x", "AD-3")), "AD-3");
        assert_eq!(
            outcome,
            AttemptOutcome::Success {
                resource_id: "ocid1.instance..x".to_string(),
                zone: "AD-3".to_string(),
            }
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn test_classify_rate_limit_keeps_hint() {
        let err: CloudError = ServiceError::new(429, "TooManyRequests", "slow", "r")
            .with_retry_after(Duration::from_secs(30))
            .into();
        assert_eq!(
            AttemptOutcome::classify(Err(err), "AD-1"),
            AttemptOutcome::RateLimited {
                zone: "AD-1".to_string(),
                retry_after: Some(Duration::from_secs(30)),
            }
        );
    }

    #[test]
    fn test_classify_capacity() {
        let outcome = AttemptOutcome::classify(Err(service(500, "InternalError")), "AD-2");
        assert_eq!(
            outcome,
            AttemptOutcome::CapacityExhausted {
                zone: "AD-2".to_string()
            }
        );
        assert_eq!(outcome.zone(), "AD-2");
    }

    #[test]
    fn test_classify_other_service_errors() {
        for status in [400, 401, 404, 409, 502, 503] {
            let outcome = AttemptOutcome::classify(Err(service(status, "Whatever")), "AD-1");
            match &outcome {
                AttemptOutcome::ServiceFault {
                    status: s,
                    request_id,
                    ..
                } => {
                    assert_eq!(*s, status);
                    assert_eq!(request_id, "req-42");
                }
                other => panic!("status {status} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn test_classify_ignores_message_text() {
        // A capacity-sounding message on a non-500 status is still a plain fault
        let err: CloudError =
            ServiceError::new(400, "LimitExceeded", "Out of host capacity.", "r").into();
        assert!(matches!(
            AttemptOutcome::classify(Err(err), "AD-1"),
            AttemptOutcome::ServiceFault { .. }
        ));
    }

    #[test]
    fn test_classify_unstructured_failures() {
        let errors = vec![
            CloudError::Timeout("oci command timed out after 120s".to_string()),
            CloudError::CommandFailed("connection reset by peer".to_string()),
            CloudError::Io(std::io::Error::other("broken pipe")),
        ];
        for err in errors {
            assert!(matches!(
                AttemptOutcome::classify(Err(err), "AD-1"),
                AttemptOutcome::TransientFault { .. }
            ));
        }
    }

    /// Provider whose launch call always returns the same scripted result
    struct OneShot {
        status: Option<u16>,
        specs: Mutex<Vec<LaunchSpec>>,
    }

    #[async_trait]
    impl ComputeProvider for OneShot {
        fn name(&self) -> &str {
            "one-shot"
        }

        fn display_name(&self) -> &str {
            "One Shot"
        }

        async fn check_auth(&self) -> skylaunch_cloud::Result<AuthStatus> {
            Ok(AuthStatus::ok("test"))
        }

        async fn list_instances(&self, _: &str) -> skylaunch_cloud::Result<Vec<InstanceInfo>> {
            Ok(Vec::new())
        }

        async fn list_availability_domains(&self, _: &str) -> skylaunch_cloud::Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn launch_instance(
            &self,
            spec: &LaunchSpec,
        ) -> skylaunch_cloud::Result<LaunchedInstance> {
            self.specs.lock().unwrap().push(spec.clone());
            match self.status {
                Some(status) => Err(service(status, "InternalError")),
                None => Ok(launched("ocid1.instance..ok", &spec.availability_domain)),
            }
        }

        async fn list_shapes(&self, _: &str) -> skylaunch_cloud::Result<Vec<ShapeInfo>> {
            Ok(Vec::new())
        }

        async fn list_images(&self, _: &str, _: &str) -> skylaunch_cloud::Result<Vec<ImageInfo>> {
            Ok(Vec::new())
        }

        async fn get_image(&self, _: &str) -> skylaunch_cloud::Result<ImageInfo> {
            Err(CloudError::InvalidResponse("no images".to_string()))
        }
    }

    #[tokio::test]
    async fn test_attempt_reports_full_error_detail() {
        let provider = OneShot {
            status: Some(500),
            specs: Mutex::new(Vec::new()),
        };
        let request = ProvisioningRequest::new("c", "s", "i", "VM.Standard.A1.Flex");
        let mut reporter = StatusReporter::default();

        let outcome = attempt(&provider, &request, "AD-1", &mut reporter).await;
        assert!(matches!(outcome, AttemptOutcome::CapacityExhausted { .. }));

        let entries = reporter.render();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].message.contains("status 500"));
        assert!(entries[0].message.contains("req-42"));
        assert_eq!(entries[1].severity, Severity::Warning);
        assert!(entries[1].message.contains("Out of host capacity in AD-1"));

        let specs = provider.specs.lock().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].availability_domain, "AD-1");
    }

    #[tokio::test]
    async fn test_attempt_success_reports_nothing() {
        let provider = OneShot {
            status: None,
            specs: Mutex::new(Vec::new()),
        };
        let request = ProvisioningRequest::new("c", "s", "i", "VM.Standard.A1.Flex");
        let mut reporter = StatusReporter::default();

        let outcome = attempt(&provider, &request, "AD-2", &mut reporter).await;
        assert_eq!(outcome.zone(), "AD-2");
        assert!(outcome.is_success());
        assert!(reporter.is_empty());
    }
}
