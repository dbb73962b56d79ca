use faculty_allocation::workflows::allocation::AllocationService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Per-process allocation settings shared with request handlers.
#[derive(Clone)]
pub(crate) struct AllocationContext {
    pub(crate) service: Arc<AllocationService>,
    pub(crate) default_capacity: Option<u32>,
}

impl AllocationContext {
    pub(crate) fn new(default_capacity: Option<u32>) -> Self {
        Self {
            service: Arc::new(AllocationService::default()),
            default_capacity,
        }
    }
}
