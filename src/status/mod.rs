//! Service status report.
//!
//! The search backend is a dependent service: search cannot work without it. The cache store
//! is secondary: searches still run, just without reuse.

use serde::Serialize;
use tracing::{error, instrument};

use crate::backend::VariantIndex;
use crate::cache::KeyValueStore;
use crate::constants::VERSION;

pub const STATUS_OK: u16 = 200;
pub const STATUS_DEGRADED: u16 = 400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub version: &'static str,
    pub dependent_services_ok: bool,
    pub secondary_services_ok: bool,
}

impl StatusReport {
    /// 200 while dependent services are healthy, 400 otherwise.
    pub fn status_code(&self) -> u16 {
        if self.dependent_services_ok {
            STATUS_OK
        } else {
            STATUS_DEGRADED
        }
    }
}

/// Probes the store and the backend concurrently.
#[instrument(skip_all)]
pub async fn check_status<S: KeyValueStore, I: VariantIndex>(store: &S, index: &I) -> StatusReport {
    let (store_probe, index_probe) = tokio::join!(store.ping(), index.ping());

    let secondary_services_ok = match store_probe {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Cache store connection error");
            false
        }
    };

    let dependent_services_ok = match index_probe {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Search backend connection error");
            false
        }
    };

    StatusReport {
        version: VERSION,
        dependent_services_ok,
        secondary_services_ok,
    }
}
