use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::engine::backend::{BackendError, ChatBackend};

pub const MAX_ATTEMPTS: usize = 2;

/// Probe the backend with the credential it was built with.
///
/// Only transient failures are retried, at most [`MAX_ATTEMPTS`] probes in
/// total with `retry_delay` in between.
pub fn verify_credential(
    backend: &dyn ChatBackend,
    api_key: &str,
    retry_delay: Duration,
) -> Result<(), BackendError> {
    if api_key.trim().is_empty() {
        return Err(BackendError::MissingCredential);
    }

    let mut attempt = 1;
    loop {
        match backend.check_connectivity() {
            Ok(()) => {
                info!("credential accepted on attempt {attempt}");
                return Ok(());
            }
            Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                warn!("connectivity check failed ({e}), retrying");
                thread::sleep(retry_delay);
                attempt += 1;
            }
            Err(e) => {
                warn!("credential rejected: {e}");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::testing::ScriptedBackend;

    const NO_DELAY: Duration = Duration::ZERO;

    #[test]
    fn empty_key_makes_no_request() {
        let backend = ScriptedBackend::new();
        assert_eq!(
            verify_credential(&backend, "   ", NO_DELAY),
            Err(BackendError::MissingCredential)
        );
        assert_eq!(backend.probes_made(), 0);
    }

    #[test]
    fn success_first_time() {
        let backend = ScriptedBackend::new();
        backend.probe(Ok(()));

        assert_eq!(verify_credential(&backend, "key", NO_DELAY), Ok(()));
        assert_eq!(backend.probes_made(), 1);
    }

    #[test]
    fn transient_failure_is_retried_once() {
        let backend = ScriptedBackend::new();
        backend
            .probe(Err(BackendError::Transport("timeout".into())))
            .probe(Ok(()));

        assert_eq!(verify_credential(&backend, "key", NO_DELAY), Ok(()));
        assert_eq!(backend.probes_made(), 2);
    }

    #[test]
    fn gives_up_after_two_attempts() {
        let backend = ScriptedBackend::new();
        for _ in 0..3 {
            backend.probe(Err(BackendError::Http {
                status: 503,
                message: "unavailable".into(),
            }));
        }

        let err = verify_credential(&backend, "key", NO_DELAY).unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(backend.probes_made(), MAX_ATTEMPTS);
    }

    #[test]
    fn unauthorized_is_not_retried() {
        let backend = ScriptedBackend::new();
        backend.probe(Err(BackendError::Http {
            status: 403,
            message: "denied".into(),
        }));

        assert!(verify_credential(&backend, "key", NO_DELAY).is_err());
        assert_eq!(backend.probes_made(), 1);
    }
}
