//! Load session: owns the current snapshot and serializes loads
//!
//! At most one build runs at a time. A finished build replaces the current
//! snapshot in a single swap; a failed one leaves it in place.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, span, warn, Level};

use super::{IndexBuilder, SolutionIndex};
use crate::core::{CodebaseProvider, DiagramConfig, ScribeError};

/// Holds the active [`SolutionIndex`] and gates concurrent loads
#[derive(Debug, Default)]
pub struct Session {
    current: RwLock<Option<Arc<SolutionIndex>>>,
    loading: AtomicBool,
    builder: IndexBuilder,
}

/// Clears the loading flag when a build ends, however it ends
struct LoadGuard<'a>(&'a AtomicBool);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DiagramConfig) -> Self {
        Self {
            current: RwLock::new(None),
            loading: AtomicBool::new(false),
            builder: IndexBuilder::from_config(config),
        }
    }

    /// Build a new snapshot from `provider` and install it
    ///
    /// Rejects the request with [`ScribeError::LoadInProgress`] while another
    /// load is running. On failure the previous snapshot stays active.
    pub fn load(&self, provider: &dyn CodebaseProvider) -> Result<Arc<SolutionIndex>, ScribeError> {
        let load_span = span!(Level::INFO, "session_load");
        let _enter = load_span.enter();

        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejecting load request, another load is in flight");
            return Err(ScribeError::LoadInProgress);
        }
        let _guard = LoadGuard(&self.loading);

        let index = match self.builder.build(provider) {
            Ok(index) => Arc::new(index),
            Err(e) => {
                warn!(error = %e, "Load failed, keeping previous index");
                return Err(e);
            }
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&index));
        info!(assembly_count = index.assembly_count(), "Installed new index");
        Ok(index)
    }

    /// The active snapshot, if any load has succeeded
    pub fn current(&self) -> Option<Arc<SolutionIndex>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProjectSource;
    use std::sync::mpsc;
    use std::thread;

    struct EmptyProject(&'static str);

    impl ProjectSource for EmptyProject {
        fn name(&self) -> &str {
            self.0
        }

        fn documents(&self) -> Vec<&dyn crate::core::DocumentSource> {
            Vec::new()
        }
    }

    struct Projects(Vec<EmptyProject>);

    impl CodebaseProvider for Projects {
        fn projects(&self) -> Result<Vec<&dyn ProjectSource>, ScribeError> {
            Ok(self.0.iter().map(|p| p as &dyn ProjectSource).collect())
        }
    }

    struct Broken;

    impl CodebaseProvider for Broken {
        fn projects(&self) -> Result<Vec<&dyn ProjectSource>, ScribeError> {
            Err(ScribeError::load_failure("solution file missing"))
        }
    }

    /// Blocks inside the build until told to continue
    struct Blocking {
        entered: mpsc::SyncSender<()>,
        release: std::sync::Mutex<mpsc::Receiver<()>>,
    }

    impl CodebaseProvider for Blocking {
        fn projects(&self) -> Result<Vec<&dyn ProjectSource>, ScribeError> {
            let _ = self.entered.send(());
            let _ = self.release.lock().unwrap().recv();
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_load_installs_index() {
        let session = Session::new();
        assert!(session.current().is_none());

        let index = session
            .load(&Projects(vec![EmptyProject("Zoo")]))
            .unwrap();
        assert_eq!(index.assembly_names(), vec!["Zoo"]);
        assert!(Arc::ptr_eq(&index, &session.current().unwrap()));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failed_load_keeps_previous_index() {
        let session = Session::new();
        session.load(&Projects(vec![EmptyProject("Zoo")])).unwrap();

        let err = session.load(&Broken).unwrap_err();
        assert!(err.is_load_failure());
        assert_eq!(session.current().unwrap().assembly_names(), vec!["Zoo"]);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failed_first_load_installs_nothing() {
        let session = Session::new();
        assert!(session.load(&Broken).is_err());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_reload_replaces_snapshot() {
        let session = Session::new();
        let first = session.load(&Projects(vec![EmptyProject("Zoo")])).unwrap();
        let second = session.load(&Projects(vec![EmptyProject("Farm")])).unwrap();

        assert_eq!(first.assembly_names(), vec!["Zoo"]);
        assert_eq!(session.current().unwrap().assembly_names(), vec!["Farm"]);
        assert!(Arc::ptr_eq(&second, &session.current().unwrap()));
    }

    #[test]
    fn test_concurrent_load_is_rejected() {
        let session = Arc::new(Session::new());
        let (entered_tx, entered_rx) = mpsc::sync_channel(1);
        let (release_tx, release_rx) = mpsc::channel();
        let blocking = Blocking {
            entered: entered_tx,
            release: std::sync::Mutex::new(release_rx),
        };

        let worker = {
            let session = Arc::clone(&session);
            thread::spawn(move || session.load(&blocking).map(|_| ()))
        };

        entered_rx.recv().unwrap();
        assert!(session.is_loading());
        let err = session
            .load(&Projects(vec![EmptyProject("Zoo")]))
            .unwrap_err();
        assert!(matches!(err, ScribeError::LoadInProgress));

        release_tx.send(()).unwrap();
        worker.join().unwrap().unwrap();
        assert!(!session.is_loading());
        assert_eq!(session.current().unwrap().assembly_count(), 0);
    }
}
