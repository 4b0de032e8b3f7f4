// Capability Port (current user's privileges)

/// Privilege check for the current caller
pub trait CapabilityChecker: Send + Sync {
    /// True if the caller may manage libraries (sees restricted libraries as unrestricted)
    fn can_manage_libraries(&self) -> bool;
}

/// Capability fixed at construction (CLI flags, service accounts)
#[derive(Debug, Clone, Copy)]
pub struct StaticCapability {
    manage_libraries: bool,
}

impl StaticCapability {
    pub fn new(manage_libraries: bool) -> Self {
        Self { manage_libraries }
    }
}

impl CapabilityChecker for StaticCapability {
    fn can_manage_libraries(&self) -> bool {
        self.manage_libraries
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often the capability is consulted
    pub struct CountingCapability {
        manage_libraries: bool,
        calls: AtomicUsize,
    }

    impl CountingCapability {
        pub fn new(manage_libraries: bool) -> Self {
            Self {
                manage_libraries,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CapabilityChecker for CountingCapability {
        fn can_manage_libraries(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.manage_libraries
        }
    }
}
