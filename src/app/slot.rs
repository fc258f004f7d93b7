use std::sync::Arc;

use crate::domain::weather::DerivedForecast;

/// Identifies one forecast request. Later requests carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

impl FetchToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues fetch tokens and tells whether a response is still wanted.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: u64,
}

impl FetchSequencer {
    pub fn issue(&mut self) -> FetchToken {
        self.latest = self.latest.saturating_add(1);
        FetchToken(self.latest)
    }

    /// Only the most recently issued token is accepted.
    #[must_use]
    pub fn accepts(&self, token: FetchToken) -> bool {
        token.0 == self.latest && self.latest != 0
    }

    #[must_use]
    pub fn latest(&self) -> Option<FetchToken> {
        (self.latest != 0).then_some(FetchToken(self.latest))
    }
}

/// Holds the current derived forecast. Replaced as a whole, never patched.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    version: u64,
    current: Option<Arc<DerivedForecast>>,
}

impl SnapshotSlot {
    pub fn replace(&mut self, derived: DerivedForecast) -> u64 {
        self.version = self.version.saturating_add(1);
        self.current = Some(Arc::new(derived));
        self.version
    }

    #[must_use]
    pub fn current(&self) -> Option<Arc<DerivedForecast>> {
        self.current.clone()
    }

    #[must_use]
    pub fn get(&self) -> Option<&DerivedForecast> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
