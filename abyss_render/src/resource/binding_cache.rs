/// Binding cache tracker - decides when bindings derived from shared values are stale
///
/// A consumer that builds descriptor sets from a [`SharedMaterialValues`] keeps one
/// tracker per derived binding table and calls [`BindingCacheTracker::check`] before
/// each use.

use crate::resource::SharedMaterialValues;

/// Snapshot of both store versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SharedValuesVersion {
    pub pointer_version: u32,
    pub offset_version: u32,
}

impl SharedValuesVersion {
    pub fn of(values: &SharedMaterialValues) -> Self {
        Self {
            pointer_version: values.pointer_version(),
            offset_version: values.offset_version(),
        }
    }
}

/// What a consumer must rebuild after a [`BindingCacheTracker::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebuild {
    /// Cached bindings are still valid
    None,
    /// Only dynamic offsets changed
    Offsets,
    /// Bound resources changed, rebuild everything
    Full,
}

/// Tracks the store versions a binding table was built from
#[derive(Debug, Clone, Default)]
pub struct BindingCacheTracker {
    last: Option<SharedValuesVersion>,
}

impl BindingCacheTracker {
    /// Tracker whose first check always returns [`Rebuild::Full`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the current store versions and remember them
    pub fn check(&mut self, values: &SharedMaterialValues) -> Rebuild {
        let current = SharedValuesVersion::of(values);
        let rebuild = match self.last {
            None => Rebuild::Full,
            Some(last) if last.pointer_version != current.pointer_version => Rebuild::Full,
            Some(last) if last.offset_version != current.offset_version => Rebuild::Offsets,
            Some(_) => Rebuild::None,
        };

        self.last = Some(current);
        rebuild
    }

    /// Force the next check to return [`Rebuild::Full`]
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Versions recorded by the last check
    pub fn last_version(&self) -> Option<SharedValuesVersion> {
        self.last
    }
}

#[cfg(test)]
#[path = "binding_cache_tests.rs"]
mod tests;
