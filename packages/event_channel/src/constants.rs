// A poisoned registry lock can only come from a panic inside the channel itself, because no
// lock is held while handlers run. The registry may be half-updated, so we refuse to continue.
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned event channel lock - \
    the subscriber registry may be inconsistent and continued execution is not safe";

/// Diagnostic name used by channels that were not given one.
pub(crate) const UNNAMED_CHANNEL: &str = "unnamed";

/// Number of registrations a dispatch snapshot can hold without a heap allocation.
pub(crate) const INLINE_SNAPSHOT_CAPACITY: usize = 4;
