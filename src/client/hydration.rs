use std::cell::Cell;

/// One-shot "mounted" flag. It starts false on every page load and is flipped
/// by the effect that runs after the first client render; nothing flips it
/// back.
#[derive(Debug, Default)]
pub struct HydrationFlag {
    hydrated: Cell<bool>,
}

impl HydrationFlag {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks hydration complete. Returns `true` only for the call that
    /// actually flipped the flag.
    #[inline]
    pub fn mark_hydrated(&self) -> bool {
        !self.hydrated.replace(true)
    }

    #[inline]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.get()
    }
}
