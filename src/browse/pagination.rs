/// Number of items rendered before the first "load more".
pub const INITIAL_CUTOFF: usize = 8;

/// Items revealed by each "load more".
pub const PAGE_INCREMENT: usize = 4;

/// How many of the filtered items are currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    initial: usize,
    increment: usize,
    cutoff: usize,
}

impl PaginationWindow {
    pub fn new(initial: usize, increment: usize) -> Self {
        Self {
            initial,
            increment: increment.max(1),
            cutoff: initial,
        }
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    /// Whether revealing more would show anything new.
    pub fn can_load_more(&self, full_match_count: usize) -> bool {
        self.cutoff < full_match_count
    }

    /// Grows the cutoff by one increment unless everything is already shown.
    ///
    /// Returns true when the cutoff changed.
    pub fn load_more(&mut self, full_match_count: usize) -> bool {
        if !self.can_load_more(full_match_count) {
            return false;
        }
        self.cutoff = self.cutoff.saturating_add(self.increment);
        true
    }

    pub fn reset(&mut self) {
        self.cutoff = self.initial;
    }
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self::new(INITIAL_CUTOFF, PAGE_INCREMENT)
    }
}
