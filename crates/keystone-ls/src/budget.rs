// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Dual-budget accounting.
//!
//! A search run may spend two independent, non-fungible budgets. The free
//! budget pays for allocating new nodes and costs the player nothing; the
//! limited budget pays for deallocations (plain removals and the removal half
//! of a swap) and may be capped or unbounded. Unbounded is an explicit
//! `LimitedBudget::Unbounded` variant rather than a large sentinel number.
//!
//! `BudgetTracker` enforces `used <= available` for both counters at every
//! observable point. Asking it to apply a move it cannot afford is a bug in the
//! caller (the neighbor generator never emits such moves), so `apply` panics
//! instead of returning an error.

use crate::moves::Move;

/// The cap on the limited budget.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum LimitedBudget {
    Bounded(u32),
    #[default]
    Unbounded,
}

impl LimitedBudget {
    /// Returns the remaining units after `used`, or `None` when unbounded.
    #[inline]
    pub fn remaining(self, used: u32) -> Option<u32> {
        match self {
            LimitedBudget::Bounded(cap) => Some(cap.saturating_sub(used)),
            LimitedBudget::Unbounded => None,
        }
    }

    /// Returns `true` if `cost` more units fit after `used`.
    #[inline]
    pub fn allows(self, used: u32, cost: u32) -> bool {
        match self {
            LimitedBudget::Bounded(cap) => used
                .checked_add(cost)
                .is_some_and(|total| total <= cap),
            LimitedBudget::Unbounded => true,
        }
    }

    #[inline]
    pub fn is_unbounded(self) -> bool {
        matches!(self, LimitedBudget::Unbounded)
    }
}

impl std::fmt::Display for LimitedBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitedBudget::Bounded(cap) => write!(f, "{}", cap),
            LimitedBudget::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// A snapshot of both budget counters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BudgetState {
    pub free_available: u32,
    pub free_used: u32,
    pub limited_available: LimitedBudget,
    pub limited_used: u32,
}

impl BudgetState {
    /// Creates an unspent budget.
    #[inline]
    pub fn new(free_available: u32, limited_available: LimitedBudget) -> Self {
        Self {
            free_available,
            free_used: 0,
            limited_available,
            limited_used: 0,
        }
    }

    /// Returns the free units left.
    #[inline]
    pub fn free_remaining(&self) -> u32 {
        self.free_available.saturating_sub(self.free_used)
    }

    /// Returns the limited units left, or `None` when unbounded.
    #[inline]
    pub fn limited_remaining(&self) -> Option<u32> {
        self.limited_available.remaining(self.limited_used)
    }

    /// Returns `true` while at least one free unit remains.
    #[inline]
    pub fn has_free(&self) -> bool {
        self.free_remaining() > 0
    }

    /// Returns `true` while at least one limited unit remains.
    #[inline]
    pub fn has_limited(&self) -> bool {
        self.limited_available.allows(self.limited_used, 1)
    }

    /// Returns `true` if `used <= available` holds for both counters.
    #[inline]
    pub fn is_within_limits(&self) -> bool {
        self.free_used <= self.free_available
            && self.limited_available.allows(self.limited_used, 0)
    }

    /// Returns `true` if a move with the given costs fits.
    #[inline]
    pub fn fits(&self, free_cost: u32, limited_cost: u32) -> bool {
        self.free_used
            .checked_add(free_cost)
            .is_some_and(|total| total <= self.free_available)
            && self.limited_available.allows(self.limited_used, limited_cost)
    }
}

impl std::fmt::Display for BudgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "free {}/{}, limited {}/{}",
            self.free_used, self.free_available, self.limited_used, self.limited_available
        )
    }
}

/// Mutable dual-counter state of one search run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BudgetTracker {
    state: BudgetState,
}

impl BudgetTracker {
    /// Creates a tracker with nothing spent.
    #[inline]
    pub fn new(free_available: u32, limited_available: LimitedBudget) -> Self {
        Self {
            state: BudgetState::new(free_available, limited_available),
        }
    }

    /// Returns `true` if `mv` fits into the remaining budget.
    #[inline]
    pub fn can_apply(&self, mv: &Move) -> bool {
        self.state.fits(mv.free_cost(), mv.limited_cost())
    }

    /// Charges the cost of `mv` to both counters.
    ///
    /// # Panics
    ///
    /// Panics if `mv` does not fit; callers must only apply moves the
    /// generator emitted for the current budget.
    pub fn apply(&mut self, mv: &Move) {
        assert!(
            self.can_apply(mv),
            "called `BudgetTracker::apply` with a move that overruns the budget: move {}, budget {}",
            mv,
            self.state
        );
        self.state.free_used += mv.free_cost();
        self.state.limited_used += mv.limited_cost();
        debug_assert!(self.state.is_within_limits());
    }

    /// Returns a snapshot of both counters.
    #[inline]
    pub fn summary(&self) -> BudgetState {
        self.state
    }
}
