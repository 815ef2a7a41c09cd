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

use crate::{
    monitor::climb_monitor::{ClimbMonitor, Progress},
    moves::Move,
    result::ClimbOutcome,
};
use keystone_model::configuration::Configuration;

/// Adapts a closure into a progress observer.
///
/// The closure is called synchronously for every periodic progress snapshot.
pub struct ProgressCallback<F>
where
    F: FnMut(&Progress),
{
    callback: F,
    calls: u64,
}

impl<F> ProgressCallback<F>
where
    F: FnMut(&Progress),
{
    #[inline]
    pub fn new(callback: F) -> Self {
        Self { callback, calls: 0 }
    }

    /// Returns how many snapshots were delivered.
    #[inline]
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl<F> std::fmt::Debug for ProgressCallback<F>
where
    F: FnMut(&Progress),
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressCallback")
            .field("calls", &self.calls)
            .finish_non_exhaustive()
    }
}

impl<F> ClimbMonitor for ProgressCallback<F>
where
    F: FnMut(&Progress),
{
    fn name(&self) -> &str {
        "ProgressCallback"
    }

    fn on_start(&mut self, _baseline: &Configuration, _progress: &Progress) {}

    fn on_progress(&mut self, progress: &Progress) {
        self.calls += 1;
        (self.callback)(progress);
    }

    fn on_improvement(&mut self, _mv: &Move, _configuration: &Configuration, _progress: &Progress) {
    }

    fn on_end(&mut self, _outcome: &ClimbOutcome) {}
}
