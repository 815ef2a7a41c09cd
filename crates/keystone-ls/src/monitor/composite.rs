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
    monitor::climb_monitor::{ClimbMonitor, Progress, SearchCommand},
    moves::Move,
    result::ClimbOutcome,
    stats::ClimbStatistics,
};
use keystone_model::configuration::Configuration;

/// Fans every event out to a list of monitors.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn ClimbMonitor + 'a>>,
}

impl<'a> CompositeMonitor<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: ClimbMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_boxed_monitor(&mut self, monitor: Box<dyn ClimbMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn monitors(&self) -> &[Box<dyn ClimbMonitor + 'a>] {
        &self.monitors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.monitors.iter().map(|m| m.name()))
            .finish()
    }
}

impl ClimbMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_start(&mut self, baseline: &Configuration, progress: &Progress) {
        for m in &mut self.monitors {
            m.on_start(baseline, progress);
        }
    }

    fn on_progress(&mut self, progress: &Progress) {
        for m in &mut self.monitors {
            m.on_progress(progress);
        }
    }

    fn on_improvement(&mut self, mv: &Move, configuration: &Configuration, progress: &Progress) {
        for m in &mut self.monitors {
            m.on_improvement(mv, configuration, progress);
        }
    }

    fn on_end(&mut self, outcome: &ClimbOutcome) {
        for m in &mut self.monitors {
            m.on_end(outcome);
        }
    }

    fn search_command(&mut self, statistics: &ClimbStatistics) -> SearchCommand {
        for m in &mut self.monitors {
            match m.search_command(statistics) {
                SearchCommand::Continue => continue,
                // First terminate request wins.
                terminate => return terminate,
            }
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{
        callback::ProgressCallback, interrupt::InterruptMonitor, no_op::NoOpMonitor,
    };
    use crate::budget::{BudgetState, LimitedBudget};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    struct Stopper(&'static str);

    impl ClimbMonitor for Stopper {
        fn name(&self) -> &str {
            self.0
        }
        fn on_start(&mut self, _: &Configuration, _: &Progress) {}
        fn on_progress(&mut self, _: &Progress) {}
        fn on_improvement(&mut self, _: &Move, _: &Configuration, _: &Progress) {}
        fn on_end(&mut self, _: &ClimbOutcome) {}
        fn search_command(&mut self, _: &ClimbStatistics) -> SearchCommand {
            SearchCommand::Terminate(self.0.to_string())
        }
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeMonitor::new();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&ClimbStatistics::default()),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_first_terminate_wins() {
        let flag = AtomicBool::new(false);
        let mut composite = CompositeMonitor::with_capacity(4);
        composite.add_monitor(NoOpMonitor::new());
        composite.add_monitor(InterruptMonitor::new(&flag));
        composite.add_monitor(Stopper("first"));
        composite.add_boxed_monitor(Box::new(Stopper("second")));
        assert_eq!(composite.len(), 4);

        assert_eq!(
            composite.search_command(&ClimbStatistics::default()),
            SearchCommand::Terminate("first".into())
        );
        assert_eq!(
            format!("{:?}", composite),
            r#"["NoOpMonitor", "InterruptMonitor", "first", "second"]"#
        );
    }

    #[test]
    fn test_events_reach_every_monitor() {
        let mut a = 0;
        let mut b = 0;
        {
            let mut composite = CompositeMonitor::new();
            composite.add_monitor(ProgressCallback::new(|_: &Progress| a += 1));
            composite.add_monitor(ProgressCallback::new(|_: &Progress| b += 1));
            composite.on_progress(&Progress {
                iteration: 1,
                baseline_fitness: 0.0,
                best_fitness: 0.0,
                budget: BudgetState::new(0, LimitedBudget::Unbounded),
                elapsed: Duration::ZERO,
            });
        }
        assert_eq!((a, b), (1, 1));
    }
}
