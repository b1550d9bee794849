//! Cooperative progress/cancellation context passed to operators.
//!
//! Grounded on the original `ComputeContext` used throughout the transform
//! pipeline: a pair of optional callbacks, absence of either meaning
//! "ignore". Operators consult `cancelled()` between search ranges and
//! report coarse milestones through `progress()`.

/// Cooperative progress/cancellation hooks for a single operator invocation.
#[derive(Default)]
pub struct ComputeContext<'a> {
    progress: Option<Box<dyn FnMut(u8) + 'a>>,
    cancelled: Option<Box<dyn Fn() -> bool + 'a>>,
}

impl<'a> ComputeContext<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_progress(mut self, f: impl FnMut(u8) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, f: impl Fn() -> bool + 'a) -> Self {
        self.cancelled = Some(Box::new(f));
        self
    }

    pub fn report_progress(&mut self, percent: u8) {
        if let Some(f) = self.progress.as_mut() {
            f(percent);
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.as_ref().is_some_and(|f| f())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn absent_callbacks_are_inert() {
        let mut ctx = ComputeContext::new();
        ctx.report_progress(50);
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn progress_and_cancellation_are_observed() {
        let seen = Cell::new(Vec::<u8>::new());
        let mut ctx = ComputeContext::new()
            .with_progress(|p| {
                let mut v = seen.take();
                v.push(p);
                seen.set(v);
            })
            .with_cancellation(|| true);
        ctx.report_progress(10);
        ctx.report_progress(100);
        assert_eq!(seen.into_inner(), vec![10, 100]);
        assert!(ctx.is_cancelled());
    }
}
