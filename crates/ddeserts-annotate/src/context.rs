//! Annotation run context
//!
//! The AnnotationContext is returned by every pipeline run and records what
//! happened: which stages ran, how long each took, and which columns they
//! added.

use crate::stage::StageKind;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// What one pipeline run did
#[derive(Debug, Clone)]
pub struct AnnotationContext {
    /// Unique trace ID for this run
    pub trace_id: Uuid,
    /// When the run started
    pub start_time: Instant,
    stages_run: Vec<StageKind>,
    stage_timings: Vec<(StageKind, Duration)>,
    columns_added: Vec<String>,
}

impl AnnotationContext {
    pub fn new() -> Self {
        Self::with_trace_id(Uuid::new_v4())
    }

    /// Create a context with a specific trace ID
    pub fn with_trace_id(trace_id: Uuid) -> Self {
        Self {
            trace_id,
            start_time: Instant::now(),
            stages_run: Vec::new(),
            stage_timings: Vec::new(),
            columns_added: Vec::new(),
        }
    }

    /// Time a stage and mark it as run if it succeeds
    pub fn time_stage<F, R, E>(&mut self, stage: StageKind, f: F) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
    {
        let start = Instant::now();
        let result = f();
        self.stage_timings.push((stage, start.elapsed()));
        if result.is_ok() {
            self.stages_run.push(stage);
        }
        result
    }

    /// Record columns that a stage registered for the first time
    pub fn record_columns<I>(&mut self, columns: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.columns_added.extend(columns);
    }

    pub fn stages_run(&self) -> &[StageKind] {
        &self.stages_run
    }

    pub fn stage_timings(&self) -> &[(StageKind, Duration)] {
        &self.stage_timings
    }

    /// Timing of one stage, if it ran
    pub fn stage_timing(&self, stage: StageKind) -> Option<Duration> {
        self.stage_timings
            .iter()
            .find(|(kind, _)| *kind == stage)
            .map(|(_, d)| *d)
    }

    pub fn columns_added(&self) -> &[String] {
        &self.columns_added
    }

    /// Get total elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for AnnotationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_stage_is_timed_but_not_run() {
        let mut ctx = AnnotationContext::new();
        let ok: Result<u32, String> = ctx.time_stage(StageKind::Other, || Ok(1));
        assert_eq!(ok, Ok(1));
        let err: Result<u32, String> = ctx.time_stage(StageKind::Dvap, || Err("boom".into()));
        assert!(err.is_err());

        assert_eq!(ctx.stages_run(), &[StageKind::Other]);
        assert_eq!(ctx.stage_timings().len(), 2);
        assert!(ctx.stage_timing(StageKind::Dvap).is_some());
        assert!(ctx.stage_timing(StageKind::Share).is_none());
    }

    #[test]
    fn test_trace_ids_differ() {
        assert_ne!(AnnotationContext::new().trace_id, AnnotationContext::new().trace_id);
    }
}
