//! Pipeline runner that executes steps in sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, JobPhase, JobState, StepOutcome};

/// Pipeline that runs a sequence of steps.
///
/// Steps run strictly in order with validation before and after each one.
/// The first failure moves the job to `Failed` and stops the run.
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
    cancelled: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add a step to the pipeline.
    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Get a cancellation handle.
    ///
    /// Cancellation takes effect at the next step boundary; a running
    /// external tool is never interrupted.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run the pipeline with the given context and state.
    ///
    /// For each step: check cancellation, enter the step's phase, run
    /// `validate_input`, `execute`, and (on `Success`) `validate_output`.
    /// Leaves `state.phase` at `Done` or `Failed`.
    pub fn run(&self, ctx: &Context, state: &mut JobState) -> PipelineResult<PipelineRunResult> {
        let result = self.run_steps(ctx, state);
        match result {
            Ok(_) => state.enter(JobPhase::Done),
            Err(_) => state.fail(),
        }
        result
    }

    fn run_steps(&self, ctx: &Context, state: &mut JobState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult {
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        };

        let total_steps = self.steps.len();

        for (i, step) in self.steps.iter().enumerate() {
            if self.is_cancelled() {
                ctx.logger
                    .warn(&format!("Pipeline cancelled before step '{}'", step.name()));
                return Err(PipelineError::cancelled(&ctx.job_name));
            }

            let step_name = step.name();
            state.enter(step.phase());
            ctx.logger.phase(step_name);

            let percent = ((i as f64 / total_steps as f64) * 100.0) as u32;
            ctx.report_progress(step_name, percent, step.description());

            ctx.logger.debug(&format!("Validating input for '{}'", step_name));
            if let Err(e) = step.validate_input(ctx) {
                ctx.logger.error(&format!("Input validation failed: {}", e));
                return Err(PipelineError::step_failed(&ctx.job_name, step_name, e));
            }

            ctx.logger.debug(&format!("Executing '{}'", step_name));
            let outcome = step.execute(ctx, state).map_err(|e| {
                ctx.logger.error(&format!("Execution failed: {}", e));
                PipelineError::step_failed(&ctx.job_name, step_name, e)
            })?;

            match outcome {
                StepOutcome::Success => {
                    ctx.logger
                        .debug(&format!("Validating output for '{}'", step_name));
                    if let Err(e) = step.validate_output(ctx, state) {
                        ctx.logger.error(&format!("Output validation failed: {}", e));
                        return Err(PipelineError::step_failed(&ctx.job_name, step_name, e));
                    }

                    ctx.logger.success(&format!("{} completed", step_name));
                    result.steps_completed.push(step_name.to_string());
                }
                StepOutcome::Skipped(reason) => {
                    ctx.logger.info(&format!("{} skipped: {}", step_name, reason));
                    result.steps_skipped.push(step_name.to_string());
                }
            }
        }

        ctx.report_progress("Complete", 100, "Pipeline finished");
        ctx.logger.success("Pipeline completed successfully");

        Ok(result)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for cancelling a running pipeline.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel the pipeline at the next step boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineRunResult {
    /// Steps that completed successfully.
    pub steps_completed: Vec<String>,
    /// Steps that were skipped.
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// Check if all steps completed (none skipped).
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    /// Total number of steps that ran.
    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::errors::{StepError, StepResult};
    use crate::orchestrator::test_support::TestJob;
    use parking_lot::Mutex;

    struct RecordingStep {
        name: &'static str,
        phase: JobPhase,
        outcome: Result<StepOutcome, &'static str>,
        log: Arc<Mutex<Vec<(&'static str, JobPhase)>>>,
        cancel_after: Option<CancelHandle>,
    }

    impl RecordingStep {
        fn ok(name: &'static str, phase: JobPhase, log: &Arc<Mutex<Vec<(&'static str, JobPhase)>>>) -> Self {
            Self {
                name,
                phase,
                outcome: Ok(StepOutcome::Success),
                log: Arc::clone(log),
                cancel_after: None,
            }
        }
    }

    impl PipelineStep for RecordingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn phase(&self) -> JobPhase {
            self.phase
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
            self.log.lock().push((self.name, state.phase));
            if let Some(ref handle) = self.cancel_after {
                handle.cancel();
            }
            self.outcome
                .clone()
                .map_err(StepError::precondition_failed)
        }

        fn validate_output(&self, _ctx: &Context, _state: &JobState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn pipeline_builds_correctly() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .with_step(RecordingStep::ok("Step1", JobPhase::Transcoding, &log))
            .with_step(RecordingStep::ok("Step2", JobPhase::Authoring, &log));

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Step1", "Step2"]);
    }

    #[test]
    fn steps_run_in_order_through_phases() {
        let fixture = TestJob::new();
        let ctx = fixture.context();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut skipped = RecordingStep::ok("C", JobPhase::Burning, &log);
        skipped.outcome = Ok(StepOutcome::Skipped("not requested".to_string()));

        let pipeline = Pipeline::new()
            .with_step(RecordingStep::ok("A", JobPhase::Transcoding, &log))
            .with_step(RecordingStep::ok("B", JobPhase::Authoring, &log))
            .with_step(skipped);

        let mut state = JobState::new("job");
        let result = pipeline.run(&ctx, &mut state).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                ("A", JobPhase::Transcoding),
                ("B", JobPhase::Authoring),
                ("C", JobPhase::Burning),
            ]
        );
        assert_eq!(result.steps_completed, vec!["A", "B"]);
        assert_eq!(result.steps_skipped, vec!["C"]);
        assert!(!result.all_completed());
        assert_eq!(result.total_steps(), 3);
        assert_eq!(state.phase, JobPhase::Done);
    }

    #[test]
    fn progress_reports_step_descriptions() {
        let fixture = TestJob::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ctx = fixture
            .context()
            .with_progress_callback(Box::new(move |step, percent, message| {
                sink.lock().push((step.to_string(), percent, message.to_string()));
            }));
        let log = Arc::new(Mutex::new(Vec::new()));

        let pipeline = Pipeline::new()
            .with_step(RecordingStep::ok("A", JobPhase::Transcoding, &log))
            .with_step(RecordingStep::ok("B", JobPhase::Authoring, &log));
        pipeline.run(&ctx, &mut JobState::new("job")).unwrap();

        assert_eq!(
            *seen.lock(),
            vec![
                ("A".to_string(), 0, "A".to_string()),
                ("B".to_string(), 50, "B".to_string()),
            ]
        );
    }

    #[test]
    fn failure_stops_pipeline() {
        let fixture = TestJob::new();
        let ctx = fixture.context();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut failing = RecordingStep::ok("A", JobPhase::Transcoding, &log);
        failing.outcome = Err("boom");

        let pipeline = Pipeline::new()
            .with_step(failing)
            .with_step(RecordingStep::ok("B", JobPhase::Authoring, &log));

        let mut state = JobState::new("job");
        let err = pipeline.run(&ctx, &mut state).unwrap_err();

        assert_eq!(err.failed_stage(), Some("A"));
        assert_eq!(log.lock().len(), 1);
        assert_eq!(state.phase, JobPhase::Failed);
        assert_eq!(state.failed_in, Some(JobPhase::Transcoding));
    }

    #[test]
    fn cancel_stops_at_next_boundary() {
        let fixture = TestJob::new();
        let ctx = fixture.context();
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut pipeline = Pipeline::new();
        let mut first = RecordingStep::ok("A", JobPhase::Transcoding, &log);
        first.cancel_after = Some(pipeline.cancel_handle());
        pipeline.add_step(first);
        pipeline.add_step(RecordingStep::ok("B", JobPhase::Authoring, &log));

        let mut state = JobState::new("job");
        let err = pipeline.run(&ctx, &mut state).unwrap_err();

        assert!(matches!(err, PipelineError::Cancelled { .. }));
        assert_eq!(log.lock().len(), 1);
        assert_eq!(state.phase, JobPhase::Failed);
    }

    #[test]
    fn cancel_handle_works() {
        let pipeline = Pipeline::new();
        let handle = pipeline.cancel_handle();

        assert!(!pipeline.is_cancelled());
        handle.cancel();
        assert!(pipeline.is_cancelled());
        assert!(handle.is_cancelled());
    }
}
