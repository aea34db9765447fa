//! Scripted [`VideoGenerator`] for tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use longshot_generator::{
    Credentials, GenerationTask, GeneratorError, GeneratorResult, PlannedSegment, VideoGenerator,
};

#[derive(Debug, Clone)]
enum Outcome {
    Succeed,
    Fail(String),
    Panic,
}

/// Generator whose outcomes are fixed up front.
///
/// `plan` returns one segment per requested segment; `generate` returns the
/// configured path. Either step can be made to fail or panic, delayed, or
/// held until [`ScriptedGenerator::release`] is called.
#[derive(Debug)]
pub struct ScriptedGenerator {
    final_path: PathBuf,
    plan: Outcome,
    generate: Outcome,
    delay: Duration,
    gate: Option<Arc<Notify>>,
    plan_calls: AtomicUsize,
    generate_calls: AtomicUsize,
}

impl ScriptedGenerator {
    /// Generator that succeeds with `final_path`.
    pub fn succeeding(final_path: impl Into<PathBuf>) -> Self {
        Self {
            final_path: final_path.into(),
            plan: Outcome::Succeed,
            generate: Outcome::Succeed,
            delay: Duration::ZERO,
            gate: None,
            plan_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_plan(mut self, message: impl Into<String>) -> Self {
        self.plan = Outcome::Fail(message.into());
        self
    }

    pub fn failing_generate(mut self, message: impl Into<String>) -> Self {
        self.generate = Outcome::Fail(message.into());
        self
    }

    pub fn panicking_plan(mut self) -> Self {
        self.plan = Outcome::Panic;
        self
    }

    pub fn panicking_generate(mut self) -> Self {
        self.generate = Outcome::Panic;
        self
    }

    /// Sleep this long inside each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Hold `generate` until [`ScriptedGenerator::release`] is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held `generate` call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoGenerator for ScriptedGenerator {
    async fn plan(
        &self,
        _credentials: &Credentials,
        task: &GenerationTask,
    ) -> GeneratorResult<Vec<PlannedSegment>> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.plan {
            Outcome::Succeed => Ok((0..task.segment_count)
                .map(|index| PlannedSegment {
                    index,
                    prompt: format!("{} (part {})", task.base_prompt, index + 1),
                    seconds: task.seconds_per_segment,
                })
                .collect()),
            Outcome::Fail(msg) => Err(GeneratorError::request_failed(msg.clone())),
            Outcome::Panic => panic!("scripted plan panic"),
        }
    }

    async fn generate(
        &self,
        _credentials: &Credentials,
        _task: &GenerationTask,
    ) -> GeneratorResult<PathBuf> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.generate {
            Outcome::Succeed => Ok(self.final_path.clone()),
            Outcome::Fail(msg) => Err(GeneratorError::request_failed(msg.clone())),
            Outcome::Panic => panic!("scripted generate panic"),
        }
    }
}
