//! Single-slot frame pipeline: infer, decode, suppress.
//!
//! The inference runtime is an external capability behind [`Infer`]. A
//! [`Pipeline`] owns one busy flag: [`Pipeline::try_begin`] hands out a
//! [`FrameCycle`] only while no other cycle is in flight, and the slot stays
//! taken until that cycle is dropped. Callers driving a capture timer should
//! keep the cycle alive through rendering so the next frame is pulled only
//! after the previous one is fully handled; frames arriving earlier are
//! skipped rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::decode::Decoder;
use crate::geometry::BoundingBox;
use crate::suppress::{suppress_with, NmsConfig};
use crate::trace::trace_event;
use crate::util::{TinyDetError, TinyDetResult};

/// An inference runtime mapping an input image to a flat detection tensor.
pub trait Infer {
    /// Input accepted by the runtime.
    type Image: ?Sized;
    /// Runtime-specific failure.
    type Error: std::fmt::Display;

    /// Runs the model on `image`.
    fn infer(&self, image: &Self::Image) -> Result<Vec<f32>, Self::Error>;
}

/// Per-cycle thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineSettings {
    /// Minimum decoded confidence; clamped to `[0, 1]`.
    pub confidence_threshold: f32,
    /// Suppression parameters.
    pub nms: NmsConfig,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            nms: NmsConfig::default(),
        }
    }
}

/// Inference engine plus decoder and suppressor behind a single-slot gate.
pub struct Pipeline<I> {
    engine: I,
    decoder: Decoder,
    settings: PipelineSettings,
    busy: AtomicBool,
}

impl<I: Infer> Pipeline<I> {
    /// Creates an idle pipeline with default settings.
    pub fn new(engine: I, decoder: Decoder) -> Self {
        Self {
            engine,
            decoder,
            settings: PipelineSettings::default(),
            busy: AtomicBool::new(false),
        }
    }

    /// Replaces the thresholds.
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the current thresholds.
    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Returns the decoder.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Returns the inference engine.
    pub fn engine(&self) -> &I {
        &self.engine
    }

    /// Returns true while a [`FrameCycle`] is alive.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claims the slot, or returns `None` if a cycle is already in flight.
    pub fn try_begin(&self) -> Option<FrameCycle<'_, I>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()?;
        Some(FrameCycle {
            pipeline: self,
            spent: false,
        })
    }

    /// Runs a full cycle on `image`, or returns `Ok(None)` when the frame is skipped.
    pub fn process(&self, image: &I::Image) -> TinyDetResult<Option<Vec<BoundingBox>>> {
        match self.try_begin() {
            Some(mut cycle) => cycle.run(image).map(Some),
            None => {
                trace_event!("frame_skipped");
                Ok(None)
            }
        }
    }
}

/// Exclusive claim on the pipeline slot for one frame; releases it on drop.
pub struct FrameCycle<'a, I> {
    pipeline: &'a Pipeline<I>,
    spent: bool,
}

impl<I: Infer> FrameCycle<'_, I> {
    /// Returns true once [`run`](Self::run) has been called.
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Infers, decodes and suppresses one frame.
    ///
    /// The slot stays claimed until the cycle is dropped, whatever the outcome.
    /// A cycle handles exactly one frame: any further call fails with
    /// `CycleSpent` without touching the engine.
    pub fn run(&mut self, image: &I::Image) -> TinyDetResult<Vec<BoundingBox>> {
        if self.spent {
            return Err(TinyDetError::CycleSpent);
        }
        self.spent = true;
        let pipeline = self.pipeline;
        let tensor = pipeline
            .engine
            .infer(image)
            .map_err(|err| TinyDetError::Inference {
                reason: err.to_string(),
            })?;
        let candidates = pipeline
            .decoder
            .decode(&tensor, pipeline.settings.confidence_threshold)?;
        Ok(suppress_with(&candidates, &pipeline.settings.nms))
    }
}

impl<I> Drop for FrameCycle<'_, I> {
    fn drop(&mut self) {
        self.pipeline.busy.store(false, Ordering::Release);
    }
}
