//! Fans preprocessed variants out to the registered decode backends
//!
//! Jobs are the cross product of variants and applicable backends, ordered
//! variant-major and then by registration order. A job that fails or panics
//! contributes nothing; it never aborts the frame.

use crate::backends::{
    DecodeBackend, DecodeRequest, GeneralBackend, LinearBackend, MatrixBackend,
};
use crate::config;
use crate::error::BackendError;
use crate::models::{BackendId, ImageVariant, RawDetection, SymbologySet};
use crate::settings::ScannerConfiguration;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, warn};

/// One (variant, backend) decode call
#[derive(Debug, Clone, Copy)]
struct Job {
    variant: usize,
    backend: usize,
    formats: SymbologySet,
}

/// Backend registry and variant fan-out
#[derive(Default)]
pub struct DecodeOrchestrator {
    backends: Vec<Box<dyn DecodeBackend>>,
}

impl DecodeOrchestrator {
    /// Orchestrator without backends
    pub fn new() -> Self {
        Self::default()
    }

    /// General, matrix and linear backends, in that order
    pub fn with_default_backends() -> Self {
        let mut orchestrator = Self::new();
        orchestrator
            .register(GeneralBackend::new())
            .register(MatrixBackend::new())
            .register(LinearBackend::new());
        orchestrator
    }

    /// Append a backend; registration order is job order
    pub fn register<B: DecodeBackend + 'static>(&mut self, backend: B) -> &mut Self {
        self.backends.push(Box::new(backend));
        self
    }

    /// Backends that would run for `config`, with the formats each is asked for
    pub fn plan(&self, config: &ScannerConfiguration) -> Vec<(BackendId, SymbologySet)> {
        let enabled = config.enabled_symbologies();
        self.backends
            .iter()
            .filter_map(|b| {
                let formats = enabled.intersection(b.domain());
                (!formats.is_empty()).then(|| (b.id(), formats))
            })
            .collect()
    }

    /// Decode every variant with every applicable backend.
    ///
    /// Returned polygons are in input-frame coordinates. Detections are
    /// concatenated in job order whether or not jobs ran in parallel.
    pub fn run(
        &self,
        variants: &[ImageVariant],
        config: &ScannerConfiguration,
    ) -> Vec<RawDetection> {
        let enabled = config.enabled_symbologies();
        let mut jobs = Vec::new();
        for variant in 0..variants.len() {
            for (backend, b) in self.backends.iter().enumerate() {
                let formats = enabled.intersection(b.domain());
                if !formats.is_empty() {
                    jobs.push(Job {
                        variant,
                        backend,
                        formats,
                    });
                }
            }
        }
        if jobs.is_empty() {
            debug!("no backend applicable to the enabled symbologies");
            return Vec::new();
        }

        let execute = |job: &Job| self.execute(job, &variants[job.variant], config);
        let per_job: Vec<Vec<RawDetection>> = if config::parallel_decode() {
            jobs.par_iter().map(execute).collect()
        } else {
            jobs.iter().map(execute).collect()
        };

        let detections: Vec<RawDetection> = per_job.into_iter().flatten().collect();
        debug!(
            jobs = jobs.len(),
            detections = detections.len(),
            "decode pass finished"
        );
        detections
    }

    fn execute(
        &self,
        job: &Job,
        variant: &ImageVariant,
        config: &ScannerConfiguration,
    ) -> Vec<RawDetection> {
        let backend = &self.backends[job.backend];
        let request = DecodeRequest::for_variant(variant, config, job.formats);

        let outcome = catch_unwind(AssertUnwindSafe(|| backend.decode(&request)))
            .unwrap_or_else(|payload| Err(BackendError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(mut detections) => {
                let to_frame = 1.0 / variant.magnification;
                for detection in &mut detections {
                    detection.source = backend.id();
                    detection.variant = variant.tag;
                    for p in &mut detection.polygon {
                        *p = p.scaled(to_frame);
                    }
                }
                detections
            }
            Err(e) => {
                warn!(
                    backend = %backend.id(),
                    scale = variant.tag.scale,
                    inverted = variant.tag.inverted,
                    error = %e,
                    "backend failed, treating as no detections"
                );
                Vec::new()
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
