use std::fmt;

/// Convenience result type used across padbench.
pub type PadResult<T> = Result<T, PadError>;

/// Pipeline phase an iteration failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Compositing the source into the canvas.
    Copy,
    /// Optional in-place brightness transform.
    Transform,
    /// Codec initialisation and compression.
    Encode,
    /// Writing the compressed artifact.
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Copy => "copy",
            Self::Transform => "transform",
            Self::Encode => "encode",
            Self::Write => "write",
        })
    }
}

/// Whether a failed pass was a warmup or a timed iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    /// Untimed pass before the measured iterations.
    Warmup,
    /// Measured iteration.
    Timed,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warmup => "warmup iteration",
            Self::Timed => "iteration",
        })
    }
}

/// Coarse classification of a [`PadError`], stable across wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid dimensions, offsets or options.
    Validation,
    /// The codec could not be initialised for the requested settings.
    CodecInit,
    /// The codec rejected the buffer or failed while compressing.
    CodecCompress,
    /// Writing the output artifact failed.
    Io,
    /// Anything else.
    Other,
}

/// Top-level error taxonomy used by padbench APIs.
#[derive(thiserror::Error, Debug)]
pub enum PadError {
    /// Invalid user-provided geometry or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Codec initialisation failed.
    #[error("codec init error: {0}")]
    CodecInit(String),

    /// Codec compression failed.
    #[error("codec compress error: {0}")]
    CodecCompress(String),

    /// Filesystem error while writing an artifact.
    #[error("io error: {context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failure of a single benchmark iteration.
    #[error("{stage} {iteration} failed during {phase} phase: {source}")]
    Iteration {
        /// Warmup or timed pass.
        stage: RunStage,
        /// Zero-based index within its stage.
        iteration: usize,
        /// Phase that failed.
        phase: Phase,
        /// Original failure.
        #[source]
        source: Box<PadError>,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PadError {
    /// Build a [`PadError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PadError::CodecInit`] value.
    pub fn codec_init(msg: impl Into<String>) -> Self {
        Self::CodecInit(msg.into())
    }

    /// Build a [`PadError::CodecCompress`] value.
    pub fn codec_compress(msg: impl Into<String>) -> Self {
        Self::CodecCompress(msg.into())
    }

    /// Build a [`PadError::Io`] value.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Attach a timed iteration index and phase to an error.
    pub fn in_iteration(self, iteration: usize, phase: Phase) -> Self {
        self.in_stage(RunStage::Timed, iteration, phase)
    }

    /// Attach a warmup index and phase to an error.
    pub fn in_warmup(self, warmup: usize, phase: Phase) -> Self {
        self.in_stage(RunStage::Warmup, warmup, phase)
    }

    /// Attach stage, index and phase to an error.
    pub fn in_stage(self, stage: RunStage, iteration: usize, phase: Phase) -> Self {
        Self::Iteration {
            stage,
            iteration,
            phase,
            source: Box::new(self),
        }
    }

    /// Kind of the innermost error, looking through [`PadError::Iteration`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::CodecInit(_) => ErrorKind::CodecInit,
            Self::CodecCompress(_) => ErrorKind::CodecCompress,
            Self::Io { .. } => ErrorKind::Io,
            Self::Iteration { source, .. } => source.kind(),
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Stage of the failed pass when this error came out of the harness loop.
    pub fn stage(&self) -> Option<RunStage> {
        match self {
            Self::Iteration { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Index within its stage and phase when this error came out of the harness loop.
    pub fn location(&self) -> Option<(usize, Phase)> {
        match self {
            Self::Iteration {
                iteration, phase, ..
            } => Some((*iteration, *phase)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
