use thiserror::Error;

/// Failures raised by the decode path.
///
/// The first three variants are format errors (the interchange string itself is
/// malformed), the next two are protocol errors (a structurally valid string
/// failed frame validation), and `SignalNotFound` means acquisition gave up on
/// the capture. All are terminal for the call that raised them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SrcWaveError {
    #[error("bit sequence must be {expected} characters, got {actual}")]
    SequenceLength { expected: usize, actual: usize },

    #[error("unrecognized character {0:?} in bit sequence")]
    UnexpectedCharacter(char),

    #[error("expected a space separator between the two frames")]
    MissingSeparator,

    #[error("frame {0} identification bits do not match")]
    FrameIdMismatch(u8),

    #[error("{0} parity bit is incorrect")]
    ParityMismatch(&'static str),

    #[error("could not find start of signal")]
    SignalNotFound,

    #[error("FFT error: {0}")]
    FftError(String),
}

pub type Result<T> = std::result::Result<T, SrcWaveError>;
