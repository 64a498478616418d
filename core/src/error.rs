use thiserror::Error;

#[derive(Debug, Error)]
pub enum CofdmError {
    #[error("unsupported sample rate: {0} Hz")]
    UnsupportedSampleRate(u32),

    #[error("unknown operation mode: {0}")]
    InvalidOperationMode(i32),

    #[error("audio buffer too small: need {needed} samples, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("produce() called before configure()")]
    NotConfigured,

    #[error("call sign longer than 9 characters")]
    CallSignTooLong,
}

pub type Result<T> = std::result::Result<T, CofdmError>;
