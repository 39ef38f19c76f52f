//! Order processing: numbering, client resolution, submission pipeline

pub mod pipeline;
pub mod resolver;
pub mod sequencer;

pub use pipeline::{OrderPipeline, SubmitError, SubmitReceipt};
pub use resolver::ClientResolver;
pub use sequencer::{OrderSequencer, SequencerError};
