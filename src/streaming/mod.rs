//! Buffered binary record streams used by every pass in the pipeline.

pub mod buffers;
pub mod gesa;
pub mod inplace;
pub mod irrelevant;
pub mod records;

pub use buffers::{FixedRecord, RecordReader, RecordWriter};
pub use gesa::{GesaReader, GesaRecord, GesaWriter};
pub use inplace::InPlaceEditor;
pub use irrelevant::{IrrelevantBitReader, IrrelevantBitWriter};
pub use records::{
    DEncoder, DReader, DWriter, IdReader, IdWriter, LcpReader, LcpWriter, SymbolReader,
    SymbolWriter,
};
