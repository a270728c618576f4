//! Encoding and decoding of the wire format, plus async helpers over tokio byte streams.

mod decode;
mod encode;
mod reader;
mod stream;
mod writer;

pub use decode::*;
pub use encode::*;
pub use reader::*;
pub use stream::*;
pub use writer::*;
