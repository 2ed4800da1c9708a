pub mod answer;
pub mod chunk;
pub mod document;
pub mod query_record;

pub use answer::{Answer, AnswerMode, Citation};
pub use chunk::Chunk;
pub use document::Document;
pub use query_record::QueryRecord;
