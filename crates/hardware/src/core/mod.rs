pub mod buffer;
pub mod control;
pub mod datamover;
pub mod engine;
pub mod stream;
pub mod types;

pub use self::datamover::Datamover;
