pub mod composer;

pub use composer::{DEFAULT_ADVICE, ResponseComposer};
