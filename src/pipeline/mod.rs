pub mod classifier;
pub mod extraction;
pub mod matching;
pub mod response;
pub mod safety;
