pub mod greedy;
pub mod lexicon;
pub mod scoring;
pub mod segmentation;
pub mod statistics;
