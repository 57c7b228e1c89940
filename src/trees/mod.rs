pub mod gain;
pub mod id3;
pub mod node;
pub mod report;
