pub mod confusion;
pub mod evaluation;
