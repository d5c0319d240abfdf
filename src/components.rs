pub mod figure;
pub mod style;
