pub mod derived;
pub mod extract;
pub mod load_nested;
pub mod load_table;
