pub mod column;
pub mod table;
pub mod target;
pub mod value;
