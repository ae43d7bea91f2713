pub mod disk;
pub mod light_array;
