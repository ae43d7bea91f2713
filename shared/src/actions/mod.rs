pub mod action;
pub mod merge;
