mod merge;
mod sculpture_store;

pub use sculpture_store::{ChangeEvent, SculptureStore};
