mod dispatcher;
mod scheduler;

pub use dispatcher::{ActionHandler, DispatchToken, Dispatcher};
pub use scheduler::{Scheduler, TimerKey};
