mod countdown;
mod debouncer;

pub use countdown::Countdown;
pub use debouncer::Debouncer;
