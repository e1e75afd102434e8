pub mod console;
pub mod dispatch;
pub mod output;

pub use dispatch::{Dispatcher, Flow};
