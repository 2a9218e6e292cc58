pub mod client;
pub mod config;
pub mod deal;
pub mod hourglass;
pub mod logging;
pub mod render;
pub mod rng;
pub mod session;
pub mod storage;
pub mod ui;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
