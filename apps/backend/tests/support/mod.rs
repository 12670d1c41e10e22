pub mod app_builder;
pub mod logging;

pub use app_builder::{init_app, seeded_state, test_security};

// Initialize logging once per integration-test binary.
#[ctor::ctor]
fn init_test_logging() {
    logging::init();
}
