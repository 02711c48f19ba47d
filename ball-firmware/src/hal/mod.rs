// Hardware Abstraction Layer (HAL) Module
//
// Implementierungen der ball-core Traits für die echte Hardware.
// Mocks für Tests liegen in ball-tests.

pub mod buttons;
pub mod led_writer;

pub use buttons::GpioInputs;
pub use led_writer::{LED_BUFFER_SIZE, RmtLedWriter};
