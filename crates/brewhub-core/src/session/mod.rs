mod alert;
mod clock;
mod engine;
mod resolver;
mod schedule;
mod ticker;
mod traits;

pub use alert::{AlertDispatcher, AlertSink, VIBRATION_PATTERN};
pub use clock::{Clock, TICK_QUANTUM_MS};
pub use engine::{BrewSession, DEFAULT_RATING};
pub use resolver::active_step_index;
pub use schedule::{PourStep, StepSchedule};
pub use ticker::Ticker;
pub use traits::{BeanInventory, BrewLogSink};
