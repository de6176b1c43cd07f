pub mod handler;
pub mod mission_state;
pub mod processor;
pub mod signal;


pub use handler::SignalHandler;
pub use processor::EventProcessor;
pub use signal::MissionSignal;
