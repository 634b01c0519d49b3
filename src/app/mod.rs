pub mod ports;
pub mod process_all_use_case;

pub use process_all_use_case::ProcessAllUseCase;
