//! Schedule repository backends.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileScheduleRepository;
pub use memory::InMemoryScheduleRepository;
