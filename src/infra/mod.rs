pub mod fs_snapshot_source;
pub mod in_memory_source;
pub mod json_report_writer;
