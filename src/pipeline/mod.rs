// Report enrichment pipeline: pure transforms over in-memory rows

pub mod processing;
