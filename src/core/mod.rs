pub mod color_map;
pub mod error;
pub mod file_io;
pub mod image_sink;
pub mod image_utils;
pub mod lookup_table;
pub mod stopwatch;
pub mod worker_pool;
