pub mod config;
pub mod output;
pub mod report;
pub mod scoring;
pub mod stderr_buffer;
pub mod survey;
