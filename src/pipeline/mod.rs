pub mod dump;
pub mod fs_ops;
pub mod icocur;
pub mod sniff;

#[cfg(test)]
mod pipeline_test;
