use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub exe_path: PathBuf,
    pub output_dir: PathBuf,
    /// Worker threads for the dump; 0 picks one per core.
    pub thread_count: usize,
}

impl Config {
    pub fn new(exe_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            exe_path: exe_path.into(),
            output_dir: output_dir.into(),
            thread_count: 0,
        }
    }

    pub fn with_threads(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }
}
