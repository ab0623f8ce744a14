use std::thread;

const DEFAULT_CHUNK_SIZE: usize = 1 << 20;
const DEFAULT_PARALLEL_THRESHOLD: u64 = 8 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    pub chunk_size: usize,
    // files of at least this many bytes are read in parallel chunks
    pub parallel_threshold: u64,
    pub workers: usize,
}

impl Default for VmConfig {
    fn default() -> VmConfig {
        VmConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            workers: available_workers(),
        }
    }
}

impl VmConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> VmConfig {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: u64) -> VmConfig {
        self.parallel_threshold = parallel_threshold;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> VmConfig {
        self.workers = workers.max(1);
        self
    }

    pub fn sequential(self) -> VmConfig {
        self.with_parallel_threshold(u64::MAX)
    }
}

fn available_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps() {
        let config = VmConfig::default().with_chunk_size(0).with_workers(0);

        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn defaults() {
        let config = VmConfig::default();

        assert_eq!(config.chunk_size, 1024 * 1024);
        assert!(config.workers >= 1);
        assert_eq!(config.sequential().parallel_threshold, u64::MAX);
    }
}
