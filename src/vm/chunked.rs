use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder, ThreadPoolBuildError};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub offset: u64,
    pub len: usize,
}

pub fn plan_chunks(size: u64, chunk_size: usize) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);

    (0..size)
        .step_by(chunk_size)
        .enumerate()
        .map(|(index, offset)| Chunk {
            index,
            offset,
            len: (size - offset).min(chunk_size as u64) as usize,
        })
        .collect()
}

pub fn build_pool(workers: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|index| format!("genome-script-load-{}", index))
        .build()
}

fn read_chunk(path: &Path, chunk: Chunk) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(chunk.offset))?;

    let mut buffer = vec![0; chunk.len];
    file.read_exact(&mut buffer)?;

    trace!(chunk = chunk.index, offset = chunk.offset, len = chunk.len, "chunk read");

    Ok(buffer)
}

// the first failing chunk fails the whole read
pub fn read_chunked(
    pool: &ThreadPool,
    path: &Path,
    size: u64,
    chunk_size: usize,
) -> io::Result<Vec<u8>> {
    let chunks = plan_chunks(size, chunk_size);

    debug!(
        path = %path.display(),
        size,
        chunks = chunks.len(),
        chunk_size,
        workers = pool.current_num_threads(),
        "parallel load"
    );

    // `collect` on an indexed parallel iterator keeps chunk order
    let pieces = pool.install(|| {
        chunks
            .par_iter()
            .map(|chunk| read_chunk(path, *chunk))
            .collect::<io::Result<Vec<Vec<u8>>>>()
    })?;

    Ok(pieces.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use test_case::test_case;

    #[test_case(0, 4, vec![] ; "empty file")]
    #[test_case(8, 4, vec![(0, 4), (4, 4)] ; "exact multiple")]
    #[test_case(10, 4, vec![(0, 4), (4, 4), (8, 2)] ; "short last chunk")]
    #[test_case(3, 0, vec![(0, 1), (1, 1), (2, 1)] ; "zero chunk size")]
    fn test_plan(size: u64, chunk_size: usize, expected: Vec<(u64, usize)>) {
        let plan: Vec<_> = plan_chunks(size, chunk_size)
            .into_iter()
            .map(|chunk| (chunk.offset, chunk.len))
            .collect();

        assert_eq!(plan, expected)
    }

    #[test]
    fn merge_keeps_offset_order() {
        let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&content).unwrap();

        let pool = build_pool(4).unwrap();
        let bytes = read_chunked(&pool, file.path(), content.len() as u64, 7).unwrap();

        assert_eq!(bytes, content)
    }

    #[test]
    fn missing_file() {
        let pool = build_pool(2).unwrap();

        assert!(read_chunked(&pool, Path::new("/definitely/not/here"), 16, 4).is_err())
    }
}
