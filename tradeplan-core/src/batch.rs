//! Symbol batching — fixed-size, order-preserving chunks of the universe.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BatchError {
    #[error("batch size must be positive, got {size}")]
    InvalidSize { size: usize },
}

/// Split an ordered symbol list into chunks of at most `size` symbols.
///
/// The returned iterator is lazy and consumed once; concatenating its chunks
/// in order reproduces the input exactly. Empty input yields no chunks.
pub fn batch(symbols: &[String], size: usize) -> Result<Batches<'_>, BatchError> {
    if size == 0 {
        return Err(BatchError::InvalidSize { size });
    }
    Ok(Batches {
        remaining: symbols,
        size,
    })
}

/// Lazy iterator over symbol chunks. See [`batch`].
#[derive(Debug)]
pub struct Batches<'a> {
    remaining: &'a [String],
    size: usize,
}

impl<'a> Iterator for Batches<'a> {
    type Item = &'a [String];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let split = self.size.min(self.remaining.len());
        let (chunk, rest) = self.remaining.split_at(split);
        self.remaining = rest;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn even_split() {
        let input = symbols(&["A", "B", "C", "D"]);
        let chunks: Vec<&[String]> = batch(&input, 2).unwrap().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], &input[0..2]);
        assert_eq!(chunks[1], &input[2..4]);
    }

    #[test]
    fn remainder_lands_in_final_chunk() {
        let input = symbols(&["A", "B", "C", "D", "E"]);
        let chunks: Vec<&[String]> = batch(&input, 2).unwrap().collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 1);
        assert_eq!(chunks[2][0], "E");
    }

    #[test]
    fn single_oversized_chunk() {
        let input = symbols(&["A", "B"]);
        let chunks: Vec<&[String]> = batch(&input, 100).unwrap().collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], input.as_slice());
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let input: Vec<String> = Vec::new();
        assert_eq!(batch(&input, 10).unwrap().count(), 0);
    }

    #[test]
    fn zero_size_is_rejected() {
        let input = symbols(&["A"]);
        assert_eq!(
            batch(&input, 0).unwrap_err(),
            BatchError::InvalidSize { size: 0 }
        );
    }
}
