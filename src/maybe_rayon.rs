// Copyright 2025 Lars Brubaker
// License: MIT
//
// Query batches go through `into_par_iter()` either way. With the `parallel`
// feature this is rayon; without it the same call resolves to a plain
// sequential iterator, so the evaluation code is written once.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Stand-in for `rayon::prelude::IntoParallelIterator` that hands back
    /// the ordinary iterator.
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;

/// Number of query points one worker handles with a single carried hint.
pub const CHUNK_POINTS: usize = 256;

/// Split `0..n` into contiguous `[start, end)` chunks of at most `chunk` items.
pub fn chunk_ranges(n: usize, chunk: usize) -> Vec<(usize, usize)> {
    let chunk = chunk.max(1);
    (0..n).step_by(chunk).map(|start| (start, (start + chunk).min(n))).collect()
}
