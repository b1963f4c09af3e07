//! A small worker-pool helper for the one stage spec.md §5 allows to run
//! off the main thread: forward/inverse DCT + quantization over
//! independent blocks. The entropy stage is never routed through here - it
//! owns a DC predictor chain and must stay strictly sequential.
use scoped_threadpool::Pool;

/// Fill `out[i]` with `f(i)` for every index, splitting the work across
/// `num_cpus::get()` threads when there is more than one block to do.
/// Falls back to an inline loop on a single-core machine or a trivially
/// small slice, mirroring the teacher's conditional worker spawn.
pub(crate) fn parallel_fill<T, F>(out: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let threads = num_cpus::get().max(1);
    if threads <= 1 || out.len() <= 1 {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f(i);
        }
        return;
    }

    let chunk_size = (out.len() + threads - 1) / threads;
    let mut pool = Pool::new(threads as u32);
    pool.scoped(|scope| {
        for (chunk_idx, chunk) in out.chunks_mut(chunk_size).enumerate() {
            let f = &f;
            let base = chunk_idx * chunk_size;
            scope.execute(move || {
                for (offset, slot) in chunk.iter_mut().enumerate() {
                    *slot = f(base + offset);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_a_sequential_loop() {
        let mut out = vec![0usize; 257];
        parallel_fill(&mut out, |i| i * i);
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, i * i);
        }
    }
}
