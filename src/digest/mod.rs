use std::fmt::Debug;

#[macro_use]
pub mod macros;
pub mod engine;
pub mod blake1;
pub mod blake2s;
pub mod md4;

/// A fixed-length digest value, exported from a finalized engine.
pub trait Digest: Clone + AsRef<[u8]> + Into<Box<[u8]>> + Debug {}

/// The streaming digest lifecycle: construct, feed any number of times,
/// finalize exactly once, then read the digest as often as needed.
///
/// `update` after `finalize`, a second `finalize`, and `digest` before
/// `finalize` are caller bugs; they trip debug assertions rather than
/// returning errors. `reset` is valid in any state and returns the engine
/// to its freshly-constructed form.
pub trait DigestAlgorithm {
    type Digest: Digest;

    fn new() -> Self;
    fn reset(&mut self);
    fn update(&mut self, input: &[u8]) -> &mut Self;
    fn finalize(&mut self) -> &mut Self;
    fn digest(&self) -> Self::Digest;

    fn compute(input: &[u8]) -> Self::Digest
    where
        Self: Sized,
    {
        let mut state = Self::new();
        state.update(input).finalize();
        state.digest()
    }
}
