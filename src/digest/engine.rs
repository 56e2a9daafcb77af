use std::fmt::Debug;

use super::{Digest, DigestAlgorithm};

/// Storage for one compression block of pending bytes.
pub trait Block: AsRef<[u8]> + AsMut<[u8]> + Debug + Clone {
    fn new() -> Self;
    fn len() -> usize;
}

/// The per-algorithm half of an engine: the compression function plus the
/// padding scheme that builds and absorbs the final block(s).
///
/// `compress_block` consumes exactly one full block that is known not to be
/// the last. `finish` receives the remaining tail (anywhere from zero bytes
/// up to one full block) together with the total message length in bytes,
/// and must leave the chaining state ready for `digest`.
pub trait BlockAlgorithm {
    type Block: Block;
    type Digest: Digest;

    fn new() -> Self;
    fn compress_block(&mut self, block: &[u8]);
    fn finish(&mut self, tail: &[u8], message_len: u64);
    fn digest(&self) -> Self::Digest;
}

/// The shared streaming state machine: a one-block accumulator, a running
/// byte count, and the finalized flag, wrapped around a [`BlockAlgorithm`].
///
/// Feeding keeps the most recent full-or-partial block in the buffer and
/// drains it only once more input arrives. The genuinely last block
/// therefore always goes through `finish`, which BLAKE2s needs to set its
/// last-block flag; for the length-padded algorithms the deferral merely
/// shifts when the compression happens, not its result.
#[derive(Debug, Clone)]
pub struct BlockEngine<A: BlockAlgorithm> {
    inner: A,
    message_len: u64,
    buffer_len: usize,
    buffer: A::Block,
    finalized: bool,
}

impl<A: BlockAlgorithm> DigestAlgorithm for BlockEngine<A> {
    type Digest = A::Digest;

    fn new() -> Self {
        BlockEngine {
            inner: A::new(),
            message_len: 0,
            buffer_len: 0,
            buffer: A::Block::new(),
            finalized: false,
        }
    }

    fn reset(&mut self) {
        self.inner = A::new();
        self.message_len = 0;
        self.buffer_len = 0;
        self.finalized = false;
    }

    fn update(&mut self, mut input: &[u8]) -> &mut Self {
        debug_assert!(!self.finalized, "update after finalize");
        if input.is_empty() {
            return self;
        }
        self.message_len = self.message_len.wrapping_add(input.len() as u64);

        let block_len = A::Block::len();
        if self.buffer_len == block_len {
            // The deferred block is no longer the last one; drain it.
            self.inner.compress_block(self.buffer.as_ref());
            self.buffer_len = 0;
        } else if self.buffer_len > 0 {
            // Top the partial buffer up to one full block.
            let take = (block_len - self.buffer_len).min(input.len());
            self.buffer.as_mut()[self.buffer_len..self.buffer_len + take]
                .copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];
            if input.is_empty() {
                return self;
            }
            self.inner.compress_block(self.buffer.as_ref());
            self.buffer_len = 0;
        }

        // Buffer is empty; process whole blocks straight from the input,
        // keeping the trailing full-or-partial block for later.
        let tail_len = match input.len() % block_len {
            0 => block_len,
            r => r,
        };
        let bulk = input.len() - tail_len;
        for block in input[..bulk].chunks(block_len) {
            self.inner.compress_block(block);
        }
        self.buffer.as_mut()[..tail_len].copy_from_slice(&input[bulk..]);
        self.buffer_len = tail_len;
        self
    }

    fn finalize(&mut self) -> &mut Self {
        debug_assert!(!self.finalized, "finalize called twice");
        let tail = &self.buffer.as_ref()[..self.buffer_len];
        self.inner.finish(tail, self.message_len);
        self.buffer_len = 0;
        self.finalized = true;
        self
    }

    fn digest(&self) -> A::Digest {
        debug_assert!(self.finalized, "digest before finalize");
        self.inner.digest()
    }
}

impl<A: BlockAlgorithm + PartialEq> PartialEq for BlockEngine<A> {
    fn eq(&self, other: &Self) -> bool {
        // Chaining-state comparison; used to compare digests post-finalize.
        self.inner == other.inner
    }
}

#[cfg(test)]
mod tests {
    use std::slice;

    use super::super::blake1::Blake256;
    use super::super::blake2s::Blake2s;
    use super::super::md4::MD4;
    use super::super::DigestAlgorithm;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    fn assert_chunking_invariant<A: DigestAlgorithm>(data: &[u8]) {
        let whole = A::compute(data);

        let mut engine = A::new();
        for byte in data {
            engine.update(slice::from_ref(byte));
        }
        engine.finalize();
        assert_eq!(engine.digest().as_ref(), whole.as_ref(), "byte-wise feed");

        let mut engine = A::new();
        for block in data.chunks(64) {
            engine.update(block);
        }
        engine.finalize();
        assert_eq!(engine.digest().as_ref(), whole.as_ref(), "block-wise feed");

        for split in [1, 63, 64, 65, 127, 128, 129, data.len() / 2] {
            let split = split.min(data.len());
            let mut engine = A::new();
            engine.update(&data[..split]).update(&data[split..]).finalize();
            assert_eq!(engine.digest().as_ref(), whole.as_ref(), "split at {}", split);
        }

        let mut engine = A::new();
        engine.update(b"").update(data).update(b"").finalize();
        assert_eq!(engine.digest().as_ref(), whole.as_ref(), "empty feeds");
    }

    #[test]
    fn chunking_invariance_md4() {
        assert_chunking_invariant::<MD4>(&sample(1000));
        assert_chunking_invariant::<MD4>(&sample(128));
    }

    #[test]
    fn chunking_invariance_blake1() {
        assert_chunking_invariant::<Blake256>(&sample(1000));
        assert_chunking_invariant::<Blake256>(&sample(128));
    }

    #[test]
    fn chunking_invariance_blake2s() {
        assert_chunking_invariant::<Blake2s>(&sample(1000));
        assert_chunking_invariant::<Blake2s>(&sample(128));
    }

    #[test]
    fn digest_is_stable() {
        let mut engine = Blake2s::new();
        engine.update(b"abc").finalize();
        let first = engine.digest();
        let second = engine.digest();
        assert_eq!(first.as_ref(), second.as_ref());
    }

    #[test]
    fn reset_matches_fresh_engine() {
        let expected = MD4::compute(b"abc");

        // reset after finalize
        let mut engine = MD4::new();
        engine.update(b"something else entirely").finalize();
        engine.reset();
        engine.update(b"abc").finalize();
        assert_eq!(engine.digest().as_ref(), expected.as_ref());

        // reset mid-stream
        let mut engine = MD4::new();
        engine.update(&[0u8; 200]);
        engine.reset();
        engine.update(b"abc").finalize();
        assert_eq!(engine.digest().as_ref(), expected.as_ref());
    }

    #[test]
    fn engine_equality_tracks_chaining_state() {
        let mut left = Blake2s::new();
        let mut right = Blake2s::new();
        left.update(b"same input").finalize();
        right.update(b"same input").finalize();
        assert!(left == right);

        let mut other = Blake2s::new();
        other.update(b"different").finalize();
        assert!(left != other);
    }
}
