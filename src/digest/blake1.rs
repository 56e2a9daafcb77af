use byteorder::{BigEndian, ByteOrder};

use super::engine::{BlockAlgorithm, BlockEngine};

define_digest!(Blake256Digest, 32);
define_block!(Blake256Block, 64);

const BLOCK_SIZE: usize = 64;

// Message/constant permutation schedule; rounds past 9 wrap around.
// BLAKE2 reuses the same table, see `blake2s`.
pub(crate) const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

// First digits of pi.
const C: [u32; 16] = [
    0x243f6a88, 0x85a308d3, 0x13198a2e, 0x03707344, 0xa4093822, 0x299f31d0, 0x082efa98,
    0xec4e6c89, 0x452821e6, 0x38d01377, 0xbe5466cf, 0x34e90c6c, 0xc0ac29b7, 0xc97c50dd,
    0x3f84d5b5, 0xb5470917,
];

/// BLAKE-256 compression state (BLAKE v1, the SHA-3 finalist).
///
/// `t` is the streaming bit counter folded into the working vector on every
/// block. A final block that carries message bytes is folded with the full
/// message bit length; a padding-only final block is folded with zero.
#[derive(Debug, Clone)]
pub struct Blake256Core {
    h: [u32; 8],
    t: u64,
}

impl Blake256Core {
    fn compress(&mut self, block: &[u8], t: u64) {
        let mut m = [0u32; 16];
        BigEndian::read_u32_into(block, &mut m);

        let t0 = t as u32;
        let t1 = (t >> 32) as u32;
        let mut v = [0u32; 16];
        v[..8].copy_from_slice(&self.h);
        v[8..].copy_from_slice(&C[..8]);
        v[12] ^= t0;
        v[13] ^= t0;
        v[14] ^= t1;
        v[15] ^= t1;

        for round in 0..14 {
            let s = &SIGMA[round % 10];
            Self::g(&mut v, 0, 4, 8, 12, &m, s[0], s[1]);
            Self::g(&mut v, 1, 5, 9, 13, &m, s[2], s[3]);
            Self::g(&mut v, 2, 6, 10, 14, &m, s[4], s[5]);
            Self::g(&mut v, 3, 7, 11, 15, &m, s[6], s[7]);
            Self::g(&mut v, 0, 5, 10, 15, &m, s[8], s[9]);
            Self::g(&mut v, 1, 6, 11, 12, &m, s[10], s[11]);
            Self::g(&mut v, 2, 7, 8, 13, &m, s[12], s[13]);
            Self::g(&mut v, 3, 4, 9, 14, &m, s[14], s[15]);
        }

        for i in 0..8 {
            self.h[i] ^= v[i] ^ v[i + 8];
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn g(v: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, m: &[u32; 16], i: usize, j: usize) {
        v[a] = v[a].wrapping_add(v[b]).wrapping_add(m[i] ^ C[j]);
        v[d] = (v[d] ^ v[a]).rotate_right(16);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(12);
        v[a] = v[a].wrapping_add(v[b]).wrapping_add(m[j] ^ C[i]);
        v[d] = (v[d] ^ v[a]).rotate_right(8);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(7);
    }
}

impl BlockAlgorithm for Blake256Core {
    type Block = Blake256Block;
    type Digest = Blake256Digest;

    fn new() -> Self {
        Blake256Core {
            h: [
                0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c,
                0x1f83d9ab, 0x5be0cd19,
            ],
            t: 0,
        }
    }

    fn compress_block(&mut self, block: &[u8]) {
        self.t = self.t.wrapping_add((BLOCK_SIZE * 8) as u64);
        let t = self.t;
        self.compress(block, t);
    }

    fn finish(&mut self, tail: &[u8], message_len: u64) {
        let total_bits = message_len.wrapping_mul(8);

        // 0x80 delimiter, zero fill, a 0x01 closing marker right before the
        // 64-bit big-endian bit count.
        let mut padded = [0u8; BLOCK_SIZE * 2];
        padded[..tail.len()].copy_from_slice(tail);
        padded[tail.len()] = 0x80;
        let len = if tail.len() + 9 <= BLOCK_SIZE {
            BLOCK_SIZE
        } else {
            BLOCK_SIZE * 2
        };
        padded[len - 9] |= 0x01;
        BigEndian::write_u64(&mut padded[len - 8..len], total_bits);

        let mut t = if tail.is_empty() { 0 } else { total_bits };
        for block in padded[..len].chunks(BLOCK_SIZE) {
            self.compress(block, t);
            // any further block holds padding only
            t = 0;
        }
    }

    fn digest(&self) -> Blake256Digest {
        let mut result = [0; 32];
        BigEndian::write_u32_into(&self.h, &mut result);
        Blake256Digest(result)
    }
}

impl PartialEq for Blake256Core {
    fn eq(&self, other: &Self) -> bool {
        self.h == other.h
    }
}

pub type Blake256 = BlockEngine<Blake256Core>;
