use byteorder::{ByteOrder, LittleEndian};

use super::blake1::SIGMA;
use super::engine::{BlockAlgorithm, BlockEngine};

define_digest!(Blake2sDigest, 32);
define_block!(Blake2sBlock, 64);

const BLOCK_SIZE: usize = 64;

const IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab,
    0x5be0cd19,
];

/// BLAKE2s compression state (RFC 7693, unkeyed, 32-byte output).
///
/// `t` counts absorbed message bytes. There is no length padding; instead
/// the last block is compressed with an inverted IV word as the final-block
/// flag, which is why the engine must hand the true last block to `finish`.
#[derive(Debug, Clone)]
pub struct Blake2sCore {
    h: [u32; 8],
    t: u64,
}

impl Blake2sCore {
    fn compress(&mut self, block: &[u8], last: bool) {
        let mut m = [0u32; 16];
        LittleEndian::read_u32_into(block, &mut m);

        let mut v = [0u32; 16];
        v[..8].copy_from_slice(&self.h);
        v[8..].copy_from_slice(&IV);
        v[12] ^= self.t as u32;
        v[13] ^= (self.t >> 32) as u32;
        if last {
            v[14] = !v[14];
        }

        for s in &SIGMA {
            Self::g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
            Self::g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
            Self::g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
            Self::g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
            Self::g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
            Self::g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
            Self::g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
            Self::g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
        }

        for i in 0..8 {
            self.h[i] ^= v[i] ^ v[i + 8];
        }
    }

    fn g(v: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, x: u32, y: u32) {
        v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
        v[d] = (v[d] ^ v[a]).rotate_right(16);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(12);
        v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
        v[d] = (v[d] ^ v[a]).rotate_right(8);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(7);
    }
}

impl BlockAlgorithm for Blake2sCore {
    type Block = Blake2sBlock;
    type Digest = Blake2sDigest;

    fn new() -> Self {
        let mut h = IV;
        // parameter block: digest length 32, fanout 1, depth 1
        h[0] ^= 0x0101_0000 ^ 32;
        Blake2sCore { h, t: 0 }
    }

    fn compress_block(&mut self, block: &[u8]) {
        self.t = self.t.wrapping_add(BLOCK_SIZE as u64);
        self.compress(block, false);
    }

    fn finish(&mut self, tail: &[u8], _message_len: u64) {
        // no delimiter: zero-fill the tail and flag the last block instead
        let mut block = [0u8; BLOCK_SIZE];
        block[..tail.len()].copy_from_slice(tail);
        self.t = self.t.wrapping_add(tail.len() as u64);
        self.compress(&block, true);
    }

    fn digest(&self) -> Blake2sDigest {
        let mut result = [0; 32];
        LittleEndian::write_u32_into(&self.h, &mut result);
        Blake2sDigest(result)
    }
}

impl PartialEq for Blake2sCore {
    fn eq(&self, other: &Self) -> bool {
        self.h == other.h
    }
}

pub type Blake2s = BlockEngine<Blake2sCore>;
