use byteorder::{ByteOrder, LittleEndian};

use super::engine::{BlockAlgorithm, BlockEngine};

define_digest!(MD4Digest, 16);
define_block!(MD4Block, 64);

const BLOCK_SIZE: usize = 64;

/// MD4 compression state (RFC 1320).
#[derive(Debug, Clone, PartialEq)]
pub struct MD4Core {
    state: [u32; 4],
}

impl MD4Core {
    fn compress(&mut self, block: &[u8]) {
        let mut x = [0u32; 16];
        LittleEndian::read_u32_into(block, &mut x);

        let [mut a, mut b, mut c, mut d] = self.state;

        // Bitwise functions
        let f = |x: u32, y: u32, z: u32| (x & (y ^ z)) ^ z;
        let g = |x: u32, y: u32, z: u32| (x & y) | ((x | y) & z);
        let h = |x: u32, y: u32, z: u32| x ^ y ^ z;

        const S1: [u32; 4] = [3, 7, 11, 19];
        for i in 0..16 {
            let t = a
                .wrapping_add(f(b, c, d))
                .wrapping_add(x[i])
                .rotate_left(S1[i % 4]);
            (a, b, c, d) = (d, t, b, c);
        }

        const K2: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];
        const S2: [u32; 4] = [3, 5, 9, 13];
        for (i, &k) in K2.iter().enumerate() {
            let t = a
                .wrapping_add(g(b, c, d))
                .wrapping_add(x[k])
                .wrapping_add(0x5A82_7999)
                .rotate_left(S2[i % 4]);
            (a, b, c, d) = (d, t, b, c);
        }

        const K3: [usize; 16] = [0, 8, 4, 12, 2, 10, 6, 14, 1, 9, 5, 13, 3, 11, 7, 15];
        const S3: [u32; 4] = [3, 9, 11, 15];
        for (i, &k) in K3.iter().enumerate() {
            let t = a
                .wrapping_add(h(b, c, d))
                .wrapping_add(x[k])
                .wrapping_add(0x6ED9_EBA1)
                .rotate_left(S3[i % 4]);
            (a, b, c, d) = (d, t, b, c);
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
    }
}

impl BlockAlgorithm for MD4Core {
    type Block = MD4Block;
    type Digest = MD4Digest;

    fn new() -> Self {
        MD4Core {
            state: [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476],
        }
    }

    fn compress_block(&mut self, block: &[u8]) {
        self.compress(block);
    }

    fn finish(&mut self, tail: &[u8], message_len: u64) {
        // 0x80 delimiter, zero fill, then 64-bit little-endian bit count.
        let mut padded = [0u8; BLOCK_SIZE * 2];
        padded[..tail.len()].copy_from_slice(tail);
        padded[tail.len()] = 0x80;
        let len = if tail.len() + 9 <= BLOCK_SIZE {
            BLOCK_SIZE
        } else {
            BLOCK_SIZE * 2
        };
        LittleEndian::write_u64(&mut padded[len - 8..len], message_len.wrapping_mul(8));

        for block in padded[..len].chunks(BLOCK_SIZE) {
            self.compress(block);
        }
    }

    fn digest(&self) -> MD4Digest {
        let mut result = [0; 16];
        LittleEndian::write_u32_into(&self.state, &mut result);
        MD4Digest(result)
    }
}

pub type MD4 = BlockEngine<MD4Core>;

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::super::DigestAlgorithm;
    use super::*;

    fn test_md4(input: &[u8], expected: &[u8]) {
        let actual = MD4::compute(input);
        assert_eq!(actual.as_ref(), expected);
    }

    #[test]
    fn rfc1320_vectors() {
        test_md4(b"", &hex!("31d6cfe0d16ae931b73c59d7e0c089c0"));
        test_md4(b"a", &hex!("bde52cb31de33e46245e05fbdbd6fb24"));
        test_md4(b"abc", &hex!("a448017aaf21d8525fc10ae87aa6729d"));
        test_md4(b"message digest", &hex!("d9130a8164549fe818874806e1c7014b"));
        test_md4(
            b"abcdefghijklmnopqrstuvwxyz",
            &hex!("d79e1c308aa5bbcdeea8ed63df412da9"),
        );
        test_md4(
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
            &hex!("043f8582f241db351ce627e153e7f0e4"),
        );
        test_md4(
            b"12345678901234567890123456789012345678901234567890123456789012345678901234567890",
            &hex!("e33b4ddc9c38f2199c3e7b164fcc0536"),
        );
    }

    #[test]
    fn padding_boundaries() {
        let a = [b'a'; 128];
        test_md4(&a[..55], &hex!("c889c81dd86c4d2e025778944ea02881"));
        test_md4(&a[..56], &hex!("d5f9a9e9257077a5f08b0b92f348b0ad"));
        test_md4(&a[..63], &hex!("7ea3da77432d44c323671097d1348fc8"));
        test_md4(&a[..64], &hex!("52f5076fabd22680234a3fa9f9dc5732"));
        test_md4(&a[..65], &hex!("330e377bf231f3cacfecc2c182fe7e5b"));
        test_md4(&a[..119], &hex!("e65dd227ccef97fa1d34d70189120f76"));
        test_md4(&a[..128], &hex!("cb4a20a561558e29460190c91dced59f"));
    }

    #[test]
    fn multi_block() {
        let data: Vec<u8> = (0u32..1004).map(|i| (i % 251) as u8).collect();
        test_md4(&data, &hex!("ccb40ac1d84e2dfe34f697203572c7ce"));
    }
}
