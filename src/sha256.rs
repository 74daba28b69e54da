#![allow(clippy::unreadable_literal)]

use crate::{be_words, BlockCompress, MdState, BLOCK_LENGTH_BYTES};

/// The chaining values of any SHA256 hash before data has been digested. From here, all blocks
/// are applied.
pub const INITIAL: [u32; 8] = [
    0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A,
    0x510E527F, 0x9B05688C, 0x1F83D9AB, 0x5BE0CD19,
];

/// binary floored fractional parts of cbrt(p) * 2^32 for the first 64 primes p
static ROUND_CONSTANTS: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5,
    0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3,
    0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc,
    0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7,
    0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13,
    0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3,
    0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5,
    0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208,
    0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// The portable SHA256 compression function. Plug it into [`MdState`] to obtain the full hash;
/// see [`SHA256State`].
pub struct SHA256;

/// The streaming SHA256 hash state.
pub type SHA256State = MdState<SHA256>;

impl BlockCompress for SHA256 {
    type Words = [u32; 8];
    type Digest = [u8; 32];

    const INITIAL: [u32; 8] = INITIAL;

    fn compress(hash: &mut [u32; 8], blocks: &[u8]) {
        debug_assert!(!blocks.is_empty() && blocks.len() % BLOCK_LENGTH_BYTES == 0);

        for block in blocks.chunks_exact(BLOCK_LENGTH_BYTES) {
            round_function(hash, block);
        }
    }
}

/// Digest a full message of arbitrary size at once and return the raw SHA256 digest.
pub fn digest(input: &[u8]) -> [u8; 32] {
    let mut state = SHA256State::init();
    state.update(input);
    state.finalize()
}

fn round_function(hash: &mut [u32; 8], block: &[u8]) {
    let mut extended_block = [0_u32; 64];
    be_words(&mut extended_block[0..16], block);

    for i in 16..64 {
        let spread_0 = u32::rotate_right(extended_block[i - 15], 7)
            ^ u32::rotate_right(extended_block[i - 15], 18)
            ^ (extended_block[i - 15] >> 3);
        let spread_1 = u32::rotate_right(extended_block[i - 2], 17)
            ^ u32::rotate_right(extended_block[i - 2], 19)
            ^ (extended_block[i - 2] >> 10);

        extended_block[i] = extended_block[i - 16]
            .wrapping_add(spread_0)
            .wrapping_add(extended_block[i - 7])
            .wrapping_add(spread_1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *hash;

    for (i, data_word) in extended_block.iter().enumerate() {
        let compress_1 =
            u32::rotate_right(e, 6) ^ u32::rotate_right(e, 11) ^ u32::rotate_right(e, 25);
        let choice = (e & f) ^ (!e & g);
        let temp_1 = h
            .wrapping_add(compress_1)
            .wrapping_add(choice)
            .wrapping_add(ROUND_CONSTANTS[i])
            .wrapping_add(*data_word);

        let compress_0 =
            u32::rotate_right(a, 2) ^ u32::rotate_right(a, 13) ^ u32::rotate_right(a, 22);
        let majority = (a & b) ^ (a & c) ^ (b & c);
        let temp_2 = compress_0.wrapping_add(majority);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(temp_1);
        d = c;
        c = b;
        b = a;
        a = temp_1.wrapping_add(temp_2);
    }

    hash[0] = hash[0].wrapping_add(a);
    hash[1] = hash[1].wrapping_add(b);
    hash[2] = hash[2].wrapping_add(c);
    hash[3] = hash[3].wrapping_add(d);
    hash[4] = hash[4].wrapping_add(e);
    hash[5] = hash[5].wrapping_add(f);
    hash[6] = hash[6].wrapping_add(g);
    hash[7] = hash[7].wrapping_add(h);
}
