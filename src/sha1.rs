#![allow(clippy::unreadable_literal)]

use crate::{be_words, BlockCompress, MdState, BLOCK_LENGTH_BYTES};

/// The chaining values of any SHA1 hash before data has been digested. From here, all blocks
/// are applied.
pub const INITIAL: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

/// The portable SHA1 compression function. Plug it into [`MdState`] to obtain the full hash;
/// see [`SHA1State`].
pub struct SHA1;

/// The streaming SHA1 hash state.
pub type SHA1State = MdState<SHA1>;

impl BlockCompress for SHA1 {
    type Words = [u32; 5];
    type Digest = [u8; 20];

    const INITIAL: [u32; 5] = INITIAL;

    fn compress(hash: &mut [u32; 5], blocks: &[u8]) {
        debug_assert!(!blocks.is_empty() && blocks.len() % BLOCK_LENGTH_BYTES == 0);

        for block in blocks.chunks_exact(BLOCK_LENGTH_BYTES) {
            round_function(hash, block);
        }
    }
}

/// Digest a full message of arbitrary size at once and return the raw SHA1 digest.
pub fn digest(input: &[u8]) -> [u8; 20] {
    let mut state = SHA1State::init();
    state.update(input);
    state.finalize()
}

fn round_function(hash: &mut [u32; 5], block: &[u8]) {
    let mut extended_block = [0_u32; 80];
    be_words(&mut extended_block[0..16], block);

    for i in 16..80 {
        extended_block[i] = u32::rotate_left(
            extended_block[i - 3]
                ^ extended_block[i - 8]
                ^ extended_block[i - 14]
                ^ extended_block[i - 16],
            1,
        )
    }

    let [mut a, mut b, mut c, mut d, mut e] = *hash;

    for (i, data_word) in extended_block.iter().enumerate() {
        let (scrambled_data, magic_constant) = match i {
            0..=19 => ((b & c) | (!b & d), 0x5A827999),
            20..=39 => (b ^ c ^ d, 0x6ED9EBA1),
            40..=59 => ((b & c) | (b & d) | (c & d), 0x8F1BBCDC),
            60..=79 => (b ^ c ^ d, 0xCA62C1D6),
            _ => unreachable!(),
        };

        let temp = u32::rotate_left(a, 5)
            .wrapping_add(scrambled_data)
            .wrapping_add(e)
            .wrapping_add(magic_constant)
            .wrapping_add(*data_word);
        e = d;
        d = c;
        c = u32::rotate_left(b, 30);
        b = a;
        a = temp;
    }

    hash[0] = hash[0].wrapping_add(a);
    hash[1] = hash[1].wrapping_add(b);
    hash[2] = hash[2].wrapping_add(c);
    hash[3] = hash[3].wrapping_add(d);
    hash[4] = hash[4].wrapping_add(e);
}
