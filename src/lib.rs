//! This crate contains the streaming layer of Merkle-Damgård hash constructions: incremental
//! absorption of arbitrary byte spans into 64-byte blocks, the standard padding scheme (a single
//! 1-bit, zero fill and the 8-byte big-endian message length in bits) and big-endian digest
//! extraction. The compression function itself is not part of this layer; it is supplied through
//! the [`BlockCompress`] trait, so portable and architecture-specific implementations can be
//! swapped without touching the block bookkeeping.

pub mod sha1;
pub mod sha256;

/// the hash block length in bytes
pub const BLOCK_LENGTH_BYTES: usize = 64;

/// A compression function of a Merkle-Damgård hash. Implementors provide the initialization
/// constants and the round function; the streaming state machine [`MdState`] provides everything
/// else.
pub trait BlockCompress {
    /// The chaining-value array carried between compression calls, e.g. `[u32; 5]` for SHA1.
    type Words: Copy + AsRef<[u32]>;

    /// The digest array produced by [`MdState::finalize`], four bytes per chaining word.
    type Digest: Default + AsMut<[u8]>;

    /// The chaining values of the hash before any block has been compressed.
    const INITIAL: Self::Words;

    /// Compress all blocks in ``blocks`` into the chaining values, in order. ``blocks`` is
    /// guaranteed by the caller to be a non-empty multiple of [`BLOCK_LENGTH_BYTES`].
    fn compress(hash: &mut Self::Words, blocks: &[u8]);
}

/// The streaming state of a Merkle-Damgård hash. It buffers partial input until a full block is
/// available, hands complete blocks to the compression function `C` and tracks the total message
/// length for the final padding block.
///
/// A state is created with [`MdState::init`], fed with any partition of the message through
/// [`MdState::update`] and consumed by [`MdState::finalize`]. Because `finalize` takes the state
/// by value, feeding data into an already finalized hash is rejected at compile time; a state can
/// be recycled for a new message with [`MdState::reset`] instead.
pub struct MdState<C: BlockCompress> {
    hash: C::Words,
    message_length: u64,
    buffer: [u8; BLOCK_LENGTH_BYTES],
    buffer_fill: usize,
}

impl<C: BlockCompress> MdState<C> {
    /// Create the state of an empty message: initialization constants, a zeroed block buffer and
    /// a message length of zero.
    pub fn init() -> Self {
        MdState {
            hash: C::INITIAL,
            message_length: 0,
            buffer: [0; BLOCK_LENGTH_BYTES],
            buffer_fill: 0,
        }
    }

    /// Reset a used state so it is indistinguishable from a freshly initialized one.
    pub fn reset(&mut self) {
        *self = Self::init();
    }

    /// The total number of bytes digested so far, counting every byte passed to
    /// [`MdState::update`] regardless of whether its block has been compressed yet.
    pub fn message_length(&self) -> u64 {
        self.message_length
    }

    /// Digest more message data. The input may be empty and may be split at arbitrary points
    /// across calls; `update(a); update(b)` digests the same message as `update(ab)`.
    pub fn update(&mut self, mut input: &[u8]) {
        self.message_length += input.len() as u64;

        // drain the buffered tail of the previous call first
        if self.buffer_fill > 0 {
            let room = BLOCK_LENGTH_BYTES - self.buffer_fill;
            if input.len() < room {
                self.buffer[self.buffer_fill..self.buffer_fill + input.len()]
                    .copy_from_slice(input);
                self.buffer_fill += input.len();
                return;
            }

            self.buffer[self.buffer_fill..].copy_from_slice(&input[..room]);
            input = &input[room..];
            C::compress(&mut self.hash, &self.buffer);
            self.buffer = [0; BLOCK_LENGTH_BYTES];
            self.buffer_fill = 0;
        }

        // compress all whole blocks straight from the input, without copying
        let whole_blocks_length = input.len() / BLOCK_LENGTH_BYTES * BLOCK_LENGTH_BYTES;
        if whole_blocks_length > 0 {
            C::compress(&mut self.hash, &input[..whole_blocks_length]);
            input = &input[whole_blocks_length..];
        }

        // stash the remaining partial block until more data arrives
        if !input.is_empty() {
            self.buffer[..input.len()].copy_from_slice(input);
            self.buffer_fill = input.len();
        }
    }

    /// Pad and compress the last block(s) and extract the digest. Consumes the state; call
    /// [`MdState::init`] again to hash another message.
    pub fn finalize(mut self) -> C::Digest {
        let message_length_bits = self.message_length * 8;

        // append a single 1-bit to the end of the message
        self.buffer[self.buffer_fill] = 0x80;
        let fill = self.buffer_fill + 1;

        if fill <= BLOCK_LENGTH_BYTES - 8 {
            // the length still fits behind the padding bit
            for byte in &mut self.buffer[fill..BLOCK_LENGTH_BYTES - 8] {
                *byte = 0;
            }
            self.buffer[BLOCK_LENGTH_BYTES - 8..]
                .copy_from_slice(&message_length_bits.to_be_bytes());
            C::compress(&mut self.hash, &self.buffer);
        } else {
            // the padding overflows into a second, otherwise empty block
            let mut overflow_blocks = [0_u8; 2 * BLOCK_LENGTH_BYTES];
            overflow_blocks[..BLOCK_LENGTH_BYTES].copy_from_slice(&self.buffer);
            overflow_blocks[2 * BLOCK_LENGTH_BYTES - 8..]
                .copy_from_slice(&message_length_bits.to_be_bytes());
            C::compress(&mut self.hash, &overflow_blocks);
        }

        let mut digest = C::Digest::default();
        for (bytes, word) in digest
            .as_mut()
            .chunks_exact_mut(4)
            .zip(self.hash.as_ref().iter())
        {
            bytes.copy_from_slice(&word.to_be_bytes());
        }
        digest
    }
}

impl<C: BlockCompress> Default for MdState<C> {
    fn default() -> Self {
        Self::init()
    }
}

/// Copies the ``source`` array into the ``dest`` array, treating the data as big endian 32-bit
/// integers. ``source`` must hold at least four bytes per destination word.
pub(crate) fn be_words(dest: &mut [u32], source: &[u8]) {
    debug_assert!(source.len() >= dest.len() * 4);

    for (word, bytes) in dest.iter_mut().zip(source.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use super::sha1::SHA1State;

    pub const STREAM_TEXT: [&str; 3] = [
        "Then Ion called the Klavigar to Him, and together they sat for a time within the heart \
of the Leviathan. They spoke of many things, of the darkness to come, and of the Fall. For the \
Ozirmok knew of what would befall them all at Kythera. ",
        "And, in turn, He bade each of them to go forth and set in motion the beginning of the \
Great Plan. To Orok and to his disciple Halyna Ieva, He bade them to create the \
beginnings of a great force, one to rival that of the halkostana, but to do so in secret. ",
        "To Saarn and her disciple Naman, He bade to study life itself, how to consume more than \
merely the flesh, but to study the vitality of the soul."
    ];

    #[test]
    fn test_stream_equals_one_shot() {
        let mut state = SHA1State::init();
        state.update(STREAM_TEXT[0].as_bytes());
        state.update(STREAM_TEXT[1].as_bytes());
        state.update(STREAM_TEXT[2].as_bytes());

        let full_message = STREAM_TEXT.concat();
        assert_eq!(state.finalize(), sha1::digest(full_message.as_bytes()));
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut state = SHA1State::init();
        state.update(b"abc");
        state.update(b"");
        state.update(b"def");

        assert_eq!(state.finalize(), sha1::digest(b"abcdef"));
    }

    #[test]
    fn test_message_length_counter() {
        let mut state = SHA1State::init();
        state.update(&[0_u8; 13]);
        state.update(&[]);
        state.update(&[0_u8; 77]);

        assert_eq!(state.message_length(), 90);
    }

    #[test]
    fn test_reset_equals_fresh_state() {
        let mut state = SHA1State::init();
        state.update(b"some stale data that must not leak into the next digest");
        state.reset();
        state.update(b"abc");

        assert_eq!(state.finalize(), sha1::digest(b"abc"));
    }

    #[test]
    fn test_determinism() {
        assert_eq!(sha1::digest(b"determinism"), sha1::digest(b"determinism"));
    }

    #[test]
    fn test_be_words() {
        let mut dest = [0_u32; 2];
        be_words(&mut dest, &[0x12, 0x34, 0x56, 0x78, 0xFF, 0x00, 0xFF, 0x00]);
        assert_eq!([0x1234_5678_u32, 0xFF00_FF00_u32], dest);
    }

    proptest! {
        /// No partition of a message into update calls may change the digest.
        #[test]
        fn chunking_never_changes_the_digest(
            message in proptest::collection::vec(any::<u8>(), 0..320),
            raw_cuts in proptest::collection::vec(any::<usize>(), 0..8),
        ) {
            let mut cuts: Vec<usize> = raw_cuts
                .iter()
                .map(|cut| cut % (message.len() + 1))
                .collect();
            cuts.sort_unstable();

            let mut state = SHA1State::init();
            let mut previous_cut = 0;
            for &cut in &cuts {
                state.update(&message[previous_cut..cut]);
                previous_cut = cut;
            }
            state.update(&message[previous_cut..]);

            prop_assert_eq!(state.finalize(), sha1::digest(&message));
        }

        /// The length field in the padding counts every byte ever passed to update, no matter
        /// how the message was chunked.
        #[test]
        fn counter_is_chunking_independent(
            chunk_lengths in proptest::collection::vec(0_usize..100, 0..10),
        ) {
            let mut state = SHA1State::init();
            for &length in &chunk_lengths {
                state.update(&vec![0xAB_u8; length]);
            }

            let total: usize = chunk_lengths.iter().sum();
            prop_assert_eq!(state.message_length(), total as u64);
        }
    }
}
