/// Character set for generating short codes.
pub const ALPHABET_CHARS: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Default length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Source of random bytes, `nanoid`'s provider shape.
pub type RandomSource = fn(usize) -> Vec<u8>;

/// Produces candidate short codes.
///
/// Generators never consult storage: two calls may return the same code and
/// the caller is expected to deal with collisions.
pub trait CodeGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

/// Random fixed-length codes over [`ALPHABET_CHARS`].
#[derive(Debug, Clone, Copy)]
pub struct NanoidGenerator {
    length: usize,
    random: RandomSource,
}

impl NanoidGenerator {
    /// Generator backed by nanoid's default (OS seeded) randomness.
    pub fn new(length: usize) -> Self {
        Self::with_random(length, nanoid::rngs::default)
    }

    /// Generator drawing bytes from `random`, e.g. a fixed sequence in tests.
    pub fn with_random(length: usize, random: RandomSource) -> Self {
        Self { length, random }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for NanoidGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for NanoidGenerator {
    fn generate(&self) -> String {
        nanoid::format(self.random, ALPHABET_CHARS, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(size: usize) -> Vec<u8> {
        vec![0; size]
    }

    fn last_symbol(size: usize) -> Vec<u8> {
        vec![61; size]
    }

    #[test]
    fn test_alphabet_chars_const() {
        // Verify the alphabet has 62 characters (a-z, A-Z, 0-9)
        assert_eq!(ALPHABET_CHARS.len(), 62);
        assert!(ALPHABET_CHARS.iter().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_alphabet_chars_unique() {
        let unique: std::collections::HashSet<_> = ALPHABET_CHARS.iter().collect();
        assert_eq!(unique.len(), ALPHABET_CHARS.len());
    }

    #[test]
    fn test_generated_code_shape() {
        let generator = NanoidGenerator::default();

        for _ in 0..500 {
            let code = generator.generate();
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| ALPHABET_CHARS.contains(&c)), "bad code {code}");
        }
    }

    #[test]
    fn test_custom_length() {
        let generator = NanoidGenerator::new(12);
        assert_eq!(generator.length(), 12);
        assert_eq!(generator.generate().len(), 12);
    }

    #[test]
    fn test_injected_randomness_is_deterministic() {
        let first = NanoidGenerator::with_random(8, zeros);
        assert_eq!(first.generate(), "aaaaaaaa");
        assert_eq!(first.generate(), "aaaaaaaa");

        let last = NanoidGenerator::with_random(8, last_symbol);
        assert_eq!(last.generate(), "99999999");
    }

    #[test]
    fn test_generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NanoidGenerator>();
    }
}
