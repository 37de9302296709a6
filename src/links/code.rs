//! Short code generation.

use rand::Rng;

use crate::links::CODE_ALPHABET;

/// Builds a random code of `length` symbols drawn from [`CODE_ALPHABET`].
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();

    std::iter::repeat_with(|| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}
