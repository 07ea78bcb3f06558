use rand::Rng;

/// Register codes are short enough to write on a whiteboard: 6 symbols from
/// a 36-letter alphabet, ~31 bits of entropy. Uniqueness is enforced by the
/// primary key at insert time, not here.
pub const CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();

    (0..CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_six_upper_alphanumerics() {
        for _ in 0..500 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn codes_vary_across_draws() {
        // 500 draws from a 36^6 space collide with negligible probability
        let codes: HashSet<String> = (0..500).map(|_| generate_code()).collect();
        assert!(codes.len() > 490);
    }
}
