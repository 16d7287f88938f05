use rand::Rng;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const MIN_CODE_LEN: usize = 6;
const MAX_CODE_LEN: usize = 8;

/// Verification codes attached to bookings of verification-required types.
///
/// Generated on the client and stored by the backend, which confirms the
/// booking once the customer echoes the code back out-of-band.
pub struct VerificationCode;

impl VerificationCode {
    /// Generate a 6-8 character uppercase alphanumeric code. Ambiguous
    /// characters (0/O, 1/I) are left out of the alphabet.
    pub fn generate() -> String {
        let mut rng = rand::thread_rng();
        let len = rng.gen_range(MIN_CODE_LEN..=MAX_CODE_LEN);
        (0..len)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }

    pub fn is_valid_format(code: &str) -> bool {
        (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len())
            && code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    }
}
