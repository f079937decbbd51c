//! Short codes a user types to ask to join a company.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Alphabet without the look-alikes `0 O o I l 1`.
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";
pub const CODE_LENGTH: usize = 7;

/// Derives the join code of a company. The same id always yields the same code.
///
/// The id is hashed in mixed-endian byte order, with the first three groups
/// little-endian.
pub fn from_company_id(company_id: Uuid) -> String {
    let hash = Sha256::digest(company_id.to_bytes_le());
    hash.iter()
        .take(CODE_LENGTH)
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn code_has_fixed_length_and_alphabet() {
        let code = from_company_id(Uuid::new_v4());
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.bytes().all(|c| ALPHABET.contains(&c)));
    }

    #[test]
    fn code_avoids_ambiguous_characters() {
        for _ in 0..200 {
            let code = from_company_id(Uuid::new_v4());
            assert!(!code.contains(['0', 'O', 'o', 'I', 'l', '1']), "{code}");
        }
    }

    #[test]
    fn code_is_deterministic() {
        let id = Uuid::parse_str("12345678-1234-1234-1234-123456789abc").unwrap();
        assert_eq!(from_company_id(id), from_company_id(id));
        assert_eq!(from_company_id(Uuid::nil()).len(), CODE_LENGTH);
    }

    #[test]
    fn known_id_keeps_its_code() {
        let id = Uuid::parse_str("12345678-1234-1234-1234-123456789abc").unwrap();
        assert_eq!(from_company_id(id), "RRbwT22");
    }

    #[test]
    fn similar_ids_get_different_codes() {
        let a = Uuid::parse_str("12345678-1234-1234-1234-123456789abc").unwrap();
        let b = Uuid::parse_str("12345678-1234-1234-1234-123456789abd").unwrap();
        assert_ne!(from_company_id(a), from_company_id(b));
    }

    #[test]
    fn codes_rarely_collide() {
        let codes: HashSet<String> = (0..1000).map(|_| from_company_id(Uuid::new_v4())).collect();
        assert_eq!(codes.len(), 1000);
    }
}
