//! Generación de códigos aleatorios
//!
//! Códigos de invitación de empresa y tokens de verificación/restablecimiento.

use rand::{distributions::Alphanumeric, Rng, RngCore};

pub const JOIN_CODE_LENGTH: usize = 8;

/// Código de 8 caracteres alfanuméricos para unirse a una empresa
pub fn generate_join_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(JOIN_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// 32 bytes aleatorios codificados en hexadecimal
pub fn generate_secure_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_code_shape() {
        let code = generate_join_code();
        assert_eq!(code.len(), JOIN_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_secure_token_shape() {
        let token = generate_secure_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_secure_token());
    }
}
