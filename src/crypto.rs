use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// The well-known default key, `"Adobe Systems 02"` (16 ASCII bytes).
///
/// Carried over unchanged: this crate makes no claim of hardening beyond the
/// source's wire-compatible default.
pub const DEFAULT_KEY: [u8; 16] = *b"Adobe Systems 02";

const BLOCK_SIZE: usize = 16;

/// A keyed 128-bit block cipher applied ECB-style to 16-byte aligned
/// regions, plus an optional message digest for handshake signatures.
pub trait CryptoProfile {
    fn init(&mut self, key: &[u8]) -> Result<()>;
    fn init_default(&mut self) -> Result<()> {
        let key = DEFAULT_KEY;
        self.init(&key)
    }
    /// Encrypts `buffer[offset..]` in place, one 16-byte block at a time.
    fn encrypt_at(&self, buffer: &mut [u8], offset: usize) -> Result<()>;
    /// Decrypts `buffer[offset..]` in place, one 16-byte block at a time.
    fn decrypt_at(&self, buffer: &mut [u8], offset: usize) -> Result<()>;
    /// A 32-byte digest of `data`, used for handshake signatures.
    fn digest(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let out = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&out);
        digest
    }
}

/// The cipher profile used by the source: AES-128 in ECB mode.
#[derive(Default)]
pub struct DefaultProfile {
    cipher: Option<Aes128>,
}

impl DefaultProfile {
    pub fn new() -> Self {
        DefaultProfile { cipher: None }
    }

    fn cipher(&self) -> Result<&Aes128> {
        self.cipher.as_ref().ok_or(Error::CryptoUninitialized)
    }
}

impl CryptoProfile for DefaultProfile {
    fn init(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != 16 {
            return Err(Error::InvalidKeyLength(key.len()));
        }
        let key_array = GenericArray::from_slice(key);
        self.cipher = Some(Aes128::new(key_array));
        Ok(())
    }

    fn encrypt_at(&self, buffer: &mut [u8], offset: usize) -> Result<()> {
        let cipher = self.cipher()?;
        for block in buffer[offset..].chunks_mut(BLOCK_SIZE) {
            if block.len() < BLOCK_SIZE {
                break;
            }
            let ga = GenericArray::from_mut_slice(block);
            cipher.encrypt_block(ga);
        }
        Ok(())
    }

    fn decrypt_at(&self, buffer: &mut [u8], offset: usize) -> Result<()> {
        let cipher = self.cipher()?;
        for block in buffer[offset..].chunks_mut(BLOCK_SIZE) {
            if block.len() < BLOCK_SIZE {
                break;
            }
            let ga = GenericArray::from_mut_slice(block);
            cipher.decrypt_block(ga);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_key_is_adobe_systems_02() {
        assert_eq!(&DEFAULT_KEY, b"Adobe Systems 02");
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let mut profile = DefaultProfile::new();
        profile.init_default().unwrap();

        let mut data = vec![0u8; 4 + 32];
        for (i, b) in data.iter_mut().enumerate().skip(4) {
            *b = i as u8;
        }
        let original = data.clone();

        profile.encrypt_at(&mut data, 4).unwrap();
        assert_ne!(&data[4..], &original[4..]);

        profile.decrypt_at(&mut data, 4).unwrap();
        assert_eq!(data, original);
    }

    #[test]
    fn test_uninitialized_profile_errors() {
        let profile = DefaultProfile::new();
        let mut data = vec![0u8; 16];
        assert!(matches!(
            profile.encrypt_at(&mut data, 0),
            Err(Error::CryptoUninitialized)
        ));
    }

    #[test]
    fn test_init_rejects_wrong_key_length() {
        let mut profile = DefaultProfile::new();
        assert!(matches!(
            profile.init(b"too short"),
            Err(Error::InvalidKeyLength(9))
        ));
        assert!(matches!(
            profile.init(&[0u8; 32]),
            Err(Error::InvalidKeyLength(32))
        ));
        assert!(matches!(profile.init(&[]), Err(Error::InvalidKeyLength(0))));
    }

    #[test]
    fn test_digest_is_32_bytes() {
        let profile = DefaultProfile::new();
        let digest = profile.digest(b"hello");
        assert_eq!(digest.len(), 32);
    }
}
