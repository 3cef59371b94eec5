use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};

use crate::error::WalletError;

/// Generate a new secp256k1 keypair and return (priv_hex, pub_hex_compressed).
/// The compressed public key hex doubles as the account identifier.
pub fn generate_keypair_hex() -> (String, String) {
    let secp = Secp256k1::new();
    let (sk, pk) = secp.generate_keypair(&mut OsRng);
    (hex::encode(sk.secret_bytes()), hex::encode(pk.serialize()))
}

/// A keypair able to sign on behalf of its public key.
#[derive(Debug, Clone)]
pub struct Account {
    secret_key: SecretKey,
    public_key: String,
}

impl Account {
    pub fn new() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, pk) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key: hex::encode(pk.serialize()),
        }
    }

    pub fn from_secret_hex(sk_hex: &str) -> Result<Self, WalletError> {
        let bytes = hex::decode(sk_hex).map_err(|_| WalletError::InvalidHex)?;
        let secret_key = SecretKey::from_slice(&bytes).map_err(|_| WalletError::InvalidKey)?;
        let secp = Secp256k1::signing_only();
        let pk = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(Self {
            secret_key,
            public_key: hex::encode(pk.serialize()),
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Sign a 32-byte digest; returns hex DER.
    pub fn sign(&self, msg32: [u8; 32]) -> Result<String, WalletError> {
        let secp = Secp256k1::signing_only();
        let msg = Message::from_slice(&msg32).map_err(|_| WalletError::InvalidHex)?;
        let sig = secp.sign_ecdsa(&msg, &self.secret_key);
        Ok(hex::encode(sig.serialize_der().to_vec()))
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify a signature (hex DER) against the given pubkey (hex, compressed) and message hash (32 bytes).
pub fn verify_signature_hex(
    pubkey_hex: &str,
    sig_hex: &str,
    msg32: [u8; 32],
) -> Result<bool, WalletError> {
    let secp = Secp256k1::verification_only();

    let sig_bytes = hex::decode(sig_hex).map_err(|_| WalletError::InvalidHex)?;
    let sig = Signature::from_der(&sig_bytes).map_err(|_| WalletError::InvalidSignature)?;

    let pk_bytes = hex::decode(pubkey_hex).map_err(|_| WalletError::InvalidHex)?;
    let pk = PublicKey::from_slice(&pk_bytes).map_err(|_| WalletError::InvalidKey)?;

    let msg = Message::from_slice(&msg32).map_err(|_| WalletError::InvalidHex)?;
    Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
}

/// Decode a hex SHA-256 digest into the fixed-size form the signer expects.
pub fn digest_bytes(digest_hex: &str) -> Result<[u8; 32], WalletError> {
    let bytes = hex::decode(digest_hex).map_err(|_| WalletError::InvalidHex)?;
    bytes.try_into().map_err(|_| WalletError::InvalidHex)
}
