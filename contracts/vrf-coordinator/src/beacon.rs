use cosmwasm_std::Uint256;
use drand_verify::Pubkey;
use sha2::{Digest, Sha256};

use crate::error::ContractError;

/// drand quicknet public key (G2, 96 bytes), hex encoded.
/// Scheme: bls-unchained-g1-rfc9380
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

/// Verify the quicknet signature for `round` and return its randomness,
/// `sha256(signature)`.
pub fn verify_beacon(
    pubkey_bytes: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], ContractError> {
    let pk_fixed: [u8; 96] =
        pubkey_bytes
            .try_into()
            .map_err(|_| ContractError::InvalidPubkeyLength {
                got: pubkey_bytes.len(),
            })?;

    // Quicknet is unchained, so the pubkey lives on G2 with the RFC 9380 hash-to-curve
    let pk = drand_verify::G2PubkeyRfc::from_fixed(pk_fixed).map_err(|_| {
        ContractError::VerificationFailed {
            round,
            reason: "invalid pubkey".to_string(),
        }
    })?;

    let valid = pk
        .verify(round, &[], signature)
        .map_err(|e| ContractError::VerificationFailed {
            round,
            reason: format!("{:?}", e),
        })?;
    if !valid {
        return Err(ContractError::VerificationFailed {
            round,
            reason: "invalid signature".to_string(),
        });
    }

    Ok(Sha256::digest(signature).into())
}

/// The latest drand round published at `time` (unix seconds).
/// Round 1 is published at genesis; before genesis there is no round.
pub fn round_at(genesis_time: u64, period_seconds: u64, time: u64) -> u64 {
    if time < genesis_time || period_seconds == 0 {
        return 0;
    }
    (time - genesis_time) / period_seconds + 1
}

/// Expand one beacon into `num_words` words bound to a request:
/// `word[i] = sha256(randomness || request_id_be || i_be)`.
pub fn expand_random_words(randomness: &[u8; 32], request_id: u64, num_words: u32) -> Vec<Uint256> {
    (0..num_words)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update(randomness);
            hasher.update(request_id.to_be_bytes());
            hasher.update(i.to_be_bytes());
            let digest: [u8; 32] = hasher.finalize().into();
            Uint256::from_be_bytes(digest)
        })
        .collect()
}
