use rand::RngCore;

const TOKEN_BYTES: usize = 20;

/// Generate a fresh opaque token key: 20 random bytes, hex encoded.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
