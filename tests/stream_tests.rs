// tests/stream_tests.rs
use cipher_engine::consts::AEAD_TAG_LEN;
use cipher_engine::stream::{apply, open, seal};
use cipher_engine::{Algorithm, CipherError};

fn counting(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

#[test]
fn test_apply_is_its_own_inverse() {
    for (algorithm, nonce_len) in [(Algorithm::ChaCha20, 12usize), (Algorithm::Salsa20, 8)] {
        let key = counting(32);
        let nonce = counting(nonce_len);
        let data = b"stream ciphers have no padding".to_vec();

        let ciphertext = apply(algorithm, &key, &nonce, 3, &data).unwrap();
        assert_eq!(ciphertext.len(), data.len());
        assert_ne!(ciphertext, data);
        assert_eq!(apply(algorithm, &key, &nonce, 3, &ciphertext).unwrap(), data);
    }
}

#[test]
fn test_counter_positions_the_keystream_in_64_byte_blocks() {
    for (algorithm, nonce_len) in [(Algorithm::ChaCha20, 12usize), (Algorithm::Salsa20, 8)] {
        let key = counting(32);
        let nonce = counting(nonce_len);
        let zeros = vec![0u8; 64 * 4];

        let keystream = apply(algorithm, &key, &nonce, 0, &zeros).unwrap();
        for block in 0..4u64 {
            let segment = apply(algorithm, &key, &nonce, block, &[0u8; 64]).unwrap();
            let start = block as usize * 64;
            assert_eq!(segment, keystream[start..start + 64], "{algorithm} block {block}");
        }
    }
}

#[test]
fn test_salsa20_accepts_counters_beyond_32_bits() {
    let key = counting(32);
    let nonce = counting(8);
    let high = u64::from(u32::MAX) + 10;

    let a = apply(Algorithm::Salsa20, &key, &nonce, high, &[0u8; 16]).unwrap();
    let b = apply(Algorithm::Salsa20, &key, &nonce, high + 1, &[0u8; 16]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_block_ciphers_are_not_stream_ciphers() {
    assert!(matches!(
        apply(Algorithm::Aes, &counting(32), &counting(12), 0, b"x"),
        Err(CipherError::UnsupportedCombination(_))
    ));
}

#[test]
fn test_wrong_sizes_surface_as_primitive_failures() {
    assert!(matches!(
        apply(Algorithm::ChaCha20, &counting(16), &counting(12), 0, b"x"),
        Err(CipherError::PrimitiveFailure(_))
    ));
    assert!(matches!(
        apply(Algorithm::Salsa20, &counting(32), &counting(12), 0, b"x"),
        Err(CipherError::PrimitiveFailure(_))
    ));
}

#[test]
fn test_chacha20_poly1305_seal_and_open() {
    let key = counting(32);
    let nonce = counting(12);

    let sealed = seal(&key, &nonce, b"hello").unwrap();
    assert_eq!(sealed.len(), 5 + AEAD_TAG_LEN);
    assert_eq!(open(&key, &nonce, &sealed).unwrap(), b"hello");

    let mut tag_flipped = sealed.clone();
    *tag_flipped.last_mut().unwrap() ^= 0x80;
    assert_eq!(
        open(&key, &nonce, &tag_flipped),
        Err(CipherError::AuthenticationFailed)
    );

    let other_nonce = counting(13)[1..].to_vec();
    assert_eq!(
        open(&key, &other_nonce, &sealed),
        Err(CipherError::AuthenticationFailed)
    );
}
