// tests/engine_tests.rs
mod common;
use common::{counting, request, setup};

use cipher_engine::consts::AEAD_TAG_LEN;
use cipher_engine::kdf;
use cipher_engine::{
    generate_iv, generate_key, process, AesKeySize, AesMode, ChainMode, CipherError,
    CipherRequest, CipherSpec, Direction, EncodeOptions, Encoding, HashAlgorithm, KdfSpec,
    KeyMaterial, PaddingScheme,
};

const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

fn aes(mode: AesMode, key_size: AesKeySize) -> CipherSpec {
    CipherSpec::Aes { mode, key_size }
}

fn all_specs() -> Vec<CipherSpec> {
    let mut specs = Vec::new();
    for key_size in [AesKeySize::Aes128, AesKeySize::Aes192, AesKeySize::Aes256] {
        for mode in [
            AesMode::Gcm,
            AesMode::Cbc,
            AesMode::Cfb,
            AesMode::Ctr,
            AesMode::Ofb,
            AesMode::Ecb,
        ] {
            specs.push(aes(mode, key_size));
        }
    }
    for mode in [ChainMode::Cbc, ChainMode::Ecb] {
        specs.extend([
            CipherSpec::Des { mode },
            CipherSpec::TripleDes { mode },
            CipherSpec::Blowfish { mode },
            CipherSpec::Twofish { mode },
        ]);
    }
    specs.extend([
        CipherSpec::ChaCha20 { aead: false },
        CipherSpec::ChaCha20 { aead: true },
        CipherSpec::Salsa20,
    ]);
    specs
}

fn encrypt_then_decrypt(
    spec: CipherSpec,
    padding: Option<PaddingScheme>,
    key: &[u8],
    iv: Option<&[u8]>,
    plaintext: &[u8],
) -> (Vec<u8>, Vec<u8>) {
    let mut enc = request(Direction::Encrypt, spec, key, iv, plaintext);
    enc.padding = padding;
    let ciphertext = process(&enc).unwrap().bytes;

    let mut dec = request(Direction::Decrypt, spec, key, iv, &ciphertext);
    dec.padding = padding;
    let recovered = process(&dec).unwrap().bytes;

    (ciphertext, recovered)
}

#[test]
fn test_aes256_cbc_known_answer_and_text_round_trip() {
    setup();
    let spec = aes(AesMode::Cbc, AesKeySize::Aes256);

    let enc = CipherRequest::encrypt(spec, KeyMaterial::raw(vec![0u8; 32]))
        .with_padding(PaddingScheme::Pkcs7)
        .with_iv(vec![0u8; 16])
        .with_text_input("test", Encoding::Utf8)
        .with_output(Encoding::Hex);
    let result = process(&enc).unwrap();
    assert_eq!(
        result.text.as_deref(),
        Some("d870798858223f4564d340b103f6527b")
    );
    assert!(!result.is_lossy_text);

    let dec = CipherRequest::decrypt(spec, KeyMaterial::raw(vec![0u8; 32]))
        .with_padding(PaddingScheme::Pkcs7)
        .with_iv(vec![0u8; 16])
        .with_text_input("d870798858223f4564d340b103f6527b", Encoding::Hex)
        .with_output(Encoding::Utf8);
    let result = process(&dec).unwrap();
    assert_eq!(result.text.as_deref(), Some("test"));
    assert_eq!(result.bytes, b"test");
    assert!(!result.is_lossy_text);
}

#[test]
fn test_every_combination_round_trips() {
    setup();
    for spec in all_specs() {
        let key = generate_key(&spec).unwrap();
        let iv = generate_iv(&spec).unwrap();
        for len in [0usize, 1, 7, 8, 15, 16, 17, 64, 100] {
            let plaintext = counting(len);
            let (_, recovered) =
                encrypt_then_decrypt(spec, None, &key, iv.as_deref(), &plaintext);
            assert_eq!(recovered, plaintext, "{spec} with {len}-byte input");
        }
    }
}

#[test]
fn test_every_padding_scheme_round_trips_on_every_block_cipher() {
    setup();
    let schemes = [
        PaddingScheme::Pkcs7,
        PaddingScheme::AnsiX923,
        PaddingScheme::Iso10126,
        PaddingScheme::Iso97971,
        PaddingScheme::ZeroPadding,
    ];
    let padded_specs: Vec<CipherSpec> = all_specs()
        .into_iter()
        .filter(CipherSpec::uses_padding)
        .collect();

    for spec in padded_specs {
        let key = generate_key(&spec).unwrap();
        let iv = generate_iv(&spec).unwrap();
        for scheme in schemes {
            // ZeroPadding cannot keep trailing zeros, so end on a non-zero byte
            for len in [1usize, 8, 15, 16, 17, 33] {
                let plaintext: Vec<u8> = (1..=len).map(|i| i as u8).collect();
                let (_, recovered) =
                    encrypt_then_decrypt(spec, Some(scheme), &key, iv.as_deref(), &plaintext);
                assert_eq!(recovered, plaintext, "{spec} {scheme:?} {len} bytes");
            }
        }
    }
}

#[test]
fn test_padding_adds_full_block_on_aligned_input_except_zero_padding() {
    let spec = aes(AesMode::Cbc, AesKeySize::Aes128);
    let key = counting(16);
    let iv = counting(16);
    let aligned = [0x41u8; 32];

    for (scheme, expected_len) in [
        (PaddingScheme::Pkcs7, 48),
        (PaddingScheme::AnsiX923, 48),
        (PaddingScheme::Iso10126, 48),
        (PaddingScheme::Iso97971, 48),
        (PaddingScheme::ZeroPadding, 32),
        (PaddingScheme::NoPadding, 32),
    ] {
        let req = request(Direction::Encrypt, spec, &key, Some(&iv), &aligned)
            .with_padding(scheme);
        assert_eq!(process(&req).unwrap().bytes.len(), expected_len, "{scheme:?}");
    }
}

#[test]
fn test_no_padding_requires_aligned_plaintext() {
    let spec = CipherSpec::Des {
        mode: ChainMode::Cbc,
    };
    let key = counting(8);
    let iv = counting(8);

    let misaligned = request(Direction::Encrypt, spec, &key, Some(&iv), &[1u8; 12])
        .with_padding(PaddingScheme::NoPadding);
    assert!(matches!(
        process(&misaligned),
        Err(CipherError::UnsupportedCombination(_))
    ));

    let (ciphertext, recovered) = encrypt_then_decrypt(
        spec,
        Some(PaddingScheme::NoPadding),
        &key,
        Some(&iv),
        &[1u8; 16],
    );
    assert_eq!(ciphertext.len(), 16);
    assert_eq!(recovered, vec![1u8; 16]);
}

#[test]
fn test_misaligned_ciphertext_is_rejected_before_decrypting() {
    let spec = aes(AesMode::Ecb, AesKeySize::Aes128);
    let req = request(Direction::Decrypt, spec, &counting(16), None, &[0u8; 17]);
    assert!(matches!(
        process(&req),
        Err(CipherError::UnsupportedCombination(_))
    ));
}

#[test]
fn test_corrupt_pkcs7_padding_is_reported() {
    let spec = aes(AesMode::Cbc, AesKeySize::Aes128);
    let key = counting(16);
    let iv = counting(16);

    // A block ending in 0x00 can never be valid PKCS#7
    let mut block = [0x41u8; 16];
    block[15] = 0;
    let enc = request(Direction::Encrypt, spec, &key, Some(&iv), &block)
        .with_padding(PaddingScheme::NoPadding);
    let ciphertext = process(&enc).unwrap().bytes;

    let dec = request(Direction::Decrypt, spec, &key, Some(&iv), &ciphertext)
        .with_padding(PaddingScheme::Pkcs7);
    assert!(matches!(process(&dec), Err(CipherError::InvalidPadding(_))));
}

#[test]
fn test_blowfish_key_length_bounds() {
    let spec = CipherSpec::Blowfish {
        mode: ChainMode::Ecb,
    };
    for len in [3usize, 57] {
        let req = request(Direction::Encrypt, spec, &counting(len), None, FOX);
        match process(&req) {
            Err(CipherError::InvalidKeyLength { actual, .. }) => assert_eq!(actual, len),
            other => panic!("{len}-byte Blowfish key: {other:?}"),
        }
    }
    for len in [4usize, 56] {
        let (_, recovered) = encrypt_then_decrypt(spec, None, &counting(len), None, FOX);
        assert_eq!(recovered, FOX);
    }
}

#[test]
fn test_wrong_key_lengths_are_rejected() {
    let cases = [
        (aes(AesMode::Cbc, AesKeySize::Aes128), 15usize),
        (aes(AesMode::Gcm, AesKeySize::Aes256), 16),
        (CipherSpec::Des { mode: ChainMode::Ecb }, 7),
        (CipherSpec::TripleDes { mode: ChainMode::Ecb }, 16),
        (CipherSpec::Twofish { mode: ChainMode::Ecb }, 12),
        (CipherSpec::ChaCha20 { aead: false }, 31),
        (CipherSpec::ChaCha20 { aead: true }, 16),
        (CipherSpec::Salsa20, 33),
    ];
    for (spec, len) in cases {
        let iv = generate_iv(&spec).unwrap();
        let req = request(Direction::Encrypt, spec, &counting(len), iv.as_deref(), FOX);
        assert!(
            matches!(process(&req), Err(CipherError::InvalidKeyLength { .. })),
            "{spec} accepted a {len}-byte key"
        );
    }
}

#[test]
fn test_twofish_accepts_every_documented_key_length() {
    let spec = CipherSpec::Twofish {
        mode: ChainMode::Cbc,
    };
    let iv = counting(16);
    for len in [8usize, 16, 24, 32] {
        let (_, recovered) = encrypt_then_decrypt(spec, None, &counting(len), Some(&iv), FOX);
        assert_eq!(recovered, FOX, "{len}-byte Twofish key");
    }
}

#[test]
fn test_iv_presence_and_length_are_checked() {
    let cbc = aes(AesMode::Cbc, AesKeySize::Aes128);
    let key = counting(16);

    let missing = request(Direction::Encrypt, cbc, &key, None, FOX);
    assert!(matches!(
        process(&missing),
        Err(CipherError::InvalidIvOrNonceLength { actual: 0, .. })
    ));

    let short = request(Direction::Encrypt, cbc, &key, Some(&counting(8)), FOX);
    assert!(matches!(
        process(&short),
        Err(CipherError::InvalidIvOrNonceLength { actual: 8, .. })
    ));

    let des_long = request(
        Direction::Encrypt,
        CipherSpec::Des {
            mode: ChainMode::Cbc,
        },
        &counting(8),
        Some(&counting(16)),
        FOX,
    );
    assert!(matches!(
        process(&des_long),
        Err(CipherError::InvalidIvOrNonceLength { .. })
    ));

    let salsa = request(
        Direction::Encrypt,
        CipherSpec::Salsa20,
        &counting(32),
        Some(&counting(12)),
        FOX,
    );
    assert!(matches!(
        process(&salsa),
        Err(CipherError::InvalidIvOrNonceLength { .. })
    ));
}

#[test]
fn test_ecb_ignores_supplied_iv() {
    let spec = aes(AesMode::Ecb, AesKeySize::Aes128);
    let key = counting(16);
    let with_iv = process(&request(Direction::Encrypt, spec, &key, Some(&[9u8; 5]), FOX))
        .unwrap()
        .bytes;
    let without = process(&request(Direction::Encrypt, spec, &key, None, FOX))
        .unwrap()
        .bytes;
    assert_eq!(with_iv, without);
}

#[test]
fn test_gcm_nonce_lengths() {
    let spec = aes(AesMode::Gcm, AesKeySize::Aes128);
    let key = counting(16);

    for len in 8usize..=16 {
        let (ciphertext, recovered) =
            encrypt_then_decrypt(spec, None, &key, Some(&counting(len)), FOX);
        assert_eq!(ciphertext.len(), FOX.len() + AEAD_TAG_LEN);
        assert_eq!(recovered, FOX);
    }

    for len in [0usize, 7, 17, 32] {
        let req = request(Direction::Encrypt, spec, &key, Some(&counting(len)), FOX);
        assert!(
            matches!(
                process(&req),
                Err(CipherError::InvalidIvOrNonceLength { .. })
            ),
            "{len}-byte GCM nonce"
        );
    }

    let missing = request(Direction::Encrypt, spec, &key, None, FOX);
    assert!(matches!(
        process(&missing),
        Err(CipherError::InvalidIvOrNonceLength { .. })
    ));
}

#[test]
fn test_aead_rejects_every_single_bit_flip() {
    setup();
    let plaintext = b"attack at dawn";
    for spec in [
        aes(AesMode::Gcm, AesKeySize::Aes256),
        CipherSpec::ChaCha20 { aead: true },
    ] {
        let key = counting(32);
        let nonce = counting(12);
        let sealed = process(&request(
            Direction::Encrypt,
            spec,
            &key,
            Some(&nonce),
            plaintext,
        ))
        .unwrap()
        .bytes;

        for bit in 0..sealed.len() * 8 {
            let mut tampered = sealed.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            let req = request(Direction::Decrypt, spec, &key, Some(&nonce), &tampered);
            assert_eq!(
                process(&req),
                Err(CipherError::AuthenticationFailed),
                "{spec} accepted a flip of bit {bit}"
            );
        }
    }
}

#[test]
fn test_aead_rejects_wrong_key_and_truncation() {
    let spec = CipherSpec::ChaCha20 { aead: true };
    let nonce = counting(12);
    let sealed = process(&request(
        Direction::Encrypt,
        spec,
        &counting(32),
        Some(&nonce),
        FOX,
    ))
    .unwrap()
    .bytes;

    let wrong_key = request(Direction::Decrypt, spec, &[7u8; 32], Some(&nonce), &sealed);
    assert_eq!(process(&wrong_key), Err(CipherError::AuthenticationFailed));

    let truncated = request(
        Direction::Decrypt,
        spec,
        &counting(32),
        Some(&nonce),
        &sealed[..10],
    );
    assert_eq!(process(&truncated), Err(CipherError::AuthenticationFailed));
}

#[test]
fn test_chacha20_counter_must_fit_32_bits() {
    let spec = CipherSpec::ChaCha20 { aead: false };
    let req = request(
        Direction::Encrypt,
        spec,
        &counting(32),
        Some(&counting(12)),
        FOX,
    )
    .with_counter(u64::from(u32::MAX) + 1);
    assert!(matches!(
        process(&req),
        Err(CipherError::UnsupportedCombination(_))
    ));

    let last_block = request(
        Direction::Encrypt,
        spec,
        &counting(32),
        Some(&counting(12)),
        &[0u8; 64],
    )
    .with_counter(u64::from(u32::MAX) - 1);
    assert_eq!(process(&last_block).unwrap().bytes.len(), 64);

    let wraps = request(
        Direction::Encrypt,
        spec,
        &counting(32),
        Some(&counting(12)),
        &[0u8; 65],
    )
    .with_counter(u64::from(u32::MAX) - 1);
    assert!(matches!(
        process(&wraps),
        Err(CipherError::UnsupportedCombination(_))
    ));
}

#[test]
fn test_salsa20_counter_exhaustion_fails_validation() {
    let salsa = |counter: u64, len: usize| {
        request(
            Direction::Encrypt,
            CipherSpec::Salsa20,
            &counting(32),
            Some(&counting(8)),
            &vec![0u8; len],
        )
        .with_counter(counter)
    };

    assert_eq!(process(&salsa(u64::MAX - 1, 64)).unwrap().bytes.len(), 64);
    for (counter, len) in [(u64::MAX, 64), (u64::MAX - 1, 65), (u64::MAX, 1)] {
        assert!(
            matches!(
                process(&salsa(counter, len)),
                Err(CipherError::UnsupportedCombination(_))
            ),
            "counter {counter}, {len} bytes"
        );
    }
}

#[test]
fn test_stream_output_concatenates_across_counter_offsets() {
    for (spec, nonce_len) in [
        (CipherSpec::ChaCha20 { aead: false }, 12usize),
        (CipherSpec::Salsa20, 8),
    ] {
        let key = counting(32);
        let nonce = counting(nonce_len);
        let data = counting(200);

        let whole = process(&request(Direction::Encrypt, spec, &key, Some(&nonce), &data))
            .unwrap()
            .bytes;

        let mut pieces = Vec::new();
        for (i, chunk) in data.chunks(64).enumerate() {
            let req = request(Direction::Encrypt, spec, &key, Some(&nonce), chunk)
                .with_counter(i as u64);
            pieces.extend(process(&req).unwrap().bytes);
        }
        assert_eq!(whole, pieces, "{spec}");
    }
}

#[test]
fn test_stream_and_gcm_ignore_padding() {
    for spec in [
        CipherSpec::Salsa20,
        aes(AesMode::Gcm, AesKeySize::Aes128),
    ] {
        let key = generate_key(&spec).unwrap();
        let iv = generate_iv(&spec).unwrap();
        let (ciphertext, recovered) = encrypt_then_decrypt(
            spec,
            Some(PaddingScheme::NoPadding),
            &key,
            iv.as_deref(),
            FOX,
        );
        assert!(ciphertext.len() == FOX.len() || ciphertext.len() == FOX.len() + AEAD_TAG_LEN);
        assert_eq!(recovered, FOX);
    }
}

#[test]
fn test_pbkdf2_passphrase_matches_raw_derived_key() {
    setup();
    let spec = aes(AesMode::Cbc, AesKeySize::Aes256);
    let iv = counting(16);
    let salt = b"pepper-salt".to_vec();
    let pbkdf2 = KdfSpec::Pbkdf2 {
        iterations: 1000,
        hash: HashAlgorithm::Sha256,
    };

    let via_kdf = CipherRequest::encrypt(spec, KeyMaterial::passphrase(b"hunter2".to_vec()))
        .with_kdf(pbkdf2.clone(), salt.clone())
        .with_iv(iv.clone())
        .with_input(FOX.to_vec());
    let via_kdf = process(&via_kdf).unwrap().bytes;

    let derived = kdf::derive(&pbkdf2, b"hunter2", &salt, 32).unwrap();
    let via_raw = request(
        Direction::Encrypt,
        spec,
        derived.expose_secret(),
        Some(&iv),
        FOX,
    );
    assert_eq!(via_kdf, process(&via_raw).unwrap().bytes);

    let other_salt = CipherRequest::encrypt(spec, KeyMaterial::passphrase(b"hunter2".to_vec()))
        .with_kdf(pbkdf2, b"other-salt".to_vec())
        .with_iv(iv)
        .with_input(FOX.to_vec());
    assert_ne!(via_kdf, process(&other_salt).unwrap().bytes);
}

#[test]
fn test_hkdf_keys_every_cipher_family() {
    let hkdf = KdfSpec::Hkdf {
        hash: HashAlgorithm::Sha512,
        info: b"engine-test".to_vec(),
    };
    for spec in all_specs() {
        let iv = generate_iv(&spec).unwrap();
        let mut enc = CipherRequest::encrypt(spec, KeyMaterial::passphrase(b"pw".to_vec()))
            .with_kdf(hkdf.clone(), b"salt".to_vec())
            .with_input(FOX.to_vec());
        let mut dec = CipherRequest::decrypt(spec, KeyMaterial::passphrase(b"pw".to_vec()))
            .with_kdf(hkdf.clone(), b"salt".to_vec());
        if let Some(iv) = iv {
            enc = enc.with_iv(iv.clone());
            dec = dec.with_iv(iv);
        }
        let ciphertext = process(&enc).unwrap().bytes;
        let recovered = process(&dec.with_input(ciphertext)).unwrap().bytes;
        assert_eq!(recovered, FOX, "{spec}");
    }
}

#[test]
fn test_key_role_must_match_kdf_choice() {
    let spec = aes(AesMode::Ecb, AesKeySize::Aes128);

    let passphrase_without_kdf =
        CipherRequest::encrypt(spec, KeyMaterial::passphrase(b"pw".to_vec()))
            .with_input(FOX.to_vec());
    assert!(matches!(
        process(&passphrase_without_kdf),
        Err(CipherError::UnsupportedCombination(_))
    ));

    let raw_with_kdf = CipherRequest::encrypt(spec, KeyMaterial::raw(counting(16)))
        .with_kdf(KdfSpec::pbkdf2_default(), b"salt".to_vec())
        .with_input(FOX.to_vec());
    assert!(matches!(
        process(&raw_with_kdf),
        Err(CipherError::UnsupportedCombination(_))
    ));

    let zero_iterations = CipherRequest::encrypt(spec, KeyMaterial::passphrase(b"pw".to_vec()))
        .with_kdf(
            KdfSpec::Pbkdf2 {
                iterations: 0,
                hash: HashAlgorithm::Sha256,
            },
            b"salt".to_vec(),
        )
        .with_input(FOX.to_vec());
    assert!(matches!(
        process(&zero_iterations),
        Err(CipherError::UnsupportedCombination(_))
    ));
}

#[test]
fn test_non_utf8_plaintext_is_flagged_lossy() {
    let spec = aes(AesMode::Ctr, AesKeySize::Aes128);
    let key = counting(16);
    let iv = counting(16);
    let binary = [0x66u8, 0x6f, 0xff, 0xfe, 0x6f];

    let ciphertext = process(&request(Direction::Encrypt, spec, &key, Some(&iv), &binary))
        .unwrap()
        .bytes;
    let dec = request(Direction::Decrypt, spec, &key, Some(&iv), &ciphertext)
        .with_output(Encoding::Utf8);
    let result = process(&dec).unwrap();

    assert!(result.is_lossy_text);
    assert_eq!(result.bytes, binary);
    assert!(result.text.unwrap().contains('\u{FFFD}'));
}

#[test]
fn test_output_encodings_and_options() {
    let spec = aes(AesMode::Cbc, AesKeySize::Aes256);
    let base = || {
        CipherRequest::encrypt(spec, KeyMaterial::raw(vec![0u8; 32]))
            .with_iv(vec![0u8; 16])
            .with_text_input("test", Encoding::Utf8)
    };

    let b64 = process(&base().with_output(Encoding::Base64)).unwrap();
    assert_eq!(b64.text.as_deref(), Some("2HB5iFgiP0Vk00CxA/ZSew=="));

    let b64url = process(&base().with_output(Encoding::Base64Url).with_output_options(
        EncodeOptions {
            base64_padding: false,
            hex_uppercase: false,
        },
    ))
    .unwrap();
    assert_eq!(b64url.text.as_deref(), Some("2HB5iFgiP0Vk00CxA_ZSew"));

    let upper = process(&base().with_output(Encoding::Hex).with_output_options(
        EncodeOptions {
            base64_padding: true,
            hex_uppercase: true,
        },
    ))
    .unwrap();
    assert_eq!(
        upper.text.as_deref(),
        Some("D870798858223F4564D340B103F6527B")
    );

    let binary = process(&base()).unwrap();
    assert_eq!(binary.text, None);
    assert_eq!(binary.bytes.len(), 16);
}

#[test]
fn test_malformed_input_encoding_is_rejected() {
    let spec = aes(AesMode::Ecb, AesKeySize::Aes128);
    for (text, encoding) in [
        ("zz", Encoding::Hex),
        ("abc", Encoding::Hex),
        ("not*base64", Encoding::Base64),
        ("a+b/", Encoding::Base64Url),
    ] {
        let req = CipherRequest::decrypt(spec, KeyMaterial::raw(counting(16)))
            .with_text_input(text, encoding);
        assert!(
            matches!(process(&req), Err(CipherError::InvalidEncoding { .. })),
            "{text:?} as {encoding}"
        );
    }
}

#[test]
fn test_key_material_debug_hides_bytes() {
    let key = KeyMaterial::raw(vec![0xAB; 16]);
    let shown = format!("{key:?}");
    assert!(!shown.contains("171"));
    assert!(!shown.to_lowercase().contains("ab, "));
    assert!(shown.contains("16"));
}
