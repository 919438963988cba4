use cashcoins::{
    enc::{cashaddr, classify_network, Address, AddressKind, EncodingError},
    nets::{NetworkRegistry, MAINNET, REGTEST, TESTNET},
    types::{ScriptPubkey, TxOut},
};
use cashcoins_core::ser::{ByteFormat, SerError};

const STANDARD_PAIRS: [(&str, &str); 7] = [
    (
        "1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu",
        "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a",
    ),
    (
        "1KXrWXciRDZUpQwQmuM1DbwsKDLYAYsVLR",
        "bitcoincash:qr95sy3j9xwd2ap32xkykttr4cvcu7as4y0qverfuy",
    ),
    (
        "16w1D5WRVKJuZUsSRzdLp9w3YGcgoxDXb",
        "bitcoincash:qqq3728yw0y47sqn6l2na30mcw6zm78dzqre909m2r",
    ),
    (
        "3CWFddi6m4ndiGyKqzYvsFYagqDLPVMTzC",
        "bitcoincash:ppm2qsznhks23z7629mms6s4cwef74vcwvn0h829pq",
    ),
    (
        "3LDsS579y7sruadqu11beEJoTjdFiFCdX4",
        "bitcoincash:pr95sy3j9xwd2ap32xkykttr4cvcu7as4yc93ky28e",
    ),
    (
        "31nwvkZwyPdgzjBJZXfDmSWsC4ZLKpYyUw",
        "bitcoincash:pqq3728yw0y47sqn6l2na30mcw6zm78dzq5ucqzc37",
    ),
    (
        "12gLdGD5q5KdWViDtq3MouheF9PJr8HmB1",
        "bitcoincash:qqfx3wcg8ts09mt5l3zey06wenapyfqq2qrcyj5x0s",
    ),
];

#[test]
fn it_converts_equivalent_pairs_both_ways() {
    for (legacy, cash) in STANDARD_PAIRS.iter() {
        let from_legacy = Address::from_legacy(&MAINNET, legacy).unwrap();
        assert_eq!(&from_legacy.to_cashaddr_string(), cash);

        let from_cash = Address::parse(Some(&MAINNET), cash).unwrap();
        assert_eq!(&from_cash.to_base58_string().unwrap(), legacy);
        assert_eq!(from_legacy, from_cash);
    }

    let testnet = [
        (
            "mqc1tmwY2368LLGktnePzEyPAsgADxbksi",
            "bchtest:qph2v4mkxjgdqgmlyjx6njmey0ftrxlnggt9t0a6zy",
        ),
        (
            "n3vLzhPPFcMDCVwahwKrSiDrdnogPBjJCm",
            "bchtest:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eymt9qmp0k",
        ),
        (
            "2NFecgvisbwjgiLnwnbdwfNMj8fhrm9Fbqe",
            "bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t",
        ),
    ];
    for (legacy, cash) in testnet.iter() {
        let a = Address::from_legacy(&TESTNET, legacy).unwrap();
        assert_eq!(&a.to_cashaddr_string(), cash);
        assert_eq!(&Address::parse(None, cash).unwrap().to_base58_string().unwrap(), legacy);
    }
}

#[test]
fn it_decodes_case_uniformly() {
    for (_, cash) in STANDARD_PAIRS.iter() {
        let upper = cash.to_uppercase();
        assert_eq!(cashaddr::decode(&upper).unwrap(), cashaddr::decode(cash).unwrap());

        let mut mixed = cash.to_string();
        let last = mixed.pop().unwrap();
        mixed.push(last.to_ascii_uppercase());
        if last.is_ascii_alphabetic() {
            assert_eq!(cashaddr::decode(&mixed).unwrap_err(), EncodingError::MixedCase);
        }
    }
}

#[test]
fn it_fails_single_character_substitutions() {
    let legacy = "1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu";
    for (i, original) in legacy.char_indices() {
        for replacement in "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz".chars() {
            if replacement == original {
                continue;
            }
            let mut mutated = legacy.to_owned();
            mutated.replace_range(i..i + 1, &replacement.to_string());
            assert!(
                Address::from_legacy(&MAINNET, &mutated).is_err(),
                "{}",
                mutated
            );
        }
    }
}

#[test]
fn it_rejects_the_wrong_network_prefix() {
    let good = "bitcoincash:qpk4hk3wuxe2uqtqc97n8atzrrr6r5mleczf9sur4h";
    assert!(cashaddr::decode(good).is_ok());
    assert_eq!(
        cashaddr::decode("bchtest:qpk4hk3wuxe2uqtqc97n8atzrrr6r5mleczf9sur4h").unwrap_err(),
        EncodingError::ChecksumMismatch
    );
    assert_eq!(
        Address::parse(None, "bchtest:qpk4hk3wuxe2uqtqc97n8atzrrr6r5mleczf9sur4h").unwrap_err(),
        EncodingError::ChecksumMismatch
    );
}

#[test]
fn it_rejects_payloads_that_declare_the_wrong_size() {
    let empty = cashaddr::encode("bitcoincash", &[]);
    assert_eq!(
        cashaddr::decode(&empty).unwrap_err(),
        EncodingError::HashSizeMismatch(0)
    );

    let mut top_bit = vec![0x80];
    top_bit.extend_from_slice(&[0u8; 20]);
    let s = cashaddr::encode("bitcoincash", &top_bit);
    assert_eq!(
        cashaddr::decode(&s).unwrap_err(),
        EncodingError::UnknownVersionByte(0x80)
    );

    let mut long = vec![0x00];
    long.extend_from_slice(&[0x42u8; 25]);
    let s = cashaddr::encode("bitcoincash", &long);
    assert_eq!(
        cashaddr::decode(&s).unwrap_err(),
        EncodingError::HashSizeMismatch(25)
    );
}

#[test]
fn it_infers_networks_from_base58_versions() {
    let main = Address::parse(None, "14krEkSaKoTkbFT9iUCfUYARo4EXA8co6M").unwrap();
    assert_eq!(main.network(), &MAINNET);
    assert_eq!(main.kind(), AddressKind::PubKeyHash);

    let test = Address::parse(None, "mqc1tmwY2368LLGktnePzEyPAsgADxbksi").unwrap();
    assert_eq!(test.network(), &TESTNET);
    assert_eq!(test.kind(), AddressKind::PubKeyHash);

    assert_eq!(classify_network("14krEkSaKoTkbFT9iUCfUYARo4EXA8co6M"), Some(MAINNET));
    assert_eq!(classify_network("mqc1tmwY2368LLGktnePzEyPAsgADxbksi"), Some(TESTNET));

    let ambiguous = NetworkRegistry::new(vec![MAINNET, TESTNET, REGTEST]).unwrap();
    assert_eq!(
        Address::parse_with(&ambiguous, None, "mqc1tmwY2368LLGktnePzEyPAsgADxbksi").unwrap_err(),
        EncodingError::AmbiguousNetwork(0x6f)
    );
}

#[test]
fn it_finds_no_address_for_data_carriers() {
    let out = TxOut::new(0, vec![0x6a, 0x00]);
    assert!(out.is_op_return());
    assert_eq!(out.address_for(&MAINNET), None);
    assert_eq!(out.address_for(&TESTNET), None);
    assert_eq!(out.op_return_data(), Some(vec![]));
}

#[test]
fn it_serializes_outputs_for_the_wire() {
    let address = Address::parse(None, "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a")
        .unwrap();
    let out = TxOut::pay_to(100_000, &address);
    let hex = out.serialize_hex();
    assert_eq!(
        hex,
        "a0860100000000001976a91476a04053bda0a88bda5177b86a15c3b29f55987388ac"
    );
    assert_eq!(out.serialized_length(), hex.len() / 2);

    let mut cursor = std::io::Cursor::new(hex::decode(&hex).unwrap());
    let parsed = TxOut::read_from(&mut cursor, 0).unwrap();
    assert_eq!(parsed, out);
    assert_eq!(cursor.position() as usize, out.serialized_length());
    assert_eq!(parsed.address_for(&MAINNET), Some(address));

    // a declared length longer than the remaining input
    let truncated = &hex[..hex.len() - 2];
    match TxOut::deserialize_hex(truncated) {
        Err(SerError::TruncatedInput) => {}
        r => panic!("expected truncated input, got {:?}", r),
    }
}

#[test]
fn it_round_trips_standard_payloads() {
    for (_, cash) in STANDARD_PAIRS.iter() {
        let a = Address::parse(None, cash).unwrap();
        let script: ScriptPubkey = a.script_pubkey();
        let out = TxOut::new(1, script);
        let back = out.address_for(a.network()).unwrap();
        assert_eq!(back, a);

        let (prefix, version, hash) = cashaddr::decode(cash).unwrap();
        let mut payload = vec![version];
        payload.extend(hash);
        assert_eq!(&cashaddr::encode(&prefix, &payload), cash);
    }
}
