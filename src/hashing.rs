use num_bigint::BigUint;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes, lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Canonical text form of any serializable value: object keys sorted,
/// compact separators, shortest round-trip floats.
///
/// Going through `serde_json::Value` is what sorts the keys (its object map
/// is a `BTreeMap` unless the `preserve_order` feature is enabled).
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string(&value)
}

/// Deterministic digest of a JSON-like structure. Two structurally equal
/// values always hash the same regardless of field or map insertion order.
///
/// # Panics
///
/// If `value` cannot become a `serde_json::Value`: a map with non-string keys
/// or a hand-written `Serialize` that errors. The ledger only hashes derived
/// structs, `Vec`s of them and `String`-keyed maps, none of which can fail;
/// use [`canonical_json`] for anything else.
pub fn hash_jsonable<T: Serialize + ?Sized>(value: &T) -> String {
    let text = canonical_json(value).expect("derived Serialize with string keys");
    hash_bytes(text.as_bytes())
}

/// Interpret a hex digest as a big unsigned integer. Non-hex input yields `None`.
pub fn int_from_hexstr(s: &str) -> Option<BigUint> {
    BigUint::parse_bytes(s.as_bytes(), 16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn keys_are_sorted_and_compact() {
        let v = json!({ "b": 1, "a": { "z": 2.5, "y": [1, 2] } });
        assert_eq!(
            canonical_json(&v).unwrap(),
            r#"{"a":{"y":[1,2],"z":2.5},"b":1}"#
        );
    }

    #[test]
    fn integral_floats_keep_fraction() {
        assert_eq!(canonical_json(&100.0f64).unwrap(), "100.0");
        assert_eq!(canonical_json(&0.0f64).unwrap(), "0.0");
    }

    #[test]
    fn map_insertion_order_does_not_matter() {
        let mut a = HashMap::new();
        let mut b = HashMap::new();
        for k in ["x", "y", "z", "w"] {
            a.insert(k.to_string(), k.len());
        }
        for k in ["w", "z", "y", "x"] {
            b.insert(k.to_string(), k.len());
        }
        assert_eq!(hash_jsonable(&a), hash_jsonable(&b));
    }

    #[test]
    fn empty_values_have_known_digests() {
        let empty: HashMap<String, u8> = HashMap::new();
        assert_eq!(
            hash_jsonable(&empty),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        let none: Vec<u8> = Vec::new();
        assert_eq!(
            hash_jsonable(&none),
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }

    #[test]
    fn ledger_types_have_canonical_form() {
        use crate::blockchain::Block;
        use crate::state::AccountInfo;
        use crate::transaction::make_create_account;

        let genesis = Block::genesis();
        assert!(canonical_json(&genesis.header).is_ok());
        assert!(canonical_json(&vec![make_create_account("A")]).is_ok());
        assert!(canonical_json(&make_create_account("A").unsigned).is_ok());
        let mut accounts = HashMap::new();
        accounts.insert(
            "A".to_string(),
            AccountInfo {
                public_key: "A".into(),
                balance: 1.5,
            },
        );
        assert!(canonical_json(&accounts).is_ok());
    }

    #[test]
    fn non_string_keys_have_no_canonical_form() {
        let mut keyed = HashMap::new();
        keyed.insert(vec![1u8], 1u8);
        assert!(canonical_json(&keyed).is_err());
    }

    #[test]
    fn hex_digest_parses_as_integer() {
        assert_eq!(int_from_hexstr("ff"), Some(BigUint::from(255u32)));
        assert_eq!(int_from_hexstr("not hex"), None);
    }
}
