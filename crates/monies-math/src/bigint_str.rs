use num_bigint::BigInt;
use serde::{de, Deserializer, Serializer};

/// Serde adapter for BigInt ↔ TOML/JSON: serialize as a decimal string,
/// deserialize from a string or a plain integer.
/// TOML integers are i64, so anything token-sized must go through strings.
pub fn serialize<S: Serializer>(val: &BigInt, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&val.to_str_radix(10))
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigInt, D::Error> {
    struct BigIntVisitor;

    impl<'de> de::Visitor<'de> for BigIntVisitor {
        type Value = BigInt;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a big integer as a decimal string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
            v.trim()
                .replace('_', "")
                .parse()
                .map_err(|_| E::custom(format!("invalid big integer: {:?}", v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }
    }

    d.deserialize_any(BigIntVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Wrapper {
        #[serde(with = "super")]
        amount: BigInt,
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let w = Wrapper {
            amount: BigInt::from(1u128 << 100),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "{\"amount\":\"1267650600228229401496703205376\"}");
    }

    #[test]
    fn test_accepts_string_or_integer() {
        let from_str: Wrapper = serde_json::from_str("{\"amount\":\"-42\"}").unwrap();
        assert_eq!(from_str.amount, BigInt::from(-42));

        let from_int: Wrapper = serde_json::from_str("{\"amount\":7}").unwrap();
        assert_eq!(from_int.amount, BigInt::from(7));

        let underscored: Wrapper =
            serde_json::from_str("{\"amount\":\"5_000_000_000\"}").unwrap();
        assert_eq!(underscored.amount, BigInt::from(5_000_000_000u64));
    }

    #[test]
    fn test_rejects_garbage() {
        let result: Result<Wrapper, _> = serde_json::from_str("{\"amount\":\"12abc\"}");
        assert!(result.is_err());
    }
}
