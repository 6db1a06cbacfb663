//! Bundled record types

use crate::codec::Text;

crate::record! {
    /// Person with a score
    pub struct Num: "beginner_tutorials/Num" {
        pub first_name: Text,
        pub last_name: Text,
        pub age: u8,
        pub score: u32,
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::codec::{FieldValue, PartialRecord, Record};
    use crate::error::CodecError;

    fn ada() -> Num {
        Num {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            age: 36,
            score: 100,
        }
    }

    #[test]
    fn test_wire_bytes() {
        let bytes = ada().serialize();
        let mut expected = vec![3, 0, 0, 0];
        expected.extend_from_slice(b"Ada");
        expected.extend_from_slice(&[8, 0, 0, 0]);
        expected.extend_from_slice(b"Lovelace");
        expected.push(36);
        expected.extend_from_slice(&[100, 0, 0, 0]);
        assert_eq!(&bytes[..], &expected[..]);
        assert_eq!(bytes.len(), 4 + 3 + 4 + 8 + 1 + 4);
    }

    #[test]
    fn test_round_trip() {
        let records = [
            ada(),
            Num::default(),
            Num {
                first_name: Text::from(vec![0xF0, 0x9F, 0x92]),
                last_name: "".into(),
                age: u8::MAX,
                score: u32::MAX,
            },
        ];
        for record in records {
            let bytes = record.serialize();
            let (decoded, end) = Num::deserialize(&bytes, 0).unwrap();
            assert_eq!(decoded, record);
            assert_eq!(end, bytes.len());
        }
    }

    #[test]
    fn test_size_law() {
        for (first, last) in [("", ""), ("Ada", "Lovelace"), ("a", &"x".repeat(1000)[..])] {
            let record = Num {
                first_name: first.into(),
                last_name: last.into(),
                ..Default::default()
            };
            assert_eq!(record.serialize().len(), record.encoded_len());
            assert_eq!(
                record.encoded_len(),
                Num::schema().fixed_size() + first.len() + last.len()
            );
        }
        assert_eq!(Num::schema().fixed_size(), 13);
    }

    #[test]
    fn test_truncation_on_every_prefix() {
        let bytes = ada().serialize();
        for len in 0..bytes.len() {
            let prefix = bytes.slice(..len);
            let result = Num::deserialize(&prefix, 0);
            assert!(
                matches!(result, Err(CodecError::TruncatedInput { .. })),
                "prefix of {} bytes decoded",
                len
            );
        }
    }

    #[test]
    fn test_lying_length_prefix() {
        // first_name claims 200 bytes
        let bytes = Bytes::from_static(&[200, 0, 0, 0, b'A', b'd', b'a']);
        assert_eq!(
            Num::deserialize(&bytes, 0),
            Err(CodecError::TruncatedInput {
                needed: 200,
                remaining: 3
            })
        );
    }

    #[test]
    fn test_deserialize_at_cursor() {
        let mut data = vec![0xEE, 0xEE];
        data.extend_from_slice(&ada().serialize());
        data.push(0xEE);
        let data = Bytes::from(data);

        let (decoded, end) = Num::deserialize(&data, 2).unwrap();
        assert_eq!(decoded, ada());
        assert_eq!(end, data.len() - 1);
    }

    #[test]
    fn test_resolve_empty_is_default() {
        let resolved = Num::resolve(&PartialRecord::new());
        assert_eq!(resolved, Num::default());
        assert_eq!(resolved.first_name, "");
        assert_eq!(resolved.age, 0);
    }

    #[test]
    fn test_resolve_partial() {
        let resolved = Num::resolve(&PartialRecord::new().with("last_name", "Hopper"));
        assert_eq!(
            resolved,
            Num {
                last_name: "Hopper".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_resolve_coerces_or_defaults() {
        let partial = PartialRecord::new()
            .with("first_name", 7u8)
            .with("age", 300u32)
            .with("score", FieldValue::Undefined)
            .with("unknown", "ignored");
        let resolved = Num::resolve(&partial);
        assert_eq!(resolved.first_name, "");
        assert_eq!(resolved.age, 44);
        assert_eq!(resolved.score, 0);
    }

    #[test]
    fn test_type_descriptor() {
        assert_eq!(Num::DATATYPE, "beginner_tutorials/Num");
        assert_eq!(
            Num::definition(),
            "string first_name\nstring last_name\nuint8 age\nuint32 score"
        );
        assert_eq!(Num::fingerprint(), Num::fingerprint());
        // md5sum published by the ROS message generator for this layout
        assert_eq!(Num::fingerprint(), "f8bfa80ae3c7a93455596d9622ad33a9");

        let parsed = crate::codec::Schema::parse("other/Num", Num::definition()).unwrap();
        assert_eq!(parsed.fingerprint(), Num::fingerprint());
    }
}
