use super::encode::*;
use super::value::{Int, Value};
use hex_literal::hex;

#[test]
fn unsigned_integers() {
    assert_eq!(*emit(&0u64), hex!("00"));
    assert_eq!(*emit(&1u64), hex!("01"));
    assert_eq!(*emit(&10u64), hex!("0A"));
    assert_eq!(*emit(&23u64), hex!("17"));
    assert_eq!(*emit(&24u64), hex!("1800"));
    assert_eq!(*emit(&100u64), hex!("184C"));
    assert_eq!(*emit(&255u64), hex!("18E7"));
    assert_eq!(*emit(&256u64), hex!("18E8"));
    assert_eq!(*emit(&279u64), hex!("18FF"));
    assert_eq!(*emit(&280u64), hex!("190000"));
    assert_eq!(*emit(&1000u64), hex!("19D002"));
    assert_eq!(*emit(&65535u64), hex!("19E7FE"));
    assert_eq!(*emit(&65815u64), hex!("19FFFF"));
    assert_eq!(*emit(&65816u64), hex!("1A000000"));
    assert_eq!(*emit(&16843031u64), hex!("1AFFFFFF"));
    assert_eq!(*emit(&16843032u64), hex!("1B00000000"));
    assert_eq!(*emit(&123456789u64), hex!("1BFDCB5A06"));
    assert_eq!(*emit(&4311810327u64), hex!("1BFFFFFFFF"));
    assert_eq!(*emit(&4311810328u64), hex!("1C0000000000"));
    assert_eq!(*emit(&72340172838076695u64), hex!("1EFFFFFFFFFFFFFF"));
    assert_eq!(*emit(&72340172838076696u64), hex!("1F0000000000000000"));
    assert_eq!(*emit(&u64::MAX), hex!("1FE7FEFEFEFEFEFEFE"));

    assert_eq!(*emit(&23u8), hex!("17"));
    assert_eq!(*emit(&280u16), hex!("190000"));
    assert_eq!(*emit(&65816u32), hex!("1A000000"));
    assert_eq!(*emit(&24usize), hex!("1800"));
}

#[test]
fn signed_integers() {
    assert_eq!(*emit(&0i64), hex!("00"));
    assert_eq!(*emit(&-1i64), hex!("20"));
    assert_eq!(*emit(&-2i64), hex!("21"));
    assert_eq!(*emit(&-24i64), hex!("37"));
    assert_eq!(*emit(&-25i64), hex!("3800"));
    assert_eq!(*emit(&-100i64), hex!("384B"));
    assert_eq!(*emit(&-280i64), hex!("38FF"));
    assert_eq!(*emit(&-281i64), hex!("390000"));
    assert_eq!(*emit(&-1000i64), hex!("39CF02"));
    assert_eq!(*emit(&-123456790i64), hex!("3BFDCB5A06"));
    assert_eq!(*emit(&i64::MAX), hex!("1FE7FEFEFEFEFEFE7E"));
    assert_eq!(*emit(&i64::MIN), hex!("3FE7FEFEFEFEFEFE7E"));

    assert_eq!(*emit(&-100i8), hex!("384B"));
    assert_eq!(*emit(&-1000i16), hex!("39CF02"));
    assert_eq!(*emit(&-281i32), hex!("390000"));
    assert_eq!(*emit(&-1isize), hex!("20"));
}

#[test]
fn integer_values() {
    assert_eq!(*emit(&Int::from(0u64)), hex!("00"));
    assert_eq!(*emit(&Int::from(-1i64)), hex!("20"));
    assert_eq!(*emit(&Int::MAX), hex!("1FE7FEFEFEFEFEFEFE"));
    assert_eq!(*emit(&Int::MIN), hex!("3FE7FEFEFEFEFEFE7E"));
}

#[test]
fn strings_and_bytes() {
    assert_eq!(*emit(""), hex!("60"));
    assert_eq!(*emit("A"), hex!("6141"));
    assert_eq!(*emit("Oé"), hex!("634FC3A9"));
    assert_eq!(*emit("¡Olé!"), hex!("67C2A14F6CC3A921"));
    assert_eq!(*emit("水"), hex!("63E6B0B4"));
    assert_eq!(*emit("🚀"), hex!("64F09F9A80"));
    assert_eq!(*emit(&String::from("A")), hex!("6141"));

    assert_eq!(*emit(&[] as &[u8]), hex!("40"));
    assert_eq!(*emit(b"\x01\x02"), hex!("420102"));
    assert_eq!(*emit(&hex!("0102").to_vec()), hex!("420102"));
}

#[test]
fn optional_values() {
    assert_eq!(*emit(&None::<u64>), hex!("FF"));
    assert_eq!(*emit(&Some(5u64)), hex!("05"));
    assert_eq!(*emit(&Some("A")), hex!("6141"));
}

#[test]
fn sequence_builder() {
    assert_eq!(*emit_sequence(|_| {}), hex!("80"));
    assert_eq!(
        *emit_sequence(|s| {
            s.emit(&1u64);
            s.emit("A");
            s.emit(b"\x01\x02");
        }),
        hex!("86016141420102")
    );
    assert_eq!(
        *emit_sequence(|s| {
            s.emit_sequence(|inner| {
                inner.emit_none();
            });
            s.emit_sequence(|_| {});
        }),
        hex!("8381FF80")
    );
}

#[test]
fn length_tokens_match_integer_tokens() {
    // The length header of classes 2/3/4 is the integer token of the
    // exact payload octet count, with only the class bits changed.
    for len in [0usize, 1, 23, 24, 255, 279, 280, 1000] {
        let length_token = emit(&(len as u64));

        let encoded = emit("x".repeat(len).as_str());
        assert_eq!(encoded.len(), length_token.len() + len);
        assert_eq!(encoded[0], length_token[0] | 0x60);
        assert_eq!(encoded[1..encoded.len() - len], length_token[1..]);

        let encoded = emit(vec![7u8; len].as_slice());
        assert_eq!(encoded.len(), length_token.len() + len);
        assert_eq!(encoded[0], length_token[0] | 0x40);
    }

    for width in [0usize, 1, 23, 24, 200, 256] {
        let encoded = emit_sequence(|s| {
            for _ in 0..width {
                s.emit_none();
            }
        });
        let length_token = emit(&(width as u64));
        assert_eq!(encoded.len(), length_token.len() + width);
        assert_eq!(encoded[0], length_token[0] | 0x80);
    }
}

#[test]
fn value_trees() {
    assert_eq!(encode(&Value::None).unwrap(), hex!("FF"));
    assert_eq!(encode(&Value::from(0)).unwrap(), hex!("00"));
    assert_eq!(encode(&Value::from(-25)).unwrap(), hex!("3800"));
    assert_eq!(encode(&Value::from("Oé")).unwrap(), hex!("634FC3A9"));
    assert_eq!(
        encode(&Value::ByteString(vec![1, 2])).unwrap(),
        hex!("420102")
    );
    assert_eq!(encode(&Value::Sequence(vec![])).unwrap(), hex!("80"));
    assert_eq!(
        encode(&Value::Sequence(vec![Value::None])).unwrap(),
        hex!("81FF")
    );
    assert_eq!(
        encode(&Value::Sequence(vec![
            Value::from(1),
            Value::from("A"),
            Value::ByteString(vec![1, 2]),
        ]))
        .unwrap(),
        hex!("86016141420102")
    );
    assert_eq!(
        encode(&Value::Sequence(vec![
            Value::Sequence(vec![Value::None]),
            Value::Sequence(vec![]),
        ]))
        .unwrap(),
        hex!("8381FF80")
    );
}

#[test]
fn deterministic_output() {
    let value = Value::Sequence(vec![
        Value::from(123456789i64),
        Value::from("¡Olé!"),
        Value::ByteString((0..=255).collect()),
        Value::Sequence(vec![Value::None, Value::from(-281)]),
    ]);
    assert_eq!(encode(&value).unwrap(), encode(&value.clone()).unwrap());
}

#[test]
fn nesting_limit() {
    fn chain(levels: usize) -> Value {
        let mut value = Value::Sequence(vec![]);
        for _ in 1..levels {
            value = Value::Sequence(vec![value]);
        }
        value
    }

    assert!(encode(&chain(1024)).is_ok());
    assert_eq!(encode(&chain(1025)), Err(Error::NestingTooDeep));
}
