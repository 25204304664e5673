use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use sexpr_reflect::{
    decode_value, display, encode_value, encode_value_with_options, format_atom, marshal, unmarshal, EncodeOptions,
    FloatWidth, IntWidth, Reflect, Type, Value,
};

fn round_trip<T: Reflect + PartialEq + std::fmt::Debug>(value: &T) {
    let text = marshal(value).unwrap();
    let back: T = unmarshal(&text).unwrap_or_else(|e| panic!("failed to decode {text:?}: {e}"));
    assert_eq!(&back, value, "round trip through {text:?}");
}

proptest! {
    #[test]
    fn decoder_never_panics(input in "\\PC*") {
        let mut dest = Value::zero(&Type::map(Type::String, Type::slice(Type::Int(IntWidth::Size))));
        let _ = decode_value(&input, &mut dest);
    }

    #[test]
    fn decoder_never_panics_on_sexpr_like_input(input in "[()\" a-z0-9\\\\-]{0,64}") {
        let mut dest = Value::zero(&<Vec<Option<String>>>::reflect_type());
        let _ = decode_value(&input, &mut dest);
    }

    #[test]
    fn round_trip_integers(a in any::<i64>(), b in any::<u32>(), c in any::<i8>(), d in any::<usize>()) {
        round_trip(&a);
        round_trip(&b);
        round_trip(&c);
        round_trip(&d);
    }

    #[test]
    fn round_trip_strings(s in any::<String>()) {
        round_trip(&s);
    }

    #[test]
    fn round_trip_collections(
        seq in prop::collection::vec(any::<i64>(), 0..8),
        nested in prop::collection::vec(prop::collection::vec(any::<u16>(), 0..4), 0..4),
        opts in prop::collection::vec(prop::option::of("[a-z ]{0,6}"), 0..6),
        array in any::<[i16; 3]>(),
        map in prop::collection::btree_map("\\PC{0,8}", prop::collection::vec(any::<u8>(), 0..3), 0..6),
        int_map in prop::collection::btree_map(any::<i32>(), prop::option::of(any::<i64>()), 0..6)
    ) {
        round_trip(&seq);
        round_trip(&nested);
        round_trip(&opts);
        round_trip(&array);
        round_trip(&map);
        round_trip(&int_map);
    }

    #[test]
    fn display_emits_one_unique_line_per_leaf(
        nested in prop::collection::vec(prop::collection::vec(any::<i64>(), 0..5), 0..5)
    ) {
        let leaves: usize = nested.iter().map(Vec::len).sum();
        let dump = display("v", &nested.to_value());
        let paths: HashSet<&str> = dump
            .lines()
            .map(|line| line.split(" = ").next().unwrap_or(line))
            .collect();
        prop_assert_eq!(dump.lines().count(), leaves);
        prop_assert_eq!(paths.len(), leaves);
    }

    #[test]
    fn display_map_lines_match_entries(map in prop::collection::btree_map("[a-z]{1,4}", any::<u8>(), 0..8)) {
        let dump = display("m", &map.to_value());
        prop_assert_eq!(dump.lines().count(), map.len());
        for (key, value) in &map {
            let line = format!("m[{:?}] = {}", key, value);
            prop_assert!(dump.lines().any(|l| l == line), "missing {}", line);
        }
    }

    #[test]
    fn format_atom_is_total(
        i in any::<i64>(),
        f in any::<f64>(),
        s in any::<String>(),
        b in any::<bool>(),
        handle in any::<usize>()
    ) {
        let values = [
            Value::Invalid,
            Value::from(i),
            Value::from(f),
            Value::from(s),
            Value::from(b),
            Value::complex(FloatWidth::F32, f, f),
            Value::chan(Type::Bool, handle),
            Value::func("func()", handle),
            Value::interface("interface {}", Value::from(i)),
            Value::pointer_to(Value::from(i)).unwrap(),
            Value::zero(&Type::map(Type::String, Type::Bool)),
            Value::zero(&Type::array(Type::String, 2)),
        ];
        for value in &values {
            prop_assert!(!format_atom(value).is_empty());
        }
    }

    #[test]
    fn map_order_does_not_change_content(
        entries in prop::collection::btree_map("[a-z]{0,5}", any::<i64>(), 0..8)
    ) {
        let ty = Type::map(Type::String, Type::Int(IntWidth::W64));
        let forward: Vec<(Value, Value)> = entries
            .iter()
            .map(|(k, v)| (Value::from(k.as_str()), Value::from(*v)))
            .collect();
        let mut backward = forward.clone();
        backward.reverse();

        let a = Value::map(Type::String, Type::Int(IntWidth::W64), forward).unwrap();
        let b = Value::map(Type::String, Type::Int(IntWidth::W64), backward).unwrap();

        let mut decoded_a = Value::zero(&ty);
        let mut decoded_b = Value::zero(&ty);
        decode_value(&encode_value(&a).unwrap(), &mut decoded_a).unwrap();
        decode_value(&encode_value(&b).unwrap(), &mut decoded_b).unwrap();
        prop_assert_eq!(&decoded_a, &decoded_b);
        prop_assert_eq!(&decoded_a, &a);

        let canonical = EncodeOptions::canonical();
        prop_assert_eq!(
            encode_value_with_options(&a, canonical).unwrap(),
            encode_value_with_options(&b, canonical).unwrap()
        );
    }
}

#[test]
fn round_trip_preserves_nil_versus_empty() {
    let mut map: BTreeMap<String, Option<Vec<i64>>> = BTreeMap::new();
    map.insert("none".to_string(), None);
    map.insert("empty".to_string(), Some(Vec::new()));
    map.insert("full".to_string(), Some(vec![1, 2]));
    assert_eq!(
        marshal(&map).unwrap(),
        r#"(("empty" ()) ("full" (1 2)) ("none" nil))"#
    );
    round_trip(&map);
}
