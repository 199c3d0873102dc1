#![no_main]

use std::collections::BTreeMap;

use digitree::{DigiTree, Direction, KeyBound, KeyRange};
use libfuzzer_sys::arbitrary::{self, Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone)]
enum Operation {
    Insert { key: u16, value: u8 },
    Upsert { key: u16, value: u8 },
    Delete { key: u16 },
    Rekey { from: u16, to: u16 },
    Scan { first: u16, last: u16, descending: bool },
}

impl<'a> Arbitrary<'a> for Operation {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let op_type: u8 = u.int_in_range(0..=4)?;
        Ok(match op_type {
            0 => Operation::Insert {
                key: u.int_in_range(0..=4_095)?,
                value: u.arbitrary()?,
            },
            1 => Operation::Upsert {
                key: u.int_in_range(0..=4_095)?,
                value: u.arbitrary()?,
            },
            2 => Operation::Delete {
                key: u.int_in_range(0..=4_095)?,
            },
            3 => Operation::Rekey {
                from: u.int_in_range(0..=4_095)?,
                to: u.int_in_range(0..=4_095)?,
            },
            _ => Operation::Scan {
                first: u.int_in_range(0..=4_095)?,
                last: u.int_in_range(0..=4_095)?,
                descending: u.arbitrary()?,
            },
        })
    }
}

fuzz_target!(|ops: Vec<Operation>| {
    let mut tree: DigiTree<u16, (u16, u8)> = DigiTree::with_key(|entry: &(u16, u8)| &entry.0);
    let mut reference: BTreeMap<u16, u8> = BTreeMap::new();

    for op in ops {
        match op {
            Operation::Insert { key, value } => {
                let path = tree.insert((key, value)).expect("insert");
                assert_eq!(path.is_on(), !reference.contains_key(&key));
                reference.entry(key).or_insert(value);
            }
            Operation::Upsert { key, value } => {
                tree.upsert((key, value)).expect("upsert");
                reference.insert(key, value);
            }
            Operation::Delete { key } => {
                let path = tree.find(&key).expect("find");
                let removed = tree.delete_at(&path).expect("delete");
                assert_eq!(removed, reference.remove(&key).is_some());
            }
            Operation::Rekey { from, to } => {
                let path = tree.find(&from).expect("find");
                let value = reference.get(&from).copied().unwrap_or(0);
                let (_, moved) = tree.update_at(&path, (to, value)).expect("update");
                let expected = reference.contains_key(&from)
                    && (from == to || !reference.contains_key(&to));
                assert_eq!(moved, expected);
                if moved {
                    reference.remove(&from);
                    reference.insert(to, value);
                }
            }
            Operation::Scan {
                first,
                last,
                descending,
            } => {
                let direction = if descending {
                    Direction::Descending
                } else {
                    Direction::Ascending
                };
                let range = KeyRange::new(
                    Some(KeyBound::inclusive(first)),
                    Some(KeyBound::exclusive(last)),
                    direction,
                );
                let seen: Vec<u16> = tree
                    .range(&range)
                    .expect("range")
                    .entries(&tree)
                    .map(|entry| entry.expect("entry").0)
                    .collect();
                let expected: Vec<u16> = if descending {
                    if first > last {
                        reference.range(last + 1..=first).rev().map(|(k, _)| *k).collect()
                    } else {
                        Vec::new()
                    }
                } else if first < last {
                    reference.range(first..last).map(|(k, _)| *k).collect()
                } else {
                    Vec::new()
                };
                assert_eq!(seen, expected);
            }
        }
    }

    let report = tree.verify().expect("verify");
    assert!(report.success, "{:?}", report.findings);
    assert_eq!(
        tree.get_count(None, Direction::Ascending).expect("count"),
        reference.len()
    );
});
