use std::collections::BTreeMap;

use digitree::{DigiTree, Direction, KeyRange, Result, NODE_CAPACITY};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug, PartialEq)]
struct Account {
    id: u64,
    owner: String,
    balance: i64,
}

impl Account {
    fn new(id: u64, owner: &str, balance: i64) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            balance,
        }
    }
}

fn accounts() -> DigiTree<u64, Account> {
    DigiTree::with_key(|account: &Account| &account.id)
}

fn ids(tree: &DigiTree<u64, Account>) -> Result<Vec<u64>> {
    tree.range(&KeyRange::unbounded(Direction::Ascending))?
        .entries(tree)
        .map(|entry| entry.map(|account| account.id))
        .collect()
}

#[test]
fn ledger_of_keyed_records() -> Result<()> {
    let mut tree = accounts();
    tree.insert(Account::new(7, "ada", 100))?;
    tree.insert(Account::new(3, "brian", 40))?;
    tree.insert(Account::new(11, "cleo", 0))?;

    let conflict = tree.insert(Account::new(3, "mallory", 1_000_000))?;
    assert!(!conflict.is_on());
    assert_eq!(tree.get(&3)?.map(|a| a.owner.as_str()), Some("brian"));

    let (path, updated) = tree.merge(Account::new(7, "ada", 0), |existing| Account {
        balance: existing.balance + 25,
        ..existing.clone()
    })?;
    assert!(updated);
    assert_eq!(tree.at(&path)?.map(|a| a.balance), Some(125));

    let replaced = tree.upsert(Account::new(11, "cleo", 5))?;
    assert!(replaced.is_on());
    assert_eq!(tree.get(&11)?.map(|a| a.balance), Some(5));

    let renumber = tree.find(&11)?;
    let (moved, ok) = tree.update_at(&renumber, Account::new(1, "cleo", 5))?;
    assert!(ok);
    assert_eq!(tree.at(&moved)?.map(|a| a.id), Some(1));
    assert_eq!(ids(&tree)?, vec![1, 3, 7]);

    assert!(tree.delete_at(&tree.find(&3)?)?);
    assert_eq!(ids(&tree)?, vec![1, 7]);
    assert_eq!(tree.get_count(None, Direction::Descending)?, 2);
    Ok(())
}

#[test]
fn ascending_walk_is_sorted_and_matches_count() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(0xA11CE);
    let mut tree = DigiTree::new();
    let mut inserted = 0usize;
    for _ in 0..10_000 {
        if tree.insert(rng.gen_range(0u32..50_000))?.is_on() {
            inserted += 1;
        }
    }

    let first = tree.first()?;
    let walked = tree
        .ascending(&first)?
        .entries(&tree)
        .collect::<Result<Vec<_>>>()?;
    assert!(walked.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(walked.len(), inserted);
    assert_eq!(tree.get_count(None, Direction::Ascending)?, inserted);
    assert!(tree.verify()?.success);
    Ok(())
}

#[test]
fn interleaved_churn_matches_reference_map() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut tree = accounts();
    let mut reference = BTreeMap::new();

    for round in 0..20_000u64 {
        let id = rng.gen_range(0..2_000u64);
        match rng.gen_range(0..4) {
            0 => {
                let inserted = tree.insert(Account::new(id, "x", round as i64))?.is_on();
                assert_eq!(inserted, !reference.contains_key(&id));
                reference.entry(id).or_insert(round as i64);
            }
            1 => {
                tree.upsert(Account::new(id, "x", round as i64))?;
                reference.insert(id, round as i64);
            }
            2 => {
                let path = tree.find(&id)?;
                assert_eq!(tree.delete_at(&path)?, reference.remove(&id).is_some());
            }
            _ => {
                let (_, updated) = tree.merge(Account::new(id, "x", 1), |existing| Account {
                    balance: existing.balance + 1,
                    ..existing.clone()
                })?;
                let expected = reference.contains_key(&id);
                *reference.entry(id).or_insert(0) += 1;
                assert_eq!(updated, expected);
            }
        }
    }

    let actual: Vec<(u64, i64)> = tree
        .range(&KeyRange::unbounded(Direction::Ascending))?
        .entries(&tree)
        .map(|entry| entry.map(|account| (account.id, account.balance)))
        .collect::<Result<_>>()?;
    let expected: Vec<(u64, i64)> = reference.into_iter().collect();
    assert_eq!(actual, expected);
    assert!(tree.verify()?.success);
    Ok(())
}

#[test]
fn round_trip_shrinks_back_to_single_leaf() -> Result<()> {
    let total = (NODE_CAPACITY * NODE_CAPACITY + 1) as u64;
    let mut rng = ChaCha8Rng::seed_from_u64(0xD1617);
    let mut keys: Vec<u64> = (0..total).collect();
    keys.shuffle(&mut rng);

    let mut tree = DigiTree::new();
    for key in &keys {
        tree.insert(*key)?;
    }
    assert!(tree.height()? >= 3);

    keys.shuffle(&mut rng);
    for key in &keys {
        assert!(tree.delete_at(&tree.find(key)?)?);
    }
    assert_eq!(tree.get_count(None, Direction::Ascending)?, 0);
    assert_eq!(tree.height()?, 1);
    assert!(tree.is_empty());

    let stats = tree.stats_snapshot();
    assert!(stats.leaf_merges > 0);
    assert!(stats.root_collapses >= 2);
    Ok(())
}
