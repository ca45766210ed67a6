use linked_bst::linked::{NotFound, Tree};

use std::collections::BTreeMap;

use crate::Op;

/// Applies a set of operations to a tree and a `BTreeMap` multiset model.
/// This way we can ensure that after a random smattering of adds, removes,
/// and rebalances the tree holds the same multiset of items.
fn do_ops(ops: &[Op<i8>], tree: &mut Tree<i8>, model: &mut BTreeMap<i8, usize>) {
    for op in ops {
        match op {
            Op::Add(x) => {
                tree.add(*x);
                *model.entry(*x).or_insert(0) += 1;
            }
            Op::Remove(x) => {
                let expected = if let Some(count) = model.get_mut(x) {
                    *count -= 1;
                    if *count == 0 {
                        model.remove(x);
                    }
                    Ok(*x)
                } else {
                    Err(NotFound)
                };
                assert_eq!(tree.remove(x), expected);
            }
            Op::Rebalance => tree.rebalance(),
        }
    }
}

fn model_items(model: &BTreeMap<i8, usize>) -> Vec<i8> {
    model
        .iter()
        .flat_map(|(item, count)| std::iter::repeat(*item).take(*count))
        .collect()
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        let mut tree = Tree::new();
        let mut model = BTreeMap::new();

        do_ops(&ops, &mut tree, &mut model);

        let expected = model_items(&model);
        let inorder: Vec<i8> = tree.inorder().copied().collect();
        tree.len() == expected.len() && inorder == expected
    }
}

quickcheck::quickcheck! {
    fn size_tracks_net_mutations(ops: Vec<Op<i8>>) -> bool {
        let mut tree = Tree::new();
        let mut net = 0usize;

        for op in &ops {
            match op {
                Op::Add(x) => {
                    tree.add(*x);
                    net += 1;
                }
                Op::Remove(x) => {
                    if tree.remove(x).is_ok() {
                        net -= 1;
                    }
                }
                Op::Rebalance => tree.rebalance(),
            }
        }

        tree.len() == net
    }
}

quickcheck::quickcheck! {
    fn contains(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.add(*x);
        }

        xs.iter().all(|x| tree.find(x) == Some(x))
    }
}

quickcheck::quickcheck! {
    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.add(*x);
        }

        nots.iter()
            .filter(|x| !xs.contains(x))
            .all(|x| tree.find(x).is_none())
    }
}

quickcheck::quickcheck! {
    fn with_removals(xs: Vec<i8>, removes: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        let mut model = BTreeMap::new();
        for x in &xs {
            tree.add(*x);
            *model.entry(*x).or_insert(0usize) += 1;
        }

        for x in &removes {
            let removed = tree.remove(x);
            match model.get_mut(x) {
                Some(count) => {
                    *count -= 1;
                    if *count == 0 {
                        model.remove(x);
                    }
                    if removed != Ok(*x) {
                        return false;
                    }
                }
                None => {
                    if removed != Err(NotFound) {
                        return false;
                    }
                }
            }
        }

        let inorder: Vec<i8> = tree.inorder().copied().collect();
        inorder == model_items(&model)
    }
}

quickcheck::quickcheck! {
    fn rebalance_round_trips_and_minimizes_height(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.add(*x);
        }
        let before: Vec<i8> = tree.inorder().copied().collect();

        tree.rebalance();
        let after: Vec<i8> = tree.inorder().copied().collect();

        // Minimal height for n items is ⌈log2(n + 1)⌉ - 1, i.e. ⌊log2(n)⌋.
        let minimal = match xs.len() {
            0 => -1,
            n => (usize::BITS - 1 - n.leading_zeros()) as isize,
        };

        before == after && tree.len() == xs.len() && tree.height() == minimal
    }
}

quickcheck::quickcheck! {
    fn rebalancing_twice_keeps_the_height(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.add(*x);
        }

        tree.rebalance();
        let height = tree.height();
        tree.rebalance();

        tree.height() == height
    }
}

quickcheck::quickcheck! {
    fn range_find_over_extremes_is_everything(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.add(*x);
        }

        let (low, high) = match (xs.iter().min(), xs.iter().max()) {
            (Some(low), Some(high)) => (low, high),
            _ => return tree.range_find(&0, &0).is_empty(),
        };

        // The range ends at the *first* occurrence of the high bound, so duplicate
        // maxima past it are excluded.
        let mut sorted = xs.clone();
        sorted.sort_unstable();
        let cut = match sorted.iter().position(|x| x == high) {
            Some(cut) => cut,
            None => return false,
        };
        let expected: Vec<&i8> = sorted[..=cut].iter().collect();

        tree.range_find(low, high) == expected
    }
}
