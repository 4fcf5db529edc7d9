//! Legality oracle: decides which groups of cards form a set.

use super::entities::Card;
use std::collections::HashMap;

/// Pure decision function over groups of cards. Implementations must be
/// stateless so players and the dealer can call them concurrently.
pub trait LegalityOracle: Send + Sync {
    /// Number of cards in a legal set.
    fn set_size(&self) -> usize;

    /// Whether `cards` form a legal set.
    fn is_set(&self, cards: &[Card]) -> bool;

    /// Up to `limit` legal sets drawn from `pool`, each in pool order.
    fn find_sets(&self, pool: &[Card], limit: usize) -> Vec<Vec<Card>> {
        search_combinations(self, pool, limit)
    }

    /// Per-card feature vectors, for diagnostics.
    fn features_of(&self, cards: &[Card]) -> Vec<Vec<u32>> {
        cards.iter().map(|_| Vec::new()).collect()
    }
}

/// Tries every group of `set_size` cards from `pool`, in lexicographic order.
fn search_combinations<O: LegalityOracle + ?Sized>(
    oracle: &O,
    pool: &[Card],
    limit: usize,
) -> Vec<Vec<Card>> {
    let mut found = Vec::new();
    if limit == 0 {
        return found;
    }
    for_each_combination(pool.len(), oracle.set_size(), |indices| {
        let group: Vec<Card> = indices.iter().map(|&i| pool[i]).collect();
        if oracle.is_set(&group) {
            found.push(group);
        }
        found.len() < limit
    });
    found
}

/// Visits every `k`-subset of `0..n` in lexicographic order until `visit`
/// returns false.
fn for_each_combination(n: usize, k: usize, mut visit: impl FnMut(&[usize]) -> bool) {
    if k == 0 || k > n {
        return;
    }

    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        if !visit(&indices) {
            return;
        }

        // Rightmost index that can still move forward.
        let Some(pos) = (0..k).rev().find(|&i| indices[i] < n - k + i) else {
            return;
        };
        indices[pos] += 1;
        for i in pos + 1..k {
            indices[i] = indices[i - 1] + 1;
        }
    }
}

/// The classic rule: a card id spells `feature_count` base-`feature_size`
/// digits, and a group of `feature_size` distinct cards is a set when every
/// feature is either all equal or all different across the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOracle {
    feature_size: usize,
    feature_count: usize,
}

impl SetOracle {
    pub fn new(feature_size: usize, feature_count: usize) -> Self {
        Self {
            feature_size,
            feature_count,
        }
    }

    pub fn from_config(config: &crate::GameConfig) -> Self {
        Self::new(config.feature_size, config.feature_count)
    }

    /// Feature values of one card, least significant feature first.
    pub fn features(&self, card: Card) -> Vec<u32> {
        // A base wider than any id leaves the whole id in the first feature.
        let base = u32::try_from(self.feature_size).ok();
        let mut id = card.0;
        (0..self.feature_count)
            .map(|_| match base {
                Some(base) => {
                    let value = id % base;
                    id /= base;
                    value
                }
                None => std::mem::take(&mut id),
            })
            .collect()
    }

    /// The one card completing a set with `a` and `b` when features take
    /// three values: per feature, the values must sum to 0 mod 3. `None`
    /// when that card's id does not fit in a `u32`.
    fn complete(&self, a: Card, b: Card) -> Option<Card> {
        let (fa, fb) = (self.features(a), self.features(b));
        let mut id = 0u32;
        for feature in (0..self.feature_count).rev() {
            let value = (6 - fa[feature] - fb[feature]) % 3;
            id = id.checked_mul(3)?.checked_add(value)?;
        }
        Some(Card(id))
    }

    /// Pair completion: each pair fixes the third card, so this is
    /// quadratic instead of cubic.
    fn find_triples(&self, pool: &[Card], limit: usize) -> Vec<Vec<Card>> {
        let mut found = Vec::new();
        if limit == 0 {
            return found;
        }

        let position: HashMap<Card, usize> =
            pool.iter().enumerate().map(|(i, &card)| (card, i)).collect();
        for i in 0..pool.len() {
            for j in i + 1..pool.len() {
                if pool[i] == pool[j] {
                    continue;
                }
                if let Some(third) = self.complete(pool[i], pool[j])
                    && let Some(&k) = position.get(&third)
                    && k > j
                {
                    found.push(vec![pool[i], pool[j], pool[k]]);
                    if found.len() >= limit {
                        return found;
                    }
                }
            }
        }
        found
    }
}

impl LegalityOracle for SetOracle {
    fn set_size(&self) -> usize {
        self.feature_size
    }

    fn is_set(&self, cards: &[Card]) -> bool {
        if cards.len() != self.feature_size {
            return false;
        }

        let mut ids: Vec<Card> = cards.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != cards.len() {
            return false;
        }

        let features: Vec<Vec<u32>> = cards.iter().map(|&card| self.features(card)).collect();
        (0..self.feature_count).all(|feature| {
            let mut values: Vec<u32> = features.iter().map(|f| f[feature]).collect();
            values.sort_unstable();
            values.dedup();
            values.len() == 1 || values.len() == cards.len()
        })
    }

    fn find_sets(&self, pool: &[Card], limit: usize) -> Vec<Vec<Card>> {
        if self.feature_size == 3 {
            self.find_triples(pool, limit)
        } else {
            search_combinations(self, pool, limit)
        }
    }

    fn features_of(&self, cards: &[Card]) -> Vec<Vec<u32>> {
        cards.iter().map(|&card| self.features(card)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(ids: &[u32]) -> Vec<Card> {
        ids.iter().copied().map(Card).collect()
    }

    #[test]
    fn test_features_are_base_digits() {
        let oracle = SetOracle::new(3, 4);
        // 47 = 2 + 0*3 + 2*9 + 1*27
        assert_eq!(oracle.features(Card(47)), vec![2, 0, 2, 1]);
        assert_eq!(oracle.features(Card(0)), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_all_different_feature_is_a_set() {
        let oracle = SetOracle::new(3, 4);
        assert!(oracle.is_set(&cards(&[0, 1, 2])));
    }

    #[test]
    fn test_two_equal_one_different_is_not_a_set() {
        let oracle = SetOracle::new(3, 4);
        // features [1,0,..] [2,0,..] [0,1,..]: second feature is 0,0,1
        assert!(!oracle.is_set(&cards(&[1, 2, 3])));
    }

    #[test]
    fn test_every_feature_mixed_is_a_set() {
        let oracle = SetOracle::new(3, 4);
        // 0 = [0,0,0,0], 40 = [1,1,1,1], 80 = [2,2,2,2]
        assert!(oracle.is_set(&cards(&[0, 40, 80])));
        assert!(oracle.is_set(&cards(&[80, 0, 40])));
    }

    #[test]
    fn test_wrong_size_or_duplicates_rejected() {
        let oracle = SetOracle::new(3, 4);
        assert!(!oracle.is_set(&cards(&[0, 1])));
        assert!(!oracle.is_set(&cards(&[0, 1, 2, 3])));
        assert!(!oracle.is_set(&cards(&[5, 5, 5])));
    }

    #[test]
    fn test_find_sets_respects_limit() {
        let oracle = SetOracle::new(3, 2);
        let pool: Vec<Card> = (0..9).map(Card).collect();

        // A 3x3 feature grid holds 12 sets.
        assert_eq!(oracle.find_sets(&pool, usize::MAX).len(), 12);
        assert_eq!(oracle.find_sets(&pool, 1).len(), 1);
        assert!(oracle.find_sets(&pool, 0).is_empty());
    }

    #[test]
    fn test_find_sets_in_setless_pool() {
        let oracle = SetOracle::new(3, 4);
        assert!(oracle.find_sets(&cards(&[1, 2, 3]), 1).is_empty());
        assert!(oracle.find_sets(&cards(&[0, 1]), 1).is_empty());
    }

    #[test]
    fn test_pair_completion_matches_exhaustive_search() {
        let oracle = SetOracle::new(3, 4);
        let pool: Vec<Card> = [0u32, 5, 7, 13, 22, 31, 40, 44, 58, 62, 71, 80]
            .into_iter()
            .map(Card)
            .collect();

        let fast = oracle.find_sets(&pool, usize::MAX);
        let slow = search_combinations(&oracle, &pool, usize::MAX);
        assert_eq!(fast, slow);
        assert!(fast.iter().all(|set| oracle.is_set(set)));
    }

    #[test]
    fn test_four_valued_features() {
        let oracle = SetOracle::new(4, 2);
        // [0,0] [1,0] [2,0] [3,0]
        assert!(oracle.is_set(&cards(&[0, 1, 2, 3])));
        assert_eq!(oracle.find_sets(&cards(&[0, 1, 2, 3, 4]), 5).len(), 1);
    }

    #[test]
    fn test_wide_features_keep_distinct_values() {
        let oracle = SetOracle::new(257, 1);
        assert_eq!(oracle.features(Card(256)), vec![256]);
        assert_eq!(oracle.features(Card(0)), vec![0]);

        let all: Vec<Card> = (0..257).map(Card).collect();
        assert!(oracle.is_set(&all));
        assert_eq!(oracle.features_of(&all[255..]), vec![vec![255], vec![256]]);
    }

    #[test]
    fn test_base_wider_than_card_ids() {
        let oracle = SetOracle::new(usize::MAX, 2);
        assert_eq!(oracle.features(Card(u32::MAX)), vec![u32::MAX, 0]);
    }

    #[test]
    fn test_pair_completion_beyond_id_range() {
        let oracle = SetOracle::new(3, 24);
        // The third card of 0 and 3^20 is 2 * 3^20, past u32::MAX.
        let pool = cards(&[0, 3u32.pow(20)]);
        assert!(oracle.find_sets(&pool, 1).is_empty());
    }

    #[test]
    fn test_combination_walk_visits_all_subsets() {
        let mut seen = Vec::new();
        for_each_combination(4, 2, |c| {
            seen.push(c.to_vec());
            true
        });
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }
}
