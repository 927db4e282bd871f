use std::cmp::Ordering;

use serde::Serialize;

/// One vocabulary term with its weight in a vectorized input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f32,
}

/// Ranks every vocabulary term by its weight in `vector`, descending, and
/// truncates to `k`. Ties, including the all-zero remainder of the
/// vocabulary, stay in vocabulary order.
///
/// Zero-weight terms appear whenever fewer than `k` terms are non-zero;
/// callers render them rather than guard against them.
pub(crate) fn rank_terms(
    vector: &[(usize, f32)],
    feature_names: &[String],
    k: usize,
) -> Vec<TermWeight> {
    let mut ranked: Vec<(usize, f32)> = vector
        .iter()
        .copied()
        .filter(|&(_, weight)| weight > 0.0)
        .collect();
    ranked.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
        Some(Ordering::Equal) | None => a.0.cmp(&b.0),
        Some(order) => order,
    });
    ranked.truncate(k);

    if ranked.len() < k {
        // Nothing was truncated, so `ranked` holds every non-zero column.
        // The rest of the vocabulary follows at weight zero, in column
        // order, exactly as a dense sort over all columns would place it.
        let mut taken = vec![false; feature_names.len()];
        for &(column, _) in &ranked {
            taken[column] = true;
        }
        for column in 0..feature_names.len() {
            if ranked.len() == k {
                break;
            }
            if !taken[column] {
                ranked.push((column, 0.0));
            }
        }
    }

    ranked
        .into_iter()
        .map(|(column, weight)| TermWeight {
            term: feature_names[column].clone(),
            weight,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("t{i}")).collect()
    }

    fn terms(ranked: &[TermWeight]) -> Vec<&str> {
        ranked.iter().map(|t| t.term.as_str()).collect()
    }

    #[test]
    fn test_orders_descending_with_ties_in_vocabulary_order() {
        let names = names(4);
        let ranked = rank_terms(&[(0, 0.5), (1, 0.7), (3, 0.5)], &names, 4);
        assert_eq!(terms(&ranked), ["t1", "t0", "t3", "t2"]);
        assert_eq!(ranked[3].weight, 0.0);
    }

    #[test]
    fn test_truncates_to_k() {
        let names = names(5);
        let vector = [(0, 0.1), (1, 0.5), (2, 0.4), (3, 0.3), (4, 0.2)];
        let ranked = rank_terms(&vector, &names, 3);
        assert_eq!(terms(&ranked), ["t1", "t2", "t3"]);
    }

    #[test]
    fn test_pads_with_zero_weight_terms_in_vocabulary_order() {
        let names = names(5);
        let ranked = rank_terms(&[(2, 0.9)], &names, 4);
        assert_eq!(terms(&ranked), ["t2", "t0", "t1", "t3"]);
        assert!(ranked[1..].iter().all(|t| t.weight == 0.0));
    }

    #[test]
    fn test_k_zero_yields_nothing() {
        let names = names(3);
        assert!(rank_terms(&[(0, 0.4)], &names, 0).is_empty());
    }

    #[test]
    fn test_k_beyond_vocabulary_stops_at_vocabulary_size() {
        let names = names(3);
        let ranked = rank_terms(&[(1, 0.4)], &names, 10);
        assert_eq!(terms(&ranked), ["t1", "t0", "t2"]);
    }

    #[test]
    fn test_empty_vector_pads_from_the_start() {
        let names = names(4);
        let ranked = rank_terms(&[], &names, 2);
        assert_eq!(terms(&ranked), ["t0", "t1"]);
        assert!(ranked.iter().all(|t| t.weight == 0.0));
    }
}
