use rand::Rng;
use rand::seq::IndexedRandom;

/// 计算两个 f64 切片的余弦相似度
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product / (norm_a * norm_b)
}

/// Returns the index and similarity score of the best match, or None if the input is empty.
/// On equal scores the earliest candidate wins.
pub fn find_best_match(
    query_embedding: &[f64],
    question_embeddings: &[Vec<f64>],
) -> Option<(usize, f64)> {
    question_embeddings
        .iter()
        .enumerate()
        .map(|(index, q_embedding)| (index, cosine_similarity(query_embedding, q_embedding)))
        .fold(None, |best, (index, similarity)| match best {
            Some((_, best_similarity)) if best_similarity >= similarity => best,
            _ => Some((index, similarity)),
        })
}

/// Picks up to `count` distinct questions at random.
pub fn sample_questions<R: Rng + ?Sized>(questions: &[String], count: usize, rng: &mut R) -> Vec<String> {
    questions.choose_multiple(rng, count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn cosine_of_identical_and_orthogonal_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn best_match_prefers_highest_then_earliest() {
        let query = vec![1.0, 0.0];
        let candidates = vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0], vec![0.2, 0.9]];
        let (index, score) = find_best_match(&query, &candidates).unwrap();
        assert_eq!(index, 1);
        assert!((score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);

        assert_eq!(find_best_match(&query, &[]), None);
    }

    #[test]
    fn seeded_sampling_is_deterministic_and_distinct() {
        let questions: Vec<String> = (0..10).map(|i| format!("q{i}")).collect();

        let first = sample_questions(&questions, 3, &mut StdRng::seed_from_u64(7));
        let second = sample_questions(&questions, 3, &mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);

        let mut deduped = first.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 3);
        assert!(first.iter().all(|q| questions.contains(q)));
    }

    #[test]
    fn sampling_never_exceeds_available_questions() {
        let questions = vec!["only".to_string()];
        let picked = sample_questions(&questions, 3, &mut StdRng::seed_from_u64(1));
        assert_eq!(picked, vec!["only".to_string()]);
        assert!(sample_questions(&[], 3, &mut StdRng::seed_from_u64(1)).is_empty());
    }
}
