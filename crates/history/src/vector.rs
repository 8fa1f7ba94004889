//! Vector similarity utilities.

use contextor_core::IndexedDocument;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 for mismatched lengths, empty input, or a zero vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    ((dot / denom) as f32).clamp(-1.0, 1.0)
}

/// The `k` documents most similar to `query`, best first. Ties keep
/// insertion order.
pub fn top_k<'a>(
    documents: &'a [IndexedDocument],
    query: &[f32],
    k: usize,
) -> Vec<(f32, &'a IndexedDocument)> {
    let mut scored: Vec<(f32, &IndexedDocument)> = documents
        .iter()
        .map(|doc| (cosine_similarity(&doc.embedding, query), doc))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextor_core::DocumentMetadata;

    fn doc(content: &str, embedding: Vec<f32>) -> IndexedDocument {
        IndexedDocument {
            content: content.into(),
            embedding,
            metadata: DocumentMetadata {
                conversation_id: "c".into(),
                message_count: 1,
                last_updated: None,
                source_file: "c.json".into(),
                chunk_kind: None,
            },
        }
    }

    #[test]
    fn identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_inputs_are_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn top_k_orders_and_truncates() {
        let docs = vec![
            doc("far", vec![0.0, 1.0]),
            doc("near", vec![1.0, 0.1]),
            doc("mid", vec![1.0, 1.0]),
        ];
        let hits = top_k(&docs, &[1.0, 0.0], 2);
        let names: Vec<_> = hits.iter().map(|(_, d)| d.content.as_str()).collect();
        assert_eq!(names, vec!["near", "mid"]);
        assert!(hits[0].0 >= hits[1].0);
    }
}
