/// Levenshtein distance over chars, two rows at a time.
pub fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1) // deletion
                .min(curr[j] + 1) // insertion
                .min(prev[j] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity in `[0, 1]`: the share of the longer word left untouched by
/// the edit distance.
pub fn similarity(query: &[char], candidate: &[char]) -> f64 {
    let longest = query.len().max(candidate.len());
    if longest == 0 {
        return 1.0;
    }
    let distance = edit_distance(query, candidate).min(longest);
    (longest - distance) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance(&chars("hello"), &chars("hello")), 0);
        assert_eq!(edit_distance(&chars("hello"), &chars("hallo")), 1);
        assert_eq!(edit_distance(&chars("hello"), &chars("world")), 4);
        assert_eq!(edit_distance(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(edit_distance(&chars(""), &chars("abc")), 3);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity(&chars("word"), &chars("word")), 1.0);
        assert_eq!(similarity(&chars("abcd"), &chars("wxyz")), 0.0);
        assert_eq!(similarity(&chars("abcd"), &chars("abce")), 0.75);
        assert_eq!(similarity(&chars("hellp"), &chars("help")), 0.8);
    }
}
