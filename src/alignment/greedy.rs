/// One source sentence matched to one target sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyMatch {
    pub source_index: usize,
    pub target_index: usize,
    pub score: f64,
}

/// Greedy nearest-match with target exclusivity.
///
/// Sources are visited in order; each takes the unused target with the strictly
/// highest score (the first seen wins ties). A target is never reused, so once
/// all targets are taken the remaining sources are left unmatched. `score`
/// receives `(source_index, target_index, source_pos, target_pos)` where the
/// positions are `index / count`.
pub fn align_greedy<F>(source_count: usize, target_count: usize, mut score: F) -> Vec<GreedyMatch>
where
    F: FnMut(usize, usize, f64, f64) -> f64,
{
    let mut used = vec![false; target_count];
    let mut matches = Vec::with_capacity(source_count.min(target_count));

    for source_index in 0..source_count {
        let source_pos = source_index as f64 / source_count as f64;

        let mut best_score = -1.0f64;
        let mut best_target = None;
        for (target_index, _) in used.iter().enumerate().filter(|&(_, &taken)| !taken) {
            let target_pos = target_index as f64 / target_count as f64;
            let candidate = score(source_index, target_index, source_pos, target_pos);
            // Non-finite scores count as no evidence.
            let candidate = if candidate.is_finite() { candidate } else { 0.0 };
            if candidate > best_score {
                best_score = candidate;
                best_target = Some(target_index);
            }
        }

        match best_target {
            Some(target_index) => {
                used[target_index] = true;
                matches.push(GreedyMatch {
                    source_index,
                    target_index,
                    score: best_score,
                });
            }
            None => {
                tracing::debug!(source_index, "greedy: no unused target left for source sentence");
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_best_matches_are_all_found() {
        // Source i prefers target (i + 1) % 3.
        let matches = align_greedy(3, 3, |s, t, _, _| if t == (s + 1) % 3 { 0.9 } else { 0.1 });
        let targets: Vec<usize> = matches.iter().map(|m| m.target_index).collect();
        assert_eq!(targets, vec![1, 2, 0]);
        assert!(matches.iter().all(|m| (m.score - 0.9).abs() < 1e-12));
    }

    #[test]
    fn ties_keep_the_first_target() {
        let matches = align_greedy(2, 3, |_, _, _, _| 0.5);
        assert_eq!(matches[0].target_index, 0);
        assert_eq!(matches[1].target_index, 1);
    }

    #[test]
    fn used_targets_are_excluded() {
        // Both sources prefer target 0; the second gets the next best.
        let matches = align_greedy(2, 2, |_, t, _, _| if t == 0 { 1.0 } else { 0.2 });
        assert_eq!(matches[0].target_index, 0);
        assert_eq!(matches[1].target_index, 1);
        assert!((matches[1].score - 0.2).abs() < 1e-12);
    }

    #[test]
    fn surplus_sources_are_starved() {
        let matches = align_greedy(3, 2, |s, t, sp, tp| {
            assert_eq!(sp, s as f64 / 3.0);
            assert_eq!(tp, t as f64 / 2.0);
            1.0 - (sp - tp).abs()
        });
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].source_index, 0);
        assert_eq!(matches[1].source_index, 1);
    }

    #[test]
    fn zero_scores_still_match() {
        let matches = align_greedy(1, 1, |_, _, _, _| 0.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 0.0);
    }

    #[test]
    fn non_finite_scores_count_as_zero() {
        let matches = align_greedy(2, 2, |s, _, _, _| if s == 0 { f64::NAN } else { f64::INFINITY });
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].target_index, 0);
        assert_eq!(matches[1].target_index, 1);
        assert!(matches.iter().all(|m| m.score == 0.0));
    }

    #[test]
    fn empty_inputs_produce_no_matches() {
        assert!(align_greedy(0, 4, |_, _, _, _| 1.0).is_empty());
        assert!(align_greedy(4, 0, |_, _, _, _| 1.0).is_empty());
    }
}
