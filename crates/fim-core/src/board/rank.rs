// EPA ranking for candidate lists.

use std::cmp::Ordering;

use crate::model::Candidate;

/// Order candidates by EPA, highest first. Candidates without an EPA go last
/// and keep their relative input order (the sort is stable).
pub fn rank_sort<T: Candidate + Clone>(entities: &[T]) -> Vec<T> {
    let mut ranked = entities.to_vec();
    rank_sort_in_place(&mut ranked);
    ranked
}

/// In-place variant of [`rank_sort`].
pub fn rank_sort_in_place<T: Candidate>(entities: &mut [T]) {
    entities.sort_by(|a, b| compare_epa_desc(a.epa(), b.epa()));
}

fn compare_epa_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    let key = |v: Option<f64>| v.filter(|x| !x.is_nan()).unwrap_or(f64::NEG_INFINITY);
    key(b).total_cmp(&key(a))
}

/// EPA as shown on cards: the value, or `N/A`.
pub fn format_epa(epa: Option<f64>) -> String {
    match epa {
        Some(v) if v.is_finite() => {
            if v.fract() == 0.0 {
                format!("{v:.0}")
            } else {
                format!("{v:.1}")
            }
        }
        _ => "N/A".to_string(),
    }
}
