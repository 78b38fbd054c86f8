/// Find local maxima in a signal.
///
/// A peak is a sample (or the middle of a flat run of equal samples) that is
/// strictly higher than both neighbours. The first and last samples are never
/// peaks. Peaks below `min_height` are dropped. When `min_distance > 1`, peaks
/// closer than `min_distance` samples are thinned, keeping the taller one (the
/// earlier one on equal height).
///
/// Returns peak indices in ascending order.
#[must_use]
pub fn find_peaks(values: &[f64], min_height: f64, min_distance: usize) -> Vec<usize> {
    let n = values.len();
    if n < 3 {
        return Vec::new();
    }

    let mut peaks = Vec::new();
    let mut i = 1;
    while i < n - 1 {
        if values[i - 1] < values[i] {
            // Walk over a plateau of equal values
            let mut ahead = i + 1;
            while ahead < n - 1 && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                let mid = (i + ahead - 1) / 2;
                if values[mid] >= min_height {
                    peaks.push(mid);
                }
                i = ahead;
                continue;
            }
        }
        i += 1;
    }

    if min_distance > 1 && peaks.len() > 1 {
        peaks = thin_by_distance(values, &peaks, min_distance);
    }

    peaks
}

fn thin_by_distance(values: &[f64], peaks: &[usize], min_distance: usize) -> Vec<usize> {
    // Tallest first; the sort is stable so equal heights keep index order
    let mut by_height: Vec<usize> = (0..peaks.len()).collect();
    by_height.sort_by(|&a, &b| {
        values[peaks[b]]
            .partial_cmp(&values[peaks[a]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = vec![true; peaks.len()];
    for &k in &by_height {
        if !keep[k] {
            continue;
        }
        let center = peaks[k];
        for j in (0..k).rev() {
            if center - peaks[j] >= min_distance {
                break;
            }
            keep[j] = false;
        }
        for j in k + 1..peaks.len() {
            if peaks[j] - center >= min_distance {
                break;
            }
            keep[j] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}
