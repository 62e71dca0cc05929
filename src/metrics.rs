//! Diffusion and randomness metrics over finished byte sequences.
//!
//! These functions never fail: malformed input maps to a fixed sentinel
//! value. They do not take part in encryption or decryption.

/// Number of distinct byte values.
const BINS: usize = 256;

/// Percentage of positions at which `a` and `b` differ (NPCR).
///
/// Returns `None` when the lengths differ or either sequence is empty.
pub fn npcr_percent(a: &[u8], b: &[u8]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let changed = a.iter().zip(b).filter(|(x, y)| x != y).count();
    Some(changed as f64 / a.len() as f64 * 100.0)
}

/// NPCR formatted to two decimals.
///
/// Mismatched or empty input yields the sentinel `"0.00"`.
///
/// # Examples
///
/// ```
/// use mealycrypt::metrics::npcr;
///
/// assert_eq!(npcr(&[1, 2, 3], &[1, 2, 3]), "0.00");
/// assert_eq!(npcr(&[1, 2, 3], &[9, 9, 9]), "100.00");
/// assert_eq!(npcr(&[1, 2], &[1, 2, 3]), "0.00");
/// ```
pub fn npcr(a: &[u8], b: &[u8]) -> String {
    format!("{:.2}", npcr_percent(a, b).unwrap_or(0.0))
}

/// Shannon entropy of the byte distribution, in bits per symbol.
///
/// Empty input has entropy 0. The result lies in `[0, 8]`.
pub fn entropy_bits(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut histogram = [0usize; BINS];
    for &v in values {
        histogram[v as usize] += 1;
    }
    let total = values.len() as f64;
    let mut entropy = 0.0;
    for &count in histogram.iter().filter(|&&c| c > 0) {
        let p = count as f64 / total;
        entropy -= p * p.log2();
    }
    entropy
}

/// Shannon entropy formatted to four decimals.
///
/// Works for any flat byte stream, text bytes and RGB channel data alike.
///
/// # Examples
///
/// ```
/// use mealycrypt::metrics::shannon_entropy;
///
/// assert_eq!(shannon_entropy(&[0, 0, 0, 0]), "0.0000");
/// assert_eq!(shannon_entropy(&[0, 1]), "1.0000");
/// assert_eq!(shannon_entropy(&[]), "0.0000");
/// ```
pub fn shannon_entropy(values: &[u8]) -> String {
    format!("{:.4}", entropy_bits(values))
}
