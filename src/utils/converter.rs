//! Payload conversion utilities.
//!
//! The cipher works on flat byte sequences. These helpers move image
//! pixels and display strings in and out of that form without losing
//! any bytes.

use crate::error::{MealyCryptError, Result};

/// Bytes per RGB pixel.
pub const RGB_STRIDE: usize = 3;

/// Flattens RGB pixels into a row-major byte sequence (`r, g, b, r, g, b, ...`).
///
/// # Parameters
/// - `pixels`: Pixels in row-major order, no alpha channel.
///
/// # Returns
/// A `Vec<u8>` of length `pixels.len() * 3`.
pub fn flatten_rgb(pixels: &[[u8; 3]]) -> Vec<u8> {
    pixels.iter().flatten().copied().collect()
}

/// Regroups a flat byte sequence into RGB pixels.
///
/// # Parameters
/// - `input`: Byte slice whose length must be a multiple of 3.
///
/// # Errors
/// Returns [`MealyCryptError::InvalidPayloadLength`] if `input.len() % 3 != 0`.
pub fn unflatten_rgb(input: &[u8]) -> Result<Vec<[u8; 3]>> {
    if !input.len().is_multiple_of(RGB_STRIDE) {
        return Err(MealyCryptError::InvalidPayloadLength {
            len: input.len(),
            stride: RGB_STRIDE,
        });
    }
    Ok(input
        .chunks_exact(RGB_STRIDE)
        .map(|px| [px[0], px[1], px[2]])
        .collect())
}

/// Renders bytes as lowercase hex, two digits per byte.
pub fn to_hex(input: &[u8]) -> String {
    hex::encode(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_rgb_order() {
        let pixels = [[1, 2, 3], [4, 5, 6]];
        assert_eq!(flatten_rgb(&pixels), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten_rgb(&[]).is_empty());
    }

    #[test]
    fn test_unflatten_rgb() {
        let pixels = unflatten_rgb(&[10, 20, 30, 40, 50, 60]).unwrap();
        assert_eq!(pixels, vec![[10, 20, 30], [40, 50, 60]]);
    }

    #[test]
    fn test_unflatten_invalid_length() {
        let result = unflatten_rgb(&[1, 2, 3, 4]);
        assert_eq!(
            result,
            Err(MealyCryptError::InvalidPayloadLength { len: 4, stride: 3 })
        );
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[]), "");
        assert_eq!(to_hex(&[0x00, 0x0f, 0xff, 0x7a]), "000fff7a");
    }

    #[test]
    fn test_to_hex_decodes_back() {
        let bytes: Vec<u8> = (0..=255).collect();
        let rendered = to_hex(&bytes);
        assert_eq!(rendered.len(), 512);
        assert_eq!(hex::decode(&rendered).unwrap(), bytes);
    }
}
