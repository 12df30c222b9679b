//! Compact hex form of per-category scores.
//!
//! Layout is `[metadata section][validation section]`, each section one byte
//! per category in canonical [`Category::ALL`] order, hex-encoded two digits
//! per byte. Scores are quantized with `floor(score * 255)`, so a decoded
//! score is at most 1/255 below the score that was packed.

use std::collections::BTreeMap;

use poq_core::constants::QUANTIZED_SCORE_MAX;
use poq_core::error::EncodingError;
use poq_core::types::{Category, PoQResult};

use crate::transforms::clamp_unit;

/// `floor(clamp(score) * 255)`.
pub fn quantize(score: f64) -> u8 {
    // clamp_unit bounds the product to [0, 255]
    (clamp_unit(score) * QUANTIZED_SCORE_MAX as f64).floor() as u8
}

pub fn dequantize(q: u8) -> f64 {
    q as f64 / QUANTIZED_SCORE_MAX as f64
}

/// Hex-encode two equally long quantized sections.
pub fn pack_scores(metadata: &[u8], validation: &[u8]) -> Result<String, EncodingError> {
    if metadata.len() != validation.len() {
        return Err(EncodingError::LengthMismatch {
            metadata: metadata.len(),
            validation: validation.len(),
        });
    }
    let mut bytes = Vec::with_capacity(metadata.len() * 2);
    bytes.extend_from_slice(metadata);
    bytes.extend_from_slice(validation);
    Ok(hex::encode(bytes))
}

/// Split a packed string back into its metadata and validation sections.
pub fn unpack_scores(packed: &str) -> Result<(Vec<u8>, Vec<u8>), EncodingError> {
    let bytes = hex::decode(packed).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => EncodingError::InvalidHex(index),
        _ => EncodingError::OddLength(packed.len()),
    })?;

    if bytes.len() % 2 != 0 {
        return Err(EncodingError::LengthMismatch {
            metadata: bytes.len() / 2 + 1,
            validation: bytes.len() / 2,
        });
    }
    let (metadata, validation) = bytes.split_at(bytes.len() / 2);
    Ok((metadata.to_vec(), validation.to_vec()))
}

/// Pack per-category `(metadata, validation)` scores. Missing categories
/// encode as zero.
pub fn pack_category_scores(scores: &BTreeMap<Category, (f64, f64)>) -> String {
    let (metadata, validation): (Vec<u8>, Vec<u8>) = Category::ALL
        .iter()
        .map(|c| {
            let (m, v) = scores.get(c).copied().unwrap_or((0.0, 0.0));
            (quantize(m), quantize(v))
        })
        .unzip();
    hex::encode([metadata, validation].concat())
}

/// Packed form of a result: each present category's score paired with the
/// validation score, or 0 when validation was unavailable.
pub fn pack_result(result: &PoQResult) -> String {
    let llm = result.llm_score.unwrap_or(0.0);
    let scores: BTreeMap<Category, (f64, f64)> = result
        .category_scores
        .iter()
        .map(|(c, s)| (*c, (*s, llm)))
        .collect();
    pack_category_scores(&scores)
}

/// Decode a packed string to per-category scores, dropping categories whose
/// scores are both zero.
pub fn decode(packed: &str) -> Result<BTreeMap<Category, (f64, f64)>, EncodingError> {
    let (metadata, validation) = unpack_scores(packed)?;
    if metadata.len() > Category::ALL.len() {
        return Err(EncodingError::TooManyScores {
            got: metadata.len(),
            max: Category::ALL.len(),
        });
    }

    Ok(Category::ALL
        .iter()
        .zip(metadata.iter().zip(validation.iter()))
        .filter(|(_, (m, v))| **m > 0 || **v > 0)
        .map(|(c, (m, v))| (*c, (dequantize(*m), dequantize(*v))))
        .collect())
}
