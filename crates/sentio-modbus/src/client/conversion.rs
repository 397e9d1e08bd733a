// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Decoding and encoding of register words.
//!
//! The codec is a single table keyed by `(kind, value_type, count)`:
//!
//! ```text
//! ┌──────────────────┬───────────────┬───────┬──────────────────────────────┐
//! │ kind             │ value type    │ count │ decoded as                   │
//! ├──────────────────┼───────────────┼───────┼──────────────────────────────┤
//! │ discrete input   │ integer       │ 1     │ 0 or 1                       │
//! │ input / holding  │ integer       │ 1     │ u16                          │
//! │ input / holding  │ integer       │ 2     │ u32, big-endian words+bytes  │
//! │ input / holding  │ integer       │ 4     │ u64, big-endian words+bytes  │
//! │ input / holding  │ string        │ n ≥ 1 │ UTF-8, trailing NULs trimmed │
//! │ input / holding  │ fixed point   │ 1     │ i16 / 100                    │
//! └──────────────────┴───────────────┴───────┴──────────────────────────────┘
//! ```
//!
//! Anything else is [`ConversionError::UnsupportedEncoding`].

use crate::error::{ConversionError, SentioError, SentioResult};
use crate::types::{RegisterDescriptor, RegisterKind, RegisterValue, ValueType};

/// Scale factor of fixed-point registers.
pub const FIXED_POINT_SCALE: f64 = 100.0;

/// The decode layout selected for a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Bit,
    Word,
    DoubleWord,
    QuadWord,
    Text,
    FixedPoint,
}

/// Stateless register codec.
///
/// Endianness is fixed: the most significant word comes first and each word
/// is transmitted high byte first.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterCodec;

impl RegisterCodec {
    /// Creates a codec.
    pub const fn new() -> Self {
        Self
    }

    fn layout(descriptor: &RegisterDescriptor) -> SentioResult<Layout> {
        use RegisterKind::*;
        use ValueType::*;

        let layout = match (descriptor.kind, descriptor.value_type, descriptor.count) {
            (DiscreteInput, RawInteger, 1) => Layout::Bit,
            (DiscreteInput, _, _) => return Err(unsupported(descriptor)),
            (_, RawInteger, 1) => Layout::Word,
            (_, RawInteger, 2) => Layout::DoubleWord,
            (_, RawInteger, 4) => Layout::QuadWord,
            (_, AsciiString, n) if n > 0 => Layout::Text,
            (_, FixedPoint100, 1) => Layout::FixedPoint,
            _ => return Err(unsupported(descriptor)),
        };
        Ok(layout)
    }

    /// Checks that a decode rule exists for `descriptor`.
    pub fn check(&self, descriptor: &RegisterDescriptor) -> SentioResult<()> {
        Self::layout(descriptor).map(|_| ())
    }

    // =========================================================================
    // Decode
    // =========================================================================

    /// Decodes the words read for `descriptor`.
    ///
    /// Extra words beyond the descriptor count are ignored.
    pub fn decode(
        &self,
        descriptor: &RegisterDescriptor,
        words: &[u16],
    ) -> SentioResult<RegisterValue> {
        let layout = Self::layout(descriptor)?;
        let count = usize::from(descriptor.count);
        if words.len() < count {
            return Err(SentioError::conversion(ConversionError::insufficient_data(
                count,
                words.len(),
            )));
        }
        let words = &words[..count];

        let value = match layout {
            Layout::Bit => RegisterValue::Integer(u64::from(words[0] != 0)),
            Layout::Word => RegisterValue::Integer(u64::from(words[0])),
            Layout::DoubleWord => {
                let b = words_to_bytes(words);
                RegisterValue::Integer(u64::from(u32::from_be_bytes([b[0], b[1], b[2], b[3]])))
            }
            Layout::QuadWord => {
                let b = words_to_bytes(words);
                RegisterValue::Integer(u64::from_be_bytes([
                    b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
                ]))
            }
            Layout::Text => RegisterValue::Text(words_to_string(words)?),
            Layout::FixedPoint => {
                RegisterValue::Decimal(f64::from(words[0] as i16) / FIXED_POINT_SCALE)
            }
        };

        Ok(value)
    }

    /// Decodes discrete input bits as 0/1 words.
    pub fn decode_bits(
        &self,
        descriptor: &RegisterDescriptor,
        bits: &[bool],
    ) -> SentioResult<RegisterValue> {
        let words: Vec<u16> = bits.iter().map(|&b| u16::from(b)).collect();
        self.decode(descriptor, &words)
    }

    // =========================================================================
    // Encode
    // =========================================================================

    /// Encodes `value` into the single holding-register word for `descriptor`.
    ///
    /// Fixed-point values are multiplied by 100 and truncated toward zero.
    /// The result must fit an `i16`, the same range `decode` reads back.
    /// Negative results are sent in two's complement.
    pub fn encode(
        &self,
        descriptor: &RegisterDescriptor,
        value: &RegisterValue,
    ) -> SentioResult<u16> {
        match (Self::layout(descriptor)?, value) {
            (Layout::Word, RegisterValue::Integer(v)) => u16::try_from(*v)
                .map_err(|_| SentioError::conversion(ConversionError::overflow(v, "u16 word"))),
            (Layout::FixedPoint, RegisterValue::Decimal(v)) => encode_fixed_point(*v),
            (Layout::FixedPoint, RegisterValue::Integer(v)) => encode_fixed_point(*v as f64),
            (Layout::Word | Layout::FixedPoint, other) => {
                Err(SentioError::conversion(ConversionError::type_mismatch(
                    descriptor.value_type.as_str(),
                    other.type_name(),
                )))
            }
            _ => Err(unsupported(descriptor)),
        }
    }
}

fn unsupported(descriptor: &RegisterDescriptor) -> SentioError {
    SentioError::conversion(ConversionError::unsupported_encoding(
        descriptor.value_type.as_str(),
        descriptor.count,
    ))
}

fn encode_fixed_point(value: f64) -> SentioResult<u16> {
    if !value.is_finite() {
        return Err(SentioError::conversion(ConversionError::overflow(
            value,
            "fixed-point word",
        )));
    }
    let raw = (value * FIXED_POINT_SCALE).trunc();
    if raw < f64::from(i16::MIN) || raw > f64::from(i16::MAX) {
        return Err(SentioError::conversion(ConversionError::overflow(
            value,
            "fixed-point word",
        )));
    }
    Ok((raw as i32) as u16)
}

fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn words_to_string(words: &[u16]) -> SentioResult<String> {
    let bytes = words_to_bytes(words);
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);

    String::from_utf8(bytes[..end].to_vec())
        .map_err(|e| SentioError::conversion(ConversionError::invalid_encoding(e.to_string())))
}

// =============================================================================
// Tests
// =============================================================================
