//! Short product codes derived from barcodes

use crate::reader::CellValue;

/// Code used when a barcode cannot be turned into a short code
pub const FALLBACK_CODE: &str = "0000";

const SUFFIX_LEN: usize = 5;
const CODE_LEN: usize = 4;

/// Derive the 4-character code from a barcode cell.
///
/// The barcode is read as an integer, and the code is the first four
/// characters of its last five. Barcodes that are not integers or are
/// shorter than five characters map to [`FALLBACK_CODE`].
pub fn short_code(barcode: &CellValue) -> String {
    match barcode_digits(barcode) {
        Some(digits) => code_from_digits(&digits),
        None => FALLBACK_CODE.to_string(),
    }
}

/// Canonical decimal form of the barcode as an integer, sign included
fn barcode_digits(barcode: &CellValue) -> Option<String> {
    match barcode {
        CellValue::Number(n) if n.is_finite() => {
            let int = n.trunc();
            if int == 0.0 {
                Some("0".to_string())
            } else {
                Some(format!("{:.0}", int))
            }
        }
        CellValue::Number(_) | CellValue::Empty => None,
        CellValue::Text(text) => parse_integer_text(text),
    }
}

/// Parse text the way an integer literal is read: optional sign, decimal
/// digits only, surrounding whitespace ignored, leading zeros dropped.
fn parse_integer_text(text: &str) -> Option<String> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some("0".to_string());
    }
    Some(if negative {
        format!("-{}", significant)
    } else {
        significant.to_string()
    })
}

fn code_from_digits(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    if chars.len() < SUFFIX_LEN {
        return FALLBACK_CODE.to_string();
    }
    let code: String = chars[chars.len() - SUFFIX_LEN..]
        .iter()
        .take(CODE_LEN)
        .collect();
    format!("{:0>width$}", code, width = CODE_LEN)
}
