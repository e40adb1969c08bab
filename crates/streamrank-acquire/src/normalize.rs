use unicode_normalization::UnicodeNormalization;

/// Normalize cell text to NFC and collapse every whitespace run to one space.
///
/// Wikipedia cells mix non-breaking spaces, line breaks and indentation
/// from the markup; none of it is meaningful in a single table value.
pub fn normalize_cell(input: &str) -> String {
    let nfc: String = input.nfc().collect();

    let mut out = String::with_capacity(nfc.len());
    let mut prev_space = true;
    for ch in nfc.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }

    if out.ends_with(' ') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_nfc() {
        // e + combining acute accent -> é (precomposed)
        let decomposed = "Beyonce\u{0301}";
        assert_eq!(normalize_cell(decomposed), "Beyoncé");
    }

    #[test]
    fn test_collapse_whitespace() {
        let input = "  Bad\u{00a0}Bunny \n and\tJhay   Cortez\n";
        assert_eq!(normalize_cell(input), "Bad Bunny and Jhay Cortez");
    }

    #[test]
    fn test_blank_cell() {
        assert_eq!(normalize_cell(" \n\t "), "");
    }
}
