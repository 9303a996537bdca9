use crate::error::AnalysisError;
use crate::types::ContentKind;
use std::collections::HashMap;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObfuscationTechnique {
    UnicodeHomoglyphs,
    MathematicalAlphanumerics,
    FullwidthCharacters,
    NonBreakingSpaces,
    ZeroWidthCharacters,
    BidirectionalOverride,
    CombiningCharacters,
}

/// Position of one folded char inside the original input.
#[derive(Debug, Clone, Copy)]
struct CharOrigin {
    folded: usize,
    original: usize,
    original_len: usize,
}

/// Immutable snapshot handed to every extractor.
///
/// `text` is the folded form that pattern matchers run against. Byte ranges
/// in `text` map back onto `original` with [`NormalizedContent::excerpt`], so
/// evidence is always a literal slice of what the user submitted.
#[derive(Debug, Clone)]
pub struct NormalizedContent {
    original: String,
    text: String,
    kind: ContentKind,
    origins: Vec<CharOrigin>,
    obfuscation: Vec<ObfuscationTechnique>,
}

impl NormalizedContent {
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn obfuscation(&self) -> &[ObfuscationTechnique] {
        &self.obfuscation
    }

    /// Literal slice of the original input covering a byte range of `text`.
    pub fn excerpt(&self, range: Range<usize>) -> &str {
        if range.start >= range.end || self.origins.is_empty() {
            return "";
        }

        let first = match self.origins.binary_search_by(|o| o.folded.cmp(&range.start)) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        // Last folded char that starts before the end of the range.
        let last = match self.origins.binary_search_by(|o| o.folded.cmp(&range.end)) {
            Ok(i) | Err(i) => i.saturating_sub(1),
        };
        if last < first {
            return "";
        }

        let start = self.origins[first].original;
        let end = self.origins[last].original + self.origins[last].original_len;
        &self.original[start..end]
    }
}

pub struct ContentNormalizer {
    homoglyph_map: HashMap<char, char>,
    zero_width_chars: Vec<char>,
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentNormalizer {
    pub fn new() -> Self {
        let mut homoglyph_map = HashMap::new();

        // Cyrillic
        for (from, to) in [
            ('а', 'a'),
            ('е', 'e'),
            ('о', 'o'),
            ('р', 'p'),
            ('с', 'c'),
            ('х', 'x'),
            ('у', 'y'),
            ('і', 'i'),
            ('ј', 'j'),
            ('ѕ', 's'),
            ('ԁ', 'd'),
            ('ӏ', 'l'),
            ('А', 'A'),
            ('В', 'B'),
            ('Е', 'E'),
            ('К', 'K'),
            ('М', 'M'),
            ('Н', 'H'),
            ('О', 'O'),
            ('Р', 'P'),
            ('С', 'C'),
            ('Т', 'T'),
            ('Х', 'X'),
        ] {
            homoglyph_map.insert(from, to);
        }

        // Greek
        for (from, to) in [
            ('α', 'a'),
            ('ο', 'o'),
            ('ν', 'v'),
            ('ι', 'i'),
            ('Α', 'A'),
            ('Β', 'B'),
            ('Ε', 'E'),
            ('Ι', 'I'),
            ('Κ', 'K'),
            ('Ο', 'O'),
            ('Ρ', 'P'),
            ('Τ', 'T'),
        ] {
            homoglyph_map.insert(from, to);
        }

        Self {
            homoglyph_map,
            zero_width_chars: vec!['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'],
        }
    }

    /// Trim and fold the input. Blank input is rejected before any extractor runs.
    pub fn normalize(
        &self,
        input: &str,
        kind: ContentKind,
    ) -> Result<NormalizedContent, AnalysisError> {
        let original = input.trim();
        if original.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let mut text = String::with_capacity(original.len());
        let mut origins = Vec::with_capacity(original.len());
        let mut found = Vec::new();

        for (offset, ch) in original.char_indices() {
            let folded = match self.fold_char(ch) {
                Folded::Keep => Some(ch),
                Folded::Replace(replacement, technique) => {
                    note(&mut found, technique);
                    Some(replacement)
                }
                Folded::Drop(technique) => {
                    note(&mut found, technique);
                    None
                }
            };

            if let Some(out) = folded {
                origins.push(CharOrigin {
                    folded: text.len(),
                    original: offset,
                    original_len: ch.len_utf8(),
                });
                text.push(out);
            }
        }

        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        Ok(NormalizedContent {
            original: original.to_string(),
            text,
            kind,
            origins,
            obfuscation: found,
        })
    }

    fn fold_char(&self, ch: char) -> Folded {
        if let Some(&replacement) = self.homoglyph_map.get(&ch) {
            return Folded::Replace(replacement, ObfuscationTechnique::UnicodeHomoglyphs);
        }
        if self.zero_width_chars.contains(&ch) {
            return Folded::Drop(ObfuscationTechnique::ZeroWidthCharacters);
        }
        if matches!(
            ch,
            '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{200E}' | '\u{200F}'
        ) {
            return Folded::Drop(ObfuscationTechnique::BidirectionalOverride);
        }

        let code = ch as u32;
        match code {
            0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF => {
                Folded::Drop(ObfuscationTechnique::CombiningCharacters)
            }
            // Mathematical Alphanumeric Symbols: 13 letter styles of 52 glyphs each
            0x1D400..=0x1D6A3 => {
                let index = (code - 0x1D400) % 52;
                let letter = if index < 26 {
                    b'A' + index as u8
                } else {
                    b'a' + (index - 26) as u8
                };
                Folded::Replace(letter as char, ObfuscationTechnique::MathematicalAlphanumerics)
            }
            0x1D7CE..=0x1D7FF => {
                let digit = b'0' + ((code - 0x1D7CE) % 10) as u8;
                Folded::Replace(digit as char, ObfuscationTechnique::MathematicalAlphanumerics)
            }
            0xFF01..=0xFF5E => match char::from_u32(code - 0xFEE0) {
                Some(ascii) => Folded::Replace(ascii, ObfuscationTechnique::FullwidthCharacters),
                None => Folded::Keep,
            },
            0x00A0 | 0x2007 | 0x202F => {
                Folded::Replace(' ', ObfuscationTechnique::NonBreakingSpaces)
            }
            _ => Folded::Keep,
        }
    }
}

enum Folded {
    Keep,
    Replace(char, ObfuscationTechnique),
    Drop(ObfuscationTechnique),
}

fn note(found: &mut Vec<ObfuscationTechnique>, technique: ObfuscationTechnique) {
    if !found.contains(&technique) {
        found.push(technique);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_rejected() {
        let normalizer = ContentNormalizer::new();
        assert_eq!(
            normalizer.normalize("", ContentKind::Text).unwrap_err(),
            AnalysisError::EmptyInput
        );
        assert_eq!(
            normalizer.normalize("   \n\t", ContentKind::Url).unwrap_err(),
            AnalysisError::EmptyInput
        );
        // Only invisible characters left after folding
        assert_eq!(
            normalizer.normalize("\u{200B}\u{200B}", ContentKind::Text).unwrap_err(),
            AnalysisError::EmptyInput
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        let normalizer = ContentNormalizer::new();
        let content = normalizer.normalize("  hello there  ", ContentKind::Text).unwrap();
        assert_eq!(content.original(), "hello there");
        assert_eq!(content.text(), "hello there");
        assert!(content.obfuscation().is_empty());
    }

    #[test]
    fn test_homoglyphs_and_zero_width_folded() {
        let normalizer = ContentNormalizer::new();
        // Cyrillic 'а' and a zero-width space inside "paypal"
        let content = normalizer
            .normalize("p\u{0430}y\u{200B}pal login", ContentKind::Text)
            .unwrap();
        assert_eq!(content.text(), "paypal login");
        assert!(content
            .obfuscation()
            .contains(&ObfuscationTechnique::UnicodeHomoglyphs));
        assert!(content
            .obfuscation()
            .contains(&ObfuscationTechnique::ZeroWidthCharacters));
    }

    #[test]
    fn test_math_alphanumerics_folded() {
        let normalizer = ContentNormalizer::new();
        // Bold "WIN" followed by bold digit 1
        let content = normalizer
            .normalize("\u{1D416}\u{1D408}\u{1D40D} \u{1D7CF}", ContentKind::Text)
            .unwrap();
        assert_eq!(content.text(), "WIN 1");
    }

    #[test]
    fn test_excerpt_maps_back_to_original() {
        let normalizer = ContentNormalizer::new();
        let original = "Your \u{1D400}ccount is bl\u{200B}ocked";
        let content = normalizer.normalize(original, ContentKind::Text).unwrap();

        let folded = content.text();
        let start = folded.find("Account").unwrap();
        let end = folded.find("blocked").unwrap() + "blocked".len();

        let excerpt = content.excerpt(start..end);
        assert!(original.contains(excerpt));
        assert!(excerpt.starts_with('\u{1D400}'));
        assert!(excerpt.ends_with("ocked"));
    }

    #[test]
    fn test_excerpt_of_empty_range() {
        let normalizer = ContentNormalizer::new();
        let content = normalizer.normalize("abc", ContentKind::Text).unwrap();
        assert_eq!(content.excerpt(1..1), "");
        assert_eq!(content.excerpt(0..3), "abc");
    }
}
