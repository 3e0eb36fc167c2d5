use pinyin::ToPinyin;

use super::syllable::{PhoneticSyllable, Tone};

/// Converts text to one phonetic syllable per character.
pub trait PhoneticConverter: Send + Sync {
    /// Never fails; characters without a reading map to themselves.
    fn syllables(&self, text: &str) -> Vec<PhoneticSyllable>;
}

/// Zhuyin (Bopomofo) converter backed by the `pinyin` crate's default
/// reading of each character.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinZhuyinConverter;

impl PhoneticConverter for PinyinZhuyinConverter {
    fn syllables(&self, text: &str) -> Vec<PhoneticSyllable> {
        text.chars()
            .map(|ch| match ch.to_pinyin() {
                Some(reading) => {
                    let numbered = reading.with_tone_num_end();
                    pinyin_to_zhuyin(numbered).unwrap_or_else(|| PhoneticSyllable::new(numbered))
                }
                None => PhoneticSyllable::new(ch.to_string()),
            })
            .collect()
    }
}

const INITIALS: &[(&str, char)] = &[
    ("zh", 'ㄓ'),
    ("ch", 'ㄔ'),
    ("sh", 'ㄕ'),
    ("b", 'ㄅ'),
    ("p", 'ㄆ'),
    ("m", 'ㄇ'),
    ("f", 'ㄈ'),
    ("d", 'ㄉ'),
    ("t", 'ㄊ'),
    ("n", 'ㄋ'),
    ("l", 'ㄌ'),
    ("g", 'ㄍ'),
    ("k", 'ㄎ'),
    ("h", 'ㄏ'),
    ("j", 'ㄐ'),
    ("q", 'ㄑ'),
    ("x", 'ㄒ'),
    ("r", 'ㄖ'),
    ("z", 'ㄗ'),
    ("c", 'ㄘ'),
    ("s", 'ㄙ'),
];

const FINALS: &[(&str, &str)] = &[
    ("a", "ㄚ"),
    ("o", "ㄛ"),
    ("e", "ㄜ"),
    ("ê", "ㄝ"),
    ("ai", "ㄞ"),
    ("ei", "ㄟ"),
    ("ao", "ㄠ"),
    ("ou", "ㄡ"),
    ("an", "ㄢ"),
    ("en", "ㄣ"),
    ("ang", "ㄤ"),
    ("eng", "ㄥ"),
    ("ong", "ㄨㄥ"),
    ("er", "ㄦ"),
    ("i", "ㄧ"),
    ("ia", "ㄧㄚ"),
    ("io", "ㄧㄛ"),
    ("ie", "ㄧㄝ"),
    ("iao", "ㄧㄠ"),
    ("iou", "ㄧㄡ"),
    ("ian", "ㄧㄢ"),
    ("in", "ㄧㄣ"),
    ("iang", "ㄧㄤ"),
    ("ing", "ㄧㄥ"),
    ("iong", "ㄩㄥ"),
    ("u", "ㄨ"),
    ("ua", "ㄨㄚ"),
    ("uo", "ㄨㄛ"),
    ("uai", "ㄨㄞ"),
    ("uei", "ㄨㄟ"),
    ("uan", "ㄨㄢ"),
    ("uen", "ㄨㄣ"),
    ("uang", "ㄨㄤ"),
    ("ueng", "ㄨㄥ"),
    ("ü", "ㄩ"),
    ("üe", "ㄩㄝ"),
    ("üan", "ㄩㄢ"),
    ("ün", "ㄩㄣ"),
];

/// Initials after which a bare `i` is the syllabic vowel and gets no symbol.
const BUZZED_INITIALS: &[&str] = &["zh", "ch", "sh", "r", "z", "c", "s"];

/// Convert a numbered pinyin reading (`shi2`, `lü4`, `de`) to Zhuyin.
///
/// Returns `None` for spellings outside the standard syllable inventory.
pub fn pinyin_to_zhuyin(numbered: &str) -> Option<PhoneticSyllable> {
    let (spelling, tone) = split_tone(numbered);
    let spelling = spelling.to_lowercase().replace("u:", "ü").replace('v', "ü");
    if spelling.is_empty() {
        return None;
    }

    let spelling = expand_glides(&spelling);
    let (initial, rest) = match INITIALS.iter().find(|(latin, _)| spelling.starts_with(latin)) {
        Some((latin, symbol)) => (Some((*latin, *symbol)), &spelling[latin.len()..]),
        None => (None, spelling.as_str()),
    };

    let final_spelling = match initial {
        Some((latin, _)) if rest == "i" && BUZZED_INITIALS.contains(&latin) => String::new(),
        Some(("j" | "q" | "x", _)) if rest.starts_with('u') => format!("ü{}", &rest[1..]),
        Some(_) => match rest {
            "iu" => "iou".to_string(),
            "ui" => "uei".to_string(),
            "un" => "uen".to_string(),
            other => other.to_string(),
        },
        None => rest.to_string(),
    };

    let rhyme = if final_spelling.is_empty() {
        // Only the buzzed `i` may leave the rhyme empty.
        initial.filter(|(latin, _)| BUZZED_INITIALS.contains(latin))?;
        ""
    } else {
        FINALS
            .iter()
            .find(|(latin, _)| *latin == final_spelling)
            .map(|(_, symbol)| *symbol)?
    };

    Some(PhoneticSyllable::from_parts(
        initial.map(|(_, symbol)| symbol),
        rhyme,
        tone,
    ))
}

fn split_tone(numbered: &str) -> (&str, Tone) {
    match numbered.chars().last().and_then(|c| c.to_digit(10)) {
        Some(digit) => (&numbered[..numbered.len() - 1], Tone::from_number(digit as u8)),
        None => (numbered, Tone::Neutral),
    }
}

/// Rewrite `y`/`w` spellings to their medial forms (`you` -> `iou`).
fn expand_glides(spelling: &str) -> String {
    if let Some(rest) = spelling.strip_prefix("yu") {
        format!("ü{}", rest)
    } else if let Some(rest) = spelling.strip_prefix("yi") {
        format!("i{}", rest)
    } else if let Some(rest) = spelling.strip_prefix('y') {
        format!("i{}", rest)
    } else if let Some(rest) = spelling.strip_prefix("wu") {
        format!("u{}", rest)
    } else if let Some(rest) = spelling.strip_prefix('w') {
        match rest {
            "ei" => "uei".to_string(),
            "en" => "uen".to_string(),
            "eng" => "ueng".to_string(),
            other => format!("u{}", other),
        }
    } else {
        spelling.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zhuyin(numbered: &str) -> String {
        pinyin_to_zhuyin(numbered)
            .map(|s| s.as_str().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_retroflex_and_sibilant() {
        assert_eq!(zhuyin("shi2"), "ㄕˊ");
        assert_eq!(zhuyin("si4"), "ㄙˋ");
        assert_eq!(zhuyin("zhi1"), "ㄓ");
        assert_eq!(zhuyin("ri4"), "ㄖˋ");
        assert_eq!(zhuyin("chuang2"), "ㄔㄨㄤˊ");
    }

    #[test]
    fn test_umlaut_spellings() {
        assert_eq!(zhuyin("lü4"), "ㄌㄩˋ");
        assert_eq!(zhuyin("lv4"), "ㄌㄩˋ");
        assert_eq!(zhuyin("nüe4"), "ㄋㄩㄝˋ");
        assert_eq!(zhuyin("jue2"), "ㄐㄩㄝˊ");
        assert_eq!(zhuyin("qu4"), "ㄑㄩˋ");
        assert_eq!(zhuyin("xun2"), "ㄒㄩㄣˊ");
    }

    #[test]
    fn test_glide_spellings() {
        assert_eq!(zhuyin("you3"), "ㄧㄡˇ");
        assert_eq!(zhuyin("yi1"), "ㄧ");
        assert_eq!(zhuyin("yo1"), "ㄧㄛ");
        assert_eq!(zhuyin("ying2"), "ㄧㄥˊ");
        assert_eq!(zhuyin("yong3"), "ㄩㄥˇ");
        assert_eq!(zhuyin("yu2"), "ㄩˊ");
        assert_eq!(zhuyin("yuan2"), "ㄩㄢˊ");
        assert_eq!(zhuyin("wu3"), "ㄨˇ");
        assert_eq!(zhuyin("wei4"), "ㄨㄟˋ");
        assert_eq!(zhuyin("wen2"), "ㄨㄣˊ");
        assert_eq!(zhuyin("wo3"), "ㄨㄛˇ");
    }

    #[test]
    fn test_contracted_finals() {
        assert_eq!(zhuyin("liu2"), "ㄌㄧㄡˊ");
        assert_eq!(zhuyin("gui4"), "ㄍㄨㄟˋ");
        assert_eq!(zhuyin("lun2"), "ㄌㄨㄣˊ");
    }

    #[test]
    fn test_neutral_tone() {
        assert_eq!(zhuyin("de"), "˙ㄉㄜ");
        assert_eq!(zhuyin("ma5"), "˙ㄇㄚ");
    }

    #[test]
    fn test_unknown_spelling() {
        assert!(pinyin_to_zhuyin("hm").is_none());
        assert!(pinyin_to_zhuyin("").is_none());
        assert!(pinyin_to_zhuyin("xyz1").is_none());
    }

    #[test]
    fn test_converter_one_syllable_per_char() {
        let syllables = PinyinZhuyinConverter.syllables("十是A!");
        assert_eq!(syllables.len(), 4);
        assert_eq!(syllables[0].as_str(), "ㄕˊ");
        assert_eq!(syllables[1].as_str(), "ㄕˋ");
        assert_eq!(syllables[2].as_str(), "A");
        assert_eq!(syllables[3].as_str(), "!");
    }

    #[test]
    fn test_converter_empty_text() {
        assert!(PinyinZhuyinConverter.syllables("").is_empty());
    }
}
