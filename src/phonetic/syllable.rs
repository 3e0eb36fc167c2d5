use std::fmt;

/// Neutral tone mark, written in front of the syllable.
pub const NEUTRAL_MARK: char = '˙';

/// Consonant initials, ㄅ through ㄙ.
const INITIALS: &[char] = &[
    'ㄅ', 'ㄆ', 'ㄇ', 'ㄈ', 'ㄉ', 'ㄊ', 'ㄋ', 'ㄌ', 'ㄍ', 'ㄎ', 'ㄏ', 'ㄐ', 'ㄑ', 'ㄒ', 'ㄓ', 'ㄔ',
    'ㄕ', 'ㄖ', 'ㄗ', 'ㄘ', 'ㄙ',
];

/// Rhyme symbols that close a syllable with a nasal.
const NASAL_CODAS: &[char] = &['ㄢ', 'ㄣ', 'ㄤ', 'ㄥ'];

/// Mandarin tone as written in Zhuyin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    First,
    Second,
    Third,
    Fourth,
    Neutral,
}

impl Tone {
    /// Map a pinyin tone number. Anything outside 1-4 is the neutral tone.
    pub fn from_number(number: u8) -> Self {
        match number {
            1 => Tone::First,
            2 => Tone::Second,
            3 => Tone::Third,
            4 => Tone::Fourth,
            _ => Tone::Neutral,
        }
    }

    /// Read the tone off a Zhuyin symbol. No mark means first tone.
    pub fn from_symbol(symbol: &str) -> Self {
        if symbol.starts_with(NEUTRAL_MARK) || symbol.ends_with(NEUTRAL_MARK) {
            return Tone::Neutral;
        }
        match symbol.chars().last() {
            Some('ˊ') => Tone::Second,
            Some('ˇ') => Tone::Third,
            Some('ˋ') => Tone::Fourth,
            _ => Tone::First,
        }
    }

    pub fn mark(self) -> Option<char> {
        match self {
            Tone::First => None,
            Tone::Second => Some('ˊ'),
            Tone::Third => Some('ˇ'),
            Tone::Fourth => Some('ˋ'),
            Tone::Neutral => Some(NEUTRAL_MARK),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tone::First => "一聲",
            Tone::Second => "二聲",
            Tone::Third => "三聲",
            Tone::Fourth => "四聲",
            Tone::Neutral => "輕聲",
        }
    }

    /// How to voice the tone.
    pub fn cue(self) -> &'static str {
        match self {
            Tone::First => "音高保持高而平，不要上揚或下降",
            Tone::Second => "從中音往上揚，像在問問題",
            Tone::Third => "先往下壓再稍微拉起，整體偏低",
            Tone::Fourth => "從高處快速往下降，短而有力",
            Tone::Neutral => "唸得短而輕，不必刻意出力",
        }
    }
}

/// Zhuyin reading of a single character.
///
/// The symbol is kept as written (e.g. `ㄕˊ`, `˙ㄉㄜ`); the facet accessors
/// split it into initial, nucleus, nasal coda and tone. Characters without a
/// Mandarin reading carry the character itself and have no facets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneticSyllable {
    symbol: String,
}

impl PhoneticSyllable {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    /// Assemble a syllable from an initial, the rhyme symbols and a tone.
    pub fn from_parts(initial: Option<char>, rhyme: &str, tone: Tone) -> Self {
        let mut symbol = String::with_capacity(rhyme.len() + 8);
        if tone == Tone::Neutral {
            symbol.push(NEUTRAL_MARK);
        }
        if let Some(initial) = initial {
            symbol.push(initial);
        }
        symbol.push_str(rhyme);
        if tone != Tone::Neutral {
            symbol.extend(tone.mark());
        }
        Self { symbol }
    }

    pub fn as_str(&self) -> &str {
        &self.symbol
    }

    pub fn tone(&self) -> Tone {
        Tone::from_symbol(&self.symbol)
    }

    pub fn initial(&self) -> Option<char> {
        self.body().chars().next().filter(|c| INITIALS.contains(c))
    }

    /// Medial and vowel symbols, without the initial or a nasal coda.
    pub fn nucleus(&self) -> Vec<char> {
        let mut rhyme: Vec<char> = self.rhyme().collect();
        if rhyme.last().is_some_and(|c| NASAL_CODAS.contains(c)) {
            rhyme.pop();
        }
        rhyme
    }

    pub fn coda(&self) -> Option<char> {
        self.rhyme().last().filter(|c| NASAL_CODAS.contains(c))
    }

    /// Symbol with tone marks stripped.
    fn body(&self) -> &str {
        self.symbol
            .trim_start_matches(NEUTRAL_MARK)
            .trim_end_matches(['ˊ', 'ˇ', 'ˋ', NEUTRAL_MARK])
    }

    fn rhyme(&self) -> impl Iterator<Item = char> + '_ {
        let skip = usize::from(self.initial().is_some());
        self.body()
            .chars()
            .skip(skip)
            .filter(|c| is_zhuyin(*c) && !INITIALS.contains(c))
    }
}

impl fmt::Display for PhoneticSyllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_zhuyin(c: char) -> bool {
    ('\u{3105}'..='\u{312F}').contains(&c)
}
