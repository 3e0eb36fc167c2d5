use super::syllable::PhoneticSyllable;
use super::zhuyin::PhoneticConverter;

/// Reply when no position differs.
pub const SIMILAR_PRONUNCIATION: &str = "兩者的發音非常相似，請多加練習說話的節奏與語調。";

/// Part of a syllable a check looks at.
#[derive(Debug, Clone, Copy)]
enum Facet {
    Initial,
    Nucleus,
    Coda,
}

impl Facet {
    fn has(self, syllable: &PhoneticSyllable, symbol: char) -> bool {
        match self {
            Facet::Initial => syllable.initial() == Some(symbol),
            Facet::Nucleus => syllable.nucleus().contains(&symbol),
            Facet::Coda => syllable.coda() == Some(symbol),
        }
    }
}

#[derive(Debug)]
enum Pattern {
    /// Expected symbol was replaced by one of `heard_as`.
    Confused {
        facet: Facet,
        expected: char,
        heard_as: &'static [char],
    },
    /// Expected symbol is absent from the heard syllable.
    Missing { facet: Facet, expected: char },
}

#[derive(Debug)]
struct FeatureCheck {
    pattern: Pattern,
    tip: &'static str,
}

impl FeatureCheck {
    fn fires(&self, heard: &PhoneticSyllable, correct: &PhoneticSyllable) -> bool {
        match self.pattern {
            Pattern::Confused {
                facet,
                expected,
                heard_as,
            } => facet.has(correct, expected) && heard_as.iter().any(|s| facet.has(heard, *s)),
            Pattern::Missing { facet, expected } => {
                facet.has(correct, expected) && !facet.has(heard, expected)
            }
        }
    }
}

/// Evaluated top to bottom for every differing syllable.
const FEATURE_CHECKS: &[FeatureCheck] = &[
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Initial,
            expected: 'ㄓ',
            heard_as: &['ㄗ', 'ㄐ'],
        },
        tip: " -> 注意捲舌音 (ㄓ) 的發音：舌尖往上捲，抵住硬顎前端再發音。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Initial,
            expected: 'ㄔ',
            heard_as: &['ㄘ', 'ㄑ'],
        },
        tip: " -> 注意捲舌音 (ㄔ) 的發音：舌尖上捲抵住硬顎，放開時送出明顯的氣流。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Initial,
            expected: 'ㄕ',
            heard_as: &['ㄙ', 'ㄒ'],
        },
        tip: " -> 注意捲舌音 (ㄕ) 的發音：舌尖上捲靠近硬顎，讓氣流從縫隙摩擦而出。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Coda,
            expected: 'ㄣ',
            heard_as: &['ㄥ'],
        },
        tip: " -> 注意前鼻音 (ㄣ)：收尾時舌尖抵住上齒齦，不要唸成後鼻音 ㄥ。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Coda,
            expected: 'ㄥ',
            heard_as: &['ㄣ'],
        },
        tip: " -> 注意後鼻音 (ㄥ)：收尾時舌根抬起貼住軟顎，不要唸成前鼻音 ㄣ。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Coda,
            expected: 'ㄢ',
            heard_as: &['ㄤ'],
        },
        tip: " -> 注意 ㄢ 的收尾：舌尖要抵住上齒齦，不要唸成 ㄤ。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Coda,
            expected: 'ㄤ',
            heard_as: &['ㄢ'],
        },
        tip: " -> 注意 ㄤ 的收尾：嘴巴張大、舌根往後抬，不要唸成 ㄢ。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Initial,
            expected: 'ㄋ',
            heard_as: &['ㄌ'],
        },
        tip: " -> 注意鼻音 (ㄋ) 與邊音 (ㄌ) 的區別：發 ㄋ 時氣流要從鼻腔出來。",
    },
    FeatureCheck {
        pattern: Pattern::Confused {
            facet: Facet::Initial,
            expected: 'ㄌ',
            heard_as: &['ㄋ'],
        },
        tip: " -> 注意邊音 (ㄌ) 與鼻音 (ㄋ) 的區別：發 ㄌ 時氣流從舌頭兩側出來，不要走鼻腔。",
    },
    FeatureCheck {
        pattern: Pattern::Missing {
            facet: Facet::Nucleus,
            expected: 'ㄨ',
        },
        tip: " -> 注意圓唇音 (ㄨ)：嘴唇要收圓並稍微往前突出。",
    },
    FeatureCheck {
        pattern: Pattern::Missing {
            facet: Facet::Nucleus,
            expected: 'ㄩ',
        },
        tip: " -> 注意圓唇音 (ㄩ)：舌頭位置像 ㄧ，但嘴唇要撮圓。",
    },
];

/// Ordered coaching lines for one comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advice {
    lines: Vec<String>,
}

impl Advice {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with newlines, in emission order.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Compare what was heard against what should have been said, using the
/// default Zhuyin converter.
#[cfg(test)]
pub fn advise(heard: &str, correct: &str) -> Advice {
    advise_with(&super::zhuyin::PinyinZhuyinConverter, heard, correct)
}

pub fn advise_with(converter: &dyn PhoneticConverter, heard: &str, correct: &str) -> Advice {
    let mut advice = Advice::default();

    let heard_len = heard.chars().count();
    let correct_len = correct.chars().count();
    if heard_len != correct_len {
        push_length_notice(&mut advice, heard_len, correct_len);
    }

    let heard_syllables = converter.syllables(heard);
    let correct_syllables = converter.syllables(correct);

    let mut discrepancies = 0;
    for (index, (heard, correct)) in heard_syllables
        .iter()
        .zip(correct_syllables.iter())
        .enumerate()
    {
        if heard == correct {
            continue;
        }
        discrepancies += 1;
        advice.push(format!(
            "第 {} 個字：你唸成了 '{}'，但應該是 '{}'。",
            index + 1,
            heard,
            correct
        ));
        push_feature_tips(&mut advice, heard, correct);
    }

    if discrepancies == 0 {
        advice.push(SIMILAR_PRONUNCIATION);
    }

    advice
}

fn push_length_notice(advice: &mut Advice, heard_len: usize, correct_len: usize) {
    advice.push(format!(
        "字數不同：你說了 {} 個字，正確的句子是 {} 個字。",
        heard_len, correct_len
    ));
    if heard_len > correct_len {
        advice.push(format!(
            " -> 多了 {} 個字，可能是把字音拉長，或是雜音被辨識成多餘的字。",
            heard_len - correct_len
        ));
    } else {
        advice.push(format!(
            " -> 少了 {} 個字，可能是說得太快或含糊帶過，有字被吞掉了。",
            correct_len - heard_len
        ));
    }
    advice.push(" -> 建議放慢速度，一個字一個字清楚地唸。");
}

fn push_feature_tips(advice: &mut Advice, heard: &PhoneticSyllable, correct: &PhoneticSyllable) {
    let expected_tone = correct.tone();
    if heard.tone() != expected_tone {
        advice.push(format!(
            " -> 聲調不對：這個字是{}，{}。",
            expected_tone.name(),
            expected_tone.cue()
        ));
    }

    for check in FEATURE_CHECKS {
        if check.fires(heard, correct) {
            advice.push(check.tip);
        }
    }
}
