/// Characters commonly swapped for one another by learners, each with the
/// character it tends to be misheard as.
const CONFUSABLE_CHARACTERS: &[(char, char)] = &[
    ('十', '四'),
    ('四', '十'),
    ('是', '似'),
    ('知', '資'),
    ('資', '知'),
    ('吃', '疵'),
    ('山', '三'),
    ('三', '山'),
    ('書', '蘇'),
    ('真', '針'),
    ('新', '星'),
    ('金', '京'),
    ('門', '蒙'),
    ('飯', '放'),
    ('你', '裡'),
    ('南', '藍'),
    ('男', '蘭'),
    ('年', '連'),
    ('牛', '流'),
    ('女', '旅'),
    ('老', '腦'),
    ('冷', '能'),
];

const FISH_TWISTERS: &[&str] = &["紅鯉魚與綠鯉魚與驢", "粉紅鳳凰飛"];
const LION_TWISTERS: &[&str] = &["八百標兵奔北坡", "四是四，十是十"];

/// Asked when the text is too short to vary.
pub const ASK_AGAIN: &str = "請再說一次";

fn confusable(ch: char) -> Option<char> {
    CONFUSABLE_CHARACTERS
        .iter()
        .find(|(source, _)| *source == ch)
        .map(|(_, substitute)| *substitute)
}

/// Produce a few phrases that might have been meant instead of `text`.
///
/// This is a lookup table plus a couple of keyword easter eggs, not a
/// similarity model.
pub fn suggest(text: &str) -> Vec<String> {
    if text.contains('魚') {
        return FISH_TWISTERS.iter().map(|s| s.to_string()).collect();
    }
    if text.contains('獅') || text.contains('師') {
        return LION_TWISTERS.iter().map(|s| s.to_string()).collect();
    }

    let mut suggestions = vec![format!("{}嗎？", text)];

    let substituted: String = text.chars().map(|c| confusable(c).unwrap_or(c)).collect();
    if substituted != text {
        suggestions.push(substituted);
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() > 2 {
        let mut softened: String = chars[..chars.len() - 1].iter().collect();
        softened.push('吧');
        suggestions.push(softened);
    } else {
        suggestions.push(ASK_AGAIN.to_string());
    }

    suggestions
}
