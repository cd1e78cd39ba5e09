use crate::core::normalizer;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Longest dictionary entry, in words.
const MAX_PHRASE_WORDS: usize = 3;

static SPANISH_TO_ENGLISH: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Greetings and basics
        ("hola", "hello"),
        ("adios", "goodbye"),
        ("gracias", "thanks"),
        ("por favor", "please"),
        ("si", "yes"),
        ("no", "no"),
        ("buenos dias", "good morning"),
        ("buenas tardes", "good afternoon"),
        ("buenas noches", "good night"),
        ("como estas", "how are you"),
        ("que tal", "how are you"),
        // Common words
        ("agua", "water"),
        ("casa", "house"),
        ("perro", "dog"),
        ("gato", "cat"),
        ("coche", "car"),
        ("libro", "book"),
        ("tiempo", "time"),
        ("dinero", "money"),
        ("trabajo", "work"),
        ("escuela", "school"),
        ("familia", "family"),
        ("amigo", "friend"),
        ("amor", "love"),
        ("vida", "life"),
        ("mundo", "world"),
        ("dia", "day"),
        ("noche", "night"),
        ("manana", "morning"),
        ("tarde", "afternoon"),
        // Numbers
        ("uno", "one"),
        ("dos", "two"),
        ("tres", "three"),
        ("cuatro", "four"),
        ("cinco", "five"),
        // Emotions and adjectives
        ("feliz", "happy"),
        ("triste", "sad"),
        ("enojado", "angry"),
        ("bueno", "good"),
        ("malo", "bad"),
        ("grande", "big"),
        ("pequeno", "small"),
        ("nuevo", "new"),
        ("viejo", "old"),
        // Verbs
        ("ser", "to be"),
        ("estar", "to be"),
        ("tener", "to have"),
        ("hacer", "to do"),
        ("ir", "to go"),
        ("venir", "to come"),
        ("ver", "to see"),
        ("decir", "to say"),
        ("querer", "to want"),
        ("poder", "to be able"),
        ("saber", "to know"),
        // Common phrases
        ("me gusta", "I like"),
        ("no me gusta", "I don't like"),
        ("tengo hambre", "I'm hungry"),
        ("tengo sed", "I'm thirsty"),
        ("estoy bien", "I'm fine"),
        ("no entiendo", "I don't understand"),
        ("habla despacio", "speak slowly"),
        ("cuanto cuesta", "how much does it cost"),
        // Articles and connectors
        ("el", "the"),
        ("la", "the"),
        ("los", "the"),
        ("las", "the"),
        ("un", "a"),
        ("una", "a"),
        ("y", "and"),
        ("o", "or"),
        ("pero", "but"),
        ("con", "with"),
        ("sin", "without"),
        ("para", "for"),
        ("por", "by"),
        ("de", "of"),
        ("en", "in"),
        ("a", "to"),
    ])
});

/// Translate a Spanish sentence word by word, with greedy longest-phrase
/// matching and per-token case preservation. Unknown words pass through
/// unchanged.
pub fn translate(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let mut matched = false;

        let max_window = MAX_PHRASE_WORDS.min(tokens.len() - i);
        for window in (1..=max_window).rev() {
            // Phrases never carry punctuation, so only allow it on the final
            // token of the window.
            if window > 1
                && tokens[i..i + window - 1]
                    .iter()
                    .any(|t| !trailing_punct(t).is_empty())
            {
                continue;
            }

            let cores: Vec<String> = tokens[i..i + window]
                .iter()
                .map(|t| normalizer::normalize(strip_punct(t)))
                .collect();
            let key = cores.join(" ");

            if let Some(translation) = SPANISH_TO_ENGLISH.get(key.as_str()) {
                let cased = apply_case(strip_punct(tokens[i]), translation);
                let punct = trailing_punct(tokens[i + window - 1]);
                out.push(format!("{}{}", cased, punct));
                i += window;
                matched = true;
                break;
            }
        }

        if !matched {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }

    out.join(" ")
}

pub fn contains(word: &str) -> bool {
    SPANISH_TO_ENGLISH.contains_key(normalizer::normalize(word).as_str())
}

fn strip_punct(token: &str) -> &str {
    token.trim_end_matches(['!', '?', '.', ',', ';', ':'])
}

fn trailing_punct(token: &str) -> &str {
    &token[strip_punct(token).len()..]
}

/// Mirror the source token's casing onto the translation: ALL CAPS stays
/// all caps, a leading capital stays a leading capital.
fn apply_case(source: &str, translation: &str) -> String {
    let has_alpha = source.chars().any(|c| c.is_alphabetic());
    if has_alpha && source.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase()) {
        translation.to_uppercase()
    } else if source.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = translation.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    } else {
        translation.to_string()
    }
}
