//! Text normalization for symptom extraction.
//!
//! Lowercases, strips punctuation, drops French stopwords and reduces each
//! remaining token to a base form with a small rule-based lemmatizer
//! (irregular table, invariable words, `-aux` → `-al`, plural `s`/`x`).

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is not a word character, whitespace or a French accented letter.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\sàâäéèêëîïôöùûüç]").expect("valid regex"));

/// French function words carrying no symptom information.
const STOPWORDS: &[&str] = &[
    "ai", "aie", "as", "au", "aux", "avec", "avoir", "avons", "avez", "ayant",
    "beaucoup", "bien", "ça", "car", "ce", "ceci", "cela", "ces", "cet", "cette",
    "chez", "comme", "dans", "de", "depuis", "des", "donc", "dont", "du", "elle",
    "elles", "en", "encore", "est", "et", "étais", "était", "été", "être", "eu",
    "fait", "fais", "ici", "il", "ils", "je", "la", "le", "les", "leur", "leurs",
    "lui", "ma", "mais", "me", "même", "mes", "moi", "mon", "ne", "ni", "nos",
    "notre", "nous", "on", "ont", "ou", "où", "par", "pas", "peu", "plus",
    "pour", "quand", "que", "quel", "quelle", "qui", "sa", "sans", "se", "ses",
    "si", "son", "sont", "suis", "sur", "ta", "te", "tes", "toi", "ton", "tous",
    "tout", "toute", "toutes", "très", "trop", "tu", "un", "une", "vers", "vos",
    "votre", "vous", "hui", "aujourd", "hier", "aussi", "alors", "avait",
    "avais", "sommes", "êtes", "sens", "sent", "sentir",
];

/// Inflected forms whose base form is not reachable by the suffix rules.
const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("maux", "mal"),
    ("coule", "couler"),
    ("coulent", "couler"),
    ("coulait", "couler"),
    ("pique", "piquer"),
    ("piquent", "piquer"),
    ("piquait", "piquer"),
    ("tousse", "tousser"),
    ("toussent", "tousser"),
    ("vomis", "vomir"),
    ("vomit", "vomir"),
    ("vomi", "vomir"),
    ("saigne", "saigner"),
    ("saignent", "saigner"),
    ("brûle", "brûler"),
    ("brûlent", "brûler"),
    ("gratte", "gratter"),
    ("grattent", "gratter"),
    ("respire", "respirer"),
    ("respirent", "respirer"),
    ("yeux", "yeux"),
];

/// Words ending in `s` or `x` that are not plurals.
const INVARIABLE: &[&str] = &[
    "toux", "nez", "voix", "dos", "corps", "poids", "bras", "pouls", "sinus",
    "virus", "pus", "abcès", "herpès", "fois", "mois", "temps", "anus", "yeux",
    "gros", "épais", "repos", "os", "reflux", "prix",
];

/// Lowercase the text and replace punctuation with spaces.
pub fn clean_text(text: &str) -> String {
    PUNCTUATION.replace_all(&text.to_lowercase(), " ").into_owned()
}

/// Content lemmas of `text`: stopwords, non-alphabetic tokens and
/// single-character tokens removed, each survivor lemmatized.
pub fn content_lemmas(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .filter(|token| is_content_token(token))
        .map(lemmatize)
        .collect()
}

fn is_content_token(token: &str) -> bool {
    token.chars().count() > 1
        && token.chars().all(char::is_alphabetic)
        && !STOPWORDS.contains(&token)
}

/// Reduce a lowercase token to its base form.
pub fn lemmatize(token: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR_LEMMAS.iter().find(|(form, _)| *form == token) {
        return (*lemma).to_string();
    }
    if INVARIABLE.contains(&token) {
        return token.to_string();
    }

    let len = token.chars().count();
    if len > 4 {
        if let Some(stem) = token.strip_suffix("aux") {
            return format!("{stem}al");
        }
    }
    if len > 3 {
        if let Some(stem) = token.strip_suffix('s').or_else(|| token.strip_suffix('x')) {
            return stem.to_string();
        }
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_punctuation_keeps_accents() {
        assert_eq!(clean_text("J'ai de la Fièvre!"), "j ai de la fièvre ");
        assert_eq!(clean_text("oreille, gorge; tête."), "oreille  gorge  tête ");
    }

    #[test]
    fn content_lemmas_drop_stopwords_and_digits() {
        let lemmas = content_lemmas("j'ai mal à la gorge et de la fièvre depuis 3 jours");
        assert_eq!(lemmas, vec!["mal", "gorge", "fièvre", "jour"]);
    }

    #[test]
    fn content_lemmas_on_blank_input() {
        assert!(content_lemmas("").is_empty());
        assert!(content_lemmas("   \n\t").is_empty());
        assert!(content_lemmas("?!...").is_empty());
    }

    #[test]
    fn plural_forms_reduced() {
        assert_eq!(lemmatize("nausées"), "nausée");
        assert_eq!(lemmatize("frissons"), "frisson");
        assert_eq!(lemmatize("courbatures"), "courbature");
        assert_eq!(lemmatize("ganglions"), "ganglion");
    }

    #[test]
    fn aux_plural_becomes_al() {
        assert_eq!(lemmatize("abdominaux"), "abdominal");
        assert_eq!(lemmatize("maux"), "mal");
    }

    #[test]
    fn invariable_words_untouched() {
        assert_eq!(lemmatize("toux"), "toux");
        assert_eq!(lemmatize("nez"), "nez");
        assert_eq!(lemmatize("voix"), "voix");
        assert_eq!(lemmatize("sinus"), "sinus");
    }

    #[test]
    fn verb_forms_reach_infinitive() {
        assert_eq!(lemmatize("coule"), "couler");
        assert_eq!(lemmatize("piquent"), "piquer");
    }

    #[test]
    fn short_words_untouched() {
        assert_eq!(lemmatize("mal"), "mal");
        assert_eq!(lemmatize("os"), "os");
    }
}
