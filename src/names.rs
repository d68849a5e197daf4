//! Camel-case identifier synthesis from a word list.
//!
//! Generates names like "RiverStone" (types) or "quietLanternMoss" (members).

use rand::Rng;

/// Java reserved words plus the literals that cannot be identifiers.
pub const JAVA_RESERVED: &[&str] = &[
    "_",
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

/// Upper bound (exclusive) of the numeric suffix appended to invalid names.
const SUFFIX_BOUND: u32 = 42;

/// Whether `s` is a usable Java identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    !JAVA_RESERVED.contains(&s)
}

/// Synthesizes identifiers by concatenating random words.
#[derive(Debug, Clone, Copy)]
pub struct IdentGen<'a> {
    words: &'a [String],
    approximate_length: usize,
}

impl<'a> IdentGen<'a> {
    /// `words` must be non-empty and free of empty entries.
    pub fn new(words: &'a [String], approximate_length: usize) -> Self {
        Self {
            words,
            approximate_length: approximate_length.max(1),
        }
    }

    /// A name such as `RiverStone`, used for classes and thrown types.
    pub fn upper_camel<R: Rng>(&self, rng: &mut R) -> String {
        let target = self.target_length(rng);
        let mut name = String::new();
        self.extend_to(rng, &mut name, target);
        self.finish(rng, name)
    }

    /// A name such as `riverStone`, used for members, parameters and locals.
    pub fn lower_camel<R: Rng>(&self, rng: &mut R) -> String {
        let target = self.target_length(rng);
        let mut name = self.word(rng).to_string();
        self.extend_to(rng, &mut name, target);
        self.finish(rng, name)
    }

    fn target_length<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(1..=self.approximate_length)
    }

    fn word<R: Rng>(&self, rng: &mut R) -> &'a str {
        &self.words[rng.gen_range(0..self.words.len())]
    }

    fn extend_to<R: Rng>(&self, rng: &mut R, name: &mut String, target: usize) {
        while name.len() < target {
            let word = self.word(rng);
            if word.is_empty() {
                break;
            }
            push_capitalized(name, word);
        }
    }

    fn finish<R: Rng>(&self, rng: &mut R, name: String) -> String {
        if is_valid_identifier(&name) {
            return name;
        }
        format!("{name}{}", rng.gen_range(0..SUFFIX_BOUND))
    }
}

fn push_capitalized(buf: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn upper_camel_starts_uppercase() {
        let words = words(&["river", "stone", "moss"]);
        let ident = IdentGen::new(&words, 12);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let name = ident.upper_camel(&mut rng);
            assert!(name.starts_with(char::is_uppercase), "{name}");
            assert!(is_valid_identifier(&name), "{name}");
        }
    }

    #[test]
    fn lower_camel_starts_with_a_plain_word() {
        let words = words(&["river", "stone", "moss"]);
        let ident = IdentGen::new(&words, 12);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let name = ident.lower_camel(&mut rng);
            assert!(name.starts_with(char::is_lowercase), "{name}");
            assert!(is_valid_identifier(&name), "{name}");
        }
    }

    #[test]
    fn names_reach_the_target_length() {
        let words = words(&["ab"]);
        let ident = IdentGen::new(&words, 7);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let name = ident.upper_camel(&mut rng);
            assert!((2..=8).contains(&name.len()), "{name}");
        }
    }

    #[test]
    fn reserved_word_gets_a_suffix() {
        let words = words(&["while"]);
        // Length 1 target: lower camel is exactly the single word.
        let ident = IdentGen::new(&words, 1);
        let mut rng = StdRng::seed_from_u64(5);
        let name = ident.lower_camel(&mut rng);
        assert!(name.starts_with("while"));
        assert!(name.len() > "while".len(), "{name}");
        let suffix: u32 = name["while".len()..].parse().unwrap();
        assert!(suffix < SUFFIX_BOUND);
    }

    #[test]
    fn digit_leading_word_gets_a_suffix() {
        let words = words(&["9lives"]);
        let ident = IdentGen::new(&words, 1);
        let mut rng = StdRng::seed_from_u64(5);
        let name = ident.lower_camel(&mut rng);
        assert!(name.starts_with("9lives"));
        assert!(name.len() > "9lives".len(), "{name}");
    }

    #[test]
    fn identifier_validation() {
        assert!(is_valid_identifier("tree"));
        assert!(is_valid_identifier("_tree$2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2tree"));
        assert!(!is_valid_identifier("tree-house"));
        assert!(!is_valid_identifier("class"));
        assert!(!is_valid_identifier("null"));
        assert!(!is_valid_identifier("_"));
    }

    #[test]
    fn generation_is_deterministic_with_seed() {
        let words = words(&["river", "stone", "moss", "lantern"]);
        let ident = IdentGen::new(&words, 20);
        let mut rng1 = StdRng::seed_from_u64(12345);
        let mut rng2 = StdRng::seed_from_u64(12345);
        let a: Vec<_> = (0..10).map(|_| ident.lower_camel(&mut rng1)).collect();
        let b: Vec<_> = (0..10).map(|_| ident.lower_camel(&mut rng2)).collect();
        assert_eq!(a, b);
    }
}
