//! Supported languages for MMS text-to-speech.
//!
//! Each entry pairs a human-readable language name with the ISO-639-3 code
//! used by the `facebook/mms-tts-*` model family. The table is a compile-time
//! constant: it is resolved once per invocation and never mutated.

/// Metadata for a supported TTS language.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    /// Human-readable name, as shown in `--list-languages`.
    pub name: &'static str,
    /// ISO-639-3 code selecting the MMS model (e.g. "eng").
    pub code: &'static str,
}

/// All supported languages as a compile-time constant slice
/// (sorted by name for binary search). Add more rows of the same shape to
/// support additional MMS languages.
const LANGUAGES: &[Language] = &[
    Language { name: "English", code: "eng" },
    Language { name: "French", code: "fra" },
    Language { name: "German", code: "deu" },
    Language { name: "Hindi", code: "hin" },
    Language { name: "Malayalam", code: "mal" },
    Language { name: "Spanish", code: "spa" },
    Language { name: "Tamil", code: "tam" },
];

/// Look up a language by its human-readable name using binary search O(log n).
pub fn get_by_name(name: &str) -> Option<&'static Language> {
    LANGUAGES.binary_search_by_key(&name, |l| l.name).ok().map(|idx| &LANGUAGES[idx])
}

/// Look up a language by its ISO-639-3 code.
pub fn get_by_code(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Resolve a user-supplied selector: a language name ("English") or a
/// bare ISO-639-3 code ("eng"). Names match case-insensitively.
pub fn resolve(selector: &str) -> Option<&'static Language> {
    get_by_name(selector)
        .or_else(|| get_by_code(selector))
        .or_else(|| LANGUAGES.iter().find(|l| l.name.eq_ignore_ascii_case(selector)))
}

/// Print all supported languages.
pub fn print_languages() {
    println!("═══════════════════════════════════════════════");
    println!("  MMS Audiobook Generator - {} Languages", LANGUAGES.len());
    println!("═══════════════════════════════════════════════");
    println!();
    println!("{:<15} CODE", "LANGUAGE");
    println!("{}", "─".repeat(30));

    for lang in LANGUAGES {
        println!("{:<15} {}", lang.name, lang.code);
    }

    println!();
    println!("Default: English (eng)");
    println!();
    println!("Usage:");
    println!("  ./mms-audiobook --language Tamil --text-file book.txt");
    println!("  ./mms-audiobook --language hin --text \"...\" --download");
    println!();
}

/// Print detailed information about a specific language.
pub fn print_language_info(selector: &str) -> anyhow::Result<()> {
    let lang = resolve(selector)
        .ok_or_else(|| anyhow::anyhow!("Language '{}' not found. Run with --list-languages to see supported languages", selector))?;

    println!();
    println!("Language: {}", lang.name);
    println!("{}", "─".repeat(40));
    println!("Code:     {}", lang.code);
    println!("Model:    vits-mms-{}", lang.code);
    println!();
    println!("Usage:");
    println!("  ./mms-audiobook --language {} --text-file book.txt", lang.code);
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let lang = get_by_name("Tamil").expect("Tamil is supported");
        assert_eq!(lang.code, "tam");
    }

    #[test]
    fn lookup_by_code() {
        let lang = get_by_code("deu").expect("German is supported");
        assert_eq!(lang.name, "German");
    }

    #[test]
    fn resolve_accepts_name_code_and_case() {
        assert_eq!(resolve("English").map(|l| l.code), Some("eng"));
        assert_eq!(resolve("eng").map(|l| l.code), Some("eng"));
        assert_eq!(resolve("english").map(|l| l.code), Some("eng"));
    }

    #[test]
    fn unknown_language_resolves_to_none() {
        assert!(resolve("Klingon").is_none());
        assert!(get_by_code("xxx").is_none());
    }

    #[test]
    fn table_is_sorted_by_name() {
        // Binary search in get_by_name depends on this.
        for pair in LANGUAGES.windows(2) {
            assert!(pair[0].name < pair[1].name, "{} must sort before {}", pair[0].name, pair[1].name);
        }
    }
}
