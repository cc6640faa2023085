//! Built-in extension table.

use once_cell::sync::Lazy;

use super::language::Language;

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Built-in language configurations, lazily initialized.
static BUILTIN_LANGUAGES: Lazy<Vec<Language>> = Lazy::new(|| {
    vec![
        Language::new("python").with_identifiers(ids(&["py", "pyi", "pyw", "python3"])),
        Language::new("rust").with_identifiers(ids(&["rs"])),
        Language::new("javascript").with_identifiers(ids(&["js", "mjs", "cjs"])),
        Language::new("jsx"),
        Language::new("typescript").with_identifiers(ids(&["ts", "mts", "cts"])),
        Language::new("tsx"),
        Language::new("go"),
        Language::new("java"),
        Language::new("kotlin").with_identifiers(ids(&["kt", "kts"])),
        Language::new("scala").with_identifiers(ids(&["sc"])),
        Language::new("swift"),
        Language::new("c").with_identifiers(ids(&["h"])),
        Language::new("cpp").with_identifiers(ids(&["cc", "cxx", "hpp", "hh", "c++"])),
        Language::new("csharp").with_identifiers(ids(&["cs"])),
        Language::new("ruby").with_identifiers(ids(&["rb"])),
        Language::new("php"),
        Language::new("bash").with_identifiers(ids(&["sh", "zsh", "shell"])),
        Language::new("powershell").with_identifiers(ids(&["ps1"])),
        Language::new("r"),
        Language::new("julia").with_identifiers(ids(&["jl"])),
        Language::new("haskell").with_identifiers(ids(&["hs"])),
        Language::new("ocaml").with_identifiers(ids(&["ml", "mli"])),
        Language::new("lua"),
        Language::new("sql"),
        Language::new("yaml").with_identifiers(ids(&["yml"])),
        Language::new("toml"),
        Language::new("json"),
        Language::new("markup").with_identifiers(ids(&["html", "htm", "xml", "svg"])),
        Language::new("css"),
        Language::new("scss").with_identifiers(ids(&["sass"])),
        Language::new("markdown").with_identifiers(ids(&["md", "mdx"])),
        Language::new("docker").with_identifiers(ids(&["dockerfile"])),
    ]
});

/// Returns the list of built-in language configurations.
pub fn builtin_languages() -> &'static [Language] {
    &BUILTIN_LANGUAGES
}

/// Find a language by name or identifier.
pub fn find_language(identifier: &str) -> Option<Language> {
    builtin_languages()
        .iter()
        .find(|lang| lang.matches(identifier))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_python() {
        assert_eq!(find_language("python").unwrap().name, "python");
        assert_eq!(find_language("py").unwrap().name, "python");
        assert_eq!(find_language("pyi").unwrap().name, "python");
    }

    #[test]
    fn test_find_by_extension() {
        assert_eq!(find_language("rs").unwrap().name, "rust");
        assert_eq!(find_language("ts").unwrap().name, "typescript");
        assert_eq!(find_language("sh").unwrap().name, "bash");
        assert_eq!(find_language("html").unwrap().name, "markup");
    }

    #[test]
    fn test_find_unknown() {
        assert!(find_language("unknown_language").is_none());
    }

    #[test]
    fn test_builtin_names_unique() {
        let langs = builtin_languages();
        let mut names: Vec<&str> = langs.iter().map(|l| l.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), langs.len());
    }
}
