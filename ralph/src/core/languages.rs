//! Fixed table of supported project languages and their default commands.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bun,
    Node,
    Python,
    Go,
    Rust,
    /// Custom commands supplied at init time.
    None,
}

/// Static defaults for one [`Language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub language: Language,
    pub name: &'static str,
    pub description: &'static str,
    pub technologies: &'static [&'static str],
    pub check_command: &'static str,
    pub test_command: &'static str,
}

pub const LANGUAGES: [LanguageProfile; 6] = [
    LanguageProfile {
        language: Language::Bun,
        name: "Bun (TypeScript)",
        description: "Bun runtime with TypeScript",
        technologies: &["Bun", "TypeScript"],
        check_command: "bun check",
        test_command: "bun test",
    },
    LanguageProfile {
        language: Language::Node,
        name: "Node.js (TypeScript)",
        description: "Node.js with TypeScript",
        technologies: &["Node.js", "TypeScript", "npm"],
        check_command: "npm run typecheck",
        test_command: "npm test",
    },
    LanguageProfile {
        language: Language::Python,
        name: "Python",
        description: "Python with mypy type checking",
        technologies: &["Python", "mypy", "pytest"],
        check_command: "mypy .",
        test_command: "pytest",
    },
    LanguageProfile {
        language: Language::Go,
        name: "Go",
        description: "Go language",
        technologies: &["Go"],
        check_command: "go build ./...",
        test_command: "go test ./...",
    },
    LanguageProfile {
        language: Language::Rust,
        name: "Rust",
        description: "Rust with Cargo",
        technologies: &["Rust", "Cargo"],
        check_command: "cargo check",
        test_command: "cargo test",
    },
    LanguageProfile {
        language: Language::None,
        name: "None (custom)",
        description: "Custom configuration",
        technologies: &[],
        check_command: "echo 'no check configured'",
        test_command: "echo 'no tests configured'",
    },
];

impl Language {
    pub fn profile(self) -> &'static LanguageProfile {
        LANGUAGES
            .iter()
            .find(|p| p.language == self)
            .unwrap_or(&LANGUAGES[LANGUAGES.len() - 1])
    }
}

impl LanguageProfile {
    /// Label shown in the interactive language picker.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_profile() {
        for lang in Language::value_variants() {
            assert_eq!(lang.profile().language, *lang);
        }
    }

    #[test]
    fn rust_profile_uses_cargo() {
        let rust = Language::Rust.profile();
        assert_eq!(rust.check_command, "cargo check");
        assert_eq!(rust.test_command, "cargo test");
    }
}
