//! Language tags for fenced code blocks

use std::collections::HashMap;
use thiserror::Error;

/// Tag used when a path has no known extension
pub const FALLBACK_LANGUAGE: &str = "text";

/// Built-in extension to language table
pub const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    // Systems
    ("rs", "rust"),
    ("c", "c"),
    ("h", "c"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("hh", "cpp"),
    ("go", "go"),
    ("zig", "zig"),
    ("swift", "swift"),
    ("m", "objective-c"),
    // JVM / .NET
    ("java", "java"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("scala", "scala"),
    ("groovy", "groovy"),
    ("gradle", "groovy"),
    ("cs", "csharp"),
    ("fs", "fsharp"),
    // Scripting
    ("py", "python"),
    ("pyi", "python"),
    ("rb", "ruby"),
    ("php", "php"),
    ("pl", "perl"),
    ("lua", "lua"),
    ("r", "r"),
    ("jl", "julia"),
    ("ex", "elixir"),
    ("exs", "elixir"),
    ("erl", "erlang"),
    ("hs", "haskell"),
    ("ml", "ocaml"),
    ("clj", "clojure"),
    ("dart", "dart"),
    // Web
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("jsx", "jsx"),
    ("ts", "typescript"),
    ("mts", "typescript"),
    ("tsx", "tsx"),
    ("vue", "vue"),
    ("svelte", "svelte"),
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("sass", "sass"),
    ("less", "less"),
    // Shell
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "bash"),
    ("fish", "fish"),
    ("ps1", "powershell"),
    ("bat", "batch"),
    ("cmd", "batch"),
    // Data / config
    ("json", "json"),
    ("jsonc", "jsonc"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("ini", "ini"),
    ("cfg", "ini"),
    ("xml", "xml"),
    ("csv", "csv"),
    ("sql", "sql"),
    ("graphql", "graphql"),
    ("proto", "protobuf"),
    ("tf", "hcl"),
    ("dockerfile", "dockerfile"),
    ("mk", "makefile"),
    ("cmake", "cmake"),
    ("nix", "nix"),
    // Markup
    ("md", "markdown"),
    ("markdown", "markdown"),
    ("rst", "rst"),
    ("tex", "latex"),
    ("txt", "text"),
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LanguageError {
    #[error("Language mapping has an empty extension")]
    EmptyExtension,
    #[error("Language mapping for '.{0}' has an empty tag")]
    EmptyTag(String),
}

/// Maps file extensions to highlighting identifiers.
///
/// Lookups never fail: anything unmapped classifies as [`FALLBACK_LANGUAGE`],
/// and [`LanguageMap::insert`] refuses empty tags, so every generated code
/// fence carries a non-empty language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMap {
    by_extension: HashMap<String, String>,
}

impl Default for LanguageMap {
    fn default() -> Self {
        Self {
            by_extension: DEFAULT_LANGUAGES
                .iter()
                .map(|(ext, tag)| (ext.to_string(), tag.to_string()))
                .collect(),
        }
    }
}

impl LanguageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with no entries; every path classifies as `text`
    pub fn empty() -> Self {
        Self {
            by_extension: HashMap::new(),
        }
    }

    /// Add or override a mapping. A leading dot on the extension is ignored.
    pub fn insert(
        &mut self,
        extension: impl AsRef<str>,
        tag: impl Into<String>,
    ) -> Result<(), LanguageError> {
        let extension = extension.as_ref().trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err(LanguageError::EmptyExtension);
        }
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(LanguageError::EmptyTag(extension.to_string()));
        }
        self.by_extension
            .insert(extension.to_lowercase(), tag.trim().to_string());
        Ok(())
    }

    /// Builder-style variant of [`LanguageMap::insert`]
    pub fn with_language(
        mut self,
        extension: impl AsRef<str>,
        tag: impl Into<String>,
    ) -> Result<Self, LanguageError> {
        self.insert(extension, tag)?;
        Ok(self)
    }

    /// Merge a batch of mappings, later entries winning
    pub fn extend<I, K, V>(&mut self, entries: I) -> Result<(), LanguageError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (extension, tag) in entries {
            self.insert(extension, tag)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }

    /// Highlighting identifier for `path`
    pub fn classify(&self, path: &str) -> &str {
        extension_of(path)
            .and_then(|ext| self.by_extension.get(&ext))
            .map(String::as_str)
            .unwrap_or(FALLBACK_LANGUAGE)
    }
}

/// Classify `path` with the built-in table
pub fn language_for(path: &str) -> String {
    LanguageMap::default().classify(path).to_string()
}

/// Lowercased text after the last `.` of the final path component
fn extension_of(path: &str) -> Option<String> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
