//! Voice and target-preset catalogs.
//!
//! The Gemini voice table is fixed by the provider and baked in; target
//! presets for voice conversion come from scanning a reference-audio
//! directory at startup. Both are read-only after that.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;

lazy_static! {
    /// Gemini prebuilt voices, name -> short description.
    static ref VOICES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Zephyr", "Bright");
        m.insert("Puck", "Upbeat");
        m.insert("Charon", "Informative");
        m.insert("Kore", "Firm");
        m.insert("Fenrir", "Excitable");
        m.insert("Leda", "Youthful");
        m.insert("Orus", "Firm");
        m.insert("Aoede", "Breezy");
        m.insert("Callirhoe", "Easy-going");
        m.insert("Autonoe", "Bright");
        m.insert("Enceladus", "Breathy");
        m.insert("Iapetus", "Clear");
        m.insert("Umbriel", "Easy-going");
        m.insert("Algieba", "Smooth");
        m.insert("Despina", "Smooth");
        m.insert("Erinome", "Clear");
        m.insert("Algenib", "Gravelly");
        m.insert("Rasalgethi", "Informative");
        m.insert("Laomedeia", "Upbeat");
        m.insert("Achernar", "Soft");
        m.insert("Alnilam", "Firm");
        m.insert("Schedar", "Even");
        m.insert("Gacrux", "Mature");
        m.insert("Pulcherrima", "Forward");
        m.insert("Achird", "Friendly");
        m.insert("Zubenelgenubi", "Casual");
        m.insert("Vindemiatrix", "Gentle");
        m.insert("Sadachbia", "Lively");
        m.insert("Sadaltager", "Knowledgeable");
        m.insert("Sulafar", "Warm");
        m
    };
}

pub fn all_voices() -> &'static HashMap<&'static str, &'static str> {
    &VOICES
}

pub fn is_valid_voice(voice: &str) -> bool {
    VOICES.contains_key(voice)
}

/// Named target voices for conversion, each backed by a reference WAV.
#[derive(Debug, Default)]
pub struct PresetCatalog {
    presets: HashMap<String, PathBuf>,
}

impl PresetCatalog {
    /// Scan `dir` for reference audio; the file stem becomes the preset name.
    pub fn load(dir: &Path) -> std::io::Result<Self> {
        let mut presets = HashMap::new();

        if !dir.exists() {
            return Ok(Self { presets });
        }

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "wav").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    presets.insert(stem.to_string_lossy().to_string(), path);
                }
            }
        }

        Ok(Self { presets })
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.presets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.presets.get(name).map(|p| p.as_path())
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contains_known_voices() {
        assert!(is_valid_voice("Zephyr"));
        assert!(is_valid_voice("Sulafar"));
        assert!(!is_valid_voice("zephyr"));
        assert!(!is_valid_voice("NotAVoice"));
        assert_eq!(all_voices().len(), 30);
    }

    #[test]
    fn test_preset_catalog_from_missing_dir_is_empty() {
        let catalog = PresetCatalog::load(Path::new("/nonexistent/presets")).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.resolve("anything").is_none());
    }

    #[test]
    fn test_preset_catalog_scans_wav_stems() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alice.wav"), b"ref").unwrap();
        std::fs::write(dir.path().join("bob.wav"), b"ref").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

        let catalog = PresetCatalog::load(dir.path()).unwrap();
        assert_eq!(catalog.names(), vec!["alice", "bob"]);
        assert!(catalog.resolve("alice").unwrap().ends_with("alice.wav"));
        assert!(catalog.resolve("notes").is_none());
    }
}
