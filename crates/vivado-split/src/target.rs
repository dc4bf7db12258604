//! Patch targets and the database that holds them
//!
//! The database is a RON file listing, per target, the source file in the
//! OpenTitan tree, the generated copy in the Vivado build tree that gets
//! overwritten, and the ordered steps to get from one to the other.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::edit::{Edit, LineBuffer};
use crate::error::{PatchError, Result};

/// Database shipped with the tool
pub const BUILTIN_DB: &str = include_str!("../targets/opentitan-dla-fmc.ron");

/// Suffix of the backup made of an existing output
pub const BACKUP_SUFFIX: &str = ".orig";

/// A group of edits announced by one note
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Printed before the edits run
    #[serde(default)]
    pub note: Option<String>,
    /// Edits in the order they are applied
    pub edits: Vec<Edit>,
}

/// One file to patch
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "Target")]
pub struct PatchTarget {
    /// Short name
    pub name: String,
    /// What the patch does
    #[serde(default)]
    pub description: String,
    /// Path of the pristine file, relative to the source root
    pub source: PathBuf,
    /// Path of the generated file, relative to the build root
    pub output: PathBuf,
    /// Steps applied in order
    pub steps: Vec<Step>,
}

/// Where sources are read from and outputs written to
#[derive(Debug, Clone)]
pub struct Roots {
    /// Root of the source tree
    pub src: PathBuf,
    /// Root of the build tree
    pub build: PathBuf,
}

impl PatchTarget {
    /// Run every step over `text`, calling `on_note` for each note
    pub fn apply<F: FnMut(&str)>(&self, text: &str, mut on_note: F) -> Result<String> {
        let mut buffer = LineBuffer::from_text(text);
        log::debug!("{}: {} lines read", self.name, buffer.len());

        for (idx, step) in self.steps.iter().enumerate() {
            if let Some(note) = &step.note {
                on_note(note);
            }
            for edit in &step.edits {
                log::trace!("{}: {}", self.name, edit);
                buffer.apply(edit).map_err(|e| PatchError::Target {
                    target: self.name.clone(),
                    step: idx + 1,
                    source: Box::new(e),
                })?;
            }
        }

        log::debug!("{}: {} slots after patching", self.name, buffer.len());
        Ok(buffer.to_text())
    }

    /// Patch the source into the build tree
    ///
    /// An existing output is renamed to `<output>.orig` first; a previous
    /// backup is overwritten. Returns the path written.
    pub fn run<F: FnMut(&str)>(&self, roots: &Roots, on_note: F) -> Result<PathBuf> {
        let source = roots.src.join(&self.source);
        let output = roots.build.join(&self.output);

        let text = fs::read_to_string(&source).map_err(|e| PatchError::io(&source, e))?;
        let patched = self.apply(&text, on_note)?;

        if output.exists() {
            let backup = backup_path(&output);
            log::debug!("Backing up {} to {}", output.display(), backup.display());
            fs::rename(&output, &backup).map_err(|e| PatchError::io(&output, e))?;
        } else if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| PatchError::io(parent, e))?;
        }

        fs::write(&output, patched).map_err(|e| PatchError::io(&output, e))?;
        log::info!("Wrote {}", output.display());
        Ok(output)
    }
}

/// `<path>.orig`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// A set of patch targets
#[derive(Debug, Clone, Deserialize)]
pub struct PatchDb {
    /// Name of the patch set
    pub name: String,
    /// Targets in selection order
    pub targets: Vec<PatchTarget>,
}

impl PatchDb {
    /// Parse the database compiled into the tool
    pub fn builtin() -> Result<Self> {
        Self::load_ron(BUILTIN_DB)
    }

    /// Load a database from a RON file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PatchError::io(path, e))?;
        Self::load_ron(&content)
    }

    /// Load a database from a RON string
    pub fn load_ron(content: &str) -> Result<Self> {
        let db: PatchDb = ron::from_str(content)?;
        db.validate()?;
        Ok(db)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(PatchError::Validation(format!("{}: no targets", self.name)));
        }
        for target in &self.targets {
            let edits = target.steps.iter().flat_map(|s| &s.edits);
            for edit in edits {
                match edit {
                    Edit::Delete(start, end) | Edit::Prefix(start, end, _) if start > end => {
                        return Err(PatchError::Validation(format!(
                            "{}: {} has an inverted range",
                            target.name, edit
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the database has no targets
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SMALL_DB: &str = r##"
PatchDb(
    name: "small",
    targets: [
        Target(
            name: "top",
            source: "rtl/top.sv",
            output: "build/rtl/top.sv",
            steps: [
                Step(
                    note: Some("Rename port"),
                    edits: [Replace(1, "  input clk_i,\n")],
                ),
                Step(
                    edits: [
                        Insert(0, r#"// patched
// twice
"#),
                        Prefix(4, 5, "//"),
                    ],
                ),
            ],
        ),
    ],
)
"##;

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("line {}\n", i)).collect()
    }

    #[test]
    fn test_builtin_database() {
        let db = PatchDb::builtin().unwrap();
        assert_eq!(db.name, "opentitan-dla-fmc");
        assert_eq!(db.len(), 5);

        let names: Vec<&str> = db.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "dla",
                "top_earlgrey_nexysvideo",
                "top_earlgrey",
                "pins_nexysvideo",
                "clkgen_xil7series"
            ]
        );
        assert_eq!(
            db.targets[2].source,
            PathBuf::from("hw/top_earlgrey/rtl/autogen/top_earlgrey.sv")
        );

        let remove_u_dla = db.targets[2]
            .steps
            .iter()
            .find(|s| s.note.as_deref() == Some("Remove u_dla"))
            .unwrap();
        assert_eq!(remove_u_dla.edits, vec![Edit::Prefix(1401, 1413, "//".into())]);
    }

    #[test]
    fn test_builtin_inserts_keep_trailing_whitespace() {
        let db = PatchDb::builtin().unwrap();
        let clkgen = &db.targets[4];
        let has_padded_line = clkgen.steps.iter().flat_map(|s| &s.edits).any(|e| match e {
            Edit::Insert(106, text) => text.contains("  BUFG clk_200_bufg (    \n"),
            _ => false,
        });
        assert!(has_padded_line);
    }

    #[test]
    fn test_builtin_applies_to_large_enough_sources() {
        let db = PatchDb::builtin().unwrap();
        let source = numbered(1500);
        for target in &db.targets {
            let mut notes = 0;
            let patched = target.apply(&source, |_| notes += 1).unwrap();
            assert_ne!(patched, source, "{} left its source unchanged", target.name);
            assert_eq!(notes, target.steps.iter().filter(|s| s.note.is_some()).count());
        }
    }

    #[test]
    fn test_apply_with_notes() {
        let db = PatchDb::load_ron(SMALL_DB).unwrap();
        let target = &db.targets[0];

        let mut notes = Vec::new();
        let patched = target
            .apply(&numbered(5), |n| notes.push(n.to_string()))
            .unwrap();

        assert_eq!(notes, ["Rename port"]);
        assert_eq!(
            patched,
            "// patched\n// twice\nline 0\n  input clk_i,\nline 2\n//line 3\nline 4\n"
        );
    }

    #[test]
    fn test_apply_reports_step() {
        let db = PatchDb::load_ron(SMALL_DB).unwrap();
        let err = db.targets[0].apply("only\n", |_| {}).unwrap_err();
        match err {
            PatchError::Target { target, step, .. } => {
                assert_eq!(target, "top");
                assert_eq!(step, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_backs_up_existing_output() {
        let tmp = TempDir::new().unwrap();
        let roots = Roots {
            src: tmp.path().join("src"),
            build: tmp.path().join("out"),
        };
        let db = PatchDb::load_ron(SMALL_DB).unwrap();
        let target = &db.targets[0];

        fs::create_dir_all(roots.src.join("rtl")).unwrap();
        fs::write(roots.src.join("rtl/top.sv"), numbered(5)).unwrap();

        // First run creates the output directories
        let written = target.run(&roots, |_| {}).unwrap();
        assert_eq!(written, roots.build.join("build/rtl/top.sv"));
        assert!(!backup_path(&written).exists());

        fs::write(&written, "generated\n").unwrap();
        target.run(&roots, |_| {}).unwrap();
        assert_eq!(fs::read_to_string(backup_path(&written)).unwrap(), "generated\n");
        assert!(fs::read_to_string(&written).unwrap().starts_with("// patched\n"));
    }

    #[test]
    fn test_run_missing_source() {
        let tmp = TempDir::new().unwrap();
        let roots = Roots {
            src: tmp.path().to_path_buf(),
            build: tmp.path().to_path_buf(),
        };
        let db = PatchDb::load_ron(SMALL_DB).unwrap();
        let err = db.targets[0].run(&roots, |_| {}).unwrap_err();
        assert!(matches!(err, PatchError::Io { .. }));
        assert!(!tmp.path().join("build").exists());
    }

    #[test]
    fn test_invalid_databases() {
        assert!(matches!(
            PatchDb::load_ron("PatchDb(name: \"empty\", targets: [])"),
            Err(PatchError::Validation(_))
        ));
        assert!(matches!(
            PatchDb::load_ron("PatchDb(name: \"x\""),
            Err(PatchError::Parse(_))
        ));

        let inverted = r#"PatchDb(name: "x", targets: [Target(name: "t", source: "a", output: "b",
            steps: [Step(edits: [Delete(5, 2)])])])"#;
        assert!(matches!(
            PatchDb::load_ron(inverted),
            Err(PatchError::Validation(_))
        ));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("build/a.xdc")),
            PathBuf::from("build/a.xdc.orig")
        );
    }
}
