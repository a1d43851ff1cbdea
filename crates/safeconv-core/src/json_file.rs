use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{ConversionError, Result};
use crate::outcome::{Outcome, kind_name};

/// Open file held for the duration of one read.
///
/// The handle is closed when the scope is dropped, on every exit path.
struct FileScope {
    file: File,
    path: PathBuf,
}

impl FileScope {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| ConversionError::from_io(err, path))?;
        tracing::debug!(event = "resource_acquired", path = %path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    fn ensure_regular_file(&self) -> Result<()> {
        let metadata = self
            .file
            .metadata()
            .map_err(|err| ConversionError::from_io(err, &self.path))?;
        if !metadata.is_file() {
            return Err(ConversionError::NotAFile(format!("{}", self.path.display())));
        }
        Ok(())
    }

    fn read_to_string(&mut self) -> Result<String> {
        let mut contents = String::new();
        self.file
            .read_to_string(&mut contents)
            .map_err(|err| ConversionError::from_io(err, &self.path))?;
        Ok(contents)
    }
}

impl Drop for FileScope {
    fn drop(&mut self) {
        tracing::debug!(event = "resource_released", path = %self.path.display());
    }
}

/// Load a JSON object from `path`, falling back to an empty map.
pub fn load_json_map(path: impl AsRef<Path>) -> Outcome<Map<String, Value>> {
    let path = path.as_ref();
    Outcome::recover(
        read_json_map(path),
        Map::new(),
        path.display().to_string(),
    )
}

fn read_json_map(path: &Path) -> Result<Map<String, Value>> {
    let contents = {
        let mut scope = FileScope::open(path)?;
        scope.ensure_regular_file()?;
        scope.read_to_string()?
    };

    let value: Value = serde_json::from_str(&contents).map_err(|err| {
        ConversionError::Decode(format!("{}: {err}", path.display()))
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ConversionError::TypeMismatch(format!(
            "{}: expected a JSON object, got {}",
            path.display(),
            kind_name(&other)
        ))),
    }
}
