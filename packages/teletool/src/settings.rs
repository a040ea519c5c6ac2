use std::{
    path::Path,
    fs::File,
    io::BufReader,
};
use serde::{Serialize, Deserialize};
use anyhow::Result;


pub const SETTINGS_FILE_NAME: &'static str = "teletool.json";


/// Tool settings. Fields missing from the file take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// World file read when none is given on the command line.
    pub world: String,
    pub log_to_file: bool,
    pub log_file: String,
    /// Write OBJ meshes instead of map text.
    pub obj: bool,
    /// Body radius used by proximity reports.
    pub body_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            world: "world.bzw".to_owned(),
            log_to_file: false,
            log_file: "teletool.log".to_owned(),
            obj: false,
            body_radius: 4.32,
        }
    }
}

impl Settings {
    pub fn read(path: impl AsRef<Path>) -> Self {
        Self::try_read(path).unwrap_or_default()
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    /// Log file path, if logging to a file is on.
    pub fn log_path(&self) -> Option<&Path> {
        if self.log_to_file {
            Some(Path::new(&self.log_file))
        } else {
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "obj": true, "body_radius": 2.0 }"#).unwrap();
        assert!(settings.obj);
        assert_eq!(settings.body_radius, 2.0);
        assert_eq!(settings.world, "world.bzw");
        assert!(settings.log_path().is_none());
    }

    #[test]
    fn missing_file_reads_as_default() {
        assert_eq!(Settings::read("/nonexistent/teletool.json"), Settings::default());
        assert!(Settings::try_read("/nonexistent/teletool.json").is_err());
    }
}
