use crate::error::{LasError, Result};
use crate::lidar::{
    parse_extra_dims, parse_ignore_vlrs, pdrf, Compression, ExtraDimSelection, IgnoreVlr,
    LoaderDriver, Scaling,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

/// Codec settings. Backed by a JSON file; missing entries take their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub point_format: u8,
    pub scale: [f64; 3],
    pub offset: [f64; 3],
    /// `name=type` entries, or `all` where every extra dimension is wanted.
    pub extra_dims: Vec<String>,
    /// `user_id/record_id` or `user_id` entries.
    pub ignore_vlrs: Vec<String>,
    pub compression: Compression,
    pub minor_version: Option<u8>,
}

impl Default for Configs {
    fn default() -> Configs {
        Configs::new()
    }
}

impl Configs {
    pub fn new() -> Configs {
        Configs {
            point_format: 3,
            scale: [0.01; 3],
            offset: [0.0; 3],
            extra_dims: vec![],
            ignore_vlrs: vec![],
            compression: Compression::None,
            minor_version: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Configs> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Configs> {
        let contents = fs::read_to_string(path)?;
        Configs::from_json(&contents)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let configs_json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(configs_json.as_bytes())?;
        Ok(())
    }

    pub fn scaling(&self) -> Scaling {
        Scaling::new(self.scale, self.offset)
    }

    pub fn extra_dims(&self, all_ok: bool) -> Result<ExtraDimSelection> {
        parse_extra_dims(&self.extra_dims, all_ok)
    }

    pub fn ignored_vlrs(&self) -> Result<Vec<IgnoreVlr>> {
        parse_ignore_vlrs(&self.ignore_vlrs)
    }

    /// The LAS minor version to write: the configured one, or the lowest
    /// version from 1.2 up that defines the point format.
    pub fn write_minor_version(&self) -> Result<u8> {
        let minimum = pdrf::minimum_minor_version(self.point_format)
            .ok_or(LasError::InvalidPointFormat(self.point_format))?;
        match self.minor_version {
            Some(v) if v < minimum || v > 4 => Err(LasError::InvalidFile(format!(
                "point format {} cannot be written as LAS 1.{}",
                self.point_format, v
            ))),
            Some(v) => Ok(v),
            None => Ok(minimum.max(2)),
        }
    }

    /// A loader driver for the configured format with the extra dimensions
    /// placed after the standard fields.
    pub fn loader_driver(&self) -> Result<LoaderDriver> {
        let start = pdrf::base_count(self.point_format)
            .ok_or(LasError::InvalidPointFormat(self.point_format))?;
        let dims = match self.extra_dims(false)? {
            ExtraDimSelection::Only(dims) => dims,
            ExtraDimSelection::All => vec![],
        };
        let dims = crate::lidar::relocate(&dims, start as i32);
        Ok(LoaderDriver::new(self.point_format, self.scaling(), &dims))
    }
}

#[cfg(test)]
mod test {
    use super::Configs;
    use crate::error::LasError;
    use crate::lidar::{Compression, ExtraDimSelection};

    #[test]
    fn test_defaults() {
        let configs = Configs::new();
        assert_eq!(configs.point_format, 3);
        assert_eq!(configs.scaling().x.scale, 0.01);
        assert_eq!(configs.write_minor_version().unwrap(), 2);
        assert_eq!(configs.extra_dims(false).unwrap(), ExtraDimSelection::Only(vec![]));
    }

    #[test]
    fn test_from_json_partial() {
        let configs = Configs::from_json(
            r#"{ "point_format": 6, "extra_dims": ["height=float"], "compression": "LasZip" }"#,
        )
        .unwrap();
        assert_eq!(configs.point_format, 6);
        assert_eq!(configs.scale, [0.01; 3]);
        assert_eq!(configs.compression, Compression::LasZip);
        assert_eq!(configs.write_minor_version().unwrap(), 4);

        let driver = configs.loader_driver().unwrap();
        assert_eq!(driver.record_length(), 34);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Configs::from_json("{ \"point_format\": \"three\" }"),
            Err(LasError::Config(_))
        ));
    }

    #[test]
    fn test_bad_options() {
        let mut configs = Configs::new();
        configs.extra_dims = vec!["nope".to_string()];
        assert!(configs.loader_driver().is_err());
        configs.extra_dims = vec![];
        configs.ignore_vlrs = vec!["user/x".to_string()];
        assert!(matches!(configs.ignored_vlrs(), Err(LasError::InvalidIgnoreVlr(_))));
        configs.point_format = 7;
        configs.minor_version = Some(2);
        assert!(configs.write_minor_version().is_err());
        configs.point_format = 12;
        assert!(matches!(configs.loader_driver(), Err(LasError::InvalidPointFormat(12))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut configs = Configs::new();
        configs.point_format = 8;
        configs.ignore_vlrs = vec!["LASF_Projection".to_string()];
        configs.minor_version = Some(4);
        configs.save(&path).unwrap();
        assert_eq!(Configs::from_file(&path).unwrap(), configs);
    }
}
