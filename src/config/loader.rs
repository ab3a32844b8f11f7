//! Configuration loading functionality.
//!
//! Loads the pipeline configuration and the versioned rate-mapping
//! reference data from YAML files.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{PipelineConfig, RateMapping};

/// Loads pipeline configuration and rate-mapping reference data.
///
/// # Example
///
/// ```no_run
/// use invoice_engine::config::ConfigLoader;
///
/// let mut config = ConfigLoader::load_config("./pipeline.yaml")?;
/// config.rate_mapping = ConfigLoader::load_rate_mapping("./reference/fy24.yaml")?;
/// # Ok::<(), invoice_engine::error::EngineError>(())
/// ```
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a [`PipelineConfig`] from a YAML file.
    ///
    /// Fields absent from the file take their defaults; the rate mapping may
    /// be inlined under `rate_mapping` or loaded separately with
    /// [`ConfigLoader::load_rate_mapping`].
    pub fn load_config<P: AsRef<Path>>(path: P) -> EngineResult<PipelineConfig> {
        Self::load_yaml(path.as_ref())
    }

    /// Loads a versioned [`RateMapping`] table from a YAML file.
    pub fn load_rate_mapping<P: AsRef<Path>>(path: P) -> EngineResult<RateMapping> {
        Self::load_yaml(path.as_ref())
    }

    fn load_yaml<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
        if !path.exists() {
            return Err(EngineError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|e| EngineError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str(&contents).map_err(|e| EngineError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_missing_file_is_config_not_found() {
        let result = ConfigLoader::load_config("/nonexistent/pipeline.yaml");
        assert!(matches!(
            result,
            Err(EngineError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_load_rate_mapping_reads_ordered_pairs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "version: fy24\npairs:\n  - source: \"Normal Hourly (Qty)\"\n    target: \"NT\"\n  - source: \"Overtime 2.0 (Qty)\"\n    target: \"OT\"\n"
        )
        .unwrap();

        let mapping = ConfigLoader::load_rate_mapping(file.path()).unwrap();
        assert_eq!(mapping.version, "fy24");
        assert_eq!(mapping.pairs.len(), 2);
        assert_eq!(mapping.pairs[0].target, "NT");
    }

    #[test]
    fn test_load_config_invalid_yaml_is_config_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "gst_rate: [not, a, rate").unwrap();

        let result = ConfigLoader::load_config(file.path());
        assert!(matches!(result, Err(EngineError::ConfigParse { .. })));
    }
}
