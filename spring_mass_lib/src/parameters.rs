use config::{Config, FileFormat};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use toml::Table;

/// Typed simulation parameters backed by an optional TOML file.
///
/// Values live under `[<run name>.<section>]`. Anything missing from the file
/// falls back to the default supplied by the caller. Every resolved section is
/// remembered so [`ParameterStore::save`] writes out the full effective set.
pub struct ParameterStore {
    file: PathBuf,
    config: Config,
    run_name: String,

    write_back: Table,
}

impl ParameterStore {
    pub fn new(file: &Path, run_name: &str) -> Result<Self, ParameterStoreError> {
        let config = if file.exists() {
            let path = file
                .to_str()
                .ok_or_else(|| ParameterStoreError::InvalidPath(file.to_owned()))?;
            Config::builder()
                .add_source(config::File::new(path, FileFormat::Toml))
                .build()?
        } else {
            Config::default()
        };

        Ok(ParameterStore {
            file: file.to_owned(),
            config,
            run_name: run_name.to_string(),
            write_back: Table::new(),
        })
    }

    pub fn get_parameters<T: DeserializeOwned + Serialize>(
        &mut self,
        section: &str,
        default: T,
    ) -> Result<T, ParameterStoreError> {
        let default = Config::try_from(&default)?;
        let key = format!("{}.{}", self.run_name, section);
        let param: T = Config::builder()
            .set_default(key.as_str(), default.cache)?
            .add_source(self.config.clone())
            .build()?
            .get(key.as_str())?;

        let v_table = Table::try_from(&param)?;
        self.write_back
            .insert(section.to_string(), toml::Value::Table(v_table));

        Ok(param)
    }

    pub fn save(&self) -> Result<(), ParameterStoreError> {
        let mut root = Table::new();
        root.insert(
            self.run_name.clone(),
            toml::Value::Table(self.write_back.clone()),
        );

        let ser_toml: String = toml::to_string_pretty(&root)?;

        std::fs::write(&self.file, ser_toml)?;

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ParameterStoreError {
    #[error("File operation error")]
    Io(#[from] io::Error),

    #[error("Parameter file path is not valid UTF-8: {0:?}")]
    InvalidPath(PathBuf),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl From<config::ConfigError> for ParameterStoreError {
    fn from(value: config::ConfigError) -> Self {
        ParameterStoreError::Deserialization(value.into())
    }
}

impl From<toml::ser::Error> for ParameterStoreError {
    fn from(value: toml::ser::Error) -> Self {
        ParameterStoreError::Serialization(value.into())
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct DeserializationError {
    #[from]
    source: config::ConfigError,
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct SerializationError {
    #[from]
    source: toml::ser::Error,
}
