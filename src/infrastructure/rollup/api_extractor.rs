//! api-extractor rollup
//!
//! Flattens declarations by running the api-extractor CLI with a generated
//! configuration file. The file is placed next to the package manifest so
//! the tool picks up the package metadata from there.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{json, Value};

use crate::domain::ports::{RollupEngine, RollupRequest};
use crate::domain::value_objects::path as paths;
use crate::error::{DeclError, DeclResult};

pub struct ApiExtractorRollup {
    command: Vec<String>,
}

impl ApiExtractorRollup {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// The configuration object handed to the tool
    pub fn config_object(request: &RollupRequest) -> Value {
        let mut compiler = json!({
            "overrideTsconfig": {
                "$schema": "http://json.schemastore.org/tsconfig",
                "compilerOptions": request.compiler_options,
            }
        });
        if let Some(config_path) = &request.config_path {
            compiler["tsconfigFilePath"] = json!(paths::to_slash(config_path));
        }

        json!({
            "projectFolder": paths::to_slash(&request.root),
            "mainEntryPointFilePath": paths::to_slash(&request.entry_path),
            "bundledPackages": request.bundled_packages,
            "compiler": compiler,
            "apiReport": {
                "enabled": false,
                "reportFileName": "<unscopedPackageName>.api.md",
            },
            "docModel": { "enabled": false },
            "dtsRollup": {
                "enabled": true,
                "publicTrimmedFilePath": paths::to_slash(&request.output_path()),
            },
            "tsdocMetadata": { "enabled": false },
            "messages": {
                "compilerMessageReporting": { "default": { "logLevel": "none" } },
                "extractorMessageReporting": { "default": { "logLevel": "none" } },
            },
        })
    }

    fn prepare_error(request: &RollupRequest, message: impl Into<String>) -> DeclError {
        DeclError::RollupPrepare {
            entry: request.entry_path.clone(),
            message: message.into(),
        }
    }
}

impl RollupEngine for ApiExtractorRollup {
    fn rollup(&self, request: &RollupRequest) -> DeclResult<()> {
        let Some((program, leading)) = self.command.split_first() else {
            return Err(Self::prepare_error(request, "empty rollup command"));
        };

        let config_dir = request
            .package_json
            .as_deref()
            .map(paths::parent_dir)
            .unwrap_or_else(|| request.root.clone());
        let mut config = tempfile::Builder::new()
            .prefix(".declpack-api-extractor-")
            .suffix(".json")
            .tempfile_in(&config_dir)
            .map_err(|e| Self::prepare_error(request, e.to_string()))?;
        let object = serde_json::to_string_pretty(&Self::config_object(request))?;
        config
            .write_all(object.as_bytes())
            .map_err(|e| Self::prepare_error(request, e.to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(leading)
            .arg("run")
            .arg("--local")
            .arg("--config")
            .arg(config.path())
            .current_dir(&request.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(lib_folder) = &request.lib_folder {
            cmd.arg("--typescript-compiler-folder").arg(lib_folder);
        }

        let output = cmd.output().map_err(|e| {
            Self::prepare_error(
                request,
                format!("failed to run '{}': {}", self.command.join(" "), e),
            )
        })?;
        if !output.status.success() || !request.output_path().exists() {
            return Err(DeclError::RollupFailed {
                entry: request.entry_path.clone(),
            });
        }
        Ok(())
    }
}
