//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use fleet_core::ServiceDefinition;

use crate::error::CliError;

/// File extensions recognized as unit definitions.
const DEFINITION_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml"];

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Whether `arg` looks like a definition file path rather than a unit name.
pub fn is_definition_path(arg: &str) -> bool {
    Path::new(arg)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DEFINITION_EXTENSIONS.contains(&e))
}

/// Derive the unit name from a definition file: `web@.service.yaml`
/// becomes `web@.service`.
pub fn unit_name_from_path(path: &Path) -> Result<String, CliError> {
    let unsupported = || CliError::Validation {
        field: "file".into(),
        reason: format!(
            "{} is not a definition file (expected .json, .yaml, .yml or .toml)",
            path.display()
        ),
    };
    let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(unsupported)?;
    if !DEFINITION_EXTENSIONS.contains(&ext) {
        return Err(unsupported());
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(unsupported)
}

/// Resolve a command argument to a unit name, accepting definition paths.
pub fn unit_name_arg(arg: &str) -> Result<String, CliError> {
    if is_definition_path(arg) {
        unit_name_from_path(Path::new(arg))
    } else {
        Ok(arg.to_owned())
    }
}

/// Read a JSON, YAML or TOML definition file.
pub fn read_definition_file(path: &Path) -> Result<ServiceDefinition, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let parse_err = |e: &dyn std::fmt::Display| CliError::InvalidDefinition {
        message: format!("{}: {e}", path.display()),
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let value: serde_json::Value = match ext {
        "json" => serde_json::from_str(&contents).map_err(|e| parse_err(&e))?,
        "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| parse_err(&e))?,
        "toml" => toml::from_str(&contents).map_err(|e| parse_err(&e))?,
        _ => return Err(parse_err(&"unsupported file extension")),
    };

    Ok(ServiceDefinition::try_from(value)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn unit_name_strips_definition_extension() {
        assert_eq!(
            unit_name_from_path(&PathBuf::from("units/web@.service.yaml")).unwrap(),
            "web@.service"
        );
        assert_eq!(unit_name_arg("web.service").unwrap(), "web.service");
        assert_eq!(unit_name_arg("./db.service.toml").unwrap(), "db.service");
    }

    #[test]
    fn unit_file_without_definition_extension_is_rejected() {
        let err = unit_name_from_path(&PathBuf::from("web.service")).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn reads_each_definition_format() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            (
                "a.service.json",
                r#"{"Service": {"ExecStart": "/bin/a"}}"#,
            ),
            ("a.service.yaml", "Service:\n  ExecStart: /bin/a\n"),
            ("a.service.toml", "[Service]\nExecStart = \"/bin/a\"\n"),
        ];
        for (name, body) in files {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            let def = read_definition_file(&path).unwrap();
            assert_eq!(def.options().len(), 1, "{name}");
        }
    }

    #[test]
    fn malformed_definition_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.service.yaml");
        std::fs::write(&path, "Service: just-a-string\n").unwrap();

        let err = read_definition_file(&path).unwrap_err();
        assert!(matches!(err, CliError::InvalidDefinition { .. }));
    }
}
