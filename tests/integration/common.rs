//! Common utilities for integration tests

use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use std::path::PathBuf;

/// Component importing a default module; the module provides a private
/// singleton, owns the constructor-injected pump, and a field-injected
/// target consumes it
pub const COFFEE: &str = r#"
classes:
  - name: coffee.CoffeeApp
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: dripModule
        return_type: coffee.DripModule
        annotations: [{type: io.scabbard.Import}]
  - name: coffee.DripModule
    annotations:
      - type: io.scabbard.Module
        values: {isDefault: {bool: true}}
    methods:
      - name: heater
        return_type: coffee.Heater
        modifiers: [private]
        annotations:
          - type: io.scabbard.Provide
          - type: javax.inject.Singleton
  - name: coffee.Heater
  - name: coffee.Pump
    methods:
      - name: "<init>"
        parameters: [{type: coffee.Heater}]
        annotations: [{type: javax.inject.Inject}]
  - name: coffee.CoffeeMaker
    fields:
      - name: pump
        type: coffee.Pump
        annotations: [{type: javax.inject.Inject}]
"#;

/// Provider method whose parameter nothing provides
pub const UNRESOLVED: &str = r#"
classes:
  - name: coffee.CoffeeApp
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: grinder
        parameters: [{type: coffee.Motor}]
        return_type: coffee.Grinder
        annotations: [{type: io.scabbard.Provide}]
"#;

/// Two providers depending on each other through `Provider` and `Lazy`
pub const WRAPPED_CYCLE: &str = r#"
classes:
  - name: coffee.CoffeeApp
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: brewer
        parameters: [{type: "javax.inject.Provider<coffee.Kettle>"}]
        return_type: coffee.Brewer
        annotations: [{type: io.scabbard.Provide}]
      - name: kettle
        parameters: [{type: "io.scabbard.Lazy<coffee.Brewer>"}]
        return_type: coffee.Kettle
        annotations: [{type: io.scabbard.Provide}]
"#;

/// Test context with an isolated working and config directory
pub struct TestContext {
    pub temp: TempDir,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        temp.child("config").create_dir_all().unwrap();
        Self { temp }
    }

    /// Command running scabbard inside the temp dir with its global config
    /// directory redirected there
    pub fn scabbard(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_scabbard"));
        cmd.current_dir(&self.temp);

        let config_dir = self.temp.child("config").to_path_buf();
        if cfg!(target_os = "windows") {
            cmd.env("APPDATA", &config_dir);
            cmd.env("USERPROFILE", self.temp.path());
        } else if cfg!(target_os = "linux") {
            cmd.env("XDG_CONFIG_HOME", &config_dir);
            cmd.env("HOME", self.temp.path());
        } else {
            cmd.env("HOME", self.temp.path());
        }
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Write a metadata document under `metadata/` and return its path
    pub fn metadata(&self, name: &str, content: &str) -> PathBuf {
        let file = self.temp.child("metadata").child(name);
        file.write_str(content).unwrap();
        file.to_path_buf()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }
}
