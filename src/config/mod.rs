use crate::core::path::{config_file, ensure_dir, project_config_file};
use crate::core::{ScabbardError, ScabbardResult};
use scabbard_core::types::ClassName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn name(value: &'static str) -> ClassName {
    ClassName::from_static(value)
}

/// Fully-qualified names of the annotations the analyzer recognises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerNames {
    /// Injection point marker (constructors, fields, methods)
    pub inject: ClassName,
    /// Provider method/field marker inside modules and components
    pub provide: ClassName,
    /// Module marker, with an `isDefault` flag
    pub module: ClassName,
    /// Component marker, with an optional `parent` class
    pub component: ClassName,
    /// Module import marker on fields/methods of modules and components
    pub import: ClassName,
    /// Back-reference from a module to the modules/components importing it
    pub imported_by: ClassName,
    /// Module ownership list for providable, bound and factory types
    pub provided_by: ClassName,
    /// Alias binding marker listing ancestor types
    pub provided_as: ClassName,
    pub qualifier: ClassName,
    pub scope: ClassName,
    /// Meta-marker naming the provider wrapper class of a scope annotation
    pub scope_provider: ClassName,
    pub factory: ClassName,
    pub factory_inject: ClassName,
    pub factory_parameter: ClassName,
    pub factory_return: ClassName,
}

impl Default for MarkerNames {
    fn default() -> Self {
        Self {
            inject: name("javax.inject.Inject"),
            provide: name("io.scabbard.Provide"),
            module: name("io.scabbard.Module"),
            component: name("io.scabbard.Component"),
            import: name("io.scabbard.Import"),
            imported_by: name("io.scabbard.ImportedBy"),
            provided_by: name("io.scabbard.ProvidedBy"),
            provided_as: name("io.scabbard.ProvidedAs"),
            qualifier: name("javax.inject.Qualifier"),
            scope: name("javax.inject.Scope"),
            scope_provider: name("io.scabbard.ProviderClass"),
            factory: name("io.scabbard.Factory"),
            factory_inject: name("io.scabbard.Factory$Inject"),
            factory_parameter: name("io.scabbard.Factory$Parameter"),
            factory_return: name("io.scabbard.Factory$Return"),
        }
    }
}

impl MarkerNames {
    fn all(&self) -> [(&'static str, &ClassName); 15] {
        [
            ("inject", &self.inject),
            ("provide", &self.provide),
            ("module", &self.module),
            ("component", &self.component),
            ("import", &self.import),
            ("imported_by", &self.imported_by),
            ("provided_by", &self.provided_by),
            ("provided_as", &self.provided_as),
            ("qualifier", &self.qualifier),
            ("scope", &self.scope),
            ("scope_provider", &self.scope_provider),
            ("factory", &self.factory),
            ("factory_inject", &self.factory_inject),
            ("factory_parameter", &self.factory_parameter),
            ("factory_return", &self.factory_return),
        ]
    }
}

/// Runtime library types referenced by analysis and generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeNames {
    /// `Provider<T>` wrapper; injectees of this shape receive the provider itself
    pub provider: ClassName,
    /// `Lazy<T>` wrapper; injectees of this shape receive an adapter
    pub lazy: ClassName,
    /// Adapter class wrapping a provider into a lazy handle
    pub lazy_adapter: ClassName,
    pub injector: ClassName,
    pub injector_configurator: ClassName,
    /// Reified generic type token
    pub type_token: ClassName,
    /// Reified type + qualifier token
    pub key: ClassName,
    /// Root of the class hierarchy
    pub object: ClassName,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            provider: name("javax.inject.Provider"),
            lazy: name("io.scabbard.Lazy"),
            lazy_adapter: name("io.scabbard.internal.LazyAdapter"),
            injector: name("io.scabbard.Injector"),
            injector_configurator: name("io.scabbard.internal.InjectorConfigurator"),
            type_token: name("io.scabbard.internal.TypeToken"),
            key: name("io.scabbard.Key"),
            object: name("java.lang.Object"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub markers: MarkerNames,

    #[serde(default)]
    pub runtime: RuntimeNames,

    /// Built-in scope annotations and the provider wrapper each one applies.
    /// Scope annotations carrying the scope-provider meta-marker are added during analysis.
    #[serde(default = "default_scopes")]
    pub scopes: BTreeMap<ClassName, ClassName>,

    /// Package receiving the key registry
    #[serde(default = "default_generated_package")]
    pub generated_package: String,

    /// Skip `Provider<T>`/`Lazy<T>` edges when checking dependency cycles
    #[serde(default = "default_true")]
    pub allow_wrapped_cycles: bool,

    /// Default directory for generated artifacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

fn default_scopes() -> BTreeMap<ClassName, ClassName> {
    let mut scopes = BTreeMap::new();
    scopes.insert(
        name("javax.inject.Singleton"),
        name("io.scabbard.internal.SingletonProvider"),
    );
    scopes
}

fn default_generated_package() -> String {
    "io.scabbard.generated".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markers: MarkerNames::default(),
            runtime: RuntimeNames::default(),
            scopes: default_scopes(),
            generated_package: default_generated_package(),
            allow_wrapped_cycles: true,
            output_dir: None,
        }
    }
}

impl Config {
    /// Load the global config, falling back to defaults when it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\scabbard\config.yaml
    /// - Linux: ~/.config/scabbard/config.yaml
    /// - macOS: ~/Library/Application Support/scabbard/config.yaml
    pub fn load() -> ScabbardResult<Self> {
        let config_path = config_file()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> ScabbardResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScabbardError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ScabbardError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config for a run: explicit path, then `scabbard.yaml` next to the
    /// metadata input, then the global config
    pub fn resolve(explicit: Option<&Path>, input: &Path) -> ScabbardResult<Self> {
        if let Some(path) = explicit {
            debug!("Using config {}", path.display());
            return Self::load_from(path);
        }
        if let Some(path) = project_config_file(input) {
            debug!("Using project config {}", path.display());
            return Self::load_from(&path);
        }
        Self::load()
    }

    /// Save config to the global config location
    pub fn save(&self) -> ScabbardResult<()> {
        let config_path = config_file()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ScabbardError::Path("Invalid config path".to_string()))?;

        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| ScabbardError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> ScabbardResult<()> {
        if self.generated_package.trim().is_empty() {
            return Err(ScabbardError::Config(
                "generated_package cannot be empty".to_string(),
            ));
        }
        ClassName::parse(&format!("{}.KeyRegistry", self.generated_package)).map_err(|_| {
            ScabbardError::Config(format!(
                "generated_package '{}' is not a valid package name",
                self.generated_package
            ))
        })?;

        let mut seen: BTreeMap<&ClassName, &str> = BTreeMap::new();
        for (role, marker) in self.markers.all() {
            if let Some(other) = seen.insert(marker, role) {
                return Err(ScabbardError::Config(format!(
                    "Marker '{}' is used for both '{}' and '{}'",
                    marker, other, role
                )));
            }
        }
        Ok(())
    }

    /// Output directory for generated artifacts
    pub fn get_output_dir(&self) -> PathBuf {
        match self.output_dir {
            Some(ref dir) => PathBuf::from(dir),
            None => PathBuf::from("scabbard-out"),
        }
    }

    /// Name of the generated key registry class
    pub fn key_registry_type(&self) -> ClassName {
        ClassName::in_package(&self.generated_package, "KeyRegistry")
    }
}
