//! Generation driver: plans every artifact of a validated graph, then emits it

use crate::config::Config;
use crate::core::ScabbardResult;
use crate::di::traits::CodeEmitter;
use crate::generation::bridges::BridgeGenerator;
use crate::generation::configurators::ConfiguratorGenerator;
use crate::generation::context::GenerationContext;
use crate::generation::factories::FactoryGenerator;
use crate::generation::key_registry::KeyRegistryGenerator;
use crate::generation::package_invaders::PackageInvaderGenerator;
use crate::generation::providers::ProviderGenerator;
use crate::generation::shape::{ClassShape, MethodShape};
use crate::model::InjectionContext;
use scabbard_core::types::ClassName;
use tracing::{debug, info};

/// Every class and bridge one compilation produces
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub providers: Vec<ClassShape>,
    pub factories: Vec<ClassShape>,
    pub key_registry: ClassShape,
    pub package_invaders: Vec<ClassShape>,
    pub configurators: Vec<ClassShape>,
    pub bridges: Vec<(ClassName, MethodShape)>,
}

impl GenerationPlan {
    /// All classes in emission order
    pub fn classes(&self) -> impl Iterator<Item = &ClassShape> {
        self.providers
            .iter()
            .chain(&self.factories)
            .chain(std::iter::once(&self.key_registry))
            .chain(&self.package_invaders)
            .chain(&self.configurators)
    }

    pub fn artifact_count(&self) -> usize {
        self.classes().count() + self.bridges.len()
    }
}

pub struct Generator<'a> {
    config: &'a Config,
    emitter: &'a dyn CodeEmitter,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config, emitter: &'a dyn CodeEmitter) -> Self {
        Self { config, emitter }
    }

    /// Build the shapes of every artifact without writing anything.
    ///
    /// Providers and bridges come from each distinct module once, even when
    /// several components share it.
    pub fn plan(
        &self,
        injection: &InjectionContext,
        context: &GenerationContext,
    ) -> ScabbardResult<GenerationPlan> {
        let providers = ProviderGenerator::new(self.config, context);
        let mut provider_shapes = Vec::new();
        let mut bridges = Vec::new();
        for module in injection.modules() {
            for provider in &module.providers {
                provider_shapes.push(providers.generate(provider)?);
                if let Some(bridge) = BridgeGenerator::generate(&provider.provision_point) {
                    bridges.push(bridge);
                }
            }
        }

        let factories = FactoryGenerator::new(self.config, context);
        let factory_shapes = injection
            .factories
            .iter()
            .map(|factory| factories.generate(factory))
            .collect();

        let key_registry = KeyRegistryGenerator::new(self.config).generate(&context.key_registry);

        let invaders = PackageInvaderGenerator::new(self.config);
        let package_invaders = context
            .package_invaders
            .values()
            .map(|invader| invaders.generate(invader))
            .collect();

        let configurators = ConfiguratorGenerator::new(self.config, context);
        let configurator_shapes = injection
            .components
            .iter()
            .map(|component| configurators.generate(component))
            .collect();

        Ok(GenerationPlan {
            providers: provider_shapes,
            factories: factory_shapes,
            key_registry,
            package_invaders,
            configurators: configurator_shapes,
            bridges,
        })
    }

    /// Hand every planned artifact to the emitter; returns how many were written
    pub fn emit(&self, plan: &GenerationPlan) -> ScabbardResult<usize> {
        let mut count = 0;
        for shape in plan.classes() {
            debug!("Emitting {}", shape.name);
            self.emitter.emit_class(shape)?;
            count += 1;
        }
        for (container, bridge) in &plan.bridges {
            debug!("Emitting bridge {}.{}", container, bridge.name);
            self.emitter.emit_bridge(container, bridge)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn generate(
        &self,
        injection: &InjectionContext,
        context: &GenerationContext,
    ) -> ScabbardResult<GenerationPlan> {
        let plan = self.plan(injection, context)?;
        let count = self.emit(&plan)?;
        info!(
            "Generated {} artifact(s): {} provider(s), {} factory(ies), {} configurator(s)",
            count,
            plan.providers.len(),
            plan.factories.len(),
            plan.configurators.len()
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::di::mocks::{MockErrorReporter, MockMetadataSource, RecordingCodeEmitter};
    use crate::generation::context::GenerationContextFactory;

    const METADATA: &str = r#"
classes:
  - name: a.App
    annotations: [{type: io.scabbard.Component}]
    fields:
      - name: name
        type: java.lang.String
        modifiers: [private]
        annotations: [{type: io.scabbard.Provide}]
  - name: a.Shared
    annotations: [{type: io.scabbard.Module, values: {isDefault: {bool: true}}}]
  - name: a.Other
    annotations: [{type: io.scabbard.Component}]
  - name: a.Service
    methods:
      - name: "<init>"
        parameters: [{type: java.lang.String}]
        annotations: [{type: javax.inject.Inject}]
"#;

    fn analyze(metadata: &MockMetadataSource, config: &Config) -> (InjectionContext, GenerationContext) {
        let reporter = MockErrorReporter::new();
        let injection = Analyzer::new(metadata, config, &reporter).analyze().unwrap();
        let context = GenerationContextFactory::new(metadata, config).create(&injection);
        (injection, context)
    }

    #[test]
    fn test_plan_covers_every_artifact() {
        let metadata = MockMetadataSource::from_yaml(METADATA).unwrap();
        let config = Config::default();
        let (injection, context) = analyze(&metadata, &config);
        let emitter = RecordingCodeEmitter::new();

        let plan = Generator::new(&config, &emitter).plan(&injection, &context).unwrap();

        assert_eq!(plan.configurators.len(), 2);
        assert_eq!(plan.bridges.len(), 1);
        assert_eq!(plan.bridges[0].1.name, "name$bridge$0");
        assert_eq!(plan.key_registry.name.as_str(), "io.scabbard.generated.KeyRegistry");
        assert!(plan.package_invaders.is_empty());
        assert!(emitter.class_names().is_empty());
    }

    #[test]
    fn test_generate_emits_plan() {
        let metadata = MockMetadataSource::from_yaml(METADATA).unwrap();
        let config = Config::default();
        let (injection, context) = analyze(&metadata, &config);
        let emitter = RecordingCodeEmitter::new();

        let plan = Generator::new(&config, &emitter)
            .generate(&injection, &context)
            .unwrap();

        assert_eq!(emitter.classes().len() + emitter.bridges().len(), plan.artifact_count());
        let names = emitter.class_names();
        assert!(names.contains(&"a.App$$InjectorConfigurator".to_string()));
        assert!(names.contains(&"a.Other$$InjectorConfigurator".to_string()));
    }
}
