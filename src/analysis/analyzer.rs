//! Analysis stage entry point

use crate::analysis::bindings::BindingsAnalyzer;
use crate::analysis::components::ComponentsAnalyzer;
use crate::analysis::factories::FactoriesAnalyzer;
use crate::analysis::helper::AnalyzerHelper;
use crate::analysis::injection_targets::InjectionTargetsAnalyzer;
use crate::analysis::modules::{ModuleParser, ModuleRegistry};
use crate::config::Config;
use crate::core::ScabbardResult;
use crate::di::traits::{ErrorReporter, MetadataSource};
use crate::model::InjectionContext;
use tracing::info;

/// Runs every analyzer in dependency order and assembles the injection context
pub struct Analyzer<'a> {
    metadata: &'a dyn MetadataSource,
    config: &'a Config,
    reporter: &'a dyn ErrorReporter,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        metadata: &'a dyn MetadataSource,
        config: &'a Config,
        reporter: &'a dyn ErrorReporter,
    ) -> Self {
        Self {
            metadata,
            config,
            reporter,
        }
    }

    /// Recoverable problems go to the reporter; only malformed annotation values
    /// end the run with an error
    pub fn analyze(&self) -> ScabbardResult<InjectionContext> {
        let helper = AnalyzerHelper::new(self.metadata, self.config, self.reporter)?;

        let targets = InjectionTargetsAnalyzer::new(&helper).analyze();
        let bindings = BindingsAnalyzer::new(&helper).analyze()?.bindings();
        let factories = FactoriesAnalyzer::new(&helper).analyze()?;

        let parser = ModuleParser::new(&helper, &targets.providable, &factories, &bindings)?;
        let mut registry = ModuleRegistry::new(parser);
        let components = ComponentsAnalyzer::new(&helper).analyze(&mut registry)?;

        info!(
            "Analyzed {} component(s), {} injectable target(s), {} providable target(s), {} factory(ies), {} binding(s)",
            components.len(),
            targets.injectable.len(),
            targets.providable.len(),
            factories.len(),
            bindings.len()
        );

        Ok(InjectionContext {
            components,
            injectable_targets: targets.injectable,
            providable_targets: targets.providable,
            factories,
            bindings,
        })
    }
}
