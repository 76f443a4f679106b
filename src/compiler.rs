//! Compiler pipeline: analysis, validation and generation over one set of services

use crate::analysis::Analyzer;
use crate::core::{ScabbardError, ScabbardResult};
use crate::di::ServiceContainer;
use crate::generation::{GenerationContextFactory, GenerationPlan, Generator};
use crate::model::InjectionContext;
use crate::validation::Validator;
use tracing::{info, warn};

/// Outcome of a successful compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    pub context: InjectionContext,
    pub plan: GenerationPlan,
}

pub struct Compiler {
    services: ServiceContainer,
}

impl Compiler {
    pub fn new(services: ServiceContainer) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &ServiceContainer {
        &self.services
    }

    /// Build the injection context. Problems in individual declarations are
    /// reported, not returned; only malformed annotation values fail the call.
    pub fn analyze(&self) -> ScabbardResult<InjectionContext> {
        let services = &self.services;
        Analyzer::new(
            services.metadata.as_ref(),
            &services.config,
            services.reporter.as_ref(),
        )
        .analyze()
    }

    /// Validate the context; fails when any error has been reported so far,
    /// including errors from analysis
    pub fn validate(&self, context: &InjectionContext) -> ScabbardResult<()> {
        let services = &self.services;
        Validator::new(
            services.metadata.as_ref(),
            &services.config,
            services.reporter.as_ref(),
        )
        .validate(context);

        let count = services.reporter.error_count();
        if count > 0 {
            warn!("Validation failed with {} error(s)", count);
            return Err(ScabbardError::Validation { count });
        }
        Ok(())
    }

    /// Analyze, validate and emit every generated artifact
    pub fn compile(&self) -> ScabbardResult<Compilation> {
        let services = &self.services;
        let context = self.analyze()?;
        self.validate(&context)?;

        let generation = GenerationContextFactory::new(services.metadata.as_ref(), &services.config)
            .create(&context);
        let plan = Generator::new(&services.config, services.emitter.as_ref())
            .generate(&context, &generation)?;
        info!("Compiled {} component(s)", context.components.len());

        Ok(Compilation { context, plan })
    }
}
