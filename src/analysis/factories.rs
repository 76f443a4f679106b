//! Factory interfaces and their provision points

use crate::analysis::helper::{AnalyzerHelper, Member};
use crate::core::ScabbardResult;
use crate::metadata::{ClassDecl, Declaration, MethodDecl};
use crate::model::{Factory, FactoryInjectee, FactoryProvisionPoint, Injectee};
use scabbard_core::types::Type;
use tracing::debug;

/// Suffix of the generated factory implementation
pub const FACTORY_SUFFIX: &str = "$$Factory";

pub struct FactoriesAnalyzer<'h, 'a> {
    helper: &'h AnalyzerHelper<'a>,
}

impl<'h, 'a> FactoriesAnalyzer<'h, 'a> {
    pub fn new(helper: &'h AnalyzerHelper<'a>) -> Self {
        Self { helper }
    }

    pub fn analyze(&self) -> ScabbardResult<Vec<Factory>> {
        let marker = &self.helper.config().markers.factory;
        let mut factories = Vec::new();

        for class in self.helper.metadata().types_annotated_with(marker) {
            let factory = self.analyze_factory(class)?;
            debug!(
                "Factory {} with {} provision point(s)",
                factory.factory_type,
                factory.provision_points.len()
            );
            factories.push(factory);
        }

        Ok(factories)
    }

    fn analyze_factory(&self, class: &ClassDecl) -> ScabbardResult<Factory> {
        let qualifier = self.helper.find_qualifier(class, class.name.as_str());
        let mut provision_points = Vec::new();

        for method in &class.methods {
            if method.is_static() || method.is_constructor() {
                continue;
            }
            if let Some(point) = self.analyze_method(class, method)? {
                provision_points.push(point);
            }
        }

        Ok(Factory {
            factory_type: class.name.clone(),
            implementation_type: class.name.nested(FACTORY_SUFFIX),
            qualifier,
            provision_points,
        })
    }

    /// Pair a factory method with the constructor it calls.
    ///
    /// Every problem is reported and skips the method.
    fn analyze_method(
        &self,
        factory: &ClassDecl,
        method: &MethodDecl,
    ) -> ScabbardResult<Option<FactoryProvisionPoint>> {
        let markers = &self.helper.config().markers;
        let reporter = self.helper.reporter();
        let context = format!("{}.{}", factory.name, method.signature());

        let produced_type = match method.annotation(&markers.factory_return) {
            Some(annotation) => annotation
                .class_value("value")?
                .cloned()
                .unwrap_or_else(|| method.return_type.clone()),
            None => method.return_type.clone(),
        };
        let Type::Class(produced_class) = &produced_type else {
            reporter.report_error(format!(
                "Factory method {} must produce a class, found {}",
                context, produced_type
            ));
            return Ok(None);
        };
        let Some(target) = self.helper.metadata().find_class(produced_class) else {
            reporter.report_error(format!(
                "Factory method {} produces {} which cannot be found",
                context, produced_class
            ));
            return Ok(None);
        };

        let constructors: Vec<&MethodDecl> = target
            .constructors()
            .filter(|c| c.has_annotation(&markers.factory_inject))
            .collect();
        let [constructor] = constructors.as_slice() else {
            reporter.report_error(format!(
                "Class {} produced by {} must have exactly one @{} constructor, found {}",
                target.name,
                context,
                markers.factory_inject,
                constructors.len()
            ));
            return Ok(None);
        };

        let method_injectees: Vec<Injectee> = method
            .parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| {
                let qualifier = self
                    .helper
                    .find_qualifier(parameter, &format!("parameter {} of {}", index, context));
                self.helper.to_injectee(&parameter.parameter_type, qualifier)
            })
            .collect();
        for (index, injectee) in method_injectees.iter().enumerate() {
            if method_injectees[..index].contains(injectee) {
                reporter.report_error(format!(
                    "Factory method {} has more than one parameter for {}",
                    context, injectee
                ));
                return Ok(None);
            }
        }

        let injection_point = self
            .helper
            .to_injection_point(&target.name, Member::Method(constructor));
        let mut injectees = Vec::with_capacity(constructor.parameters.len());
        let mut valid = true;
        for (parameter, injectee) in constructor
            .parameters
            .iter()
            .zip(injection_point.injectees())
        {
            if !parameter.has_annotation(&markers.factory_parameter) {
                injectees.push(FactoryInjectee::FromInjector(injectee.clone()));
                continue;
            }
            match method_injectees.iter().position(|m| m == injectee) {
                Some(argument_index) => injectees.push(FactoryInjectee::FromMethod {
                    injectee: injectee.clone(),
                    argument_index,
                }),
                None => {
                    reporter.report_error(format!(
                        "Parameter {} of {} constructor is marked @{} but {} has no matching parameter",
                        injectee, target.name, markers.factory_parameter, context
                    ));
                    valid = false;
                }
            }
        }
        if !valid {
            return Ok(None);
        }

        Ok(Some(FactoryProvisionPoint {
            container_type: factory.name.clone(),
            method: method.clone(),
            produced_type,
            injection_point,
            injectees,
        }))
    }
}
