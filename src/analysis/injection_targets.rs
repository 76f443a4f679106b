//! Discovery of injectable and providable types

use crate::analysis::helper::{AnalyzerHelper, Member};
use crate::metadata::Declaration;
use crate::model::{InjectionPoint, InjectionTarget};
use scabbard_core::types::ClassName;
use std::collections::BTreeMap;
use tracing::debug;

/// Targets found in the metadata, ordered by type name
#[derive(Debug, Clone, Default)]
pub struct InjectionTargets {
    /// Types with field or method injection points
    pub injectable: Vec<InjectionTarget>,
    /// Types with exactly one injectable constructor
    pub providable: Vec<InjectionTarget>,
}

pub struct InjectionTargetsAnalyzer<'h, 'a> {
    helper: &'h AnalyzerHelper<'a>,
}

impl<'h, 'a> InjectionTargetsAnalyzer<'h, 'a> {
    pub fn new(helper: &'h AnalyzerHelper<'a>) -> Self {
        Self { helper }
    }

    /// Partition every `@Inject` member by owning type.
    ///
    /// Static members are left to the sanity checker. A type with several
    /// injectable constructors is reported and is not providable.
    pub fn analyze(&self) -> InjectionTargets {
        let metadata = self.helper.metadata();
        let inject = &self.helper.config().markers.inject;

        let mut constructors: BTreeMap<ClassName, Vec<InjectionPoint>> = BTreeMap::new();
        let mut members: BTreeMap<ClassName, Vec<InjectionPoint>> = BTreeMap::new();

        for (class, field) in metadata.fields_annotated_with(inject) {
            if field.is_static() {
                continue;
            }
            members
                .entry(class.name.clone())
                .or_default()
                .push(self.helper.to_injection_point(&class.name, Member::Field(field)));
        }

        for (class, method) in metadata.methods_annotated_with(inject) {
            if method.is_static() {
                continue;
            }
            let point = self
                .helper
                .to_injection_point(&class.name, Member::Method(method));
            let bucket = if method.is_constructor() {
                &mut constructors
            } else {
                &mut members
            };
            bucket.entry(class.name.clone()).or_default().push(point);
        }

        let mut providable = Vec::new();
        for (target_type, mut points) in constructors {
            if points.len() > 1 {
                self.helper.reporter().report_error(format!(
                    "Class {} has {} injectable constructors; at most one is allowed",
                    target_type,
                    points.len()
                ));
                continue;
            }
            if let Some(point) = points.pop() {
                providable.push(InjectionTarget::new(target_type, vec![point]));
            }
        }

        let injectable: Vec<InjectionTarget> = members
            .into_iter()
            .map(|(target_type, points)| InjectionTarget::new(target_type, points))
            .collect();

        debug!(
            "Found {} injectable and {} providable target(s)",
            injectable.len(),
            providable.len()
        );

        InjectionTargets {
            injectable,
            providable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::di::mocks::{MockErrorReporter, MockMetadataSource};
    use crate::di::traits::ErrorReporter;

    const METADATA: &str = r#"
classes:
  - name: a.Foo
    methods:
      - name: "<init>"
        annotations: [{type: javax.inject.Inject}]
  - name: a.Baz
    fields:
      - name: bar
        type: a.Bar
        annotations: [{type: javax.inject.Inject}]
      - name: counter
        type: int
        modifiers: [static]
        annotations: [{type: javax.inject.Inject}]
    methods:
      - name: "<init>"
        parameters: [{type: a.Foo}]
        annotations: [{type: javax.inject.Inject}]
      - name: setFoo
        parameters: [{type: a.Foo}]
        annotations: [{type: javax.inject.Inject}]
  - name: a.Twice
    methods:
      - name: "<init>"
        annotations: [{type: javax.inject.Inject}]
      - name: "<init>"
        parameters: [{type: a.Foo}]
        annotations: [{type: javax.inject.Inject}]
"#;

    fn class(name: &str) -> ClassName {
        ClassName::parse(name).unwrap()
    }

    #[test]
    fn test_partition_targets() {
        let metadata = MockMetadataSource::from_yaml(METADATA).unwrap();
        let config = Config::default();
        let reporter = MockErrorReporter::new();
        let helper = AnalyzerHelper::new(&metadata, &config, &reporter).unwrap();

        let targets = InjectionTargetsAnalyzer::new(&helper).analyze();

        let providable: Vec<&ClassName> =
            targets.providable.iter().map(|t| &t.target_type).collect();
        assert_eq!(providable, vec![&class("a.Baz"), &class("a.Foo")]);

        assert_eq!(targets.injectable.len(), 1);
        let baz = &targets.injectable[0];
        assert_eq!(baz.target_type, class("a.Baz"));
        // static field skipped, constructor lives in the providable target
        assert_eq!(baz.injection_points.len(), 2);
        assert!(baz.constructor().is_none());
    }

    #[test]
    fn test_multiple_constructors_reported() {
        let metadata = MockMetadataSource::from_yaml(METADATA).unwrap();
        let config = Config::default();
        let reporter = MockErrorReporter::new();
        let helper = AnalyzerHelper::new(&metadata, &config, &reporter).unwrap();

        let targets = InjectionTargetsAnalyzer::new(&helper).analyze();

        assert!(!targets
            .providable
            .iter()
            .any(|t| t.target_type == class("a.Twice")));
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.count_containing("a.Twice"), 1);
    }
}
