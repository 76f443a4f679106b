//! Component tree construction

use crate::analysis::helper::AnalyzerHelper;
use crate::analysis::modules::ModuleRegistry;
use crate::core::{ScabbardError, ScabbardResult};
use crate::graph::DirectedGraph;
use crate::metadata::Declaration;
use crate::model::{Component, Module};
use scabbard_core::types::{ClassName, Type};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::debug;

pub struct ComponentsAnalyzer<'h, 'a> {
    helper: &'h AnalyzerHelper<'a>,
}

impl<'h, 'a> ComponentsAnalyzer<'h, 'a> {
    pub fn new(helper: &'h AnalyzerHelper<'a>) -> Self {
        Self { helper }
    }

    /// Build every declared component with its implicit module resolved.
    ///
    /// The graph runs from each declared parent to the component; `None`
    /// stands for the synthetic root that parentless components hang off.
    pub fn analyze(&self, registry: &mut ModuleRegistry<'_, '_>) -> ScabbardResult<Vec<Component>> {
        let marker = &self.helper.config().markers.component;
        let classes = self.helper.metadata().types_annotated_with(marker);

        let mut graph: DirectedGraph<Option<ClassName>> = DirectedGraph::new();
        graph.add_vertex(None);
        for class in &classes {
            let parent = match class.annotation(marker) {
                Some(annotation) => annotation
                    .class_value("parent")?
                    .and_then(Type::raw_class)
                    .cloned(),
                None => None,
            };
            graph.add_edge(parent, Some(class.name.clone()));
        }

        let mut reported_cycles = HashSet::new();
        let mut components = Vec::with_capacity(classes.len());
        for class in classes {
            let vertex = Some(class.name.clone());
            let parent = graph.predecessors(&vertex).next().cloned().flatten();
            let subcomponents: Vec<ClassName> =
                graph.successors(&vertex).flatten().cloned().collect();

            let default_module = match registry.get_component_module(&class.name) {
                Ok(module) => module,
                Err(e @ ScabbardError::ModuleCycle { .. }) => {
                    let message = e.to_string();
                    if reported_cycles.insert(message.clone()) {
                        self.helper.reporter().report_error(message);
                    }
                    Rc::new(Module::new(class.name.clone()))
                }
                Err(e) => return Err(e),
            };

            debug!(
                "Component {} (parent: {}, {} subcomponent(s))",
                class.name,
                parent
                    .as_ref()
                    .map(ClassName::to_string)
                    .unwrap_or_else(|| "none".to_string()),
                subcomponents.len()
            );

            components.push(Component {
                component_type: class.name.clone(),
                parent,
                default_module,
                subcomponents,
            });
        }

        Ok(components)
    }
}
