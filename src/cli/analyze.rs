use super::{services, GlobalOptions};
use scabbard::compiler::Compiler;
use scabbard::core::ScabbardResult;
use scabbard::model::{Component, InjectionContext};
use std::path::Path;

pub fn run(input: &Path, options: &GlobalOptions) -> ScabbardResult<()> {
    let compiler = Compiler::new(services(input, options, None)?);
    let context = compiler.analyze()?;

    print_summary(&context);

    let errors = compiler.services().reporter.errors();
    if !errors.is_empty() {
        println!();
        println!("{} problem(s) found during analysis:", errors.len());
        for error in &errors {
            println!("  ❌ {}", error);
        }
    }
    Ok(())
}

fn print_summary(context: &InjectionContext) {
    println!("Components: {}", context.components.len());
    for component in context.root_components() {
        print_component(context, component, 1);
    }
    println!("Modules: {}", context.modules().len());
    println!("Providable targets: {}", context.providable_targets.len());
    println!("Injectable targets: {}", context.injectable_targets.len());
    println!("Factories: {}", context.factories.len());
    println!("Bindings: {}", context.bindings.len());
}

fn print_component(context: &InjectionContext, component: &Component, depth: usize) {
    let providers: usize = component
        .modules()
        .iter()
        .map(|module| module.providers.len())
        .sum();
    println!(
        "{}{} ({} module(s), {} provider(s))",
        "  ".repeat(depth),
        component.component_type,
        component.modules().len(),
        providers
    );
    for child in &component.subcomponents {
        // a cyclic parent chain never reaches a root, so recursion terminates
        if let Some(child) = context.find_component(child) {
            print_component(context, child, depth + 1);
        }
    }
}
