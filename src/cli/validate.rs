use super::{services, GlobalOptions};
use scabbard::compiler::Compiler;
use scabbard::core::ScabbardResult;
use std::path::Path;

pub fn run(input: &Path, options: &GlobalOptions) -> ScabbardResult<()> {
    let compiler = Compiler::new(services(input, options, None)?);
    let context = compiler.analyze()?;

    println!("Validating {} component(s)...", context.components.len());
    if let Err(e) = compiler.validate(&context) {
        println!("❌ Validation failed");
        for error in compiler.services().reporter.errors() {
            println!("  ❌ {}", error);
        }
        return Err(e);
    }

    println!("✓ Object graph is valid");
    Ok(())
}
