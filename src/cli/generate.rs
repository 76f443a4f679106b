use super::{services, GlobalOptions};
use scabbard::compiler::Compiler;
use scabbard::core::ScabbardResult;
use std::path::Path;

pub fn run(input: &Path, output: Option<&Path>, options: &GlobalOptions) -> ScabbardResult<()> {
    let services = services(input, options, output)?;
    let output_dir = services.config.get_output_dir();
    let compiler = Compiler::new(services);

    let compilation = match compiler.compile() {
        Ok(compilation) => compilation,
        Err(e) => {
            for error in compiler.services().reporter.errors() {
                println!("  ❌ {}", error);
            }
            return Err(e);
        }
    };

    let plan = &compilation.plan;
    println!("✓ Generated {} artifact(s)", plan.artifact_count());
    println!("  Providers: {}", plan.providers.len());
    println!("  Factories: {}", plan.factories.len());
    println!("  Configurators: {}", plan.configurators.len());
    println!("  Package invaders: {}", plan.package_invaders.len());
    println!("  Bridges: {}", plan.bridges.len());
    println!("  Output: {}", output_dir.display());
    Ok(())
}
