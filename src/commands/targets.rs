//! Targets command implementation

use anyhow::Result;
use console::style;

use crate::build::{BuildContext, BuildProfile, Platform};

/// Print the executable settings and every path a build would produce
pub fn list_targets(ctx: &BuildContext) -> Result<()> {
    let host = Platform::host();

    println!("{} {}", style("Executable:").bold(), ctx.config.name());
    println!("{} {}", style("Package:").bold(), ctx.config.executable.package);
    println!("{} {}", style("Bin dir:").bold(), ctx.bin_dir().display());
    println!("{} {}", style("Host:").bold(), host);
    println!();

    println!("{}", style("Targets:").bold());
    for platform in &ctx.config.targets {
        let marker = if *platform == host { " (host)" } else { "" };
        println!(
            "  {:<16} {:<8} {}{}",
            platform.to_string(),
            BuildProfile::Release.to_string(),
            ctx.output_path(platform, BuildProfile::Release).display(),
            marker
        );
    }
    println!(
        "  {:<16} {:<8} {}",
        host.to_string(),
        BuildProfile::Debug.to_string(),
        ctx.output_path(&host, BuildProfile::Debug).display()
    );

    Ok(())
}
