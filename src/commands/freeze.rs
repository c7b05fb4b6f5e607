use anyhow::{Context as AnyhowContext, Result};
use registry::Registry;

use crate::Context;
use crate::cli::{FreezeArgs, UnfreezeArgs};
use crate::commands::Setup;
use crate::generator::ConfigGenerator;
use crate::ui;

pub fn freeze(ctx: &Context, args: FreezeArgs) -> Result<()> {
    set_pins(ctx, &args.names, Some(&args.reference))
}

pub fn unfreeze(ctx: &Context, args: UnfreezeArgs) -> Result<()> {
    set_pins(ctx, &args.names, None)
}

fn set_pins(ctx: &Context, names: &[String], pin: Option<&str>) -> Result<()> {
    let mut setup = Setup::load(ctx)?;

    let (changed, unknown) = apply_pins(&mut setup.registry, names, pin);
    for name in &unknown {
        ui::error(&format!("cannot find {name}"));
    }
    if changed.is_empty() {
        return Ok(());
    }

    setup
        .registry
        .save(&setup.paths.registry)
        .with_context(|| format!("Failed to save {}", setup.paths.registry.display()))?;

    setup
        .loader()
        .rebuild(&setup.registry)
        .context("Failed to rebuild configuration")?;

    if !ctx.quiet {
        let what = match pin {
            Some(pin) => format!("Pinned to {pin}"),
            None => "Unpinned".to_string(),
        };
        ui::success(&format!("{what}: {}", changed.join(", ")));
    }
    Ok(())
}

/// Set `pin` on each named record. Returns (changed, unknown) names.
fn apply_pins(
    registry: &mut Registry,
    names: &[String],
    pin: Option<&str>,
) -> (Vec<String>, Vec<String>) {
    let mut changed = Vec::new();
    let mut unknown = Vec::new();
    for name in names {
        match registry.set_pin(name, pin) {
            Ok(()) => changed.push(name.clone()),
            Err(e) => {
                log::debug!("{e}");
                unknown.push(name.clone());
            }
        }
    }
    (changed, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry::PluginRecord;

    #[test]
    fn test_apply_pins_skips_unknown() {
        let mut registry = Registry::from_records([
            PluginRecord::new("a", "https://example.com/a"),
            PluginRecord::new("b", "https://example.com/b").pinned("v1"),
        ])
        .unwrap();

        let (changed, unknown) = apply_pins(
            &mut registry,
            &["a".to_string(), "nope".to_string()],
            Some("v2.0.0"),
        );
        assert_eq!(changed, vec!["a"]);
        assert_eq!(unknown, vec!["nope"]);
        assert_eq!(registry.get("a").unwrap().pin.as_deref(), Some("v2.0.0"));

        let (changed, _) = apply_pins(&mut registry, &["b".to_string()], None);
        assert_eq!(changed, vec!["b"]);
        assert!(!registry.get("b").unwrap().is_pinned());
    }
}
