//! Integration tests for module naming, layout and binding discovery

use std::fs;

use ddd_toolkit::prelude::*;
use proptest::prelude::*;

#[test]
fn test_descriptor_paths_feed_binding_scan() -> anyhow::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let config = ToolkitConfig::default().with_base_path(temp_dir.path());
    let layout = ModuleLayout::new(&config);
    let spec = ModuleSpec::parse("inventory:stock/warehouse_slot")?;

    for kind in [ArtifactKind::Contract, ArtifactKind::Repository] {
        let descriptor = layout.describe(kind, &spec);
        fs::create_dir_all(&descriptor.directory)?;
        fs::write(descriptor.file_path("php"), "<?php\n")?;
    }

    let found = BindingScanner::new(&config).scan()?;
    let expected = BindingCandidate::from_descriptors(
        &layout.describe(ArtifactKind::Contract, &spec),
        &layout.describe(ArtifactKind::Repository, &spec),
        layout.modules_root(),
        "php",
    );

    assert_eq!(found.into_iter().collect::<Vec<_>>(), [expected]);
    Ok(())
}

#[test]
fn test_custom_root_namespace_and_extension() -> anyhow::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("ddd-toolkit.toml");
    fs::write(
        &path,
        "[project]\nmodules_dir = \"src/Domains\"\nroot_namespace = 'Acme\\Domains'\n",
    )?;

    let config = ToolkitConfig::load_from(&path)?.with_base_path(temp_dir.path());
    let layout = ModuleLayout::new(&config);
    let service = layout.describe(ArtifactKind::Service, &ModuleSpec::parse("Billing:Invoice")?);

    assert_eq!(service.namespace, "Acme\\Domains\\Billing\\Application\\Services");
    assert_eq!(
        service.directory,
        temp_dir.path().join("src/Domains/Billing/Application/Services")
    );
    Ok(())
}

fn segment() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,6}([A-Z][a-z]{1,6})?"
}

proptest! {
    #[test]
    fn prop_specifier_display_round_trips(
        module in segment(),
        dirs in proptest::collection::vec(segment(), 0..3),
        file in segment(),
    ) {
        let spec = ModuleSpec::from_parts(&module, &dirs, &file).unwrap();
        let reparsed = ModuleSpec::parse(&spec.to_string()).unwrap();
        prop_assert_eq!(reparsed, spec);
    }
}
