//! Keeps `tests/unit/` a wired, one-to-one mirror of the four source modules

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;

    const MODULES: [&str; 4] = ["algorithm", "analysis", "io", "spatial"];

    /// Stems of the `.rs` files directly inside `dir`, without `mod.rs`
    fn module_stems(dir: &Path) -> BTreeSet<String> {
        let Ok(entries) = fs::read_dir(dir) else {
            return BTreeSet::new();
        };
        entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "rs"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .filter(|stem| stem != "mod")
            .collect()
    }

    /// Names declared as `mod name;` or `pub mod name;` in a module list file
    fn declared_modules(file: &Path) -> BTreeSet<String> {
        fs::read_to_string(file)
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter_map(|line| line.strip_prefix("pub ").unwrap_or(line).strip_prefix("mod "))
            .filter_map(|rest| rest.strip_suffix(';'))
            .map(str::to_string)
            .collect()
    }

    // Tests the source tree holds exactly the known top-level modules
    // Verified against the directories under src/ and the unit harness root
    #[test]
    fn test_top_level_modules_match() {
        let src_dirs: BTreeSet<String> = fs::read_dir("src")
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|entry| entry.path().is_dir())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        let expected: BTreeSet<String> = MODULES.iter().map(|m| (*m).to_string()).collect();

        assert_eq!(src_dirs, expected, "src/ modules changed; update the unit mirror");
        assert_eq!(
            declared_modules(Path::new("tests/unit/main.rs")),
            expected,
            "tests/unit/main.rs must declare every module"
        );
    }

    // Tests each source file has a unit test file that is compiled and holds tests
    #[test]
    fn test_source_files_have_wired_unit_tests() {
        let mut problems = Vec::new();

        for module in MODULES {
            let unit_dir = Path::new("tests/unit").join(module);
            let declared = declared_modules(&unit_dir.join("mod.rs"));

            for stem in module_stems(&Path::new("src").join(module)) {
                let test_file = unit_dir.join(format!("{stem}.rs"));
                match fs::read_to_string(&test_file) {
                    Err(_) => problems.push(format!("missing {}", test_file.display())),
                    Ok(content) if !content.contains("#[test]") => {
                        problems.push(format!("no #[test] in {}", test_file.display()));
                    }
                    Ok(_) => {}
                }
                if !declared.contains(&stem) {
                    problems.push(format!("{module}/mod.rs does not declare `mod {stem};`"));
                }
            }
        }

        assert!(problems.is_empty(), "unit mirror incomplete:\n  {}", problems.join("\n  "));
    }

    // Tests no unit test file outlives its source file
    #[test]
    fn test_unit_tests_have_sources() {
        let orphans: Vec<String> = MODULES
            .iter()
            .flat_map(|module| {
                let sources = module_stems(&Path::new("src").join(module));
                module_stems(&Path::new("tests/unit").join(module))
                    .into_iter()
                    .filter(move |stem| !sources.contains(stem))
                    .map(move |stem| format!("tests/unit/{module}/{stem}.rs"))
            })
            .collect();

        assert!(orphans.is_empty(), "unit tests without sources: {orphans:?}");
    }
}
