use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use astshape_cli::{Args, CliError, ConfigError, SetEdit};

fn grammars_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../grammars")
}

/// Collects all .json files from a directory
fn collect_grammar_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(grammar: &Path, output: &Path) -> Args {
    Args {
        grammar: grammar.to_string_lossy().to_string(),
        names: Vec::new(),
        order: None,
        set: Vec::new(),
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_grammars() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_grammars = collect_grammar_files(grammars_dir());

    assert!(
        !valid_grammars.is_empty(),
        "No valid grammars found in grammars/"
    );

    let mut failed = Vec::new();

    for grammar_path in &valid_grammars {
        let output_path = temp_dir.path().join(format!(
            "{}.txt",
            grammar_path.file_stem().unwrap().to_string_lossy()
        ));

        if let Err(e) = astshape_cli::run(&args(grammar_path, &output_path)) {
            failed.push((grammar_path.clone(), e));
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid grammars that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid grammar(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_grammars() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_grammars = collect_grammar_files(grammars_dir().join("errors"));

    assert!(
        !error_grammars.is_empty(),
        "No error grammars found in grammars/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for grammar_path in &error_grammars {
        let output_path = temp_dir.path().join(format!(
            "error_{}.txt",
            grammar_path.file_stem().unwrap().to_string_lossy()
        ));

        if astshape_cli::run(&args(grammar_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(grammar_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError grammars that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error grammar(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_edits_names_and_order() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("function.txt");

    let mut cfg = args(&grammars_dir().join("shift-subset.json"), &output_path);
    cfg.names = vec!["Function".to_string(), "ObjectBinding".to_string()];
    cfg.order = Some(
        grammars_dir()
            .join("attribute-order.conf")
            .to_string_lossy()
            .to_string(),
    );
    cfg.set = [
        "Function.params=List",
        "Function.restParams=BindingPattern",
        "ObjectBinding.rest=nullable:Identifier",
    ]
    .iter()
    .map(|edit| edit.parse::<SetEdit>().expect("valid edit"))
    .collect();

    astshape_cli::run(&cfg).expect("Failed to run");

    let output = fs::read_to_string(&output_path).expect("Failed to read output");
    assert_eq!(
        output,
        "Function\n\
         name : BindingIdentifier\n\
         isAsync : boolean\n\
         isGenerator : boolean\n\
         body : FunctionBody\n\
         params : List\n\
         restParams : BindingPattern\n\n\
         ObjectBinding\n\
         rest : nullable [ Identifier ]\n\
         properties : list [ BindingProperty ]\n\n"
    );
}

#[test]
fn e2e_unknown_name_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("missing.txt");

    let mut cfg = args(&grammars_dir().join("shift-subset.json"), &output_path);
    cfg.names = vec!["Missing".to_string()];

    assert!(astshape_cli::run(&cfg).is_err());
    assert!(!output_path.exists(), "no partial output on failure");
}

#[test]
fn e2e_missing_config_is_a_config_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("out.txt");

    let mut cfg = args(&grammars_dir().join("shift-subset.json"), &output_path);
    cfg.config = Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string());

    let err = astshape_cli::run(&cfg).expect_err("missing config must fail");
    assert!(matches!(err, CliError::Config(ConfigError::Missing { .. })));
    assert!(!output_path.exists());
}

#[test]
fn e2e_rejected_edit_leaves_no_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("out.txt");

    let mut cfg = args(&grammars_dir().join("shift-subset.json"), &output_path);
    cfg.names = vec!["Function".to_string()];
    // A union needs at least two alternatives, so `union:Only` cannot be stored.
    cfg.set = vec!["Function.params=union:Only".parse().expect("valid edit")];

    let err = astshape_cli::run(&cfg).expect_err("invalid edit must fail");
    assert!(err.to_string().contains("`params`"), "{err}");
    assert!(!output_path.exists(), "no partial output on failure");
}
