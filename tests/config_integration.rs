use std::path::PathBuf;

use blockpad::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".blockpadrc");
    let content = r"
# comment
--watch

--store notes.json

--log-file=blockpad.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert!(!flags.no_seed);
    assert_eq!(flags.store, Some(PathBuf::from("notes.json")));
    assert_eq!(flags.log_file, Some(PathBuf::from("blockpad.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".blockpadrc");
    let content = "--watch\n--store file.json\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "blockpad".to_string(),
        "--store".to_string(),
        "cli.json".to_string(),
        "--no-seed".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert!(effective.no_seed, "cli flags should be applied");
    assert_eq!(
        effective.store,
        Some(PathBuf::from("cli.json")),
        "cli should override store"
    );
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_local_override_layers_on_global() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".blockpadrc");
    std::fs::write(&global, "--watch\n--store global.json\n").unwrap();
    std::fs::write(&local, "--store local.json\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(
        merged,
        ConfigFlags {
            store: Some(PathBuf::from("local.json")),
            watch: true,
            ..ConfigFlags::default()
        }
    );
}
