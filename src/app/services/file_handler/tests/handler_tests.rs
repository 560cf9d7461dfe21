//! Tests for per-file orchestration and routing

use super::*;
use crate::LoadOutcome;
use crate::app::services::file_handler::ParserCache;

const FILE: &str = "testfile_10-13-2016.txt";

#[test]
fn test_matching_count_archives_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, GOOD_DATA);
    let (handler, log) = mock_handler(&env, Behaviour::Accept);

    let summary = handler.run(&[FILE]).unwrap();

    let report = &summary.files[0];
    assert_eq!(report.outcome, LoadOutcome::Archived);
    assert_eq!(report.rows_parsed, 2);
    assert_eq!(report.rows_inserted, 2);
    assert!(report.error.is_none());
    assert_eq!(report.destination, env.config.paths.archive_dir.join(FILE));
    assert!(env.is_archived(FILE));
    env.assert_routed_once(FILE);

    let log = log.lock().unwrap();
    assert_eq!(log.instances, 1);
    assert_eq!(log.initialized_tables, vec!["testfile".to_string()]);
}

#[test]
fn test_count_mismatch_fails_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, GOOD_DATA);
    let (handler, _log) = mock_handler(&env, Behaviour::ShortCount);

    let summary = handler.run(&[FILE]).unwrap();

    let report = &summary.files[0];
    assert_eq!(report.outcome, LoadOutcome::Failed);
    assert_eq!(report.rows_parsed, 2);
    assert_eq!(report.rows_inserted, 1);
    assert!(report.error.as_deref().unwrap().contains("mismatch"));
    assert!(env.is_failed(FILE));
    env.assert_routed_once(FILE);
}

#[test]
fn test_backend_init_error_fails_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, GOOD_DATA);
    let (handler, log) = mock_handler(&env, Behaviour::FailInit);

    let summary = handler.run(&[FILE]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert!(env.is_failed(FILE));
    assert!(log.lock().unwrap().batches.is_empty());
    env.assert_routed_once(FILE);
}

#[test]
fn test_backend_insert_error_fails_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, GOOD_DATA);
    let (handler, _log) = mock_handler(&env, Behaviour::FailInsert);

    let summary = handler.run(&[FILE]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert!(summary.files[0].error.as_deref().unwrap().contains("insert refused"));
    env.assert_routed_once(FILE);
}

#[test]
fn test_malformed_line_fails_without_insert() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, MALFORMED_DATA);
    let (handler, log) = mock_handler(&env, Behaviour::Accept);

    let summary = handler.run(&[FILE]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert_eq!(summary.files[0].rows_inserted, 0);
    assert!(env.is_failed(FILE));
    assert!(log.lock().unwrap().batches.is_empty());
}

#[test]
fn test_conversion_error_fails_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, "Foonyor   x  0\n");
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    let summary = handler.run(&[FILE]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert!(summary.files[0].error.as_deref().unwrap().contains("valid"));
    env.assert_routed_once(FILE);
}

#[test]
fn test_missing_spec_fails_file() {
    let env = TestEnv::new();
    env.write_data(FILE, GOOD_DATA);
    let (handler, log) = mock_handler(&env, Behaviour::Accept);

    let summary = handler.run(&[FILE]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert!(env.is_failed(FILE));
    assert_eq!(log.lock().unwrap().instances, 0);
}

#[test]
fn test_invalid_file_name_fails_file() {
    let env = TestEnv::new();
    let name = "testfilewithmissingdate.txt";
    env.write_data(name, GOOD_DATA);
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    let summary = handler.run(&[name]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert!(env.is_failed(name));
    env.assert_routed_once(name);
}

#[test]
fn test_unsupported_column_type_fails_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", "column name,width,datatype\nprice,10,DECIMAL\n");
    env.write_data(FILE, "      1.50\n");
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    let summary = handler.run(&[FILE]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert!(summary.files[0].error.as_deref().unwrap().contains("DECIMAL"));
}

#[test]
fn test_missing_data_file_halts_batch() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data("testfile_2.txt", GOOD_DATA);
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    let result = handler.run(&["testfile_1.txt", "testfile_2.txt"]);

    assert!(matches!(result, Err(Error::FileNotFound { .. })));
    // Files after the halt stay pending
    assert!(env.is_pending("testfile_2.txt"));
}

#[test]
fn test_unsupported_backend_key() {
    let env = TestEnv::new();
    let config = env.config.clone().with_backend("oracle");

    match FileHandler::new(&config) {
        Err(Error::UnsupportedBackend { backend, available }) => {
            assert_eq!(backend, "oracle");
            assert!(available.contains("sqlite"));
        }
        other => panic!("Expected UnsupportedBackend, got {:?}", other),
    }
}

#[test]
fn test_unsupported_file_type_key() {
    let env = TestEnv::new();
    let config = env.config.clone().with_file_type("csv");

    assert!(matches!(
        FileHandler::new(&config),
        Err(Error::UnsupportedFileType { .. })
    ));
}

#[test]
fn test_failure_does_not_block_later_files() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data("testfile_1.txt", MALFORMED_DATA);
    env.write_data("testfile_2.txt", GOOD_DATA);
    env.write_data("other_1.txt", GOOD_DATA);
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    let files = ["testfile_1.txt", "testfile_2.txt", "other_1.txt"];
    let summary = handler.run(&files).unwrap();

    assert_eq!(summary.archived_count(), 1);
    assert_eq!(summary.failed_count(), 2);
    assert_eq!(summary.rows_inserted(), 2);
    assert!(env.is_failed("testfile_1.txt"));
    assert!(env.is_archived("testfile_2.txt"));
    assert!(env.is_failed("other_1.txt"));
    for file in files {
        env.assert_routed_once(file);
    }
}

#[test]
fn test_fresh_backend_per_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data("testfile_1.txt", GOOD_DATA);
    env.write_data("testfile_2.txt", GOOD_DATA);
    let (handler, log) = mock_handler(&env, Behaviour::Accept);

    handler.run(&["testfile_1.txt", "testfile_2.txt"]).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.instances, 2);
    assert_eq!(log.batches, vec![2, 2]);
}

#[test]
fn test_schema_cached_per_file_type() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data("testfile_1.txt", GOOD_DATA);
    env.write_data("testfile_2.txt", GOOD_DATA);
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);
    let mut cache = ParserCache::new();

    handler.process_file("testfile_1.txt", &mut cache).unwrap();
    // The cached schema is used even after the resource disappears
    std::fs::remove_file(env.config.paths.specs_dir.join("testfile.csv")).unwrap();
    let report = handler.process_file("testfile_2.txt", &mut cache).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(report.outcome, LoadOutcome::Archived);
}

#[test]
fn test_file_type_with_underscores_resolves_spec() {
    let env = TestEnv::new();
    env.write_spec("my_test_file", SPEC);
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    assert_eq!(
        handler.spec_path("my_test_file_10-13-2016.txt").unwrap(),
        env.config.paths.specs_dir.join("my_test_file.csv")
    );
    assert!(matches!(
        handler.spec_path("unknown_10-13-2016.txt"),
        Err(Error::MissingSpecification { .. })
    ));
    assert!(matches!(
        handler.spec_path("testfilewithmissingdate.txt"),
        Err(Error::InvalidFileName { .. })
    ));
}

#[test]
fn test_move_file_targets() {
    let env = TestEnv::new();
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    let good = env.write_data("a_1.txt", "x");
    let bad = env.write_data("b_1.txt", "y");

    assert_eq!(
        handler.move_file(&good, true).unwrap(),
        env.config.paths.archive_dir.join("a_1.txt")
    );
    assert_eq!(
        handler.move_file(&bad, false).unwrap(),
        env.config.paths.failed_dir.join("b_1.txt")
    );
    env.assert_routed_once("a_1.txt");
    env.assert_routed_once("b_1.txt");
}

#[test]
fn test_move_file_replaces_existing_target() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, GOOD_DATA);
    std::fs::write(env.config.paths.archive_dir.join(FILE), "stale").unwrap();
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    handler.run(&[FILE]).unwrap();

    let content = std::fs::read_to_string(env.config.paths.archive_dir.join(FILE)).unwrap();
    assert_eq!(content, GOOD_DATA);
    env.assert_routed_once(FILE);
}

#[test]
fn test_failed_move_halts_batch() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, GOOD_DATA);
    std::fs::remove_dir(&env.config.paths.archive_dir).unwrap();
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    assert!(matches!(handler.run(&[FILE]), Err(Error::Io { .. })));
    assert!(env.is_pending(FILE));
}

#[test]
fn test_run_with_reports_each_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data("testfile_1.txt", GOOD_DATA);
    env.write_data("testfile_2.txt", MALFORMED_DATA);
    let (handler, _log) = mock_handler(&env, Behaviour::Accept);

    let mut seen = Vec::new();
    handler
        .run_with(&["testfile_1.txt", "testfile_2.txt"], |report| {
            seen.push((report.file_name.clone(), report.outcome))
        })
        .unwrap();

    assert_eq!(
        seen,
        vec![
            ("testfile_1.txt".to_string(), LoadOutcome::Archived),
            ("testfile_2.txt".to_string(), LoadOutcome::Failed),
        ]
    );
}

#[test]
fn test_check_parses_without_loading_or_moving() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data("testfile_1.txt", GOOD_DATA);
    env.write_data("testfile_2.txt", MALFORMED_DATA);
    env.write_data("nospec_1.txt", GOOD_DATA);
    let (handler, log) = mock_handler(&env, Behaviour::Accept);

    let reports = handler
        .check(&["testfile_1.txt", "testfile_2.txt", "nospec_1.txt"])
        .unwrap();

    assert_eq!(reports[0].rows, Some(2));
    assert_eq!(reports[0].table_name.as_deref(), Some("testfile"));
    assert!(reports[0].is_success());
    assert!(reports[1].rows.is_none());
    assert!(!reports[1].is_success());
    assert!(reports[2].table_name.is_none());
    assert!(!reports[2].is_success());

    assert_eq!(log.lock().unwrap().instances, 0);
    assert!(env.is_pending("testfile_1.txt"));
    assert!(env.is_pending("testfile_2.txt"));
    assert!(env.is_pending("nospec_1.txt"));
}

#[test]
fn test_critical_backend_error_halts_and_leaves_file() {
    let env = TestEnv::new();
    env.write_spec("testfile", SPEC);
    env.write_data(FILE, GOOD_DATA);

    let mut backends = BackendRegistry::new();
    backends.register(
        MOCK_BACKEND,
        Arc::new(|_: &BackendConfig| -> Result<Box<dyn Backend>> {
            Err(Error::configuration("backend misconfigured"))
        }) as BackendFactory,
    );
    let config = env.config.clone().with_backend(MOCK_BACKEND);
    let handler =
        FileHandler::with_registries(&config, &ParserRegistry::with_defaults(), &backends)
            .unwrap();

    assert!(matches!(
        handler.run(&[FILE]),
        Err(Error::Configuration { .. })
    ));
    assert!(env.is_pending(FILE));
}

#[test]
fn test_overflowing_schema_fails_file() {
    let env = TestEnv::new();
    env.write_spec(
        "testfile",
        "column name,width,datatype\na,18446744073709551615,TEXT\nb,2,TEXT\n",
    );
    env.write_data(FILE, "x\n");
    let (handler, log) = mock_handler(&env, Behaviour::Accept);

    let summary = handler.run(&[FILE]).unwrap();

    assert_eq!(summary.files[0].outcome, LoadOutcome::Failed);
    assert!(summary.files[0].error.as_deref().unwrap().contains("overflows"));
    assert_eq!(log.lock().unwrap().instances, 0);
    env.assert_routed_once(FILE);
}
