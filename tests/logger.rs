use loadwatch::logger::Logger;

#[test]
fn test_logs_are_kept_in_memory() {
    let logger = Logger::new();
    logger.log("Fetched 3 vehicles".to_string());
    logger.log("Fetched 2 alerts".to_string());

    let logs = logger.get_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].contains("Fetched 3 vehicles"));
    assert!(logs[1].contains("Fetched 2 alerts"));
}

#[test]
fn test_clones_share_entries() {
    let logger = Logger::new();
    let clone = logger.clone();
    clone.log("from a background task".to_string());

    assert_eq!(logger.get_logs().len(), 1);

    logger.clear();
    assert!(clone.get_logs().is_empty());
}

#[test]
fn test_disabled_file_logging_is_a_noop() {
    let path = Logger::init_file_logging(false).unwrap();
    assert!(path.is_none());
}

#[test]
fn test_log_file_path() {
    // No data directory in some sandboxes
    if let Ok(path) = Logger::get_log_file_path() {
        assert!(path.ends_with("loadwatch/loadwatch.log"));
    }
}
