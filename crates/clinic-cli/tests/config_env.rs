//! Environment overrides live in their own test binary so the variables
//! never leak into other config tests.

use std::env;
use std::io::Write;

use clinic_cli::config::BackendKind;
use clinic_cli::config::loader::load_config;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(b"[storage]\nbackend = \"postgres\"\n\n[logging]\nlevel = \"info\"\n")
        .unwrap();

    unsafe {
        env::set_var("CLINIC__STORAGE__BACKEND", "memory");
        env::set_var("CLINIC__LOGGING__LEVEL", "error");
    }
    let config = load_config(file.path().to_str());
    unsafe {
        env::remove_var("CLINIC__STORAGE__BACKEND");
        env::remove_var("CLINIC__LOGGING__LEVEL");
    }

    let config = config.unwrap();
    assert_eq!(config.storage.backend, BackendKind::Memory);
    assert_eq!(config.logging.level, "error");
}
