use xsteps_fs::NormalizedPath;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new(".xsteps");
    assert_eq!(base.join("cmake").as_str(), ".xsteps/cmake");
    assert_eq!(base.join("cmake").join("config.yaml").as_str(), ".xsteps/cmake/config.yaml");
}

#[test]
fn test_join_trailing_slash() {
    let base = NormalizedPath::new("/work/");
    assert_eq!(base.join("cmake").as_str(), "/work/cmake");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new(".xsteps/cmake/config.yaml");
    assert_eq!(path.parent().unwrap().as_str(), ".xsteps/cmake");
    assert_eq!(NormalizedPath::new("/cmake").parent().unwrap().as_str(), "/");
    assert!(NormalizedPath::new("cmake").parent().is_none());
}

#[test]
fn test_file_name_and_extension() {
    let path = NormalizedPath::new(".xsteps/cmake/environment.ps1.env");
    assert_eq!(path.file_name(), Some("environment.ps1.env"));
    assert_eq!(path.extension(), Some("env"));
}

#[test]
fn test_exists_false_for_nonexistent() {
    let path = NormalizedPath::new("/nonexistent/path/that/does/not/exist");
    assert!(!path.exists());
    assert!(!path.is_dir());
    assert!(!path.is_file());
}
